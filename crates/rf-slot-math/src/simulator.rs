//! Statistical simulator
//!
//! Drives the spin engine over many synthetic seeds to measure realized RTP,
//! hit frequency and the win-size distribution. Spins are split into fixed
//! chunks run in parallel; chunk tallies are merged in chunk order so the
//! report does not depend on the thread count.

use std::collections::BTreeMap;
use std::ops::Range;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::SpinEngine;
use crate::features::{FeatureContext, round_for};
use crate::triggers::FeatureType;

/// Spins per parallel work unit
pub const DEFAULT_CHUNK_SIZE: u64 = 10_000;

/// Win size buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinCategory {
    NoWin,
    Small,
    Medium,
    Large,
    Mega,
}

/// Upper bounds (inclusive, × bet) of the small, medium and large buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinCategoryThresholds {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

impl Default for WinCategoryThresholds {
    fn default() -> Self {
        Self {
            small: 1.0,
            medium: 5.0,
            large: 15.0,
        }
    }
}

impl WinCategoryThresholds {
    pub fn classify(&self, multiplier: f64) -> WinCategory {
        if multiplier <= 0.0 {
            WinCategory::NoWin
        } else if multiplier <= self.small {
            WinCategory::Small
        } else if multiplier <= self.medium {
            WinCategory::Medium
        } else if multiplier <= self.large {
            WinCategory::Large
        } else {
            WinCategory::Mega
        }
    }
}

/// Spin counts per win category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinDistribution {
    pub no_win: u64,
    pub small: u64,
    pub medium: u64,
    pub large: u64,
    pub mega: u64,
}

impl WinDistribution {
    pub fn record(&mut self, category: WinCategory) {
        *self.slot(category) += 1;
    }

    pub fn get(&self, category: WinCategory) -> u64 {
        match category {
            WinCategory::NoWin => self.no_win,
            WinCategory::Small => self.small,
            WinCategory::Medium => self.medium,
            WinCategory::Large => self.large,
            WinCategory::Mega => self.mega,
        }
    }

    pub fn total(&self) -> u64 {
        self.no_win + self.small + self.medium + self.large + self.mega
    }

    pub fn merge(&mut self, other: &Self) {
        self.no_win += other.no_win;
        self.small += other.small;
        self.medium += other.medium;
        self.large += other.large;
        self.mega += other.mega;
    }

    /// Share of each category in percent (all zero for an empty distribution)
    pub fn percentages(&self) -> BTreeMap<WinCategory, f64> {
        let total = self.total();
        [
            WinCategory::NoWin,
            WinCategory::Small,
            WinCategory::Medium,
            WinCategory::Large,
            WinCategory::Mega,
        ]
        .into_iter()
        .map(|cat| {
            let pct = if total == 0 {
                0.0
            } else {
                self.get(cat) as f64 / total as f64 * 100.0
            };
            (cat, pct)
        })
        .collect()
    }

    fn slot(&mut self, category: WinCategory) -> &mut u64 {
        match category {
            WinCategory::NoWin => &mut self.no_win,
            WinCategory::Small => &mut self.small,
            WinCategory::Medium => &mut self.medium,
            WinCategory::Large => &mut self.large,
            WinCategory::Mega => &mut self.mega,
        }
    }
}

/// Aggregate result of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub num_spins: u64,
    pub bet_amount: f64,
    pub total_bet: f64,
    pub total_payout: f64,
    /// `total_payout / total_bet`
    pub rtp: f64,
    /// `1 - no_win / num_spins`
    pub hit_frequency: f64,
    pub distribution: WinDistribution,
    pub percentages: BTreeMap<WinCategory, f64>,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
    pub feature_triggers: BTreeMap<FeatureType, u64>,
    /// Feature rounds were played and paid
    pub includes_features: bool,
}

impl SimulationReport {
    /// Report for a run with no spins
    pub fn empty(bet_amount: f64) -> Self {
        Self {
            num_spins: 0,
            bet_amount,
            total_bet: 0.0,
            total_payout: 0.0,
            rtp: 0.0,
            hit_frequency: 0.0,
            distribution: WinDistribution::default(),
            percentages: WinDistribution::default().percentages(),
            min_multiplier: 0.0,
            max_multiplier: 0.0,
            feature_triggers: BTreeMap::new(),
            includes_features: false,
        }
    }
}

/// Result of playing feature rounds in isolation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSimulationReport {
    pub feature_type: FeatureType,
    pub rounds: u64,
    pub spins_played: u64,
    pub retriggers: u64,
    pub total_multiplier: f64,
    pub average_multiplier: f64,
    pub max_multiplier: f64,
    pub bet_amount: f64,
    pub total_payout: f64,
}

/// Running totals of one chunk
#[derive(Debug, Clone)]
struct Tally {
    spins: u64,
    multiplier_sum: f64,
    distribution: WinDistribution,
    min: f64,
    max: f64,
    triggers: BTreeMap<FeatureType, u64>,
}

impl Tally {
    fn new() -> Self {
        Self {
            spins: 0,
            multiplier_sum: 0.0,
            distribution: WinDistribution::default(),
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            triggers: BTreeMap::new(),
        }
    }

    fn merge(mut self, other: Tally) -> Self {
        self.spins += other.spins;
        self.multiplier_sum += other.multiplier_sum;
        self.distribution.merge(&other.distribution);
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        for (feature, n) in other.triggers {
            *self.triggers.entry(feature).or_insert(0) += n;
        }
        self
    }
}

/// Simulation seeds for spin `i`
pub fn simulation_seeds(i: u64) -> (String, String) {
    (format!("sim_client_{i}"), format!("sim_server_{i}"))
}

/// Batch simulator over a spin engine
#[derive(Debug, Clone)]
pub struct Simulator {
    engine: SpinEngine,
    thresholds: WinCategoryThresholds,
    chunk_size: u64,
    threads: Option<usize>,
    include_features: bool,
}

impl Simulator {
    pub fn new(engine: SpinEngine) -> Self {
        Self {
            engine,
            thresholds: WinCategoryThresholds::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            threads: None,
            include_features: false,
        }
    }

    pub fn with_thresholds(mut self, thresholds: WinCategoryThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Worker threads (`None` = rayon's global pool)
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Also play and pay the feature rounds each spin triggers
    pub fn with_features(mut self, include_features: bool) -> Self {
        self.include_features = include_features;
        self
    }

    pub fn engine(&self) -> &SpinEngine {
        &self.engine
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BASE GAME
    // ═══════════════════════════════════════════════════════════════════════════

    /// Simulate `num_spins` spins at `bet_amount`
    pub fn simulate(&self, num_spins: u64, bet_amount: f64) -> SimulationReport {
        if num_spins == 0 {
            log::warn!("simulation requested with 0 spins");
            return SimulationReport::empty(bet_amount);
        }

        log::info!(
            "simulating {num_spins} spins of '{}' (bet {bet_amount}, features: {})",
            self.engine.config().name,
            self.include_features
        );

        let tallies = self.run_chunks(num_spins, |range| self.tally(range));
        let tally = tallies.into_iter().fold(Tally::new(), Tally::merge);

        let total_bet = bet_amount * num_spins as f64;
        let total_payout = tally.multiplier_sum * bet_amount;
        let rtp = if total_bet > 0.0 {
            total_payout / total_bet
        } else {
            // zero bet: report the multiplier-based ratio
            tally.multiplier_sum / num_spins as f64
        };
        let hit_frequency = 1.0 - tally.distribution.no_win as f64 / num_spins as f64;

        let report = SimulationReport {
            num_spins,
            bet_amount,
            total_bet,
            total_payout,
            rtp,
            hit_frequency,
            percentages: tally.distribution.percentages(),
            distribution: tally.distribution,
            min_multiplier: tally.min,
            max_multiplier: tally.max,
            feature_triggers: tally.triggers,
            includes_features: self.include_features,
        };

        log::info!(
            "simulation done: RTP {:.4}, hit frequency {:.4}, max {:.2}x",
            report.rtp,
            report.hit_frequency,
            report.max_multiplier
        );
        report
    }

    fn tally(&self, range: Range<u64>) -> Tally {
        let mut tally = Tally::new();
        for i in range {
            let (client, server) = simulation_seeds(i);
            let (multiplier, triggered) = if self.include_features {
                let round = self.engine.play_round(&client, &server, i, 1.0, None);
                (round.total_multiplier, round.base.triggered_features)
            } else {
                let outcome = self.engine.spin(&client, &server, i, 1.0, None);
                (outcome.total_multiplier, outcome.triggered_features)
            };

            tally.spins += 1;
            tally.multiplier_sum += multiplier;
            tally.distribution.record(self.thresholds.classify(multiplier));
            tally.min = tally.min.min(multiplier);
            tally.max = tally.max.max(multiplier);
            for event in triggered {
                *tally.triggers.entry(event.feature_type).or_insert(0) += 1;
            }
        }
        tally
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FEATURE ROUNDS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Play `rounds` feature rounds in isolation
    ///
    /// Each round is triggered with the rule's minimum symbol count (3 when
    /// the game has no rule for the feature).
    pub fn simulate_features(
        &self,
        feature: FeatureType,
        rounds: u64,
        bet_amount: f64,
    ) -> FeatureSimulationReport {
        let mut report = FeatureSimulationReport {
            feature_type: feature,
            rounds,
            spins_played: 0,
            retriggers: 0,
            total_multiplier: 0.0,
            average_multiplier: 0.0,
            max_multiplier: 0.0,
            bet_amount,
            total_payout: 0.0,
        };
        if rounds == 0 {
            return report;
        }

        let config = self.engine.config();
        let trigger_count = config
            .trigger_rule(feature)
            .map_or(3, |rule| rule.minimum_count);
        log::info!("simulating {rounds} {feature} rounds (trigger count {trigger_count})");

        let round = round_for(feature);
        let chunks = self.run_chunks(rounds, |range| {
            let mut part = (0u64, 0u64, 0.0f64, 0.0f64);
            for i in range {
                let (client, server) = simulation_seeds(i);
                let ctx = FeatureContext::new(config, &client, &server, i);
                let outcome = round.play(&ctx, trigger_count);
                part.0 += u64::from(outcome.spins_played);
                part.1 += u64::from(outcome.retriggers);
                part.2 += outcome.total_multiplier;
                part.3 = part.3.max(outcome.total_multiplier);
            }
            part
        });

        for (spins, retriggers, total, max) in chunks {
            report.spins_played += spins;
            report.retriggers += retriggers;
            report.total_multiplier += total;
            report.max_multiplier = report.max_multiplier.max(max);
        }
        report.average_multiplier = report.total_multiplier / rounds as f64;
        report.total_payout = report.total_multiplier * bet_amount;
        report
    }

    /// Run `f` over fixed chunks of `0..count`, results in chunk order
    fn run_chunks<T, F>(&self, count: u64, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(Range<u64>) -> T + Sync,
    {
        let chunk_size = self.chunk_size;
        let ranges: Vec<Range<u64>> = (0..count.div_ceil(chunk_size))
            .map(|c| c * chunk_size..((c + 1) * chunk_size).min(count))
            .collect();

        let run = || ranges.par_iter().map(|r| f(r.clone())).collect::<Vec<T>>();

        match self.threads {
            Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    log::warn!("could not build a {n}-thread pool ({e}), using the global pool");
                    run()
                }
            },
            None => run(),
        }
    }
}
