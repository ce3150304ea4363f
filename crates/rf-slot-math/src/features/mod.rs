//! Bonus features layered on the base spin
//!
//! Each feature plays a sequence of auxiliary spins. An auxiliary grid comes
//! from the same generator with a derived server seed, goes through a pure
//! transform, and is scored by the unchanged evaluator.
//!
//! ## Architecture
//!
//! ```text
//! FeatureEvent ──> round_for(FeatureType)
//!                      │
//!                      ├── FreeSpinsRound  (symbol transformation, retriggers)
//!                      └── BonusRound      (wild injection / expansion)
//!                            │
//!                            v
//!                  FeatureRoundOutcome
//! ```

mod bonus;
mod free_spins;
mod transform;

pub use bonus::*;
pub use free_spins::*;
pub use transform::*;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::GameConfig;
use crate::evaluator::{WinEntry, evaluate};
use crate::generator::{Generated, generate};
use crate::grid::Grid;
use crate::triggers::{FeatureEvent, FeatureType};
use crate::validation::ConfigWarning;

/// Seeds and configuration shared by every spin of a feature round
#[derive(Debug, Clone, Copy)]
pub struct FeatureContext<'a> {
    pub config: &'a GameConfig,
    pub client_seed: &'a str,
    pub server_seed: &'a str,
    pub nonce: u64,
}

impl<'a> FeatureContext<'a> {
    pub fn new(
        config: &'a GameConfig,
        client_seed: &'a str,
        server_seed: &'a str,
        nonce: u64,
    ) -> Self {
        Self {
            config,
            client_seed,
            server_seed,
            nonce,
        }
    }

    /// Server seed of the `index`-th auxiliary spin
    pub fn spin_seed(&self, feature: FeatureType, index: u32) -> String {
        format!("{}/{}/{}", self.server_seed, feature, index)
    }

    /// Random source for the feature's transforms
    pub fn rng(&self, feature: FeatureType) -> ChaCha8Rng {
        let mut hasher = Sha256::new();
        hasher.update(
            format!(
                "{}-{}-{}-{}",
                self.server_seed, self.client_seed, self.nonce, feature
            )
            .as_bytes(),
        );
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&hasher.finalize());
        ChaCha8Rng::from_seed(seed)
    }

    /// Auxiliary grid of the `index`-th feature spin
    pub fn generate(&self, feature: FeatureType, index: u32) -> Generated {
        let config = self.config;
        generate(
            self.client_seed,
            &self.spin_seed(feature, index),
            self.nonce,
            &config.weights,
            config.grid.rows,
            config.grid.cols,
            &config.fallback_symbol,
        )
    }
}

/// One auxiliary spin inside a feature round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpin {
    pub index: u32,
    /// Grid after the feature transform
    pub grid: Grid,
    /// Cells changed by the transform
    pub transformed_cells: usize,
    pub line_wins: Vec<WinEntry>,
    pub scatter_wins: Vec<WinEntry>,
    pub multiplier: f64,
    /// Extra spins awarded by this spin
    #[serde(default)]
    pub retrigger_spins: u32,
}

/// Result of a whole feature round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRoundOutcome {
    pub feature_type: FeatureType,
    pub trigger_count: usize,
    /// Spins awarded in total, retriggers included
    pub spins_awarded: u32,
    pub spins_played: u32,
    pub retriggers: u32,
    pub spins: Vec<FeatureSpin>,
    pub total_multiplier: f64,
    pub warnings: Vec<ConfigWarning>,
}

impl FeatureRoundOutcome {
    pub fn new(feature_type: FeatureType, trigger_count: usize) -> Self {
        Self {
            feature_type,
            trigger_count,
            spins_awarded: 0,
            spins_played: 0,
            retriggers: 0,
            spins: Vec::new(),
            total_multiplier: 0.0,
            warnings: Vec::new(),
        }
    }

    /// Score a transformed grid and record it as the next spin
    pub fn record_spin(
        &mut self,
        config: &GameConfig,
        index: u32,
        grid: Grid,
        transformed_cells: usize,
        retrigger_spins: u32,
    ) {
        let evaluation = evaluate(&grid, config);
        self.merge_warnings(evaluation.warnings);
        self.total_multiplier += evaluation.total_multiplier;
        self.spins_played += 1;
        self.spins.push(FeatureSpin {
            index,
            grid,
            transformed_cells,
            line_wins: evaluation.line_wins,
            scatter_wins: evaluation.scatter_wins,
            multiplier: evaluation.total_multiplier,
            retrigger_spins,
        });
    }

    /// Keep one copy of each warning across the round
    pub fn merge_warnings(&mut self, warnings: Vec<ConfigWarning>) {
        for warning in warnings {
            if !self.warnings.contains(&warning) {
                self.warnings.push(warning);
            }
        }
    }
}

/// A playable bonus feature
pub trait FeatureRound: Send + Sync {
    fn feature_type(&self) -> FeatureType;

    /// Human-readable feature name
    fn name(&self) -> &str;

    /// One-line description for game info
    fn description(&self, config: &GameConfig) -> String;

    /// Play the whole round for a trigger of `trigger_count` symbols
    fn play(&self, ctx: &FeatureContext<'_>, trigger_count: usize) -> FeatureRoundOutcome;
}

/// Round implementation for a feature type
pub fn round_for(feature: FeatureType) -> Box<dyn FeatureRound> {
    match feature {
        FeatureType::FreeSpins => Box::new(FreeSpinsRound),
        FeatureType::BonusRound => Box::new(BonusRound),
    }
}

/// Play the feature an event asks for
pub fn play_feature(ctx: &FeatureContext<'_>, event: &FeatureEvent) -> FeatureRoundOutcome {
    let outcome = round_for(event.feature_type).play(ctx, event.count);
    log::debug!(
        "{} round: {} spins, {} retriggers, {:.2}x",
        outcome.feature_type,
        outcome.spins_played,
        outcome.retriggers,
        outcome.total_multiplier
    );
    outcome
}
