//! Spin orchestrator
//!
//! Composes generator → evaluator → trigger detector into one outcome.
//! The engine holds nothing but the shared configuration, so a single
//! instance can serve any number of threads.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::evaluator::{WinEntry, evaluate};
use crate::features::{FeatureContext, FeatureRoundOutcome, play_feature};
use crate::generator::generate;
use crate::grid::Grid;
use crate::triggers::{FeatureEvent, detect_triggers};
use crate::validation::ConfigWarning;

/// Opaque player selections, echoed back unmodified
pub type Selections = BTreeMap<String, serde_json::Value>;

/// Result of a single base spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub grid: Grid,
    pub line_wins: Vec<WinEntry>,
    pub scatter_wins: Vec<WinEntry>,
    /// Line + scatter multiplier of the bet
    pub total_multiplier: f64,
    pub triggered_features: Vec<FeatureEvent>,
    pub nonce: u64,
    pub next_nonce: u64,
    pub bet_amount: f64,
    pub payout_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selections: Option<Selections>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ConfigWarning>,
}

impl SpinOutcome {
    pub fn is_win(&self) -> bool {
        self.total_multiplier > 0.0
    }

    pub fn win_count(&self) -> usize {
        self.line_wins.len() + self.scatter_wins.len()
    }
}

/// Base spin plus every feature round it triggered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub base: SpinOutcome,
    pub features: Vec<FeatureRoundOutcome>,
    /// Base and feature multipliers combined
    pub total_multiplier: f64,
    pub payout_amount: f64,
}

/// Deterministic spin engine
#[derive(Debug, Clone)]
pub struct SpinEngine {
    config: Arc<GameConfig>,
}

impl SpinEngine {
    pub fn new(config: Arc<GameConfig>) -> Self {
        Self { config }
    }

    pub fn from_config(config: GameConfig) -> Self {
        Self::new(Arc::new(config))
    }

    /// Engine over the reference game
    pub fn reference() -> Self {
        Self::from_config(GameConfig::reference())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn shared_config(&self) -> Arc<GameConfig> {
        Arc::clone(&self.config)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Play one base spin
    ///
    /// `bet_amount` only scales `payout_amount`; it never reaches symbol
    /// selection or evaluation. The caller owns nonce monotonicity.
    pub fn spin(
        &self,
        client_seed: &str,
        server_seed: &str,
        nonce: u64,
        bet_amount: f64,
        selections: Option<Selections>,
    ) -> SpinOutcome {
        let config = &*self.config;
        let generated = generate(
            client_seed,
            server_seed,
            nonce,
            &config.weights,
            config.grid.rows,
            config.grid.cols,
            &config.fallback_symbol,
        );

        let evaluation = evaluate(&generated.grid, config);
        let triggered_features = detect_triggers(&generated.grid, &config.trigger_rules);

        let mut warnings = generated.warnings;
        warnings.extend(evaluation.warnings);

        SpinOutcome {
            grid: generated.grid,
            line_wins: evaluation.line_wins,
            scatter_wins: evaluation.scatter_wins,
            total_multiplier: evaluation.total_multiplier,
            triggered_features,
            nonce,
            next_nonce: nonce.wrapping_add(1),
            bet_amount,
            payout_amount: evaluation.total_multiplier * bet_amount,
            selections,
            warnings,
        }
    }

    /// Base spin followed by one feature round per triggered feature
    pub fn play_round(
        &self,
        client_seed: &str,
        server_seed: &str,
        nonce: u64,
        bet_amount: f64,
        selections: Option<Selections>,
    ) -> RoundOutcome {
        let base = self.spin(client_seed, server_seed, nonce, bet_amount, selections);
        let ctx = FeatureContext::new(&self.config, client_seed, server_seed, nonce);

        let features: Vec<FeatureRoundOutcome> = base
            .triggered_features
            .iter()
            .map(|event| play_feature(&ctx, event))
            .collect();

        let total_multiplier =
            base.total_multiplier + features.iter().map(|f| f.total_multiplier).sum::<f64>();

        RoundOutcome {
            payout_amount: total_multiplier * bet_amount,
            total_multiplier,
            features,
            base,
        }
    }
}
