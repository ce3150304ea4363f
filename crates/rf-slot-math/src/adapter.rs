//! Host adapter contract
//!
//! [`GameMath`] is what a math core offers; [`MathAdapter`] is the fixed
//! surface a hosting platform integrates against. [`HostAdapter`] bridges the
//! two for any `GameMath` implementation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GameConfig;
use crate::engine::{Selections, SpinEngine, SpinOutcome};
use crate::features::round_for;
use crate::paytable::{Payline, Paytable};
use crate::symbols::SymbolId;
use crate::validation::{ConfigWarning, ValidationReport, validate};

/// Errors a host request can raise
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Invalid bet amount: {0}")]
    InvalidBet(f64),

    #[error("Failed to parse request: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Host-side adapter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    pub game_name: String,
    pub version: String,
    /// Maximum win as a multiple of the bet
    #[serde(default = "default_max_win")]
    pub max_win_multiplier: f64,
    /// RTP the host expects; a mismatch is reported as a notice
    #[serde(default)]
    pub expected_rtp: Option<f64>,
}

fn default_max_win() -> f64 {
    5000.0
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            game_name: "BOMBAROAT: Tralalero Fury".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            max_win_multiplier: default_max_win(),
            expected_rtp: None,
        }
    }
}

/// Spin request as a host sends it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinRequest {
    pub client_seed: String,
    pub server_seed: String,
    pub nonce: u64,
    pub bet_amount: f64,
    #[serde(default)]
    pub selections: Option<Selections>,
}

impl SpinRequest {
    pub fn new(
        client_seed: impl Into<String>,
        server_seed: impl Into<String>,
        nonce: u64,
        bet_amount: f64,
    ) -> Self {
        Self {
            client_seed: client_seed.into(),
            server_seed: server_seed.into(),
            nonce,
            bet_amount,
            selections: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, AdapterError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Static game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameParameters {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub symbols: Vec<SymbolId>,
    pub target_rtp: f64,
    pub volatility: String,
}

/// Game description for hosts and lobbies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameInfo {
    pub name: String,
    pub version: String,
    pub rtp: f64,
    pub volatility: String,
    pub max_win: f64,
    pub rows: usize,
    pub cols: usize,
    pub paylines: usize,
    pub paying_symbols: usize,
    pub symbols: Vec<SymbolId>,
    pub features: Vec<String>,
}

/// A deterministic math core
pub trait GameMath: Send + Sync {
    fn game_parameters(&self) -> GameParameters;

    fn paytable(&self) -> &Paytable;

    fn paylines(&self) -> &[Payline];

    /// Full configuration, for validation and game info
    fn config(&self) -> &GameConfig;

    fn spin(
        &self,
        client_seed: &str,
        server_seed: &str,
        nonce: u64,
        bet_amount: f64,
        selections: Option<Selections>,
    ) -> SpinOutcome;
}

impl GameMath for SpinEngine {
    fn game_parameters(&self) -> GameParameters {
        let config = self.config();
        GameParameters {
            name: config.name.clone(),
            rows: config.grid.rows,
            cols: config.grid.cols,
            symbols: config.symbols.ids().cloned().collect(),
            target_rtp: config.target_rtp,
            volatility: config.volatility.clone(),
        }
    }

    fn paytable(&self) -> &Paytable {
        &self.config().paytable
    }

    fn paylines(&self) -> &[Payline] {
        &self.config().paylines
    }

    fn config(&self) -> &GameConfig {
        SpinEngine::config(self)
    }

    fn spin(
        &self,
        client_seed: &str,
        server_seed: &str,
        nonce: u64,
        bet_amount: f64,
        selections: Option<Selections>,
    ) -> SpinOutcome {
        SpinEngine::spin(self, client_seed, server_seed, nonce, bet_amount, selections)
    }
}

/// The surface a hosting platform integrates against
pub trait MathAdapter: Send + Sync {
    fn spin(&self, request: SpinRequest) -> Result<SpinOutcome, AdapterError>;

    /// Theoretical RTP
    fn rtp(&self) -> f64;

    /// Maximum win as a multiple of the bet
    fn max_win(&self) -> f64;

    fn game_info(&self) -> GameInfo;

    fn validate_configuration(&self, config: &AdapterConfig) -> ValidationReport;
}

/// [`MathAdapter`] over any [`GameMath`]
pub struct HostAdapter<M: GameMath> {
    math: M,
    config: AdapterConfig,
}

impl<M: GameMath> HostAdapter<M> {
    pub fn new(math: M, config: AdapterConfig) -> Self {
        Self { math, config }
    }

    pub fn math(&self) -> &M {
        &self.math
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }
}

impl HostAdapter<SpinEngine> {
    /// Adapter over the reference game with default settings
    pub fn reference() -> Self {
        Self::new(SpinEngine::reference(), AdapterConfig::default())
    }
}

impl<M: GameMath> MathAdapter for HostAdapter<M> {
    fn spin(&self, request: SpinRequest) -> Result<SpinOutcome, AdapterError> {
        if !request.bet_amount.is_finite() || request.bet_amount < 0.0 {
            return Err(AdapterError::InvalidBet(request.bet_amount));
        }
        Ok(self.math.spin(
            &request.client_seed,
            &request.server_seed,
            request.nonce,
            request.bet_amount,
            request.selections,
        ))
    }

    fn rtp(&self) -> f64 {
        self.math.game_parameters().target_rtp
    }

    fn max_win(&self) -> f64 {
        self.config.max_win_multiplier
    }

    fn game_info(&self) -> GameInfo {
        let params = self.math.game_parameters();
        let config = self.math.config();
        let features = config
            .trigger_rules
            .iter()
            .map(|rule| {
                format!(
                    "{} x{}+ -> {}",
                    rule.symbol_id,
                    rule.minimum_count,
                    round_for(rule.feature_type).description(config)
                )
            })
            .collect();

        GameInfo {
            name: self.config.game_name.clone(),
            version: self.config.version.clone(),
            rtp: params.target_rtp,
            volatility: params.volatility,
            max_win: self.max_win(),
            rows: params.rows,
            cols: params.cols,
            paylines: self.math.paylines().len(),
            paying_symbols: self.math.paytable().len(),
            symbols: params.symbols,
            features,
        }
    }

    fn validate_configuration(&self, config: &AdapterConfig) -> ValidationReport {
        let mut report = validate(self.math.config());
        if let Some(expected) = config.expected_rtp {
            let configured = self.rtp();
            if (expected - configured).abs() > 1e-9 {
                log::warn!("expected RTP {expected} but game is configured for {configured}");
                report.push(ConfigWarning::RtpMismatch {
                    configured,
                    expected,
                });
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_adapter() -> HostAdapter<SpinEngine> {
        HostAdapter::<SpinEngine>::reference()
    }

    #[test]
    fn test_spin_rejects_bad_bets() {
        let adapter = reference_adapter();
        for bet in [-1.0, f64::NAN, f64::INFINITY] {
            let result = adapter.spin(SpinRequest::new("c", "s", 0, bet));
            assert!(matches!(result, Err(AdapterError::InvalidBet(_))));
        }
        assert!(adapter.spin(SpinRequest::new("c", "s", 0, 0.0)).is_ok());
    }

    #[test]
    fn test_spin_matches_engine() {
        let adapter = reference_adapter();
        let outcome = adapter.spin(SpinRequest::new("c", "s", 4, 2.0)).unwrap();
        let direct = SpinEngine::reference().spin("c", "s", 4, 2.0, None);
        assert_eq!(outcome, direct);
    }

    #[test]
    fn test_spin_request_from_json() {
        let request = SpinRequest::from_json(
            r#"{"client_seed":"c","server_seed":"s","nonce":3,"bet_amount":1.5}"#,
        )
        .unwrap();
        assert_eq!(request, SpinRequest::new("c", "s", 3, 1.5));
        assert!(SpinRequest::from_json("{").is_err());
    }

    #[test]
    fn test_game_info() {
        let adapter = reference_adapter();
        let info = adapter.game_info();
        assert_eq!(info.rows, 4);
        assert_eq!(info.cols, 5);
        assert_eq!(info.paylines, 20);
        assert_eq!(info.paying_symbols, 6);
        assert_eq!(info.symbols.len(), 8);
        assert_eq!(info.features.len(), 2);
        assert!((info.rtp - 0.965).abs() < 1e-12);
        assert!((info.max_win - 5000.0).abs() < 1e-12);
    }

    #[test]
    fn test_rtp_mismatch_is_notice() {
        let adapter = reference_adapter();
        let config = AdapterConfig {
            expected_rtp: Some(0.94),
            ..AdapterConfig::default()
        };
        let report = adapter.validate_configuration(&config);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);

        let matching = AdapterConfig {
            expected_rtp: Some(0.965),
            ..AdapterConfig::default()
        };
        assert!(adapter.validate_configuration(&matching).warnings.is_empty());
    }
}
