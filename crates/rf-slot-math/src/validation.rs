//! Configuration warnings and validation
//!
//! Configuration defects never abort a spin. The generator and evaluator
//! fall back (default symbol, skipped line) and report a [`ConfigWarning`];
//! [`validate`] runs every check up front.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::grid::Position;
use crate::symbols::SymbolId;

/// Number of paylines the reference layout is authored with
pub const EXPECTED_PAYLINES: usize = 20;

/// Warning severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational, the game still plays as authored
    Notice,
    /// The game falls back or skips something at runtime
    Defect,
}

/// A non-fatal configuration problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigWarning {
    #[error("No symbol is declared with the wild category")]
    MissingWild,

    #[error("Column {col} has zero total weight, using fallback symbol {fallback}")]
    ZeroWeightColumn { col: usize, fallback: SymbolId },

    #[error("Payline {line_index} has {len} cells, expected {expected}")]
    PaylineLength {
        line_index: usize,
        len: usize,
        expected: usize,
    },

    #[error("Payline {line_index} references out-of-bounds cell {cell:?}")]
    PaylineOutOfBounds { line_index: usize, cell: Position },

    #[error("Paytable symbol {symbol} is not in the symbol catalog")]
    UnknownPaytableSymbol { symbol: SymbolId },

    #[error("Paytable for {symbol} decreases with longer matches")]
    NonMonotonicPaytable { symbol: SymbolId },

    #[error("Paying scatter {symbol:?} does not resolve to a paying scatter symbol")]
    UnresolvedScatter { symbol: Option<SymbolId> },

    #[error("Trigger symbol {symbol} is not in the symbol catalog")]
    UnknownTriggerSymbol { symbol: SymbolId },

    #[error("Fallback symbol {symbol} is not in the symbol catalog")]
    UnknownFallbackSymbol { symbol: SymbolId },

    #[error("Trigger rule for {symbol} has minimum count 0 and fires on every spin")]
    ZeroTriggerMinimum { symbol: SymbolId },

    #[error("Configured {count} paylines, expected {expected}")]
    PaylineCount { count: usize, expected: usize },

    #[error("Configured RTP {configured} differs from expected {expected}")]
    RtpMismatch { configured: f64, expected: f64 },
}

impl ConfigWarning {
    pub fn severity(&self) -> Severity {
        match self {
            Self::PaylineCount { .. }
            | Self::RtpMismatch { .. }
            | Self::ZeroTriggerMinimum { .. } => Severity::Notice,
            _ => Severity::Defect,
        }
    }
}

/// Result of validating a configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when no defect was found
    pub valid: bool,
    pub warnings: Vec<ConfigWarning>,
}

impl ValidationReport {
    pub fn from_warnings(warnings: Vec<ConfigWarning>) -> Self {
        let valid = warnings.iter().all(|w| w.severity() < Severity::Defect);
        Self { valid, warnings }
    }

    /// Add a warning, keeping `valid` in sync
    pub fn push(&mut self, warning: ConfigWarning) {
        if warning.severity() == Severity::Defect {
            self.valid = false;
        }
        self.warnings.push(warning);
    }

    pub fn defects(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.warnings
            .iter()
            .filter(|w| w.severity() == Severity::Defect)
    }
}

/// Check a configuration for every known defect
pub fn validate(config: &GameConfig) -> ValidationReport {
    let mut warnings = Vec::new();
    let catalog = &config.symbols;

    if catalog.wild_id().is_none() {
        warnings.push(ConfigWarning::MissingWild);
    }

    for col in 0..config.grid.cols {
        if config.weights.total(col) == 0 {
            warnings.push(ConfigWarning::ZeroWeightColumn {
                col,
                fallback: config.fallback_symbol.clone(),
            });
        }
    }

    for (line_index, line) in config.paylines.iter().enumerate() {
        if line.len() != config.grid.cols {
            warnings.push(ConfigWarning::PaylineLength {
                line_index,
                len: line.len(),
                expected: config.grid.cols,
            });
        }
        if let Some(&cell) = line
            .cells
            .iter()
            .find(|&&(r, c)| r >= config.grid.rows || c >= config.grid.cols)
        {
            warnings.push(ConfigWarning::PaylineOutOfBounds { line_index, cell });
        }
    }
    if config.paylines.len() != EXPECTED_PAYLINES {
        warnings.push(ConfigWarning::PaylineCount {
            count: config.paylines.len(),
            expected: EXPECTED_PAYLINES,
        });
    }

    for symbol in config.paytable.symbols() {
        if !catalog.contains(symbol.as_str()) {
            warnings.push(ConfigWarning::UnknownPaytableSymbol {
                symbol: symbol.clone(),
            });
        }
    }
    for symbol in config.paytable.non_monotonic_symbols() {
        warnings.push(ConfigWarning::NonMonotonicPaytable {
            symbol: symbol.clone(),
        });
    }

    let scatter = config.paying_scatter();
    let scatter_ok = scatter
        .and_then(|s| catalog.category(s.as_str()))
        .is_some_and(|cat| cat.pays_as_scatter());
    if !scatter_ok {
        warnings.push(ConfigWarning::UnresolvedScatter {
            symbol: scatter.cloned(),
        });
    }

    for rule in &config.trigger_rules {
        if !catalog.contains(rule.symbol_id.as_str()) {
            warnings.push(ConfigWarning::UnknownTriggerSymbol {
                symbol: rule.symbol_id.clone(),
            });
        }
        if rule.minimum_count == 0 {
            warnings.push(ConfigWarning::ZeroTriggerMinimum {
                symbol: rule.symbol_id.clone(),
            });
        }
    }

    if !catalog.contains(config.fallback_symbol.as_str()) {
        warnings.push(ConfigWarning::UnknownFallbackSymbol {
            symbol: config.fallback_symbol.clone(),
        });
    }

    let report = ValidationReport::from_warnings(warnings);
    for warning in &report.warnings {
        log::debug!("config '{}': {}", config.name, warning);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::Payline;
    use crate::symbols::{SymbolCategory, SymbolDefinition};

    #[test]
    fn test_reference_config_is_valid() {
        let report = validate(&GameConfig::reference());
        assert!(report.valid, "{:?}", report.warnings);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_missing_wild_is_defect() {
        let mut config = GameConfig::reference();
        for def in &mut config.symbols.symbols {
            if def.category == SymbolCategory::Wild {
                def.category = SymbolCategory::High;
            }
        }
        let report = validate(&config);
        assert!(!report.valid);
        assert!(report.warnings.contains(&ConfigWarning::MissingWild));
    }

    #[test]
    fn test_zero_weight_column_is_defect() {
        let mut config = GameConfig::reference();
        config.weights.set_column(2, &[("H1", 0), ("L1", 0)]);
        let report = validate(&config);
        assert!(!report.valid);
        assert!(matches!(
            report.defects().next(),
            Some(ConfigWarning::ZeroWeightColumn { col: 2, .. })
        ));
    }

    #[test]
    fn test_payline_problems() {
        let mut config = GameConfig::reference();
        config.paylines.push(Payline::new(vec![(0, 0), (0, 1)]));
        config.paylines.push(Payline::from_rows(&[0, 0, 9, 0, 0]));
        let report = validate(&config);
        assert!(!report.valid);
        assert!(report.warnings.contains(&ConfigWarning::PaylineLength {
            line_index: 20,
            len: 2,
            expected: 5
        }));
        assert!(report.warnings.contains(&ConfigWarning::PaylineOutOfBounds {
            line_index: 21,
            cell: (9, 2)
        }));
        assert!(report.warnings.contains(&ConfigWarning::PaylineCount {
            count: 22,
            expected: 20
        }));
    }

    #[test]
    fn test_payline_count_alone_is_notice() {
        let mut config = GameConfig::reference();
        config.paylines.truncate(10);
        let report = validate(&config);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].severity(), Severity::Notice);
    }

    #[test]
    fn test_unknown_symbols_are_defects() {
        let mut config = GameConfig::reference();
        config.paytable = config.paytable.with_symbol("GHOST", &[(3, 1.0)]);
        config.fallback_symbol = "NOPE".into();
        config.trigger_rules[0].symbol_id = "MISSING".into();
        let report = validate(&config);
        assert!(!report.valid);
        assert_eq!(report.defects().count(), 3);
    }

    #[test]
    fn test_unresolved_scatter() {
        let mut config = GameConfig::reference();
        config.scatter_symbol = None;
        config.symbols.symbols.retain(|s| s.category != SymbolCategory::ScatterMultiplier);
        config
            .symbols
            .symbols
            .push(SymbolDefinition::new("SCATTER_MULT", "Lirili Larila", SymbolCategory::Low));
        let report = validate(&config);
        assert!(report
            .warnings
            .contains(&ConfigWarning::UnresolvedScatter { symbol: None }));
    }

    #[test]
    fn test_feature_scatter_cannot_be_paying_scatter() {
        let mut config = GameConfig::reference();
        config.scatter_symbol = Some("SCATTER_FS".into());
        let report = validate(&config);
        assert!(!report.valid);
        assert_eq!(
            report.warnings,
            vec![ConfigWarning::UnresolvedScatter {
                symbol: Some("SCATTER_FS".into())
            }]
        );

        config.scatter_symbol = Some("M1".into());
        assert!(validate(&config).valid);
    }

    #[test]
    fn test_zero_trigger_minimum_is_notice() {
        let mut config = GameConfig::reference();
        config.trigger_rules[0].minimum_count = 0;
        let report = validate(&config);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(
            report.warnings[0],
            ConfigWarning::ZeroTriggerMinimum { .. }
        ));
        assert_eq!(report.warnings[0].severity(), Severity::Notice);
    }

    #[test]
    fn test_non_monotonic_paytable() {
        let mut config = GameConfig::reference();
        config.paytable = config
            .paytable
            .with_symbol("M1", &[(3, 0.5), (4, 0.2), (5, 0.5)]);
        let report = validate(&config);
        assert_eq!(
            report.warnings,
            vec![ConfigWarning::NonMonotonicPaytable { symbol: "M1".into() }]
        );
    }
}
