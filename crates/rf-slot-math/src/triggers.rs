//! Feature trigger detection

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::symbols::SymbolId;

/// Bonus feature kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    FreeSpins,
    BonusRound,
}

impl FeatureType {
    pub const ALL: [FeatureType; 2] = [Self::FreeSpins, Self::BonusRound];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FreeSpins => "free_spins",
            Self::BonusRound => "bonus_round",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// "`minimum_count` or more of `symbol_id` anywhere triggers `feature_type`"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRule {
    pub symbol_id: SymbolId,
    pub minimum_count: usize,
    pub feature_type: FeatureType,
}

impl TriggerRule {
    pub fn new(
        symbol_id: impl Into<SymbolId>,
        minimum_count: usize,
        feature_type: FeatureType,
    ) -> Self {
        Self {
            symbol_id: symbol_id.into(),
            minimum_count,
            feature_type,
        }
    }

    /// Does `count` symbols satisfy this rule?
    ///
    /// A `minimum_count` of 0 fires on every grid; [`crate::validate`]
    /// reports such rules.
    pub fn is_met(&self, count: usize) -> bool {
        count >= self.minimum_count
    }
}

/// A triggered feature with the actual symbol count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureEvent {
    pub feature_type: FeatureType,
    pub symbol_id: SymbolId,
    pub count: usize,
}

/// One event per satisfied rule, in rule order
pub fn detect_triggers(grid: &Grid, rules: &[TriggerRule]) -> Vec<FeatureEvent> {
    rules
        .iter()
        .filter_map(|rule| {
            let count = grid.count(rule.symbol_id.as_str());
            rule.is_met(count).then(|| FeatureEvent {
                feature_type: rule.feature_type,
                symbol_id: rule.symbol_id.clone(),
                count,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Vec<TriggerRule> {
        vec![
            TriggerRule::new("SCATTER_FS", 3, FeatureType::FreeSpins),
            TriggerRule::new("BONUS", 3, FeatureType::BonusRound),
        ]
    }

    #[test]
    fn test_count_is_not_capped() {
        let grid = Grid::from_rows(&[
            &["SCATTER_FS", "L1", "SCATTER_FS"],
            &["L1", "SCATTER_FS", "L1"],
            &["SCATTER_FS", "L1", "L1"],
        ]);
        let events = detect_triggers(&grid, &rules());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].feature_type, FeatureType::FreeSpins);
        assert_eq!(events[0].count, 4);
    }

    #[test]
    fn test_two_features_same_grid() {
        let grid = Grid::from_rows(&[
            &["SCATTER_FS", "BONUS", "SCATTER_FS"],
            &["BONUS", "SCATTER_FS", "BONUS"],
        ]);
        let events = detect_triggers(&grid, &rules());
        let kinds: Vec<_> = events.iter().map(|e| e.feature_type).collect();
        assert_eq!(kinds, vec![FeatureType::FreeSpins, FeatureType::BonusRound]);
    }

    #[test]
    fn test_below_minimum() {
        let grid = Grid::from_rows(&[&["SCATTER_FS", "BONUS", "SCATTER_FS"]]);
        assert!(detect_triggers(&grid, &rules()).is_empty());
    }

    #[test]
    fn test_zero_minimum_always_fires() {
        let rule = TriggerRule::new("BONUS", 0, FeatureType::BonusRound);
        assert!(rule.is_met(0));
        assert!(rule.is_met(1));

        let grid = Grid::from_rows(&[&["H1", "L1", "M1"]]);
        let events = detect_triggers(&grid, &[rule]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].count, 0);
    }

    #[test]
    fn test_feature_type_display() {
        assert_eq!(FeatureType::BonusRound.to_string(), "bonus_round");
        let parsed: FeatureType = serde_json::from_str("\"free_spins\"").unwrap();
        assert_eq!(parsed, FeatureType::FreeSpins);
    }
}
