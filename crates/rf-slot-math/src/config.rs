//! Game configuration
//!
//! A [`GameConfig`] is built once (in code or from a JSON/YAML file) and is
//! read-only afterwards. Engines share it behind an `Arc`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::paytable::{Payline, Paytable, reference_20_paylines};
use crate::symbols::{SymbolCatalog, SymbolCategory, SymbolDefinition, SymbolId};
use crate::triggers::{FeatureType, TriggerRule};

/// Errors raised while loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Grid specification (rows × columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of visible rows
    pub rows: usize,
    /// Number of columns (reels)
    pub cols: usize,
}

impl GridSpec {
    /// 4 rows × 5 columns
    pub fn standard_4x5() -> Self {
        Self { rows: 4, cols: 5 }
    }

    /// Total grid positions
    pub fn total_positions(&self) -> usize {
        self.rows * self.cols
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_4x5()
    }
}

/// Per-column symbol weights
///
/// Each column maps symbol → weight. `BTreeMap` keeps iteration sorted by
/// symbol id, which is the order weighted sampling walks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolWeights {
    pub columns: Vec<BTreeMap<SymbolId, u32>>,
}

impl SymbolWeights {
    /// Same weight table on every column
    pub fn uniform(cols: usize, weights: &[(&str, u32)]) -> Self {
        let column: BTreeMap<SymbolId, u32> = weights
            .iter()
            .map(|&(id, w)| (SymbolId::new(id), w))
            .collect();
        Self {
            columns: vec![column; cols],
        }
    }

    /// Weight table of a column
    pub fn column(&self, col: usize) -> Option<&BTreeMap<SymbolId, u32>> {
        self.columns.get(col)
    }

    /// Replace one column's weights
    pub fn set_column(&mut self, col: usize, weights: &[(&str, u32)]) {
        if col >= self.columns.len() {
            self.columns.resize(col + 1, BTreeMap::new());
        }
        self.columns[col] = weights
            .iter()
            .map(|&(id, w)| (SymbolId::new(id), w))
            .collect();
    }

    /// Sum of weights in a column (0 for a missing column)
    pub fn total(&self, col: usize) -> u64 {
        self.column(col)
            .map(|c| c.values().map(|&w| u64::from(w)).sum())
            .unwrap_or(0)
    }
}

/// Free spins feature configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSpinsConfig {
    /// Spins awarded per trigger-symbol count
    pub spins_by_count: BTreeMap<u8, u32>,
    /// Can retrigger during feature
    pub can_retrigger: bool,
    /// Maximum number of retriggers per feature round
    pub max_retriggers: u32,
    /// Symbols eligible for transformation
    pub transformation_symbols: Vec<SymbolId>,
    /// Symbol they transform into
    pub transformation_target: SymbolId,
    /// Minimum transformations per free spin
    pub min_transformations: u32,
    /// Maximum transformations per free spin
    pub max_transformations: u32,
}

impl Default for FreeSpinsConfig {
    fn default() -> Self {
        Self {
            spins_by_count: [(3, 10), (4, 12), (5, 15)].into_iter().collect(),
            can_retrigger: true,
            max_retriggers: 3,
            transformation_symbols: vec!["M1".into(), "M2".into(), "L1".into()],
            transformation_target: "H1".into(),
            min_transformations: 1,
            max_transformations: 3,
        }
    }
}

impl FreeSpinsConfig {
    /// Spins for a trigger count; counts above the table use the largest entry
    pub fn spins_for(&self, count: usize) -> u32 {
        if let Some(&spins) = u8::try_from(count)
            .ok()
            .and_then(|c| self.spins_by_count.get(&c))
        {
            return spins;
        }
        match self.spins_by_count.last_key_value() {
            Some((&max_count, &spins)) if count > usize::from(max_count) => spins,
            _ => 0,
        }
    }
}

/// How the bonus round places wilds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildMode {
    /// Inject a random number of wilds into non-wild cells
    AddRandomWilds,
    /// Turn every column holding a wild into a full wild column
    ExpandExistingWilds,
}

/// Bonus round feature configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusRoundConfig {
    /// Bonus spins per round
    pub num_spins: u32,
    /// Wild placement mode
    pub wild_mode: WildMode,
    /// Minimum wilds injected per spin (`AddRandomWilds`)
    pub min_wilds: u32,
    /// Maximum wilds injected per spin (`AddRandomWilds`)
    pub max_wilds: u32,
}

impl Default for BonusRoundConfig {
    fn default() -> Self {
        Self {
            num_spins: 5,
            wild_mode: WildMode::AddRandomWilds,
            min_wilds: 2,
            max_wilds: 4,
        }
    }
}

fn default_target_rtp() -> f64 {
    0.965
}

/// Complete, immutable game definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game name
    pub name: String,
    /// Grid dimensions
    pub grid: GridSpec,
    /// Symbol catalog
    pub symbols: SymbolCatalog,
    /// Paytable
    pub paytable: Paytable,
    /// Paylines, kept exactly as authored
    pub paylines: Vec<Payline>,
    /// Per-column symbol weights
    pub weights: SymbolWeights,
    /// Feature trigger rules
    #[serde(default)]
    pub trigger_rules: Vec<TriggerRule>,
    /// Symbol used when a column cannot be sampled
    pub fallback_symbol: SymbolId,
    /// Paying scatter (defaults to the first `scatter_multiplier` symbol)
    #[serde(default)]
    pub scatter_symbol: Option<SymbolId>,
    #[serde(default)]
    pub free_spins: FreeSpinsConfig,
    #[serde(default)]
    pub bonus_round: BonusRoundConfig,
    /// Theoretical RTP (0.965 = 96.5%)
    #[serde(default = "default_target_rtp")]
    pub target_rtp: f64,
    /// Volatility label
    #[serde(default)]
    pub volatility: String,
}

impl GameConfig {
    /// Reference 4×5, 20-line game
    pub fn reference() -> Self {
        let symbols = SymbolCatalog::new(vec![
            SymbolDefinition::new("H1", "Brainroat", SymbolCategory::High),
            SymbolDefinition::new("WILD", "Crocodrillo", SymbolCategory::Wild),
            SymbolDefinition::new("BONUS", "Bombardino", SymbolCategory::ScatterFeatureB),
            SymbolDefinition::new("SCATTER_FS", "Tralalero", SymbolCategory::ScatterFeatureA),
            SymbolDefinition::new(
                "SCATTER_MULT",
                "Lirili Larila",
                SymbolCategory::ScatterMultiplier,
            ),
            SymbolDefinition::new("M1", "Flying Spaghetti", SymbolCategory::Medium),
            SymbolDefinition::new("M2", "Cursed Espresso", SymbolCategory::Medium),
            SymbolDefinition::new("L1", "Opera Mask", SymbolCategory::Low),
        ]);

        let paytable = Paytable::new()
            .with_symbol("H1", &[(3, 1.0), (4, 2.0), (5, 5.0)])
            .with_symbol("WILD", &[(3, 0.1), (4, 0.5), (5, 1.0)])
            .with_symbol("M1", &[(3, 0.1), (4, 0.2), (5, 0.5)])
            .with_symbol("M2", &[(3, 0.1), (4, 0.2), (5, 0.5)])
            .with_symbol("L1", &[(3, 0.01), (4, 0.05), (5, 0.2)])
            .with_symbol("SCATTER_MULT", &[(3, 0.01), (4, 0.02), (5, 0.1)]);

        let grid = GridSpec::standard_4x5();
        let weights = SymbolWeights::uniform(
            grid.cols,
            &[
                ("H1", 1),
                ("WILD", 1),
                ("BONUS", 1),
                ("SCATTER_FS", 1),
                ("SCATTER_MULT", 1),
                ("M1", 2),
                ("M2", 2),
                ("L1", 200),
            ],
        );

        Self {
            name: "BOMBAROAT: Tralalero Fury".into(),
            grid,
            symbols,
            paytable,
            paylines: reference_20_paylines(),
            weights,
            trigger_rules: vec![
                TriggerRule::new("SCATTER_FS", 3, FeatureType::FreeSpins),
                TriggerRule::new("BONUS", 3, FeatureType::BonusRound),
            ],
            fallback_symbol: "L1".into(),
            scatter_symbol: Some("SCATTER_MULT".into()),
            free_spins: FreeSpinsConfig::default(),
            bonus_round: BonusRoundConfig::default(),
            target_rtp: default_target_rtp(),
            volatility: "Medium-High".into(),
        }
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Export as pretty JSON
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Wild symbol, by category
    pub fn wild_id(&self) -> Option<&SymbolId> {
        self.symbols.wild_id()
    }

    /// The scatter that pays directly by count
    pub fn paying_scatter(&self) -> Option<&SymbolId> {
        self.scatter_symbol
            .as_ref()
            .or_else(|| self.symbols.first_of(SymbolCategory::ScatterMultiplier))
    }

    /// First trigger rule for a feature type
    pub fn trigger_rule(&self, feature: FeatureType) -> Option<&TriggerRule> {
        self.trigger_rules.iter().find(|r| r.feature_type == feature)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::reference()
    }
}
