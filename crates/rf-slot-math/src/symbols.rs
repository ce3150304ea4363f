//! Symbol definitions and the symbol catalog

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Symbol identifier as used on the grid, in the paytable and in weight tables
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub String);

impl SymbolId {
    /// Create a new symbol ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SymbolId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SymbolId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for SymbolId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Symbol category classification
///
/// The category alone decides wild substitution and scatter behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolCategory {
    /// High paying
    High,
    /// Medium paying
    Medium,
    /// Low paying
    Low,
    /// Wild - substitutes on paylines
    Wild,
    /// Free spins trigger scatter
    ScatterFeatureA,
    /// Bonus round trigger symbol
    ScatterFeatureB,
    /// Scatter that pays directly by count anywhere on the grid
    ScatterMultiplier,
}

impl SymbolCategory {
    /// Can this symbol be paid by count as the paying scatter?
    /// Feature-trigger scatters only ever start features.
    pub fn pays_as_scatter(&self) -> bool {
        !matches!(self, Self::ScatterFeatureA | Self::ScatterFeatureB)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Wild => "Wild",
            Self::ScatterFeatureA => "Free Spins Scatter",
            Self::ScatterFeatureB => "Bonus Symbol",
            Self::ScatterMultiplier => "Paying Scatter",
        }
    }
}

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDefinition {
    /// Unique symbol ID (e.g., "H1", "WILD", "SCATTER_FS")
    pub id: SymbolId,
    /// Name shown to players
    pub display_name: String,
    /// Symbol category
    pub category: SymbolCategory,
}

impl SymbolDefinition {
    pub fn new(
        id: impl Into<SymbolId>,
        display_name: impl Into<String>,
        category: SymbolCategory,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            category,
        }
    }
}

/// Ordered set of symbol definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolCatalog {
    pub symbols: Vec<SymbolDefinition>,
}

impl SymbolCatalog {
    pub fn new(symbols: Vec<SymbolDefinition>) -> Self {
        Self { symbols }
    }

    /// Get symbol by ID
    pub fn get(&self, id: &str) -> Option<&SymbolDefinition> {
        self.symbols.iter().find(|s| s.id.as_str() == id)
    }

    /// Check whether an ID is defined
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Category of a symbol, if defined
    pub fn category(&self, id: &str) -> Option<SymbolCategory> {
        self.get(id).map(|s| s.category)
    }

    /// Get wild symbol ID (first symbol declared with the wild category)
    pub fn wild_id(&self) -> Option<&SymbolId> {
        self.first_of(SymbolCategory::Wild)
    }

    /// First symbol of a category, in declaration order
    pub fn first_of(&self, category: SymbolCategory) -> Option<&SymbolId> {
        self.symbols
            .iter()
            .find(|s| s.category == category)
            .map(|s| &s.id)
    }

    /// All symbol IDs of a category
    pub fn ids_of(&self, category: SymbolCategory) -> Vec<&SymbolId> {
        self.symbols
            .iter()
            .filter(|s| s.category == category)
            .map(|s| &s.id)
            .collect()
    }

    /// All symbol IDs in declaration order
    pub fn ids(&self) -> impl Iterator<Item = &SymbolId> {
        self.symbols.iter().map(|s| &s.id)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SymbolCatalog {
        SymbolCatalog::new(vec![
            SymbolDefinition::new("H1", "Brainroat", SymbolCategory::High),
            SymbolDefinition::new("WILD", "Crocodrillo", SymbolCategory::Wild),
            SymbolDefinition::new("SCATTER_FS", "Tralalero", SymbolCategory::ScatterFeatureA),
            SymbolDefinition::new("L1", "Opera Mask", SymbolCategory::Low),
        ])
    }

    #[test]
    fn test_wild_by_category() {
        let catalog = catalog();
        assert_eq!(catalog.wild_id().map(SymbolId::as_str), Some("WILD"));
    }

    #[test]
    fn test_wild_never_inferred_from_name() {
        let catalog = SymbolCatalog::new(vec![SymbolDefinition::new(
            "WILD",
            "Wild Croc",
            SymbolCategory::High,
        )]);
        assert!(catalog.wild_id().is_none());
    }

    #[test]
    fn test_category_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.category("L1"), Some(SymbolCategory::Low));
        assert!(catalog.category("M9").is_none());
        assert!(SymbolCategory::ScatterMultiplier.pays_as_scatter());
        assert!(!SymbolCategory::ScatterFeatureB.pays_as_scatter());
    }

    #[test]
    fn test_symbol_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&SymbolId::new("H1")).unwrap();
        assert_eq!(json, "\"H1\"");
        let cat: SymbolCategory = serde_json::from_str("\"scatter_feature_b\"").unwrap();
        assert_eq!(cat, SymbolCategory::ScatterFeatureB);
    }
}
