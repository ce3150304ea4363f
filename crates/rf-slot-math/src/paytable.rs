//! Paytable and payline definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grid::Position;
use crate::symbols::SymbolId;

/// Symbol → match count → payout multiplier (of the total bet)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Paytable {
    pub entries: BTreeMap<SymbolId, BTreeMap<u8, f64>>,
}

impl Paytable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add pays for one symbol as `(count, multiplier)` pairs
    pub fn with_symbol(mut self, symbol: impl Into<SymbolId>, pays: &[(u8, f64)]) -> Self {
        self.entries
            .insert(symbol.into(), pays.iter().copied().collect());
        self
    }

    /// Does the symbol have any paytable entry?
    pub fn pays_for(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    /// Multiplier for `count` matches of `symbol`; `None` means non-paying
    pub fn pay(&self, symbol: &str, count: usize) -> Option<f64> {
        let count = u8::try_from(count).ok()?;
        self.entries.get(symbol)?.get(&count).copied()
    }

    /// Highest configured multiplier for a symbol
    pub fn max_pay(&self, symbol: &str) -> f64 {
        self.entries
            .get(symbol)
            .map(|pays| pays.values().copied().fold(0.0, f64::max))
            .unwrap_or(0.0)
    }

    /// Symbols whose pays decrease as the match count grows
    pub fn non_monotonic_symbols(&self) -> Vec<&SymbolId> {
        self.entries
            .iter()
            .filter(|(_, pays)| {
                pays.values()
                    .zip(pays.values().skip(1))
                    .any(|(shorter, longer)| longer < shorter)
            })
            .map(|(symbol, _)| symbol)
            .collect()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &SymbolId> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A payline: one `(row, col)` cell per column, left to right
///
/// Cells are kept exactly as authored. A line may visit the same cell
/// twice and that cell then counts twice toward the streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payline {
    pub cells: Vec<Position>,
}

impl Payline {
    pub fn new(cells: Vec<Position>) -> Self {
        Self { cells }
    }

    /// Create a straight line (same row across all columns)
    pub fn straight(row: usize, cols: usize) -> Self {
        Self {
            cells: (0..cols).map(|col| (row, col)).collect(),
        }
    }

    /// Build from the row visited in each column
    pub fn from_rows(rows: &[usize]) -> Self {
        Self {
            cells: rows.iter().copied().enumerate().map(|(col, row)| (row, col)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells inside a `rows × cols` grid?
    pub fn in_bounds(&self, rows: usize, cols: usize) -> bool {
        self.cells.iter().all(|&(r, c)| r < rows && c < cols)
    }
}

/// The 20 fixed paylines of the reference 4×5 game
pub fn reference_20_paylines() -> Vec<Payline> {
    let lines: [[Position; 5]; 20] = [
        // Horizontal
        [(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)],
        [(1, 0), (1, 1), (1, 2), (1, 3), (1, 4)],
        [(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)],
        [(3, 0), (3, 1), (3, 2), (3, 3), (3, 4)],
        // Diagonal
        [(0, 0), (1, 1), (2, 2), (3, 3), (3, 4)],
        [(3, 0), (2, 1), (1, 2), (0, 3), (0, 4)],
        // V shapes
        [(0, 0), (1, 1), (2, 2), (1, 3), (0, 4)],
        [(3, 0), (2, 1), (1, 2), (2, 3), (3, 4)],
        [(0, 1), (1, 2), (2, 3), (1, 2), (0, 1)],
        [(1, 0), (2, 1), (3, 2), (2, 3), (1, 4)],
        // Z / N shapes
        [(0, 0), (0, 1), (1, 2), (2, 3), (2, 4)],
        [(3, 0), (3, 1), (2, 2), (1, 3), (1, 4)],
        // Bridges
        [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)],
        [(0, 4), (1, 4), (2, 4), (2, 3), (2, 2)],
        [(0, 0), (0, 1), (1, 2), (0, 3), (0, 4)],
        [(1, 0), (1, 1), (0, 2), (1, 3), (1, 4)],
        // W / M shapes
        [(0, 0), (1, 1), (0, 2), (1, 3), (0, 4)],
        [(1, 0), (0, 1), (1, 2), (0, 3), (1, 4)],
        [(2, 0), (3, 1), (2, 2), (3, 3), (2, 4)],
        [(3, 0), (2, 1), (3, 2), (2, 3), (3, 4)],
    ];

    lines.iter().map(|cells| Payline::new(cells.to_vec())).collect()
}
