//! Symbol grid (rows × columns)

use serde::{Deserialize, Serialize};

use crate::symbols::SymbolId;

/// Grid cell coordinate as `(row, col)`, both 0-based
pub type Position = (usize, usize);

/// Visible symbol matrix, row-major: `cells[row][col]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    pub cells: Vec<Vec<SymbolId>>,
}

impl Grid {
    /// Create a grid filled with one symbol
    pub fn filled(rows: usize, cols: usize, symbol: &SymbolId) -> Self {
        Self {
            cells: vec![vec![symbol.clone(); cols]; rows],
        }
    }

    /// Build a grid from string rows (mostly for tests and fixtures)
    pub fn from_rows(rows: &[&[&str]]) -> Self {
        Self {
            cells: rows
                .iter()
                .map(|row| row.iter().map(|s| SymbolId::new(*s)).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Symbol at `(row, col)`, `None` when out of bounds
    pub fn get(&self, (row, col): Position) -> Option<&SymbolId> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    /// Replace the symbol at `(row, col)`; out-of-bounds writes are ignored
    pub fn set(&mut self, (row, col): Position, symbol: SymbolId) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = symbol;
        }
    }

    /// Iterate all cells with their positions, row by row
    pub fn iter(&self) -> impl Iterator<Item = (Position, &SymbolId)> {
        self.cells.iter().enumerate().flat_map(|(row, r)| {
            r.iter()
                .enumerate()
                .map(move |(col, symbol)| ((row, col), symbol))
        })
    }

    /// Positions holding `symbol`, row by row
    pub fn positions_of(&self, symbol: &str) -> Vec<Position> {
        self.iter()
            .filter(|(_, s)| s.as_str() == symbol)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Number of cells holding `symbol` anywhere on the grid
    pub fn count(&self, symbol: &str) -> usize {
        self.iter().filter(|(_, s)| s.as_str() == symbol).count()
    }
}
