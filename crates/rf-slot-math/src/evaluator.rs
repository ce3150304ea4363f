//! Win evaluator
//!
//! Lines are scored left to right, in ascending line index, then the paying
//! scatter. Evaluation is a pure function of the grid and configuration.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::grid::{Grid, Position};
use crate::paytable::{Payline, Paytable};
use crate::symbols::{SymbolCatalog, SymbolId};
use crate::validation::ConfigWarning;

/// A single line or scatter win
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinEntry {
    /// Payline index (`None` for scatter wins)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_index: Option<usize>,
    pub symbol_id: SymbolId,
    pub match_count: usize,
    pub payout_multiplier: f64,
    /// Matched cells (the streak for lines, every occurrence for scatters)
    pub coordinates: Vec<Position>,
}

/// Wins of one evaluation pass and their sum
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub wins: Vec<WinEntry>,
    pub total: f64,
    pub warnings: Vec<ConfigWarning>,
}

impl Evaluation {
    fn push(&mut self, win: WinEntry) {
        self.total += win.payout_multiplier;
        self.wins.push(win);
    }
}

/// Line and scatter evaluation of one grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridEvaluation {
    pub line_wins: Vec<WinEntry>,
    pub scatter_wins: Vec<WinEntry>,
    pub total_multiplier: f64,
    pub warnings: Vec<ConfigWarning>,
}

// ═══════════════════════════════════════════════════════════════════════════
// LINE EVALUATION
// ═══════════════════════════════════════════════════════════════════════════

/// Evaluate every payline against the grid
///
/// Malformed lines (wrong length, out-of-bounds cells) are skipped with a
/// warning. Without a wild symbol, lines match on the plain symbol only.
pub fn evaluate_lines(
    grid: &Grid,
    paylines: &[Payline],
    paytable: &Paytable,
    catalog: &SymbolCatalog,
) -> Evaluation {
    let mut result = Evaluation::default();
    let wild = catalog.wild_id();
    if wild.is_none() {
        result.warnings.push(ConfigWarning::MissingWild);
    }
    let is_wild = |symbol: &SymbolId| wild == Some(symbol);

    for (line_index, line) in paylines.iter().enumerate() {
        if line.len() != grid.cols() {
            result.warnings.push(ConfigWarning::PaylineLength {
                line_index,
                len: line.len(),
                expected: grid.cols(),
            });
            continue;
        }

        let mut symbols = Vec::with_capacity(line.len());
        for &cell in &line.cells {
            match grid.get(cell) {
                Some(symbol) => symbols.push((cell, symbol)),
                None => break,
            }
        }
        if symbols.len() != line.len() {
            let cell = line.cells[symbols.len()];
            result
                .warnings
                .push(ConfigWarning::PaylineOutOfBounds { line_index, cell });
            continue;
        }

        let Some(&(_, first)) = symbols.first() else {
            continue;
        };
        let target = symbols
            .iter()
            .map(|&(_, s)| s)
            .find(|s| !is_wild(*s))
            .unwrap_or(first);

        if !paytable.pays_for(target.as_str()) {
            continue;
        }

        let coordinates: Vec<Position> = symbols
            .iter()
            .take_while(|&&(_, s)| s == target || is_wild(s))
            .map(|&(cell, _)| cell)
            .collect();
        let match_count = coordinates.len();

        if let Some(pay) = paytable.pay(target.as_str(), match_count) {
            result.push(WinEntry {
                line_index: Some(line_index),
                symbol_id: target.clone(),
                match_count,
                payout_multiplier: pay,
                coordinates,
            });
        }
    }

    result
}

// ═══════════════════════════════════════════════════════════════════════════
// SCATTER EVALUATION
// ═══════════════════════════════════════════════════════════════════════════

/// Pay the scatter symbol by its count anywhere on the grid
///
/// An undefined id, or one whose category is a feature trigger, pays nothing.
pub fn evaluate_scatter(
    grid: &Grid,
    paytable: &Paytable,
    scatter_id: Option<&SymbolId>,
    catalog: &SymbolCatalog,
) -> Evaluation {
    let mut result = Evaluation::default();
    let Some(scatter) = scatter_id else {
        return result;
    };

    if !catalog
        .category(scatter.as_str())
        .is_some_and(|cat| cat.pays_as_scatter())
    {
        return result;
    }

    let coordinates = grid.positions_of(scatter.as_str());
    let match_count = coordinates.len();
    if let Some(pay) = paytable.pay(scatter.as_str(), match_count) {
        result.push(WinEntry {
            line_index: None,
            symbol_id: scatter.clone(),
            match_count,
            payout_multiplier: pay,
            coordinates,
        });
    }
    result
}

/// Lines, then the paying scatter, with the configuration's own tables
pub fn evaluate(grid: &Grid, config: &GameConfig) -> GridEvaluation {
    let lines = evaluate_lines(grid, &config.paylines, &config.paytable, &config.symbols);
    let scatter = evaluate_scatter(
        grid,
        &config.paytable,
        config.paying_scatter(),
        &config.symbols,
    );

    let mut warnings = lines.warnings;
    warnings.extend(scatter.warnings);

    GridEvaluation {
        total_multiplier: lines.total + scatter.total,
        line_wins: lines.wins,
        scatter_wins: scatter.wins,
        warnings,
    }
}
