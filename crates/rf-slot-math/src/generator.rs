//! Deterministic outcome generator
//!
//! Every cell is drawn from its own SHA-256 digest of
//! `"{server_seed}-{client_seed}-{nonce}-{col}-{row}"`, so a grid can be
//! recomputed by anyone who knows the seeds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::SymbolWeights;
use crate::grid::Grid;
use crate::symbols::SymbolId;
use crate::validation::ConfigWarning;

/// Grid plus any fallbacks taken while producing it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generated {
    pub grid: Grid,
    pub warnings: Vec<ConfigWarning>,
}

/// SHA-256 digest for one cell
pub fn cell_digest(
    client_seed: &str,
    server_seed: &str,
    nonce: u64,
    col: usize,
    row: usize,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(format!("{server_seed}-{client_seed}-{nonce}-{col}-{row}").as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Leading 32 bits of a digest, big-endian
pub fn leading_u32(digest: &[u8; 32]) -> u32 {
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Weighted pick over a column, walking symbols in id order
///
/// Returns `None` when the column's total weight is zero.
pub fn pick_weighted(column: &BTreeMap<SymbolId, u32>, h: u32) -> Option<&SymbolId> {
    let total: u64 = column.values().map(|&w| u64::from(w)).sum();
    if total == 0 {
        return None;
    }
    let mut value = u64::from(h) % total;
    for (symbol, &weight) in column {
        let weight = u64::from(weight);
        if value < weight {
            return Some(symbol);
        }
        value -= weight;
    }
    None
}

/// Produce a `rows × cols` grid from the seed pair and nonce
///
/// A column with no weight (missing or all zero) is filled with `fallback`
/// and reported once as a [`ConfigWarning::ZeroWeightColumn`].
pub fn generate(
    client_seed: &str,
    server_seed: &str,
    nonce: u64,
    weights: &SymbolWeights,
    rows: usize,
    cols: usize,
    fallback: &SymbolId,
) -> Generated {
    let mut grid = Grid::filled(rows, cols, fallback);
    let mut warnings = Vec::new();

    for col in 0..cols {
        let column = match weights.column(col) {
            Some(column) if weights.total(col) > 0 => column,
            _ => {
                log::warn!("column {col} has zero total weight, filling with {fallback}");
                warnings.push(ConfigWarning::ZeroWeightColumn {
                    col,
                    fallback: fallback.clone(),
                });
                continue;
            }
        };

        for row in 0..rows {
            let digest = cell_digest(client_seed, server_seed, nonce, col, row);
            if let Some(symbol) = pick_weighted(column, leading_u32(&digest)) {
                grid.set((row, col), symbol.clone());
            }
        }
    }

    Generated { grid, warnings }
}

/// Hex SHA-256 of the server seed, published before play as a commitment
pub fn server_seed_hash(server_seed: &str) -> String {
    hex::encode(Sha256::digest(server_seed.as_bytes()))
}

/// Recompute the grid for the given seeds and compare with a claimed one
#[allow(clippy::too_many_arguments)]
pub fn verify_grid(
    client_seed: &str,
    server_seed: &str,
    nonce: u64,
    weights: &SymbolWeights,
    rows: usize,
    cols: usize,
    fallback: &SymbolId,
    claimed: &Grid,
) -> bool {
    generate(client_seed, server_seed, nonce, weights, rows, cols, fallback).grid == *claimed
}
