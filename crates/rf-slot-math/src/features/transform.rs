//! Pure grid transforms used by bonus features
//!
//! Each transform takes a grid and returns a new one; the input is never
//! modified, so the base spin's grid stays exactly as evaluated.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::config::{BonusRoundConfig, WildMode};
use crate::grid::{Grid, Position};
use crate::symbols::SymbolId;

fn draw_count(rng: &mut impl Rng, min: u32, max: u32) -> usize {
    let hi = max.max(min);
    rng.random_range(min..=hi) as usize
}

/// Replace `min..=max` random cells holding a candidate symbol with `target`
///
/// Each step re-scans the grid, so a cell is never transformed twice. Stops
/// early when no candidate is left.
pub fn transform_symbols(
    grid: &Grid,
    candidates: &[SymbolId],
    target: &SymbolId,
    min: u32,
    max: u32,
    rng: &mut impl Rng,
) -> (Grid, usize) {
    let mut out = grid.clone();
    let steps = draw_count(rng, min, max);
    let mut transformed = 0;

    for _ in 0..steps {
        let cells: Vec<Position> = out
            .iter()
            .filter(|(_, s)| candidates.contains(*s) && *s != target)
            .map(|(pos, _)| pos)
            .collect();
        let Some(&pos) = cells.choose(rng) else {
            break;
        };
        out.set(pos, target.clone());
        transformed += 1;
    }

    (out, transformed)
}

/// Put `min..=max` wilds on distinct non-wild cells
pub fn inject_wilds(
    grid: &Grid,
    wild: &SymbolId,
    min: u32,
    max: u32,
    rng: &mut impl Rng,
) -> (Grid, usize) {
    let mut out = grid.clone();
    let count = draw_count(rng, min, max);

    let mut cells: Vec<Position> = out
        .iter()
        .filter(|(_, s)| *s != wild)
        .map(|(pos, _)| pos)
        .collect();
    cells.shuffle(rng);

    let placed = count.min(cells.len());
    for &pos in &cells[..placed] {
        out.set(pos, wild.clone());
    }
    (out, placed)
}

/// Every column that already holds a wild becomes a full wild column
pub fn expand_wilds(grid: &Grid, wild: &SymbolId) -> (Grid, usize) {
    let mut out = grid.clone();
    let mut changed = 0;

    for col in 0..grid.cols() {
        let has_wild = (0..grid.rows()).any(|row| grid.get((row, col)) == Some(wild));
        if !has_wild {
            continue;
        }
        for row in 0..grid.rows() {
            if grid.get((row, col)) != Some(wild) {
                out.set((row, col), wild.clone());
                changed += 1;
            }
        }
    }
    (out, changed)
}

/// Bonus-round transform selected by the configured wild mode
pub fn apply_bonus_wilds(
    grid: &Grid,
    config: &BonusRoundConfig,
    wild: &SymbolId,
    rng: &mut impl Rng,
) -> (Grid, usize) {
    match config.wild_mode {
        WildMode::AddRandomWilds => {
            inject_wilds(grid, wild, config.min_wilds, config.max_wilds, rng)
        }
        WildMode::ExpandExistingWilds => expand_wilds(grid, wild),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid() -> Grid {
        Grid::from_rows(&[
            &["L1", "H1", "M1", "L1", "WILD"],
            &["M2", "H1", "SCATTER_FS", "H1", "H1"],
            &["H1", "H1", "H1", "H1", "H1"],
            &["H1", "WILD", "H1", "H1", "H1"],
        ])
    }

    #[test]
    fn test_transform_symbols_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let candidates: Vec<SymbolId> = vec!["M1".into(), "M2".into(), "L1".into()];
        let target = SymbolId::new("H1");
        let original = grid();

        for _ in 0..50 {
            let (out, n) = transform_symbols(&original, &candidates, &target, 1, 3, &mut rng);
            assert!((1..=3).contains(&n));
            assert_eq!(out.count("H1"), original.count("H1") + n);
            assert_eq!(out.count("WILD"), 2);
        }
        // input untouched
        assert_eq!(original, grid());
    }

    #[test]
    fn test_transform_stops_without_candidates() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let g = Grid::from_rows(&[&["H1", "M1"]]);
        let (out, n) = transform_symbols(&g, &["M1".into()], &"H1".into(), 3, 3, &mut rng);
        assert_eq!(n, 1);
        assert_eq!(out.count("H1"), 2);
    }

    #[test]
    fn test_inject_wilds_distinct_non_wild_cells() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let wild = SymbolId::new("WILD");
        for _ in 0..50 {
            let (out, placed) = inject_wilds(&grid(), &wild, 2, 4, &mut rng);
            assert!((2..=4).contains(&placed));
            assert_eq!(out.count("WILD"), 2 + placed);
        }
    }

    #[test]
    fn test_inject_wilds_caps_at_free_cells() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let g = Grid::from_rows(&[&["WILD", "L1"]]);
        let (out, placed) = inject_wilds(&g, &"WILD".into(), 4, 4, &mut rng);
        assert_eq!(placed, 1);
        assert_eq!(out.count("WILD"), 2);
    }

    #[test]
    fn test_expand_wilds_fills_columns() {
        let (out, changed) = expand_wilds(&grid(), &"WILD".into());
        assert_eq!(changed, 6);
        for row in 0..4 {
            assert_eq!(out.get((row, 1)).map(SymbolId::as_str), Some("WILD"));
            assert_eq!(out.get((row, 4)).map(SymbolId::as_str), Some("WILD"));
            assert_eq!(out.get((row, 0)), grid().get((row, 0)));
        }
    }
}
