//! Bonus round with wild placement

use crate::config::{GameConfig, WildMode};
use crate::triggers::FeatureType;
use crate::validation::ConfigWarning;

use super::{FeatureContext, FeatureRound, FeatureRoundOutcome, apply_bonus_wilds};

/// Fixed-length bonus round; each spin gets extra wilds
#[derive(Debug, Clone, Copy, Default)]
pub struct BonusRound;

impl FeatureRound for BonusRound {
    fn feature_type(&self) -> FeatureType {
        FeatureType::BonusRound
    }

    fn name(&self) -> &str {
        "Bonus Round"
    }

    fn description(&self, config: &GameConfig) -> String {
        let bonus = &config.bonus_round;
        let wilds = match bonus.wild_mode {
            WildMode::AddRandomWilds => {
                format!("{}-{} random wilds per spin", bonus.min_wilds, bonus.max_wilds)
            }
            WildMode::ExpandExistingWilds => "wilds expand to full columns".to_string(),
        };
        format!("{}: {} spins, {}", self.name(), bonus.num_spins, wilds)
    }

    fn play(&self, ctx: &FeatureContext<'_>, trigger_count: usize) -> FeatureRoundOutcome {
        let config = ctx.config;
        let feature = self.feature_type();
        let wild = config.wild_id();
        let mut rng = ctx.rng(feature);

        let mut outcome = FeatureRoundOutcome::new(feature, trigger_count);
        outcome.spins_awarded = config.bonus_round.num_spins;
        if wild.is_none() {
            log::warn!("bonus round without a wild symbol, spins play unmodified");
            outcome.merge_warnings(vec![ConfigWarning::MissingWild]);
        }

        for index in 0..outcome.spins_awarded {
            let generated = ctx.generate(feature, index);
            outcome.merge_warnings(generated.warnings);

            let (grid, changed) = match wild {
                Some(wild) => apply_bonus_wilds(&generated.grid, &config.bonus_round, wild, &mut rng),
                None => (generated.grid, 0),
            };
            outcome.record_spin(config, index, grid, changed, 0);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plays_configured_spins() {
        let config = GameConfig::reference();
        let ctx = FeatureContext::new(&config, "c", "s", 5);
        let outcome = BonusRound.play(&ctx, 3);
        assert_eq!(outcome.spins_played, 5);
        assert_eq!(outcome.retriggers, 0);
        for spin in &outcome.spins {
            assert!((2..=4).contains(&spin.transformed_cells));
            assert!(spin.grid.count("WILD") >= 2);
        }
        let sum: f64 = outcome.spins.iter().map(|s| s.multiplier).sum();
        assert!((outcome.total_multiplier - sum).abs() < 1e-9);
    }

    #[test]
    fn test_expand_mode_fills_wild_columns() {
        let mut config = GameConfig::reference();
        config.bonus_round.wild_mode = WildMode::ExpandExistingWilds;
        let ctx = FeatureContext::new(&config, "c", "s", 5);
        let outcome = BonusRound.play(&ctx, 3);
        for spin in &outcome.spins {
            for col in 0..spin.grid.cols() {
                let wilds = (0..spin.grid.rows())
                    .filter(|&row| spin.grid.get((row, col)).map(|s| s.as_str()) == Some("WILD"))
                    .count();
                assert!(wilds == 0 || wilds == spin.grid.rows());
            }
        }
    }

    #[test]
    fn test_missing_wild_plays_unmodified() {
        let mut config = GameConfig::reference();
        config.symbols.symbols.retain(|s| s.id.as_str() != "WILD");
        let ctx = FeatureContext::new(&config, "c", "s", 5);
        let outcome = BonusRound.play(&ctx, 3);
        assert_eq!(outcome.spins_played, 5);
        assert!(outcome.spins.iter().all(|s| s.transformed_cells == 0));
        assert_eq!(outcome.warnings, vec![ConfigWarning::MissingWild]);
    }

    #[test]
    fn test_description_mentions_mode() {
        let config = GameConfig::reference();
        assert!(BonusRound.description(&config).contains("2-4 random wilds"));
    }
}
