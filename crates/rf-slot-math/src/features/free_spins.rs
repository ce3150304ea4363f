//! Free spins with symbol transformation

use crate::config::GameConfig;
use crate::triggers::FeatureType;

use super::{FeatureContext, FeatureRound, FeatureRoundOutcome, transform_symbols};

/// Free spins round
///
/// Every free spin turns a few low-tier symbols into the target symbol.
/// Landing the trigger again awards more spins, up to `max_retriggers` times.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeSpinsRound;

impl FeatureRound for FreeSpinsRound {
    fn feature_type(&self) -> FeatureType {
        FeatureType::FreeSpins
    }

    fn name(&self) -> &str {
        "Free Spins"
    }

    fn description(&self, config: &GameConfig) -> String {
        let fs = &config.free_spins;
        let candidates: Vec<&str> = fs.transformation_symbols.iter().map(|s| s.as_str()).collect();
        format!(
            "{} free spins by trigger count {:?}; {}-{} of [{}] become {} each spin{}",
            self.name(),
            fs.spins_by_count,
            fs.min_transformations,
            fs.max_transformations,
            candidates.join(", "),
            fs.transformation_target,
            if fs.can_retrigger {
                format!("; retriggers up to {}", fs.max_retriggers)
            } else {
                String::new()
            }
        )
    }

    fn play(&self, ctx: &FeatureContext<'_>, trigger_count: usize) -> FeatureRoundOutcome {
        let config = ctx.config;
        let fs = &config.free_spins;
        let feature = self.feature_type();
        let rule = config.trigger_rule(feature);
        let mut rng = ctx.rng(feature);

        let mut outcome = FeatureRoundOutcome::new(feature, trigger_count);
        outcome.spins_awarded = fs.spins_for(trigger_count);

        let mut index = 0;
        while index < outcome.spins_awarded {
            let generated = ctx.generate(feature, index);
            outcome.merge_warnings(generated.warnings);

            let (grid, transformed) = transform_symbols(
                &generated.grid,
                &fs.transformation_symbols,
                &fs.transformation_target,
                fs.min_transformations,
                fs.max_transformations,
                &mut rng,
            );

            let mut extra = 0;
            if let Some(rule) = rule {
                let count = grid.count(rule.symbol_id.as_str());
                if fs.can_retrigger && outcome.retriggers < fs.max_retriggers && rule.is_met(count) {
                    extra = fs.spins_for(count);
                    if extra > 0 {
                        outcome.retriggers += 1;
                        outcome.spins_awarded += extra;
                        log::debug!("free spins retrigger at spin {index}: +{extra}");
                    }
                }
            }

            outcome.record_spin(config, index, grid, transformed, extra);
            index += 1;
        }

        outcome
    }
}
