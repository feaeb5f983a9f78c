//! Reacting to the opponent's recent action signatures.

use combat_core::{AiConfig, Decision, DecisionSource, ModuleFlags, SkillKind};

use super::{DecisionModule, ModuleKind};
use crate::engine::context::DecisionContext;
use crate::engine::state::action_type;

/// History entries required before any pattern is read.
pub const MIN_HISTORY: usize = 3;

/// Entries inspected by each rule.
pub const WINDOW: usize = 3;

/// Signature of an opponent focusing the weakest target.
pub const FOCUS_SIGNATURE: &str = "Attack:LowestHP";

/// Fixed chance of feigning weakness when baiting is enabled.
pub const BAIT_CHANCE: u8 = 30;

pub struct Prediction;

impl Prediction {
    /// The opponent defended recently and turns cycle back: buff self before they strike.
    fn counter_buff(ctx: &DecisionContext<'_>) -> Option<Decision> {
        if ctx.state.turn % 3 != 2 {
            return None;
        }
        let recent = ctx.state.patterns.last(WINDOW);
        if !recent.iter().any(|sig| action_type(sig) == "Defend") {
            return None;
        }
        let buff = ctx
            .usable(SkillKind::Buff)
            .find(|skill| skill.can_target_self())?;

        Some(Decision::use_skill(
            buff.id,
            ctx.actor.id,
            format!("Expecting an attack after their guard: {}", buff.name),
        ))
    }

    /// The opponent keeps focusing the weakest: heal that member pre-emptively.
    fn pre_heal(ctx: &DecisionContext<'_>) -> Option<Decision> {
        if !ctx.config.is_enabled(ModuleFlags::COUNTER_PREDICTION) {
            return None;
        }
        let focused = ctx
            .state
            .patterns
            .last(WINDOW)
            .iter()
            .filter(|sig| sig.as_str() == FOCUS_SIGNATURE)
            .count();
        if focused < 2 {
            return None;
        }
        let heal = ctx.strongest(SkillKind::Heal)?;
        let target = ctx.weakest_team_member()?;

        Some(Decision::use_skill(
            heal.id,
            target.id,
            format!("Predicting focus on {}: pre-healing with {}", target.name, heal.name),
        ))
    }
}

impl DecisionModule for Prediction {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Prediction
    }

    fn is_enabled(&self, config: &AiConfig) -> bool {
        config.is_enabled(ModuleFlags::PREDICTION)
    }

    fn evaluate(&self, ctx: &mut DecisionContext<'_>) -> Option<Decision> {
        if ctx.state.patterns.len() < MIN_HISTORY {
            return None;
        }

        if ctx.chance(ctx.config.prediction_accuracy) {
            let countermove = Self::counter_buff(ctx).or_else(|| Self::pre_heal(ctx));
            if let Some(decision) = countermove {
                return Some(decision.with_source(DecisionSource::Prediction));
            }
        }

        if ctx.config.is_enabled(ModuleFlags::BAITING) && ctx.chance(BAIT_CHANCE) {
            return Some(
                Decision::defend("Feigning weakness to bait a reckless attack")
                    .with_source(DecisionSource::Prediction),
            );
        }

        None
    }
}
