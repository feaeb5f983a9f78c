//! Withholding costly actions.

use combat_core::{AiConfig, Decision, DecisionSource, ModuleFlags};

use super::{DecisionModule, ModuleKind};
use crate::engine::context::DecisionContext;

/// Health fraction above which resources are saved for a later boss phase.
pub const SAVE_FOR_LATER_MIN_HP: f32 = 0.7;

pub struct ResourceManager;

impl ResourceManager {
    /// Why the actor should conserve this turn, if it should.
    fn conserve_reason(ctx: &DecisionContext<'_>) -> Option<String> {
        let config = ctx.config;
        let actor = ctx.actor;

        if config.is_enabled(ModuleFlags::RESOURCE_MANAGEMENT) && actor.mp_max > 0 {
            let mp_percent = actor.mp_fraction() * 100.0;
            if mp_percent < config.mp_conservation_threshold as f32 {
                return Some(format!("Conserving mana at {:.0}%", mp_percent));
            }
        }

        if config.is_enabled(ModuleFlags::SAVE_FOR_LATER_PHASES)
            && ctx.state.boss_phase < config.reserve_until_phase
            && actor.hp_fraction() > SAVE_FOR_LATER_MIN_HP
        {
            return Some(format!(
                "Saving strength for phase {}",
                config.reserve_until_phase + 1
            ));
        }

        None
    }
}

impl DecisionModule for ResourceManager {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Resource
    }

    fn is_enabled(&self, config: &AiConfig) -> bool {
        config
            .modules
            .intersects(ModuleFlags::RESOURCE_MANAGEMENT | ModuleFlags::SAVE_FOR_LATER_PHASES)
    }

    fn evaluate(&self, ctx: &mut DecisionContext<'_>) -> Option<Decision> {
        let reason = Self::conserve_reason(ctx)?;
        let target = ctx.lowest_hp_opponent()?;

        Some(
            Decision::attack(target.id, format!("{}; plain attack on {}", reason, target.name))
                .with_source(DecisionSource::Conservation),
        )
    }
}
