//! Ally protection and focus fire.

use combat_core::{AiConfig, Decision, DecisionSource, ModuleFlags, SkillKind};

use super::{DecisionModule, ModuleKind};
use crate::engine::context::{DecisionContext, first_min_by};

/// Healers below this health fraction get shielded.
pub const PROTECT_HEALER_BELOW: f32 = 0.6;

/// Opponents below this health fraction get focused.
pub const FOCUS_FIRE_BELOW: f32 = 0.4;

/// Living allies (actor excluded) needed for focus fire.
pub const FOCUS_FIRE_MIN_ALLIES: usize = 1;

pub struct Coordination;

impl Coordination {
    fn protect_healer(ctx: &DecisionContext<'_>) -> Option<Decision> {
        let healer = first_min_by(
            ctx.allies().filter(|ally| {
                ally.has_skill_kind(SkillKind::Heal) && ally.hp_fraction() < PROTECT_HEALER_BELOW
            }),
            |ally| ally.hp_fraction(),
        )?;
        let buff = ctx
            .usable(SkillKind::Buff)
            .find(|skill| skill.targets_allies())?;

        Some(Decision::use_skill(
            buff.id,
            healer.id,
            format!("Protecting {} with {}", healer.name, buff.name),
        ))
    }

    fn focus_fire(ctx: &DecisionContext<'_>) -> Option<Decision> {
        if ctx.allies().count() < FOCUS_FIRE_MIN_ALLIES {
            return None;
        }
        let target = ctx.lowest_hp_opponent()?;
        if target.hp_fraction() >= FOCUS_FIRE_BELOW {
            return None;
        }

        Some(Decision::attack(
            target.id,
            format!("Focus fire on weakened {}", target.name),
        ))
    }
}

impl DecisionModule for Coordination {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Coordination
    }

    fn is_enabled(&self, config: &AiConfig) -> bool {
        config.is_enabled(ModuleFlags::COORDINATION)
    }

    fn evaluate(&self, ctx: &mut DecisionContext<'_>) -> Option<Decision> {
        if !ctx.chance(ctx.config.teamwork_priority) {
            return None;
        }

        Self::protect_healer(ctx)
            .or_else(|| Self::focus_fire(ctx))
            .map(|decision| decision.with_source(DecisionSource::Coordination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::modules::testing::{boss, heroes, with_ctx};
    use crate::engine::state::EngineState;
    use combat_core::{ActionKind, ActorId, ActorStats, FixedRoll, Preset, Skill, SkillTarget};

    fn priest(hp: u32) -> ActorStats {
        ActorStats::new(2, "Priest")
            .with_hp(100)
            .with_current_hp(hp)
            .with_skill(Skill::heal(20, "Mend", 30, 5))
    }

    #[test]
    fn test_wounded_healer_gets_buffed() {
        let actor = boss().with_skill(Skill::buff(6, "Ossify", SkillTarget::Ally, 5));
        let config = Preset::Normal.config();
        let mut state = EngineState::default();

        let decision = with_ctx(&actor, &[priest(40)], &heroes(), &config, &mut state, FixedRoll::ALWAYS, |ctx| {
            Coordination.evaluate(ctx)
        })
        .unwrap();

        assert_eq!(decision.kind, ActionKind::UseSkill);
        assert_eq!(decision.skill, Some(combat_core::SkillId(6)));
        assert_eq!(decision.target, Some(ActorId(2)));
    }

    #[test]
    fn test_focus_fire_when_no_ally_buff() {
        let config = Preset::Normal.config();
        let mut state = EngineState::default();
        let mut opponents = heroes();
        opponents[2] = opponents[2].clone().with_current_hp(30);

        let decision = with_ctx(&boss(), &[priest(40)], &opponents, &config, &mut state, FixedRoll::ALWAYS, |ctx| {
            Coordination.evaluate(ctx)
        })
        .unwrap();

        assert_eq!(decision.kind, ActionKind::Attack);
        assert_eq!(decision.target, Some(ActorId(12)));
    }

    #[test]
    fn test_failed_teamwork_roll_skips() {
        let config = Preset::Normal.config();
        let mut state = EngineState::default();
        let mut opponents = heroes();
        opponents[0] = opponents[0].clone().with_current_hp(10);

        let decision = with_ctx(&boss(), &[priest(90)], &opponents, &config, &mut state, FixedRoll::NEVER, |ctx| {
            Coordination.evaluate(ctx)
        });
        assert_eq!(decision, None);
    }

    #[test]
    fn test_lone_actor_never_focus_fires() {
        let config = Preset::Normal.config();
        let mut state = EngineState::default();
        let mut opponents = heroes();
        opponents[0] = opponents[0].clone().with_current_hp(10);

        let decision = with_ctx(&boss(), &[], &opponents, &config, &mut state, FixedRoll::ALWAYS, |ctx| {
            Coordination.evaluate(ctx)
        });
        assert_eq!(decision, None);

        let listed_with_self = [boss(), ActorStats::new(3, "Fallen").with_current_hp(0)];
        let decision = with_ctx(
            &boss(),
            &listed_with_self,
            &opponents,
            &config,
            &mut state,
            FixedRoll::ALWAYS,
            |ctx| Coordination.evaluate(ctx),
        );
        assert_eq!(decision, None);
    }
}
