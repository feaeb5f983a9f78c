//! Momentum-sensitive risk evaluation.

use combat_core::{AiConfig, Decision, DecisionSource, ModuleFlags, SkillKind};

use super::{DecisionModule, ModuleKind};
use crate::engine::context::{DecisionContext, first_max_by};

/// Momentum below which a desperate gamble is taken.
pub const DESPERATE_MOMENTUM: f32 = -40.0;

/// Momentum above which the actor plays it safe.
pub const CONSERVATIVE_MOMENTUM: f32 = 30.0;

/// Minimum own health fraction for a calculated risk.
pub const CALCULATED_MIN_HP: f32 = 0.5;

/// A skill costing at least this share of max MP counts as high-cost.
pub const HIGH_COST_SHARE: f32 = 0.25;

/// `50 - hp*30 - mp*20 + opponents*10 - allies*10`, clamped to [0, 100].
///
/// `hp` and `mp` are fractions; `allies` excludes the actor.
pub fn risk_score(hp: f32, mp: f32, opponents: usize, allies: usize) -> f32 {
    let risk = 50.0 - hp * 30.0 - mp * 20.0 + opponents as f32 * 10.0 - allies as f32 * 10.0;
    risk.clamp(0.0, 100.0)
}

pub struct RiskEvaluator;

impl RiskEvaluator {
    fn desperate(ctx: &DecisionContext<'_>) -> Option<Decision> {
        let skill = ctx.strongest(SkillKind::Damage)?;
        let target = ctx.highest_hp_opponent()?;
        Some(Decision::use_skill(
            skill.id,
            target.id,
            format!("Desperate gamble: {} on {}", skill.name, target.name),
        ))
    }

    fn conservative(ctx: &DecisionContext<'_>) -> Option<Decision> {
        let target = ctx.lowest_hp_opponent()?;
        Some(Decision::attack(
            target.id,
            format!("Winning comfortably; safe attack on {}", target.name),
        ))
    }

    fn calculated(ctx: &DecisionContext<'_>, risk: f32) -> Option<Decision> {
        let actor = ctx.actor;
        if risk >= ctx.config.risk_tolerance as f32 || actor.hp_fraction() <= CALCULATED_MIN_HP {
            return None;
        }

        let min_cost = actor.mp_max as f32 * HIGH_COST_SHARE;
        let skill = first_max_by(
            ctx.usable(SkillKind::Damage)
                .filter(|skill| actor.mp_max > 0 && skill.mp_cost as f32 >= min_cost),
            |skill| skill.power as f32,
        )?;
        let target = ctx.highest_threat_opponent()?;

        Some(Decision::use_skill(
            skill.id,
            target.id,
            format!(
                "Calculated risk (risk {:.0}): {} on {}",
                risk, skill.name, target.name
            ),
        ))
    }
}

impl DecisionModule for RiskEvaluator {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Risk
    }

    fn is_enabled(&self, config: &AiConfig) -> bool {
        config.modules.intersects(
            ModuleFlags::RISK_ASSESSMENT
                | ModuleFlags::DESPERATION_MOVES
                | ModuleFlags::CONSERVATIVE_WHEN_WINNING,
        )
    }

    fn evaluate(&self, ctx: &mut DecisionContext<'_>) -> Option<Decision> {
        let momentum = ctx.state.momentum;
        let config = ctx.config;
        let risk = risk_score(
            ctx.actor.hp_fraction(),
            ctx.actor.mp_fraction(),
            ctx.opponents.len(),
            ctx.allies().count(),
        );
        tracing::debug!("Risk: {} momentum={:.1} risk={:.1}", ctx.actor.id, momentum, risk);

        let decision = if momentum < DESPERATE_MOMENTUM
            && config.is_enabled(ModuleFlags::DESPERATION_MOVES)
        {
            Self::desperate(ctx)
        } else if momentum > CONSERVATIVE_MOMENTUM
            && config.is_enabled(ModuleFlags::CONSERVATIVE_WHEN_WINNING)
        {
            Self::conservative(ctx)
        } else {
            None
        };

        decision
            .or_else(|| {
                config
                    .is_enabled(ModuleFlags::RISK_ASSESSMENT)
                    .then(|| Self::calculated(ctx, risk))
                    .flatten()
            })
            .map(|decision| decision.with_source(DecisionSource::Risk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::modules::testing::{boss, heroes, with_ctx};
    use crate::engine::state::EngineState;
    use combat_core::{ActionKind, ActorId, FixedRoll, Preset, SkillId};

    #[test]
    fn test_risk_score_is_clamped() {
        assert_eq!(risk_score(1.0, 1.0, 0, 3), 0.0);
        assert_eq!(risk_score(0.0, 0.0, 9, 0), 100.0);
        assert_eq!(risk_score(0.5, 0.5, 2, 1), 50.0 - 15.0 - 10.0 + 20.0 - 10.0);
    }

    #[test]
    fn test_desperate_gamble_uses_strongest_on_healthiest() {
        let config = Preset::Nightmare.config();
        let mut state = EngineState { momentum: -60.0, ..EngineState::default() };
        let mut opponents = heroes();
        opponents[1] = opponents[1].clone().with_hp(150);

        let decision = with_ctx(&boss(), &[], &opponents, &config, &mut state, FixedRoll::NEVER, |ctx| {
            RiskEvaluator.evaluate(ctx)
        })
        .unwrap();

        assert_eq!(decision.kind, ActionKind::UseSkill);
        assert_eq!(decision.skill, Some(SkillId(3)));
        assert_eq!(decision.target, Some(ActorId(11)));
        assert!(decision.reasoning.to_lowercase().contains("desperate"));
    }

    #[test]
    fn test_conservative_when_winning() {
        let config = Preset::Nightmare.config();
        let mut state = EngineState { momentum: 45.0, ..EngineState::default() };

        let decision = with_ctx(&boss(), &[], &heroes(), &config, &mut state, FixedRoll::NEVER, |ctx| {
            RiskEvaluator.evaluate(ctx)
        })
        .unwrap();

        assert_eq!(decision.kind, ActionKind::Attack);
    }

    #[test]
    fn test_calculated_risk_targets_highest_threat() {
        // Full HP and MP against one opponent: risk = 50 - 30 - 20 + 10 = 10.
        let config = Preset::Hard.config();
        let mut state = EngineState::default();
        let opponents = vec![heroes().remove(2)];

        let decision = with_ctx(&boss(), &[], &opponents, &config, &mut state, FixedRoll::NEVER, |ctx| {
            RiskEvaluator.evaluate(ctx)
        })
        .unwrap();

        assert_eq!(decision.skill, Some(SkillId(3)));
        assert_eq!(decision.target, Some(ActorId(12)));
    }
}
