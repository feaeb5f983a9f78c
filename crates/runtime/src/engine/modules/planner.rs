//! Strategic planner: setup, build, finisher.

use combat_core::{ActionKind, AiConfig, Decision, DecisionSource, ModuleFlags, SkillKind};

use super::{DecisionModule, ModuleKind};
use crate::engine::context::DecisionContext;
use crate::engine::state::{PlannedAction, TargetRule};
use crate::events::DecisionEvent;

/// Planning depth required before combos are built.
pub const MIN_COMBO_DEPTH: u8 = 3;

pub struct StrategicPlanner;

impl StrategicPlanner {
    /// Queues a debuff, a Defend and the strongest finisher, all aimed at the
    /// lowest-defense opponent.
    ///
    /// Does nothing unless the queue is empty, planning is enabled with enough
    /// depth, and both a usable debuff and a usable damage skill exist.
    pub fn build(ctx: &mut DecisionContext<'_>) -> bool {
        if !ctx.config.is_enabled(ModuleFlags::STRATEGIC_PLANNING)
            || ctx.config.planning_depth < MIN_COMBO_DEPTH
            || !ctx.state.plan.is_empty()
        {
            return false;
        }

        let Some(debuff) = ctx.usable(SkillKind::Debuff).next() else {
            return false;
        };
        let Some(finisher) = ctx.strongest(SkillKind::Damage) else {
            return false;
        };

        ctx.state.plan.extend([
            PlannedAction::skill(
                debuff.id,
                TargetRule::LowestDefense,
                format!("Combo setup: {} on the weakest defender", debuff.name),
            ),
            PlannedAction::defend("Combo build: bracing before the finisher"),
            PlannedAction::skill(
                finisher.id,
                TargetRule::LowestDefense,
                format!("Combo finisher: {}", finisher.name),
            ),
        ]);

        tracing::debug!(
            "Planner: {} queued {} -> Defend -> {}",
            ctx.actor.id,
            debuff.name,
            finisher.name
        );
        let steps = ctx.state.plan.len();
        ctx.raise(DecisionEvent::PlanBuilt {
            actor: ctx.actor.id,
            steps,
        });
        true
    }

    /// Converts a queued step into a decision, or explains why it no longer holds.
    fn realize(ctx: &DecisionContext<'_>, step: &PlannedAction) -> Result<Decision, String> {
        match step.kind {
            ActionKind::UseSkill => {
                let skill = step.skill.ok_or("planned skill step without a skill")?;
                if !ctx.actor.can_use(skill) {
                    return Err(format!("{} is no longer usable", skill));
                }
                let target = ctx
                    .resolve(step.target)
                    .ok_or_else(|| format!("no living target for {}", step.target))?;
                Ok(Decision::use_skill(skill, target, step.reasoning.clone()))
            }
            ActionKind::Attack => {
                let target = ctx
                    .resolve(step.target)
                    .ok_or_else(|| format!("no living target for {}", step.target))?;
                Ok(Decision::attack(target, step.reasoning.clone()))
            }
            ActionKind::Defend => Ok(Decision::defend(step.reasoning.clone())),
            ActionKind::Flee | ActionKind::None => {
                Err(format!("{} cannot be planned", step.kind))
            }
        }
    }
}

impl DecisionModule for StrategicPlanner {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Planner
    }

    fn is_enabled(&self, config: &AiConfig) -> bool {
        config.is_enabled(ModuleFlags::STRATEGIC_PLANNING)
    }

    fn evaluate(&self, ctx: &mut DecisionContext<'_>) -> Option<Decision> {
        let step = ctx.state.plan.pop_front()?;

        match Self::realize(ctx, &step) {
            Ok(decision) => Some(decision.with_source(DecisionSource::Plan)),
            Err(reason) => {
                tracing::debug!("Planner: dropped {} step: {}", step.kind, reason);
                ctx.raise(DecisionEvent::PlanDiscarded {
                    actor: ctx.actor.id,
                    kind: step.kind,
                    skill: step.skill,
                    reason,
                });
                None
            }
        }
    }
}
