//! Baseline utility scorer, the last stage of the cascade.
//!
//! # Structured Scoring
//!
//! Every candidate action gets a [`Score`] with four explicit components:
//!
//! - **is_possible**: can this be done at all?
//! - **situation**: battle-state favorability (0-100)
//! - **personality**: preference derived from the configuration (0-100)
//! - **modifier**: contextual adjustment (0-200, typically 100)
//!
//! ```text
//! value = is_possible × situation × personality × modifier / 10000
//! ```
//!
//! The highest value wins; ties go to the earlier candidate.

use combat_core::{ActionKind, Decision, DecisionSource, ModuleFlags, SkillKind};

use crate::engine::context::DecisionContext;
use crate::engine::state::action_type;

/// Team members below this health fraction are heal candidates.
pub const HEAL_BELOW: f32 = 0.5;

/// The baseline only considers fleeing below this health fraction.
pub const FLEE_BELOW: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub is_possible: bool,
    pub situation: u32,
    pub personality: u32,
    pub modifier: u32,
}

impl Score {
    pub const fn new(is_possible: bool, situation: u32, personality: u32, modifier: u32) -> Self {
        Self {
            is_possible,
            situation,
            personality,
            modifier,
        }
    }

    pub const fn impossible() -> Self {
        Self::new(false, 0, 0, 0)
    }

    pub const fn value(&self) -> u32 {
        if !self.is_possible {
            return 0;
        }
        (self.situation * self.personality * self.modifier) / 10000
    }
}

fn percent(fraction: f32) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}

pub struct BaselineScorer;

impl BaselineScorer {
    /// Scores every candidate and returns the best, or `Decision::none` when
    /// there is nothing valid to do.
    pub fn decide(ctx: &mut DecisionContext<'_>) -> Decision {
        if ctx.opponents.is_empty() {
            return Decision::none("No living opponents to act against");
        }

        let consider_skills = ctx.chance(ctx.config.skill_usage_rate);
        let candidates = Self::candidates(ctx, consider_skills);

        let mut best: Option<(Decision, Score)> = None;
        for (decision, score) in candidates {
            tracing::debug!(
                "  Baseline {} {:?}: score={} (possible={}, sit={}, pers={}, mod={})",
                decision.kind,
                decision.target,
                score.value(),
                score.is_possible,
                score.situation,
                score.personality,
                score.modifier
            );
            let better = match &best {
                Some((_, best_score)) => score.value() > best_score.value(),
                None => score.is_possible && score.value() > 0,
            };
            if better {
                best = Some((decision, score));
            }
        }

        match best {
            Some((decision, _)) => decision.with_source(DecisionSource::Baseline),
            None => Decision::none("No valid action available"),
        }
    }

    fn candidates(ctx: &DecisionContext<'_>, consider_skills: bool) -> Vec<(Decision, Score)> {
        let config = ctx.config;
        let actor = ctx.actor;
        let hp = actor.hp_fraction();
        let aggression = (config.aggression as u32).max(10);
        let caution = 100_u32.saturating_sub(config.aggression as u32).max(10);
        let mut out = Vec::new();

        for opponent in &ctx.opponents {
            let situation = 50 + (100 - percent(opponent.hp_fraction())) / 2;
            out.push((
                Decision::attack(opponent.id, format!("Attacking {}", opponent.name)),
                Score::new(true, situation, aggression, 100),
            ));
        }

        if consider_skills {
            if let (Some(skill), Some(target)) =
                (ctx.strongest(SkillKind::Damage), ctx.lowest_hp_opponent())
            {
                let situation = (60 + skill.power.min(40)).min(100);
                out.push((
                    Decision::use_skill(skill.id, target.id, format!("{} on {}", skill.name, target.name)),
                    Score::new(true, situation, aggression, 120),
                ));
            }

            if let Some(heal) = ctx.strongest(SkillKind::Heal) {
                for member in ctx.team.iter().filter(|m| m.hp_fraction() < HEAL_BELOW) {
                    let situation = 100 - percent(member.hp_fraction());
                    out.push((
                        Decision::use_skill(heal.id, member.id, format!("Healing {}", member.name)),
                        Score::new(true, situation, caution.max(50), 150),
                    ));
                }
            }
        }

        let expects_attack = config.is_enabled(ModuleFlags::PATTERN_LEARNING)
            && ctx
                .state
                .patterns
                .most_common()
                .is_some_and(|(sig, _)| action_type(sig) == ActionKind::Attack.as_ref());
        out.push((
            Decision::defend("Guarding"),
            Score::new(
                true,
                20 + (100 - percent(hp)) * 6 / 10,
                caution,
                if expects_attack { 130 } else { 100 },
            ),
        ));

        let can_flee = config.allow_flee && hp < FLEE_BELOW;
        out.push((
            Decision::flee("Too wounded to keep fighting"),
            if can_flee {
                Score::new(true, 100, 100_u32.saturating_sub(config.recklessness as u32).max(10), 100)
            } else {
                Score::impossible()
            },
        ));

        out
    }
}
