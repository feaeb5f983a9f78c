//! Decision context for one `decide` call.
//!
//! The [`DecisionContext`] is the blackboard every cascade module reads from:
//! the living team and opponents, the effective configuration for this turn,
//! the engine's per-battle state and the injected random source. Modules are
//! stateless; anything they need to remember lives in [`EngineState`].

use combat_core::{ActorId, ActorStats, AiConfig, RandomSource, Skill, SkillKind};

use super::state::{EngineState, TargetRule};
use crate::events::DecisionEvent;

pub struct DecisionContext<'a> {
    /// The actor deciding.
    pub actor: &'a ActorStats,

    /// Living members of the actor's side, the actor first, de-duplicated by id.
    pub team: Vec<&'a ActorStats>,

    /// Living opponents, in the order the caller supplied them.
    pub opponents: Vec<&'a ActorStats>,

    /// Configuration after per-turn adjustments (adaptive difficulty).
    pub config: &'a AiConfig,

    pub state: &'a mut EngineState,

    pub rng: &'a mut dyn RandomSource,

    /// Events raised while evaluating; published by the engine afterwards.
    events: Vec<DecisionEvent>,
}

/// Living team (actor first, de-duplicated by id) and living opponents.
pub fn living_sides<'a>(
    actor: &'a ActorStats,
    allies: &'a [ActorStats],
    opponents: &'a [ActorStats],
) -> (Vec<&'a ActorStats>, Vec<&'a ActorStats>) {
    let mut team = vec![actor];
    for ally in allies.iter().filter(|a| a.is_alive()) {
        if !team.iter().any(|member| member.id == ally.id) {
            team.push(ally);
        }
    }

    let opponents = opponents.iter().filter(|o| o.is_alive()).collect();
    (team, opponents)
}

impl<'a> DecisionContext<'a> {
    /// Builds the context, filtering dead combatants and de-duplicating the team.
    pub fn new(
        actor: &'a ActorStats,
        allies: &'a [ActorStats],
        opponents: &'a [ActorStats],
        config: &'a AiConfig,
        state: &'a mut EngineState,
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        let (team, opponents) = living_sides(actor, allies, opponents);

        Self {
            actor,
            team,
            opponents,
            config,
            state,
            rng,
            events: Vec::new(),
        }
    }

    /// Living allies, excluding the actor.
    pub fn allies(&self) -> impl Iterator<Item = &'a ActorStats> {
        self.team.iter().skip(1).copied()
    }

    pub fn raise(&mut self, event: DecisionEvent) {
        self.events.push(event);
    }

    pub(crate) fn take_events(&mut self) -> Vec<DecisionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Percentage roll against the injected random source.
    pub fn chance(&mut self, percent: u8) -> bool {
        self.rng.chance(percent as u32)
    }

    // ------------------------------------------------------------------
    // Skill queries
    // ------------------------------------------------------------------

    /// Usable skills of `kind`, in the order the actor knows them.
    pub fn usable(&self, kind: SkillKind) -> impl Iterator<Item = &'a Skill> + use<'a> {
        self.actor
            .usable_skills()
            .filter(move |skill| skill.kind == kind)
    }

    /// Highest-power usable skill of `kind`; ties go to the first known.
    pub fn strongest(&self, kind: SkillKind) -> Option<&'a Skill> {
        first_max_by(self.usable(kind), |skill| skill.power as f32)
    }

    // ------------------------------------------------------------------
    // Target selection
    // ------------------------------------------------------------------

    pub fn lowest_hp_opponent(&self) -> Option<&'a ActorStats> {
        first_min_by(self.opponents.iter().copied(), |o| o.hp_fraction())
    }

    pub fn highest_hp_opponent(&self) -> Option<&'a ActorStats> {
        first_max_by(self.opponents.iter().copied(), |o| o.hp as f32)
    }

    pub fn lowest_defense_opponent(&self) -> Option<&'a ActorStats> {
        first_min_by(self.opponents.iter().copied(), |o| o.defense as f32)
    }

    pub fn highest_threat_opponent(&self) -> Option<&'a ActorStats> {
        first_max_by(self.opponents.iter().copied(), |o| o.threat() as f32)
    }

    /// Team member (actor included) with the lowest health fraction.
    pub fn weakest_team_member(&self) -> Option<&'a ActorStats> {
        first_min_by(self.team.iter().copied(), |m| m.hp_fraction())
    }

    /// Resolves a planned target rule against the current snapshot.
    pub fn resolve(&self, rule: TargetRule) -> Option<ActorId> {
        let target = match rule {
            TargetRule::LowestDefense => self.lowest_defense_opponent(),
            TargetRule::LowestHp => self.lowest_hp_opponent(),
            TargetRule::HighestHp => self.highest_hp_opponent(),
            TargetRule::HighestThreat => self.highest_threat_opponent(),
            TargetRule::SelfTarget => Some(self.actor),
            TargetRule::None => return None,
        };
        target.map(|t| t.id)
    }
}

/// Minimum by a float key; the first of equal minima wins.
pub(crate) fn first_min_by<T>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> f32) -> Option<T> {
    items.fold(None, |best: Option<(T, f32)>, item| {
        let k = key(&item);
        match best {
            Some((_, best_key)) if best_key <= k => best,
            _ => Some((item, k)),
        }
    })
    .map(|(item, _)| item)
}

/// Maximum by a float key; the first of equal maxima wins.
pub(crate) fn first_max_by<T>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> f32) -> Option<T> {
    first_min_by(items, |item| -key(item))
}
