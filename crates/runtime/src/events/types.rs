//! Event types for different topics.

use combat_core::{ActionKind, ActorId, DecisionSource, Mood, SkillId};
use serde::{Deserialize, Serialize};

/// Per-turn engine output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecisionEvent {
    /// The engine committed to an action for this turn.
    DecisionMade {
        actor: ActorId,
        turn: u32,
        kind: ActionKind,
        skill: Option<SkillId>,
        target: Option<ActorId>,
        source: DecisionSource,
        reasoning: String,
    },

    /// Health crossed a mood threshold, or a boss phase forced a mood.
    MoodChanged {
        actor: ActorId,
        from: Mood,
        to: Mood,
        phase_index: usize,
    },

    /// The strategic planner queued a new multi-turn plan.
    PlanBuilt { actor: ActorId, steps: usize },

    /// A queued step no longer held and was dropped without executing.
    PlanDiscarded {
        actor: ActorId,
        kind: ActionKind,
        skill: Option<SkillId>,
        reason: String,
    },
}

/// Boss phase lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhaseEvent {
    PhaseStarted {
        actor: ActorId,
        /// 1-based phase number.
        number: usize,
        name: String,
        message: Option<String>,
    },

    /// Emitted before a phase's effects are applied. Numbers are 1-based.
    PhaseTransitioning {
        actor: ActorId,
        from: usize,
        to: usize,
    },

    BossEnraged { actor: ActorId },

    SpecialMechanicTriggered { actor: ActorId, tag: String },

    SummonRequested { actor: ActorId, count: u32 },
}

/// Cross-battle difficulty tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BalanceEvent {
    BattleRecorded {
        opponent: String,
        player_won: bool,
        performance: f32,
        total_battles: u32,
    },

    DifficultyAdjusted {
        opponent: String,
        from: f32,
        to: f32,
        player_win_rate: f32,
    },
}
