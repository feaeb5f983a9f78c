//! Per-battle mutable state owned by one decision engine.

use std::collections::{BTreeMap, VecDeque};

use arrayvec::ArrayVec;
use combat_core::{ActionKind, Mood, SkillId};
use serde::{Deserialize, Serialize};

/// Opponent action signatures remembered for prediction.
pub const PATTERN_CAPACITY: usize = 10;

/// Everything the engine mutates while a battle runs.
///
/// Reset between battles; snapshot with [`super::EngineSnapshot`] to pause
/// and resume mid-battle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    /// Number of `decide` calls this battle. The first turn is 1.
    pub turn: u32,
    /// Last computed momentum in [-100, 100].
    pub momentum: f32,
    pub personality: PersonalityState,
    /// Pre-committed actions, consumed front to back.
    pub plan: VecDeque<PlannedAction>,
    pub patterns: PatternHistory,
    /// Index of the boss phase the owning actor is in.
    pub boss_phase: usize,
}

/// Current mood and the deepest mood threshold reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityState {
    pub mood: Mood,
    /// Count of mood thresholds crossed; never decreases within a battle.
    pub phase_index: usize,
}

/// How a queued action picks its target when it is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum TargetRule {
    LowestDefense,
    LowestHp,
    HighestHp,
    HighestThreat,
    SelfTarget,
    /// The action takes no target.
    None,
}

/// One step of a multi-turn plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAction {
    pub kind: ActionKind,
    pub skill: Option<SkillId>,
    pub target: TargetRule,
    pub reasoning: String,
}

impl PlannedAction {
    pub fn skill(skill: SkillId, target: TargetRule, reasoning: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::UseSkill,
            skill: Some(skill),
            target,
            reasoning: reasoning.into(),
        }
    }

    pub fn defend(reasoning: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Defend,
            skill: None,
            target: TargetRule::None,
            reasoning: reasoning.into(),
        }
    }
}

/// Bounded FIFO of recent opponent signatures plus lifetime counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternHistory {
    recent: ArrayVec<String, PATTERN_CAPACITY>,
    counts: BTreeMap<String, u32>,
}

impl PatternHistory {
    /// Appends a signature, evicting the oldest entry once full.
    ///
    /// Counts are only maintained when `learn` is set.
    pub fn record(&mut self, signature: &str, learn: bool) {
        if self.recent.is_full() {
            self.recent.remove(0);
        }
        self.recent.push(signature.to_owned());

        if learn {
            *self.counts.entry(signature.to_owned()).or_default() += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    /// Oldest first.
    pub fn entries(&self) -> &[String] {
        &self.recent
    }

    /// The last `n` entries (fewer if the history is shorter), oldest first.
    pub fn last(&self, n: usize) -> &[String] {
        let start = self.recent.len().saturating_sub(n);
        &self.recent[start..]
    }

    pub fn count(&self, signature: &str) -> u32 {
        self.counts.get(signature).copied().unwrap_or(0)
    }

    /// Most frequently learned signature; ties go to the lexically smallest.
    pub fn most_common(&self) -> Option<(&str, u32)> {
        self.counts
            .iter()
            .fold(None, |best: Option<(&str, u32)>, (signature, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((signature.as_str(), count)),
            })
    }

    pub fn clear(&mut self) {
        self.recent.clear();
        self.counts.clear();
    }
}

/// Action type part of a `"<ActionType>:<Detail>"` signature.
pub fn action_type(signature: &str) -> &str {
    signature.split(':').next().unwrap_or(signature)
}
