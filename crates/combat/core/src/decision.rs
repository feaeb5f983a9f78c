//! The single action an actor commits to for one turn.
//!
//! A [`Decision`] is created fresh every turn and never persisted. The only
//! caller-visible failure of the decision core is a decision of kind
//! [`ActionKind::None`], which the integration layer treats as a forced pass.

use crate::skill::SkillId;
use crate::stats::ActorId;

/// What kind of action was chosen.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Attack,
    UseSkill,
    Defend,
    Flee,
    /// No valid action; the caller passes the turn.
    #[default]
    None,
}

/// Which stage of the arbitration cascade produced a decision.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DecisionSource {
    /// Drained from the strategic planner's queue.
    Plan,
    Coordination,
    Prediction,
    Risk,
    /// Resource manager withholding costly actions.
    Conservation,
    /// Fallback utility scorer.
    Baseline,
    /// Nothing could be decided.
    #[default]
    Unavailable,
}

/// One turn's action for one actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub kind: ActionKind,
    pub skill: Option<SkillId>,
    pub target: Option<ActorId>,
    /// Human-readable explanation, surfaced to logs and debugging UIs.
    pub reasoning: String,
    pub source: DecisionSource,
}

impl Decision {
    pub fn attack(target: ActorId, reasoning: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Attack,
            skill: None,
            target: Some(target),
            reasoning: reasoning.into(),
            source: DecisionSource::Baseline,
        }
    }

    pub fn use_skill(skill: SkillId, target: ActorId, reasoning: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::UseSkill,
            skill: Some(skill),
            target: Some(target),
            reasoning: reasoning.into(),
            source: DecisionSource::Baseline,
        }
    }

    pub fn defend(reasoning: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Defend,
            skill: None,
            target: None,
            reasoning: reasoning.into(),
            source: DecisionSource::Baseline,
        }
    }

    pub fn flee(reasoning: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Flee,
            skill: None,
            target: None,
            reasoning: reasoning.into(),
            source: DecisionSource::Baseline,
        }
    }

    /// The forced-pass decision.
    pub fn none(reasoning: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::None,
            skill: None,
            target: None,
            reasoning: reasoning.into(),
            source: DecisionSource::Unavailable,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: DecisionSource) -> Self {
        self.source = source;
        self
    }

    pub fn is_none(&self) -> bool {
        self.kind == ActionKind::None
    }
}

/// Builds a pattern signature of the form `"<ActionType>:<SkillOrCategory>"`.
///
/// Without a detail the signature is the bare action type (`"Defend"`).
pub fn signature(kind: ActionKind, detail: Option<&str>) -> String {
    match detail {
        Some(detail) if !detail.is_empty() => format!("{}:{}", kind, detail),
        _ => kind.to_string(),
    }
}
