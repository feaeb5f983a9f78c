//! Decision modules evaluated by the engine's priority cascade.
//!
//! # Cascade
//!
//! ```text
//! StrategicPlanner ──▶ Coordination ──▶ Prediction ──▶ RiskEvaluator ──▶ ResourceManager
//!        │                                                                     │
//!        └──────────── first Some(decision) wins ─────────────────────────────┘
//!                                   │ none fired
//!                                   ▼
//!                          BaselineScorer (+ plan build)
//! ```
//!
//! Every module is stateless and implements [`DecisionModule`]; the order is
//! fixed by [`cascade`]. Personality evolution runs before the cascade and is
//! not a decision module.

pub mod baseline;
pub mod coordination;
pub mod personality;
pub mod planner;
pub mod prediction;
pub mod resource;
pub mod risk;

use combat_core::{AiConfig, Decision};

use super::context::DecisionContext;

pub use baseline::{BaselineScorer, Score};
pub use coordination::Coordination;
pub use personality::{MoodChange, PersonalityMachine};
pub use planner::StrategicPlanner;
pub use prediction::Prediction;
pub use resource::ResourceManager;
pub use risk::{RiskEvaluator, risk_score};

/// Identifies a cascade stage in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ModuleKind {
    Planner,
    Coordination,
    Prediction,
    Risk,
    Resource,
}

/// One stage of the arbitration cascade.
pub trait DecisionModule: Send + Sync {
    fn kind(&self) -> ModuleKind;

    /// Whether the stage runs at all under `config`.
    fn is_enabled(&self, config: &AiConfig) -> bool;

    /// Returns a decision, or `None` to let the cascade continue.
    ///
    /// Modules never fail: a missing skill or target is simply `None`.
    fn evaluate(&self, ctx: &mut DecisionContext<'_>) -> Option<Decision>;
}

/// The modules in priority order.
pub fn cascade() -> Vec<Box<dyn DecisionModule>> {
    vec![
        Box::new(StrategicPlanner),
        Box::new(Coordination),
        Box::new(Prediction),
        Box::new(RiskEvaluator),
        Box::new(ResourceManager),
    ]
}
