//! Boss phase state machine.
//!
//! A [`BossPhaseController`] watches one boss's health and, when it falls
//! past the next phase's threshold, escalates the boss: the owning
//! [`DecisionEngine`](crate::engine::DecisionEngine) gets new parameters and
//! the boss's stats are scaled, healed or enraged in place.

mod controller;

pub use controller::BossPhaseController;
