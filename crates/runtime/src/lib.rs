//! Decision runtime for turn-based NPC combat.
//!
//! This crate turns the static types of `combat-core` into behavior: a
//! per-actor [`DecisionEngine`] that arbitrates a fixed cascade of decision
//! modules, a [`BossPhaseController`] that escalates bosses as their health
//! falls, and a [`Balancer`] that tunes difficulty across battles.
//!
//! Modules are organized by responsibility:
//! - [`engine`] hosts the decision engine, its per-battle state and the cascade
//! - [`phase`] drives multi-phase boss encounters
//! - [`balance`] records battle outcomes and generates configurations
//! - [`api`] exposes the registry and error types downstream clients use
//! - [`events`] provides a topic-based event bus for observers
//! - [`repository`] persists balance profiles
pub mod api;
pub mod balance;
pub mod engine;
pub mod events;
pub mod phase;
pub mod repository;

pub use api::{EngineRegistry, Result, RuntimeError};
pub use balance::{
    BalanceProfile, Balancer, BalancerConfig, BattleReport, config_for, performance_score,
};
pub use engine::{
    DecisionContext, DecisionEngine, DecisionModule, EngineSnapshot, EngineState, ModuleKind,
    PatternHistory, PlannedAction, TargetRule,
};
pub use events::{BalanceEvent, DecisionEvent, Event, EventBus, PhaseEvent, Topic};
pub use phase::BossPhaseController;
pub use repository::{
    BalanceRepository, FileBalanceRepository, InMemoryBalanceRepository, RepositoryError,
};
