//! Data model shared by the combat decision engine and its tooling.
//!
//! `combat-core` defines the canonical combat vocabulary (actors, skills,
//! decisions, tuning configuration, boss phase definitions) and a seedable
//! random source. It makes no decisions itself: the arbitration cascade, the
//! phase controller and the balancer live in `combat-runtime`, and content
//! files are parsed by `combat-content`.
pub mod config;
pub mod decision;
pub mod error;
pub mod mood;
pub mod phase;
pub mod rng;
pub mod skill;
pub mod stats;

pub use config::{AiConfig, ModuleFlags, Preset};
pub use decision::{ActionKind, Decision, DecisionSource, signature};
pub use error::ConfigError;
pub use mood::Mood;
pub use phase::{AiAdjustments, BossPhase, ParameterOverrides, StatMultipliers, validate_phases};
pub use rng::{FixedRoll, PcgRandom, RandomSource, compute_seed};
pub use skill::{Skill, SkillId, SkillKind, SkillTarget};
pub use stats::{ActorId, ActorStats};
