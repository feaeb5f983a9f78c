//! Data-driven combat content and loaders.
//!
//! This crate holds hand-authored content for the decision engine:
//! - Difficulty presets with per-field overrides (TOML)
//! - Boss encounters with their phase scripts (RON)
//!
//! All loaders deserialize `combat-core` types directly and validate them
//! before handing them to the runtime.

pub mod encounter;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use encounter::Encounter;

#[cfg(feature = "loaders")]
pub use loaders::{EncounterLoader, PresetLoader, PresetSpec};
