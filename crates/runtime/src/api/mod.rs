//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on driving battles.

pub mod errors;
pub mod registry;

pub use errors::{RepositoryError, Result, RuntimeError};
pub use registry::EngineRegistry;
