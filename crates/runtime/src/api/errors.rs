//! Unified error types surfaced by the runtime API.
//!
//! The decision cascade itself never fails; these errors only come from the
//! edges: validating hand-authored configuration, persisting balance profiles
//! and encoding engine snapshots.

use combat_core::{ActorId, ConfigError};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("invalid engine configuration")]
    Config(#[from] ConfigError),

    #[error("failed to encode engine snapshot")]
    SnapshotEncode(#[source] bincode::Error),

    #[error("failed to decode engine snapshot")]
    SnapshotDecode(#[source] bincode::Error),

    #[error("snapshot for {found} cannot be restored into the engine of {expected}")]
    SnapshotActorMismatch { expected: ActorId, found: ActorId },
}
