//! Mid-battle engine snapshots.

use combat_core::{ActorId, AiConfig};
use serde::{Deserialize, Serialize};

use super::state::EngineState;
use crate::api::{Result, RuntimeError};

/// Everything needed to resume a [`DecisionEngine`](super::DecisionEngine)
/// for the same actor: its live configuration and per-battle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub actor: ActorId,
    pub config: AiConfig,
    pub state: EngineState,
}

impl EngineSnapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(RuntimeError::SnapshotEncode)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(RuntimeError::SnapshotDecode)
    }
}
