//! In-memory BalanceRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::balance::BalanceProfile;
use crate::repository::{BalanceRepository, RepositoryError, Result};

/// Keeps profiles in a map keyed by opponent id.
#[derive(Default)]
pub struct InMemoryBalanceRepository {
    profiles: RwLock<HashMap<String, BalanceProfile>>,
}

impl InMemoryBalanceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BalanceRepository for InMemoryBalanceRepository {
    fn save(&self, profile: &BalanceProfile) -> Result<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        profiles.insert(profile.opponent_id.clone(), profile.clone());
        Ok(())
    }

    fn load(&self, opponent_id: &str) -> Result<Option<BalanceProfile>> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(profiles.get(opponent_id).cloned())
    }

    fn delete(&self, opponent_id: &str) -> Result<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        profiles.remove(opponent_id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<String> = profiles.keys().cloned().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
