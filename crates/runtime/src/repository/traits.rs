//! Repository contract for balance profiles.

use crate::balance::BalanceProfile;
use crate::repository::Result;

/// Persistence for per-opponent balance profiles.
///
/// Profiles are keyed by their `opponent_id`. The balancer itself never
/// touches storage; callers load profiles before a session and save them
/// after each recorded battle.
pub trait BalanceRepository: Send + Sync {
    /// Save (or overwrite) a profile.
    fn save(&self, profile: &BalanceProfile) -> Result<()>;

    /// Load a profile by opponent id.
    fn load(&self, opponent_id: &str) -> Result<Option<BalanceProfile>>;

    /// Delete a profile. Missing profiles are not an error.
    fn delete(&self, opponent_id: &str) -> Result<()>;

    /// List the opponent ids of all stored profiles, sorted.
    fn list(&self) -> Result<Vec<String>>;

    /// Load every stored profile.
    fn load_all(&self) -> Result<Vec<BalanceProfile>> {
        let mut profiles = Vec::new();
        for id in self.list()? {
            if let Some(profile) = self.load(&id)? {
                profiles.push(profile);
            }
        }
        Ok(profiles)
    }
}
