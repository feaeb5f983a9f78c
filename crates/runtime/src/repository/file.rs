//! File-based BalanceRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::balance::BalanceProfile;
use crate::repository::{BalanceRepository, RepositoryError, Result};

/// Stores each profile as `profile_{opponent}.json` under a base directory.
///
/// Opponent ids are sanitized for the file name; the original id is kept
/// inside the document, so [`BalanceRepository::list`] reads it back from
/// there rather than from the file name.
pub struct FileBalanceRepository {
    base_dir: PathBuf,
}

impl FileBalanceRepository {
    /// Create a repository rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn profile_path(&self, opponent_id: &str) -> PathBuf {
        let stem: String = opponent_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_dir.join(format!("profile_{}.json", stem))
    }

    fn read_profile(path: &Path) -> Result<BalanceProfile> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| RepositoryError::CorruptedData {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl BalanceRepository for FileBalanceRepository {
    fn save(&self, profile: &BalanceProfile) -> Result<()> {
        let path = self.profile_path(&profile.opponent_id);
        let temp_path = path.with_extension("json.tmp");

        let json = serde_json::to_vec_pretty(profile)
            .map_err(|e| RepositoryError::Json(e.to_string()))?;

        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(
            "Saved balance profile '{}' to {}",
            profile.opponent_id,
            path.display()
        );

        Ok(())
    }

    fn load(&self, opponent_id: &str) -> Result<Option<BalanceProfile>> {
        let path = self.profile_path(opponent_id);
        if !path.exists() {
            return Ok(None);
        }

        let profile = Self::read_profile(&path)?;
        tracing::debug!(
            "Loaded balance profile '{}' from {}",
            opponent_id,
            path.display()
        );

        Ok(Some(profile))
    }

    fn delete(&self, opponent_id: &str) -> Result<()> {
        let path = self.profile_path(opponent_id);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted balance profile '{}'", opponent_id);
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            let is_profile = path
                .file_name()
                .and_then(|s| s.to_str())
                .is_some_and(|name| name.starts_with("profile_") && name.ends_with(".json"));

            if is_profile {
                ids.push(Self::read_profile(&path)?.opponent_id);
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileBalanceRepository::new(dir.path()).unwrap();

        let mut profile = BalanceProfile::new("Crypt Lord");
        profile.record(true, 72.5);
        repo.save(&profile).unwrap();

        assert_eq!(repo.load("Crypt Lord").unwrap(), Some(profile));
        assert_eq!(repo.list().unwrap(), vec!["Crypt Lord".to_string()]);
        assert!(dir.path().join("profile_Crypt_Lord.json").exists());
    }

    #[test]
    fn test_missing_profile_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileBalanceRepository::new(dir.path()).unwrap();
        assert_eq!(repo.load("nobody").unwrap(), None);
        repo.delete("nobody").unwrap();
    }

    #[test]
    fn test_corrupted_profile_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileBalanceRepository::new(dir.path()).unwrap();
        fs::write(dir.path().join("profile_broken.json"), b"{ not json").unwrap();

        assert!(matches!(
            repo.load("broken"),
            Err(RepositoryError::CorruptedData { .. })
        ));
    }
}
