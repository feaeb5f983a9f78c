//! Boss encounter loader.

use std::path::Path;

use crate::encounter::Encounter;
use crate::loaders::{LoadResult, read_file};

/// The encounter shipped with the crate.
const CRYPT_LORD: &str = include_str!("../../data/encounters/crypt_lord.ron");

/// Loader for encounters from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load and validate an encounter from a RON file.
    pub fn load(path: &Path) -> LoadResult<Encounter> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid encounter {}: {}", path.display(), e))
    }

    /// Parse and validate encounter RON from a string.
    ///
    /// Phase thresholds must lie in `0.0..=1.0` and never increase, and at
    /// least one phase is required.
    pub fn parse(content: &str) -> LoadResult<Encounter> {
        let encounter: Encounter = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter RON: {}", e))?;

        encounter.validate()?;
        Ok(encounter)
    }

    /// The bundled default encounter.
    pub fn bundled() -> LoadResult<Encounter> {
        Self::parse(CRYPT_LORD)
    }
}
