//! Difficulty preset loader.
//!
//! A preset file names a base [`Preset`] and overrides individual fields:
//!
//! ```toml
//! base = "hard"
//! aggression = 80
//! modules = "COORDINATION | PREDICTION | BAITING"
//! ```

use std::path::Path;

use combat_core::{AiConfig, ModuleFlags, Preset};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// On-disk form of a tuned preset.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresetSpec {
    pub base: Preset,
    pub aggression: Option<u8>,
    pub recklessness: Option<u8>,
    pub skill_usage_rate: Option<u8>,
    pub planning_depth: Option<u8>,
    pub teamwork_priority: Option<u8>,
    pub risk_tolerance: Option<u8>,
    pub mp_conservation_threshold: Option<u8>,
    pub prediction_accuracy: Option<u8>,
    /// Replaces the base preset's module set.
    pub modules: Option<ModuleFlags>,
    pub mood_thresholds: Option<[f32; 3]>,
    pub reserve_until_phase: Option<usize>,
    pub allow_flee: Option<bool>,
}

impl PresetSpec {
    /// Applies the overrides on top of the base preset. Values are not clamped.
    pub fn resolve(&self) -> AiConfig {
        let mut config = self.base.config();

        let percentages = [
            (&mut config.aggression, self.aggression),
            (&mut config.recklessness, self.recklessness),
            (&mut config.skill_usage_rate, self.skill_usage_rate),
            (&mut config.planning_depth, self.planning_depth),
            (&mut config.teamwork_priority, self.teamwork_priority),
            (&mut config.risk_tolerance, self.risk_tolerance),
            (&mut config.mp_conservation_threshold, self.mp_conservation_threshold),
            (&mut config.prediction_accuracy, self.prediction_accuracy),
        ];
        for (slot, value) in percentages {
            if let Some(value) = value {
                *slot = value;
            }
        }

        if let Some(modules) = self.modules {
            config.modules = modules;
        }
        if let Some(thresholds) = self.mood_thresholds {
            config.mood_thresholds = thresholds;
        }
        if let Some(phase) = self.reserve_until_phase {
            config.reserve_until_phase = phase;
        }
        if let Some(allow) = self.allow_flee {
            config.allow_flee = allow;
        }

        config
    }
}

/// Loader for engine configuration from TOML files.
pub struct PresetLoader;

impl PresetLoader {
    /// Load a preset file and resolve it to a validated configuration.
    pub fn load(path: &Path) -> LoadResult<AiConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid preset {}: {}", path.display(), e))
    }

    /// Parse preset TOML from a string.
    pub fn parse(content: &str) -> LoadResult<AiConfig> {
        let spec: PresetSpec = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse preset TOML: {}", e))?;

        let config = spec.resolve();
        config.validate()?;
        Ok(config)
    }
}
