//! Encounter definitions: a boss, its escort, the party facing them and the
//! boss's phase script.

use combat_core::{ActorStats, AiConfig, BossPhase, ConfigError, Preset, validate_phases};

/// A hand-authored boss encounter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub boss: ActorStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub minions: Vec<ActorStats>,
    /// Player-side combatants. Empty means the caller supplies its own party.
    #[cfg_attr(feature = "serde", serde(default))]
    pub party: Vec<ActorStats>,
    /// Difficulty bundle used for minions, and for the boss unless `config` is set.
    #[cfg_attr(feature = "serde", serde(default))]
    pub preset: Preset,
    #[cfg_attr(feature = "serde", serde(default))]
    pub config: Option<AiConfig>,
    pub phases: Vec<BossPhase>,
}

impl Encounter {
    /// Engine configuration for the boss.
    pub fn boss_config(&self) -> AiConfig {
        self.config
            .clone()
            .unwrap_or_else(|| self.preset.config())
    }

    /// Engine configuration for every minion.
    pub fn minion_config(&self) -> AiConfig {
        self.preset.config()
    }

    /// Checks the phase script and any explicit boss configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_phases(&self.phases)?;
        if let Some(config) = &self.config {
            config.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encounter(phases: Vec<BossPhase>) -> Encounter {
        Encounter {
            name: "Test".into(),
            description: String::new(),
            boss: ActorStats::new(1, "Boss"),
            minions: Vec::new(),
            party: Vec::new(),
            preset: Preset::Hard,
            config: None,
            phases,
        }
    }

    #[test]
    fn test_boss_config_falls_back_to_preset() {
        let mut enc = encounter(vec![BossPhase::new("Only", 1.0)]);
        assert_eq!(enc.boss_config(), Preset::Hard.config());

        enc.config = Some(Preset::Story.config());
        assert_eq!(enc.boss_config(), Preset::Story.config());
        assert_eq!(enc.minion_config(), Preset::Hard.config());
    }

    #[test]
    fn test_validate_requires_phases() {
        assert_eq!(encounter(Vec::new()).validate(), Err(ConfigError::NoPhases));
        assert!(encounter(vec![BossPhase::new("Only", 1.0)]).validate().is_ok());
    }
}
