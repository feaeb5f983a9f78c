//! Boss phase definitions.
//!
//! A boss fight is an ordered list of [`BossPhase`]s, each bounded by a health
//! fraction threshold. Phases are immutable once built; the phase controller in
//! `combat-runtime` consumes them and applies their deltas on entry.

use crate::config::{AiConfig, ModuleFlags};
use crate::error::ConfigError;
use crate::mood::Mood;
use crate::stats::ActorStats;

/// Absolute parameter values a phase may impose on entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParameterOverrides {
    pub planning_depth: Option<u8>,
    pub teamwork_priority: Option<u8>,
    pub risk_tolerance: Option<u8>,
    pub mp_conservation_threshold: Option<u8>,
    pub prediction_accuracy: Option<u8>,
}

/// Changes to the decision engine applied when a phase begins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiAdjustments {
    pub aggression: i32,
    pub recklessness: i32,
    pub skill_usage_rate: i32,
    /// Modules switched on by this phase (never switched off).
    pub enable: ModuleFlags,
    pub overrides: ParameterOverrides,
    /// Mood forced on entry, bypassing the health thresholds.
    pub mood: Option<Mood>,
}

impl AiAdjustments {
    /// Applies deltas, module enablement and overrides to `config`.
    ///
    /// The mood override is not part of the config; the engine applies it.
    pub fn apply_to(&self, config: &mut AiConfig) {
        config.adjust_aggression(self.aggression);
        config.adjust_recklessness(self.recklessness);
        config.adjust_skill_usage_rate(self.skill_usage_rate);
        config.enable(self.enable);

        let overrides = &self.overrides;
        if let Some(depth) = overrides.planning_depth {
            config.planning_depth =
                depth.clamp(AiConfig::MIN_PLANNING_DEPTH, AiConfig::MAX_PLANNING_DEPTH);
        }
        if let Some(value) = overrides.teamwork_priority {
            config.teamwork_priority = value.min(AiConfig::MAX_PARAMETER);
        }
        if let Some(value) = overrides.risk_tolerance {
            config.risk_tolerance = value.min(AiConfig::MAX_PARAMETER);
        }
        if let Some(value) = overrides.mp_conservation_threshold {
            config.mp_conservation_threshold = value.min(AiConfig::MAX_PARAMETER);
        }
        if let Some(value) = overrides.prediction_accuracy {
            config.prediction_accuracy = value.min(AiConfig::MAX_PARAMETER);
        }
    }
}

/// Multipliers applied to the boss's current stats (not its base stats).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatMultipliers {
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
    /// Applies to both magic attack and magic defense.
    pub magic: f32,
}

impl StatMultipliers {
    pub const IDENTITY: Self = Self {
        attack: 1.0,
        defense: 1.0,
        speed: 1.0,
        magic: 1.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Multiplies the actor's current stats, rounding to the nearest integer.
    pub fn apply_to(&self, stats: &mut ActorStats) {
        stats.attack = scale(stats.attack, self.attack);
        stats.defense = scale(stats.defense, self.defense);
        stats.speed = scale(stats.speed, self.speed);
        stats.magic_attack = scale(stats.magic_attack, self.magic);
        stats.magic_defense = scale(stats.magic_defense, self.magic);
    }
}

impl Default for StatMultipliers {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn scale(value: u32, multiplier: f32) -> u32 {
    (value as f32 * multiplier).round().max(0.0) as u32
}

/// One segment of a boss battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossPhase {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// The phase begins once health is at or below this fraction.
    pub hp_threshold: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub transition_message: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ai: AiAdjustments,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: StatMultipliers,
    /// Fraction of max HP restored on entry.
    #[cfg_attr(feature = "serde", serde(default))]
    pub heal_fraction: f32,
    /// Fraction of max MP restored on entry.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_restore_fraction: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enrage: bool,
    /// Opaque tags forwarded to presentation as events.
    #[cfg_attr(feature = "serde", serde(default))]
    pub special_mechanics: Vec<String>,
    /// Number of reinforcements requested on entry.
    #[cfg_attr(feature = "serde", serde(default))]
    pub summon_count: Option<u32>,
}

impl BossPhase {
    pub fn new(name: impl Into<String>, hp_threshold: f32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            hp_threshold,
            transition_message: None,
            ai: AiAdjustments::default(),
            stats: StatMultipliers::IDENTITY,
            heal_fraction: 0.0,
            mana_restore_fraction: 0.0,
            enrage: false,
            special_mechanics: Vec::new(),
            summon_count: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.transition_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_ai(mut self, ai: AiAdjustments) -> Self {
        self.ai = ai;
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: StatMultipliers) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_heal(mut self, fraction: f32) -> Self {
        self.heal_fraction = fraction;
        self
    }

    #[must_use]
    pub fn with_mana_restore(mut self, fraction: f32) -> Self {
        self.mana_restore_fraction = fraction;
        self
    }

    #[must_use]
    pub fn enraged(mut self) -> Self {
        self.enrage = true;
        self
    }

    #[must_use]
    pub fn with_mechanic(mut self, tag: impl Into<String>) -> Self {
        self.special_mechanics.push(tag.into());
        self
    }

    #[must_use]
    pub fn with_summon(mut self, count: u32) -> Self {
        self.summon_count = Some(count);
        self
    }

    /// Checks the phase's own fractions and multipliers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.hp_threshold) {
            return Err(ConfigError::PhaseThreshold {
                name: self.name.clone(),
                threshold: self.hp_threshold,
            });
        }

        for (field, value) in [
            ("heal_fraction", self.heal_fraction),
            ("mana_restore_fraction", self.mana_restore_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::PhaseFraction {
                    name: self.name.clone(),
                    field,
                    value,
                });
            }
        }

        let multipliers = self.stats;
        for (field, value) in [
            ("attack", multipliers.attack),
            ("defense", multipliers.defense),
            ("speed", multipliers.speed),
            ("magic", multipliers.magic),
        ] {
            // NaN fails the comparison as well.
            if !(value > 0.0) {
                return Err(ConfigError::PhaseMultiplier {
                    name: self.name.clone(),
                    field,
                    value,
                });
            }
        }

        Ok(())
    }
}

/// Validates a full phase script: non-empty, each phase valid, thresholds non-increasing.
pub fn validate_phases(phases: &[BossPhase]) -> Result<(), ConfigError> {
    if phases.is_empty() {
        return Err(ConfigError::NoPhases);
    }

    let mut previous: Option<f32> = None;
    for phase in phases {
        phase.validate()?;
        if let Some(previous) = previous
            && phase.hp_threshold > previous
        {
            return Err(ConfigError::PhaseOrder {
                name: phase.name.clone(),
                threshold: phase.hp_threshold,
                previous,
            });
        }
        previous = Some(phase.hp_threshold);
    }

    Ok(())
}
