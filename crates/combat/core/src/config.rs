//! Tunable decision-engine configuration.
//!
//! [`AiConfig`] is fed either by a hand-authored [`Preset`], by a content file,
//! or by the balancer's difficulty generator. Boss phases and the personality
//! state machine mutate it during a battle; every mutation goes through the
//! clamping helpers below so parameters never leave their documented ranges.

use bitflags::bitflags;

use crate::error::ConfigError;

bitflags! {
    /// Decision modules and behaviours that can be switched on per actor.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ModuleFlags: u16 {
        /// Multi-turn combo planning.
        const STRATEGIC_PLANNING        = 1 << 0;
        /// Ally protection and focus fire.
        const COORDINATION              = 1 << 1;
        /// Reacting to the opponent's recent action signatures.
        const PREDICTION                = 1 << 2;
        /// Pre-emptive heals against predicted focus attacks.
        const COUNTER_PREDICTION        = 1 << 3;
        /// Occasionally feigning weakness.
        const BAITING                   = 1 << 4;
        /// Momentum-sensitive risk evaluation.
        const RISK_ASSESSMENT           = 1 << 5;
        /// All-in gambles when the battle is being lost.
        const DESPERATION_MOVES         = 1 << 6;
        /// Plain attacks when the battle is being won.
        const CONSERVATIVE_WHEN_WINNING = 1 << 7;
        /// Withholding costly actions when mana runs low.
        const RESOURCE_MANAGEMENT       = 1 << 8;
        /// Saving resources until a later boss phase.
        const SAVE_FOR_LATER_PHASES     = 1 << 9;
        /// Momentum-driven rubber-banding of aggression.
        const ADAPTIVE_DIFFICULTY       = 1 << 10;
        /// Ingesting opponent action signatures.
        const PATTERN_LEARNING          = 1 << 11;
        /// Health-driven mood changes.
        const PERSONALITY_EVOLUTION     = 1 << 12;
    }
}

/// Engine tuning parameters. Percentages are 0-100.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiConfig {
    /// Preference for damage over safety.
    pub aggression: u8,
    /// Willingness to ignore own health when choosing actions.
    pub recklessness: u8,
    /// Chance per turn that the baseline scorer considers skills at all.
    pub skill_usage_rate: u8,
    /// How many turns ahead the planner may commit (1-5).
    pub planning_depth: u8,
    /// Chance per turn that coordination is considered.
    pub teamwork_priority: u8,
    /// Calculated-risk plays are taken while the risk score stays below this.
    pub risk_tolerance: u8,
    /// Conserve when MP percentage drops below this.
    pub mp_conservation_threshold: u8,
    /// Chance that a recognised opponent pattern is acted upon.
    pub prediction_accuracy: u8,
    pub modules: ModuleFlags,
    /// Health fractions at which the mood escalates, highest first.
    pub mood_thresholds: [f32; 3],
    /// Boss phase index resources are saved for.
    pub reserve_until_phase: usize,
    /// Whether the baseline scorer may pick [`crate::ActionKind::Flee`].
    pub allow_flee: bool,
}

impl AiConfig {
    pub const MAX_PARAMETER: u8 = 100;
    pub const MIN_PLANNING_DEPTH: u8 = 1;
    pub const MAX_PLANNING_DEPTH: u8 = 5;
    pub const DEFAULT_MOOD_THRESHOLDS: [f32; 3] = [0.7, 0.4, 0.2];
    pub const DEFAULT_RESERVE_PHASE: usize = 2;

    pub fn new() -> Self {
        Preset::Normal.config()
    }

    pub fn is_enabled(&self, flags: ModuleFlags) -> bool {
        self.modules.contains(flags)
    }

    pub fn enable(&mut self, flags: ModuleFlags) {
        self.modules.insert(flags);
    }

    pub fn disable(&mut self, flags: ModuleFlags) {
        self.modules.remove(flags);
    }

    #[must_use]
    pub fn with_modules(mut self, flags: ModuleFlags) -> Self {
        self.modules = flags;
        self
    }

    #[must_use]
    pub fn with_aggression(mut self, value: u8) -> Self {
        self.aggression = value.min(Self::MAX_PARAMETER);
        self
    }

    #[must_use]
    pub fn with_recklessness(mut self, value: u8) -> Self {
        self.recklessness = value.min(Self::MAX_PARAMETER);
        self
    }

    #[must_use]
    pub fn with_skill_usage_rate(mut self, value: u8) -> Self {
        self.skill_usage_rate = value.min(Self::MAX_PARAMETER);
        self
    }

    #[must_use]
    pub fn with_planning_depth(mut self, value: u8) -> Self {
        self.planning_depth = value.clamp(Self::MIN_PLANNING_DEPTH, Self::MAX_PLANNING_DEPTH);
        self
    }

    #[must_use]
    pub fn with_teamwork_priority(mut self, value: u8) -> Self {
        self.teamwork_priority = value.min(Self::MAX_PARAMETER);
        self
    }

    #[must_use]
    pub fn with_risk_tolerance(mut self, value: u8) -> Self {
        self.risk_tolerance = value.min(Self::MAX_PARAMETER);
        self
    }

    #[must_use]
    pub fn with_mp_conservation_threshold(mut self, value: u8) -> Self {
        self.mp_conservation_threshold = value.min(Self::MAX_PARAMETER);
        self
    }

    #[must_use]
    pub fn with_prediction_accuracy(mut self, value: u8) -> Self {
        self.prediction_accuracy = value.min(Self::MAX_PARAMETER);
        self
    }

    pub fn adjust_aggression(&mut self, delta: i32) {
        self.aggression = apply_delta(self.aggression, delta);
    }

    pub fn adjust_recklessness(&mut self, delta: i32) {
        self.recklessness = apply_delta(self.recklessness, delta);
    }

    pub fn adjust_skill_usage_rate(&mut self, delta: i32) {
        self.skill_usage_rate = apply_delta(self.skill_usage_rate, delta);
    }

    /// Returns a copy with every parameter forced into its documented range.
    ///
    /// The decision engine applies this to every configuration it accepts;
    /// content loaders reject out-of-range files through [`AiConfig::validate`]
    /// instead.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        for value in [
            &mut self.aggression,
            &mut self.recklessness,
            &mut self.skill_usage_rate,
            &mut self.teamwork_priority,
            &mut self.risk_tolerance,
            &mut self.mp_conservation_threshold,
            &mut self.prediction_accuracy,
        ] {
            *value = (*value).min(Self::MAX_PARAMETER);
        }
        self.planning_depth = self
            .planning_depth
            .clamp(Self::MIN_PLANNING_DEPTH, Self::MAX_PLANNING_DEPTH);
        self
    }

    /// Validates parameter ranges and mood threshold ordering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let percentages = [
            ("aggression", self.aggression),
            ("recklessness", self.recklessness),
            ("skill_usage_rate", self.skill_usage_rate),
            ("teamwork_priority", self.teamwork_priority),
            ("risk_tolerance", self.risk_tolerance),
            ("mp_conservation_threshold", self.mp_conservation_threshold),
            ("prediction_accuracy", self.prediction_accuracy),
        ];
        for (field, value) in percentages {
            if value > Self::MAX_PARAMETER {
                return Err(ConfigError::OutOfRange {
                    field,
                    value: value as i64,
                    min: 0,
                    max: Self::MAX_PARAMETER as i64,
                });
            }
        }

        if !(Self::MIN_PLANNING_DEPTH..=Self::MAX_PLANNING_DEPTH).contains(&self.planning_depth) {
            return Err(ConfigError::OutOfRange {
                field: "planning_depth",
                value: self.planning_depth as i64,
                min: Self::MIN_PLANNING_DEPTH as i64,
                max: Self::MAX_PLANNING_DEPTH as i64,
            });
        }

        let thresholds = self.mood_thresholds;
        let in_range = thresholds.iter().all(|t| (0.0..=1.0).contains(t));
        let descending = thresholds.windows(2).all(|pair| pair[0] >= pair[1]);
        if !in_range || !descending {
            return Err(ConfigError::MoodThresholds(thresholds));
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_delta(value: u8, delta: i32) -> u8 {
    (value as i32 + delta).clamp(0, AiConfig::MAX_PARAMETER as i32) as u8
}

/// Hand-authored difficulty bundles.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Preset {
    /// Forgiving opponents that rarely use their kit.
    Story,
    #[default]
    Normal,
    Hard,
    /// Every module enabled at high settings.
    Nightmare,
}

impl Preset {
    pub fn config(self) -> AiConfig {
        let base = ModuleFlags::PERSONALITY_EVOLUTION | ModuleFlags::PATTERN_LEARNING;
        match self {
            Preset::Story => AiConfig {
                aggression: 30,
                recklessness: 10,
                skill_usage_rate: 30,
                planning_depth: 1,
                teamwork_priority: 20,
                risk_tolerance: 20,
                mp_conservation_threshold: 0,
                prediction_accuracy: 0,
                modules: base,
                mood_thresholds: AiConfig::DEFAULT_MOOD_THRESHOLDS,
                reserve_until_phase: AiConfig::DEFAULT_RESERVE_PHASE,
                allow_flee: false,
            },
            Preset::Normal => AiConfig {
                aggression: 50,
                recklessness: 30,
                skill_usage_rate: 50,
                planning_depth: 2,
                teamwork_priority: 40,
                risk_tolerance: 40,
                mp_conservation_threshold: 20,
                prediction_accuracy: 30,
                modules: base | ModuleFlags::RESOURCE_MANAGEMENT | ModuleFlags::COORDINATION,
                mood_thresholds: AiConfig::DEFAULT_MOOD_THRESHOLDS,
                reserve_until_phase: AiConfig::DEFAULT_RESERVE_PHASE,
                allow_flee: false,
            },
            Preset::Hard => AiConfig {
                aggression: 70,
                recklessness: 45,
                skill_usage_rate: 70,
                planning_depth: 3,
                teamwork_priority: 60,
                risk_tolerance: 55,
                mp_conservation_threshold: 25,
                prediction_accuracy: 60,
                modules: base
                    | ModuleFlags::RESOURCE_MANAGEMENT
                    | ModuleFlags::COORDINATION
                    | ModuleFlags::STRATEGIC_PLANNING
                    | ModuleFlags::RISK_ASSESSMENT
                    | ModuleFlags::DESPERATION_MOVES
                    | ModuleFlags::PREDICTION
                    | ModuleFlags::COUNTER_PREDICTION
                    | ModuleFlags::ADAPTIVE_DIFFICULTY,
                mood_thresholds: AiConfig::DEFAULT_MOOD_THRESHOLDS,
                reserve_until_phase: AiConfig::DEFAULT_RESERVE_PHASE,
                allow_flee: false,
            },
            Preset::Nightmare => AiConfig {
                aggression: 85,
                recklessness: 60,
                skill_usage_rate: 85,
                planning_depth: 5,
                teamwork_priority: 80,
                risk_tolerance: 70,
                mp_conservation_threshold: 30,
                prediction_accuracy: 85,
                modules: ModuleFlags::all(),
                mood_thresholds: AiConfig::DEFAULT_MOOD_THRESHOLDS,
                reserve_until_phase: AiConfig::DEFAULT_RESERVE_PHASE,
                allow_flee: false,
            },
        }
    }
}
