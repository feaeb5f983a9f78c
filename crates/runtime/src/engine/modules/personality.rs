//! Health-driven mood evolution.

use combat_core::{AiConfig, Mood};

use crate::engine::state::PersonalityState;

/// Mood entered at each threshold index, shallowest first.
pub const THRESHOLD_MOODS: [Mood; 3] = [Mood::Cautious, Mood::Angry, Mood::Desperate];

/// A mood transition produced by [`PersonalityMachine::update`] or a phase override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodChange {
    pub from: Mood,
    pub to: Mood,
    pub phase_index: usize,
}

pub struct PersonalityMachine;

impl PersonalityMachine {
    /// Number of configured thresholds at or above `hp_fraction`.
    pub fn threshold_index(thresholds: &[f32; 3], hp_fraction: f32) -> usize {
        thresholds.iter().filter(|&&t| hp_fraction <= t).count()
    }

    /// Advances the mood when health has fallen past a deeper threshold.
    ///
    /// Never moves back up: healing does not calm the actor within a battle.
    /// An enraged (Berserk) actor stays Berserk; crossed thresholds are still
    /// consumed so they do not fire later.
    pub fn update(
        config: &mut AiConfig,
        personality: &mut PersonalityState,
        hp_fraction: f32,
    ) -> Option<MoodChange> {
        let index = Self::threshold_index(&config.mood_thresholds, hp_fraction);
        if index <= personality.phase_index {
            return None;
        }

        personality.phase_index = index;
        if personality.mood == Mood::Berserk {
            return None;
        }

        let mood = THRESHOLD_MOODS[index - 1];
        Some(Self::enter(config, personality, mood))
    }

    /// Sets `mood` and applies its aggression and recklessness deltas.
    pub fn enter(config: &mut AiConfig, personality: &mut PersonalityState, mood: Mood) -> MoodChange {
        let from = personality.mood;
        personality.mood = mood;
        config.adjust_aggression(mood.aggression_delta());
        config.adjust_recklessness(mood.recklessness_delta());

        MoodChange {
            from,
            to: mood,
            phase_index: personality.phase_index,
        }
    }
}
