//! Personality moods.

/// Emotional state of an actor, driving aggression and recklessness.
///
/// Moods only change when health crosses a descending threshold or when a
/// boss phase explicitly overrides them; time alone never moves them.
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Mood {
    #[default]
    Calm,
    Cautious,
    Confident,
    Angry,
    Desperate,
    Calculating,
    Berserk,
}

impl Mood {
    /// Aggression change applied when the actor enters this mood.
    pub const fn aggression_delta(self) -> i32 {
        match self {
            Mood::Calm => 0,
            Mood::Cautious => -10,
            Mood::Confident => 10,
            Mood::Angry => 20,
            Mood::Desperate => 30,
            Mood::Calculating => -5,
            Mood::Berserk => 40,
        }
    }

    /// Recklessness change applied when the actor enters this mood.
    pub const fn recklessness_delta(self) -> i32 {
        match self {
            Mood::Calm => 0,
            Mood::Cautious => -10,
            Mood::Confident => 0,
            Mood::Angry => 15,
            Mood::Desperate => 30,
            Mood::Calculating => -15,
            Mood::Berserk => 40,
        }
    }
}
