//! Validation errors for hand-authored configuration.
//!
//! The decision core never fails at runtime (it degrades to a forced pass);
//! these errors only surface when configuration or phase scripts are built or
//! loaded from content files.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("mood thresholds must be fractions in descending order, got {0:?}")]
    MoodThresholds([f32; 3]),

    #[error("an encounter needs at least one boss phase")]
    NoPhases,

    #[error("phase `{name}` threshold {threshold} is outside 0.0..=1.0")]
    PhaseThreshold { name: String, threshold: f32 },

    #[error("phase `{name}` threshold {threshold} is above the preceding threshold {previous}")]
    PhaseOrder {
        name: String,
        threshold: f32,
        previous: f32,
    },

    #[error("phase `{name}` {field} must be within 0.0..=1.0, got {value}")]
    PhaseFraction {
        name: String,
        field: &'static str,
        value: f32,
    },

    #[error("phase `{name}` {field} multiplier must be positive, got {value}")]
    PhaseMultiplier {
        name: String,
        field: &'static str,
        value: f32,
    },
}
