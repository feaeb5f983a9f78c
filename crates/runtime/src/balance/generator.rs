//! Difficulty to configuration.

use combat_core::{AiConfig, ModuleFlags, Preset};

/// Difficulty at which each module tier switches on.
pub const TIER_THRESHOLDS: [f32; 5] = [30.0, 50.0, 65.0, 75.0, 85.0];

const TIERS: [ModuleFlags; 5] = [
    ModuleFlags::RESOURCE_MANAGEMENT.union(ModuleFlags::PERSONALITY_EVOLUTION),
    ModuleFlags::STRATEGIC_PLANNING.union(ModuleFlags::COORDINATION),
    ModuleFlags::RISK_ASSESSMENT.union(ModuleFlags::DESPERATION_MOVES),
    ModuleFlags::PREDICTION.union(ModuleFlags::ADAPTIVE_DIFFICULTY),
    ModuleFlags::COUNTER_PREDICTION
        .union(ModuleFlags::BAITING)
        .union(ModuleFlags::SAVE_FOR_LATER_PHASES)
        .union(ModuleFlags::CONSERVATIVE_WHEN_WINNING),
];

/// Generates a complete engine configuration for a difficulty scalar.
///
/// Pattern learning is always on; every tier threshold reached adds its
/// modules. Numeric parameters scale linearly with difficulty.
pub fn config_for(difficulty: f32) -> AiConfig {
    let d = difficulty.clamp(0.0, 100.0);

    let mut modules = ModuleFlags::PATTERN_LEARNING;
    for (threshold, tier) in TIER_THRESHOLDS.iter().zip(TIERS) {
        if d >= *threshold {
            modules |= tier;
        }
    }

    let scaled = |base: f32, per_point: f32| (base + d * per_point).round().clamp(0.0, 100.0) as u8;
    let prediction_accuracy = if modules.contains(ModuleFlags::PREDICTION) {
        scaled(0.0, 1.0)
    } else {
        0
    };

    AiConfig {
        aggression: scaled(20.0, 0.6),
        recklessness: scaled(0.0, 0.4),
        skill_usage_rate: scaled(30.0, 0.5),
        planning_depth: (1 + (d / 25.0) as u8).min(AiConfig::MAX_PLANNING_DEPTH),
        teamwork_priority: scaled(0.0, 0.8),
        risk_tolerance: scaled(20.0, 0.5),
        mp_conservation_threshold: scaled(10.0, 0.2),
        prediction_accuracy,
        modules,
        ..Preset::Normal.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_enable_cumulatively() {
        assert_eq!(config_for(10.0).modules, ModuleFlags::PATTERN_LEARNING);

        let mid = config_for(50.0);
        assert!(mid.is_enabled(ModuleFlags::STRATEGIC_PLANNING | ModuleFlags::RESOURCE_MANAGEMENT));
        assert!(!mid.is_enabled(ModuleFlags::RISK_ASSESSMENT));

        let top = config_for(100.0);
        assert_eq!(top.modules, ModuleFlags::all());
        assert_eq!(top.planning_depth, AiConfig::MAX_PLANNING_DEPTH);
    }

    #[test]
    fn test_generated_configs_are_valid() {
        for difficulty in [0.0, 10.0, 29.9, 30.0, 64.0, 75.0, 85.0, 100.0, 250.0] {
            let config = config_for(difficulty);
            assert!(config.validate().is_ok(), "difficulty {difficulty}");
        }
    }

    #[test]
    fn test_prediction_accuracy_needs_prediction() {
        assert_eq!(config_for(70.0).prediction_accuracy, 0);
        assert_eq!(config_for(80.0).prediction_accuracy, 80);
    }
}
