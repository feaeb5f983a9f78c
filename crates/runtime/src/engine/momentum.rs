//! Battle momentum and adaptive difficulty.

use combat_core::{ActorStats, AiConfig, ModuleFlags};

pub const MAX_MOMENTUM: f32 = 100.0;

/// Above this the actor's side is clearly winning.
pub const WINNING_MOMENTUM: f32 = 50.0;

/// Below this the actor's side is clearly losing.
pub const LOSING_MOMENTUM: f32 = -50.0;

/// Aggression shift applied by adaptive difficulty.
pub const ADAPTIVE_AGGRESSION_STEP: i32 = 15;

/// `(average team HP fraction - average opponent HP fraction) * 100`, clamped.
///
/// An empty side counts as 0.
pub fn compute(team: &[&ActorStats], opponents: &[&ActorStats]) -> f32 {
    let momentum = (average_hp_fraction(team) - average_hp_fraction(opponents)) * 100.0;
    momentum.clamp(-MAX_MOMENTUM, MAX_MOMENTUM)
}

fn average_hp_fraction(side: &[&ActorStats]) -> f32 {
    if side.is_empty() {
        return 0.0;
    }
    side.iter().map(|actor| actor.hp_fraction()).sum::<f32>() / side.len() as f32
}

/// Returns the configuration to decide with this turn.
///
/// With adaptive difficulty the engine eases off when its side dominates and
/// presses harder when it is losing. The stored configuration is untouched,
/// but the returned copy is always within range.
pub fn effective_config(config: &AiConfig, momentum: f32) -> AiConfig {
    let mut effective = config.clone().clamped();
    if !config.is_enabled(ModuleFlags::ADAPTIVE_DIFFICULTY) {
        return effective;
    }

    if momentum > WINNING_MOMENTUM {
        effective.adjust_aggression(-ADAPTIVE_AGGRESSION_STEP);
    } else if momentum < LOSING_MOMENTUM {
        effective.adjust_aggression(ADAPTIVE_AGGRESSION_STEP);
    }
    effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::Preset;

    #[test]
    fn test_momentum_is_bounded() {
        let healthy = ActorStats::new(1, "Boss");
        let dying = ActorStats::new(2, "Hero").with_current_hp(1);

        let momentum = compute(&[&healthy], &[&dying]);
        assert!((momentum - 99.0).abs() < 0.01);
        assert_eq!(compute(&[&healthy], &[]), 100.0);
        assert_eq!(compute(&[], &[&healthy]), -100.0);
    }

    #[test]
    fn test_adaptive_difficulty_rubber_bands() {
        let config = Preset::Hard.config();
        assert_eq!(effective_config(&config, 60.0).aggression, config.aggression - 15);
        assert_eq!(effective_config(&config, -60.0).aggression, config.aggression + 15);
        assert_eq!(effective_config(&config, 0.0), config);

        let story = Preset::Story.config();
        assert_eq!(effective_config(&story, 80.0), story);
    }
}
