use serde::{Deserialize, Serialize};

use super::BalancerConfig;

pub const MIN_DIFFICULTY: f32 = 10.0;
pub const MAX_DIFFICULTY: f32 = 100.0;
pub const DEFAULT_DIFFICULTY: f32 = 50.0;

/// Battle history and difficulty for one opponent identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceProfile {
    pub opponent_id: String,
    pub total_battles: u32,
    pub player_wins: u32,
    pub ai_wins: u32,
    /// Always within [`MIN_DIFFICULTY`, `MAX_DIFFICULTY`].
    pub difficulty: f32,
    /// Running mean of recorded performance scores.
    pub average_performance: f32,
}

impl BalanceProfile {
    pub fn new(opponent_id: impl Into<String>) -> Self {
        Self {
            opponent_id: opponent_id.into(),
            total_battles: 0,
            player_wins: 0,
            ai_wins: 0,
            difficulty: DEFAULT_DIFFICULTY,
            average_performance: 0.0,
        }
    }

    /// Records one finished battle.
    pub fn record(&mut self, player_won: bool, performance: f32) {
        self.total_battles += 1;
        if player_won {
            self.player_wins += 1;
        } else {
            self.ai_wins += 1;
        }
        let n = self.total_battles as f32;
        self.average_performance += (performance - self.average_performance) / n;
    }

    /// Cumulative player win rate; 0 before any battle.
    pub fn player_win_rate(&self) -> f32 {
        if self.total_battles == 0 {
            return 0.0;
        }
        self.player_wins as f32 / self.total_battles as f32
    }

    /// Adjusts difficulty on every `interval`-th battle when the win rate is
    /// outside the tolerance band. Returns the new difficulty if it changed.
    pub fn rebalance(&mut self, config: &BalancerConfig) -> Option<f32> {
        if config.interval == 0 || self.total_battles == 0 || self.total_battles % config.interval != 0 {
            return None;
        }

        let deviation = self.player_win_rate() - config.target_win_rate;
        if deviation.abs() <= config.tolerance {
            return None;
        }

        let step = (deviation * config.scale).clamp(-config.max_step, config.max_step);
        let adjusted = (self.difficulty + step).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
        if adjusted == self.difficulty {
            return None;
        }
        self.difficulty = adjusted;
        Some(adjusted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tracks_wins_and_average() {
        let mut profile = BalanceProfile::new("Crypt Lord");
        profile.record(true, 80.0);
        profile.record(false, 40.0);

        assert_eq!(profile.total_battles, 2);
        assert_eq!((profile.player_wins, profile.ai_wins), (1, 1));
        assert_eq!(profile.player_win_rate(), 0.5);
        assert_eq!(profile.average_performance, 60.0);
    }

    #[test]
    fn test_rebalances_only_on_interval() {
        let config = BalancerConfig::default();
        let mut profile = BalanceProfile::new("Crypt Lord");

        profile.record(true, 70.0);
        assert_eq!(profile.rebalance(&config), None);
        profile.record(true, 70.0);
        assert_eq!(profile.rebalance(&config), None);
        profile.record(true, 70.0);

        // Win rate 1.0 against a 0.6 target: +0.4 * 50 = +20.
        let adjusted = profile.rebalance(&config).unwrap();
        assert!((adjusted - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_within_tolerance_is_left_alone() {
        let config = BalancerConfig::default();
        let mut profile = BalanceProfile::new("Crypt Lord");
        profile.record(true, 50.0);
        profile.record(true, 50.0);
        profile.record(false, 50.0);

        assert_eq!(profile.rebalance(&config), None);
        assert_eq!(profile.difficulty, DEFAULT_DIFFICULTY);
    }

    #[test]
    fn test_difficulty_is_clamped() {
        let config = BalancerConfig {
            scale: 1000.0,
            max_step: 1000.0,
            ..BalancerConfig::default()
        };
        let mut profile = BalanceProfile::new("Crypt Lord");
        for _ in 0..3 {
            profile.record(false, 10.0);
        }
        assert_eq!(profile.rebalance(&config), Some(MIN_DIFFICULTY));

        for _ in 0..30 {
            profile.record(true, 90.0);
            profile.rebalance(&config);
        }
        assert_eq!(profile.difficulty, MAX_DIFFICULTY);
    }
}
