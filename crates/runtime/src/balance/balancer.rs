use std::collections::HashMap;

use combat_core::AiConfig;
use serde::{Deserialize, Serialize};

use super::generator::config_for;
use super::performance::{BattleReport, performance_score};
use super::profile::{BalanceProfile, DEFAULT_DIFFICULTY};
use crate::events::{BalanceEvent, EventBus};
use crate::repository::{BalanceRepository, Result};

/// Balancer tuning. The defaults are hand-tuned constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Player win rate the balancer steers toward.
    pub target_win_rate: f32,
    /// Rebalance every this many battles per opponent.
    pub interval: u32,
    /// Allowed absolute distance from the target before adjusting.
    pub tolerance: f32,
    /// Difficulty points per unit of win-rate deviation.
    pub scale: f32,
    /// Largest single adjustment, in difficulty points.
    pub max_step: f32,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            target_win_rate: 0.6,
            interval: 3,
            tolerance: 0.15,
            scale: 50.0,
            max_step: 25.0,
        }
    }
}

/// Tracks a [`BalanceProfile`] per opponent identity.
#[derive(Debug, Default)]
pub struct Balancer {
    config: BalancerConfig,
    profiles: HashMap<String, BalanceProfile>,
    events: Option<EventBus>,
}

impl Balancer {
    pub fn new(config: BalancerConfig) -> Self {
        Self {
            config,
            profiles: HashMap::new(),
            events: None,
        }
    }

    #[must_use]
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn config(&self) -> &BalancerConfig {
        &self.config
    }

    /// Records a finished battle against `opponent` and rebalances when due.
    pub fn record_battle(&mut self, opponent: &str, report: &BattleReport) -> &BalanceProfile {
        let performance = performance_score(report);
        let profile = self
            .profiles
            .entry(opponent.to_string())
            .or_insert_with(|| BalanceProfile::new(opponent));

        profile.record(report.player_won, performance);
        tracing::debug!(
            "Balance: {} battle {} recorded (player_won={}, performance={:.1})",
            opponent,
            profile.total_battles,
            report.player_won,
            performance
        );
        let recorded = BalanceEvent::BattleRecorded {
            opponent: opponent.to_string(),
            player_won: report.player_won,
            performance,
            total_battles: profile.total_battles,
        };

        let from = profile.difficulty;
        let adjusted = profile.rebalance(&self.config).map(|to| {
            tracing::info!(
                "Balance: {} difficulty {:.1} -> {:.1} (player win rate {:.2})",
                opponent,
                from,
                to,
                profile.player_win_rate()
            );
            BalanceEvent::DifficultyAdjusted {
                opponent: opponent.to_string(),
                from,
                to,
                player_win_rate: profile.player_win_rate(),
            }
        });

        if let Some(bus) = &self.events {
            bus.publish(recorded);
            if let Some(event) = adjusted {
                bus.publish(event);
            }
        }

        &self.profiles[opponent]
    }

    /// Current difficulty for `opponent`, the default if unseen.
    pub fn difficulty(&self, opponent: &str) -> f32 {
        self.profiles
            .get(opponent)
            .map_or(DEFAULT_DIFFICULTY, |profile| profile.difficulty)
    }

    /// Engine configuration for `opponent` at its current difficulty.
    pub fn config_for(&self, opponent: &str) -> AiConfig {
        config_for(self.difficulty(opponent))
    }

    pub fn profile(&self, opponent: &str) -> Option<&BalanceProfile> {
        self.profiles.get(opponent)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &BalanceProfile> {
        self.profiles.values()
    }

    /// Inserts a previously persisted profile, replacing any existing one.
    pub fn insert_profile(&mut self, profile: BalanceProfile) {
        self.profiles.insert(profile.opponent_id.clone(), profile);
    }

    /// Loads every stored profile. Returns how many were loaded.
    pub fn load_from(&mut self, repo: &dyn BalanceRepository) -> Result<usize> {
        let profiles = repo.load_all()?;
        let count = profiles.len();
        for profile in profiles {
            self.insert_profile(profile);
        }
        Ok(count)
    }

    pub fn save_to(&self, repo: &dyn BalanceRepository) -> Result<()> {
        for profile in self.profiles.values() {
            repo.save(profile)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, Topic};
    use crate::repository::InMemoryBalanceRepository;

    fn win() -> BattleReport {
        BattleReport {
            player_won: true,
            turns: 8,
            ..BattleReport::default()
        }
    }

    #[test]
    fn test_unseen_opponent_uses_default() {
        let balancer = Balancer::default();
        assert_eq!(balancer.difficulty("Crypt Lord"), DEFAULT_DIFFICULTY);
        assert_eq!(balancer.config_for("Crypt Lord"), config_for(DEFAULT_DIFFICULTY));
    }

    #[test]
    fn test_streak_raises_difficulty_and_publishes() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Topic::Balance);
        let mut balancer = Balancer::new(BalancerConfig::default()).with_event_bus(bus);

        for _ in 0..3 {
            balancer.record_battle("Crypt Lord", &win());
        }
        assert!(balancer.difficulty("Crypt Lord") > DEFAULT_DIFFICULTY);
        assert_eq!(balancer.difficulty("Goblin"), DEFAULT_DIFFICULTY);

        let mut adjusted = 0;
        let mut recorded = 0;
        while let Ok(Event::Balance(event)) = rx.try_recv() {
            match event {
                BalanceEvent::BattleRecorded { .. } => recorded += 1,
                BalanceEvent::DifficultyAdjusted { .. } => adjusted += 1,
            }
        }
        assert_eq!((recorded, adjusted), (3, 1));
    }

    #[test]
    fn test_profiles_survive_repository() {
        let repo = InMemoryBalanceRepository::new();
        let mut balancer = Balancer::default();
        for _ in 0..4 {
            balancer.record_battle("Crypt Lord", &win());
        }
        balancer.save_to(&repo).unwrap();

        let mut restored = Balancer::default();
        assert_eq!(restored.load_from(&repo).unwrap(), 1);
        assert_eq!(restored.profile("Crypt Lord"), balancer.profile("Crypt Lord"));
    }
}
