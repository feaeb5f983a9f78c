//! Cross-battle difficulty balancing.
//!
//! Unlike the per-turn engine, the balancer runs once per finished battle. It
//! keeps a [`BalanceProfile`] per opponent identity, nudges the difficulty
//! scalar toward a target player win rate and turns a difficulty into a full
//! engine configuration with [`config_for`].

mod balancer;
mod generator;
mod performance;
mod profile;

pub use balancer::{Balancer, BalancerConfig};
pub use generator::{TIER_THRESHOLDS, config_for};
pub use performance::{BattleReport, performance_score};
pub use profile::{BalanceProfile, DEFAULT_DIFFICULTY, MAX_DIFFICULTY, MIN_DIFFICULTY};
