//! Topic-based event bus for engine, phase and balance events.
//!
//! Events are published to specific topics, and consumers (dialogue,
//! achievements, debugging UIs) subscribe only to the topics they need.
//! Publishing is synchronous and best-effort.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{BalanceEvent, DecisionEvent, PhaseEvent};
