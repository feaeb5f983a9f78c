//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{BalanceEvent, DecisionEvent, PhaseEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Per-turn engine output (decisions, mood changes, plans)
    Decision,
    /// Boss phase lifecycle
    Phase,
    /// Cross-battle difficulty tuning
    Balance,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Decision(DecisionEvent),
    Phase(PhaseEvent),
    Balance(BalanceEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Decision(_) => Topic::Decision,
            Event::Phase(_) => Topic::Phase,
            Event::Balance(_) => Topic::Balance,
        }
    }
}

impl From<DecisionEvent> for Event {
    fn from(event: DecisionEvent) -> Self {
        Event::Decision(event)
    }
}

impl From<PhaseEvent> for Event {
    fn from(event: PhaseEvent) -> Self {
        Event::Phase(event)
    }
}

impl From<BalanceEvent> for Event {
    fn from(event: BalanceEvent) -> Self {
        Event::Balance(event)
    }
}

/// Topic-based event bus
///
/// Cloning the bus shares the underlying channels, so the engines, the phase
/// controller and the balancer of one battle can all publish to the same
/// subscribers.
#[derive(Clone)]
pub struct EventBus {
    decision: broadcast::Sender<Event>,
    phase: broadcast::Sender<Event>,
    balance: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            decision: broadcast::channel(capacity).0,
            phase: broadcast::channel(capacity).0,
            balance: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Decision => &self.decision,
            Topic::Phase => &self.phase,
            Topic::Balance => &self.balance,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();

        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("decision_subscribers", &self.decision.receiver_count())
            .field("phase_subscribers", &self.phase.receiver_count())
            .field("balance_subscribers", &self.balance.receiver_count())
            .finish()
    }
}
