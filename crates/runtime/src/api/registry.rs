//! Engine registry for one battle.
//!
//! The [`EngineRegistry`] maps each AI-driven actor to the
//! [`DecisionEngine`] it owns for the battle, so an integration layer can
//! route `decide` calls and fan out observed player actions without holding
//! engines itself.
//!
//! # Design
//!
//! - **Exclusive ownership**: one engine per actor, never shared
//! - **Soft failure**: deciding for an unregistered actor yields a forced pass
//! - **Shared bus**: engines registered after [`EngineRegistry::with_event_bus`]
//!   publish to the same bus

use std::collections::BTreeMap;

use combat_core::{ActorId, ActorStats, Decision};

use crate::engine::DecisionEngine;
use crate::events::EventBus;

#[derive(Debug, Default)]
pub struct EngineRegistry {
    /// Ordered by actor id so fan-out is deterministic.
    engines: BTreeMap<ActorId, DecisionEngine>,
    events: Option<EventBus>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `bus` to every engine registered from now on.
    #[must_use]
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Registers an engine under its actor id.
    ///
    /// Returns the engine previously registered for that actor, if any.
    pub fn register(&mut self, mut engine: DecisionEngine) -> Option<DecisionEngine> {
        if let Some(bus) = &self.events {
            engine.set_event_bus(bus.clone());
        }
        self.engines.insert(engine.actor(), engine)
    }

    pub fn unregister(&mut self, actor: ActorId) -> Option<DecisionEngine> {
        self.engines.remove(&actor)
    }

    pub fn is_registered(&self, actor: ActorId) -> bool {
        self.engines.contains_key(&actor)
    }

    pub fn engine(&self, actor: ActorId) -> Option<&DecisionEngine> {
        self.engines.get(&actor)
    }

    pub fn engine_mut(&mut self, actor: ActorId) -> Option<&mut DecisionEngine> {
        self.engines.get_mut(&actor)
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Decides for `actor` with its registered engine.
    ///
    /// An unregistered actor gets `Decision::none` with a diagnostic reason.
    pub fn decide(
        &mut self,
        actor: &ActorStats,
        allies: &[ActorStats],
        opponents: &[ActorStats],
    ) -> Decision {
        match self.engines.get_mut(&actor.id) {
            Some(engine) => engine.decide(actor, allies, opponents),
            None => {
                tracing::warn!("No decision engine registered for {} ({})", actor.name, actor.id);
                Decision::none(format!("No decision engine registered for {}", actor.id))
            }
        }
    }

    /// Reports a player action to every registered engine.
    pub fn record_opponent_action(&mut self, signature: &str) {
        for engine in self.engines.values_mut() {
            engine.record_opponent_action(signature);
        }
    }

    /// Resets every engine for a new battle.
    pub fn reset_all(&mut self) {
        for engine in self.engines.values_mut() {
            engine.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{ActionKind, DecisionSource, Preset};

    fn goblin(id: u32) -> ActorStats {
        ActorStats::new(id, "Goblin")
    }

    #[test]
    fn test_unregistered_actor_passes() {
        let mut registry = EngineRegistry::new();
        let decision = registry.decide(&goblin(5), &[], &[ActorStats::new(1, "Hero")]);

        assert_eq!(decision.kind, ActionKind::None);
        assert_eq!(decision.source, DecisionSource::Unavailable);
        assert!(decision.reasoning.contains("No decision engine"));
    }

    #[test]
    fn test_register_replaces_and_routes() {
        let mut registry = EngineRegistry::new();
        assert!(registry.register(DecisionEngine::with_seed(ActorId(5), Preset::Story.config(), 1)).is_none());
        assert!(registry.register(DecisionEngine::with_seed(ActorId(5), Preset::Hard.config(), 1)).is_some());
        assert_eq!(registry.len(), 1);

        let decision = registry.decide(&goblin(5), &[], &[ActorStats::new(1, "Hero")]);
        assert!(!decision.is_none());
        assert_eq!(registry.engine(ActorId(5)).unwrap().turn(), 1);
    }

    #[test]
    fn test_actions_fan_out_and_reset() {
        let mut registry = EngineRegistry::new();
        registry.register(DecisionEngine::with_seed(ActorId(5), Preset::Normal.config(), 1));
        registry.register(DecisionEngine::with_seed(ActorId(6), Preset::Normal.config(), 2));

        registry.record_opponent_action("Attack:LowestHP");
        for id in [5, 6] {
            assert_eq!(registry.engine(ActorId(id)).unwrap().patterns().len(), 1);
        }

        registry.reset_all();
        assert!(registry.engine(ActorId(6)).unwrap().patterns().is_empty());
        assert!(registry.unregister(ActorId(6)).is_some());
        assert!(!registry.is_registered(ActorId(6)));
    }
}
