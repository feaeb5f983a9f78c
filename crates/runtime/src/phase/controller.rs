use combat_core::{ActorId, ActorStats, BossPhase, validate_phases};

use crate::api::Result;
use crate::engine::DecisionEngine;
use crate::events::{EventBus, PhaseEvent};

/// Phase controller for one boss in one battle.
///
/// Phase indices only move forward, one phase per [`check_transition`] call.
///
/// [`check_transition`]: BossPhaseController::check_transition
#[derive(Debug, Clone)]
pub struct BossPhaseController {
    actor: ActorId,
    phases: Vec<BossPhase>,
    /// `None` until [`BossPhaseController::start`].
    current: Option<usize>,
    transitioning: bool,
    events: Option<EventBus>,
}

impl BossPhaseController {
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            phases: Vec::new(),
            current: None,
            transitioning: false,
            events: None,
        }
    }

    /// Builds a controller from a validated phase list.
    pub fn from_phases(actor: ActorId, phases: Vec<BossPhase>) -> Result<Self> {
        validate_phases(&phases)?;
        let mut controller = Self::new(actor);
        controller.phases = phases;
        Ok(controller)
    }

    #[must_use]
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Appends a phase. Phases are expected in descending threshold order.
    pub fn add_phase(&mut self, phase: BossPhase) {
        self.phases.push(phase);
    }

    pub fn phases(&self) -> &[BossPhase] {
        &self.phases
    }

    /// Enters phase 0. Does nothing without phases or once started.
    pub fn start(&mut self, engine: &mut DecisionEngine, boss: &mut ActorStats) {
        if self.current.is_some() || self.phases.is_empty() {
            return;
        }
        self.enter(0, engine, boss);
    }

    /// Advances at most one phase if `hp_fraction` is at or below the next
    /// phase's threshold. Returns whether a transition happened.
    pub fn check_transition(
        &mut self,
        hp_fraction: f32,
        engine: &mut DecisionEngine,
        boss: &mut ActorStats,
    ) -> bool {
        if self.transitioning {
            return false;
        }
        let Some(current) = self.current else {
            return false;
        };
        let Some(next) = self.phases.get(current + 1) else {
            return false;
        };
        if hp_fraction > next.hp_threshold {
            return false;
        }

        self.enter(current + 1, engine, boss);
        true
    }

    /// Jumps straight to `index` for scripted transitions.
    ///
    /// Out-of-range indices, the current phase and calls during a transition
    /// are ignored. Returns whether a transition happened.
    pub fn force_transition(
        &mut self,
        index: usize,
        engine: &mut DecisionEngine,
        boss: &mut ActorStats,
    ) -> bool {
        if self.transitioning || index >= self.phases.len() || self.current == Some(index) {
            return false;
        }
        self.enter(index, engine, boss);
        true
    }

    pub fn current_phase(&self) -> Option<&BossPhase> {
        self.current.and_then(|index| self.phases.get(index))
    }

    /// 1-based phase number; 0 before [`BossPhaseController::start`].
    pub fn current_phase_number(&self) -> usize {
        self.current.map_or(0, |index| index + 1)
    }

    pub fn is_final_phase(&self) -> bool {
        self.current
            .is_some_and(|index| index + 1 == self.phases.len())
    }

    fn enter(&mut self, index: usize, engine: &mut DecisionEngine, boss: &mut ActorStats) {
        self.transitioning = true;

        let from = self.current_phase_number();
        let to = index + 1;
        if self.current.is_some() {
            self.publish(PhaseEvent::PhaseTransitioning {
                actor: self.actor,
                from,
                to,
            });
        }

        let phase = &self.phases[index];
        engine.apply_phase_adjustments(&phase.ai);
        engine.set_boss_phase(index);

        if !phase.stats.is_identity() {
            phase.stats.apply_to(boss);
            tracing::debug!(
                "{} stats now atk {} def {} spd {}",
                boss.name,
                boss.attack,
                boss.defense,
                boss.speed
            );
        }
        if phase.heal_fraction > 0.0 {
            boss.heal((boss.hp_max as f32 * phase.heal_fraction).round() as u32);
        }
        if phase.mana_restore_fraction > 0.0 {
            boss.restore_mp((boss.mp_max as f32 * phase.mana_restore_fraction).round() as u32);
        }

        if phase.enrage {
            engine.enrage();
            tracing::info!("{} is enraged", boss.name);
            self.publish(PhaseEvent::BossEnraged { actor: self.actor });
        }
        for tag in &phase.special_mechanics {
            tracing::debug!("{} triggers mechanic {}", boss.name, tag);
            self.publish(PhaseEvent::SpecialMechanicTriggered {
                actor: self.actor,
                tag: tag.clone(),
            });
        }
        if let Some(count) = phase.summon_count.filter(|&count| count > 0) {
            self.publish(PhaseEvent::SummonRequested {
                actor: self.actor,
                count,
            });
        }

        tracing::info!(
            "{} enters phase {} ({}) at {:.0}% HP",
            boss.name,
            to,
            phase.name,
            boss.hp_fraction() * 100.0
        );
        self.publish(PhaseEvent::PhaseStarted {
            actor: self.actor,
            number: to,
            name: phase.name.clone(),
            message: phase.transition_message.clone(),
        });

        self.current = Some(index);
        self.transitioning = false;
    }

    fn publish(&self, event: PhaseEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, Topic};
    use combat_core::{AiAdjustments, ModuleFlags, Mood, Preset, StatMultipliers};

    fn lich() -> ActorStats {
        ActorStats::new(100, "Lich")
            .with_hp(1000)
            .with_mp(100)
            .with_offense(40, 60)
            .with_defense(20, 30)
    }

    fn phases() -> Vec<BossPhase> {
        vec![
            BossPhase::new("Awakening", 1.0),
            BossPhase::new("Fury", 0.6)
                .with_ai(AiAdjustments {
                    aggression: 20,
                    enable: ModuleFlags::PREDICTION,
                    ..AiAdjustments::default()
                })
                .with_stats(StatMultipliers {
                    attack: 1.5,
                    ..StatMultipliers::IDENTITY
                })
                .with_mana_restore(0.5)
                .with_mechanic("summon_circle")
                .with_summon(2),
            BossPhase::new("Last Stand", 0.25).enraged().with_heal(0.1),
        ]
    }

    fn setup() -> (BossPhaseController, DecisionEngine, ActorStats) {
        let controller = BossPhaseController::from_phases(ActorId(100), phases()).unwrap();
        let engine = DecisionEngine::with_seed(ActorId(100), Preset::Normal.config(), 1);
        (controller, engine, lich())
    }

    #[test]
    fn test_start_enters_first_phase() {
        let (mut controller, mut engine, mut boss) = setup();
        assert_eq!(controller.current_phase_number(), 0);

        controller.start(&mut engine, &mut boss);

        assert_eq!(controller.current_phase_number(), 1);
        assert_eq!(controller.current_phase().unwrap().name, "Awakening");
        assert!(!controller.is_final_phase());
    }

    #[test]
    fn test_one_transition_per_crossing() {
        let (mut controller, mut engine, mut boss) = setup();
        controller.start(&mut engine, &mut boss);

        assert!(!controller.check_transition(0.8, &mut engine, &mut boss));
        assert!(controller.check_transition(0.55, &mut engine, &mut boss));
        assert!(!controller.check_transition(0.55, &mut engine, &mut boss));
        assert_eq!(controller.current_phase_number(), 2);
        assert_eq!(engine.boss_phase(), 1);
    }

    #[test]
    fn test_deep_drop_advances_one_phase_per_call() {
        let (mut controller, mut engine, mut boss) = setup();
        controller.start(&mut engine, &mut boss);

        assert!(controller.check_transition(0.1, &mut engine, &mut boss));
        assert_eq!(controller.current_phase_number(), 2);
        assert!(controller.check_transition(0.1, &mut engine, &mut boss));
        assert!(controller.is_final_phase());
        assert!(!controller.check_transition(0.0, &mut engine, &mut boss));
    }

    #[test]
    fn test_transition_applies_effects() {
        let (mut controller, mut engine, mut boss) = setup();
        controller.start(&mut engine, &mut boss);
        boss.spend_mp(80);
        let aggression = engine.config().aggression;

        controller.check_transition(0.6, &mut engine, &mut boss);

        assert_eq!(boss.attack, 60);
        assert_eq!(boss.mp, 70);
        assert_eq!(engine.config().aggression, aggression + 20);
        assert!(engine.config().is_enabled(ModuleFlags::PREDICTION));

        boss.take_damage(800);
        controller.check_transition(boss.hp_fraction(), &mut engine, &mut boss);

        assert_eq!(engine.mood(), Mood::Berserk);
        assert_eq!(engine.config().aggression, 100);
        assert_eq!(boss.hp, 300);
    }

    #[test]
    fn test_force_transition_ignores_invalid_targets() {
        let (mut controller, mut engine, mut boss) = setup();
        controller.start(&mut engine, &mut boss);

        assert!(!controller.force_transition(7, &mut engine, &mut boss));
        assert!(!controller.force_transition(0, &mut engine, &mut boss));
        assert_eq!(controller.current_phase_number(), 1);

        assert!(controller.force_transition(2, &mut engine, &mut boss));
        assert!(controller.is_final_phase());
    }

    #[test]
    fn test_lifecycle_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Topic::Phase);
        let (controller, mut engine, mut boss) = setup();
        let mut controller = controller.with_event_bus(bus);

        controller.start(&mut engine, &mut boss);
        controller.check_transition(0.5, &mut engine, &mut boss);

        let mut events = Vec::new();
        while let Ok(Event::Phase(event)) = rx.try_recv() {
            events.push(event);
        }
        let actor = ActorId(100);
        assert_eq!(
            events,
            vec![
                PhaseEvent::PhaseStarted {
                    actor,
                    number: 1,
                    name: "Awakening".into(),
                    message: None
                },
                PhaseEvent::PhaseTransitioning { actor, from: 1, to: 2 },
                PhaseEvent::SpecialMechanicTriggered {
                    actor,
                    tag: "summon_circle".into()
                },
                PhaseEvent::SummonRequested { actor, count: 2 },
                PhaseEvent::PhaseStarted {
                    actor,
                    number: 2,
                    name: "Fury".into(),
                    message: None
                },
            ]
        );
    }

    #[test]
    fn test_rejects_unordered_phases() {
        let mut unordered = phases();
        unordered.swap(1, 2);
        assert!(BossPhaseController::from_phases(ActorId(1), unordered).is_err());
    }
}
