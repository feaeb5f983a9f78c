//! The per-actor decision engine.
//!
//! [`DecisionEngine::decide`] runs once per turn:
//!
//! 1. Advance the turn counter and recompute momentum.
//! 2. Evolve the mood from the actor's health (personality evolution).
//! 3. Derive this turn's effective configuration (adaptive difficulty).
//! 4. Run the cascade modules in priority order; the first decision wins.
//! 5. Otherwise fall back to the baseline scorer and build a new plan.
//!
//! The engine never fails. When nothing valid exists it returns a decision of
//! kind [`ActionKind::None`](combat_core::ActionKind::None), which callers
//! treat as a forced pass.

pub mod context;
pub mod modules;
pub mod momentum;
pub mod snapshot;
pub mod state;

use combat_core::{
    ActorId, ActorStats, AiAdjustments, AiConfig, Decision, ModuleFlags, Mood, PcgRandom,
    RandomSource,
};

pub use context::DecisionContext;
pub use modules::{DecisionModule, ModuleKind, MoodChange};
pub use snapshot::EngineSnapshot;
pub use state::{
    EngineState, PATTERN_CAPACITY, PatternHistory, PersonalityState, PlannedAction, TargetRule,
};

use crate::api::Result;
use crate::events::{DecisionEvent, EventBus};
use modules::{BaselineScorer, PersonalityMachine, StrategicPlanner};

/// Decision engine owned by one actor for one battle.
pub struct DecisionEngine {
    actor: ActorId,
    /// Configuration the engine was created with; restored on reset.
    base_config: AiConfig,
    /// Live configuration, mutated by mood changes and boss phases.
    config: AiConfig,
    state: EngineState,
    modules: Vec<Box<dyn DecisionModule>>,
    rng: Box<dyn RandomSource>,
    events: Option<EventBus>,
}

impl DecisionEngine {
    /// Creates an engine with an injected random source.
    ///
    /// Out-of-range parameters are clamped; use [`DecisionEngine::try_with_seed`]
    /// to reject them instead.
    pub fn new(actor: ActorId, config: AiConfig, rng: impl RandomSource + 'static) -> Self {
        let config = config.clamped();
        Self {
            actor,
            base_config: config.clone(),
            config,
            state: EngineState::default(),
            modules: modules::cascade(),
            rng: Box::new(rng),
            events: None,
        }
    }

    /// Creates an engine driven by a seeded PCG source.
    pub fn with_seed(actor: ActorId, config: AiConfig, seed: u64) -> Self {
        Self::new(actor, config, PcgRandom::new(seed))
    }

    /// Like [`DecisionEngine::with_seed`], rejecting out-of-range configuration.
    pub fn try_with_seed(actor: ActorId, config: AiConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_seed(actor, config, seed))
    }

    /// Publishes decision events to `bus`.
    #[must_use]
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn set_event_bus(&mut self, bus: EventBus) {
        self.events = Some(bus);
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AiConfig {
        &mut self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn mood(&self) -> Mood {
        self.state.personality.mood
    }

    pub fn momentum(&self) -> f32 {
        self.state.momentum
    }

    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    pub fn patterns(&self) -> &PatternHistory {
        &self.state.patterns
    }

    pub fn boss_phase(&self) -> usize {
        self.state.boss_phase
    }

    /// Chooses this turn's action for `actor`.
    ///
    /// `allies` may include the actor itself and dead members; `opponents`
    /// may include dead members. Both are filtered internally.
    pub fn decide(
        &mut self,
        actor: &ActorStats,
        allies: &[ActorStats],
        opponents: &[ActorStats],
    ) -> Decision {
        if !actor.is_alive() {
            return Decision::none(format!("{} is down", actor.name));
        }

        self.state.turn += 1;
        let turn = self.state.turn;

        if self.config.is_enabled(ModuleFlags::PERSONALITY_EVOLUTION)
            && let Some(change) = PersonalityMachine::update(
                &mut self.config,
                &mut self.state.personality,
                actor.hp_fraction(),
            )
        {
            self.report_mood(change);
        }

        let (team, foes) = context::living_sides(actor, allies, opponents);
        self.state.momentum = momentum::compute(&team, &foes);
        let config = momentum::effective_config(&self.config, self.state.momentum);

        let mut ctx = DecisionContext::new(
            actor,
            allies,
            opponents,
            &config,
            &mut self.state,
            self.rng.as_mut(),
        );

        let mut decision = None;
        for module in &self.modules {
            if !module.is_enabled(ctx.config) {
                continue;
            }
            if let Some(found) = module.evaluate(&mut ctx) {
                tracing::debug!("Cascade: {} decided by {}", self.actor, module.kind());
                decision = Some(found);
                break;
            }
            tracing::trace!("Cascade: {} passed on {}", module.kind(), self.actor);
        }

        let decision = match decision {
            Some(decision) => decision,
            None => {
                let fallback = BaselineScorer::decide(&mut ctx);
                StrategicPlanner::build(&mut ctx);
                fallback
            }
        };

        let raised = ctx.take_events();
        drop(ctx);
        for event in raised {
            self.publish(event);
        }

        tracing::debug!(
            "Engine: {} turn {} -> {} ({}): {}",
            self.actor,
            turn,
            decision.kind,
            decision.source,
            decision.reasoning
        );
        self.publish(DecisionEvent::DecisionMade {
            actor: self.actor,
            turn,
            kind: decision.kind,
            skill: decision.skill,
            target: decision.target,
            source: decision.source,
            reasoning: decision.reasoning.clone(),
        });

        decision
    }

    /// Records an opponent action signature (`"<ActionType>:<Detail>"`).
    ///
    /// The recent-history window always records; lifetime counts are kept
    /// only with pattern learning enabled.
    pub fn record_opponent_action(&mut self, signature: &str) {
        let learn = self.config.is_enabled(ModuleFlags::PATTERN_LEARNING);
        self.state.patterns.record(signature, learn);
        tracing::trace!("Engine: {} observed {}", self.actor, signature);
    }

    /// Applies a boss phase's AI changes: deltas, module enablement,
    /// overrides and the optional mood override.
    pub fn apply_phase_adjustments(&mut self, adjustments: &AiAdjustments) {
        adjustments.apply_to(&mut self.config);
        if let Some(mood) = adjustments.mood {
            self.force_mood(mood);
        }
    }

    /// Enters `mood` regardless of health, applying its deltas.
    pub fn force_mood(&mut self, mood: Mood) {
        let change = PersonalityMachine::enter(&mut self.config, &mut self.state.personality, mood);
        self.report_mood(change);
    }

    /// Berserk mood with maximum aggression.
    pub fn enrage(&mut self) {
        self.force_mood(Mood::Berserk);
        self.config.aggression = AiConfig::MAX_PARAMETER;
    }

    /// Marks which boss phase the owning actor is in.
    pub fn set_boss_phase(&mut self, index: usize) {
        self.state.boss_phase = index;
    }

    /// Clears per-battle state and restores the initial configuration.
    pub fn reset(&mut self) {
        self.state = EngineState::default();
        self.config = self.base_config.clone();
    }

    /// Captures configuration and state for a mid-battle save.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            actor: self.actor,
            config: self.config.clone(),
            state: self.state.clone(),
        }
    }

    /// Restores a snapshot taken from an engine of the same actor.
    pub fn restore(&mut self, snapshot: EngineSnapshot) -> Result<()> {
        if snapshot.actor != self.actor {
            return Err(crate::api::RuntimeError::SnapshotActorMismatch {
                expected: self.actor,
                found: snapshot.actor,
            });
        }
        self.config = snapshot.config.clamped();
        self.state = snapshot.state;
        Ok(())
    }

    fn report_mood(&self, change: MoodChange) {
        if change.from == change.to {
            return;
        }
        tracing::info!(
            "{} mood {} -> {} (threshold {})",
            self.actor,
            change.from,
            change.to,
            change.phase_index
        );
        self.publish(DecisionEvent::MoodChanged {
            actor: self.actor,
            from: change.from,
            to: change.to,
            phase_index: change.phase_index,
        });
    }

    fn publish(&self, event: DecisionEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }
}

impl std::fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("actor", &self.actor)
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
