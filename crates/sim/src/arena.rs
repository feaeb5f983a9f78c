//! One simulated battle: engines, the phase script, the party and the resolver.

use anyhow::Result;
use combat_content::Encounter;
use combat_core::{ActorId, ActorStats, AiConfig, compute_seed};
use combat_runtime::{
    BattleReport, BossPhaseController, DecisionEngine, EngineRegistry, Event, EventBus,
    PhaseEvent, Topic,
};
use tokio::sync::broadcast;

use crate::battlefield::{Battlefield, Side};
use crate::party::{PartyPolicy, default_party};
use crate::resolver::ActionResolver;

/// Battles still running after this many rounds count as an AI win.
pub const MAX_ROUNDS: u32 = 60;

/// Salt for seeds that belong to the battle rather than to an actor.
const BATTLE_STREAM: u32 = u32::MAX;
const PARTY_STREAM: u32 = u32::MAX - 1;

#[derive(Debug, Clone)]
pub struct BattleOutcome {
    pub report: BattleReport,
    /// 1-based phase the boss ended in.
    pub final_phase: usize,
    pub summoned: u32,
}

pub struct Arena<'a> {
    encounter: &'a Encounter,
    boss_config: AiConfig,
    seed: u64,
}

impl<'a> Arena<'a> {
    pub fn new(encounter: &'a Encounter, boss_config: AiConfig, seed: u64) -> Self {
        Self {
            encounter,
            boss_config,
            seed,
        }
    }

    /// Runs battle number `battle` to completion.
    pub fn run(&self, battle: u64) -> Result<BattleOutcome> {
        let encounter = self.encounter;
        let party = if encounter.party.is_empty() {
            default_party()
        } else {
            encounter.party.clone()
        };
        let mut field = Battlefield::new(encounter.boss.clone(), encounter.minions.clone(), party);
        let boss_id = field.boss().id;

        let bus = EventBus::new();
        let mut phase_events = bus.subscribe(Topic::Phase);

        let mut registry = EngineRegistry::new().with_event_bus(bus.clone());
        registry.register(self.engine(boss_id, self.boss_config.clone(), battle)?);
        let minion_config = encounter.minion_config();
        for minion in &encounter.minions {
            registry.register(self.engine(minion.id, minion_config.clone(), battle)?);
        }

        let mut phases =
            BossPhaseController::from_phases(boss_id, encounter.phases.clone())?.with_event_bus(bus);
        if let Some(engine) = registry.engine_mut(boss_id) {
            phases.start(engine, field.boss_mut());
        }

        let mut resolver = ActionResolver::new(compute_seed(self.seed, battle, BATTLE_STREAM));
        let mut policy = PartyPolicy::new(compute_seed(self.seed, battle, PARTY_STREAM));
        let mut report = BattleReport::default();
        let mut summoned = 0;

        let mut round = 0;
        while round < MAX_ROUNDS && !field.boss_defeated() && !field.party_defeated() {
            round += 1;
            tracing::debug!("Round {} begins", round);

            for actor_id in field.turn_order() {
                let Some(actor) = field.actor(actor_id).filter(|a| a.is_alive()).cloned() else {
                    continue;
                };
                let side = field.side(actor_id);

                let decision = match side {
                    Some(Side::Enemy) => registry.decide(&actor, &field.enemies, &field.party),
                    _ => {
                        let (decision, signature) = policy.choose(&actor, &field);
                        registry.record_opponent_action(&signature);
                        decision
                    }
                };
                tracing::debug!(
                    "{} -> {} ({}): {}",
                    actor.name,
                    decision.kind,
                    decision.source,
                    decision.reasoning
                );

                let result = resolver.resolve(&mut field, actor_id, &decision);
                if result.knocked_out
                    && let Some(fallen) = decision.target.and_then(|target| field.actor(target))
                {
                    tracing::info!("{} knocks out {}", actor.name, fallen.name);
                }
                if side == Some(Side::Party) {
                    report.critical_hits += u32::from(result.critical);
                    report.weakness_hits += u32::from(result.weakness);
                    report.technical_hits += u32::from(result.technical);
                } else if let Some(target) = decision.target
                    && field.side(target) == Some(Side::Party)
                {
                    report.damage_taken += result.damage;
                }

                if result.changed_hp()
                    && let Some(engine) = registry.engine_mut(boss_id)
                {
                    let hp = field.boss().hp_fraction();
                    phases.check_transition(hp, engine, field.boss_mut());
                }
                for count in drain_summons(&mut phase_events) {
                    summoned += self.summon(&mut field, &mut registry, count, battle)?;
                }

                if field.boss_defeated() || field.party_defeated() {
                    break;
                }
            }
        }

        report.player_won = field.boss_defeated() && !field.party_defeated();
        report.turns = round;
        report.knockouts = field.party.iter().filter(|hero| !hero.is_alive()).count() as u32;

        tracing::info!(
            "Battle {} over after {} rounds: {} (phase {}, {} KOs)",
            battle + 1,
            round,
            if report.player_won { "party wins" } else { "boss wins" },
            phases.current_phase_number(),
            report.knockouts
        );

        Ok(BattleOutcome {
            report,
            final_phase: phases.current_phase_number(),
            summoned,
        })
    }

    fn engine(&self, actor: ActorId, config: AiConfig, battle: u64) -> Result<DecisionEngine> {
        let seed = compute_seed(self.seed, battle, actor.0);
        Ok(DecisionEngine::try_with_seed(actor, config, seed)?)
    }

    /// Spawns `count` skeletons with their own engines.
    fn summon(
        &self,
        field: &mut Battlefield,
        registry: &mut EngineRegistry,
        count: u32,
        battle: u64,
    ) -> Result<u32> {
        let config = self.encounter.minion_config();
        for _ in 0..count {
            let id = field.next_enemy_id();
            let skeleton = ActorStats::new(id, "Skeleton")
                .with_hp(120)
                .with_offense(18, 0)
                .with_defense(8, 6)
                .with_speed(9);
            registry.register(self.engine(skeleton.id, config.clone(), battle)?);
            field.enemies.push(skeleton);
        }
        tracing::info!("{} summons {} skeletons", field.boss().name, count);
        Ok(count)
    }
}

/// Summon counts requested since the last drain.
fn drain_summons(events: &mut broadcast::Receiver<Event>) -> Vec<u32> {
    let mut counts = Vec::new();
    loop {
        match events.try_recv() {
            Ok(Event::Phase(PhaseEvent::SummonRequested { count, .. })) => counts.push(count),
            Ok(_) => continue,
            Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                tracing::warn!("Missed {} phase events", missed);
            }
            Err(_) => break,
        }
    }
    counts
}
