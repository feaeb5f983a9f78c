//! Behavioral properties of the decision engine and boss phases.

use combat_core::{
    ActionKind, ActorId, ActorStats, AiConfig, BossPhase, DecisionSource, FixedRoll, ModuleFlags,
    Preset, Skill, SkillId, SkillTarget,
};
use combat_runtime::engine::PATTERN_CAPACITY;
use combat_runtime::{BossPhaseController, DecisionEngine, EngineRegistry};

fn lich() -> ActorStats {
    ActorStats::new(1, "Lich")
        .with_hp(200)
        .with_mp(100)
        .with_offense(20, 30)
        .with_skill(Skill::debuff(1, "Wither", 10))
        .with_skill(Skill::damage(2, "Grave Bolt", 40, 10))
        .with_skill(Skill::damage(3, "Soul Rend", 90, 30))
        .with_skill(Skill::heal(4, "Drain Life", 50, 15))
        .with_skill(Skill::buff(5, "Bone Ward", SkillTarget::SelfOnly, 5))
}

fn party() -> Vec<ActorStats> {
    vec![
        ActorStats::new(10, "Knight").with_defense(30, 10).with_offense(25, 0),
        ActorStats::new(11, "Ranger").with_defense(12, 10).with_offense(30, 0),
        ActorStats::new(12, "Cleric").with_defense(20, 25).with_offense(5, 35),
    ]
}

#[test]
fn pattern_history_is_bounded_fifo() {
    let mut engine = DecisionEngine::new(ActorId(1), Preset::Hard.config(), FixedRoll::NEVER);

    for i in 0..25 {
        engine.record_opponent_action(&format!("Attack:Move{i}"));
        assert!(engine.patterns().len() <= PATTERN_CAPACITY);
    }

    let recent: Vec<&str> = engine.patterns().entries().iter().map(String::as_str).collect();
    assert_eq!(recent.len(), PATTERN_CAPACITY);
    assert_eq!(recent.first(), Some(&"Attack:Move15"));
    assert_eq!(recent.last(), Some(&"Attack:Move24"));
}

#[test]
fn losing_battle_triggers_desperate_gamble() {
    let mut engine = DecisionEngine::new(ActorId(1), Preset::Nightmare.config(), FixedRoll::NEVER);
    let wounded = lich().with_current_hp(30);

    let decision = engine.decide(&wounded, &[], &party());

    assert!(engine.momentum() < -40.0);
    assert_eq!(decision.kind, ActionKind::UseSkill);
    assert_eq!(decision.skill, Some(SkillId(3)));
    assert_eq!(decision.source, DecisionSource::Risk);
    assert!(decision.reasoning.to_lowercase().contains("desperate"));
}

#[test]
fn focus_pattern_triggers_pre_heal_on_weakest_ally() {
    let config = Preset::Hard
        .config()
        .with_modules(
            ModuleFlags::PREDICTION | ModuleFlags::COUNTER_PREDICTION | ModuleFlags::PATTERN_LEARNING,
        )
        .with_prediction_accuracy(80);
    let mut engine = DecisionEngine::new(ActorId(1), config, FixedRoll::ALWAYS);
    for signature in ["Attack:LowestHP", "Defend", "Attack:LowestHP"] {
        engine.record_opponent_action(signature);
    }
    let allies = [
        ActorStats::new(2, "Bone Priest").with_hp(120).with_current_hp(36),
        ActorStats::new(3, "Skeleton").with_current_hp(50),
    ];

    let decision = engine.decide(&lich(), &allies, &party());

    assert_eq!(decision.kind, ActionKind::UseSkill);
    assert_eq!(decision.skill, Some(SkillId(4)));
    assert_eq!(decision.target, Some(ActorId(2)));
    assert_eq!(decision.source, DecisionSource::Prediction);
}

fn contested_config(extra: ModuleFlags) -> AiConfig {
    AiConfig {
        teamwork_priority: 80,
        prediction_accuracy: 80,
        mp_conservation_threshold: 50,
        planning_depth: 3,
        ..AiConfig::new()
    }
    .with_modules(
        ModuleFlags::COORDINATION
            | ModuleFlags::PREDICTION
            | ModuleFlags::COUNTER_PREDICTION
            | ModuleFlags::PATTERN_LEARNING
            | ModuleFlags::DESPERATION_MOVES
            | ModuleFlags::RESOURCE_MANAGEMENT
            | extra,
    )
}

fn contested_engine(extra: ModuleFlags) -> DecisionEngine {
    DecisionEngine::new(ActorId(1), contested_config(extra), FixedRoll::ALWAYS)
}

fn bone_priest(hp: u32) -> ActorStats {
    ActorStats::new(2, "Bone Priest")
        .with_current_hp(hp)
        .with_skill(Skill::heal(20, "Mend", 30, 5))
}

fn record_focus_pattern(engine: &mut DecisionEngine) {
    for signature in ["Attack:LowestHP", "Defend", "Attack:LowestHP"] {
        engine.record_opponent_action(signature);
    }
}

#[test]
fn cascade_respects_priority_order() {
    let aegis = Skill::buff(6, "Dread Aegis", SkillTarget::Ally, 5);
    let wounded = lich().with_current_hp(30).with_current_mp(40);
    let party = party();
    let allies = [bone_priest(40)];

    // Every stage has a reason to act: coordination wins.
    let mut engine = contested_engine(ModuleFlags::empty());
    record_focus_pattern(&mut engine);
    let decision = engine.decide(&wounded.clone().with_skill(aegis.clone()), &allies, &party);
    assert_eq!(decision.source, DecisionSource::Coordination);
    assert_eq!(decision.skill, Some(SkillId(6)));
    assert_eq!(decision.target, Some(ActorId(2)));

    // Nothing to shield and nobody to focus: prediction pre-heals.
    let mut engine = contested_engine(ModuleFlags::empty());
    record_focus_pattern(&mut engine);
    let decision = engine.decide(&wounded, &allies, &party);
    assert_eq!(decision.source, DecisionSource::Prediction);
    assert_eq!(decision.skill, Some(SkillId(4)));
    assert_eq!(decision.target, Some(ActorId(1)));

    // No history to read: the losing momentum forces a desperate gamble.
    let mut engine = contested_engine(ModuleFlags::empty());
    let decision = engine.decide(&wounded, &allies, &party);
    assert!(engine.momentum() < -40.0);
    assert_eq!(decision.source, DecisionSource::Risk);
    assert_eq!(decision.skill, Some(SkillId(3)));

    // Healthy enough to avoid the gamble, but short on mana.
    let mut engine = contested_engine(ModuleFlags::empty());
    let decision = engine.decide(&lich().with_current_mp(40), &allies, &party);
    assert!(engine.momentum() >= -40.0);
    assert_eq!(decision.source, DecisionSource::Conservation);
    assert_eq!(decision.kind, ActionKind::Attack);
}

#[test]
fn queued_plan_outranks_every_module() {
    let mut engine = contested_engine(ModuleFlags::STRATEGIC_PLANNING);
    let party = party();

    let opening = engine.decide(&lich(), &[bone_priest(100)], &party);
    assert_eq!(opening.source, DecisionSource::Baseline);
    assert_eq!(engine.state().plan.len(), 3);

    record_focus_pattern(&mut engine);
    let wounded = lich()
        .with_current_hp(30)
        .with_current_mp(40)
        .with_skill(Skill::buff(6, "Dread Aegis", SkillTarget::Ally, 5));
    let decision = engine.decide(&wounded, &[bone_priest(40)], &party);

    assert_eq!(decision.source, DecisionSource::Plan);
    assert_eq!(decision.skill, Some(SkillId(1)));
    assert_eq!(decision.target, Some(ActorId(11)));
    assert_eq!(engine.state().plan.len(), 2);
}

#[test]
fn combo_plan_executes_in_order() {
    let config = AiConfig::new()
        .with_modules(ModuleFlags::STRATEGIC_PLANNING)
        .with_planning_depth(4);
    let mut engine = DecisionEngine::new(ActorId(1), config, FixedRoll::NEVER);
    let lich = lich();
    let party = party();

    engine.decide(&lich, &[], &party);
    let turns: Vec<_> = (0..3).map(|_| engine.decide(&lich, &[], &party)).collect();

    assert_eq!(turns[0].kind, ActionKind::UseSkill);
    assert_eq!(turns[0].skill, Some(SkillId(1)));
    assert_eq!(turns[1].kind, ActionKind::Defend);
    assert_eq!(turns[2].kind, ActionKind::UseSkill);
    assert_eq!(turns[2].skill, Some(SkillId(3)));
    assert!(turns.iter().all(|d| d.target == turns[0].target || d.kind == ActionKind::Defend));
}

#[test]
fn dead_target_drops_planned_step() {
    let config = AiConfig::new()
        .with_modules(ModuleFlags::STRATEGIC_PLANNING)
        .with_planning_depth(3);
    let mut engine = DecisionEngine::new(ActorId(1), config, FixedRoll::NEVER);
    let lich = lich();
    let mut party = party();

    engine.decide(&lich, &[], &party);
    assert_eq!(engine.state().plan.len(), 3);

    // The lowest-defense opponent falls; the debuff step now targets the next weakest.
    party[1].take_damage(1000);
    let decision = engine.decide(&lich, &[], &party);
    assert_eq!(decision.target, Some(ActorId(12)));

    // Without mana the finisher can no longer be paid for and is discarded.
    let drained = lich.clone().with_current_mp(0);
    engine.decide(&drained, &[], &party);
    let after = engine.decide(&drained, &[], &party);
    assert_ne!(after.source, DecisionSource::Plan);
    assert!(engine.state().plan.is_empty());
}

#[test]
fn phases_only_move_forward() {
    let phases = vec![
        BossPhase::new("Dormant", 1.0),
        BossPhase::new("Cracked", 0.6),
        BossPhase::new("Unbound", 0.25).enraged(),
    ];
    let mut controller = BossPhaseController::from_phases(ActorId(1), phases).unwrap();
    let mut engine = DecisionEngine::with_seed(ActorId(1), Preset::Hard.config(), 9);
    let mut boss = lich();
    controller.start(&mut engine, &mut boss);

    let readings = [0.9, 0.59, 0.7, 0.58, 0.3, 0.2, 0.95, 0.1, 0.0];
    let mut last = controller.current_phase_number();
    let mut transitions = 0;
    for hp in readings {
        if controller.check_transition(hp, &mut engine, &mut boss) {
            transitions += 1;
        }
        let now = controller.current_phase_number();
        assert!(now >= last, "phase went back at hp {hp}");
        last = now;
    }

    assert_eq!(transitions, 2);
    assert!(controller.is_final_phase());
    assert_eq!(engine.boss_phase(), 2);
}

#[test]
fn registry_routes_battle_turns() {
    let mut registry = EngineRegistry::new();
    registry.register(DecisionEngine::with_seed(ActorId(1), Preset::Normal.config(), 11));

    let party = party();
    let decision = registry.decide(&lich(), &[], &party);
    assert!(!decision.is_none());

    let stray = registry.decide(&ActorStats::new(99, "Wisp"), &[], &party);
    assert!(stray.is_none());
}
