//! Turns decisions into HP and MP changes.

use combat_core::{ActionKind, ActorId, ActorStats, Decision, SkillKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::battlefield::Battlefield;

/// Chance of a critical hit, in percent.
pub const CRITICAL_CHANCE: u32 = 10;

/// What one resolved action did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    pub damage: u32,
    pub healed: u32,
    pub critical: bool,
    /// A magic hit on a target whose magic defense is its weaker guard.
    pub weakness: bool,
    /// A hit on a debuffed target.
    pub technical: bool,
    pub knocked_out: bool,
}

impl Resolution {
    pub fn changed_hp(&self) -> bool {
        self.damage > 0 || self.healed > 0
    }
}

/// Applies decisions with a seeded damage roll.
pub struct ActionResolver {
    rng: StdRng,
}

impl ActionResolver {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Resolves `decision` taken by `actor`.
    ///
    /// Invalid decisions (unknown target, unaffordable skill) resolve to a pass.
    pub fn resolve(&mut self, field: &mut Battlefield, actor: ActorId, decision: &Decision) -> Resolution {
        let Some(user) = field.actor(actor).cloned() else {
            return Resolution::default();
        };
        field.end_guard(actor);

        match decision.kind {
            ActionKind::Attack => self.attack(field, &user, decision.target),
            ActionKind::UseSkill => self.use_skill(field, &user, decision),
            ActionKind::Defend => {
                field.guard(actor);
                Resolution::default()
            }
            ActionKind::Flee => {
                if let Some(fleeing) = field.actor_mut(actor) {
                    tracing::info!("{} flees the battle", fleeing.name);
                    fleeing.alive = false;
                }
                Resolution::default()
            }
            ActionKind::None => {
                tracing::debug!("{} passes: {}", user.name, decision.reasoning);
                Resolution::default()
            }
        }
    }

    fn attack(&mut self, field: &mut Battlefield, user: &ActorStats, target: Option<ActorId>) -> Resolution {
        let Some(defender) = target.and_then(|id| field.actor(id)).filter(|t| t.is_alive()) else {
            return Resolution::default();
        };
        let base = (user.attack * 2).saturating_sub(defender.defense).max(1);
        let id = defender.id;
        self.strike(field, id, base, false)
    }

    fn use_skill(&mut self, field: &mut Battlefield, user: &ActorStats, decision: &Decision) -> Resolution {
        let Some(skill) = decision.skill.and_then(|id| user.skill(id)).cloned() else {
            return Resolution::default();
        };
        let Some(target_id) = decision.target else {
            return Resolution::default();
        };
        if !field.actor(target_id).is_some_and(ActorStats::is_alive) {
            return Resolution::default();
        }
        let paid = field
            .actor_mut(user.id)
            .is_some_and(|caster| caster.spend_mp(skill.mp_cost));
        if !paid {
            tracing::debug!("{} cannot afford {}", user.name, skill.name);
            return Resolution::default();
        }

        match skill.kind {
            SkillKind::Damage => {
                let Some(defender) = field.actor(target_id) else {
                    return Resolution::default();
                };
                let base = (skill.power + user.magic_attack)
                    .saturating_sub(defender.magic_defense / 2)
                    .max(1);
                let weakness = defender.magic_defense < defender.defense;
                self.strike(field, target_id, base, weakness)
            }
            SkillKind::Heal => {
                let amount = skill.power + user.magic_attack / 2;
                let healed = field.actor_mut(target_id).map_or(0, |t| t.heal(amount));
                Resolution {
                    healed,
                    ..Resolution::default()
                }
            }
            SkillKind::Buff => {
                if let Some(target) = field.actor_mut(target_id) {
                    target.defense += (target.defense / 10).max(1);
                    target.magic_defense += (target.magic_defense / 10).max(1);
                }
                field.guard(target_id);
                Resolution::default()
            }
            SkillKind::Debuff => {
                if let Some(target) = field.actor_mut(target_id) {
                    target.defense -= target.defense / 10;
                }
                field.weaken(target_id);
                Resolution::default()
            }
        }
    }

    fn strike(&mut self, field: &mut Battlefield, target: ActorId, base: u32, weakness: bool) -> Resolution {
        let variance = self.rng.gen_range(90..=110);
        let critical = self.rng.gen_range(1..=100) <= CRITICAL_CHANCE;
        let technical = field.is_weakened(target);

        let mut amount = base * variance / 100;
        if critical {
            amount = amount * 3 / 2;
        }
        if weakness {
            amount = amount * 5 / 4;
        }
        if technical {
            amount = amount * 6 / 5;
        }
        if field.is_guarding(target) {
            amount /= 2;
        }

        let Some(defender) = field.actor_mut(target) else {
            return Resolution::default();
        };
        let damage = defender.take_damage(amount.max(1));
        Resolution {
            damage,
            critical,
            weakness,
            technical,
            knocked_out: !defender.is_alive(),
            ..Resolution::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Skill, SkillId};

    fn field() -> Battlefield {
        Battlefield::new(
            ActorStats::new(100, "Lich")
                .with_mp(50)
                .with_offense(20, 30)
                .with_skill(Skill::damage(1, "Bolt", 40, 10))
                .with_skill(Skill::debuff(2, "Wither", 10)),
            Vec::new(),
            vec![ActorStats::new(1, "Knight").with_hp(300).with_defense(24, 8)],
        )
    }

    #[test]
    fn test_guard_halves_damage() {
        let mut open = field();
        let mut guarded = field();
        guarded.guard(ActorId(1));

        let hit = ActionResolver::new(4).resolve(&mut open, ActorId(100), &Decision::attack(ActorId(1), ""));
        let blocked =
            ActionResolver::new(4).resolve(&mut guarded, ActorId(100), &Decision::attack(ActorId(1), ""));

        assert!(hit.damage > 0);
        assert!(blocked.damage <= hit.damage / 2 + 1);
    }

    #[test]
    fn test_skills_spend_mana_and_flag_weakness() {
        let mut field = field();
        let mut resolver = ActionResolver::new(1);
        let bolt = Decision::use_skill(SkillId(1), ActorId(1), "");

        let result = resolver.resolve(&mut field, ActorId(100), &bolt);

        assert!(result.weakness);
        assert_eq!(field.boss().mp, 40);
    }

    #[test]
    fn test_unaffordable_skill_is_a_pass() {
        let mut field = field();
        field.boss_mut().mp = 5;
        let result = ActionResolver::new(1).resolve(
            &mut field,
            ActorId(100),
            &Decision::use_skill(SkillId(1), ActorId(1), ""),
        );
        assert_eq!(result, Resolution::default());
        assert_eq!(field.party[0].hp, 300);
    }

    #[test]
    fn test_finishing_blow_reports_knockout() {
        let mut field = field();
        let mut resolver = ActionResolver::new(3);

        let graze = resolver.resolve(&mut field, ActorId(100), &Decision::attack(ActorId(1), ""));
        assert!(!graze.knocked_out);

        field.party[0].hp = 1;
        let finish = resolver.resolve(&mut field, ActorId(100), &Decision::attack(ActorId(1), ""));
        assert!(finish.knocked_out);
        assert!(!field.party[0].is_alive());
    }

    #[test]
    fn test_debuff_enables_technical_hits() {
        let mut field = field();
        let mut resolver = ActionResolver::new(2);
        resolver.resolve(&mut field, ActorId(100), &Decision::use_skill(SkillId(2), ActorId(1), ""));

        let hit = resolver.resolve(&mut field, ActorId(100), &Decision::attack(ActorId(1), ""));
        assert!(hit.technical);
    }
}
