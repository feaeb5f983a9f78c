//! Scripted hero behavior.
//!
//! The party is the "player" side of the simulation. It follows a fixed,
//! seeded policy so that balancing runs are reproducible, and every action it
//! takes is reported to the enemy engines as a pattern signature.

use combat_core::{ActionKind, ActorStats, Decision, SkillKind, signature};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::battlefield::Battlefield;

/// Party members below this health fraction get healed first.
pub const HEAL_BELOW: f32 = 0.4;

const DEFEND_CHANCE: f64 = 0.15;
const SKILL_CHANCE: f64 = 0.35;
const FOCUS_CHANCE: f64 = 0.6;

/// Party used when an encounter does not bring its own.
pub fn default_party() -> Vec<ActorStats> {
    use combat_core::Skill;

    vec![
        ActorStats::new(1, "Knight").with_hp(420).with_offense(32, 0).with_defense(24, 12).with_speed(10),
        ActorStats::new(2, "Ranger").with_hp(300).with_offense(36, 0).with_defense(14, 12).with_speed(18),
        ActorStats::new(3, "Cleric")
            .with_hp(260)
            .with_mp(90)
            .with_offense(14, 26)
            .with_defense(12, 22)
            .with_speed(11)
            .with_skill(Skill::heal(20, "Restore", 70, 15))
            .with_skill(Skill::damage(21, "Smite", 40, 10)),
    ]
}

pub struct PartyPolicy {
    rng: StdRng,
}

impl PartyPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Chooses `hero`'s action and the signature enemies observe.
    pub fn choose(&mut self, hero: &ActorStats, field: &Battlefield) -> (Decision, String) {
        if let Some(decision) = Self::heal_wounded(hero, &field.party) {
            return (decision, signature(ActionKind::UseSkill, Some("Heal")));
        }

        if self.rng.gen_bool(DEFEND_CHANCE) {
            return (Decision::defend("Holding the line"), signature(ActionKind::Defend, None));
        }

        let living: Vec<&ActorStats> = field.enemies.iter().filter(|e| e.is_alive()).collect();
        let boss = field.boss();
        let Some(weakest) = living.iter().copied().min_by_key(|e| e.hp) else {
            return (Decision::none("No enemies left"), signature(ActionKind::None, None));
        };
        let primary = if boss.is_alive() { boss } else { weakest };

        if let Some(skill) = hero.usable_skills().find(|s| s.kind == SkillKind::Damage)
            && self.rng.gen_bool(SKILL_CHANCE)
        {
            return (
                Decision::use_skill(skill.id, primary.id, format!("{} on {}", skill.name, primary.name)),
                signature(ActionKind::UseSkill, Some(skill.name.as_str())),
            );
        }

        if self.rng.gen_bool(FOCUS_CHANCE) {
            (
                Decision::attack(weakest.id, format!("Finishing off {}", weakest.name)),
                signature(ActionKind::Attack, Some("LowestHP")),
            )
        } else {
            (
                Decision::attack(primary.id, format!("Pressing {}", primary.name)),
                signature(ActionKind::Attack, Some("Boss")),
            )
        }
    }

    fn heal_wounded(hero: &ActorStats, party: &[ActorStats]) -> Option<Decision> {
        let heal = hero.usable_skills().find(|s| s.kind == SkillKind::Heal)?;
        let patient = party
            .iter()
            .filter(|p| p.is_alive() && p.hp_fraction() < HEAL_BELOW)
            .min_by(|a, b| a.hp_fraction().total_cmp(&b.hp_fraction()))?;
        Some(Decision::use_skill(
            heal.id,
            patient.id,
            format!("{} on {}", heal.name, patient.name),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::ActorId;

    #[test]
    fn test_cleric_heals_wounded_first() {
        let mut party = default_party();
        party[1] = party[1].clone().with_current_hp(60);
        let field = Battlefield::new(ActorStats::new(100, "Lich"), Vec::new(), party);
        let cleric = field.party[2].clone();

        let (decision, sig) = PartyPolicy::new(1).choose(&cleric, &field);

        assert_eq!(decision.target, Some(ActorId(2)));
        assert_eq!(sig, "UseSkill:Heal");
    }

    #[test]
    fn test_same_seed_same_choices() {
        let field = Battlefield::new(ActorStats::new(100, "Lich"), Vec::new(), default_party());
        let knight = field.party[0].clone();
        let mut a = PartyPolicy::new(9);
        let mut b = PartyPolicy::new(9);

        for _ in 0..20 {
            assert_eq!(a.choose(&knight, &field), b.choose(&knight, &field));
        }
    }
}
