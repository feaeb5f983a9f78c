//! Actor statistics as seen by the decision core.
//!
//! [`ActorStats`] is owned and mutated by the surrounding battle system. The
//! decision engine only borrows it; the boss phase controller is the single
//! in-crate writer (stat multipliers, on-enter heals).

use core::fmt;

use crate::skill::{Skill, SkillId};

/// Unique identifier for a combatant within a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Snapshot-friendly combat statistics for one actor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorStats {
    pub id: ActorId,
    pub name: String,
    pub hp: u32,
    pub hp_max: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mp_max: u32,
    pub attack: u32,
    pub defense: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub magic_attack: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub magic_defense: u32,
    pub speed: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<Skill>,
    #[cfg_attr(feature = "serde", serde(default = "default_alive"))]
    pub alive: bool,
}

#[cfg(feature = "serde")]
fn default_alive() -> bool {
    true
}

impl ActorStats {
    /// Creates an actor with modest baseline stats at full resources.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: ActorId(id),
            name: name.into(),
            hp: 100,
            hp_max: 100,
            mp: 0,
            mp_max: 0,
            attack: 10,
            defense: 10,
            magic_attack: 10,
            magic_defense: 10,
            speed: 10,
            skills: Vec::new(),
            alive: true,
        }
    }

    /// Sets both current and maximum HP.
    #[must_use]
    pub fn with_hp(mut self, hp_max: u32) -> Self {
        self.hp = hp_max;
        self.hp_max = hp_max;
        self
    }

    /// Sets current HP only (clamped to max). Zero HP marks the actor as down.
    #[must_use]
    pub fn with_current_hp(mut self, hp: u32) -> Self {
        self.hp = hp.min(self.hp_max);
        self.alive = self.hp > 0;
        self
    }

    /// Sets both current and maximum MP.
    #[must_use]
    pub fn with_mp(mut self, mp_max: u32) -> Self {
        self.mp = mp_max;
        self.mp_max = mp_max;
        self
    }

    #[must_use]
    pub fn with_current_mp(mut self, mp: u32) -> Self {
        self.mp = mp.min(self.mp_max);
        self
    }

    #[must_use]
    pub fn with_offense(mut self, attack: u32, magic_attack: u32) -> Self {
        self.attack = attack;
        self.magic_attack = magic_attack;
        self
    }

    #[must_use]
    pub fn with_defense(mut self, defense: u32, magic_defense: u32) -> Self {
        self.defense = defense;
        self.magic_defense = magic_defense;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.alive && self.hp > 0
    }

    /// Current HP as a fraction of max (0.0 when max is zero).
    pub fn hp_fraction(&self) -> f32 {
        if self.hp_max == 0 {
            return 0.0;
        }
        self.hp as f32 / self.hp_max as f32
    }

    /// Current MP as a fraction of max (0.0 when the actor has no mana pool).
    pub fn mp_fraction(&self) -> f32 {
        if self.mp_max == 0 {
            return 0.0;
        }
        self.mp as f32 / self.mp_max as f32
    }

    /// Offensive threat used for target prioritisation.
    pub fn threat(&self) -> u32 {
        self.attack.max(self.magic_attack)
    }

    pub fn skill(&self, id: SkillId) -> Option<&Skill> {
        self.skills.iter().find(|skill| skill.id == id)
    }

    /// Returns true if the actor knows the skill and can pay for it.
    pub fn can_use(&self, id: SkillId) -> bool {
        self.skill(id).is_some_and(|skill| skill.mp_cost <= self.mp)
    }

    pub fn usable_skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter().filter(|skill| skill.mp_cost <= self.mp)
    }

    pub fn has_skill_kind(&self, kind: crate::SkillKind) -> bool {
        self.skills.iter().any(|skill| skill.kind == kind)
    }

    /// Applies damage and returns the amount actually dealt.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        if self.hp == 0 {
            self.alive = false;
        }
        dealt
    }

    /// Restores HP up to max and returns the amount restored. Downed actors stay down.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let restored = amount.min(self.hp_max - self.hp);
        self.hp += restored;
        restored
    }

    pub fn restore_mp(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.mp_max.saturating_sub(self.mp));
        self.mp += restored;
        restored
    }

    /// Spends MP if available. Returns false (and spends nothing) otherwise.
    pub fn spend_mp(&mut self, amount: u32) -> bool {
        if amount > self.mp {
            return false;
        }
        self.mp -= amount;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Skill;

    #[test]
    fn test_fractions_handle_empty_pools() {
        let actor = ActorStats::new(1, "Shade").with_hp(0);
        assert_eq!(actor.hp_fraction(), 0.0);
        assert_eq!(actor.mp_fraction(), 0.0);
    }

    #[test]
    fn test_damage_marks_actor_down() {
        let mut actor = ActorStats::new(1, "Goblin").with_hp(30);
        assert_eq!(actor.take_damage(50), 30);
        assert!(!actor.is_alive());
        assert_eq!(actor.heal(10), 0);
    }

    #[test]
    fn test_can_use_checks_mana() {
        let actor = ActorStats::new(1, "Acolyte")
            .with_mp(20)
            .with_current_mp(5)
            .with_skill(Skill::heal(7, "Mend", 25, 8));

        assert!(!actor.can_use(crate::SkillId(7)));
        assert!(!actor.can_use(crate::SkillId(99)));
        assert_eq!(actor.usable_skills().count(), 0);
    }

    #[test]
    fn test_spend_and_restore_mp() {
        let mut actor = ActorStats::new(1, "Mage").with_mp(40);
        assert!(actor.spend_mp(30));
        assert!(!actor.spend_mp(30));
        assert_eq!(actor.restore_mp(100), 30);
        assert_eq!(actor.mp, 40);
    }
}
