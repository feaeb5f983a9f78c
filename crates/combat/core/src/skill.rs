//! Skill definitions.
//!
//! Skills are the only actions that cost a resource. The decision core reads
//! them to find debuffs, heals, buffs and finishers; the surrounding battle
//! system resolves their effects.

use core::fmt;

/// Stable identifier for a skill within a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillId(pub u32);

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skill#{}", self.0)
    }
}

/// Broad effect category of a skill.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum SkillKind {
    /// Deals damage to an opponent.
    Damage,
    /// Restores health.
    Heal,
    /// Raises a stat of the target (defense buffs protect allies).
    Buff,
    /// Lowers a stat of an opponent.
    Debuff,
}

/// Who a skill may be aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillTarget {
    /// Any living opponent.
    Opponent,
    /// Any living member of the caster's side, caster included.
    Ally,
    /// The caster only.
    SelfOnly,
}

/// A skill known by an actor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub kind: SkillKind,
    pub target: SkillTarget,
    /// Relative strength; used for finisher and gamble selection.
    #[cfg_attr(feature = "serde", serde(default))]
    pub power: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mp_cost: u32,
}

impl Skill {
    pub fn new(id: u32, name: impl Into<String>, kind: SkillKind, target: SkillTarget) -> Self {
        Self {
            id: SkillId(id),
            name: name.into(),
            kind,
            target,
            power: 0,
            mp_cost: 0,
        }
    }

    /// Offensive skill aimed at an opponent.
    pub fn damage(id: u32, name: impl Into<String>, power: u32, mp_cost: u32) -> Self {
        Self::new(id, name, SkillKind::Damage, SkillTarget::Opponent)
            .with_power(power)
            .with_mp_cost(mp_cost)
    }

    /// Healing skill usable on any member of the caster's side.
    pub fn heal(id: u32, name: impl Into<String>, power: u32, mp_cost: u32) -> Self {
        Self::new(id, name, SkillKind::Heal, SkillTarget::Ally)
            .with_power(power)
            .with_mp_cost(mp_cost)
    }

    pub fn buff(id: u32, name: impl Into<String>, target: SkillTarget, mp_cost: u32) -> Self {
        Self::new(id, name, SkillKind::Buff, target).with_mp_cost(mp_cost)
    }

    pub fn debuff(id: u32, name: impl Into<String>, mp_cost: u32) -> Self {
        Self::new(id, name, SkillKind::Debuff, SkillTarget::Opponent).with_mp_cost(mp_cost)
    }

    #[must_use]
    pub fn with_power(mut self, power: u32) -> Self {
        self.power = power;
        self
    }

    #[must_use]
    pub fn with_mp_cost(mut self, mp_cost: u32) -> Self {
        self.mp_cost = mp_cost;
        self
    }

    /// Returns true if the skill can be aimed at another member of the caster's side.
    pub const fn targets_allies(&self) -> bool {
        matches!(self.target, SkillTarget::Ally)
    }

    /// Returns true if the caster may aim the skill at itself.
    pub const fn can_target_self(&self) -> bool {
        matches!(self.target, SkillTarget::Ally | SkillTarget::SelfOnly)
    }

    pub const fn is_offensive(&self) -> bool {
        matches!(self.kind, SkillKind::Damage | SkillKind::Debuff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_targeting() {
        assert!(Skill::heal(1, "Mend", 30, 8).targets_allies());
        assert!(Skill::buff(2, "Bulwark", SkillTarget::SelfOnly, 5).can_target_self());
        assert!(!Skill::buff(2, "Bulwark", SkillTarget::SelfOnly, 5).targets_allies());
        assert!(Skill::debuff(3, "Hex", 6).is_offensive());
        assert!(!Skill::heal(1, "Mend", 30, 8).is_offensive());
    }

    #[test]
    fn test_kind_parses_case_insensitive() {
        assert_eq!("debuff".parse::<SkillKind>().ok(), Some(SkillKind::Debuff));
        assert_eq!(SkillKind::Heal.as_ref(), "Heal");
    }
}
