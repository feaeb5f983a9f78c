//! Mutable battle state shared by the arena and the resolver.

use std::collections::BTreeSet;

use combat_core::{ActorId, ActorStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Enemy,
    Party,
}

/// Both sides of one battle. The boss is always `enemies[0]`.
#[derive(Debug, Clone)]
pub struct Battlefield {
    pub enemies: Vec<ActorStats>,
    pub party: Vec<ActorStats>,
    /// Actors that defended since their last turn.
    guarding: BTreeSet<ActorId>,
    /// Actors under a debuff for the rest of the battle.
    weakened: BTreeSet<ActorId>,
}

impl Battlefield {
    pub fn new(boss: ActorStats, minions: Vec<ActorStats>, party: Vec<ActorStats>) -> Self {
        let mut enemies = Vec::with_capacity(minions.len() + 1);
        enemies.push(boss);
        enemies.extend(minions);
        Self {
            enemies,
            party,
            guarding: BTreeSet::new(),
            weakened: BTreeSet::new(),
        }
    }

    pub fn boss(&self) -> &ActorStats {
        &self.enemies[0]
    }

    pub fn boss_mut(&mut self) -> &mut ActorStats {
        &mut self.enemies[0]
    }

    pub fn side(&self, id: ActorId) -> Option<Side> {
        if self.enemies.iter().any(|a| a.id == id) {
            Some(Side::Enemy)
        } else if self.party.iter().any(|a| a.id == id) {
            Some(Side::Party)
        } else {
            None
        }
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorStats> {
        self.enemies.iter().chain(&self.party).find(|a| a.id == id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut ActorStats> {
        self.enemies
            .iter_mut()
            .chain(self.party.iter_mut())
            .find(|a| a.id == id)
    }

    /// Living combatants by descending speed; ties go to the lower id.
    pub fn turn_order(&self) -> Vec<ActorId> {
        let mut living: Vec<&ActorStats> = self
            .enemies
            .iter()
            .chain(&self.party)
            .filter(|a| a.is_alive())
            .collect();
        living.sort_by(|a, b| b.speed.cmp(&a.speed).then(a.id.cmp(&b.id)));
        living.into_iter().map(|a| a.id).collect()
    }

    pub fn next_enemy_id(&self) -> u32 {
        self.enemies.iter().map(|a| a.id.0).max().unwrap_or(0) + 1
    }

    pub fn guard(&mut self, id: ActorId) {
        self.guarding.insert(id);
    }

    /// Clears a guard at the start of the guarding actor's next turn.
    pub fn end_guard(&mut self, id: ActorId) {
        self.guarding.remove(&id);
    }

    pub fn is_guarding(&self, id: ActorId) -> bool {
        self.guarding.contains(&id)
    }

    pub fn weaken(&mut self, id: ActorId) {
        self.weakened.insert(id);
    }

    pub fn is_weakened(&self, id: ActorId) -> bool {
        self.weakened.contains(&id)
    }

    pub fn boss_defeated(&self) -> bool {
        !self.boss().is_alive()
    }

    pub fn party_defeated(&self) -> bool {
        self.party.iter().all(|a| !a.is_alive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_order_by_speed_then_id() {
        let field = Battlefield::new(
            ActorStats::new(100, "Boss").with_speed(12),
            vec![ActorStats::new(101, "Priest").with_speed(14)],
            vec![
                ActorStats::new(1, "Knight").with_speed(12),
                ActorStats::new(2, "Ranger").with_speed(18),
                ActorStats::new(3, "Cleric").with_current_hp(0),
            ],
        );

        let order: Vec<u32> = field.turn_order().into_iter().map(|id| id.0).collect();
        assert_eq!(order, vec![2, 101, 1, 100]);
        assert_eq!(field.side(ActorId(3)), Some(Side::Party));
        assert_eq!(field.next_enemy_id(), 102);
    }
}
