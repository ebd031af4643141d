//! In-memory arena implementing the core's world traits.
//!
//! The arena owns every combatant (the player sits at
//! [`CombatantId::PLAYER`]) plus static walls. Resolvers see it through
//! [`SpatialQuery`] and [`TargetStore`].
mod obstacle;

use glam::Vec3;
use melody_core::{
    CombatTarget, Combatant, CombatantBody, CombatantId, CombatantTick, Contact, Damageable,
    PlayerRules, PlayerStats, SpatialQuery, TargetStore,
};

pub use obstacle::Wall;

#[derive(Clone, Debug, PartialEq)]
pub struct Arena {
    combatants: Vec<Combatant>,
    walls: Vec<Wall>,
    next_id: u32,
}

impl Arena {
    /// Creates an arena holding only the player.
    pub fn new(player_rules: PlayerRules, player_spawn: Vec3) -> Self {
        let player = Combatant::new(
            CombatantId::PLAYER,
            player_spawn,
            CombatantBody::Player(PlayerStats::new(player_rules)),
        );
        Self {
            combatants: vec![player],
            walls: Vec::new(),
            next_id: CombatantId::PLAYER.0 + 1,
        }
    }

    pub fn spawn_target(&mut self, position: Vec3, target: CombatTarget) -> CombatantId {
        let id = CombatantId(self.next_id);
        self.next_id += 1;
        self.combatants
            .push(Combatant::new(id, position, CombatantBody::Target(target)));
        id
    }

    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.get(CombatantId::PLAYER)
    }

    pub fn player_stats(&self) -> Option<&PlayerStats> {
        self.player().and_then(Combatant::player)
    }

    pub fn player_stats_mut(&mut self) -> Option<&mut PlayerStats> {
        self.get_mut(CombatantId::PLAYER)
            .and_then(Combatant::player_mut)
    }

    /// Advances movement and timers of every combatant.
    pub fn tick(&mut self, dt: f32) -> Vec<(CombatantId, CombatantTick)> {
        self.combatants
            .iter_mut()
            .map(|combatant| (combatant.id, combatant.tick(dt)))
            .collect()
    }
}

impl SpatialQuery for Arena {
    fn contacts(&self) -> Vec<Contact> {
        self.combatants
            .iter()
            .filter(|c| c.is_alive())
            .map(|c| Contact {
                id: c.id,
                kind: c.kind(),
                position: c.position,
                radius: c.radius,
            })
            .collect()
    }

    fn obstacle_distance(&self, origin: Vec3, direction: Vec3, max: f32) -> Option<f32> {
        self.walls
            .iter()
            .filter_map(|wall| wall.ray_distance(origin, direction, max))
            .min_by(f32::total_cmp)
    }

    fn position_of(&self, id: CombatantId) -> Option<Vec3> {
        self.get(id).map(|c| c.position)
    }
}

impl TargetStore for Arena {
    fn damageable_mut(&mut self, id: CombatantId) -> Option<&mut dyn Damageable> {
        self.get_mut(id).map(|c| c as &mut dyn Damageable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use melody_core::{TargetKind, TargetRules};

    #[test]
    fn contacts_skip_dead_targets() {
        let mut arena = Arena::new(PlayerRules::default(), Vec3::ZERO);
        let rules = TargetRules::default();
        let id = arena.spawn_target(Vec3::Z, CombatTarget::hostile(rules));

        assert_eq!(arena.contacts().len(), 2);
        let target = arena.damageable_mut(id).expect("target");
        target.take_damage(rules.max_health * 2.0);
        let kinds: Vec<_> = arena.contacts().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![TargetKind::Player]);
    }

    #[test]
    fn nearest_wall_wins() {
        let mut arena = Arena::new(PlayerRules::default(), Vec3::ZERO);
        arena.add_wall(Wall::new(Vec3::new(0.0, 0.0, 8.0), Vec3::splat(0.5)));
        arena.add_wall(Wall::new(Vec3::new(0.0, 0.0, 4.0), Vec3::splat(0.5)));
        assert_eq!(arena.obstacle_distance(Vec3::ZERO, Vec3::Z, 20.0), Some(3.5));
    }
}
