//! Effect resolvers: the runtime shapes a payload takes once fired.
//!
//! Every live resolver sits in an [`EffectArena`] under an [`EffectHandle`],
//! owns its lifetime timer, and is dropped the tick that timer runs out. The
//! arena is ticked once per frame with the host world; resolvers run one at
//! a time in handle order, so target mutations never interleave.
mod area;
mod beam;
mod buff;
mod projectile;

use std::collections::BTreeMap;

use glam::Vec3;

use crate::combat::{CombatantId, EffectOutcome, apply_effect};
use crate::env::{CombatWorld, GameEnv, OracleError, SlowSpec, TablesOracle};
use crate::spell::{SpellEffect, SpellForm, SpellPayload};

pub use beam::{decay_multiplier, ramp_multiplier};

use area::AreaZone;
use beam::BeamChannel;
use buff::SelfBuff;
use projectile::ProjectileVolley;

/// Identifies one live resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectHandle(pub u32);

/// Where and by whom a spell is fired.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastOrigin {
    pub caster: CombatantId,
    pub position: Vec3,
    /// Facing used to orient fire directions.
    pub forward: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectEvent {
    Applied {
        handle: EffectHandle,
        target: CombatantId,
        effect: SpellEffect,
        outcome: EffectOutcome,
    },
    Expired {
        handle: EffectHandle,
        form: SpellForm,
    },
}

#[derive(Clone, Debug, PartialEq)]
enum Resolver {
    Projectile(ProjectileVolley),
    Area(AreaZone),
    Beam(BeamChannel),
    Buff(SelfBuff),
}

impl Resolver {
    fn form(&self) -> SpellForm {
        match self {
            Self::Projectile(_) => SpellForm::Projectile,
            Self::Area(_) => SpellForm::AreaAoE,
            Self::Beam(_) => SpellForm::LinearBeam,
            Self::Buff(_) => SpellForm::SelfBuff,
        }
    }

    fn tick(
        &mut self,
        handle: EffectHandle,
        dt: f32,
        world: &mut dyn CombatWorld,
        events: &mut Vec<EffectEvent>,
    ) -> bool {
        match self {
            Self::Projectile(volley) => volley.tick(handle, dt, world, events),
            Self::Area(zone) => zone.tick(handle, dt, world, events),
            Self::Beam(beam) => beam.tick(handle, dt, world, events),
            Self::Buff(buff) => buff.tick(handle, dt, world, events),
        }
    }
}

/// Live resolvers keyed by handle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectArena {
    next_handle: u32,
    active: BTreeMap<EffectHandle, Resolver>,
}

impl EffectArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materializes a payload: one resolver per fire direction, or a single
    /// buff on the caster. Broken payloads spawn nothing.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::TablesNotAvailable` when the env has no tables.
    pub fn spawn_payload(
        &mut self,
        payload: &SpellPayload,
        origin: CastOrigin,
        env: &GameEnv<'_>,
    ) -> Result<Vec<EffectHandle>, OracleError> {
        let tables: &dyn TablesOracle = env.tables()?;
        if payload.broken {
            return Ok(Vec::new());
        }

        let mut spawned = Vec::new();
        if payload.delivery == SpellForm::SelfBuff {
            spawned.push(self.insert(Resolver::Buff(SelfBuff::new(payload, origin.caster))));
            return Ok(spawned);
        }

        for direction in payload.fire_directions.vectors(origin.forward) {
            let resolver = match payload.delivery {
                SpellForm::Projectile => Resolver::Projectile(ProjectileVolley::new(
                    payload,
                    tables.projectile(),
                    &origin,
                    direction,
                )),
                SpellForm::AreaAoE => Resolver::Area(AreaZone::new(
                    payload,
                    tables.area(),
                    origin.caster,
                    origin.position,
                    direction,
                )),
                SpellForm::LinearBeam => Resolver::Beam(BeamChannel::new(
                    payload,
                    tables.beam(),
                    origin.caster,
                    origin.position,
                    direction,
                )),
                SpellForm::SelfBuff => continue,
            };
            spawned.push(self.insert(resolver));
        }
        Ok(spawned)
    }

    fn insert(&mut self, resolver: Resolver) -> EffectHandle {
        let handle = EffectHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.active.insert(handle, resolver);
        handle
    }

    /// Advances every resolver and drops the finished ones.
    pub fn tick(&mut self, dt: f32, world: &mut dyn CombatWorld) -> Vec<EffectEvent> {
        let mut events = Vec::new();
        let mut finished = Vec::new();
        for (handle, resolver) in self.active.iter_mut() {
            if !resolver.tick(*handle, dt, world, &mut events) {
                finished.push((*handle, resolver.form()));
            }
        }
        for (handle, form) in finished {
            self.active.remove(&handle);
            events.push(EffectEvent::Expired { handle, form });
        }
        events
    }

    /// Destroys a resolver immediately. Returns false for unknown handles.
    pub fn kill(&mut self, handle: EffectHandle) -> bool {
        self.active.remove(&handle).is_some()
    }

    pub fn contains(&self, handle: EffectHandle) -> bool {
        self.active.contains_key(&handle)
    }

    pub fn form_of(&self, handle: EffectHandle) -> Option<SpellForm> {
        self.active.get(&handle).map(Resolver::form)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Highest loot luck among the caster's active buffs.
    pub fn loot_luck(&self, caster: CombatantId) -> f32 {
        self.active
            .values()
            .filter_map(|resolver| match resolver {
                Resolver::Buff(buff) if buff.caster() == caster => Some(buff.loot_luck()),
                _ => None,
            })
            .fold(0.0, f32::max)
    }

    /// Live projectiles across all volleys.
    pub fn projectile_count(&self) -> usize {
        self.active
            .values()
            .map(|resolver| match resolver {
                Resolver::Projectile(volley) => volley.live_shots(),
                _ => 0,
            })
            .sum()
    }
}

pub(crate) fn apply_to(
    world: &mut dyn CombatWorld,
    id: CombatantId,
    effect: SpellEffect,
    power: f32,
    slow: SlowSpec,
) -> Option<EffectOutcome> {
    let target = world.damageable_mut(id)?;
    Some(apply_effect(target, effect, power, slow))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{CombatTarget, Combatant, CombatantBody, Damageable, PlayerStats};
    use crate::env::{
        BalanceTables, Contact, Env, PcgRng, PlayerRules, SpatialQuery, TargetRules, TargetStore,
    };
    use crate::melody::Melody;
    use crate::note::NoteColor::{self, *};
    use crate::spell::SpellBuilder;

    const PLAYER: CombatantId = CombatantId(0);

    #[derive(Default)]
    struct TestWorld {
        combatants: Vec<Combatant>,
        walls: Vec<Vec3>,
    }

    impl TestWorld {
        fn with_player() -> Self {
            let mut world = Self::default();
            world.combatants.push(Combatant::new(
                PLAYER,
                Vec3::ZERO,
                CombatantBody::Player(PlayerStats::new(PlayerRules::default())),
            ));
            world
        }

        fn hostile(mut self, id: u32, position: Vec3) -> Self {
            self.combatants.push(Combatant::new(
                CombatantId(id),
                position,
                CombatantBody::Target(CombatTarget::hostile(TargetRules::default())),
            ));
            self
        }

        fn protected(mut self, id: u32, position: Vec3) -> Self {
            self.combatants.push(Combatant::new(
                CombatantId(id),
                position,
                CombatantBody::Target(CombatTarget::protected(TargetRules::default())),
            ));
            self
        }

        fn get(&self, id: u32) -> &Combatant {
            self.combatants
                .iter()
                .find(|c| c.id == CombatantId(id))
                .expect("combatant")
        }

        fn get_mut(&mut self, id: u32) -> &mut Combatant {
            self.combatants
                .iter_mut()
                .find(|c| c.id == CombatantId(id))
                .expect("combatant")
        }

        fn health(&self, id: u32) -> f32 {
            self.get(id).target().map(CombatTarget::health).expect("target")
        }
    }

    impl SpatialQuery for TestWorld {
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
                .filter_map(|wall| {
                    let along = (*wall - origin).dot(direction);
                    let off_axis = (*wall - origin - direction * along).length();
                    ((0.0..=max).contains(&along) && off_axis <= 0.5).then_some(along)
                })
                .min_by(f32::total_cmp)
        }
    }

    impl TargetStore for TestWorld {
        fn damageable_mut(&mut self, id: CombatantId) -> Option<&mut dyn Damageable> {
            self.combatants
                .iter_mut()
                .find(|c| c.id == id)
                .map(|c| c as &mut dyn Damageable)
        }
    }

    fn payload(colors: &[NoteColor]) -> SpellPayload {
        SpellBuilder::default().build(&Melody::from_colors(1, colors))
    }

    fn fire(arena: &mut EffectArena, payload: &SpellPayload) -> Vec<EffectHandle> {
        let tables = BalanceTables::default();
        let env = Env::with_all(&tables, &PcgRng).into_game_env();
        let origin = CastOrigin {
            caster: PLAYER,
            position: Vec3::ZERO,
            forward: Vec3::Z,
        };
        arena.spawn_payload(payload, origin, &env).expect("tables")
    }

    fn run(
        arena: &mut EffectArena,
        world: &mut TestWorld,
        dt: f32,
        steps: usize,
    ) -> Vec<EffectEvent> {
        (0..steps).flat_map(|_| arena.tick(dt, world)).collect()
    }

    fn damage_dealt_to(events: &[EffectEvent], id: u32) -> Vec<f32> {
        events
            .iter()
            .filter_map(|event| match event {
                EffectEvent::Applied {
                    target,
                    outcome: EffectOutcome::Damaged { dealt, .. },
                    ..
                } if *target == CombatantId(id) => Some(*dealt),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn projectile_homes_and_hits_once() {
        let mut world = TestWorld::with_player().hostile(1, Vec3::new(0.0, 0.0, 10.0));
        let mut arena = EffectArena::new();
        let handles = fire(&mut arena, &payload(&[Red, Green]));
        assert_eq!(handles.len(), 1);

        let events = run(&mut arena, &mut world, 0.05, 40);
        assert_eq!(damage_dealt_to(&events, 1), vec![15.0]);
        assert_eq!(world.health(1), 985.0);
        assert!(arena.is_empty());
        assert!(events.contains(&EffectEvent::Expired {
            handle: handles[0],
            form: SpellForm::Projectile
        }));
    }

    #[test]
    fn penetration_continues_to_next_target() {
        let mut world = TestWorld::with_player()
            .hostile(1, Vec3::new(0.0, 0.0, 6.0))
            .hostile(2, Vec3::new(0.0, 0.0, 10.0));
        let mut arena = EffectArena::new();
        fire(&mut arena, &payload(&[Red, Green, Red]));
        run(&mut arena, &mut world, 0.05, 40);
        assert_eq!(world.health(1), 977.5);
        assert_eq!(world.health(2), 977.5);

        let mut world = TestWorld::with_player()
            .hostile(1, Vec3::new(0.0, 0.0, 6.0))
            .hostile(2, Vec3::new(0.0, 0.0, 10.0));
        let mut arena = EffectArena::new();
        fire(&mut arena, &payload(&[Red, Green]));
        run(&mut arena, &mut world, 0.05, 40);
        assert_eq!(world.health(1), 985.0);
        assert_eq!(world.health(2), 1000.0);
    }

    #[test]
    fn burst_fires_sequential_projectiles() {
        let mut world = TestWorld::with_player().hostile(1, Vec3::new(0.0, 0.0, 8.0));
        let mut arena = EffectArena::new();
        fire(&mut arena, &payload(&[Red, Green, Green]));
        assert_eq!(arena.projectile_count(), 1);
        run(&mut arena, &mut world, 0.05, 4);
        assert_eq!(arena.projectile_count(), 2);
        run(&mut arena, &mut world, 0.05, 40);
        assert_eq!(world.health(1), 970.0);
    }

    #[test]
    fn heal_projectile_seeks_protected_target() {
        let mut world = TestWorld::with_player()
            .hostile(1, Vec3::new(0.0, 0.0, 2.0))
            .protected(2, Vec3::new(3.0, 0.0, 0.0));
        let mut arena = EffectArena::new();
        fire(&mut arena, &payload(&[Green, Green]));
        run(&mut arena, &mut world, 0.05, 40);
        assert_eq!(world.health(2), 215.0);
        assert_eq!(world.health(1), 1000.0);
    }

    #[test]
    fn projectile_stops_at_obstacle() {
        let mut world = TestWorld::with_player().hostile(1, Vec3::new(0.0, 0.0, 10.0));
        world.walls.push(Vec3::new(0.0, 0.0, 4.0));
        let mut arena = EffectArena::new();
        fire(&mut arena, &payload(&[Red, Green]));
        run(&mut arena, &mut world, 0.05, 40);
        assert_eq!(world.health(1), 1000.0);
        assert!(arena.is_empty());
    }

    #[test]
    fn area_pulses_until_duration_expires() {
        let mut world = TestWorld::with_player()
            .hostile(1, Vec3::new(0.0, 0.0, 4.0))
            .hostile(2, Vec3::new(0.0, 0.0, 12.0));
        let mut arena = EffectArena::new();
        fire(&mut arena, &payload(&[Red, Blue]));

        let events = run(&mut arena, &mut world, 0.25, 24);
        assert_eq!(damage_dealt_to(&events, 1), vec![5.0; 4]);
        assert_eq!(world.health(2), 1000.0);
        assert!(arena.is_empty());
    }

    #[test]
    fn area_skips_targets_that_reject_the_effect() {
        let mut world = TestWorld::with_player().protected(1, Vec3::new(0.0, 0.0, 3.0));
        let mut arena = EffectArena::new();
        fire(&mut arena, &payload(&[Red, Blue]));
        let events = run(&mut arena, &mut world, 0.25, 8);
        assert!(events.iter().any(|event| matches!(
            event,
            EffectEvent::Applied {
                outcome: EffectOutcome::Immune,
                ..
            }
        )));
        assert_eq!(world.health(1), 200.0);
    }

    #[test]
    fn beam_decays_by_rank_and_ramps_with_dwell() {
        let mut world = TestWorld::with_player()
            .hostile(1, Vec3::new(0.0, 0.0, 2.0))
            .hostile(2, Vec3::new(0.0, 0.0, 4.0));
        let mut arena = EffectArena::new();
        let beam = payload(&[Red, Red]);
        let interval = beam.tick_interval();
        fire(&mut arena, &beam);

        let ramp = |streak| ramp_multiplier(streak, interval, 0.5);

        let first = arena.tick(interval, &mut world);
        let near = damage_dealt_to(&first, 1);
        assert!((near[0] - 8.0 * ramp(1)).abs() < 1e-4);
        assert!((near[0] - 9.777_778).abs() < 1e-3);
        let far = damage_dealt_to(&first, 2);
        assert!((far[0] - 8.0 * 0.7 * ramp(1)).abs() < 1e-4);

        let second = arena.tick(interval, &mut world);
        let near = damage_dealt_to(&second, 1);
        assert!((near[0] - 8.0 * ramp(2)).abs() < 1e-4);
        assert!((near[0] - 15.111_112).abs() < 1e-3);

        world.get_mut(1).position = Vec3::new(5.0, 0.0, 2.0);
        let third = arena.tick(interval, &mut world);
        assert!(damage_dealt_to(&third, 1).is_empty());
        let promoted = damage_dealt_to(&third, 2);
        assert!((promoted[0] - 8.0 * ramp(3)).abs() < 1e-4);

        // Missing one pulse restarts the streak at 1.
        world.get_mut(1).position = Vec3::new(0.0, 0.0, 2.0);
        let fourth = arena.tick(interval, &mut world);
        let returned = damage_dealt_to(&fourth, 1);
        assert!((returned[0] - 8.0 * ramp(1)).abs() < 1e-4);
    }

    #[test]
    fn beam_is_clipped_by_obstacles() {
        let mut world = TestWorld::with_player()
            .hostile(1, Vec3::new(0.0, 0.0, 2.0))
            .hostile(2, Vec3::new(0.0, 0.0, 5.0));
        world.walls.push(Vec3::new(0.0, 0.0, 3.0));
        let mut arena = EffectArena::new();
        let beam = payload(&[Red, Red]);
        fire(&mut arena, &beam);
        let events = arena.tick(beam.tick_interval(), &mut world);
        assert_eq!(damage_dealt_to(&events, 1).len(), 1);
        assert!(damage_dealt_to(&events, 2).is_empty());
    }

    #[test]
    fn self_buff_shields_caster_and_grants_luck() {
        let mut world = TestWorld::with_player();
        let mut arena = EffectArena::new();
        fire(&mut arena, &payload(&[Yellow, Yellow]));
        assert!((arena.loot_luck(PLAYER) - 0.2).abs() < 1e-6);

        run(&mut arena, &mut world, 0.5, 4);
        let shield = world.get(0).player().map(PlayerStats::shield);
        assert_eq!(shield, Some(40.0));

        run(&mut arena, &mut world, 0.5, 20);
        assert!(arena.is_empty());
        assert_eq!(arena.loot_luck(PLAYER), 0.0);
    }

    #[test]
    fn multiple_directions_spawn_one_resolver_each() {
        let mut arena = EffectArena::new();
        let handles = fire(&mut arena, &payload(&[Red, Green, Yellow, Yellow]));
        assert_eq!(handles.len(), 4);
        assert!(arena.kill(handles[0]));
        assert!(!arena.kill(handles[0]));
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.form_of(handles[1]), Some(SpellForm::Projectile));
    }

    #[test]
    fn broken_payload_spawns_nothing() {
        let mut arena = EffectArena::new();
        assert!(fire(&mut arena, &SpellPayload::broken()).is_empty());

        let env: GameEnv<'_> = Env::empty();
        let origin = CastOrigin {
            caster: PLAYER,
            position: Vec3::ZERO,
            forward: Vec3::Z,
        };
        assert_eq!(
            arena.spawn_payload(&payload(&[Red, Green]), origin, &env),
            Err(OracleError::TablesNotAvailable)
        );
    }
}
