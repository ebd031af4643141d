use std::collections::BTreeMap;

use glam::Vec3;

use crate::combat::{CombatantId, TargetKind};
use crate::env::{BeamSettings, CombatWorld, Region};
use crate::spell::{SpellEffect, SpellPayload};

use super::{EffectEvent, EffectHandle, apply_to};

/// Power multiplier for a target hit on `streak` consecutive ticks,
/// counting the current one.
///
/// `1 + (streak * interval)^2 * ramp_up_speed`, so a target entering the
/// beam already ramps with a streak of 1.
pub fn ramp_multiplier(streak: u32, interval: f32, ramp_up_speed: f32) -> f32 {
    let dwell = streak as f32 * interval;
    1.0 + dwell * dwell * ramp_up_speed
}

/// Power multiplier for the `rank`-th target along the beam (0 = nearest).
pub fn decay_multiplier(rank: usize, damage_decay: f32) -> f32 {
    (1.0 - rank as f32 * damage_decay).clamp(0.0, 1.0)
}

/// A channelled box projected from the caster.
///
/// Each pulse hits everything inside the (obstacle-clipped) box. Farther
/// targets lose power by rank; targets that stay in the beam ramp up. A
/// target missed for one pulse starts over.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BeamChannel {
    effect: SpellEffect,
    power: f32,
    settings: BeamSettings,
    caster: CombatantId,
    origin: Vec3,
    direction: Vec3,
    length: f32,
    damage_decay: f32,
    interval: f32,
    tick_timer: f32,
    elapsed: f32,
    duration: f32,
    streaks: BTreeMap<CombatantId, u32>,
}

impl BeamChannel {
    pub(crate) fn new(
        payload: &SpellPayload,
        settings: BeamSettings,
        caster: CombatantId,
        origin: Vec3,
        direction: Vec3,
    ) -> Self {
        Self {
            effect: payload.effect,
            power: payload.power,
            settings,
            caster,
            origin,
            direction,
            length: payload.size_or_range,
            damage_decay: payload.damage_decay,
            interval: payload.tick_interval(),
            tick_timer: 0.0,
            elapsed: 0.0,
            duration: payload.duration,
            streaks: BTreeMap::new(),
        }
    }

    pub(crate) fn streak(&self, id: CombatantId) -> u32 {
        self.streaks.get(&id).copied().unwrap_or(0)
    }

    pub(crate) fn tick(
        &mut self,
        handle: EffectHandle,
        dt: f32,
        world: &mut dyn CombatWorld,
        events: &mut Vec<EffectEvent>,
    ) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            return false;
        }
        if let Some(position) = world.position_of(self.caster) {
            self.origin = position;
        }
        self.tick_timer += dt;
        if self.tick_timer >= self.interval {
            self.tick_timer = 0.0;
            self.pulse(handle, world, events);
        }
        true
    }

    /// Beam length after clipping against the nearest obstacle.
    fn reach(&self, world: &dyn CombatWorld) -> f32 {
        world
            .obstacle_distance(self.origin, self.direction, self.length)
            .map(|distance| (distance + self.settings.visual_penetration).min(self.length))
            .unwrap_or(self.length)
    }

    fn pulse(
        &mut self,
        handle: EffectHandle,
        world: &mut dyn CombatWorld,
        events: &mut Vec<EffectEvent>,
    ) {
        let region = Region::Box {
            origin: self.origin,
            direction: self.direction,
            length: self.reach(world),
            half_width: self.settings.half_width,
        };
        let mut hits: Vec<_> = world
            .overlap(&region)
            .into_iter()
            .filter(|contact| contact.kind != TargetKind::Player && contact.id != self.caster)
            .collect();
        hits.sort_by(|a, b| {
            let da = (a.position - self.origin).dot(self.direction);
            let db = (b.position - self.origin).dot(self.direction);
            da.total_cmp(&db)
        });

        let mut streaks = BTreeMap::new();
        for (rank, contact) in hits.iter().enumerate() {
            let streak = self.streak(contact.id) + 1;
            let power = self.power
                * decay_multiplier(rank, self.damage_decay)
                * ramp_multiplier(streak, self.interval, self.settings.ramp_up_speed);
            streaks.insert(contact.id, streak);

            if let Some(outcome) =
                apply_to(world, contact.id, self.effect, power, self.settings.slow)
            {
                events.push(EffectEvent::Applied {
                    handle,
                    target: contact.id,
                    effect: self.effect,
                    outcome,
                });
            }
        }
        self.streaks = streaks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_grows_quadratically_with_dwell() {
        let interval = 1.0 / 1.5;
        assert_eq!(ramp_multiplier(0, interval, 0.5), 1.0);
        let one = ramp_multiplier(1, interval, 0.5);
        let two = ramp_multiplier(2, interval, 0.5);
        assert!((one - (1.0 + interval * interval * 0.5)).abs() < 1e-6);
        assert!((two - (1.0 + 4.0 * interval * interval * 0.5)).abs() < 1e-6);
    }

    #[test]
    fn decay_is_per_rank_and_clamped() {
        assert_eq!(decay_multiplier(0, 0.3), 1.0);
        assert!((decay_multiplier(1, 0.3) - 0.7).abs() < 1e-6);
        assert_eq!(decay_multiplier(5, 0.3), 0.0);
    }
}
