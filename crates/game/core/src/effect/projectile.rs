use glam::{Quat, Vec3};

use crate::combat::CombatantId;
use crate::env::{CombatWorld, Contact, ProjectileSettings};
use crate::spell::{SpellEffect, SpellPayload};

use super::{CastOrigin, EffectEvent, EffectHandle, apply_to};

#[derive(Clone, Debug, PartialEq)]
struct Shot {
    position: Vec3,
    heading: Vec3,
    pierce_left: u32,
    hits: Vec<CombatantId>,
    spent: bool,
}

/// Burst of homing projectiles fired along one direction.
///
/// Shots spawn one after another from the caster's current position. The
/// whole volley, pending spawns included, ends with the payload duration.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ProjectileVolley {
    effect: SpellEffect,
    power: f32,
    speed: f32,
    size: f32,
    penetration: u32,
    settings: ProjectileSettings,
    caster: CombatantId,
    fallback_origin: Vec3,
    direction: Vec3,
    pending: u32,
    spawn_timer: f32,
    remaining: f32,
    shots: Vec<Shot>,
}

impl ProjectileVolley {
    pub(crate) fn new(
        payload: &SpellPayload,
        settings: ProjectileSettings,
        origin: &CastOrigin,
        direction: Vec3,
    ) -> Self {
        let mut volley = Self {
            effect: payload.effect,
            power: payload.power,
            speed: payload.move_speed,
            size: payload.size_or_range,
            penetration: payload.penetration,
            settings,
            caster: origin.caster,
            fallback_origin: origin.position,
            direction,
            pending: payload.burst_count.max(1),
            spawn_timer: 0.0,
            remaining: payload.duration,
            shots: Vec::new(),
        };
        volley.spawn(origin.position);
        volley
    }

    fn spawn(&mut self, position: Vec3) {
        if self.pending == 0 {
            return;
        }
        self.pending -= 1;
        self.spawn_timer = self.settings.burst_spacing;
        self.shots.push(Shot {
            position,
            heading: self.direction,
            pierce_left: self.penetration,
            hits: Vec::new(),
            spent: false,
        });
    }

    pub(crate) fn live_shots(&self) -> usize {
        self.shots.iter().filter(|shot| !shot.spent).count()
    }

    /// Returns false once the volley is finished.
    pub(crate) fn tick(
        &mut self,
        handle: EffectHandle,
        dt: f32,
        world: &mut dyn CombatWorld,
        events: &mut Vec<EffectEvent>,
    ) -> bool {
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            return false;
        }

        if self.pending > 0 {
            self.spawn_timer -= dt;
            if self.spawn_timer <= 0.0 {
                let from = world
                    .position_of(self.caster)
                    .unwrap_or(self.fallback_origin);
                self.spawn(from);
            }
        }

        let contacts = world.contacts();
        let slow = self.settings.slow;
        for index in 0..self.shots.len() {
            if self.shots[index].spent {
                continue;
            }
            let hits = self.advance_shot(index, dt, &contacts, world);
            for id in hits {
                if let Some(outcome) = apply_to(world, id, self.effect, self.power, slow) {
                    events.push(EffectEvent::Applied {
                        handle,
                        target: id,
                        effect: self.effect,
                        outcome,
                    });
                }
            }
        }

        self.pending > 0 || self.live_shots() > 0
    }

    /// Steers and moves one shot; returns the targets it struck.
    fn advance_shot(
        &mut self,
        index: usize,
        dt: f32,
        contacts: &[Contact],
        world: &dyn CombatWorld,
    ) -> Vec<CombatantId> {
        let settings = self.settings;
        let (effect, caster, speed, size) = (self.effect, self.caster, self.speed, self.size);
        let shot = &mut self.shots[index];

        let sought = |contact: &Contact, hits: &[CombatantId]| {
            contact.id != caster && contact.kind.is_sought_by(effect) && !hits.contains(&contact.id)
        };

        let origin = shot.position;
        let target = contacts
            .iter()
            .filter(|&contact| sought(contact, shot.hits.as_slice()))
            .min_by(|a, b| {
                a.position
                    .distance_squared(origin)
                    .total_cmp(&b.position.distance_squared(origin))
            });

        let mut struck = Vec::new();
        if let Some(target) = target {
            let to_target = target.position - origin;
            let distance = to_target.length();
            if distance <= settings.hit_threshold {
                struck.push(target.id);
            } else if let Some(desired) = to_target.try_normalize() {
                shot.heading = if distance > settings.terminal_distance {
                    turn_towards(shot.heading, desired, settings.turn_speed * dt)
                } else {
                    desired
                };
            }
        }

        if struck.is_empty() {
            let step = speed * dt;
            if world.obstacle_distance(origin, shot.heading, step).is_some() {
                shot.spent = true;
                return struck;
            }
            shot.position += shot.heading * step;

            let position = shot.position;
            struck.extend(
                contacts
                    .iter()
                    .filter(|&contact| sought(contact, shot.hits.as_slice()))
                    .filter(|contact| {
                        let reach = (size + contact.radius).max(settings.hit_threshold);
                        contact.position.distance_squared(position) <= reach * reach
                    })
                    .map(|contact| contact.id),
            );
        }

        let mut landed = Vec::new();
        for id in struck {
            if shot.spent {
                break;
            }
            shot.hits.push(id);
            landed.push(id);
            if shot.pierce_left > 0 {
                shot.pierce_left -= 1;
            } else {
                shot.spent = true;
            }
        }
        landed
    }
}

/// Rotates `heading` towards `desired` by at most `max_angle` radians.
fn turn_towards(heading: Vec3, desired: Vec3, max_angle: f32) -> Vec3 {
    let angle = heading.angle_between(desired);
    if angle <= max_angle {
        return desired;
    }
    let axis = heading.cross(desired).try_normalize().unwrap_or(Vec3::Y);
    (Quat::from_axis_angle(axis, max_angle) * heading).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turning_is_rate_limited() {
        let turned = turn_towards(Vec3::Z, Vec3::X, 0.1);
        assert!((turned.angle_between(Vec3::Z) - 0.1).abs() < 1e-4);
        assert_eq!(turn_towards(Vec3::Z, Vec3::Z, 0.1), Vec3::Z);
    }

    #[test]
    fn opposite_heading_still_turns() {
        let turned = turn_towards(Vec3::Z, Vec3::NEG_Z, 0.5);
        assert!((turned.angle_between(Vec3::Z) - 0.5).abs() < 1e-3);
    }
}
