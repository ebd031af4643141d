use glam::Vec3;

use crate::combat::{CombatantId, TargetKind};
use crate::env::{AreaSettings, CombatWorld, Region};
use crate::spell::{SpellEffect, SpellPayload};

use super::{EffectEvent, EffectHandle, apply_to};

/// A zone that grows to full radius and pulses its effect on a timer.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AreaZone {
    effect: SpellEffect,
    power: f32,
    settings: AreaSettings,
    caster: CombatantId,
    center: Vec3,
    max_radius: f32,
    interval: f32,
    tick_timer: f32,
    elapsed: f32,
    duration: f32,
}

impl AreaZone {
    pub(crate) fn new(
        payload: &SpellPayload,
        settings: AreaSettings,
        caster: CombatantId,
        origin: Vec3,
        direction: Vec3,
    ) -> Self {
        Self {
            effect: payload.effect,
            power: payload.power,
            settings,
            caster,
            center: origin + direction * settings.spawn_offset,
            max_radius: payload.size_or_range,
            interval: payload.tick_interval(),
            tick_timer: 0.0,
            elapsed: 0.0,
            duration: payload.duration,
        }
    }

    pub(crate) fn center(&self) -> Vec3 {
        self.center
    }

    /// Radius at the current age, growing linearly over the expand time.
    pub(crate) fn current_radius(&self) -> f32 {
        let start = self.settings.start_radius.min(self.max_radius);
        let progress = if self.settings.expand_time > 0.0 {
            (self.elapsed / self.settings.expand_time).min(1.0)
        } else {
            1.0
        };
        start + (self.max_radius - start) * progress
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
        self.tick_timer += dt;
        if self.tick_timer >= self.interval {
            self.tick_timer = 0.0;
            self.pulse(handle, world, events);
        }
        true
    }

    fn pulse(
        &self,
        handle: EffectHandle,
        world: &mut dyn CombatWorld,
        events: &mut Vec<EffectEvent>,
    ) {
        let region = Region::Sphere {
            center: self.center,
            radius: self.current_radius(),
        };
        let inside = world.overlap(&region);
        for contact in inside {
            if contact.kind == TargetKind::Player || contact.id == self.caster {
                continue;
            }
            if let Some(outcome) =
                apply_to(world, contact.id, self.effect, self.power, self.settings.slow)
            {
                events.push(EffectEvent::Applied {
                    handle,
                    target: contact.id,
                    effect: self.effect,
                    outcome,
                });
            }
        }
    }
}
