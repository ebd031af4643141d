use crate::combat::CombatantId;
use crate::env::{CombatWorld, SlowSpec};
use crate::spell::{SpellEffect, SpellPayload};

use super::{EffectEvent, EffectHandle, apply_to};

/// Periodic heal or shield on the caster, plus loot luck while it lasts.
///
/// Offensive effects on a self buff only carry the luck bonus.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SelfBuff {
    effect: SpellEffect,
    power: f32,
    caster: CombatantId,
    loot_luck: f32,
    interval: f32,
    tick_timer: f32,
    elapsed: f32,
    duration: f32,
}

impl SelfBuff {
    pub(crate) fn new(payload: &SpellPayload, caster: CombatantId) -> Self {
        Self {
            effect: payload.effect,
            power: payload.power,
            caster,
            loot_luck: payload.loot_luck_chance,
            interval: payload.tick_interval(),
            tick_timer: 0.0,
            elapsed: 0.0,
            duration: payload.duration,
        }
    }

    pub(crate) fn loot_luck(&self) -> f32 {
        self.loot_luck
    }

    pub(crate) fn caster(&self) -> CombatantId {
        self.caster
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
            if self.effect.is_offensive() {
                return true;
            }
            let slow = SlowSpec::new(0.0, 0.0);
            if let Some(outcome) = apply_to(world, self.caster, self.effect, self.power, slow) {
                events.push(EffectEvent::Applied {
                    handle,
                    target: self.caster,
                    effect: self.effect,
                    outcome,
                });
            }
        }
        true
    }
}
