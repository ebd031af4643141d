use crate::env::{
    AreaSettings, BalanceTables, BeamSettings, BuffSettings, ProgressionRules, ProjectileSettings,
    TablesOracle,
};
use crate::melody::Melody;
use crate::note::NoteColor;

use super::payload::{FireDirections, SpellEffect, SpellForm, SpellPayload};

/// Turns a melody into a payload.
///
/// The builder snapshots the balance tables when created, so `build` is a
/// pure function of the melody.
#[derive(Clone, Debug, PartialEq)]
pub struct SpellBuilder {
    projectile: ProjectileSettings,
    area: AreaSettings,
    beam: BeamSettings,
    buff: BuffSettings,
    progression: ProgressionRules,
}

impl SpellBuilder {
    pub fn from_oracle(tables: &dyn TablesOracle) -> Self {
        Self {
            projectile: tables.projectile(),
            area: tables.area(),
            beam: tables.beam(),
            buff: tables.buff(),
            progression: tables.progression(),
        }
    }

    pub fn build(&self, melody: &Melody) -> SpellPayload {
        let mut colors = melody.colors();
        let (Some(root), Some(delivery)) = (colors.next(), colors.next()) else {
            return SpellPayload::broken();
        };

        let effect = SpellEffect::from_root(root);
        let form = SpellForm::from_delivery(delivery);
        let mut payload = self.base(effect, form);

        let level_steps = melody.level.saturating_sub(1) as f32;
        payload.power *= 1.0 + level_steps * self.progression.power_per_level;

        let mut yellow_count = 0u32;
        for color in colors {
            match color {
                NoteColor::Red => self.extend_red(&mut payload),
                NoteColor::Blue => self.extend_blue(&mut payload),
                NoteColor::Green => self.extend_green(&mut payload),
                NoteColor::Yellow => {
                    yellow_count += 1;
                    self.extend_yellow(&mut payload, yellow_count);
                }
            }
        }

        payload.name = format!("{} {} Lv.{}", effect, form, melody.level);
        payload.description = describe(&payload);
        payload
    }

    fn base(&self, effect: SpellEffect, delivery: SpellForm) -> SpellPayload {
        let mut payload = SpellPayload {
            broken: false,
            effect,
            delivery,
            burst_count: 1,
            fire_directions: FireDirections::FORWARD,
            ..SpellPayload::broken()
        };
        match delivery {
            SpellForm::Projectile => {
                let s = &self.projectile;
                payload.power = s.power;
                payload.size_or_range = s.size;
                payload.duration = s.duration;
                payload.move_speed = s.speed;
            }
            SpellForm::AreaAoE => {
                let s = &self.area;
                payload.power = s.power;
                payload.size_or_range = s.radius;
                payload.duration = s.duration;
                payload.tick_rate = s.tick_rate;
            }
            SpellForm::LinearBeam => {
                let s = &self.beam;
                payload.power = s.power;
                payload.size_or_range = s.length;
                payload.duration = s.duration;
                payload.tick_rate = s.tick_rate;
                payload.damage_decay = s.damage_decay;
            }
            SpellForm::SelfBuff => {
                let s = &self.buff;
                payload.power = s.power;
                payload.duration = s.duration;
                payload.tick_rate = s.tick_rate;
                payload.loot_luck_chance = s.loot_luck_chance;
            }
        }
        payload
    }

    fn extend_red(&self, payload: &mut SpellPayload) {
        payload.power *= self.progression.red_power_factor;
        match payload.delivery {
            SpellForm::Projectile => payload.penetration += 1,
            SpellForm::LinearBeam => payload.damage_decay *= self.progression.red_decay_factor,
            SpellForm::AreaAoE | SpellForm::SelfBuff => {}
        }
    }

    fn extend_blue(&self, payload: &mut SpellPayload) {
        payload.size_or_range *= self.progression.blue_size_factor;
        payload.duration += self.progression.blue_duration_bonus;
    }

    fn extend_green(&self, payload: &mut SpellPayload) {
        if payload.delivery == SpellForm::Projectile {
            payload.burst_count += 1;
        } else if self.progression.green_tick_factor > 0.0 {
            payload.tick_rate /= self.progression.green_tick_factor;
        }
    }

    /// `nth` is 1-based among yellow extensions.
    fn extend_yellow(&self, payload: &mut SpellPayload, nth: u32) {
        if payload.delivery == SpellForm::SelfBuff {
            payload.loot_luck_chance += self.progression.yellow_luck_bonus;
        } else if nth == 1 {
            payload.fire_directions |= FireDirections::BACK;
        } else {
            payload.fire_directions |= FireDirections::LEFT | FireDirections::RIGHT;
        }
    }
}

impl Default for SpellBuilder {
    fn default() -> Self {
        Self::from_oracle(&BalanceTables::default())
    }
}

fn describe(payload: &SpellPayload) -> String {
    let mut text = format!("Pwr: {:.1}", payload.power);
    if payload.burst_count > 1 {
        text.push_str(&format!(" | Burst x{}", payload.burst_count));
    }
    if payload.penetration > 0 {
        text.push_str(&format!(" | Pierce {}", payload.penetration));
    }
    text
}
