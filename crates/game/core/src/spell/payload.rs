use arrayvec::ArrayVec;
use bitflags::bitflags;
use glam::Vec3;

use crate::config::GameConfig;
use crate::note::NoteColor;

/// What a spell does to whoever it reaches. Chosen by the first note.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellEffect {
    Damage,
    Heal,
    Slow,
    Shield,
}

impl SpellEffect {
    pub const fn from_root(color: NoteColor) -> Self {
        match color {
            NoteColor::Green => Self::Heal,
            NoteColor::Blue => Self::Slow,
            NoteColor::Red => Self::Damage,
            NoteColor::Yellow => Self::Shield,
        }
    }

    /// Damage and slow go to enemies; heal and shield go to allies.
    pub const fn is_offensive(self) -> bool {
        matches!(self, Self::Damage | Self::Slow)
    }
}

/// How a spell reaches its targets. Chosen by the second note.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellForm {
    Projectile,
    AreaAoE,
    LinearBeam,
    SelfBuff,
}

impl SpellForm {
    pub const fn from_delivery(color: NoteColor) -> Self {
        match color {
            NoteColor::Green => Self::Projectile,
            NoteColor::Blue => Self::AreaAoE,
            NoteColor::Red => Self::LinearBeam,
            NoteColor::Yellow => Self::SelfBuff,
        }
    }
}

bitflags! {
    /// Fire directions relative to the caster's facing.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct FireDirections: u8 {
        const FORWARD = 1 << 0;
        const BACK    = 1 << 1;
        const LEFT    = 1 << 2;
        const RIGHT   = 1 << 3;
    }
}

impl Default for FireDirections {
    fn default() -> Self {
        Self::FORWARD
    }
}

impl FireDirections {
    /// World-space unit vectors for the set directions, in
    /// forward/back/left/right order. Up is +Y.
    pub fn vectors(self, forward: Vec3) -> ArrayVec<Vec3, 4> {
        let forward = forward.try_normalize().unwrap_or(Vec3::Z);
        let right = Vec3::Y.cross(forward).try_normalize().unwrap_or(Vec3::X);

        let mut out = ArrayVec::new();
        for (flag, vector) in [
            (Self::FORWARD, forward),
            (Self::BACK, -forward),
            (Self::LEFT, -right),
            (Self::RIGHT, right),
        ] {
            if self.contains(flag) {
                out.push(vector);
            }
        }
        out
    }
}

/// Fully resolved parameters of one cast. Built fresh per cast and never
/// mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellPayload {
    pub name: String,
    pub description: String,
    /// Built from a melody too short to mean anything; spawns nothing.
    pub broken: bool,
    pub effect: SpellEffect,
    pub delivery: SpellForm,
    pub power: f32,
    /// Projectile radius, area radius, or beam length.
    pub size_or_range: f32,
    pub duration: f32,
    pub move_speed: f32,
    pub tick_rate: f32,
    pub penetration: u32,
    pub burst_count: u32,
    pub damage_decay: f32,
    pub loot_luck_chance: f32,
    pub fire_directions: FireDirections,
}

impl SpellPayload {
    pub fn broken() -> Self {
        Self {
            name: String::from("Broken Spell"),
            description: String::from("Pwr: 0.0"),
            broken: true,
            effect: SpellEffect::Damage,
            delivery: SpellForm::Projectile,
            power: 0.0,
            size_or_range: 0.0,
            duration: 0.0,
            move_speed: 0.0,
            tick_rate: 0.0,
            penetration: 0,
            burst_count: 0,
            damage_decay: 0.0,
            loot_luck_chance: 0.0,
            fire_directions: FireDirections::empty(),
        }
    }

    /// Seconds between periodic pulses.
    pub fn tick_interval(&self) -> f32 {
        if self.tick_rate > 0.0 {
            1.0 / self.tick_rate
        } else {
            GameConfig::IDLE_TICK_INTERVAL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_expand_relative_to_facing() {
        let all = FireDirections::all().vectors(Vec3::Z);
        assert_eq!(all.len(), 4);
        assert!(all[0].abs_diff_eq(Vec3::Z, 1e-6));
        assert!(all[1].abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(all[2].abs_diff_eq(Vec3::NEG_X, 1e-6));
        assert!(all[3].abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn missing_tick_rate_means_idle_interval() {
        let mut payload = SpellPayload::broken();
        assert_eq!(payload.tick_interval(), GameConfig::IDLE_TICK_INTERVAL);
        payload.tick_rate = 2.0;
        assert_eq!(payload.tick_interval(), 0.5);
    }
}
