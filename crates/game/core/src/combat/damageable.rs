use bitflags::bitflags;

use crate::env::SlowSpec;
use crate::spell::SpellEffect;

bitflags! {
    /// Effect kinds a target reacts to. Anything else is ignored as immune.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EffectAcceptance: u8 {
        const DAMAGE = 1 << 0;
        const HEAL   = 1 << 1;
        const SHIELD = 1 << 2;
        const SLOW   = 1 << 3;
    }
}

impl EffectAcceptance {
    pub const fn of(effect: SpellEffect) -> Self {
        match effect {
            SpellEffect::Damage => Self::DAMAGE,
            SpellEffect::Heal => Self::HEAL,
            SpellEffect::Shield => Self::SHIELD,
            SpellEffect::Slow => Self::SLOW,
        }
    }

    pub const fn accepts(self, effect: SpellEffect) -> bool {
        self.contains(Self::of(effect))
    }
}

/// Combatant variants.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TargetKind {
    /// Enemies: take damage and slows.
    Hostile,
    /// Escorted allies: take heals and shields only.
    Protected,
    Player,
}

impl TargetKind {
    pub const fn acceptance(self) -> EffectAcceptance {
        match self {
            Self::Hostile => EffectAcceptance::DAMAGE.union(EffectAcceptance::SLOW),
            Self::Protected => EffectAcceptance::HEAL.union(EffectAcceptance::SHIELD),
            Self::Player => EffectAcceptance::DAMAGE
                .union(EffectAcceptance::HEAL)
                .union(EffectAcceptance::SHIELD),
        }
    }

    /// Whether homing spells of `effect` pick this kind as a target.
    pub const fn is_sought_by(self, effect: SpellEffect) -> bool {
        match self {
            Self::Hostile => effect.is_offensive(),
            Self::Protected => !effect.is_offensive(),
            Self::Player => false,
        }
    }
}

/// What an effect did to a target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectOutcome {
    /// The target's variant does not accept this effect.
    Immune,
    /// The target is dead, frozen against further slows, or otherwise unaffected.
    Ignored,
    Damaged {
        absorbed: f32,
        dealt: f32,
        killed: bool,
    },
    /// Damage drained stamina instead of health.
    Guarded {
        stamina: f32,
        exhausted: bool,
    },
    Healed {
        amount: f32,
    },
    Shielded {
        amount: f32,
    },
    Slowed {
        percent: f32,
        froze: bool,
    },
}

impl EffectOutcome {
    pub const fn landed(&self) -> bool {
        !matches!(self, Self::Immune | Self::Ignored)
    }
}

/// Anything spells and swings can affect.
pub trait Damageable {
    fn kind(&self) -> TargetKind;

    fn is_alive(&self) -> bool;

    fn take_damage(&mut self, amount: f32) -> EffectOutcome;

    fn heal(&mut self, amount: f32) -> EffectOutcome;

    fn add_shield(&mut self, amount: f32) -> EffectOutcome;

    fn apply_slow(&mut self, percent: f32, duration: f32) -> EffectOutcome;

    fn acceptance(&self) -> EffectAcceptance {
        self.kind().acceptance()
    }
}

/// Applies one spell effect with the given power.
///
/// Variants that do not accept `effect` report [`EffectOutcome::Immune`]
/// and are left untouched.
pub fn apply_effect(
    target: &mut dyn Damageable,
    effect: SpellEffect,
    power: f32,
    slow: SlowSpec,
) -> EffectOutcome {
    if !target.acceptance().accepts(effect) {
        return EffectOutcome::Immune;
    }
    match effect {
        SpellEffect::Damage => target.take_damage(power),
        SpellEffect::Heal => target.heal(power),
        SpellEffect::Shield => target.add_shield(power),
        SpellEffect::Slow => target.apply_slow(slow.percent, slow.duration),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acceptance_policy_per_kind() {
        let hostile = TargetKind::Hostile.acceptance();
        assert!(hostile.accepts(SpellEffect::Damage));
        assert!(hostile.accepts(SpellEffect::Slow));
        assert!(!hostile.accepts(SpellEffect::Heal));
        assert!(!hostile.accepts(SpellEffect::Shield));

        let protected = TargetKind::Protected.acceptance();
        assert!(protected.accepts(SpellEffect::Heal));
        assert!(!protected.accepts(SpellEffect::Damage));

        let player = TargetKind::Player.acceptance();
        assert!(player.accepts(SpellEffect::Shield));
        assert!(!player.accepts(SpellEffect::Slow));
    }

    #[test]
    fn homing_seeks_the_right_side() {
        assert!(TargetKind::Hostile.is_sought_by(SpellEffect::Slow));
        assert!(TargetKind::Protected.is_sought_by(SpellEffect::Heal));
        assert!(!TargetKind::Player.is_sought_by(SpellEffect::Shield));
    }
}
