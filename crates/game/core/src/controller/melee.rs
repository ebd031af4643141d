use glam::Vec3;

use crate::combat::{CombatantId, EffectOutcome, TargetKind};
use crate::env::{CombatWorld, ControllerRules, Region, SlowSpec, SwingSpec};
use crate::note::NoteColor;
use crate::spell::SpellEffect;

/// Melee attacks, each bound to the note it plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SwingKind {
    Light,
    Sweep,
    Heavy,
}

impl SwingKind {
    pub const fn note(self) -> NoteColor {
        match self {
            Self::Light => NoteColor::Green,
            Self::Sweep => NoteColor::Blue,
            Self::Heavy => NoteColor::Red,
        }
    }

    pub fn spec(self, rules: &ControllerRules) -> SwingSpec {
        match self {
            Self::Light => rules.light,
            Self::Sweep => rules.sweep,
            Self::Heavy => rules.heavy,
        }
    }
}

/// One swing in progress. Each hostile is struck at most once per swing.
#[derive(Clone, Debug, PartialEq)]
pub struct MeleeSwing {
    pub kind: SwingKind,
    pub spec: SwingSpec,
    pub elapsed: f32,
    struck: Vec<CombatantId>,
}

impl MeleeSwing {
    pub fn new(kind: SwingKind, rules: &ControllerRules) -> Self {
        Self {
            kind,
            spec: kind.spec(rules),
            elapsed: 0.0,
            struck: Vec::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.spec.duration
    }

    /// Damages every hostile within reach of `origin` not yet struck.
    pub fn strike(
        &mut self,
        origin: Vec3,
        world: &mut dyn CombatWorld,
    ) -> Vec<(CombatantId, EffectOutcome)> {
        let region = Region::Sphere {
            center: origin,
            radius: self.spec.reach,
        };
        let mut landed = Vec::new();
        for contact in world.overlap(&region) {
            if contact.kind != TargetKind::Hostile || self.struck.contains(&contact.id) {
                continue;
            }
            let Some(target) = world.damageable_mut(contact.id) else {
                continue;
            };
            let outcome = crate::combat::apply_effect(
                target,
                SpellEffect::Damage,
                self.spec.damage,
                SlowSpec::new(0.0, 0.0),
            );
            self.struck.push(contact.id);
            landed.push((contact.id, outcome));
        }
        landed
    }
}
