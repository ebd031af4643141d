use crate::env::TargetRules;

use super::EffectOutcome;

/// Slow state machine phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlowPhase {
    Normal,
    Slowed,
    Frozen,
}

/// Accumulated slow with a fixed-length freeze at 100 %.
///
/// While slowed the percent decays continuously. A freeze ignores decay and
/// further slows, then thaws back to 0 when its timer runs out.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlowState {
    percent: f32,
    frozen_for: Option<f32>,
}

impl SlowState {
    pub const FREEZE_PERCENT: f32 = 100.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SlowPhase {
        if self.frozen_for.is_some() {
            SlowPhase::Frozen
        } else if self.percent > 0.0 {
            SlowPhase::Slowed
        } else {
            SlowPhase::Normal
        }
    }

    pub fn percent(&self) -> f32 {
        self.percent
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_for.is_some()
    }

    /// 0 when frozen, otherwise `1 - percent/100`.
    pub fn speed_factor(&self) -> f32 {
        if self.is_frozen() {
            0.0
        } else {
            1.0 - self.percent / 100.0
        }
    }

    pub fn fraction(&self) -> f32 {
        (self.percent / 100.0).clamp(0.0, 1.0)
    }

    /// Adds `percent`; reaching 100 freezes for the configured duration.
    pub fn apply(&mut self, percent: f32, rules: &TargetRules) -> EffectOutcome {
        if self.is_frozen() || percent <= 0.0 {
            return EffectOutcome::Ignored;
        }
        self.percent += percent;
        let froze = self.percent >= Self::FREEZE_PERCENT;
        if froze {
            self.percent = Self::FREEZE_PERCENT;
            self.frozen_for = Some(rules.freeze_duration);
        }
        EffectOutcome::Slowed {
            percent: self.percent,
            froze,
        }
    }

    /// Advances decay or the freeze timer. Returns true on thaw.
    pub fn tick(&mut self, dt: f32, rules: &TargetRules) -> bool {
        match self.frozen_for.as_mut() {
            Some(remaining) => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.clear();
                    return true;
                }
                false
            }
            None => {
                self.percent = (self.percent - rules.slow_decay_per_sec * dt).max(0.0);
                false
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
