use crate::env::TargetRules;

use super::{
    CombatMeter, CombatReport, Damageable, EffectAcceptance, EffectOutcome, SlowState, TargetKind,
};

/// What happened to a target during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TargetTick {
    pub respawned: bool,
    pub thawed: bool,
    pub report: Option<CombatReport>,
}

/// A non-player combatant: health, shield, slow/freeze, respawn and a
/// combat meter.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatTarget {
    kind: TargetKind,
    rules: TargetRules,
    initial_health: f32,
    health: f32,
    shield: f32,
    slow: SlowState,
    respawn_in: Option<f32>,
    meter: CombatMeter,
}

impl CombatTarget {
    pub fn hostile(rules: TargetRules) -> Self {
        Self::with_initial_health(TargetKind::Hostile, rules, rules.max_health)
    }

    /// Spawns below full health so healing has something to do.
    pub fn protected(rules: TargetRules) -> Self {
        let initial = rules.max_health * rules.protected_start_fraction;
        Self::with_initial_health(TargetKind::Protected, rules, initial)
    }

    fn with_initial_health(kind: TargetKind, rules: TargetRules, initial: f32) -> Self {
        let initial_health = initial.clamp(0.0, rules.max_health);
        Self {
            kind,
            rules,
            initial_health,
            health: initial_health,
            shield: 0.0,
            slow: SlowState::new(),
            respawn_in: None,
            meter: CombatMeter::new(),
        }
    }

    /// Starts with a pre-existing shield, regardless of acceptance.
    pub fn with_shield(mut self, shield: f32) -> Self {
        self.shield = shield.max(0.0);
        self
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.rules.max_health
    }

    pub fn shield(&self) -> f32 {
        self.shield
    }

    pub fn slow(&self) -> &SlowState {
        &self.slow
    }

    pub fn speed_factor(&self) -> f32 {
        self.slow.speed_factor()
    }

    pub fn health_fraction(&self) -> f32 {
        fraction(self.health, self.rules.max_health)
    }

    pub fn shield_fraction(&self) -> f32 {
        fraction(self.shield, self.rules.max_health)
    }

    pub fn slow_fraction(&self) -> f32 {
        self.slow.fraction()
    }

    pub fn respawn_pending(&self) -> bool {
        self.respawn_in.is_some()
    }

    /// Advances respawn, slow and meter timers.
    pub fn tick(&mut self, dt: f32) -> TargetTick {
        let mut out = TargetTick::default();
        if let Some(remaining) = self.respawn_in.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.respawn();
                out.respawned = true;
            }
            return out;
        }
        out.thawed = self.slow.tick(dt, &self.rules);
        out.report = self.meter.tick(dt, self.rules.combat_reset_delay);
        out
    }

    fn respawn(&mut self) {
        self.health = self.initial_health;
        self.shield = 0.0;
        self.slow.clear();
        self.respawn_in = None;
        self.meter = CombatMeter::new();
    }
}

impl Damageable for CombatTarget {
    fn kind(&self) -> TargetKind {
        self.kind
    }

    fn is_alive(&self) -> bool {
        self.respawn_in.is_none()
    }

    fn take_damage(&mut self, amount: f32) -> EffectOutcome {
        if !self.acceptance().contains(EffectAcceptance::DAMAGE) {
            return EffectOutcome::Immune;
        }
        if !self.is_alive() || amount <= 0.0 {
            return EffectOutcome::Ignored;
        }

        let amount = if self.slow.is_frozen() {
            amount * self.rules.frozen_damage_multiplier
        } else {
            amount
        };
        let absorbed = self.shield.min(amount);
        self.shield -= absorbed;
        let dealt = (amount - absorbed).min(self.health);
        self.health -= dealt;
        self.meter.record_damage(absorbed + dealt);

        let killed = self.health <= 0.0;
        if killed {
            self.health = 0.0;
            self.respawn_in = Some(self.rules.respawn_delay);
        }
        EffectOutcome::Damaged {
            absorbed,
            dealt,
            killed,
        }
    }

    fn heal(&mut self, amount: f32) -> EffectOutcome {
        if !self.acceptance().contains(EffectAcceptance::HEAL) {
            return EffectOutcome::Immune;
        }
        if !self.is_alive() || amount <= 0.0 {
            return EffectOutcome::Ignored;
        }
        let healed = amount.min(self.rules.max_health - self.health);
        self.health += healed;
        self.meter.record_healing(healed);
        EffectOutcome::Healed { amount: healed }
    }

    fn add_shield(&mut self, amount: f32) -> EffectOutcome {
        if !self.acceptance().contains(EffectAcceptance::SHIELD) {
            return EffectOutcome::Immune;
        }
        if !self.is_alive() || amount <= 0.0 {
            return EffectOutcome::Ignored;
        }
        self.shield += amount;
        EffectOutcome::Shielded { amount }
    }

    /// Slow decays at a fixed rate, so `_duration` does not extend it.
    fn apply_slow(&mut self, percent: f32, _duration: f32) -> EffectOutcome {
        if !self.acceptance().contains(EffectAcceptance::SLOW) {
            return EffectOutcome::Immune;
        }
        if !self.is_alive() {
            return EffectOutcome::Ignored;
        }
        self.slow.apply(percent, &self.rules)
    }
}

pub(crate) fn fraction(value: f32, max: f32) -> f32 {
    if max <= 0.0 {
        0.0
    } else {
        (value / max).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::SlowPhase;

    fn rules() -> TargetRules {
        TargetRules {
            max_health: 100.0,
            ..TargetRules::default()
        }
    }

    #[test]
    fn shield_absorbs_before_health() {
        let mut target = CombatTarget::hostile(rules()).with_shield(30.0);
        let outcome = target.take_damage(50.0);
        assert_eq!(
            outcome,
            EffectOutcome::Damaged {
                absorbed: 30.0,
                dealt: 20.0,
                killed: false
            }
        );
        assert_eq!(target.shield(), 0.0);
        assert_eq!(target.health(), 80.0);
    }

    #[test]
    fn frozen_targets_take_bonus_damage() {
        let mut target = CombatTarget::hostile(rules());
        target.apply_slow(60.0, 1.0);
        target.apply_slow(60.0, 1.0);
        assert_eq!(target.slow().phase(), SlowPhase::Frozen);
        assert_eq!(target.slow().percent(), 100.0);

        target.take_damage(10.0);
        assert_eq!(target.health(), 85.0);
    }

    #[test]
    fn death_schedules_respawn_with_initial_state() {
        let mut target = CombatTarget::hostile(rules()).with_shield(5.0);
        target.apply_slow(40.0, 1.0);
        let outcome = target.take_damage(500.0);
        assert!(matches!(outcome, EffectOutcome::Damaged { killed: true, .. }));
        assert_eq!(target.health(), 0.0);
        assert!(!target.is_alive());
        assert_eq!(target.take_damage(5.0), EffectOutcome::Ignored);

        assert!(!target.tick(1.9).respawned);
        assert!(target.tick(0.2).respawned);
        assert!(target.is_alive());
        assert_eq!(target.health(), 100.0);
        assert_eq!(target.shield(), 0.0);
        assert_eq!(target.slow().phase(), SlowPhase::Normal);
    }

    #[test]
    fn protected_target_ignores_damage_and_clamps_heals() {
        let mut prince = CombatTarget::protected(rules());
        assert_eq!(prince.health(), 20.0);
        assert_eq!(prince.take_damage(10.0), EffectOutcome::Immune);
        assert_eq!(prince.apply_slow(50.0, 1.0), EffectOutcome::Immune);
        assert_eq!(prince.heal(500.0), EffectOutcome::Healed { amount: 80.0 });
        assert_eq!(prince.health_fraction(), 1.0);
        assert_eq!(prince.add_shield(15.0), EffectOutcome::Shielded { amount: 15.0 });
    }

    #[test]
    fn hostile_ignores_support_effects() {
        let mut enemy = CombatTarget::hostile(rules());
        assert_eq!(enemy.heal(10.0), EffectOutcome::Immune);
        assert_eq!(enemy.add_shield(10.0), EffectOutcome::Immune);
    }

    #[test]
    fn meter_reports_after_engagement() {
        let mut target = CombatTarget::hostile(TargetRules::default());
        target.take_damage(40.0);
        let tick = target.tick(2.5);
        let report = tick.report.expect("engagement over");
        assert_eq!(report.damage, 40.0);
    }
}
