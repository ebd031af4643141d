use crate::env::PlayerRules;

use super::target::fraction;
use super::{Damageable, EffectOutcome, TargetKind};

/// The player's health, shield and stamina.
///
/// While guarding (`shielded`) incoming damage drains stamina instead of
/// health. Empty stamina exhausts the player: guard drops, speed halves and
/// actions are locked until the exhaustion timer runs out. Any drain during
/// exhaustion restarts that timer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerStats {
    rules: PlayerRules,
    health: f32,
    shield: f32,
    stamina: f32,
    exhausted_for: Option<f32>,
    shielded: bool,
}

impl PlayerStats {
    pub fn new(rules: PlayerRules) -> Self {
        Self {
            rules,
            health: rules.max_health,
            shield: 0.0,
            stamina: rules.max_stamina,
            exhausted_for: None,
            shielded: false,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn shield(&self) -> f32 {
        self.shield
    }

    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted_for.is_some()
    }

    pub fn is_shielded(&self) -> bool {
        self.shielded
    }

    /// Raises or lowers the guard. Exhausted players cannot raise it.
    pub fn set_shielded(&mut self, shielded: bool) {
        self.shielded = shielded && !self.is_exhausted();
    }

    pub fn can_act(&self) -> bool {
        self.is_alive() && !self.is_exhausted()
    }

    pub fn speed_factor(&self) -> f32 {
        if self.is_exhausted() {
            self.rules.exhausted_speed_factor
        } else {
            1.0
        }
    }

    pub fn health_fraction(&self) -> f32 {
        fraction(self.health, self.rules.max_health)
    }

    pub fn shield_fraction(&self) -> f32 {
        fraction(self.shield, self.rules.max_health)
    }

    pub fn stamina_fraction(&self) -> f32 {
        fraction(self.stamina, self.rules.max_stamina)
    }

    /// Spends stamina. Returns true if this drain exhausted the player.
    pub fn drain_stamina(&mut self, amount: f32) -> bool {
        if self.is_exhausted() {
            self.exhausted_for = Some(self.rules.exhaustion_duration);
            return false;
        }
        self.stamina = (self.stamina - amount).max(0.0);
        if self.stamina <= 0.0 {
            self.exhausted_for = Some(self.rules.exhaustion_duration);
            self.shielded = false;
            return true;
        }
        false
    }

    /// Returns true when exhaustion ends this tick.
    pub fn tick(&mut self, dt: f32) -> bool {
        if let Some(remaining) = self.exhausted_for.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.exhausted_for = None;
                return true;
            }
            return false;
        }
        if !self.shielded {
            self.stamina = (self.stamina + self.rules.stamina_regen * dt).min(self.rules.max_stamina);
        }
        false
    }
}

impl Damageable for PlayerStats {
    fn kind(&self) -> TargetKind {
        TargetKind::Player
    }

    fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    fn take_damage(&mut self, amount: f32) -> EffectOutcome {
        if !self.is_alive() || amount <= 0.0 {
            return EffectOutcome::Ignored;
        }
        if self.shielded {
            let drain = amount * self.rules.guard_stamina_factor;
            let exhausted = self.drain_stamina(drain);
            return EffectOutcome::Guarded {
                stamina: drain,
                exhausted,
            };
        }

        let absorbed = self.shield.min(amount);
        self.shield -= absorbed;
        let dealt = (amount - absorbed).min(self.health);
        self.health -= dealt;
        EffectOutcome::Damaged {
            absorbed,
            dealt,
            killed: self.health <= 0.0,
        }
    }

    fn heal(&mut self, amount: f32) -> EffectOutcome {
        if !self.is_alive() || amount <= 0.0 {
            return EffectOutcome::Ignored;
        }
        let healed = amount.min(self.rules.max_health - self.health);
        self.health += healed;
        EffectOutcome::Healed { amount: healed }
    }

    fn add_shield(&mut self, amount: f32) -> EffectOutcome {
        if !self.is_alive() || amount <= 0.0 {
            return EffectOutcome::Ignored;
        }
        self.shield += amount;
        EffectOutcome::Shielded { amount }
    }

    fn apply_slow(&mut self, _percent: f32, _duration: f32) -> EffectOutcome {
        EffectOutcome::Immune
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_pool_absorbs_first() {
        let mut player = PlayerStats::new(PlayerRules::default());
        player.add_shield(30.0);
        player.take_damage(50.0);
        assert_eq!(player.shield(), 0.0);
        assert_eq!(player.health(), 80.0);
    }

    #[test]
    fn guarding_drains_stamina_instead_of_health() {
        let mut player = PlayerStats::new(PlayerRules::default());
        player.set_shielded(true);
        let outcome = player.take_damage(40.0);
        assert_eq!(
            outcome,
            EffectOutcome::Guarded {
                stamina: 20.0,
                exhausted: false
            }
        );
        assert_eq!(player.health(), 100.0);
        assert_eq!(player.stamina(), 80.0);
    }

    #[test]
    fn empty_stamina_exhausts_and_breaks_guard() {
        let mut player = PlayerStats::new(PlayerRules::default());
        player.set_shielded(true);
        let outcome = player.take_damage(200.0);
        assert!(matches!(outcome, EffectOutcome::Guarded { exhausted: true, .. }));
        assert!(player.is_exhausted());
        assert!(!player.is_shielded());
        assert!(!player.can_act());
        assert_eq!(player.speed_factor(), 0.5);

        player.set_shielded(true);
        assert!(!player.is_shielded());
    }

    #[test]
    fn drain_while_exhausted_restarts_timer() {
        let mut player = PlayerStats::new(PlayerRules::default());
        player.drain_stamina(100.0);
        assert!(!player.tick(1.5));
        player.drain_stamina(5.0);
        assert!(!player.tick(1.5));
        assert!(player.is_exhausted());
        assert!(player.tick(0.6));
        assert!(player.can_act());
    }

    #[test]
    fn stamina_regenerates_unless_guarding() {
        let mut player = PlayerStats::new(PlayerRules::default());
        player.drain_stamina(50.0);
        player.tick(1.0);
        assert_eq!(player.stamina(), 65.0);

        player.set_shielded(true);
        player.tick(1.0);
        assert_eq!(player.stamina(), 65.0);

        player.set_shielded(false);
        player.tick(10.0);
        assert_eq!(player.stamina(), 100.0);
    }

    #[test]
    fn player_ignores_slow() {
        let mut player = PlayerStats::new(PlayerRules::default());
        assert_eq!(player.apply_slow(90.0, 1.0), EffectOutcome::Immune);
    }
}
