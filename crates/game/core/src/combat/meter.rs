/// Damage and healing totals of one engagement.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatReport {
    pub damage: f32,
    pub healing: f32,
    /// First to last hit, in seconds; short bursts count as one second.
    pub duration: f32,
    pub dps: f32,
    pub hps: f32,
}

/// Tracks an engagement from its first hit until a quiet period ends it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CombatMeter {
    damage: f32,
    healing: f32,
    elapsed: f32,
    last_hit_at: f32,
    active: bool,
}

impl CombatMeter {
    const MIN_DURATION: f32 = 0.1;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn record_damage(&mut self, amount: f32) {
        self.mark_hit();
        self.damage += amount;
    }

    pub fn record_healing(&mut self, amount: f32) {
        self.mark_hit();
        self.healing += amount;
    }

    fn mark_hit(&mut self) {
        if !self.active {
            *self = Self {
                active: true,
                ..Self::default()
            };
        }
        self.last_hit_at = self.elapsed;
    }

    /// Ends the engagement once `reset_delay` passes without a hit.
    pub fn tick(&mut self, dt: f32, reset_delay: f32) -> Option<CombatReport> {
        if !self.active {
            return None;
        }
        self.elapsed += dt;
        if self.elapsed - self.last_hit_at < reset_delay {
            return None;
        }

        let mut duration = self.last_hit_at;
        if duration < Self::MIN_DURATION {
            duration = 1.0;
        }
        let report = CombatReport {
            damage: self.damage,
            healing: self.healing,
            duration,
            dps: self.damage / duration,
            hps: self.healing / duration,
        };
        *self = Self::default();
        Some(report)
    }
}
