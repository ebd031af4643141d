use glam::Vec3;

use super::{CombatReport, CombatTarget, Damageable, EffectOutcome, PlayerStats, TargetKind};

/// Stable identifier of a combatant inside one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl CombatantId {
    pub const PLAYER: CombatantId = CombatantId(0);
}

impl core::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CombatantBody {
    Target(CombatTarget),
    Player(PlayerStats),
}

/// Timer consequences of one combatant tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CombatantTick {
    pub respawned: bool,
    pub thawed: bool,
    pub recovered: bool,
    pub report: Option<CombatReport>,
}

/// A combatant placed in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Combatant {
    pub id: CombatantId,
    pub position: Vec3,
    /// Spawn point; respawns and meter resets return here.
    pub home: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub body: CombatantBody,
}

impl Combatant {
    pub const DEFAULT_RADIUS: f32 = 0.5;

    pub fn new(id: CombatantId, position: Vec3, body: CombatantBody) -> Self {
        Self {
            id,
            position,
            home: position,
            velocity: Vec3::ZERO,
            radius: Self::DEFAULT_RADIUS,
            body,
        }
    }

    pub fn target(&self) -> Option<&CombatTarget> {
        match &self.body {
            CombatantBody::Target(target) => Some(target),
            CombatantBody::Player(_) => None,
        }
    }

    pub fn player(&self) -> Option<&PlayerStats> {
        match &self.body {
            CombatantBody::Player(player) => Some(player),
            CombatantBody::Target(_) => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerStats> {
        match &mut self.body {
            CombatantBody::Player(player) => Some(player),
            CombatantBody::Target(_) => None,
        }
    }

    fn body(&self) -> &dyn Damageable {
        match &self.body {
            CombatantBody::Target(target) => target,
            CombatantBody::Player(player) => player,
        }
    }

    fn body_mut(&mut self) -> &mut dyn Damageable {
        match &mut self.body {
            CombatantBody::Target(target) => target,
            CombatantBody::Player(player) => player,
        }
    }

    pub fn speed_factor(&self) -> f32 {
        match &self.body {
            CombatantBody::Target(target) => target.speed_factor(),
            CombatantBody::Player(player) => player.speed_factor(),
        }
    }

    /// Moves by velocity scaled by the speed factor, then advances timers.
    pub fn tick(&mut self, dt: f32) -> CombatantTick {
        if self.is_alive() {
            self.position += self.velocity * self.speed_factor() * dt;
        }

        let mut out = CombatantTick::default();
        match &mut self.body {
            CombatantBody::Target(target) => {
                let tick = target.tick(dt);
                out.respawned = tick.respawned;
                out.thawed = tick.thawed;
                out.report = tick.report;
            }
            CombatantBody::Player(player) => {
                out.recovered = player.tick(dt);
            }
        }
        if out.respawned || out.report.is_some() {
            self.position = self.home;
            self.velocity = Vec3::ZERO;
        }
        out
    }
}

impl Damageable for Combatant {
    fn kind(&self) -> TargetKind {
        self.body().kind()
    }

    fn is_alive(&self) -> bool {
        self.body().is_alive()
    }

    fn take_damage(&mut self, amount: f32) -> EffectOutcome {
        self.body_mut().take_damage(amount)
    }

    fn heal(&mut self, amount: f32) -> EffectOutcome {
        self.body_mut().heal(amount)
    }

    fn add_shield(&mut self, amount: f32) -> EffectOutcome {
        self.body_mut().add_shield(amount)
    }

    fn apply_slow(&mut self, percent: f32, duration: f32) -> EffectOutcome {
        let outcome = self.body_mut().apply_slow(percent, duration);
        if let EffectOutcome::Slowed { froze: true, .. } = outcome {
            self.velocity = Vec3::ZERO;
        }
        outcome
    }
}
