//! Combat target model.
//!
//! Every combatant implements [`Damageable`]; which effects it reacts to is
//! a per-[`TargetKind`] acceptance policy rather than an error path.
//!
//! - [`CombatTarget`]: enemies and protected allies (slow/freeze, respawn, meter)
//! - [`PlayerStats`]: health, shield pool, stamina and exhaustion
//! - [`Combatant`]: either of the above placed in the world
mod combatant;
mod damageable;
mod meter;
mod player;
mod slow;
mod target;

pub use combatant::{Combatant, CombatantBody, CombatantId, CombatantTick};
pub use damageable::{Damageable, EffectAcceptance, EffectOutcome, TargetKind, apply_effect};
pub use meter::{CombatMeter, CombatReport};
pub use player::PlayerStats;
pub use slow::{SlowPhase, SlowState};
pub use target::{CombatTarget, TargetTick};
