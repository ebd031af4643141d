//! Deterministic combat rules for the melody spellcasting system.
//!
//! `melody-core` defines the canonical rules (notes, melodies, loot, spell
//! matching and building, combat targets, effect resolvers) and exposes pure
//! APIs driven by an explicit `dt`. Rendering, input and physics live outside
//! the crate and reach in through the [`env`] traits.
pub mod combat;
pub mod config;
pub mod controller;
pub mod effect;
pub mod env;
pub mod error;
pub mod loot;
pub mod melody;
pub mod note;
pub mod spell;

pub use combat::{
    CombatMeter, CombatReport, CombatTarget, Combatant, CombatantBody, CombatantId, CombatantTick,
    Damageable, EffectAcceptance, EffectOutcome, PlayerStats, SlowPhase, SlowState, TargetKind,
    TargetTick, apply_effect,
};
pub use config::GameConfig;
pub use controller::{
    ControlEvent, ControlInput, ControllerState, GuardResult, MeleeSwing, PlayerController,
    SwingKind,
};
pub use effect::{
    CastOrigin, EffectArena, EffectEvent, EffectHandle, decay_multiplier, ramp_multiplier,
};
pub use env::{
    AreaSettings, BalanceTables, BeamSettings, BuffSettings, CombatWorld, Contact, ControllerRules,
    Env, GameEnv, OracleError, PcgRng, PlayerRules, ProgressionRules, ProjectileSettings, Region,
    RngOracle, SlowSpec, SpatialQuery, SwingSpec, TablesOracle, TargetRules, TargetStore,
    compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use loot::{
    GeneratedMelody, Inventory, LootError, LootGenerator, LootOutcome, LootSeed, LootTable,
    ResolvedTier, TierRule, TierRules,
};
pub use melody::{Melody, NoteSequence};
pub use note::{Note, NoteCatalog, NoteColor};
pub use spell::{
    FireDirections, FiredSpell, MatchError, MatchedIndices, NoteQueue, SpellBuilder, SpellEffect,
    SpellForm, SpellMatch, SpellMatcher, SpellPayload,
};
