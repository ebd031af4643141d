//! Data-driven content definitions and loaders.
//!
//! This crate reads static game content from RON/TOML data files:
//! - Balance tables (per-form stats, progression, player and target tuning)
//! - Tier rules for loot generation
//! - Named loot tables
//! - The note catalog and key map
//! - A starting spellbook
//! - Game configuration
//!
//! Content is consumed by runtime oracles and the session builder.
//!
//! All loaders use melody-core types directly with serde for RON/TOML
//! deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, GameContent, LoadResult, LootTableLoader, MelodyLoader,
    MelodySpec, NoteCatalogSpec, NoteLoader, TablesLoader, TierLoader,
};
