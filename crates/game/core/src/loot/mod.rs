//! Procedural melody loot and the inventory that levels duplicates.
//!
//! - [`TierRule`]/[`TierRules`]: cost bounds and note count per tier
//! - [`LootTable`]: weighted tier pick for a loot source
//! - [`LootGenerator`]: rejection sampling over the note catalog
//! - [`Inventory`]: learned melodies in insertion order
mod generator;
mod inventory;
mod table;
mod tier;

pub use generator::{GeneratedMelody, LootError, LootGenerator, LootSeed};
pub use inventory::{Inventory, LootOutcome};
pub use table::LootTable;
pub use tier::{ResolvedTier, TierRule, TierRules};
