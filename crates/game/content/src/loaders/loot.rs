//! Loot table loader.

use std::collections::HashMap;
use std::path::Path;

use melody_core::LootTable;

use crate::loaders::{LoadResult, parse_ron};

/// Loads named loot tables from RON.
///
/// File format: HashMap<String, LootTable>
///
/// ```ron
/// {
///     "chest": (common_weight: 100, rare_weight: 30, epic_weight: 10, legendary_weight: 2),
///     "boss": (common_weight: 0, rare_weight: 20, epic_weight: 10, legendary_weight: 5),
/// }
/// ```
pub struct LootTableLoader;

impl LootTableLoader {
    pub fn load(path: &Path) -> LoadResult<HashMap<String, LootTable>> {
        parse_ron(path)
    }
}
