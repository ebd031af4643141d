//! Content factory for loading every data file from one directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use melody_core::{BalanceTables, GameConfig, Inventory, LootTable, NoteCatalog, TierRules};
use tracing::{debug, warn};

use crate::loaders::{
    ConfigLoader, LoadResult, LootTableLoader, MelodyLoader, NoteLoader, TablesLoader, TierLoader,
};

/// Everything loaded from a data directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameContent {
    pub config: GameConfig,
    pub tables: BalanceTables,
    pub tiers: TierRules,
    pub loot_tables: HashMap<String, LootTable>,
    pub notes: NoteCatalog,
    pub melodies: Inventory,
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── balance.toml
/// ├── tiers.ron
/// ├── loot_tables.ron
/// ├── notes.ron
/// └── melodies.ron
/// ```
///
/// Every file is optional. A missing file falls back to the built-in
/// defaults; a file that exists but fails to parse is an error.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const BALANCE_FILE: &'static str = "balance.toml";
    pub const TIERS_FILE: &'static str = "tiers.ron";
    pub const LOOT_TABLES_FILE: &'static str = "loot_tables.ron";
    pub const NOTES_FILE: &'static str = "notes.ron";
    pub const MELODIES_FILE: &'static str = "melodies.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Loads every file, defaulting the missing ones.
    pub fn load_dir(data_dir: impl Into<PathBuf>) -> LoadResult<GameContent> {
        Self::new(data_dir).load_all()
    }

    pub fn load_all(&self) -> LoadResult<GameContent> {
        let notes = self.load_notes()?;
        let melodies = self.load_melodies(&notes)?;
        Ok(GameContent {
            config: self.load_config()?,
            tables: self.load_tables()?,
            tiers: self.load_tiers()?,
            loot_tables: self.load_loot_tables()?,
            notes,
            melodies,
        })
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        self.optional(Self::CONFIG_FILE, ConfigLoader::load)
    }

    /// Load balance tables from `balance.toml`.
    pub fn load_tables(&self) -> LoadResult<BalanceTables> {
        self.optional(Self::BALANCE_FILE, TablesLoader::load)
    }

    /// Load tier rules from `tiers.ron`.
    pub fn load_tiers(&self) -> LoadResult<TierRules> {
        self.optional(Self::TIERS_FILE, TierLoader::load)
    }

    /// Load named loot tables from `loot_tables.ron`.
    pub fn load_loot_tables(&self) -> LoadResult<HashMap<String, LootTable>> {
        self.optional(Self::LOOT_TABLES_FILE, LootTableLoader::load)
    }

    /// Load the note catalog from `notes.ron`.
    pub fn load_notes(&self) -> LoadResult<NoteCatalog> {
        self.optional(Self::NOTES_FILE, NoteLoader::load)
    }

    /// Load the starting spellbook from `melodies.ron`.
    pub fn load_melodies(&self, catalog: &NoteCatalog) -> LoadResult<Inventory> {
        self.optional(Self::MELODIES_FILE, |path| MelodyLoader::load(path, catalog))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn optional<T: Default>(
        &self,
        file: &str,
        load: impl FnOnce(&Path) -> LoadResult<T>,
    ) -> LoadResult<T> {
        let path = self.data_dir.join(file);
        if !path.exists() {
            warn!(path = %path.display(), "content file missing, using defaults");
            return Ok(T::default());
        }
        debug!(path = %path.display(), "loading content");
        load(&path)
    }
}
