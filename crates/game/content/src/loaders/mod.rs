//! Content loaders for reading game data from files.
//!
//! Each loader turns one RON or TOML file into melody-core values. The
//! [`ContentFactory`] ties them to a data directory.

pub mod config;
pub mod factory;
pub mod loot;
pub mod melodies;
pub mod notes;
pub mod tables;
pub mod tiers;

pub use config::ConfigLoader;
pub use factory::{ContentFactory, GameContent};
pub use loot::LootTableLoader;
pub use melodies::{MelodyLoader, MelodySpec};
pub use notes::{NoteCatalogSpec, NoteLoader};
pub use tables::TablesLoader;
pub use tiers::TierLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Parses a RON file with the path in the error message.
pub(crate) fn parse_ron<T: serde::de::DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse RON at {}: {}", path.display(), e))
}

/// Parses a TOML file with the path in the error message.
pub(crate) fn parse_toml<T: serde::de::DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let content = read_file(path)?;
    toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse TOML at {}: {}", path.display(), e))
}
