//! Game configuration loader.

use std::path::Path;

use melody_core::GameConfig;

use crate::loaders::{LoadResult, parse_toml};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their [`GameConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        parse_toml(path)
    }
}
