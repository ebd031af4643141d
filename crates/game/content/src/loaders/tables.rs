//! Balance tables loader.

use std::path::Path;

use melody_core::BalanceTables;

use crate::loaders::{LoadResult, parse_toml};

/// Loader for `balance.toml`.
///
/// Every section and key is optional; omitted values keep the in-code
/// defaults.
///
/// ```toml
/// [projectile]
/// power = 18.0
///
/// [beam]
/// ramp_up_speed = 0.8
/// ```
pub struct TablesLoader;

impl TablesLoader {
    pub fn load(path: &Path) -> LoadResult<BalanceTables> {
        parse_toml(path)
    }
}
