//! Tier rule loader.

use std::path::Path;

use melody_core::TierRules;

use crate::loaders::{LoadResult, parse_ron};

/// Loads tier rules from RON.
///
/// File format: map of tier number to rule.
///
/// ```ron
/// {
///     1: (min_cost: 2, max_cost: 4, note_count: 2),
///     2: (min_cost: 5, max_cost: 8, note_count: 3),
/// }
/// ```
pub struct TierLoader;

impl TierLoader {
    pub fn load(path: &Path) -> LoadResult<TierRules> {
        let rules: TierRules = parse_ron(path)?;
        for (tier, rule) in rules.iter() {
            anyhow::ensure!(
                rule.min_cost <= rule.max_cost,
                "tier {} in {} has min_cost {} above max_cost {}",
                tier,
                path.display(),
                rule.min_cost,
                rule.max_cost
            );
        }
        Ok(rules)
    }
}
