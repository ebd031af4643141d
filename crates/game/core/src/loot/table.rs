/// Weighted tier distribution of one loot source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LootTable {
    pub common_weight: u32,
    pub rare_weight: u32,
    pub epic_weight: u32,
    pub legendary_weight: u32,
}

impl LootTable {
    pub const fn new(common: u32, rare: u32, epic: u32, legendary: u32) -> Self {
        Self {
            common_weight: common,
            rare_weight: rare,
            epic_weight: epic,
            legendary_weight: legendary,
        }
    }

    pub fn total_weight(&self) -> u32 {
        self.common_weight
            .saturating_add(self.rare_weight)
            .saturating_add(self.epic_weight)
            .saturating_add(self.legendary_weight)
    }

    /// Maps a uniform roll in `[0, total_weight)` to a tier.
    ///
    /// Subtracts common, rare and epic weights in order; whatever remains is
    /// legendary. A table with zero total weight always yields tier 1.
    pub fn pick_tier(&self, roll: u32) -> u8 {
        if self.total_weight() == 0 {
            return 1;
        }
        let mut remaining = roll;
        for (tier, weight) in [
            (1, self.common_weight),
            (2, self.rare_weight),
            (3, self.epic_weight),
        ] {
            if remaining < weight {
                return tier;
            }
            remaining -= weight;
        }
        4
    }
}

impl Default for LootTable {
    fn default() -> Self {
        Self::new(100, 30, 10, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolls_walk_the_weights_in_order() {
        let table = LootTable::default();
        assert_eq!(table.total_weight(), 142);
        assert_eq!(table.pick_tier(0), 1);
        assert_eq!(table.pick_tier(99), 1);
        assert_eq!(table.pick_tier(100), 2);
        assert_eq!(table.pick_tier(129), 2);
        assert_eq!(table.pick_tier(130), 3);
        assert_eq!(table.pick_tier(140), 4);
        assert_eq!(table.pick_tier(141), 4);
    }

    #[test]
    fn skips_zero_weight_tiers() {
        let table = LootTable::new(0, 0, 5, 0);
        assert_eq!(table.pick_tier(0), 3);
        assert_eq!(table.pick_tier(4), 3);
    }

    #[test]
    fn empty_table_gives_common() {
        assert_eq!(LootTable::new(0, 0, 0, 0).pick_tier(17), 1);
    }
}
