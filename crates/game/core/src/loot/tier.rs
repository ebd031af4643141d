use std::collections::BTreeMap;

/// Generation constraint for one tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierRule {
    pub min_cost: u32,
    pub max_cost: u32,
    pub note_count: u8,
}

impl TierRule {
    pub const fn new(min_cost: u32, max_cost: u32, note_count: u8) -> Self {
        Self {
            min_cost,
            max_cost,
            note_count,
        }
    }

    pub const fn accepts_cost(&self, cost: u32) -> bool {
        self.min_cost <= cost && cost <= self.max_cost
    }
}

/// Tier rules keyed by tier number.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TierRules {
    rules: BTreeMap<u8, TierRule>,
}

/// Rule chosen for a request, with the tier it actually belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedTier {
    pub tier: u8,
    pub rule: TierRule,
    /// The requested tier had no rule and tier 1 was used instead.
    pub fallback: bool,
}

impl TierRules {
    pub const FALLBACK_TIER: u8 = 1;

    pub fn new(rules: impl IntoIterator<Item = (u8, TierRule)>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    pub fn rule(&self, tier: u8) -> Option<&TierRule> {
        self.rules.get(&tier)
    }

    pub fn insert(&mut self, tier: u8, rule: TierRule) {
        self.rules.insert(tier, rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &TierRule)> {
        self.rules.iter().map(|(tier, rule)| (*tier, rule))
    }

    /// Looks up `tier`, falling back to the tier-1 rule.
    pub fn resolve(&self, tier: u8) -> Option<ResolvedTier> {
        if let Some(rule) = self.rules.get(&tier) {
            return Some(ResolvedTier {
                tier,
                rule: *rule,
                fallback: false,
            });
        }
        self.rules
            .get(&Self::FALLBACK_TIER)
            .map(|rule| ResolvedTier {
                tier: Self::FALLBACK_TIER,
                rule: *rule,
                fallback: true,
            })
    }
}

impl Default for TierRules {
    fn default() -> Self {
        Self::new([
            (1, TierRule::new(2, 4, 2)),
            (2, TierRule::new(5, 8, 3)),
            (3, TierRule::new(8, 11, 4)),
            (4, TierRule::new(12, 16, 4)),
        ])
    }
}
