use crate::config::GameConfig;
use crate::env::{GameEnv, OracleError, RngOracle, compute_seed};
use crate::error::{ErrorSeverity, GameError};
use crate::melody::{Melody, NoteSequence};
use crate::note::NoteCatalog;

use super::{LootTable, TierRules};

/// Errors that prevent a melody from being generated at all.
///
/// Both configuration variants degrade to "no loot" in the runtime.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LootError {
    #[error("note catalog is empty")]
    EmptyCatalog,

    #[error("no rule for tier {tier} and no tier 1 fallback")]
    NoTierRule { tier: u8 },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for LootError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Configuration
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyCatalog => "LOOT_EMPTY_CATALOG",
            Self::NoTierRule { .. } => "LOOT_NO_TIER_RULE",
            Self::Oracle(_) => "LOOT_ORACLE",
        }
    }
}

/// Seed inputs of one loot event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LootSeed {
    pub game_seed: u64,
    /// Loot events so far in the session.
    pub nonce: u64,
    pub source: u32,
}

impl LootSeed {
    const TIER_CONTEXT: u32 = 0;
    /// Context of the host's bonus-tier roll.
    pub const LUCK_CONTEXT: u32 = 1;
    const NOTE_CONTEXT_BASE: u32 = 16;

    pub const fn new(game_seed: u64, nonce: u64, source: u32) -> Self {
        Self {
            game_seed,
            nonce,
            source,
        }
    }

    pub fn seed(&self, context: u32) -> u64 {
        compute_seed(self.game_seed, self.nonce, self.source, context)
    }

    fn note_seed(&self, attempt: u32, slot: usize) -> u64 {
        let context = Self::NOTE_CONTEXT_BASE
            + attempt * GameConfig::MAX_MELODY_NOTES as u32
            + slot as u32;
        self.seed(context)
    }
}

/// A generated melody plus how it was obtained.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedMelody {
    pub melody: Melody,
    pub requested_tier: u8,
    /// The requested tier had no rule; the tier-1 rule was used.
    pub fallback_rule: bool,
    /// False when every attempt missed the cost bounds and the last draw
    /// was kept.
    pub within_budget: bool,
    pub attempts: u32,
}

/// Builds melodies by rejection sampling against tier cost bounds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LootGenerator {
    catalog: NoteCatalog,
    rules: TierRules,
}

impl LootGenerator {
    pub fn new(catalog: NoteCatalog, rules: TierRules) -> Self {
        Self { catalog, rules }
    }

    pub fn catalog(&self) -> &NoteCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &TierRules {
        &self.rules
    }

    /// Generates a melody for `tier`.
    ///
    /// Up to [`GameConfig::MAX_LOOT_ATTEMPTS`] draws of `note_count` uniform
    /// notes are made; the first whose cost fits the rule wins. When none
    /// fits, the last draw is returned with `within_budget == false`.
    pub fn generate(
        &self,
        env: &GameEnv<'_>,
        tier: u8,
        seed: LootSeed,
    ) -> Result<GeneratedMelody, LootError> {
        let rng = env.rng()?;
        if self.catalog.is_empty() {
            return Err(LootError::EmptyCatalog);
        }
        let resolved = self.rules.resolve(tier).ok_or(LootError::NoTierRule { tier })?;
        let note_count = usize::from(resolved.rule.note_count).min(GameConfig::MAX_MELODY_NOTES);

        let mut sequence = NoteSequence::new();
        let mut attempts = 0;
        let mut within_budget = false;
        while attempts < GameConfig::MAX_LOOT_ATTEMPTS {
            sequence = self.draw(rng, &seed, attempts, note_count);
            attempts += 1;
            let cost: u32 = sequence
                .iter()
                .map(|note| u32::from(note.complexity_cost))
                .sum();
            if resolved.rule.accepts_cost(cost) {
                within_budget = true;
                break;
            }
        }

        let melody = Melody {
            name: format!("Spell T{}-{}", resolved.tier, seed.nonce),
            tier: resolved.tier,
            level: 1,
            sequence,
        };
        Ok(GeneratedMelody {
            melody,
            requested_tier: tier,
            fallback_rule: resolved.fallback,
            within_budget,
            attempts,
        })
    }

    /// Picks a tier from `table` and delegates to [`generate`](Self::generate).
    pub fn generate_from_table(
        &self,
        env: &GameEnv<'_>,
        table: &LootTable,
        seed: LootSeed,
    ) -> Result<GeneratedMelody, LootError> {
        let rng = env.rng()?;
        let roll = rng.below(seed.seed(LootSeed::TIER_CONTEXT), table.total_weight());
        self.generate(env, table.pick_tier(roll), seed)
    }

    fn draw(
        &self,
        rng: &dyn RngOracle,
        seed: &LootSeed,
        attempt: u32,
        note_count: usize,
    ) -> NoteSequence {
        let notes = self.catalog.notes();
        (0..note_count)
            .map(|slot| {
                let pick = rng.below(seed.note_seed(attempt, slot), notes.len() as u32);
                notes[pick as usize]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BalanceTables, Env, PcgRng};
    use crate::loot::TierRule;
    use crate::note::{Note, NoteColor};

    fn with_env<F: FnOnce(&GameEnv<'_>)>(f: F) {
        let tables = BalanceTables::default();
        let env = Env::with_all(&tables, &PcgRng).into_game_env();
        f(&env);
    }

    #[test]
    fn generated_melodies_respect_tier_rules() {
        let generator = LootGenerator::default();
        with_env(|env| {
            for tier in 1..=4u8 {
                let rule = *generator.rules().rule(tier).expect("default rule");
                for nonce in 0..50 {
                    let generated = generator
                        .generate(env, tier, LootSeed::new(7, nonce, 3))
                        .expect("generate");
                    assert_eq!(generated.melody.len(), usize::from(rule.note_count));
                    if generated.within_budget {
                        assert!(rule.accepts_cost(generated.melody.total_cost()));
                    }
                    assert_eq!(generated.melody.level, 1);
                }
            }
        });
    }

    #[test]
    fn same_seed_replays_same_melody() {
        let generator = LootGenerator::default();
        with_env(|env| {
            let seed = LootSeed::new(11, 4, 0);
            let a = generator.generate(env, 2, seed).expect("generate");
            let b = generator.generate(env, 2, seed).expect("generate");
            assert_eq!(a, b);
        });
    }

    #[test]
    fn unsatisfiable_rule_returns_last_draw() {
        let catalog = NoteCatalog::new(vec![Note::new(NoteColor::Green, 1)]);
        let rules = TierRules::new([(1, TierRule::new(50, 60, 3))]);
        let generator = LootGenerator::new(catalog, rules);
        with_env(|env| {
            let generated = generator
                .generate(env, 1, LootSeed::new(1, 1, 1))
                .expect("best effort");
            assert!(!generated.within_budget);
            assert_eq!(generated.attempts, GameConfig::MAX_LOOT_ATTEMPTS);
            assert_eq!(generated.melody.len(), 3);
        });
    }

    #[test]
    fn unknown_tier_uses_fallback_rule() {
        let generator = LootGenerator::default();
        with_env(|env| {
            let generated = generator
                .generate(env, 7, LootSeed::new(1, 2, 3))
                .expect("fallback");
            assert!(generated.fallback_rule);
            assert_eq!(generated.melody.tier, 1);
            assert_eq!(generated.melody.len(), 2);
        });
    }

    #[test]
    fn empty_catalog_is_a_configuration_error() {
        let generator = LootGenerator::new(NoteCatalog::new(Vec::new()), TierRules::default());
        with_env(|env| {
            let err = generator
                .generate(env, 1, LootSeed::new(0, 0, 0))
                .expect_err("no notes");
            assert_eq!(err, LootError::EmptyCatalog);
            assert!(err.severity().is_recoverable());
        });
    }

    #[test]
    fn missing_rng_is_reported() {
        let generator = LootGenerator::default();
        let env: GameEnv<'_> = Env::empty();
        assert_eq!(
            generator.generate(&env, 1, LootSeed::new(0, 0, 0)),
            Err(LootError::Oracle(OracleError::RngNotAvailable))
        );
    }

    #[test]
    fn table_rolls_pick_only_weighted_tiers() {
        let generator = LootGenerator::default();
        let table = LootTable::new(0, 0, 0, 1);
        with_env(|env| {
            for nonce in 0..20 {
                let generated = generator
                    .generate_from_table(env, &table, LootSeed::new(3, nonce, 9))
                    .expect("generate");
                assert_eq!(generated.requested_tier, 4);
                assert_eq!(generated.melody.len(), 4);
            }
        });
    }
}
