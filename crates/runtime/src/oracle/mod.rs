//! Runtime wrappers around static game content oracles.
//!
//! These implementations expose `melody-core` oracle traits and bundle them
//! into an [`OracleManager`] so the session can build [`melody_core::Env`]
//! snapshots on demand. The data is immutable at runtime; dynamic state lives
//! in the [`Session`](crate::Session).
mod tables;

use std::sync::Arc;

use melody_core::{BalanceTables, Env, GameEnv, PcgRng};

pub use tables::TablesOracleImpl;

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) tables: Arc<TablesOracleImpl>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    pub fn new(tables: Arc<TablesOracleImpl>) -> Self {
        Self {
            tables,
            rng: PcgRng, // PcgRng is stateless
        }
    }

    pub fn from_balance(tables: BalanceTables) -> Self {
        Self::new(Arc::new(TablesOracleImpl::new(tables)))
    }

    /// Converts oracle manager into GameEnv for melody-core
    pub fn as_game_env(&self) -> GameEnv<'_> {
        Env::with_all(self.tables.as_ref(), &self.rng).into_game_env()
    }

    pub fn tables(&self) -> &TablesOracleImpl {
        &self.tables
    }
}

impl Default for OracleManager {
    fn default() -> Self {
        Self::new(Arc::new(TablesOracleImpl::test_tables()))
    }
}
