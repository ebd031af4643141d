//! Unified error type surfaced by the session API.
//!
//! Steady-state play never fails: public session operations log these at
//! `warn!` and fall back. The fallible `try_*` variants return them for
//! callers that want to react.
use melody_core::{LootError, MatchError, OracleError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session requires oracles to be configured before building")]
    MissingOracles,

    #[error("unknown loot source `{0}`")]
    UnknownLootSource(String),

    #[error("no player combatant in the arena")]
    MissingPlayer,

    #[error("note catalog has no {color} note")]
    MissingNote { color: melody_core::NoteColor },

    #[error(transparent)]
    Loot(#[from] LootError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}
