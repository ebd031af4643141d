//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors raised when an [`Env`](super::Env) is missing a required oracle.
///
/// A missing oracle means the host wired the session incorrectly. Callers
/// skip the operation (no loot, no spawn) instead of aborting the frame.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// TablesOracle is not available in the environment.
    #[error("TablesOracle not available")]
    TablesNotAvailable,

    /// RngOracle is not available in the environment.
    #[error("RngOracle not available")]
    RngNotAvailable,
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Configuration
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TablesNotAvailable => "ORACLE_TABLES_NOT_AVAILABLE",
            Self::RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
        }
    }
}
