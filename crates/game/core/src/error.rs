//! Common error infrastructure for melody-core.
//!
//! Domain errors (`LootError`, `OracleError`) live next to the code that
//! raises them and implement [`GameError`] so callers can decide between
//! falling back and reporting.
//!
//! Nothing in steady-state play is fatal: configuration gaps degrade to a
//! safe default and are surfaced to the runtime, which logs them.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the operation degraded to a fallback and play continues
/// - **Validation**: caller passed something unusable (bad key index, empty melody)
/// - **Configuration**: content is missing (no tier rule, empty catalog)
/// - **Internal**: state inconsistency that indicates a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Configuration,
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Configuration => "configuration",
            Self::Internal => "internal",
        }
    }

    /// Returns true if play can continue with a fallback.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable | Self::Configuration)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all melody-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_recoverable() {
        assert!(ErrorSeverity::Configuration.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
        assert_eq!(ErrorSeverity::Configuration.as_str(), "configuration");
    }
}
