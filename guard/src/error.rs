//! Guard error types.

use latch_core::StoreError;
use latch_rule::{AggregateViolation, ConfigError, Violation};
use thiserror::Error;

/// Result type for guarded operations.
pub type GuardResult<T> = Result<T, GuardError>;

/// Errors raised by the guard.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The rule set is malformed.
    #[error("Invalid rule configuration: {0}")]
    Config(#[from] ConfigError),

    /// A rule or `Or` blocked the operation.
    #[error(transparent)]
    Violation(#[from] Violation),

    /// Batch update blocked, per field.
    #[error(transparent)]
    Aggregate(#[from] AggregateViolation),

    /// The underlying store rejected the write.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Guard settings could not be loaded.
    #[error("Invalid guard settings: {0}")]
    Settings(#[from] serde_json::Error),
}

impl GuardError {
    /// Whether a business rule, rather than a programming or storage
    /// problem, blocked the operation.
    pub fn is_violation(&self) -> bool {
        matches!(self, GuardError::Violation(_) | GuardError::Aggregate(_))
    }

    /// Code of the violated rule, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            GuardError::Violation(v) => v.code(),
            _ => None,
        }
    }
}
