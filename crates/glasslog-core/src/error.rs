//! Error types for the allocation model.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the vote ledger and model validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The key has no votes left to spend.
    #[error("key {key_id} has no votes left")]
    InsufficientVotes { key_id: String },

    /// Member input is missing or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A record breaks a model invariant (e.g. balance above quota).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
