//! Error types for board sessions and stores.

use thiserror::Error;

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while using a board.
#[derive(Debug, Error)]
pub enum Error {
    /// The signed-in key has no votes left
    #[error("no votes left on key {key_id}")]
    InsufficientVotes { key_id: String },

    /// Member input was rejected before reaching the store
    #[error("invalid input: {0}")]
    Validation(String),

    /// The store could not be reached or refused the request
    #[error("transport failure: {0}")]
    Transport(String),

    /// Not found
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation needs a signed-in member
    #[error("sign in with a member key first")]
    NotSignedIn,

    /// The access code matches no provisioned key
    #[error("unknown member key")]
    UnknownKey,

    /// The signed-in key may not perform the operation
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A record from the store breaks a model invariant
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl From<glasslog_core::Error> for Error {
    fn from(e: glasslog_core::Error) -> Self {
        match e {
            glasslog_core::Error::InsufficientVotes { key_id } => {
                Error::InsufficientVotes { key_id }
            }
            glasslog_core::Error::Validation(msg) => Error::Validation(msg),
            glasslog_core::Error::InvariantViolation(msg) => Error::InvariantViolation(msg),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}
