//! Policy evaluation error types.

use thiserror::Error;

/// Result type alias for policy evaluation.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Errors that can occur during policy evaluation.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("no snapshot history to evaluate")]
    EmptyHistory,

    #[error("no host class matches instance name {0}")]
    UnclassifiedHost(String),
}
