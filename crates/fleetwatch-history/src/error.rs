//! Error types for the snapshot history store.

use thiserror::Error;

/// Result type alias for history store operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors that can occur during history store operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to open history database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),
}
