//! Poll cycle error types.

use thiserror::Error;

use fleetwatch_core::{ConfigError, ProviderError};

/// Result type alias for poll cycle operations.
pub type PollResult<T> = Result<T, PollError>;

/// Errors that can occur while assembling a snapshot.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("no spot price history for zone={zone}, instance_type={instance_type}")]
    NoSpotPrice {
        zone: String,
        instance_type: String,
    },
}
