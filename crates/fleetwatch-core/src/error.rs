//! Configuration error types.

use thiserror::Error;

/// Result type alias for configuration loading and lookups.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors in static configuration: price table, host classes, credentials.
///
/// All of these are fatal; the run aborts rather than continuing with
/// incomplete pricing or classification data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("no price for region={region}, instance_type={instance_type}")]
    MissingPrice {
        region: String,
        instance_type: String,
    },

    #[error("region={region}, instance_type={instance_type} has non-positive price {price}")]
    NonPositivePrice {
        region: String,
        instance_type: String,
        price: f64,
    },

    #[error("credentials file is missing {key}")]
    MissingCredential { key: &'static str },

    #[error("host class list is empty")]
    NoHostClasses,

    #[error("invalid pattern for host class {name}: {reason}")]
    HostPattern { name: String, reason: String },
}
