//! The narrow interface to the cloud provider.
//!
//! Everything the poller needs from the provider fits in three read-only
//! calls: list instances, spot price history, CPU utilization. Live
//! implementations perform the actual API traffic; tests inject fakes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::CpuSample;

/// Result type alias for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced by a provider implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider connection failed: {0}")]
    Connection(String),

    #[error("provider api error: {0}")]
    Api(String),

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Lifecycle state of an instance as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Pending,
    Running,
    ShuttingDown,
    Stopping,
    Stopped,
    Terminated,
}

impl LifecycleState {
    /// Parse a provider state string (`shutting-down`, `running`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "shutting-down" => Self::ShuttingDown,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            "terminated" => Self::Terminated,
            _ => return None,
        })
    }

    /// Terminal states are not billed and not actionable.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated | Self::Stopped)
    }
}

/// Per-instance data returned by the instance-listing call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceDescriptor {
    pub id: String,
    /// Name tag, when present.
    pub name: Option<String>,
    pub instance_type: String,
    /// Full placement string, e.g. `us-east-1a`.
    pub zone: String,
    pub state: LifecycleState,
    /// Set when the instance runs on spot capacity.
    pub spot_request_id: Option<String>,
}

impl InstanceDescriptor {
    pub fn is_spot(&self) -> bool {
        self.spot_request_id.is_some()
    }
}

/// One spot-price-history entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotPricePoint {
    /// Unix timestamp (seconds) of the price change record.
    pub timestamp: u64,
    /// Hourly price in USD.
    pub price: f64,
}

/// Read-only access to the provider APIs the poller consumes.
pub trait CloudProvider {
    /// List every instance in a region, regardless of lifecycle state.
    fn list_instances(&self, region: &str) -> ProviderResult<Vec<InstanceDescriptor>>;

    /// Spot price history for (zone, instance type) over a zero-width
    /// window at `at`. May legitimately return several entries when
    /// concurrent price changes were recorded for the same instant.
    fn spot_price_history(
        &self,
        zone: &str,
        instance_type: &str,
        at: u64,
    ) -> ProviderResult<Vec<SpotPricePoint>>;

    /// Average CPU utilization samples for one instance between `start`
    /// and `end` at `period_secs` granularity, sorted ascending by
    /// timestamp.
    fn cpu_utilization(
        &self,
        region: &str,
        instance_id: &str,
        start: u64,
        end: u64,
        period_secs: u32,
    ) -> ProviderResult<Vec<CpuSample>>;
}
