//! Fleet spend ceiling check.

use tracing::debug;

use fleetwatch_core::Snapshot;

use crate::error::{PolicyError, PolicyResult};
use crate::reporter::Reporter;

/// Alert key emitted when the ceiling is exceeded.
pub const EXCEEDED_MAX_SPEND: &str = "exceeded-max-spend";

/// Compares the latest snapshot's total hourly cost to a ceiling.
#[derive(Debug, Clone, Copy)]
pub struct SpendPolicy {
    /// Maximum tolerated fleet cost in USD per hour.
    pub max_hourly_spend: f64,
}

impl SpendPolicy {
    /// Evaluate the latest snapshot in `history`.
    ///
    /// An empty history is an error: there is nothing to evaluate, and
    /// silently skipping a billing check is worse than failing.
    pub fn evaluate(&self, history: &[Snapshot], reporter: &mut Reporter) -> PolicyResult<()> {
        let latest = history.last().ok_or(PolicyError::EmptyHistory)?;
        let current = latest.total_hourly_spend();
        debug!(current, ceiling = self.max_hourly_spend, "spend evaluated");

        if current > self.max_hourly_spend {
            reporter.report(
                EXCEEDED_MAX_SPEND,
                format!(
                    "Current hourly spend ${current}/hour > max spend ${}/hour",
                    self.max_hourly_spend
                ),
            );
        }
        Ok(())
    }
}
