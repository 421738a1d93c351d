//! Snapshot assembly across regions.

use tracing::debug;

use fleetwatch_core::{CloudProvider, InstanceRecord, Snapshot};

use crate::error::PollResult;
use crate::metrics::MetricsFetcher;
use crate::pricing::PriceResolver;

/// Builds one fleet snapshot per poll cycle.
///
/// Read-only with respect to provider state: listing, metrics, and spot
/// price lookups are the only external calls.
pub struct SnapshotBuilder<'a, P: CloudProvider> {
    provider: &'a P,
    metrics: MetricsFetcher<'a, P>,
}

impl<'a, P: CloudProvider> SnapshotBuilder<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            metrics: MetricsFetcher::new(provider),
        }
    }

    /// Snapshot every live instance across `regions`.
    ///
    /// Instances in a terminal lifecycle state (terminated, stopped) are
    /// skipped: they are not billed and not actionable. An instance
    /// without a Name tag is recorded under its instance id.
    pub fn build(
        &self,
        prices: &mut PriceResolver<'a, P>,
        regions: &[String],
        now: u64,
    ) -> PollResult<Snapshot> {
        let mut instances = Vec::new();
        for region in regions {
            let listed = self.provider.list_instances(region)?;
            debug!(%region, count = listed.len(), "instances listed");

            for desc in listed {
                if desc.state.is_terminal() {
                    continue;
                }

                let spot = desc.is_spot();
                let last_cpu = self.metrics.last_cpu(region, &desc.id, now)?;
                let hourly_price =
                    prices.hourly_price(spot, &desc.instance_type, &desc.zone, now)?;

                instances.push(InstanceRecord {
                    name: desc.name.unwrap_or_else(|| desc.id.clone()),
                    region: region.clone(),
                    id: desc.id,
                    instance_type: desc.instance_type,
                    hourly_price,
                    spot,
                    last_cpu,
                });
            }
        }
        Ok(Snapshot {
            timestamp: now,
            instances,
        })
    }
}
