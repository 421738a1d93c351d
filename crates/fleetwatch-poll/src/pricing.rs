//! Hourly price resolution for on-demand and spot instances.

use std::collections::HashMap;

use tracing::debug;

use fleetwatch_core::{CloudProvider, PriceTable, region_of_zone};

use crate::error::{PollError, PollResult};

/// Resolves the hourly cost of an instance from its pricing mode.
///
/// On-demand prices come from the static [`PriceTable`]; spot prices are
/// fetched live from the provider and cached per (zone, instance type),
/// so the provider is queried at most once per pair per run.
pub struct PriceResolver<'a, P: CloudProvider> {
    table: PriceTable,
    provider: &'a P,
    spot_cache: HashMap<(String, String), f64>,
}

impl<'a, P: CloudProvider> PriceResolver<'a, P> {
    pub fn new(table: PriceTable, provider: &'a P) -> Self {
        Self {
            table,
            provider,
            spot_cache: HashMap::new(),
        }
    }

    /// Hourly price for an instance given its pricing mode and placement.
    pub fn hourly_price(
        &mut self,
        spot: bool,
        instance_type: &str,
        zone: &str,
        now: u64,
    ) -> PollResult<f64> {
        if spot {
            self.spot_price(instance_type, zone, now)
        } else {
            let region = region_of_zone(zone);
            Ok(self.table.get(region, instance_type)?)
        }
    }

    /// Most recent spot price for (zone, instance type).
    ///
    /// Queries a zero-width window at `now` and takes the maximum across
    /// the returned entries, which covers multiple concurrent
    /// price-change records. An empty result is a hard error.
    fn spot_price(&mut self, instance_type: &str, zone: &str, now: u64) -> PollResult<f64> {
        let key = (zone.to_string(), instance_type.to_string());
        if let Some(price) = self.spot_cache.get(&key) {
            return Ok(*price);
        }

        let history = self.provider.spot_price_history(zone, instance_type, now)?;
        let price = history
            .iter()
            .map(|p| p.price)
            .reduce(f64::max)
            .ok_or_else(|| PollError::NoSpotPrice {
                zone: zone.to_string(),
                instance_type: instance_type.to_string(),
            })?;

        debug!(%zone, %instance_type, price, entries = history.len(), "spot price resolved");
        self.spot_cache.insert(key, price);
        Ok(price)
    }
}
