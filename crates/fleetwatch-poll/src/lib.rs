//! fleetwatch-poll — one poll cycle over the fleet.
//!
//! A poll cycle lists every live instance across the requested regions
//! and assembles one [`Snapshot`](fleetwatch_core::Snapshot):
//!
//! ```text
//! SnapshotBuilder
//!   ├── CloudProvider.list_instances(region)   skip terminal states
//!   ├── MetricsFetcher.last_cpu()              trailing 30 min window
//!   └── PriceResolver.hourly_price()
//!         ├── on-demand: PriceTable lookup (zone → region)
//!         └── spot: provider history, max price, cached per (zone, type)
//! ```
//!
//! All provider traffic is read-only; the only mutable state is the
//! per-run spot price cache inside the resolver.

pub mod builder;
pub mod error;
pub mod metrics;
pub mod pricing;

pub use builder::SnapshotBuilder;
pub use error::{PollError, PollResult};
pub use metrics::MetricsFetcher;
pub use pricing::PriceResolver;
