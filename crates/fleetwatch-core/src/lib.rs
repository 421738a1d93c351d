//! fleetwatch-core — shared types, configuration, and the provider seam.
//!
//! Everything the poller, history store, and policies have in common
//! lives here: the snapshot data model, the static configuration files
//! (on-demand price table, host classes, credentials), and the
//! [`CloudProvider`] trait that keeps the core logic testable with
//! in-memory fakes instead of live API calls.
//!
//! # Architecture
//!
//! ```text
//! fleetwatch-core
//!   ├── types        Snapshot, InstanceRecord, CpuSample
//!   ├── config       PriceTable, HostConfig (TOML)
//!   ├── credentials  KEY = VALUE credentials file
//!   ├── provider     CloudProvider trait + descriptor types
//!   └── error        ConfigError
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod provider;
pub mod types;

pub use config::{PriceTable, HostConfig, default_host_classes, host_classes_from_file};
pub use credentials::AwsCredentials;
pub use error::{ConfigError, ConfigResult};
pub use provider::{
    CloudProvider, InstanceDescriptor, LifecycleState, ProviderError, ProviderResult,
    SpotPricePoint,
};
pub use types::{CpuSample, InstanceRecord, Snapshot, epoch_secs, region_of_zone};
