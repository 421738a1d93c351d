//! fleetwatch-policy — alert evaluation over snapshot history.
//!
//! Two policies run against the latest snapshot:
//!
//! - [`SpendPolicy`] compares total fleet hourly cost to a ceiling.
//! - [`CpuPolicy`] flags instances running below their host class's
//!   CPU floor, where host classes are an ordered, first-match-wins
//!   pattern list ending in a catch-all default.
//!
//! Policies push [`AlertRecord`]s into a caller-owned [`Reporter`];
//! there is no global alert state.

pub mod cpu;
pub mod error;
pub mod hosts;
pub mod reporter;
pub mod spend;

pub use cpu::CpuPolicy;
pub use error::{PolicyError, PolicyResult};
pub use hosts::{HostClass, HostClassifier};
pub use reporter::{AlertRecord, Reporter};
pub use spend::{EXCEEDED_MAX_SPEND, SpendPolicy};
