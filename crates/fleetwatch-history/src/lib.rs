//! fleetwatch-history — rolling snapshot history backed by redb.
//!
//! Snapshots are JSON-serialized into redb's `&[u8]` value column, keyed
//! by capture timestamp. The store is append-only with time-based
//! pruning: entries are inserted by `append` and removed by `prune`,
//! never updated in place. Read-back is always sorted ascending by
//! timestamp.
//!
//! The store supports both on-disk and in-memory backends (the latter
//! for testing).

pub mod error;
pub mod store;
pub mod tables;

pub use error::{HistoryError, HistoryResult};
pub use store::{DEFAULT_RETENTION, HistoryStore};
