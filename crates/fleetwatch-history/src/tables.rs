//! redb table definitions for the snapshot history.

use redb::TableDefinition;

/// Snapshots keyed by capture timestamp (Unix seconds), JSON values.
pub const SNAPSHOTS: TableDefinition<u64, &[u8]> = TableDefinition::new("snapshots");
