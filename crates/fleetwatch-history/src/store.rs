//! HistoryStore — append-only snapshot persistence with retention pruning.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use fleetwatch_core::Snapshot;

use crate::error::{HistoryError, HistoryResult};
use crate::tables::SNAPSHOTS;

/// Convert any `Display` error into a `HistoryError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| HistoryError::$variant(e.to_string())
    };
}

/// Snapshots older than this are dropped on prune.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(5 * 24 * 60 * 60);

/// Durable rolling history of fleet snapshots, backed by redb.
#[derive(Clone)]
pub struct HistoryStore {
    db: Arc<Database>,
}

impl HistoryStore {
    /// Open (or create) a persistent history store at the given path.
    pub fn open(path: &Path) -> HistoryResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "history store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory history store (for testing).
    pub fn open_in_memory() -> HistoryResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory history store opened");
        Ok(store)
    }

    /// Create the snapshots table if it doesn't exist yet.
    fn ensure_tables(&self) -> HistoryResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(SNAPSHOTS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Durably append a snapshot, keyed by its timestamp.
    pub fn append(&self, snapshot: &Snapshot) -> HistoryResult<()> {
        let value = serde_json::to_vec(snapshot).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(SNAPSHOTS).map_err(map_err!(Table))?;
            table
                .insert(snapshot.timestamp, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(
            timestamp = snapshot.timestamp,
            instances = snapshot.instances.len(),
            "snapshot appended"
        );
        Ok(())
    }

    /// Remove snapshots older than `now - retention`.
    ///
    /// The newest stored snapshot is always spared, so a just-appended
    /// snapshot can never evict itself, whatever the clock says.
    /// Returns the number of snapshots removed.
    pub fn prune(&self, now: u64, retention: Duration) -> HistoryResult<u32> {
        let cutoff = now.saturating_sub(retention.as_secs());

        // Collect doomed keys in a read transaction first.
        let (doomed, newest) = {
            let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
            let table = txn.open_table(SNAPSHOTS).map_err(map_err!(Table))?;
            let mut doomed = Vec::new();
            let mut newest: Option<u64> = None;
            for entry in table.iter().map_err(map_err!(Read))? {
                let (key, _) = entry.map_err(map_err!(Read))?;
                let ts = key.value();
                newest = Some(newest.map_or(ts, |n| n.max(ts)));
                if ts < cutoff {
                    doomed.push(ts);
                }
            }
            (doomed, newest)
        };

        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let mut removed = 0u32;
        {
            let mut table = txn.open_table(SNAPSHOTS).map_err(map_err!(Table))?;
            for ts in doomed {
                if Some(ts) == newest {
                    continue;
                }
                table.remove(ts).map_err(map_err!(Write))?;
                removed += 1;
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;

        if removed > 0 {
            debug!(removed, cutoff, "history pruned");
        }
        Ok(removed)
    }

    /// All stored snapshots, sorted ascending by timestamp.
    pub fn all(&self) -> HistoryResult<Vec<Snapshot>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SNAPSHOTS).map_err(map_err!(Table))?;
        let mut snapshots = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let snapshot: Snapshot =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            snapshots.push(snapshot);
        }
        snapshots.sort_by_key(|s| s.timestamp);
        Ok(snapshots)
    }

    /// The newest stored snapshot, if any.
    pub fn latest(&self) -> HistoryResult<Option<Snapshot>> {
        Ok(self.all()?.pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetwatch_core::InstanceRecord;

    fn test_snapshot(timestamp: u64) -> Snapshot {
        Snapshot {
            timestamp,
            instances: vec![InstanceRecord {
                name: format!("node-{timestamp}"),
                region: "us-east-1".to_string(),
                id: format!("i-{timestamp}"),
                instance_type: "m5.large".to_string(),
                hourly_price: 0.096,
                spot: false,
                last_cpu: None,
            }],
        }
    }

    const DAY: u64 = 24 * 60 * 60;

    #[test]
    fn append_and_read_back() {
        let store = HistoryStore::open_in_memory().unwrap();
        let snapshot = test_snapshot(1000);

        store.append(&snapshot).unwrap();
        let all = store.all().unwrap();

        assert_eq!(all, vec![snapshot]);
    }

    #[test]
    fn read_back_is_sorted_for_any_insertion_order() {
        let store = HistoryStore::open_in_memory().unwrap();
        for ts in [5000u64, 1000, 3000, 2000, 4000] {
            store.append(&test_snapshot(ts)).unwrap();
        }

        let stamps: Vec<u64> = store.all().unwrap().iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![1000, 2000, 3000, 4000, 5000]);
    }

    #[test]
    fn prune_removes_only_entries_past_retention() {
        let store = HistoryStore::open_in_memory().unwrap();
        let now = 100 * DAY;
        store.append(&test_snapshot(now - 7 * DAY)).unwrap();
        store.append(&test_snapshot(now - 6 * DAY)).unwrap();
        store.append(&test_snapshot(now - 2 * DAY)).unwrap();
        store.append(&test_snapshot(now)).unwrap();

        let removed = store.prune(now, DEFAULT_RETENTION).unwrap();
        assert_eq!(removed, 2);

        let stamps: Vec<u64> = store.all().unwrap().iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![now - 2 * DAY, now]);
    }

    #[test]
    fn prune_is_a_noop_within_retention() {
        let store = HistoryStore::open_in_memory().unwrap();
        let now = 100 * DAY;
        store.append(&test_snapshot(now - DAY)).unwrap();
        store.append(&test_snapshot(now)).unwrap();

        assert_eq!(store.prune(now, DEFAULT_RETENTION).unwrap(), 0);
        assert_eq!(store.all().unwrap().len(), 2);
    }

    #[test]
    fn just_appended_snapshot_survives_prune_regardless_of_age() {
        let store = HistoryStore::open_in_memory().unwrap();
        let now = 100 * DAY;
        // A snapshot already past the retention window when appended.
        store.append(&test_snapshot(now - 30 * DAY)).unwrap();

        let removed = store.prune(now, DEFAULT_RETENTION).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(store.all().unwrap().len(), 1);
    }

    #[test]
    fn prune_on_empty_store() {
        let store = HistoryStore::open_in_memory().unwrap();
        assert_eq!(store.prune(100 * DAY, DEFAULT_RETENTION).unwrap(), 0);
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn latest_returns_newest() {
        let store = HistoryStore::open_in_memory().unwrap();
        assert!(store.latest().unwrap().is_none());

        store.append(&test_snapshot(2000)).unwrap();
        store.append(&test_snapshot(1000)).unwrap();

        assert_eq!(store.latest().unwrap().unwrap().timestamp, 2000);
    }

    #[test]
    fn append_same_timestamp_overwrites() {
        let store = HistoryStore::open_in_memory().unwrap();
        store.append(&test_snapshot(1000)).unwrap();

        let mut replacement = test_snapshot(1000);
        replacement.instances.clear();
        store.append(&replacement).unwrap();

        let all = store.all().unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].instances.is_empty());
    }

    #[test]
    fn persistence_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("history.redb");

        {
            let store = HistoryStore::open(&db_path).unwrap();
            store.append(&test_snapshot(1000)).unwrap();
        }

        // Reopen the same database file.
        let store = HistoryStore::open(&db_path).unwrap();
        let all = store.all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].timestamp, 1000);
    }
}
