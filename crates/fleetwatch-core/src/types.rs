//! Snapshot data model.
//!
//! One poll cycle produces one [`Snapshot`] holding an [`InstanceRecord`]
//! per live instance. Snapshots are JSON-serialized for storage and are
//! never mutated after creation. All timestamps are Unix epoch seconds.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One CPU utilization sample as reported by the metrics API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuSample {
    /// Unix timestamp (seconds) of the sample.
    pub timestamp: u64,
    /// Average CPU utilization percent over the sample period.
    pub percent: f64,
}

/// Point-in-time record of a single live instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Instance name (Name tag, or the instance id when untagged).
    pub name: String,
    pub region: String,
    pub id: String,
    pub instance_type: String,
    /// Resolved hourly cost in USD.
    pub hourly_price: f64,
    /// Whether the instance runs on spot capacity.
    pub spot: bool,
    /// Most recent CPU sample, absent when the provider reported none.
    pub last_cpu: Option<CpuSample>,
}

/// One poll cycle's view of the whole fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Unix timestamp (seconds) when the snapshot was taken.
    pub timestamp: u64,
    pub instances: Vec<InstanceRecord>,
}

impl Snapshot {
    /// Total hourly cost across every instance in this snapshot.
    pub fn total_hourly_spend(&self) -> f64 {
        self.instances.iter().map(|i| i.hourly_price).sum()
    }
}

/// Current Unix time in seconds.
pub fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Region of an availability zone: `us-east-1a` → `us-east-1`.
pub fn region_of_zone(zone: &str) -> &str {
    zone.trim_end_matches(|c: char| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_strips_zone_suffix() {
        assert_eq!(region_of_zone("us-east-1a"), "us-east-1");
        assert_eq!(region_of_zone("eu-west-2c"), "eu-west-2");
        assert_eq!(region_of_zone("us-east-1"), "us-east-1");
        assert_eq!(region_of_zone(""), "");
    }

    #[test]
    fn total_spend_sums_all_instances() {
        let snapshot = Snapshot {
            timestamp: 1000,
            instances: vec![
                InstanceRecord {
                    name: "a".to_string(),
                    region: "us-east-1".to_string(),
                    id: "i-1".to_string(),
                    instance_type: "m5.large".to_string(),
                    hourly_price: 0.096,
                    spot: false,
                    last_cpu: None,
                },
                InstanceRecord {
                    name: "b".to_string(),
                    region: "us-east-1".to_string(),
                    id: "i-2".to_string(),
                    instance_type: "c5.xlarge".to_string(),
                    hourly_price: 0.17,
                    spot: true,
                    last_cpu: Some(CpuSample {
                        timestamp: 990,
                        percent: 55.0,
                    }),
                },
            ],
        };

        assert!((snapshot.total_hourly_spend() - 0.266).abs() < 1e-9);
    }

    #[test]
    fn total_spend_of_empty_snapshot_is_zero() {
        let snapshot = Snapshot {
            timestamp: 1000,
            instances: vec![],
        };
        assert_eq!(snapshot.total_hourly_spend(), 0.0);
    }

    #[test]
    fn snapshot_json_round_trip() {
        let snapshot = Snapshot {
            timestamp: 1234,
            instances: vec![InstanceRecord {
                name: "node17".to_string(),
                region: "us-east-1".to_string(),
                id: "i-17".to_string(),
                instance_type: "m5.large".to_string(),
                hourly_price: 0.096,
                spot: false,
                last_cpu: None,
            }],
        };

        let bytes = serde_json::to_vec(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, snapshot);
    }
}
