//! Static configuration: the on-demand price table and host classes.
//!
//! Both are TOML files loaded once at startup. Price table:
//!
//! ```toml
//! [prices."us-east-1"]
//! "m5.large" = 0.096
//! "c5.xlarge" = 0.17
//! ```
//!
//! Host classes, ordered, first-match-wins, catch-all last:
//!
//! ```toml
//! [[class]]
//! name = "star-cluster-node"
//! pattern = "node[0-9]+"
//! min_cpu_avg = 90.0
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// On-demand hourly prices keyed by region and instance type.
///
/// Static reference data: loaded once, read-only for the rest of the
/// run. Every price is validated strictly positive and finite at load.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<String, HashMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
struct PriceTableFile {
    /// region → instance type → hourly price.
    prices: HashMap<String, HashMap<String, f64>>,
}

impl PriceTable {
    /// Load and validate the price table from a TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let file: PriceTableFile = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut table = Self::default();
        for (region, by_type) in file.prices {
            for (instance_type, price) in by_type {
                table.insert(region.clone(), instance_type, price)?;
            }
        }
        Ok(table)
    }

    /// Build a table from (region, instance type, price) triples.
    pub fn from_entries<R, T>(entries: impl IntoIterator<Item = (R, T, f64)>) -> ConfigResult<Self>
    where
        R: Into<String>,
        T: Into<String>,
    {
        let mut table = Self::default();
        for (region, instance_type, price) in entries {
            table.insert(region.into(), instance_type.into(), price)?;
        }
        Ok(table)
    }

    fn insert(&mut self, region: String, instance_type: String, price: f64) -> ConfigResult<()> {
        if price <= 0.0 || !price.is_finite() {
            return Err(ConfigError::NonPositivePrice {
                region,
                instance_type,
                price,
            });
        }
        self.prices.entry(region).or_default().insert(instance_type, price);
        Ok(())
    }

    /// Hourly on-demand price for (region, instance type).
    ///
    /// Missing entries are a fatal configuration error naming both keys.
    pub fn get(&self, region: &str, instance_type: &str) -> ConfigResult<f64> {
        self.prices
            .get(region)
            .and_then(|by_type| by_type.get(instance_type))
            .copied()
            .ok_or_else(|| ConfigError::MissingPrice {
                region: region.to_string(),
                instance_type: instance_type.to_string(),
            })
    }
}

/// One host-class rule: instances whose name matches `pattern` belong to
/// class `name` and are expected to average at least `min_cpu_avg`
/// percent CPU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    pub name: String,
    /// Regular expression matched against the start of the instance name.
    pub pattern: String,
    pub min_cpu_avg: f64,
}

#[derive(Debug, Deserialize)]
struct HostConfigFile {
    class: Vec<HostConfig>,
}

/// Load an ordered host-class list from a TOML file.
///
/// Order is significant: classification takes the first matching entry,
/// and the last entry must be a catch-all default.
pub fn host_classes_from_file(path: &Path) -> ConfigResult<Vec<HostConfig>> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let file: HostConfigFile = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    if file.class.is_empty() {
        return Err(ConfigError::NoHostClasses);
    }
    Ok(file.class)
}

/// Built-in host classes: a single catch-all that never alerts.
pub fn default_host_classes() -> Vec<HostConfig> {
    vec![HostConfig {
        name: "default".to_string(),
        pattern: ".*".to_string(),
        min_cpu_avg: 0.0,
    }]
}
