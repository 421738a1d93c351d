//! AWS credentials file parsing.
//!
//! The file holds `KEY = VALUE` lines. Both `AWS_ACCESS_KEY_ID` and
//! `AWS_SECRET_ACCESS_KEY` must be present; they are exported into the
//! process environment so the provider SDK picks them up through its
//! standard resolution chain.

use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// The two keys the provider SDK requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl AwsCredentials {
    /// Load credentials from a `KEY = VALUE` file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse `KEY = VALUE` lines; unrecognized lines are ignored.
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let line_re = Regex::new(r"^\s*([^\s=]+)\s*=\s*(\S+)").map_err(|e| ConfigError::Parse {
            path: "credentials".to_string(),
            reason: e.to_string(),
        })?;

        let mut vars = HashMap::new();
        for line in content.lines() {
            if let Some(caps) = line_re.captures(line) {
                vars.insert(caps[1].to_string(), caps[2].to_string());
            }
        }

        let take = |key: &'static str| {
            vars.get(key)
                .cloned()
                .ok_or(ConfigError::MissingCredential { key })
        };
        Ok(Self {
            access_key_id: take("AWS_ACCESS_KEY_ID")?,
            secret_access_key: take("AWS_SECRET_ACCESS_KEY")?,
        })
    }

    /// Publish both keys into the process environment.
    pub fn export_to_env(&self) {
        // SAFETY: called during single-threaded startup, before any
        // provider runtime threads exist.
        unsafe {
            std::env::set_var("AWS_ACCESS_KEY_ID", &self.access_key_id);
            std::env::set_var("AWS_SECRET_ACCESS_KEY", &self.secret_access_key);
        }
    }
}
