//! Alert accumulation.
//!
//! Policies push (key, message) records into a `Reporter` owned by the
//! caller; nothing here is global or persistent. The CLI turns a
//! non-empty reporter into a non-zero exit status.

/// One policy violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRecord {
    /// Stable machine-readable key, e.g. `exceeded-max-spend`.
    pub key: String,
    /// Human-readable description.
    pub message: String,
}

/// Collects alerts across policy evaluations for one run.
#[derive(Debug, Default)]
pub struct Reporter {
    alerts: Vec<AlertRecord>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.alerts.push(AlertRecord {
            key: key.into(),
            message: message.into(),
        });
    }

    pub fn alerts(&self) -> &[AlertRecord] {
        &self.alerts
    }

    /// True when no policy reported a violation.
    pub fn is_clean(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn into_alerts(self) -> Vec<AlertRecord> {
        self.alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_alerts_in_order() {
        let mut reporter = Reporter::new();
        assert!(reporter.is_clean());

        reporter.report("first-key", "first message");
        reporter.report("second-key", "second message");

        assert!(!reporter.is_clean());
        let alerts = reporter.into_alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].key, "first-key");
        assert_eq!(alerts[1].message, "second message");
    }
}
