//! Per-host-class CPU floor check.

use std::collections::BTreeMap;

use tracing::debug;

use fleetwatch_core::Snapshot;

use crate::error::{PolicyError, PolicyResult};
use crate::hosts::HostClassifier;
use crate::reporter::Reporter;

/// Flags instances whose recent CPU runs below their class floor.
///
/// Missing telemetry counts as 0% utilization: an instance that reports
/// nothing is treated as idle, never as exempt from the check.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuPolicy;

impl CpuPolicy {
    /// Evaluate the latest snapshot in `history` against `classifier`.
    ///
    /// Emits one alert per host class with at least one offender, keyed
    /// `<class>-cpu-too-low` and listing every offending (name, cpu)
    /// pair exactly once.
    pub fn evaluate(
        &self,
        history: &[Snapshot],
        classifier: &HostClassifier,
        reporter: &mut Reporter,
    ) -> PolicyResult<()> {
        let latest = history.last().ok_or(PolicyError::EmptyHistory)?;

        let mut too_low: BTreeMap<String, Vec<(String, f64)>> = BTreeMap::new();
        for inst in &latest.instances {
            let cpu = inst.last_cpu.map(|s| s.percent).unwrap_or(0.0);
            let class = classifier.classify(&inst.name)?;
            if cpu < class.min_cpu_avg {
                let offenders = too_low.entry(class.name.clone()).or_default();
                let pair = (inst.name.clone(), cpu);
                if !offenders.contains(&pair) {
                    offenders.push(pair);
                }
            }
        }

        for (class, offenders) in too_low {
            debug!(%class, count = offenders.len(), "cpu floor violated");
            let listed = offenders
                .iter()
                .map(|(name, cpu)| format!("{name} ({cpu}%)"))
                .collect::<Vec<_>>()
                .join(", ");
            reporter.report(
                format!("{class}-cpu-too-low"),
                format!("The following hosts reported low cpu usage: {listed}"),
            );
        }
        Ok(())
    }
}
