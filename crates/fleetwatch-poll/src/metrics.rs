//! Recent CPU utilization for a single instance.

use fleetwatch_core::{CloudProvider, CpuSample};

use crate::error::PollResult;

/// Trailing window queried for CPU samples.
const CPU_WINDOW_SECS: u64 = 30 * 60;
/// Sample granularity requested from the metrics API.
const CPU_PERIOD_SECS: u32 = 60;

/// Fetches the most recent CPU sample for an instance.
pub struct MetricsFetcher<'a, P: CloudProvider> {
    provider: &'a P,
}

impl<'a, P: CloudProvider> MetricsFetcher<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Most recent average-CPU sample within the trailing 30-minute
    /// window, or `None` when the provider reports no samples at all.
    pub fn last_cpu(
        &self,
        region: &str,
        instance_id: &str,
        now: u64,
    ) -> PollResult<Option<CpuSample>> {
        let start = now.saturating_sub(CPU_WINDOW_SECS);
        let samples =
            self.provider
                .cpu_utilization(region, instance_id, start, now, CPU_PERIOD_SECS)?;
        Ok(samples.last().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProvider;

    #[test]
    fn picks_the_chronologically_last_sample() {
        let mut provider = FakeProvider::default();
        provider.cpu.insert(
            "i-1".to_string(),
            vec![
                CpuSample {
                    timestamp: 100,
                    percent: 10.0,
                },
                CpuSample {
                    timestamp: 160,
                    percent: 55.0,
                },
            ],
        );

        let fetcher = MetricsFetcher::new(&provider);
        let sample = fetcher.last_cpu("us-east-1", "i-1", 2000).unwrap();

        assert_eq!(
            sample,
            Some(CpuSample {
                timestamp: 160,
                percent: 55.0
            })
        );
    }

    #[test]
    fn no_samples_means_none() {
        let provider = FakeProvider::default();
        let fetcher = MetricsFetcher::new(&provider);

        assert_eq!(fetcher.last_cpu("us-east-1", "i-1", 2000).unwrap(), None);
    }

    #[test]
    fn queries_a_trailing_30_minute_window_at_60s_period() {
        let provider = FakeProvider::default();
        let fetcher = MetricsFetcher::new(&provider);

        fetcher.last_cpu("us-east-1", "i-1", 10_000).unwrap();

        let windows = provider.cpu_windows.borrow();
        assert_eq!(windows.as_slice(), &[(10_000 - 1800, 10_000, 60)]);
    }
}
