//! EC2 + CloudWatch adapter.

use std::cell::RefCell;
use std::collections::HashMap;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_cloudwatch::types::{Dimension, Statistic};
use aws_sdk_ec2::primitives::DateTime;
use aws_sdk_ec2::types::InstanceType;
use tokio::runtime::Runtime;
use tracing::debug;

use fleetwatch_core::provider::{
    CloudProvider, InstanceDescriptor, LifecycleState, ProviderError, ProviderResult,
    SpotPricePoint,
};
use fleetwatch_core::types::{CpuSample, region_of_zone};

/// Live `CloudProvider` over the AWS SDK.
pub struct AwsProvider {
    rt: Runtime,
    /// Per-region SDK configs, resolved lazily and reused for the run.
    configs: RefCell<HashMap<String, SdkConfig>>,
}

impl AwsProvider {
    pub fn new() -> ProviderResult<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ProviderError::Connection(e.to_string()))?;
        Ok(Self {
            rt,
            configs: RefCell::new(HashMap::new()),
        })
    }

    fn config_for(&self, region: &str) -> SdkConfig {
        if let Some(config) = self.configs.borrow().get(region) {
            return config.clone();
        }
        let config = self.rt.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_string()))
                .load(),
        );
        self.configs
            .borrow_mut()
            .insert(region.to_string(), config.clone());
        config
    }
}

impl CloudProvider for AwsProvider {
    fn list_instances(&self, region: &str) -> ProviderResult<Vec<InstanceDescriptor>> {
        let client = aws_sdk_ec2::Client::new(&self.config_for(region));
        self.rt.block_on(async {
            let mut descriptors = Vec::new();
            let mut next_token: Option<String> = None;
            loop {
                let resp = client
                    .describe_instances()
                    .set_next_token(next_token.clone())
                    .send()
                    .await
                    .map_err(|e| ProviderError::Api(e.to_string()))?;

                for reservation in resp.reservations() {
                    for instance in reservation.instances() {
                        descriptors.push(descriptor_of(instance)?);
                    }
                }

                next_token = resp.next_token().map(str::to_string);
                if next_token.is_none() {
                    break;
                }
            }
            debug!(%region, count = descriptors.len(), "instances described");
            Ok(descriptors)
        })
    }

    fn spot_price_history(
        &self,
        zone: &str,
        instance_type: &str,
        at: u64,
    ) -> ProviderResult<Vec<SpotPricePoint>> {
        let region = region_of_zone(zone);
        let client = aws_sdk_ec2::Client::new(&self.config_for(region));
        let when = DateTime::from_secs(at as i64);

        self.rt.block_on(async {
            let resp = client
                .describe_spot_price_history()
                .start_time(when)
                .end_time(when)
                .instance_types(InstanceType::from(instance_type))
                .availability_zone(zone)
                .send()
                .await
                .map_err(|e| ProviderError::Api(e.to_string()))?;

            let mut points = Vec::new();
            for entry in resp.spot_price_history() {
                let raw = entry.spot_price().ok_or_else(|| {
                    ProviderError::Malformed(format!(
                        "spot history entry without price for {zone}/{instance_type}"
                    ))
                })?;
                let price: f64 = raw.parse().map_err(|_| {
                    ProviderError::Malformed(format!("unparseable spot price {raw:?}"))
                })?;
                let timestamp = entry
                    .timestamp()
                    .map(|t| t.secs().max(0) as u64)
                    .unwrap_or(at);
                points.push(SpotPricePoint { timestamp, price });
            }
            debug!(%zone, %instance_type, entries = points.len(), "spot price history fetched");
            Ok(points)
        })
    }

    fn cpu_utilization(
        &self,
        region: &str,
        instance_id: &str,
        start: u64,
        end: u64,
        period_secs: u32,
    ) -> ProviderResult<Vec<CpuSample>> {
        let client = aws_sdk_cloudwatch::Client::new(&self.config_for(region));

        self.rt.block_on(async {
            let resp = client
                .get_metric_statistics()
                .namespace("AWS/EC2")
                .metric_name("CPUUtilization")
                .dimensions(
                    Dimension::builder()
                        .name("InstanceId")
                        .value(instance_id)
                        .build(),
                )
                .start_time(DateTime::from_secs(start as i64))
                .end_time(DateTime::from_secs(end as i64))
                .period(period_secs as i32)
                .statistics(Statistic::Average)
                .send()
                .await
                .map_err(|e| ProviderError::Api(e.to_string()))?;

            let mut samples: Vec<CpuSample> = resp
                .datapoints()
                .iter()
                .filter_map(|dp| {
                    Some(CpuSample {
                        timestamp: dp.timestamp()?.secs().max(0) as u64,
                        percent: dp.average()?,
                    })
                })
                .collect();
            // CloudWatch returns datapoints unordered; the trait promises
            // ascending timestamps.
            samples.sort_by_key(|s| s.timestamp);
            Ok(samples)
        })
    }
}

fn descriptor_of(instance: &aws_sdk_ec2::types::Instance) -> ProviderResult<InstanceDescriptor> {
    let id = instance
        .instance_id()
        .ok_or_else(|| ProviderError::Malformed("instance without id".to_string()))?
        .to_string();

    let state_name = instance
        .state()
        .and_then(|s| s.name())
        .map(|n| n.as_str())
        .ok_or_else(|| ProviderError::Malformed(format!("instance {id} without state")))?;
    let state = LifecycleState::parse(state_name).ok_or_else(|| {
        ProviderError::Malformed(format!("unknown lifecycle state {state_name} for {id}"))
    })?;

    let instance_type = instance
        .instance_type()
        .map(|t| t.as_str().to_string())
        .ok_or_else(|| ProviderError::Malformed(format!("instance {id} without type")))?;

    let zone = instance
        .placement()
        .and_then(|p| p.availability_zone())
        .map(str::to_string)
        .ok_or_else(|| ProviderError::Malformed(format!("instance {id} without placement")))?;

    let name = instance
        .tags()
        .iter()
        .find(|t| t.key() == Some("Name"))
        .and_then(|t| t.value())
        .map(str::to_string);

    Ok(InstanceDescriptor {
        id,
        name,
        instance_type,
        zone,
        state,
        spot_request_id: instance.spot_instance_request_id().map(str::to_string),
    })
}
