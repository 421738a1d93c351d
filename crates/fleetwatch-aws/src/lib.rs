//! fleetwatch-aws — live `CloudProvider` backed by the AWS SDK.
//!
//! The poller core is synchronous and run-to-completion; this adapter
//! owns a current-thread tokio runtime and drives the async EC2 and
//! CloudWatch clients with `block_on`. SDK configs are cached per
//! region for the duration of the run. Credentials are resolved through
//! the SDK's standard chain, so the environment exported from a
//! credentials file is picked up automatically.

pub mod client;

pub use client::AwsProvider;
