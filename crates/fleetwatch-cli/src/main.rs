use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use fleetwatch_aws::AwsProvider;
use fleetwatch_core::{
    AwsCredentials, PriceTable, default_host_classes, epoch_secs, host_classes_from_file,
};
use fleetwatch_history::{DEFAULT_RETENTION, HistoryStore};
use fleetwatch_policy::{AlertRecord, CpuPolicy, HostClassifier, Reporter, SpendPolicy};
use fleetwatch_poll::{PriceResolver, SnapshotBuilder};

#[derive(Parser)]
#[command(
    name = "fleetwatch",
    about = "Snapshot cloud fleet state and alert on spend and idle CPU",
    version,
)]
struct Cli {
    /// Path to the snapshot history database.
    db: PathBuf,

    /// Alert if fleet cost in $ per hour exceeds this ceiling.
    #[arg(long = "max_spend", default_value_t = 0.10)]
    max_spend: f64,

    /// Path to an AWS credentials file (KEY = VALUE lines).
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Path to the on-demand price table.
    #[arg(long, default_value = "prices.toml")]
    prices: PathBuf,

    /// Region to poll; repeat for multiple regions.
    #[arg(long = "region", default_value = "us-east-1")]
    regions: Vec<String>,

    /// Path to a host-class config; defaults to a single catch-all class.
    #[arg(long)]
    hosts: Option<PathBuf>,
}

fn run(cli: &Cli) -> anyhow::Result<Vec<AlertRecord>> {
    if let Some(path) = &cli.credentials {
        let creds = AwsCredentials::from_file(path)
            .with_context(|| format!("loading credentials from {}", path.display()))?;
        creds.export_to_env();
        debug!(path = %path.display(), "credentials exported to environment");
    }

    let table = PriceTable::from_file(&cli.prices)
        .with_context(|| format!("loading price table from {}", cli.prices.display()))?;
    let classes = match &cli.hosts {
        Some(path) => host_classes_from_file(path)
            .with_context(|| format!("loading host classes from {}", path.display()))?,
        None => default_host_classes(),
    };
    let classifier = HostClassifier::new(&classes)?;

    let provider = AwsProvider::new()?;
    let mut prices = PriceResolver::new(table, &provider);
    let builder = SnapshotBuilder::new(&provider);

    let now = epoch_secs();
    let snapshot = builder.build(&mut prices, &cli.regions, now)?;
    info!(
        timestamp = snapshot.timestamp,
        instances = snapshot.instances.len(),
        "snapshot assembled"
    );

    let store = HistoryStore::open(&cli.db)?;
    store.append(&snapshot)?;
    let removed = store.prune(now, DEFAULT_RETENTION)?;
    debug!(removed, "old snapshots pruned");
    let history = store.all()?;

    let mut reporter = Reporter::new();
    SpendPolicy {
        max_hourly_spend: cli.max_spend,
    }
    .evaluate(&history, &mut reporter)?;
    CpuPolicy.evaluate(&history, &classifier, &mut reporter)?;

    Ok(reporter.into_alerts())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fleetwatch=info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(alerts) if alerts.is_empty() => {
            println!("okay");
            ExitCode::SUCCESS
        }
        Ok(alerts) => {
            for alert in &alerts {
                println!("{}: {}", alert.key, alert.message);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let cli = Cli::try_parse_from(["fleetwatch", "history.redb"]).unwrap();
        assert_eq!(cli.db, PathBuf::from("history.redb"));
        assert_eq!(cli.max_spend, 0.10);
        assert!(cli.credentials.is_none());
        assert!(cli.hosts.is_none());
        assert_eq!(cli.regions, vec!["us-east-1".to_string()]);
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::try_parse_from([
            "fleetwatch",
            "history.redb",
            "--max_spend",
            "0.05",
            "--credentials",
            "creds.txt",
            "--region",
            "us-east-1",
            "--region",
            "eu-west-2",
        ])
        .unwrap();

        assert_eq!(cli.max_spend, 0.05);
        assert_eq!(cli.credentials, Some(PathBuf::from("creds.txt")));
        assert_eq!(
            cli.regions,
            vec!["us-east-1".to_string(), "eu-west-2".to_string()]
        );
    }

    #[test]
    fn db_path_is_required() {
        assert!(Cli::try_parse_from(["fleetwatch"]).is_err());
    }
}
