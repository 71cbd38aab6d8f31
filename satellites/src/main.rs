//! Satellite group runner
//!
//! Starts a group of mock satellites, reports the aggregate span count on
//! an interval, and shuts the group down on Ctrl+C or after a fixed
//! duration.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use satellites::{GroupConfig, SatelliteCommand, SatelliteGroup};
use shared::PortSet;

#[derive(Parser)]
#[command(name = "satellites")]
#[command(about = "Runs a group of mock satellites and reports the spans they receive")]
struct Args {
    /// Mode forwarded to every satellite (overrides SATELLITE_MODE)
    #[arg(long)]
    mode: Option<String>,

    /// Ports as `8360-8367`, `8360..8368` or `9001,9002` (overrides SATELLITE_PORTS)
    #[arg(long)]
    ports: Option<PortSet>,

    /// Satellite command line; port and mode are appended (overrides SATELLITE_COMMAND)
    #[arg(long)]
    command: Option<String>,

    /// Directory that holds `logs/` (overrides SATELLITE_PROJECT_DIR)
    #[arg(long)]
    project_dir: Option<PathBuf>,

    /// Seconds between span count reports
    #[arg(long, default_value = "5")]
    poll_secs: u64,

    /// Stop after this many seconds instead of waiting for Ctrl+C
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Print a JSON snapshot of the group before shutting down
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    shared::logging::init_tracing(Some(&args.log_level));

    let config = build_config(&args)?;
    let mut group = SatelliteGroup::launch(config)
        .await
        .context("failed to launch satellite group")?;

    let outcome = watch(&mut group, &args).await;

    if args.json {
        let snapshot = group.snapshot().await;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    group
        .shutdown()
        .await
        .context("failed to shut down satellite group")?;
    tracing::info!("📝 Satellite logs appended to {}", group.logs().cumulative_log_path().display());

    outcome
}

fn build_config(args: &Args) -> anyhow::Result<GroupConfig> {
    let mut builder = GroupConfig::builder_from_env().context("invalid SATELLITE_* environment")?;

    if let Some(mode) = &args.mode {
        builder = builder.mode(mode.as_str());
    }
    if let Some(ports) = &args.ports {
        builder = builder.ports(ports.clone());
    }
    if let Some(command) = &args.command {
        builder = builder.command(SatelliteCommand::parse(command)?);
    }
    if let Some(dir) = &args.project_dir {
        builder = builder.project_dir(dir.clone());
    }

    Ok(builder.build())
}

async fn watch(group: &mut SatelliteGroup, args: &Args) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_secs(args.poll_secs.max(1)));

    let deadline = async {
        match args.duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let total = group
                    .spans_received()
                    .await
                    .context("failed to read spans received")?;
                tracing::info!(
                    "📊 {} spans received across {} satellites",
                    total,
                    group.config().ports.len()
                );
            }
            _ = &mut deadline => {
                tracing::info!("⏰ Run duration elapsed");
                return Ok(());
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!("🛑 Ctrl+C received");
                return Ok(());
            }
        }
    }
}
