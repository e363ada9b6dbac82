//! vigild - periodic log-error monitor daemon
//!
//! Watches a search store for configured error signatures on a fixed
//! cadence and fans matches out to the configured alert sinks.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vigil_monitor::{build_detector, build_sinks, MonitorConfig, Scheduler};
use vigil_store::{StoreClient, StoreClientConfig};

#[derive(Parser)]
#[command(name = "vigild")]
#[command(about = "Periodic log-error monitor")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the monitor
    Run {
        /// Path to config file
        #[arg(short, long, default_value = "/etc/vigil/config.toml")]
        config: PathBuf,
    },

    /// Generate a sample config file
    InitConfig {
        /// Path to write config
        #[arg(short, long, default_value = "/etc/vigil/config.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("vigil_monitor=info".parse()?)
                .add_directive("vigil_store=info".parse()?)
                .add_directive("vigil_alerts=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            run_monitor(config).await?;
        }

        Commands::InitConfig { output } => {
            init_config(output)?;
        }
    }

    Ok(())
}

async fn run_monitor(config_path: PathBuf) -> anyhow::Result<()> {
    info!(config = %config_path.display(), "starting vigild");

    let config = MonitorConfig::from_file(&config_path)?;
    info!(
        signatures = config.signatures.len(),
        interval_secs = config.interval_secs,
        lookback_secs = config.lookback_secs,
        index = %config.index_pattern,
        "loaded config"
    );

    let store = StoreClient::new(
        StoreClientConfig::new(config.store.url.clone())
            .with_request_timeout(std::time::Duration::from_secs(config.store.timeout_secs)),
    )?;

    // The monitor is useless without a reachable store; a failed probe
    // aborts startup.
    match store.ping().await {
        Ok(version) => {
            info!(url = %store.base_url(), version = %version, "store is reachable");
        }
        Err(e) => {
            error!(url = %store.base_url(), error = %e, "store probe failed");
            anyhow::bail!("{}", e);
        }
    }

    let sinks = build_sinks(&config)?;
    info!(sinks = sinks.len(), "registered alert sinks");

    let detector = Arc::new(build_detector(&config, Arc::new(store), sinks));
    let scheduler = Arc::new(Scheduler::new(
        detector,
        config.signatures.clone(),
        config.interval(),
    ));

    tokio::select! {
        () = Arc::clone(&scheduler).run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received, exiting");
        }
    }

    Ok(())
}

fn init_config(output: PathBuf) -> anyhow::Result<()> {
    let config = MonitorConfig::sample();
    let toml = config.to_toml()?;

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, toml)?;

    println!("Config written to {}", output.display());
    println!();
    println!("Edit the file to set your signatures and sinks, then run:");
    println!("  vigild run --config {}", output.display());

    Ok(())
}
