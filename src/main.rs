//! evishare - Debate evidence intake automation
//!
//! Watches a form response spreadsheet and turns each new row into an
//! archived, translated document entry plus email and chat notifications,
//! keeping submitter and tag frequency sheets and the form's choice lists
//! in step.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::info;

use evishare::config::{resolve_state_dir, Config};
use evishare::services::exporter::Exporter;
use evishare::services::monitor::Monitor;
use evishare::services::notifier::Announcer;
use evishare::services::pipeline::Pipeline;

/// Command-line arguments for evishare
#[derive(Parser, Debug)]
#[command(name = "evishare")]
#[command(about = "Debate evidence intake: translate, archive, announce")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the monitor cursor
    #[arg(long)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process one response row end to end
    Process {
        /// 1-based sheet row of the response
        #[arg(long)]
        row: u32,
    },
    /// Post the chat announcement for one response row
    Announce {
        /// 1-based sheet row of the response
        #[arg(long)]
        row: u32,
    },
    /// One monitor pass: handle every row past the cursor, then exit
    Sync,
    /// Poll the response sheet until interrupted
    Watch {
        /// Seconds between passes (default from config)
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Push the current frequency tables into the form's choice lists
    RefreshForm,
    /// Export archived responses as structured JSON
    Export {
        /// First row to export (default: first data row)
        #[arg(long)]
        from: Option<u32>,
        /// Last row to export (default: last sheet row)
        #[arg(long)]
        to: Option<u32>,
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evishare=info".into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting evishare v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;

    match args.command {
        Command::Process { row } => {
            let pipeline = Pipeline::connect(&config)
                .await
                .context("Failed to initialize pipeline")?;
            pipeline.process(row).await?;
        }
        Command::Announce { row } => {
            let announcer = Announcer::new(&config)?;
            announcer.announce(row).await?;
        }
        Command::Sync => {
            let state_dir = resolve_state_dir(args.state_dir.as_deref(), &config);
            let monitor = Monitor::connect(&config, state_dir, None)
                .await
                .context("Failed to initialize monitor")?;
            let handled = monitor.run_once().await?;
            info!("Handled {} new response(s)", handled);
        }
        Command::Watch { interval } => {
            let state_dir = resolve_state_dir(args.state_dir.as_deref(), &config);
            let monitor = Monitor::connect(&config, state_dir, interval)
                .await
                .context("Failed to initialize monitor")?;
            tokio::select! {
                result = monitor.run() => result?,
                _ = shutdown_signal() => {
                    info!("Shutdown complete");
                }
            }
        }
        Command::RefreshForm => {
            let pipeline = Pipeline::connect(&config)
                .await
                .context("Failed to initialize pipeline")?;
            pipeline.refresh_form_only().await?;
        }
        Command::Export { from, to, output } => {
            let exporter = Exporter::connect(&config)?;
            let count = exporter.export_to_file(&output, from, to).await?;
            info!("Exported {} entries to {}", count, output.display());
        }
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
