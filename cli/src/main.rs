//! ensindex-status CLI.
//!
//! # Commands
//! ```text
//! ensindex-status serve     --config <config.yaml>
//! ensindex-status aggregate --facts <facts.json> [--snapshot-time <unix>] [--now <unix>]
//! ensindex-status inspect   --file <projection.json> [--now <unix>] [--gap-threshold <secs>]
//! ensindex-status info
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

use ensindex_status_core::{DurationSecs, UnixTimestamp, DEFAULT_GAP_THRESHOLD};
use ensindex_status_observability::init_tracing;

mod cmd_aggregate;
mod cmd_inspect;
mod config;

use config::AppConfig;

#[derive(Parser)]
#[command(
    name = "ensindex-status",
    about = "Multi-chain indexing status for ENSIndex",
    long_about = "
Builds, validates and serves the indexing status of every chain an ENS
indexer tracks: per-chain progress, the omnichain status and cursor, and
the worst case distance from realtime used by uptime monitors.

ENVIRONMENT VARIABLES:
  RUST_LOG    Overrides the log directives from the config file
",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve /api/indexing-status and /amirealtime over HTTP
    Serve {
        /// YAML config file with `api` and `log` sections (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Build a realtime projection from a JSON facts file and print it
    Aggregate {
        /// Facts file keyed by decimal chain id
        #[arg(short, long)]
        facts: PathBuf,
        /// Snapshot time (unix seconds, default: now)
        #[arg(long)]
        snapshot_time: Option<UnixTimestamp>,
        /// Instant to project onto (unix seconds, default: snapshot time)
        #[arg(long)]
        now: Option<UnixTimestamp>,
    },

    /// Validate a serialized projection and print a summary
    Inspect {
        /// Projection JSON as served by /api/indexing-status
        #[arg(short, long)]
        file: PathBuf,
        /// Re-project onto this instant (unix seconds)
        #[arg(long)]
        now: Option<UnixTimestamp>,
        /// Realtime gap threshold in seconds
        #[arg(long, default_value_t = DEFAULT_GAP_THRESHOLD)]
        gap_threshold: DurationSecs,
    },

    /// Show build and default configuration info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => cmd_serve(config).await,

        Commands::Aggregate {
            facts,
            snapshot_time,
            now,
        } => cmd_aggregate::run(&facts, snapshot_time.unwrap_or_else(unix_now), now),

        Commands::Inspect {
            file,
            now,
            gap_threshold,
        } => cmd_inspect::run(&file, now, gap_threshold),

        Commands::Info => cmd_info(),
    }
}

fn unix_now() -> UnixTimestamp {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

// ─── Command implementations ─────────────────────────────────────────────────

async fn cmd_serve(config_path: Option<PathBuf>) -> Result<()> {
    let config = match &config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    init_tracing(&config.log);

    match &config.api.facts_file {
        Some(path) => info!(facts_file = %path.display(), "reading chain facts from file"),
        None => info!("no facts file configured; serving an empty in-memory source"),
    }

    let source = ensindex_status_api::facts_source(&config.api);
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "cannot listen for shutdown signal");
        }
        info!("shutdown requested");
    };

    ensindex_status_api::serve(&config.api, source, shutdown)
        .await
        .context("status API failed")
}

fn cmd_info() -> Result<()> {
    let defaults = AppConfig::default();
    println!("ENSIndex Status v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Chain statuses:       Queued, Backfill, Following, Completed");
    println!("Omnichain statuses:   Unstarted, Backfill, Following, Completed");
    println!("Strategies:           omnichain");
    println!();
    println!("Defaults:");
    println!("  listen address:     {}", defaults.api.listen_address);
    println!("  gap threshold:      {}s", defaults.api.default_gap_threshold);
    println!("  log level:          {}", defaults.log.level);
    println!();
    println!("Endpoints:");
    println!("  GET /api/indexing-status   realtime indexing status projection");
    println!("  GET /amirealtime           200 / 503 against ?gapThreshold=<secs>");
    println!("  GET /health                liveness");
    Ok(())
}
