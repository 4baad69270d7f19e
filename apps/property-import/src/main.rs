//! Portfolio importer
//!
//! Reads the buildings and leases CSV files and upserts them into the
//! SQLite store in batches. Buildings are loaded first; the run fails if
//! that stage cannot read its file or every batch fails. The leases stage
//! only fails the run when its file cannot be read.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::builder::TypedValueParser;
use clap::Parser;
use property_store::config::{
    default_database_url, DEFAULT_BATCH_SIZE, DEFAULT_BUILDINGS_CSV, DEFAULT_LEASES_CSV,
};
use property_store::{import_buildings, import_leases, ImportReport, SqliteStore};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for the importer
#[derive(Parser, Debug)]
#[command(name = "property-import")]
#[command(about = "Load building and lease CSV files into the portfolio database")]
struct Args {
    /// SQLite connection URL (defaults to the platform data directory)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Buildings CSV file
    #[arg(long, env = "BUILDINGS_CSV", default_value = DEFAULT_BUILDINGS_CSV)]
    buildings: PathBuf,

    /// Leases CSV file
    #[arg(long, env = "LEASES_CSV", default_value = DEFAULT_LEASES_CSV)]
    leases: PathBuf,

    /// Rows per transaction
    #[arg(
        long,
        env = "IMPORT_BATCH_SIZE",
        default_value_t = DEFAULT_BATCH_SIZE,
        value_parser = clap::value_parser!(u64).range(1..).map(|n| n as usize)
    )]
    batch_size: usize,

    /// Skip the leases stage
    #[arg(long)]
    skip_leases: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let database_url = match args.database_url {
        Some(url) if !url.trim().is_empty() => url,
        Some(_) => bail!("DATABASE_URL is set but empty"),
        None => default_database_url(),
    };
    if !database_url.starts_with("sqlite:") {
        bail!("DATABASE_URL must be a sqlite: URL, got '{}'", database_url);
    }

    let store = SqliteStore::connect(&database_url)
        .await
        .with_context(|| format!("Failed to open database {}", database_url))?;

    let buildings = import_buildings(&store, &args.buildings, args.batch_size)
        .await
        .with_context(|| format!("Failed to import {}", args.buildings.display()))?;
    log_report(&buildings);
    if buildings.failed_outright() {
        bail!(
            "Every batch of {} failed ({} batches)",
            buildings.table,
            buildings.batches
        );
    }

    if args.skip_leases {
        info!("Skipping leases stage");
    } else {
        let leases = import_leases(&store, &args.leases, args.batch_size)
            .await
            .with_context(|| format!("Failed to import {}", args.leases.display()))?;
        log_report(&leases);
        if leases.failed_outright() {
            warn!("Every batch of {} failed", leases.table);
        }
    }

    info!(
        "Import complete: {} buildings, {} leases in database",
        store.count_buildings().await?,
        store.count_leases().await?
    );
    Ok(())
}

fn log_report(report: &ImportReport) {
    info!(
        "{}: read {} rows, skipped {}, wrote {} in {} batches",
        report.table, report.rows_read, report.skipped, report.written, report.batches
    );
    if report.failed_batches > 0 {
        warn!(
            "{}: {} of {} batches failed",
            report.table, report.failed_batches, report.batches
        );
    }
}
