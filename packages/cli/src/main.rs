#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the disease map toolchain.
//!
//! ```text
//! disease_map serve
//! disease_map import data/Disease_Data.csv
//! disease_map months
//! disease_map trends [--year 2023]
//! disease_map hotspots [--mon 9] [--year 2023]
//! disease_map summary
//! disease_map redzones
//! ```
//!
//! Query commands print the same JSON the HTTP API returns. They read the
//! database named by `DATABASE_URL`, or a CSV export directly with
//! `--csv <path>`.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use disease_map_analytics::{QueryContext, filters, hotspots, months, summary, trends};
use disease_map_database::{
    MemoryRecordStore, RecordStore, SqlRecordStore, db, ensure_schema, import::import_csv,
};
use disease_map_disease_models::RiskThresholds;
use disease_map_prediction::{RiskZoneProvider, ScriptRiskZoneProvider};
use disease_map_server::ServerConfig;
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "disease_map",
    about = "Disease surveillance aggregation and hotspot tools"
)]
struct Cli {
    /// Query a CSV export instead of the configured database
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve,
    /// Load a CSV export into the configured database
    Import {
        /// Path to the CSV file
        path: PathBuf,
    },
    /// List months that have data
    Months,
    /// Monthly case totals
    Trends {
        /// Restrict to one year
        #[arg(long)]
        year: Option<String>,
    },
    /// Geolocated hotspots for one month
    Hotspots {
        /// Calendar month (defaults to the latest month with data)
        #[arg(long)]
        mon: Option<String>,
        /// Restrict to one year
        #[arg(long)]
        year: Option<String>,
    },
    /// Case and death totals
    Summary,
    /// Run the outbreak prediction program and print its risk zones
    Redzones,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();
    let config = ServerConfig::from_env();

    match cli.command {
        Commands::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(disease_map_server::run_server(config))
            })
            .await??;
        }
        Commands::Import { path } => {
            let database = db::connect(&config.database_url).await?;
            let file = File::open(&path)?;
            let stats = import_csv(database.as_ref(), file).await?;

            println!(
                "Imported {} of {} rows from {}",
                stats.rows_inserted,
                stats.rows_read,
                path.display()
            );
            if stats.invalid_months > 0 {
                println!(
                    "{} rows had a month outside 1-12 and were stored without one",
                    stats.invalid_months
                );
            }
        }
        Commands::Months => {
            let store = open_store(cli.csv.as_deref(), &config).await?;
            let ctx = QueryContext::with_optional_timeout(config.query_timeout);
            print_json(&months::list_months(store.as_ref(), &ctx).await?)?;
        }
        Commands::Trends { year } => {
            let year = filters::parse_year_filter(year.as_deref())?;
            let store = open_store(cli.csv.as_deref(), &config).await?;
            let ctx = QueryContext::with_optional_timeout(config.query_timeout);
            print_json(&trends::monthly_totals(store.as_ref(), &ctx, year).await?)?;
        }
        Commands::Hotspots { mon, year } => {
            let month = filters::parse_month_filter(mon.as_deref());
            let year = filters::parse_year_filter(year.as_deref())?;
            let thresholds = load_thresholds(&config)?;
            let store = open_store(cli.csv.as_deref(), &config).await?;
            let ctx = QueryContext::with_optional_timeout(config.query_timeout);
            let result =
                hotspots::hotspots(store.as_ref(), &ctx, &thresholds, month, year).await?;
            print_json(&result)?;
        }
        Commands::Summary => {
            let store = open_store(cli.csv.as_deref(), &config).await?;
            let ctx = QueryContext::with_optional_timeout(config.query_timeout);
            print_json(&summary::summary(store.as_ref(), &ctx).await?)?;
        }
        Commands::Redzones => {
            let provider = ScriptRiskZoneProvider::new(
                config.redzone_program.clone(),
                config.redzone_args.clone(),
            );
            print_json(&provider.risk_zones().await?)?;
        }
    }

    Ok(())
}

async fn open_store(
    csv: Option<&Path>,
    config: &ServerConfig,
) -> Result<Arc<dyn RecordStore>, Box<dyn std::error::Error>> {
    if let Some(path) = csv {
        log::info!("Loading records from {}", path.display());
        let store = MemoryRecordStore::from_csv_reader(File::open(path)?)?;
        log::info!("Loaded {} records", store.len());
        return Ok(Arc::new(store));
    }

    let database = db::connect(&config.database_url).await?;
    ensure_schema(database.as_ref()).await?;
    Ok(Arc::new(SqlRecordStore::new(Arc::from(database))))
}

fn load_thresholds(config: &ServerConfig) -> Result<RiskThresholds, Box<dyn std::error::Error>> {
    Ok(match &config.risk_thresholds_path {
        Some(path) => RiskThresholds::load(path)?,
        None => RiskThresholds::default(),
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
