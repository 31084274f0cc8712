#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the disease map dashboard.
//!
//! Serves the month catalog, hotspot, trend, and summary queries from the
//! aggregation engine under `/api/disease`, the outbreak risk-zone table
//! from the external prediction program, and the static directory the
//! prediction program writes its map pages into.

pub mod config;
mod handlers;

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use disease_map_analytics::QueryContext;
use disease_map_database::{RecordStore, SqlRecordStore, db, ensure_schema};
use disease_map_disease_models::RiskThresholds;
use disease_map_prediction::{RiskZoneProvider, ScriptRiskZoneProvider};

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Backing record store for all engine queries.
    pub store: Arc<dyn RecordStore>,
    /// Case-count bands used to tag hotspots.
    pub thresholds: RiskThresholds,
    /// Deadline applied to each request's store queries.
    pub query_timeout: Option<Duration>,
    /// Source of the outbreak risk-zone table.
    pub risk_zones: Arc<dyn RiskZoneProvider>,
}

impl AppState {
    /// Builds a fresh per-request query context.
    #[must_use]
    pub fn query_context(&self) -> QueryContext {
        QueryContext::with_optional_timeout(self.query_timeout)
    }
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/disease/months", web::get().to(handlers::months))
            .route("/disease/hotspots", web::get().to(handlers::hotspots))
            .route("/disease/trends", web::get().to(handlers::trends))
            .route("/disease/summary", web::get().to(handlers::summary))
            .route("/disease/redzones", web::get().to(handlers::redzones)),
    );
}

/// Connects to the record store and loads thresholds per `config`.
///
/// # Errors
///
/// Returns an `std::io::Error` if the database cannot be opened, its schema
/// cannot be created, or the thresholds file is invalid.
pub async fn build_state(config: &ServerConfig) -> std::io::Result<AppState> {
    log::info!("Connecting to database...");
    let database = db::connect(&config.database_url)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    log::info!("Ensuring schema...");
    ensure_schema(database.as_ref())
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let thresholds = match &config.risk_thresholds_path {
        Some(path) => {
            log::info!("Loading risk thresholds from {}", path.display());
            RiskThresholds::load(path).map_err(|e| std::io::Error::other(e.to_string()))?
        }
        None => RiskThresholds::default(),
    };

    Ok(AppState {
        store: Arc::new(SqlRecordStore::new(Arc::from(database))),
        thresholds,
        query_timeout: config.query_timeout,
        risk_zones: Arc::new(ScriptRiskZoneProvider::new(
            config.redzone_program.clone(),
            config.redzone_args.clone(),
        )),
    })
}

/// Starts the disease map API server.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if startup fails, the HTTP server
/// fails to bind, or it encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(build_state(&config).await?);
    let static_dir = config.static_dir.clone();

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Map pages written by the prediction program
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
