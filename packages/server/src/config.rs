//! Server configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use disease_map_database::db::DEFAULT_DATABASE_URL;
use disease_map_prediction::{DEFAULT_ARGS, DEFAULT_PROGRAM};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STATIC_DIR: &str = "public";

/// Runtime settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `sqlite://path` or a Postgres URL.
    pub database_url: String,
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Per-query deadline; `None` disables it.
    pub query_timeout: Option<Duration>,
    /// Optional TOML file overriding the default risk thresholds.
    pub risk_thresholds_path: Option<PathBuf>,
    /// Program that computes risk zones.
    pub redzone_program: String,
    /// Arguments for [`Self::redzone_program`].
    pub redzone_args: Vec<String>,
    /// Directory served at `/`, where the prediction program writes maps.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            query_timeout: Some(Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS)),
            risk_thresholds_path: None,
            redzone_program: DEFAULT_PROGRAM.to_string(),
            redzone_args: DEFAULT_ARGS.iter().map(ToString::to_string).collect(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Unset or blank variables
    /// keep their defaults; unparseable ones are logged and ignored.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = var("PORT").map_or(defaults.port, |raw| {
            raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT '{raw}', using {DEFAULT_PORT}");
                DEFAULT_PORT
            })
        });

        let query_timeout = var("QUERY_TIMEOUT_SECS").map_or(defaults.query_timeout, |raw| {
            match raw.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    log::warn!(
                        "Ignoring invalid QUERY_TIMEOUT_SECS '{raw}', using {DEFAULT_QUERY_TIMEOUT_SECS}"
                    );
                    defaults.query_timeout
                }
            }
        });

        Self {
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            query_timeout,
            risk_thresholds_path: var("RISK_THRESHOLDS_PATH").map(PathBuf::from),
            redzone_program: var("REDZONE_PROGRAM").unwrap_or(defaults.redzone_program),
            redzone_args: var("REDZONE_ARGS").map_or(defaults.redzone_args, |raw| {
                raw.split_whitespace().map(str::to_owned).collect()
            }),
            static_dir: var("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
        }
    }
}
