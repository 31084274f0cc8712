//! Database connection utilities.

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::{Credentials, init_sqlite_rusqlite};

use crate::StoreError;

/// Used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/disease.db";

/// Opens a connection to the given URL.
///
/// `sqlite://<path>` opens (or creates) a `SQLite` file; anything else is
/// treated as a Postgres URL. Postgres connections get a 120-second
/// `statement_timeout` so a stalled query fails instead of hanging.
///
/// # Errors
///
/// Returns [`StoreError`] if the URL cannot be parsed or the connection
/// fails.
pub async fn connect(url: &str) -> Result<Box<dyn Database>, StoreError> {
    if let Some(path) = url.strip_prefix("sqlite://") {
        let path = Path::new(path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        log::info!("Opening SQLite database at {}", path.display());
        return init_sqlite_rusqlite(Some(path)).map_err(|e| StoreError::Connection {
            message: e.to_string(),
        });
    }

    // Strip query parameters (e.g. ?sslmode=require) that the Credentials
    // parser doesn't understand; TLS is negotiated by the connector.
    let url_base = url.split('?').next().unwrap_or(url);

    let creds = Credentials::from_url(url_base).map_err(|e| StoreError::Connection {
        message: e.to_string(),
    })?;

    log::info!("Connecting to Postgres...");
    let db = switchy_database_connection::init_postgres_raw_native_tls(creds)
        .await
        .map_err(|e| StoreError::Connection {
            message: e.to_string(),
        })?;

    db.exec_raw("SET statement_timeout = '120s'").await?;

    Ok(db)
}
