#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record store for disease incident data.
//!
//! The aggregation engine only ever reads records through the
//! [`RecordStore`] trait. Two backends implement it:
//!
//! - [`SqlRecordStore`]: `switchy_database` over Postgres or `SQLite`,
//!   pushing filters and aggregates down into SQL via `query_raw_params()`.
//! - [`MemoryRecordStore`]: an immutable `Vec` of records, used for
//!   fixtures, CSV-only runs, and tests.
//!
//! Schema creation and CSV import live here too since they are the only
//! writers of the `disease_data` table.

pub mod db;
pub mod import;
pub mod memory;
pub mod queries;
pub mod store;

use switchy_database::Database;
use thiserror::Error;

pub use memory::MemoryRecordStore;
pub use store::{MonthGroup, RecordFilter, RecordStore, RecordTotals, SqlRecordStore};

/// Errors that can occur while reading or writing the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// Could not open a connection to the configured database.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of what went wrong.
        message: String,
    },

    /// A row could not be converted into the expected shape.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// I/O error while reading an import file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Creates the `disease_data` table and its indexes if they don't exist.
///
/// The DDL sticks to types both Postgres and `SQLite` accept.
///
/// # Errors
///
/// Returns [`StoreError`] if any statement fails.
pub async fn ensure_schema(db: &dyn Database) -> Result<(), StoreError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS disease_data (
            state_ut          TEXT NOT NULL DEFAULT '',
            district          TEXT NOT NULL DEFAULT '',
            disease           TEXT NOT NULL DEFAULT '',
            cases             BIGINT,
            deaths            BIGINT,
            day               INTEGER,
            mon               INTEGER,
            year              INTEGER,
            latitude          DOUBLE PRECISION,
            longitude         DOUBLE PRECISION,
            week_of_outbreak  TEXT
        )",
    )
    .await?;

    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_disease_data_mon ON disease_data (mon)")
        .await?;
    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_disease_data_year ON disease_data (year)")
        .await?;
    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_disease_data_location
         ON disease_data (state_ut, district)",
    )
    .await?;

    log::debug!("disease_data schema ready");
    Ok(())
}
