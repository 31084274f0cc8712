#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Disease surveillance aggregation and hotspot engine.
//!
//! Four independent, read-only queries over a [`RecordStore`]:
//!
//! - [`months::list_months`]: distinct months with data and the latest one.
//! - [`trends::monthly_totals`]: zero-filled 12-slot monthly case series.
//! - [`hotspots::hotspots`]: geolocated points for one month with risk tiers.
//! - [`summary::summary`]: totals, year range, and available months.
//!
//! Every query takes a [`QueryContext`] so the caller can bound it with a
//! deadline or cancel it. Store failures are returned as
//! [`AnalyticsError::StoreUnavailable`]; the engine never substitutes
//! fallback data.
//!
//! [`RecordStore`]: disease_map_database::RecordStore

pub mod context;
pub mod filters;
pub mod hotspots;
pub mod months;
pub mod summary;
pub mod trends;

#[cfg(test)]
mod test_support;

use disease_map_database::StoreError;
use thiserror::Error;

pub use context::{CancelHandle, QueryContext};

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The record query could not complete (connectivity, timeout, or a
    /// row that could not be decoded).
    #[error("Record store unavailable: {message}")]
    StoreUnavailable {
        /// Description of what went wrong.
        message: String,
    },

    /// The caller cancelled the query before it finished.
    #[error("Query cancelled")]
    Cancelled,

    /// A caller-supplied filter could not be parsed.
    #[error("Invalid filter: {message}")]
    InvalidFilter {
        /// Description of what went wrong.
        message: String,
    },
}

impl From<StoreError> for AnalyticsError {
    fn from(e: StoreError) -> Self {
        Self::StoreUnavailable {
            message: e.to_string(),
        }
    }
}
