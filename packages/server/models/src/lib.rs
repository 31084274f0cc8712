#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the disease map server.
//!
//! Query payloads themselves are the engine's result types; this crate
//! holds only what is specific to the HTTP surface.

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters for the hotspots endpoint.
///
/// Kept as raw strings so that blank or malformed values can be handled
/// by the engine's filter rules instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotspotQueryParams {
    /// Calendar month; blank, `0`, or non-numeric selects the latest month.
    pub mon: Option<String>,
    /// Year; blank or `0` means all years.
    pub year: Option<String>,
}

/// Query parameters for the trends endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendQueryParams {
    /// Year; blank or `0` means all years.
    pub year: Option<String>,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable machine-readable code (`invalid_filter`, `store_unavailable`,
    /// `internal_error`).
    pub error: String,
    /// Human-readable detail, when safe to expose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    /// Creates an error body with only a code.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    /// Attaches a detail message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
