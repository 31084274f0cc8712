#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Outbreak risk zones.
//!
//! The scoring model is an external program (by default `python3 test.py`)
//! that reads the same data store, writes a map page, and prints a
//! [`RiskZoneReport`] as JSON on stdout. This crate only launches it and
//! decodes what it prints.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;

pub use disease_map_prediction_models::{RiskBand, RiskZone, RiskZoneReport};

/// Default program used to compute risk zones.
pub const DEFAULT_PROGRAM: &str = "python3";

/// Default arguments passed to [`DEFAULT_PROGRAM`].
pub const DEFAULT_ARGS: &[&str] = &["test.py"];

/// Errors that can occur while producing a risk-zone report.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// The program could not be started or its output could not be read.
    #[error("Failed to run risk-zone program: {0}")]
    Spawn(#[from] std::io::Error),

    /// The program's output was not a valid report.
    #[error("Invalid risk-zone report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source of outbreak risk zones.
#[async_trait]
pub trait RiskZoneProvider: Send + Sync {
    /// Computes the current risk-zone report.
    ///
    /// # Errors
    ///
    /// * [`PredictionError::Spawn`] if the underlying computation could not run
    async fn risk_zones(&self) -> Result<RiskZoneReport, PredictionError>;
}

/// Runs an external program and decodes its stdout.
#[derive(Debug, Clone)]
pub struct ScriptRiskZoneProvider {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ScriptRiskZoneProvider {
    /// Creates a provider that runs `program` with `args`.
    #[must_use]
    pub const fn new(program: String, args: Vec<String>) -> Self {
        Self {
            program,
            args,
            working_dir: None,
        }
    }

    /// Runs the program from `dir` instead of the current directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl Default for ScriptRiskZoneProvider {
    fn default() -> Self {
        Self::new(
            DEFAULT_PROGRAM.to_string(),
            DEFAULT_ARGS.iter().map(ToString::to_string).collect(),
        )
    }
}

#[async_trait]
impl RiskZoneProvider for ScriptRiskZoneProvider {
    async fn risk_zones(&self) -> Result<RiskZoneReport, PredictionError> {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        log::debug!("Running risk-zone program: {} {:?}", self.program, self.args);
        let output = command.output().await?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            log::warn!("Risk-zone program stderr: {}", stderr.trim());
        }
        if !output.status.success() {
            log::warn!("Risk-zone program exited with {}", output.status);
        }

        Ok(parse_report_lenient(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }
}

/// Decodes a report strictly.
///
/// # Errors
///
/// * [`PredictionError::Json`] if `stdout` is not a report document
pub fn parse_report(stdout: &str) -> Result<RiskZoneReport, PredictionError> {
    Ok(serde_json::from_str(stdout.trim())?)
}

/// Decodes a report, treating empty or malformed output as an empty report.
#[must_use]
pub fn parse_report_lenient(stdout: &str) -> RiskZoneReport {
    let trimmed = stdout.trim();
    if !trimmed.starts_with('{') {
        if !trimmed.is_empty() {
            log::warn!("Risk-zone program printed non-JSON output; returning no zones");
        }
        return RiskZoneReport::default();
    }

    parse_report(trimmed).unwrap_or_else(|e| {
        log::warn!("{e}; returning no zones");
        RiskZoneReport::default()
    })
}
