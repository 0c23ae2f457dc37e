//! Upload summary and reporting
//!
//! This module defines structures for tracking and reporting upload results.

use crate::domain::{InputError, LoaderError, ResourceType};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Summary of an upload run
#[derive(Debug, Clone)]
pub struct UploadSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Rows taken from the input, including failed ones
    pub rows_read: usize,

    /// Rows whose records were all upserted (or mapped, in dry-run mode)
    pub rows_uploaded: usize,

    /// Rows that failed and were skipped
    pub rows_failed: usize,

    /// Patient records upserted
    pub patients_upserted: usize,

    /// Observation records upserted
    pub observations_upserted: usize,

    /// Whether records were only mapped, not sent
    pub dry_run: bool,

    /// Duration of the run
    pub duration: Duration,

    /// Errors of the skipped rows, in file order
    pub errors: Vec<RowError>,
}

impl UploadSummary {
    /// Create a new empty upload summary
    pub fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            rows_read: 0,
            rows_uploaded: 0,
            rows_failed: 0,
            patients_upserted: 0,
            observations_upserted: 0,
            dry_run,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Count one upserted record
    pub fn record_upserted(&mut self, resource_type: ResourceType) {
        match resource_type {
            ResourceType::Patient => self.patients_upserted += 1,
            ResourceType::Observation => self.observations_upserted += 1,
        }
    }

    /// Count a skipped row
    pub fn add_error(&mut self, error: RowError) {
        self.rows_failed += 1;
        self.errors.push(error);
    }

    /// Total records upserted across resource types
    pub fn records_upserted(&self) -> usize {
        self.patients_upserted + self.observations_upserted
    }

    /// Check if the upload was successful (no failed rows)
    pub fn is_successful(&self) -> bool {
        self.rows_failed == 0 && self.errors.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            started_at = %self.started_at.to_rfc3339(),
            rows_read = self.rows_read,
            rows_uploaded = self.rows_uploaded,
            rows_failed = self.rows_failed,
            patients = self.patients_upserted,
            observations = self.observations_upserted,
            dry_run = self.dry_run,
            duration_ms = self.duration.as_millis() as u64,
            "Upload completed"
        );

        if self.dry_run {
            tracing::info!("Dry run: no records were sent to the FHIR server");
        }

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Upload completed with skipped rows"
            );
            for error in &self.errors {
                tracing::warn!(
                    line = ?error.line,
                    kind = ?error.kind,
                    message = %error.message,
                    "Skipped row"
                );
            }
        }
    }
}

/// Stage a row failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowErrorKind {
    /// The reader could not tokenize the line
    Read,
    /// A column was missing or a value could not be parsed
    Mapping,
    /// The FHIR server rejected a record or could not be reached
    Upload,
    /// Anything else
    Other,
}

impl RowErrorKind {
    /// Classifies a row failure
    pub fn of(error: &LoaderError) -> Self {
        match error {
            LoaderError::Input(InputError::MalformedRow { .. })
            | LoaderError::Input(InputError::OpenFailed { .. })
            | LoaderError::Input(InputError::UnsupportedEncoding(_)) => RowErrorKind::Read,
            LoaderError::Input(_) => RowErrorKind::Mapping,
            LoaderError::Fhir(_) => RowErrorKind::Upload,
            _ => RowErrorKind::Other,
        }
    }
}

/// Failure of one row
#[derive(Debug, Clone)]
pub struct RowError {
    /// Input line, when known
    pub line: Option<u64>,

    pub kind: RowErrorKind,

    pub message: String,
}

impl RowError {
    pub fn new(line: Option<u64>, error: &LoaderError) -> Self {
        Self {
            line,
            kind: RowErrorKind::of(error),
            message: error.to_string(),
        }
    }
}
