//! # labload - lab results CSV to FHIR loader
//!
//! labload reads lab-result rows from a delimited file and upserts them into a
//! FHIR R4 server: one Patient per row plus one Observation per tracked
//! measurement (RBC, WBC and HB by default).
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Measurement catalog, record mapping and the upload pipeline
//! - [`adapters`] - Input file reader and FHIR REST client
//! - [`domain`] - FHIR resources, identifiers and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Identities and idempotency
//!
//! Every record is written with `PUT` at an id derived from the row:
//! `Patient/{PATIENT_ID}` for the subject and `{prefix}{SEQN}` (e.g. `rbc-1`)
//! for each measurement. Re-running a file therefore replaces the same
//! resources instead of creating duplicates.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use labload::cli::commands::upload::run_upload;
//! use labload::config::load_config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("labload.toml")?;
//!     let summary = run_upload(&config).await?;
//!
//!     println!(
//!         "Uploaded {} rows ({} records)",
//!         summary.rows_uploaded,
//!         summary.records_upserted()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Errors are [`domain::LoaderError`] values; [`domain::LoaderError::exit_code`]
//! maps them to the process exit status.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
