//! Configuration management for labload.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! labload uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `LABLOAD_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use labload::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("labload.toml")?;
//!
//! println!("Input file: {}", config.input.path);
//! println!("FHIR server: {}", config.fhir.base_url);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run flag
//! - [`InputConfig`] - Input path, delimiter, encoding and column names
//! - [`FhirConfig`] - FHIR server URL, authentication and timeouts
//! - [`UploadConfig`] - Failure policy
//! - [`CatalogConfig`] - Optional replacement for the built-in measurement catalog
//! - [`LoggingConfig`] - Local log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [input]
//! path = "sample-data.csv"
//!
//! [fhir]
//! base_url = "http://localhost:8080/fhir"
//! auth_type = "bearer"
//! token = "${LABLOAD_FHIR_TOKEN}"
//!
//! [upload]
//! failure_policy = "abort"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, AuthType, CatalogConfig, ColumnsConfig, Environment, FailurePolicy,
    FhirConfig, InputConfig, LabloadConfig, LoggingConfig, UploadConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
