//! Configuration schema types
//!
//! This module defines the configuration structure for labload.

use crate::config::SecretString;
use crate::core::catalog::{CatalogEntry, MeasurementCatalog};
use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// What the upload pipeline does when a row fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the run at the first failing row
    #[default]
    Abort,
    /// Log the failing row, record it in the summary and continue
    SkipRow,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Abort => f.write_str("abort"),
            FailurePolicy::SkipRow => f.write_str("skip_row"),
        }
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip_row" | "skip-row" => Ok(FailurePolicy::SkipRow),
            _ => Err(format!(
                "Invalid failure_policy '{s}'. Must be one of: abort, skip_row"
            )),
        }
    }
}

/// FHIR server authentication scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// No Authorization header
    #[default]
    None,
    /// HTTP Basic with username and password
    Basic,
    /// Bearer token
    Bearer,
}

impl std::str::FromStr for AuthType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(AuthType::None),
            "basic" => Ok(AuthType::Basic),
            "bearer" => Ok(AuthType::Bearer),
            _ => Err(format!(
                "Invalid auth_type '{s}'. Must be one of: none, basic, bearer"
            )),
        }
    }
}

/// Main labload configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabloadConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Input file settings
    pub input: InputConfig,

    /// FHIR server settings
    pub fhir: FhirConfig,

    /// Upload pipeline settings
    #[serde(default)]
    pub upload: UploadConfig,

    /// Measurement catalog override
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LabloadConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.input.validate()?;
        self.fhir.validate(&self.environment)?;
        self.catalog.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// The measurement catalog this configuration selects
    pub fn measurement_catalog(&self) -> Result<MeasurementCatalog, String> {
        MeasurementCatalog::from_entries(self.catalog.measurements.as_deref())
    }
}

impl Default for LabloadConfig {
    fn default() -> Self {
        Self {
            application: ApplicationConfig::default(),
            environment: Environment::default(),
            input: InputConfig::default(),
            fhir: FhirConfig::default(),
            upload: UploadConfig::default(),
            catalog: CatalogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (map rows but don't write to the FHIR server)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Input file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the delimited input file
    #[serde(default = "default_input_path")]
    pub path: String,

    /// Field delimiter, a single ASCII character
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Character encoding label (WHATWG), e.g. "utf-8" or "windows-1252"
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Whether the first line holds column names
    #[serde(default = "default_true")]
    pub has_headers: bool,

    /// Column names of the subject fields
    #[serde(default)]
    pub columns: ColumnsConfig,
}

impl InputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("input.path cannot be empty".to_string());
        }

        self.delimiter_byte()?;

        if encoding_rs::Encoding::for_label(self.encoding.as_bytes()).is_none() {
            return Err(format!(
                "Invalid input.encoding '{}'. Must be a WHATWG encoding label such as utf-8 or windows-1252",
                self.encoding
            ));
        }

        self.columns.validate()
    }

    /// The delimiter as the byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8, String> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ if self.delimiter == "\\t" => Ok(b'\t'),
            _ => Err(format!(
                "input.delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            delimiter: default_delimiter(),
            encoding: default_encoding(),
            has_headers: true,
            columns: ColumnsConfig::default(),
        }
    }
}

/// Column names of the fields every row must carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub sequence_number: String,
    pub timestamp: String,
    pub patient_id: String,
    pub family_name: String,
    pub given_name: String,
    pub gender: String,
}

impl ColumnsConfig {
    fn validate(&self) -> Result<(), String> {
        let columns = [
            ("sequence_number", &self.sequence_number),
            ("timestamp", &self.timestamp),
            ("patient_id", &self.patient_id),
            ("family_name", &self.family_name),
            ("given_name", &self.given_name),
            ("gender", &self.gender),
        ];
        for (field, value) in columns {
            if value.trim().is_empty() {
                return Err(format!("input.columns.{field} cannot be empty"));
            }
        }
        Ok(())
    }
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            sequence_number: "SEQN".to_string(),
            timestamp: "TIMESTAMP".to_string(),
            patient_id: "PATIENT_ID".to_string(),
            family_name: "PATIENT_FAMILYNAME".to_string(),
            given_name: "PATIENT_GIVENNAME".to_string(),
            gender: "PATIENT_GENDER".to_string(),
        }
    }
}

/// FHIR server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhirConfig {
    /// Base URL of the FHIR server, e.g. `http://localhost:8080/fhir`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Authentication type
    #[serde(default)]
    pub auth_type: AuthType,

    /// Username for basic authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Bearer token
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// Disabling verification is rejected in production environments.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Log every request and response status at info level
    #[serde(default)]
    pub log_requests: bool,
}

impl FhirConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("fhir.base_url cannot be empty".to_string());
        }

        let url = url::Url::parse(&self.base_url)
            .map_err(|e| format!("fhir.base_url is not a valid URL: {e}"))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err("fhir.base_url must start with http:// or https://".to_string());
        }

        match self.auth_type {
            AuthType::None => {}
            AuthType::Basic => {
                if self.username.as_ref().map(|s| s.is_empty()).unwrap_or(true) {
                    return Err(
                        "fhir.username cannot be empty when auth_type is 'basic'".to_string()
                    );
                }
                if self
                    .password
                    .as_ref()
                    .map(|s| s.expose_secret().is_empty())
                    .unwrap_or(true)
                {
                    return Err(
                        "fhir.password cannot be empty when auth_type is 'basic'".to_string()
                    );
                }
            }
            AuthType::Bearer => {
                if self
                    .token
                    .as_ref()
                    .map(|s| s.expose_secret().is_empty())
                    .unwrap_or(true)
                {
                    return Err(
                        "fhir.token cannot be empty when auth_type is 'bearer'".to_string()
                    );
                }
            }
        }

        if self.timeout_seconds == 0 {
            return Err("fhir.timeout_seconds must be > 0".to_string());
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                Set 'tls_verify = true', or use environment = \"development\" for local servers."
                    .to_string(),
            );
        }

        Ok(())
    }
}

impl Default for FhirConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_type: AuthType::None,
            username: None,
            password: None,
            token: None,
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
            log_requests: false,
        }
    }
}

/// Upload pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Behavior on a failing row (abort or skip_row)
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// Measurement catalog override
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Replaces the built-in RBC/WBC/HB entries when present
    #[serde(default)]
    pub measurements: Option<Vec<CatalogEntry>>,
}

impl CatalogConfig {
    fn validate(&self) -> Result<(), String> {
        MeasurementCatalog::from_entries(self.measurements.as_deref()).map(|_| ())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_input_path() -> String {
    "sample-data.csv".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080/fhir".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
