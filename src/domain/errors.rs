//! Domain error types
//!
//! This module defines the error hierarchy for labload. The top-level
//! [`LoaderError`] wraps input-side and server-side failures; none of the
//! variants expose third-party types.

use thiserror::Error;

/// Main labload error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input file and row errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// FHIR server errors
    #[error("FHIR error: {0}")]
    Fhir(#[from] FhirError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl LoaderError {
    /// Process exit code for this error
    ///
    /// - 2: configuration error
    /// - 3: input error (file, row, column or value)
    /// - 4: upload failure
    /// - 5: anything else
    pub fn exit_code(&self) -> i32 {
        match self {
            LoaderError::Configuration(_) => 2,
            LoaderError::Input(_) => 3,
            LoaderError::Fhir(_) => 4,
            _ => 5,
        }
    }
}

/// Errors raised while reading the input file or mapping one of its rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The input file could not be opened or read
    #[error("Failed to open input file {path}: {message}")]
    OpenFailed { path: String, message: String },

    /// The configured encoding label is not known
    #[error("Unsupported input encoding: {0}")]
    UnsupportedEncoding(String),

    /// The tabular reader could not tokenize a line
    #[error("Malformed row at line {line}: {message}")]
    MalformedRow { line: u64, message: String },

    /// A required column is absent from a row
    #[error("Missing column '{column}' at line {line}")]
    MissingColumn { line: u64, column: String },

    /// An identifier column holds an unusable value
    #[error("Invalid identifier in column '{column}' at line {line}: {message}")]
    InvalidIdentifier {
        line: u64,
        column: String,
        message: String,
    },

    /// A tracked measurement is not a valid decimal
    #[error("Unparseable measurement in column '{column}' at line {line}: '{value}'")]
    UnparseableMeasurement {
        line: u64,
        column: String,
        value: String,
    },
}

impl InputError {
    /// Line number the error refers to, if it is tied to a row
    pub fn line(&self) -> Option<u64> {
        match self {
            InputError::MalformedRow { line, .. }
            | InputError::MissingColumn { line, .. }
            | InputError::InvalidIdentifier { line, .. }
            | InputError::UnparseableMeasurement { line, .. } => Some(*line),
            InputError::OpenFailed { .. } | InputError::UnsupportedEncoding(_) => None,
        }
    }
}

/// FHIR server errors
///
/// Errors that occur when talking to the FHIR REST endpoint.
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FhirError {
    /// Failed to connect to the FHIR server
    #[error("Failed to connect to FHIR server: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Server rejected the credentials (401/403)
    #[error("Authentication failed: {status} - {message}")]
    AuthenticationFailed { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Unexpected response
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl FhirError {
    /// Builds the error for a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => FhirError::AuthenticationFailed { status, message },
            400..=499 => FhirError::ClientError { status, message },
            500..=599 => FhirError::ServerError { status, message },
            _ => FhirError::InvalidResponse(format!("unexpected status {status}: {message}")),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LoaderError {
    fn from(err: serde_json::Error) -> Self {
        LoaderError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for LoaderError {
    fn from(err: toml::de::Error) -> Self {
        LoaderError::Configuration(format!("TOML parse error: {err}"))
    }
}
