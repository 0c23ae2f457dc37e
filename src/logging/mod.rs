//! Logging
//!
//! Structured logging through `tracing`:
//! - console output with a configurable level (`RUST_LOG` overrides it)
//! - optional JSON log files with daily, hourly or no rotation
//!
//! # Example
//!
//! ```no_run
//! use labload::logging::init_logging;
//! use labload::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(rows = 3, "Upload started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use labload::log_error_with_context;
/// use labload::domain::LoaderError;
///
/// let error = LoaderError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
