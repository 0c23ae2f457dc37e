//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::LabloadConfig;
use super::secret::secret_string;
use crate::domain::errors::LoaderError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into LabloadConfig
/// 4. Applies environment variable overrides (LABLOAD_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`LoaderError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, the TOML is malformed, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use labload::config::loader::load_config;
///
/// let config = load_config("labload.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<LabloadConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LoaderError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LoaderError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text the same way [`load_config`] parses a file
///
/// # Errors
///
/// See [`load_config`].
pub fn parse_config(contents: &str) -> Result<LabloadConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: LabloadConfig = toml::from_str(&contents)
        .map_err(|e| LoaderError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        LoaderError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched. Every output line ends with `\n`.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_regex();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(LoaderError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        LoaderError::Configuration(format!("Invalid value '{value}' for {name}"))
    })
}

/// Applies environment variable overrides using LABLOAD_* prefix
///
/// Environment variables follow the pattern: LABLOAD_<SECTION>_<KEY>
/// For example: LABLOAD_FHIR_BASE_URL, LABLOAD_INPUT_PATH
fn apply_env_overrides(config: &mut LabloadConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("LABLOAD_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("LABLOAD_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_override("LABLOAD_APPLICATION_DRY_RUN", &val)?;
    }
    if let Ok(val) = std::env::var("LABLOAD_ENVIRONMENT") {
        config.environment = match val.to_lowercase().as_str() {
            "development" => super::schema::Environment::Development,
            "staging" => super::schema::Environment::Staging,
            "production" => super::schema::Environment::Production,
            _ => {
                return Err(LoaderError::Configuration(format!(
                    "Invalid value '{val}' for LABLOAD_ENVIRONMENT"
                )))
            }
        };
    }

    // Input overrides
    if let Ok(val) = std::env::var("LABLOAD_INPUT_PATH") {
        config.input.path = val;
    }
    if let Ok(val) = std::env::var("LABLOAD_INPUT_DELIMITER") {
        config.input.delimiter = val;
    }
    if let Ok(val) = std::env::var("LABLOAD_INPUT_ENCODING") {
        config.input.encoding = val;
    }

    // FHIR overrides
    if let Ok(val) = std::env::var("LABLOAD_FHIR_BASE_URL") {
        config.fhir.base_url = val;
    }
    if let Ok(val) = std::env::var("LABLOAD_FHIR_AUTH_TYPE") {
        config.fhir.auth_type = val.parse().map_err(LoaderError::Configuration)?;
    }
    if let Ok(val) = std::env::var("LABLOAD_FHIR_USERNAME") {
        config.fhir.username = Some(val);
    }
    if let Ok(val) = std::env::var("LABLOAD_FHIR_PASSWORD") {
        config.fhir.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("LABLOAD_FHIR_TOKEN") {
        config.fhir.token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("LABLOAD_FHIR_TIMEOUT_SECONDS") {
        config.fhir.timeout_seconds = parse_override("LABLOAD_FHIR_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("LABLOAD_FHIR_TLS_VERIFY") {
        config.fhir.tls_verify = parse_override("LABLOAD_FHIR_TLS_VERIFY", &val)?;
    }
    if let Ok(val) = std::env::var("LABLOAD_FHIR_LOG_REQUESTS") {
        config.fhir.log_requests = parse_override("LABLOAD_FHIR_LOG_REQUESTS", &val)?;
    }

    // Upload overrides
    if let Ok(val) = std::env::var("LABLOAD_UPLOAD_FAILURE_POLICY") {
        config.upload.failure_policy = val.parse().map_err(LoaderError::Configuration)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("LABLOAD_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("LABLOAD_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("LABLOAD_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("LABLOAD_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
