//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the labload configuration file.

use crate::config::{load_config, AuthType};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading validates the configuration
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        let catalog = match config.measurement_catalog() {
            Ok(catalog) => catalog,
            Err(e) => {
                println!("❌ Measurement catalog is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Environment: {:?}", config.environment);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Input File: {}", config.input.path);
        println!(
            "  Delimiter: {:?}  Encoding: {}",
            config.input.delimiter, config.input.encoding
        );
        println!("  FHIR Server: {}", config.fhir.base_url);
        let auth = match config.fhir.auth_type {
            AuthType::None => "none",
            AuthType::Basic => "basic",
            AuthType::Bearer => "bearer",
        };
        println!("  Authentication: {auth}");
        println!("  Failure Policy: {}", config.upload.failure_policy);
        println!();
        println!("Measurements ({}):", catalog.len());
        for entry in catalog.entries() {
            println!(
                "  {:<6} column={:<8} id={}<SEQN>  {}|{}  [{}]",
                entry.key,
                entry.column(),
                entry.id_prefix,
                entry.code_system,
                entry.code,
                entry.unit_code
            );
        }
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_missing_file_is_config_error() {
        let args = ValidateArgs {};
        let code = args.execute("missing-labload.toml").await.unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[input]\npath = \"data.csv\"\n\n[fhir]\nbase_url = \"http://localhost:8080/fhir\""
        )
        .unwrap();

        let args = ValidateArgs {};
        let code = args.execute(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(code, 0);
    }
}
