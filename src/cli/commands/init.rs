//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "labload.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing labload configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Put credentials in a .env file, e.g. LABLOAD_FHIR_TOKEN");
                println!("  3. Validate configuration: labload validate-config");
                println!("  4. Check the server: labload check");
                println!("  5. Try a dry run: labload upload --dry-run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# labload configuration
# Lab results CSV to FHIR loader

[application]
log_level = "info"
dry_run = false

[input]
path = "sample-data.csv"

[fhir]
base_url = "http://localhost:8080/fhir"

[upload]
failure_policy = "abort"
"#
        .to_string()
    }

    /// Generate configuration with every option documented
    fn generate_config_with_examples() -> String {
        r#"# labload configuration
# Lab results CSV to FHIR loader
#
# Values of the form ${VAR_NAME} are replaced with environment variables.
# Any setting can also be overridden with LABLOAD_<SECTION>_<KEY>,
# e.g. LABLOAD_FHIR_BASE_URL or LABLOAD_INPUT_PATH.

# development, staging or production
# TLS verification cannot be disabled in production
environment = "development"

[application]
# trace, debug, info, warn, error
log_level = "info"
# Map rows without sending anything to the server
dry_run = false

[input]
path = "sample-data.csv"
# Single character; "\\t" for tab
delimiter = ","
# WHATWG encoding label, e.g. utf-8, windows-1252, iso-8859-1
encoding = "utf-8"
# Without headers, columns are named "1", "2", ...
has_headers = true

[input.columns]
sequence_number = "SEQN"
timestamp = "TIMESTAMP"
patient_id = "PATIENT_ID"
family_name = "PATIENT_FAMILYNAME"
given_name = "PATIENT_GIVENNAME"
gender = "PATIENT_GENDER"

[fhir]
base_url = "http://localhost:8080/fhir"
# none, basic or bearer
auth_type = "none"
# username = "loader"
# password = "${LABLOAD_FHIR_PASSWORD}"
# token = "${LABLOAD_FHIR_TOKEN}"
timeout_seconds = 60
tls_verify = true
# Log every request at info level instead of debug
log_requests = false

[upload]
# abort: stop at the first failing row
# skip_row: record the failure and continue
failure_policy = "abort"

# Replaces the built-in RBC/WBC/HB measurements when present.
# code_system and unit_system default to LOINC and UCUM.
#
# [[catalog.measurements]]
# key = "PLT"
# column = "PLT"
# id_prefix = "plt-"
# code = "777-3"
# display = "Platelets [#/volume] in Blood by Automated count"
# unit_code = "10*3/uL"

[logging]
local_enabled = false
local_path = "logs"
# daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}
