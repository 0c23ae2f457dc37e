//! Check command implementation
//!
//! Verifies that the configured FHIR server is reachable and answers its
//! capability statement.

use crate::adapters::fhir::FhirRestClient;
use crate::config::load_config;
use clap::Args;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Override the FHIR server base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

impl CheckArgs {
    /// Execute the check command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{e}");
                return Ok(e.exit_code());
            }
        };

        if let Some(base_url) = &self.base_url {
            config.fhir.base_url = base_url.clone();
        }

        let client = match FhirRestClient::new(&config.fhir) {
            Ok(client) => client,
            Err(e) => {
                eprintln!("{e}");
                return Ok(e.exit_code());
            }
        };

        println!("🔌 Checking FHIR server: {}", client.base_url());

        match client.check_connection().await {
            Ok(version) => {
                tracing::info!(fhir_version = ?version, "FHIR server reachable");
                println!("✅ FHIR server is reachable");
                if let Some(version) = version {
                    println!("   FHIR version: {version}");
                }
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "FHIR server check failed");
                println!("❌ FHIR server check failed");
                println!("   Error: {e}");
                Ok(e.exit_code())
            }
        }
    }
}
