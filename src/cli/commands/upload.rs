//! Upload command implementation
//!
//! This module implements the `upload` command, which reads the input file
//! and upserts one Patient and its Observations per row.

use crate::adapters::csv::TabularReader;
use crate::adapters::fhir::FhirRestClient;
use crate::config::{load_config, FailurePolicy, LabloadConfig};
use crate::core::mapping::RecordMapper;
use crate::core::upload::{UploadOptions, UploadPipeline, UploadSummary};
use crate::domain::LoaderError;
use clap::Args;

/// Exit code when the skip_row policy finished with failed rows
pub const EXIT_ROWS_FAILED: i32 = 1;

/// Arguments for the upload command
#[derive(Args, Debug, Default)]
pub struct UploadArgs {
    /// Override the input file path
    #[arg(short, long)]
    pub input: Option<String>,

    /// Override the FHIR server base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Dry run mode - map rows without writing to the FHIR server
    #[arg(long)]
    pub dry_run: bool,

    /// Skip failing rows instead of aborting the run
    #[arg(long)]
    pub skip_failed_rows: bool,
}

impl UploadArgs {
    /// Applies command-line overrides to a loaded configuration
    pub fn apply_overrides(&self, config: &mut LabloadConfig) {
        if let Some(input) = &self.input {
            tracing::info!(input = %input, "Overriding input path from CLI");
            config.input.path = input.clone();
        }

        if let Some(base_url) = &self.base_url {
            tracing::info!(base_url = %base_url, "Overriding FHIR base URL from CLI");
            config.fhir.base_url = base_url.clone();
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if self.skip_failed_rows {
            tracing::info!("Enabling skip_row failure policy from CLI");
            config.upload.failure_policy = FailurePolicy::SkipRow;
        }
    }

    /// Execute the upload command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting upload command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(e.exit_code());
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        match run_upload(&config).await {
            Ok(summary) => {
                summary.log_summary();
                print_summary(&summary);
                if summary.is_successful() {
                    Ok(0)
                } else {
                    Ok(EXIT_ROWS_FAILED)
                }
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Upload failed");
                eprintln!("Upload failed: {e}");
                Ok(e.exit_code())
            }
        }
    }
}

/// Runs one upload with a validated configuration
///
/// The reader and the HTTP client are created here and dropped when the run
/// ends, whatever its outcome.
///
/// # Errors
///
/// Returns the first error under the abort policy, or any error raised while
/// building the catalog, client or reader.
pub async fn run_upload(config: &LabloadConfig) -> crate::domain::Result<UploadSummary> {
    let catalog = config
        .measurement_catalog()
        .map_err(LoaderError::Configuration)?;
    let client = FhirRestClient::new(&config.fhir)?;
    let mapper = RecordMapper::new(&catalog, config.input.columns.clone());
    let options = UploadOptions {
        dry_run: config.application.dry_run,
        failure_policy: config.upload.failure_policy,
    };

    if options.dry_run {
        println!("🔍 DRY RUN MODE - No records will be sent to the FHIR server");
        println!();
    }

    let reader = TabularReader::open(&config.input.path, &config.input)?;
    let pipeline = UploadPipeline::new(&client, mapper, options);

    println!("🚀 Uploading {} to {}", config.input.path, config.fhir.base_url);
    pipeline.run(reader.rows()).await
}

fn print_summary(summary: &UploadSummary) {
    println!();
    println!("📊 Upload Summary");
    println!("  Rows read: {}", summary.rows_read);
    println!("  Rows uploaded: {}", summary.rows_uploaded);
    println!("  Rows failed: {}", summary.rows_failed);
    println!("  Patients: {}", summary.patients_upserted);
    println!("  Observations: {}", summary.observations_upserted);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());

    if !summary.errors.is_empty() {
        println!();
        println!("⚠️  Skipped rows:");
        for error in &summary.errors {
            match error.line {
                Some(line) => println!("  line {line}: {}", error.message),
                None => println!("  {}", error.message),
            }
        }
    }
}
