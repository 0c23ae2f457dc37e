//! Core business logic for labload.
//!
//! # Modules
//!
//! - [`catalog`] - Coded-measurement catalog (LOINC codes and UCUM units)
//! - [`mapping`] - Row to Patient/Observation mapping
//! - [`upload`] - Sequential upload pipeline and summary
//!
//! # Upload Workflow
//!
//! 1. **Read**: the tabular reader yields rows in file order
//! 2. **Map**: each row becomes one Patient plus one Observation per catalog entry
//! 3. **Upsert**: records are sent one at a time, Patient first
//! 4. **Report**: the run ends with an upload summary
//!
//! # Example
//!
//! ```rust,no_run
//! use labload::adapters::csv::TabularReader;
//! use labload::adapters::fhir::FhirRestClient;
//! use labload::config::load_config;
//! use labload::core::mapping::RecordMapper;
//! use labload::core::upload::{UploadOptions, UploadPipeline};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("labload.toml")?;
//! let catalog = config.measurement_catalog()?;
//!
//! let client = FhirRestClient::new(&config.fhir)?;
//! let mapper = RecordMapper::new(&catalog, config.input.columns.clone());
//! let pipeline = UploadPipeline::new(&client, mapper, UploadOptions::default());
//!
//! let reader = TabularReader::open(&config.input.path, &config.input)?;
//! let summary = pipeline.run(reader.rows()).await?;
//!
//! println!("Rows uploaded: {}", summary.rows_uploaded);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod mapping;
pub mod upload;
