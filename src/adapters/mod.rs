//! External system integrations for labload.
//!
//! - [`csv`] - Delimited input file reader
//! - [`fhir`] - FHIR server client behind the [`UpsertClient`](fhir::UpsertClient) trait
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies. The upload pipeline only sees
//! [`Row`](crate::domain::Row)s and the `UpsertClient` trait, so tests can
//! swap in an in-memory store.
//!
//! ```rust,no_run
//! use labload::adapters::fhir::FhirRestClient;
//! use labload::config::{secret_string, AuthType, FhirConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FhirConfig {
//!     base_url: "https://fhir.example.com/r4".to_string(),
//!     auth_type: AuthType::Bearer,
//!     token: Some(secret_string("token".to_string())),
//!     ..Default::default()
//! };
//!
//! let client = FhirRestClient::new(&config)?;
//! client.check_connection().await?;
//! # Ok(())
//! # }
//! ```

pub mod csv;
pub mod fhir;
