//! FHIR server integration
//!
//! - [`UpsertClient`] - the create-or-replace operation the upload pipeline uses
//! - [`FhirRestClient`] - implementation over the FHIR REST API

pub mod client;
pub mod rest;

pub use client::UpsertClient;
pub use rest::{FhirRestClient, FHIR_JSON};
