//! Domain models and types for labload.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PatientId`], [`SequenceNumber`], [`ResourceType`])
//! - **FHIR resources** ([`Patient`], [`Observation`]) and the [`ClinicalRecord`] wrapper
//! - **Input rows** ([`Row`]) keyed by column name
//! - **Exact decimals** ([`Decimal`]) for measurement values
//! - **Error types** ([`LoaderError`], [`InputError`], [`FhirError`])
//! - **Result type alias** ([`Result`])
//!
//! # Identities
//!
//! Records are addressed in the store by their identity:
//!
//! ```rust
//! use labload::domain::{PatientId, SequenceNumber};
//!
//! let patient = PatientId::new("p1").unwrap();
//! assert_eq!(patient.reference(), "Patient/p1");
//!
//! let seqn = SequenceNumber::new("1").unwrap();
//! assert_eq!(seqn.with_prefix("rbc-"), "rbc-1");
//! ```

pub mod decimal;
pub mod errors;
pub mod ids;
pub mod observation;
pub mod patient;
pub mod record;
pub mod result;
pub mod row;

// Re-export commonly used types for convenience
pub use decimal::Decimal;
pub use errors::{FhirError, InputError, LoaderError};
pub use ids::{PatientId, ResourceType, SequenceNumber};
pub use observation::{Observation, ObservationBuilder, ObservationStatus};
pub use patient::{AdministrativeGender, HumanName, Patient, PatientBuilder};
pub use record::ClinicalRecord;
pub use result::Result;
pub use row::Row;
