//! Upsert client abstraction
//!
//! The upload pipeline talks to the record store only through this trait, so
//! tests can substitute an in-memory store for the FHIR server.

use crate::domain::{ClinicalRecord, ResourceType, Result};
use async_trait::async_trait;

/// Idempotent create-or-replace of one record at its identity
#[async_trait]
pub trait UpsertClient: Send + Sync {
    /// Creates the record, or fully replaces the one stored at `identity`
    ///
    /// Submitting the same record twice leaves the store in the same state as
    /// submitting it once.
    ///
    /// # Arguments
    ///
    /// * `resource_type` - Resource type the record is stored under
    /// * `identity` - Store identity, e.g. `Patient/p1` or `rbc-1`
    /// * `record` - The full record
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Fhir`](crate::domain::LoaderError::Fhir) if the
    /// store cannot be reached or rejects the record.
    async fn upsert(
        &self,
        resource_type: ResourceType,
        identity: &str,
        record: &ClinicalRecord,
    ) -> Result<()>;
}
