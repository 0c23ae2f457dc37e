//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers read from input rows, plus the FHIR
//! resource types records are stored under.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subject identifier newtype wrapper
///
/// The externally supplied patient id from the `PATIENT_ID` column. The same
/// id may recur across rows; every occurrence addresses the same Patient.
///
/// # Examples
///
/// ```
/// use labload::domain::ids::PatientId;
///
/// let id = PatientId::new("p1").unwrap();
/// assert_eq!(id.as_str(), "p1");
/// assert_eq!(id.reference(), "Patient/p1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(PatientId)` if the ID is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Patient ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the patient ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative reference to the Patient resource, e.g. `Patient/p1`
    pub fn reference(&self) -> String {
        format!("{}/{}", ResourceType::Patient, self.0)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Row sequence number newtype wrapper
///
/// Taken verbatim from the `SEQN` column and used to derive Observation ids.
/// Must be unique within a batch or Observation ids collide.
///
/// # Examples
///
/// ```
/// use labload::domain::ids::SequenceNumber;
///
/// let seqn = SequenceNumber::new("42").unwrap();
/// assert_eq!(seqn.with_prefix("rbc-"), "rbc-42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceNumber(String);

impl SequenceNumber {
    /// Creates a new SequenceNumber from a string
    pub fn new(seqn: impl Into<String>) -> Result<Self, String> {
        let seqn = seqn.into();
        if seqn.trim().is_empty() {
            return Err("Sequence number cannot be empty".to_string());
        }
        Ok(Self(seqn))
    }

    /// Returns the sequence number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Concatenates a catalog prefix and this sequence number
    pub fn with_prefix(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.0)
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SequenceNumber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// FHIR resource types produced by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceType {
    /// Subject record
    Patient,
    /// Measurement record
    Observation,
}

impl ResourceType {
    /// FHIR type name as used in URLs and `resourceType`
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Patient => "Patient",
            ResourceType::Observation => "Observation",
        }
    }

    /// Strips a leading `{Type}/` from an identity, leaving the logical id
    ///
    /// ```
    /// use labload::domain::ids::ResourceType;
    ///
    /// assert_eq!(ResourceType::Patient.logical_id("Patient/p1"), "p1");
    /// assert_eq!(ResourceType::Observation.logical_id("rbc-1"), "rbc-1");
    /// ```
    pub fn logical_id<'a>(&self, identity: &'a str) -> &'a str {
        identity
            .strip_prefix(self.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(identity)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_id_creation() {
        let id = PatientId::new("p1").unwrap();
        assert_eq!(id.as_str(), "p1");
        assert_eq!(format!("{id}"), "p1");
    }

    #[test]
    fn test_patient_id_empty_fails() {
        assert!(PatientId::new("").is_err());
        assert!(PatientId::new("   ").is_err());
    }

    #[test]
    fn test_patient_id_reference() {
        let id: PatientId = "12345".parse().unwrap();
        assert_eq!(id.reference(), "Patient/12345");
    }

    #[test]
    fn test_sequence_number_prefix() {
        let seqn = SequenceNumber::new("1").unwrap();
        assert_eq!(seqn.with_prefix("hb-"), "hb-1");
        assert!(SequenceNumber::new("").is_err());
    }

    #[test]
    fn test_resource_type_logical_id() {
        assert_eq!(ResourceType::Patient.logical_id("Patient/p1"), "p1");
        assert_eq!(ResourceType::Patient.logical_id("p1"), "p1");
        assert_eq!(ResourceType::Observation.logical_id("Observation/hb-3"), "hb-3");
        // a different type prefix is left alone
        assert_eq!(
            ResourceType::Observation.logical_id("Patient/p1"),
            "Patient/p1"
        );
        assert_eq!(
            ResourceType::Patient.logical_id("Patientx"),
            "Patientx"
        );
    }

    #[test]
    fn test_patient_id_serialization() {
        let id = PatientId::new("p1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"p1\"");
        let deserialized: PatientId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
