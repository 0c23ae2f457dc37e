//! Clinical records produced from one input row

use super::ids::ResourceType;
use super::observation::Observation;
use super::patient::Patient;
use serde::{Deserialize, Serialize};

/// One record to be upserted
///
/// Serializes to a complete FHIR resource with its `resourceType` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum ClinicalRecord {
    /// Subject record
    Patient(Patient),
    /// Measurement record
    Observation(Observation),
}

impl ClinicalRecord {
    /// FHIR resource type of this record
    pub fn resource_type(&self) -> ResourceType {
        match self {
            ClinicalRecord::Patient(_) => ResourceType::Patient,
            ClinicalRecord::Observation(_) => ResourceType::Observation,
        }
    }

    /// Store identity: `Patient/{id}` for subjects, the bare id for measurements
    pub fn identity(&self) -> String {
        match self {
            ClinicalRecord::Patient(patient) => patient.identity(),
            ClinicalRecord::Observation(observation) => observation.identity().to_string(),
        }
    }

    /// The record as a FHIR JSON resource
    pub fn to_resource(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    pub fn as_patient(&self) -> Option<&Patient> {
        match self {
            ClinicalRecord::Patient(patient) => Some(patient),
            ClinicalRecord::Observation(_) => None,
        }
    }

    pub fn as_observation(&self) -> Option<&Observation> {
        match self {
            ClinicalRecord::Observation(observation) => Some(observation),
            ClinicalRecord::Patient(_) => None,
        }
    }
}

impl From<Patient> for ClinicalRecord {
    fn from(patient: Patient) -> Self {
        ClinicalRecord::Patient(patient)
    }
}

impl From<Observation> for ClinicalRecord {
    fn from(observation: Observation) -> Self {
        ClinicalRecord::Observation(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::PatientId;
    use crate::domain::AdministrativeGender;

    #[test]
    fn test_patient_record_resource() {
        let patient = Patient::builder()
            .id(PatientId::new("p1").unwrap())
            .family("Doe")
            .given("Jane")
            .gender(AdministrativeGender::Female)
            .build()
            .unwrap();
        let record = ClinicalRecord::from(patient);

        assert_eq!(record.resource_type(), ResourceType::Patient);
        assert_eq!(record.identity(), "Patient/p1");
        assert!(record.as_observation().is_none());

        let resource = record.to_resource().unwrap();
        assert_eq!(resource["resourceType"], "Patient");
        assert_eq!(resource["id"], "p1");

        let back: ClinicalRecord = serde_json::from_value(resource).unwrap();
        assert_eq!(back, record);
    }
}
