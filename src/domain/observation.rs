//! Observation domain model
//!
//! One coded, timestamped lab measurement tied to a Patient.

use super::decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Observation status
///
/// The loader always writes `final`; the other values exist so resources
/// read back from a server deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservationStatus {
    Registered,
    Preliminary,
    #[default]
    Final,
    Amended,
    Corrected,
    Cancelled,
    EnteredInError,
    Unknown,
}

/// A code from a terminology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    pub system: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// FHIR CodeableConcept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    pub coding: Vec<Coding>,
}

/// FHIR Quantity with a UCUM unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: Decimal,
    pub unit: String,
    pub system: String,
    pub code: String,
}

/// Reference to another resource, e.g. `Patient/p1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference: String,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

/// FHIR Observation resource
///
/// # Examples
///
/// ```
/// use labload::domain::observation::{Coding, Observation, Quantity};
/// use labload::domain::Decimal;
///
/// let observation = Observation::builder()
///     .id("hb-1")
///     .effective("2020-01-01T00:00:00Z")
///     .coding(Coding {
///         system: "http://loinc.org".to_string(),
///         code: "718-7".to_string(),
///         display: Some("Hemoglobin [Mass/volume] in Blood".to_string()),
///     })
///     .value(Quantity {
///         value: "13.2".parse::<Decimal>().unwrap(),
///         unit: "g/dL".to_string(),
///         system: "http://unitsofmeasure.org".to_string(),
///         code: "g/dL".to_string(),
///     })
///     .subject("Patient/p1")
///     .build()
///     .unwrap();
///
/// assert_eq!(observation.identity(), "hb-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Logical id, catalog prefix + sequence number
    pub id: String,

    pub status: ObservationStatus,

    pub code: CodeableConcept,

    pub subject: Reference,

    /// Point in time copied verbatim from the input row; omitted when empty
    #[serde(
        rename = "effectiveDateTime",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub effective: String,

    #[serde(rename = "valueQuantity")]
    pub value: Quantity,
}

impl Observation {
    /// Creates a new builder for constructing an Observation
    pub fn builder() -> ObservationBuilder {
        ObservationBuilder::default()
    }

    /// Store identity, the bare logical id
    pub fn identity(&self) -> &str {
        &self.id
    }
}

/// Builder for constructing Observation instances
#[derive(Debug, Default)]
pub struct ObservationBuilder {
    id: Option<String>,
    status: ObservationStatus,
    coding: Vec<Coding>,
    subject: Option<String>,
    effective: Option<String>,
    value: Option<Quantity>,
}

impl ObservationBuilder {
    /// Sets the logical id
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the status
    pub fn status(mut self, status: ObservationStatus) -> Self {
        self.status = status;
        self
    }

    /// Adds a coding to the observation code
    pub fn coding(mut self, coding: Coding) -> Self {
        self.coding.push(coding);
        self
    }

    /// Sets the subject reference
    pub fn subject(mut self, reference: impl Into<String>) -> Self {
        self.subject = Some(reference.into());
        self
    }

    /// Sets the effective timestamp
    pub fn effective(mut self, effective: impl Into<String>) -> Self {
        self.effective = Some(effective.into());
        self
    }

    /// Sets the quantity value
    pub fn value(mut self, value: Quantity) -> Self {
        self.value = Some(value);
        self
    }

    /// Builds the Observation
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is missing
    pub fn build(self) -> Result<Observation, String> {
        if self.coding.is_empty() {
            return Err("coding is required".to_string());
        }
        Ok(Observation {
            id: self.id.ok_or("id is required")?,
            status: self.status,
            code: CodeableConcept {
                coding: self.coding,
            },
            subject: Reference::new(self.subject.ok_or("subject is required")?),
            effective: self.effective.ok_or("effective is required")?,
            value: self.value.ok_or("value is required")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hemoglobin() -> Observation {
        Observation::builder()
            .id("hb-1")
            .effective("2020-01-01T00:00:00Z")
            .coding(Coding {
                system: "http://loinc.org".to_string(),
                code: "718-7".to_string(),
                display: Some("Hemoglobin [Mass/volume] in Blood".to_string()),
            })
            .value(Quantity {
                value: Decimal::parse("13.2").unwrap(),
                unit: "g/dL".to_string(),
                system: "http://unitsofmeasure.org".to_string(),
                code: "g/dL".to_string(),
            })
            .subject("Patient/p1")
            .build()
            .unwrap()
    }

    #[test]
    fn test_observation_builder_defaults_to_final() {
        let observation = hemoglobin();
        assert_eq!(observation.status, ObservationStatus::Final);
        assert_eq!(observation.identity(), "hb-1");
        assert_eq!(observation.subject.reference, "Patient/p1");
    }

    #[test]
    fn test_observation_builder_missing_field() {
        let result = Observation::builder().id("hb-1").build();
        assert_eq!(result.unwrap_err(), "coding is required");
    }

    #[test]
    fn test_observation_serialization() {
        let text = serde_json::to_string(&hemoglobin()).unwrap();
        assert!(text.contains(r#""status":"final""#));
        assert!(text.contains(r#""effectiveDateTime":"2020-01-01T00:00:00Z""#));
        assert!(text.contains(r#""valueQuantity":{"value":13.2,"unit":"g/dL""#));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["code"]["coding"][0]["code"], json!("718-7"));
        assert_eq!(value["subject"], json!({"reference": "Patient/p1"}));
    }

    #[test]
    fn test_empty_effective_is_omitted() {
        let mut observation = hemoglobin();
        observation.effective = String::new();

        let value = serde_json::to_value(&observation).unwrap();
        assert!(value.get("effectiveDateTime").is_none());
        assert_eq!(value["id"], json!("hb-1"));
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ObservationStatus::EnteredInError).unwrap(),
            "\"entered-in-error\""
        );
        assert_eq!(
            serde_json::to_string(&ObservationStatus::Final).unwrap(),
            "\"final\""
        );
    }
}
