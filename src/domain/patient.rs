//! Patient domain model
//!
//! The subject record derived from every input row.

use super::ids::PatientId;
use serde::{Deserialize, Serialize};

/// Administrative sex of a patient
///
/// A closed enumeration: input codes other than `M` and `F` map to
/// [`AdministrativeGender::Unspecified`] rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AdministrativeGender {
    /// Raw code `M`
    #[serde(rename = "male")]
    Male,
    /// Raw code `F`
    #[serde(rename = "female")]
    Female,
    /// Any other raw code, including empty
    #[default]
    #[serde(rename = "unknown")]
    Unspecified,
}

impl AdministrativeGender {
    /// Maps a raw `PATIENT_GENDER` code
    ///
    /// ```
    /// use labload::domain::AdministrativeGender;
    ///
    /// assert_eq!(AdministrativeGender::from_code("M"), AdministrativeGender::Male);
    /// assert_eq!(AdministrativeGender::from_code("F"), AdministrativeGender::Female);
    /// assert_eq!(AdministrativeGender::from_code("X"), AdministrativeGender::Unspecified);
    /// ```
    pub fn from_code(code: &str) -> Self {
        match code {
            "M" => AdministrativeGender::Male,
            "F" => AdministrativeGender::Female,
            _ => AdministrativeGender::Unspecified,
        }
    }

    /// True for the fallback value
    pub fn is_unspecified(&self) -> bool {
        matches!(self, AdministrativeGender::Unspecified)
    }
}

/// A person's name as FHIR `HumanName`
///
/// Empty parts are never stored; FHIR does not allow empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanName {
    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    /// Given names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
}

/// FHIR Patient resource
///
/// Serializes to the FHIR JSON shape without `resourceType`; the record
/// wrapper adds the tag. `gender` is omitted when unspecified and `name` when
/// both name parts are empty.
///
/// # Examples
///
/// ```
/// use labload::domain::{AdministrativeGender, Patient, PatientId};
///
/// let patient = Patient::builder()
///     .id(PatientId::new("p1").unwrap())
///     .family("Doe")
///     .given("Jane")
///     .gender(AdministrativeGender::Female)
///     .build()
///     .unwrap();
///
/// assert_eq!(patient.identity(), "Patient/p1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Logical id
    pub id: PatientId,

    /// Names; at most one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,

    /// Administrative sex
    #[serde(default, skip_serializing_if = "AdministrativeGender::is_unspecified")]
    pub gender: AdministrativeGender,
}

impl Patient {
    /// Creates a new builder for constructing a Patient
    pub fn builder() -> PatientBuilder {
        PatientBuilder::default()
    }

    /// Store identity, `Patient/{id}`
    pub fn identity(&self) -> String {
        self.id.reference()
    }

    /// Family name of the first name entry
    pub fn family(&self) -> Option<&str> {
        self.name.first().and_then(|n| n.family.as_deref())
    }

    /// First given name of the first name entry
    pub fn given(&self) -> Option<&str> {
        self.name
            .first()
            .and_then(|n| n.given.first())
            .map(String::as_str)
    }
}

/// Builder for constructing Patient instances
#[derive(Debug, Default)]
pub struct PatientBuilder {
    id: Option<PatientId>,
    family: Option<String>,
    given: Option<String>,
    gender: AdministrativeGender,
}

impl PatientBuilder {
    /// Sets the patient id
    pub fn id(mut self, id: PatientId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the family name
    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Sets the given name
    pub fn given(mut self, given: impl Into<String>) -> Self {
        self.given = Some(given.into());
        self
    }

    /// Sets the administrative sex
    pub fn gender(mut self, gender: AdministrativeGender) -> Self {
        self.gender = gender;
        self
    }

    /// Builds the Patient
    ///
    /// # Errors
    ///
    /// Returns an error if the id or family name is missing
    pub fn build(self) -> Result<Patient, String> {
        let id = self.id.ok_or("id is required")?;
        let name = HumanName {
            family: Some(self.family.ok_or("family is required")?).filter(|f| !f.is_empty()),
            given: self.given.into_iter().filter(|g| !g.is_empty()).collect(),
        };
        let name = if name.family.is_none() && name.given.is_empty() {
            Vec::new()
        } else {
            vec![name]
        };
        Ok(Patient {
            id,
            name,
            gender: self.gender,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn jane() -> Patient {
        Patient::builder()
            .id(PatientId::new("p1").unwrap())
            .family("Doe")
            .given("Jane")
            .gender(AdministrativeGender::Female)
            .build()
            .unwrap()
    }

    #[test_case("M", AdministrativeGender::Male ; "male")]
    #[test_case("F", AdministrativeGender::Female ; "female")]
    #[test_case("", AdministrativeGender::Unspecified ; "empty")]
    #[test_case("U", AdministrativeGender::Unspecified ; "unknown letter")]
    #[test_case("m", AdministrativeGender::Unspecified ; "lowercase is not recognized")]
    #[test_case("Male", AdministrativeGender::Unspecified ; "spelled out")]
    fn test_gender_from_code(code: &str, expected: AdministrativeGender) {
        assert_eq!(AdministrativeGender::from_code(code), expected);
    }

    #[test]
    fn test_patient_builder() {
        let patient = jane();
        assert_eq!(patient.identity(), "Patient/p1");
        assert_eq!(patient.family(), Some("Doe"));
        assert_eq!(patient.given(), Some("Jane"));
    }

    #[test]
    fn test_patient_builder_missing_field() {
        let result = Patient::builder().family("Doe").build();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("id is required"));
    }

    #[test]
    fn test_patient_serialization() {
        let value = serde_json::to_value(jane()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "p1",
                "name": [{"family": "Doe", "given": ["Jane"]}],
                "gender": "female"
            })
        );
    }

    #[test]
    fn test_unspecified_gender_is_omitted() {
        let patient = Patient::builder()
            .id(PatientId::new("p2").unwrap())
            .family("Roe")
            .given("Alex")
            .build()
            .unwrap();

        let value = serde_json::to_value(&patient).unwrap();
        assert!(value.get("gender").is_none());

        let back: Patient = serde_json::from_value(value).unwrap();
        assert_eq!(back.gender, AdministrativeGender::Unspecified);
    }

    #[test]
    fn test_empty_name_parts_are_omitted() {
        let patient = Patient::builder()
            .id(PatientId::new("p3").unwrap())
            .family("Poe")
            .given("")
            .build()
            .unwrap();
        assert_eq!(patient.given(), None);
        assert_eq!(
            serde_json::to_value(&patient).unwrap(),
            json!({"id": "p3", "name": [{"family": "Poe"}]})
        );

        let patient = Patient::builder()
            .id(PatientId::new("p4").unwrap())
            .family("")
            .given("")
            .build()
            .unwrap();
        assert_eq!(patient.family(), None);
        assert_eq!(serde_json::to_value(&patient).unwrap(), json!({"id": "p4"}));
    }
}
