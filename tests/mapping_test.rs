//! Integration tests for row mapping and the FHIR JSON it produces

use labload::config::ColumnsConfig;
use labload::core::catalog::MeasurementCatalog;
use labload::core::mapping::RecordMapper;
use labload::domain::{InputError, ResourceType, Row};
use serde_json::json;

fn jane_doe(wbc: &str) -> Row {
    Row::from_pairs(
        2,
        [
            ("SEQN", "1"),
            ("TIMESTAMP", "2020-01-01T00:00:00Z"),
            ("PATIENT_ID", "p1"),
            ("PATIENT_FAMILYNAME", "Doe"),
            ("PATIENT_GIVENNAME", "Jane"),
            ("PATIENT_GENDER", "F"),
            ("RBC", "4.5"),
            ("WBC", wbc),
            ("HB", "13.2"),
            ("NOTES", "ignored"),
        ],
    )
}

#[test]
fn test_patient_resource_shape() {
    let catalog = MeasurementCatalog::builtin();
    let mapper = RecordMapper::new(&catalog, ColumnsConfig::default());

    let records = mapper.map(&jane_doe("6.1")).unwrap();
    assert_eq!(records[0].resource_type(), ResourceType::Patient);

    let resource = records[0].to_resource().unwrap();
    assert_eq!(
        resource,
        json!({
            "resourceType": "Patient",
            "id": "p1",
            "name": [{ "family": "Doe", "given": ["Jane"] }],
            "gender": "female"
        })
    );
}

#[test]
fn test_observation_resource_shape() {
    let catalog = MeasurementCatalog::builtin();
    let mapper = RecordMapper::new(&catalog, ColumnsConfig::default());

    let records = mapper.map(&jane_doe("7.2")).unwrap();
    let wbc = records
        .iter()
        .find(|r| r.identity() == "wbc-1")
        .unwrap();
    assert_eq!(wbc.resource_type(), ResourceType::Observation);

    let resource = wbc.to_resource().unwrap();
    assert_eq!(resource["resourceType"], "Observation");
    assert_eq!(resource["id"], "wbc-1");
    assert_eq!(resource["status"], "final");
    assert_eq!(resource["subject"]["reference"], "Patient/p1");
    assert_eq!(resource["effectiveDateTime"], "2020-01-01T00:00:00Z");

    let coding = &resource["code"]["coding"][0];
    assert_eq!(coding["system"], "http://loinc.org");
    assert_eq!(coding["code"], "6690-2");

    let quantity = &resource["valueQuantity"];
    assert_eq!(quantity["system"], "http://unitsofmeasure.org");
    assert_eq!(quantity["code"], "10*3/uL");
    assert_eq!(quantity["unit"], "10*3/uL");
}

#[test]
fn test_measurement_value_is_exact_json_number() {
    let catalog = MeasurementCatalog::builtin();
    let mapper = RecordMapper::new(&catalog, ColumnsConfig::default());

    let records = mapper.map(&jane_doe("7.20")).unwrap();
    let body = serde_json::to_string(&records[2]).unwrap();

    assert!(body.contains(r#""id":"wbc-1""#), "{body}");
    assert!(body.contains(r#""value":7.20"#), "{body}");
}

#[test]
fn test_unspecified_gender_is_omitted() {
    let catalog = MeasurementCatalog::builtin();
    let mapper = RecordMapper::new(&catalog, ColumnsConfig::default());

    let mut row = jane_doe("6.1");
    row.fields.insert("PATIENT_GENDER".to_string(), "U".to_string());

    let resource = mapper.map(&row).unwrap()[0].to_resource().unwrap();
    assert!(resource.get("gender").is_none());
}

#[test]
fn test_failed_row_produces_no_records() {
    let catalog = MeasurementCatalog::builtin();
    let mapper = RecordMapper::new(&catalog, ColumnsConfig::default());

    let err = mapper.map(&jane_doe("abc")).unwrap_err();
    assert_eq!(
        err,
        InputError::UnparseableMeasurement {
            line: 2,
            column: "WBC".to_string(),
            value: "abc".to_string(),
        }
    );
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_same_row_maps_to_same_records() {
    let catalog = MeasurementCatalog::builtin();
    let mapper = RecordMapper::new(&catalog, ColumnsConfig::default());

    let first = mapper.map(&jane_doe("6.1")).unwrap();
    let second = mapper.map(&jane_doe("6.1")).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_sequence_numbers_are_scoped_by_prefix() {
    let catalog = MeasurementCatalog::builtin();
    let mapper = RecordMapper::new(&catalog, ColumnsConfig::default());

    let mut row = jane_doe("6.1");
    row.fields.insert("SEQN".to_string(), "0042".to_string());

    let identities: Vec<String> = mapper
        .map(&row)
        .unwrap()
        .iter()
        .map(|r| r.identity())
        .collect();
    assert_eq!(
        identities,
        vec!["Patient/p1", "rbc-0042", "wbc-0042", "hb-0042"]
    );
}

#[test]
fn test_empty_name_and_timestamp_cells_are_omitted() {
    let catalog = MeasurementCatalog::builtin();
    let mapper = RecordMapper::new(&catalog, ColumnsConfig::default());

    let mut row = jane_doe("6.1");
    for column in ["TIMESTAMP", "PATIENT_FAMILYNAME", "PATIENT_GIVENNAME"] {
        row.fields.insert(column.to_string(), String::new());
    }

    let records = mapper.map(&row).unwrap();
    let patient = records[0].to_resource().unwrap();
    assert_eq!(
        patient,
        json!({ "resourceType": "Patient", "id": "p1", "gender": "female" })
    );

    let observation = records[1].to_resource().unwrap();
    assert!(observation.get("effectiveDateTime").is_none());
    assert_eq!(observation["subject"]["reference"], "Patient/p1");
}
