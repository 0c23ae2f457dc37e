//! Integration tests for reading input files from disk

use labload::adapters::csv::TabularReader;
use labload::config::InputConfig;
use labload::domain::{InputError, Row};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_input(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_open_reads_rows_with_line_numbers() {
    let file = write_input(
        b"SEQN,PATIENT_ID,HB\r\n1,p1,13.2\r\n2,p2,12.9\r\n3,p3,14.0\r\n",
    );

    let reader = TabularReader::open(file.path(), &InputConfig::default()).unwrap();
    let rows: Vec<Row> = reader.rows().collect::<Result<_, _>>().unwrap();

    let lines: Vec<u64> = rows.iter().map(|r| r.line).collect();
    assert_eq!(lines, vec![2, 3, 4]);
    assert_eq!(rows[2].get("PATIENT_ID"), Some("p3"));
    assert_eq!(rows[2].get("HB"), Some("14.0"));
}

#[test]
fn test_semicolon_latin1_file() {
    // "Müller" in ISO-8859-1
    let file = write_input(b"SEQN;PATIENT_FAMILYNAME\n1;M\xfcller\n");

    let config = InputConfig {
        delimiter: ";".to_string(),
        encoding: "iso-8859-1".to_string(),
        ..Default::default()
    };

    let reader = TabularReader::open(file.path(), &config).unwrap();
    let rows: Vec<Row> = reader.rows().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows[0].get("PATIENT_FAMILYNAME"), Some("Müller"));
}

#[test]
fn test_tab_delimited_file() {
    let file = write_input(b"SEQN\tHB\n7\t11.0\n");

    let config = InputConfig {
        delimiter: "\\t".to_string(),
        ..Default::default()
    };

    let reader = TabularReader::open(file.path(), &config).unwrap();
    assert_eq!(reader.headers(), ["SEQN", "HB"]);

    let rows: Vec<Row> = reader.rows().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows[0].get("SEQN"), Some("7"));
}

#[test]
fn test_header_only_file_has_no_rows() {
    let file = write_input(b"SEQN,PATIENT_ID\n");

    let reader = TabularReader::open(file.path(), &InputConfig::default()).unwrap();
    assert_eq!(reader.rows().count(), 0);
}

#[test]
fn test_quoted_fields() {
    let file = write_input(b"SEQN,PATIENT_FAMILYNAME\n1,\"O'Brien, Jr.\"\n");

    let reader = TabularReader::open(file.path(), &InputConfig::default()).unwrap();
    let rows: Vec<Row> = reader.rows().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows[0].get("PATIENT_FAMILYNAME"), Some("O'Brien, Jr."));
}

#[test]
fn test_ragged_rows_are_read() {
    let file = write_input(b"SEQN,PATIENT_ID,HB,NOTES\n1,p1,13.2\n2,p2\n3,p3,14.0,,\n");

    let reader = TabularReader::open(file.path(), &InputConfig::default()).unwrap();
    let rows: Vec<Row> = reader.rows().collect::<Result<_, _>>().unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get("HB"), Some("13.2"));
    assert_eq!(rows[0].get("NOTES"), None);

    assert_eq!(rows[1].line, 3);
    assert!(matches!(
        rows[1].require("HB"),
        Err(InputError::MissingColumn { line: 3, ref column }) if column == "HB"
    ));

    assert_eq!(rows[2].get("HB"), Some("14.0"));
    assert_eq!(rows[2].get("NOTES"), Some(""));
}

#[test]
fn test_missing_file() {
    let err = TabularReader::open("/nonexistent/labload.csv", &InputConfig::default())
        .unwrap_err();
    assert!(matches!(err, InputError::OpenFailed { .. }));
    assert!(err.to_string().contains("/nonexistent/labload.csv"));
}
