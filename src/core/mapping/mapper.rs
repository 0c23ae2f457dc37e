//! Row to FHIR record mapping

use crate::config::ColumnsConfig;
use crate::core::catalog::MeasurementCatalog;
use crate::domain::{
    AdministrativeGender, ClinicalRecord, Decimal, InputError, Observation, ObservationStatus,
    Patient, PatientId, Row, SequenceNumber,
};

/// Maps input rows to the records uploaded for them
///
/// Holds the catalog and the column names; mapping itself does no I/O and is
/// deterministic for a given row.
///
/// # Examples
///
/// ```
/// use labload::config::ColumnsConfig;
/// use labload::core::catalog::MeasurementCatalog;
/// use labload::core::mapping::RecordMapper;
/// use labload::domain::Row;
///
/// let catalog = MeasurementCatalog::builtin();
/// let mapper = RecordMapper::new(&catalog, ColumnsConfig::default());
///
/// let row = Row::from_pairs(2, [
///     ("SEQN", "1"),
///     ("TIMESTAMP", "2020-01-01T00:00:00Z"),
///     ("PATIENT_ID", "p1"),
///     ("PATIENT_FAMILYNAME", "Doe"),
///     ("PATIENT_GIVENNAME", "Jane"),
///     ("PATIENT_GENDER", "F"),
///     ("RBC", "4.5"),
///     ("WBC", "6.1"),
///     ("HB", "13.2"),
/// ]);
///
/// let records = mapper.map(&row).unwrap();
/// assert_eq!(records.len(), 4);
/// assert_eq!(records[0].identity(), "Patient/p1");
/// assert_eq!(records[1].identity(), "rbc-1");
/// ```
#[derive(Debug, Clone)]
pub struct RecordMapper<'a> {
    catalog: &'a MeasurementCatalog,
    columns: ColumnsConfig,
}

impl<'a> RecordMapper<'a> {
    pub fn new(catalog: &'a MeasurementCatalog, columns: ColumnsConfig) -> Self {
        Self { catalog, columns }
    }

    pub fn catalog(&self) -> &MeasurementCatalog {
        self.catalog
    }

    /// Maps one row to its Patient followed by one Observation per catalog entry
    ///
    /// # Errors
    ///
    /// Returns the first [`InputError`] hit while reading the row. No records
    /// are returned for a row that fails.
    pub fn map(&self, row: &Row) -> Result<Vec<ClinicalRecord>, InputError> {
        let columns = &self.columns;

        let seqn = SequenceNumber::new(row.require(&columns.sequence_number)?).map_err(
            |message| InputError::InvalidIdentifier {
                line: row.line,
                column: columns.sequence_number.clone(),
                message,
            },
        )?;
        let effective = row.require(&columns.timestamp)?;
        let patient_id = PatientId::new(row.require(&columns.patient_id)?).map_err(|message| {
            InputError::InvalidIdentifier {
                line: row.line,
                column: columns.patient_id.clone(),
                message,
            }
        })?;
        let family = row.require(&columns.family_name)?;
        let given = row.require(&columns.given_name)?;
        let gender = AdministrativeGender::from_code(row.require(&columns.gender)?);

        let subject = patient_id.reference();
        let patient = Patient::builder()
            .id(patient_id)
            .family(family)
            .given(given)
            .gender(gender)
            .build()
            .map_err(|message| InputError::MalformedRow {
                line: row.line,
                message,
            })?;

        let mut records = Vec::with_capacity(self.catalog.len() + 1);
        records.push(ClinicalRecord::from(patient));

        for entry in self.catalog.entries() {
            let raw = row.require(entry.column())?;
            let value =
                Decimal::parse(raw).map_err(|_| InputError::UnparseableMeasurement {
                    line: row.line,
                    column: entry.column().to_string(),
                    value: raw.to_string(),
                })?;

            let observation = Observation::builder()
                .id(seqn.with_prefix(&entry.id_prefix))
                .status(ObservationStatus::Final)
                .coding(entry.coding())
                .subject(subject.as_str())
                .effective(effective)
                .value(entry.quantity(value))
                .build()
                .map_err(|message| InputError::MalformedRow {
                    line: row.line,
                    message,
                })?;
            records.push(ClinicalRecord::from(observation));
        }

        tracing::trace!(
            line = row.line,
            subject = %subject,
            records = records.len(),
            "Mapped row"
        );

        Ok(records)
    }
}
