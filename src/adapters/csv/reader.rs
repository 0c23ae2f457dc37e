//! Delimited-file reader producing [`Row`]s

use crate::config::InputConfig;
use crate::domain::{InputError, Row};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use encoding_rs::Encoding;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

/// Reader over one input file
///
/// The file is read and decoded to UTF-8 when opened; [`rows`](Self::rows)
/// then tokenizes it line by line. Cells are trimmed and a leading BOM on the
/// header is dropped. Without a header line, columns are named by their
/// 1-based position.
///
/// Rows may be shorter or longer than the header. A missing cell is simply
/// absent from the [`Row`] and surfaces later as a missing column; cells past
/// the last header are keyed by position.
pub struct TabularReader {
    source: String,
    has_headers: bool,
    headers: Vec<String>,
    reader: csv::Reader<Cursor<Vec<u8>>>,
}

impl std::fmt::Debug for TabularReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabularReader")
            .field("source", &self.source)
            .field("has_headers", &self.has_headers)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl TabularReader {
    /// Opens and decodes the input file
    ///
    /// # Errors
    ///
    /// Returns [`InputError::OpenFailed`] if the file cannot be read,
    /// [`InputError::UnsupportedEncoding`] for an unknown encoding label and
    /// [`InputError::MalformedRow`] if the header line cannot be tokenized.
    pub fn open(path: impl AsRef<Path>, config: &InputConfig) -> Result<Self, InputError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| InputError::OpenFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let reader = Self::from_bytes(path.display().to_string(), &bytes, config)?;

        tracing::info!(
            path = %path.display(),
            encoding = %config.encoding,
            columns = reader.headers.len(),
            "Opened input file"
        );

        Ok(reader)
    }

    /// Builds a reader over in-memory content
    ///
    /// `source` names the content in log messages.
    pub fn from_bytes(
        source: impl Into<String>,
        bytes: &[u8],
        config: &InputConfig,
    ) -> Result<Self, InputError> {
        let source = source.into();

        let encoding = Encoding::for_label(config.encoding.trim().as_bytes())
            .ok_or_else(|| InputError::UnsupportedEncoding(config.encoding.clone()))?;
        let (decoded, actual, had_errors) = encoding.decode(bytes);
        if had_errors {
            tracing::warn!(
                source = %source,
                encoding = actual.name(),
                "Decoding errors occurred while reading input; invalid bytes were replaced"
            );
        }

        let delimiter = config
            .delimiter_byte()
            .map_err(|message| InputError::MalformedRow { line: 0, message })?;

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(config.has_headers)
            .flexible(true)
            .from_reader(Cursor::new(decoded.into_owned().into_bytes()));

        let headers = if config.has_headers {
            reader
                .headers()
                .map_err(|e| malformed(e, 1))?
                .iter()
                .map(|h| h.trim_matches('\u{feff}').trim().to_string())
                .collect()
        } else {
            Vec::new()
        };

        Ok(Self {
            source,
            has_headers: config.has_headers,
            headers,
            reader,
        })
    }

    /// Column names from the header line; empty without headers
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Consumes the reader, yielding data rows in file order
    pub fn rows(self) -> Rows {
        tracing::debug!(source = %self.source, "Reading input rows");
        Rows {
            headers: self.headers,
            records: self.reader.into_records(),
            index: 0,
            has_headers: self.has_headers,
        }
    }
}

/// Iterator over the data rows of a [`TabularReader`]
pub struct Rows {
    headers: Vec<String>,
    records: StringRecordsIntoIter<Cursor<Vec<u8>>>,
    index: u64,
    has_headers: bool,
}

impl Rows {
    fn to_row(&self, record: &StringRecord, fallback_line: u64) -> Row {
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(fallback_line);

        let fields: BTreeMap<String, String> = record
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                let column = self
                    .headers
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| (idx + 1).to_string());
                (column, value.trim().to_string())
            })
            .collect();

        Row::new(line, fields)
    }
}

impl Iterator for Rows {
    type Item = Result<Row, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        self.index += 1;
        let fallback_line = self.index + u64::from(self.has_headers);

        Some(match record {
            Ok(record) => Ok(self.to_row(&record, fallback_line)),
            Err(e) => Err(malformed(e, fallback_line)),
        })
    }
}

fn malformed(err: csv::Error, fallback_line: u64) -> InputError {
    let line = err
        .position()
        .map(|p| p.line())
        .unwrap_or(fallback_line);
    InputError::MalformedRow {
        line,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> InputConfig {
        InputConfig::default()
    }

    #[test]
    fn test_rows_keyed_by_header() {
        let data = b"SEQN,PATIENT_ID,HB\n1,p1,13.2\n2, p2 ,12.9\n";
        let reader = TabularReader::from_bytes("test", data, &config()).unwrap();
        assert_eq!(reader.headers(), ["SEQN", "PATIENT_ID", "HB"]);

        let rows: Vec<Row> = reader.rows().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].get("HB"), Some("13.2"));
        assert_eq!(rows[1].line, 3);
        assert_eq!(rows[1].get("PATIENT_ID"), Some("p2"));
    }

    #[test]
    fn test_bom_stripped_from_header() {
        let data = "\u{feff}SEQN;HB\n7;14\n".as_bytes();
        let mut cfg = config();
        cfg.delimiter = ";".to_string();

        let reader = TabularReader::from_bytes("test", data, &cfg).unwrap();
        assert_eq!(reader.headers()[0], "SEQN");

        let row = reader.rows().next().unwrap().unwrap();
        assert_eq!(row.get("SEQN"), Some("7"));
    }

    #[test]
    fn test_positional_columns_without_headers() {
        let mut cfg = config();
        cfg.has_headers = false;

        let reader = TabularReader::from_bytes("test", b"1,p1\n2,p2\n", &cfg).unwrap();
        let rows: Vec<Row> = reader.rows().collect::<Result<_, _>>().unwrap();

        assert_eq!(rows[0].line, 1);
        assert_eq!(rows[0].get("1"), Some("1"));
        assert_eq!(rows[1].get("2"), Some("p2"));
    }

    #[test]
    fn test_windows_1252_decoding() {
        let mut cfg = config();
        cfg.encoding = "windows-1252".to_string();

        // "Müller" with 0xFC for u-umlaut
        let data = b"PATIENT_FAMILYNAME\nM\xfcller\n";
        let reader = TabularReader::from_bytes("test", data, &cfg).unwrap();
        let row = reader.rows().next().unwrap().unwrap();
        assert_eq!(row.get("PATIENT_FAMILYNAME"), Some("Müller"));
    }

    #[test]
    fn test_unknown_encoding() {
        let mut cfg = config();
        cfg.encoding = "klingon".to_string();

        let err = TabularReader::from_bytes("test", b"A\n1\n", &cfg).unwrap_err();
        assert_eq!(err, InputError::UnsupportedEncoding("klingon".to_string()));
    }

    #[test]
    fn test_short_row_omits_missing_cells() {
        let reader = TabularReader::from_bytes("test", b"A,B\n1,2\n3\n", &config()).unwrap();
        let rows: Vec<Row> = reader.rows().collect::<Result<_, _>>().unwrap();

        assert_eq!(rows[1].line, 3);
        assert_eq!(rows[1].get("A"), Some("3"));
        assert_eq!(rows[1].get("B"), None);
        assert!(matches!(
            rows[1].require("B"),
            Err(InputError::MissingColumn { line: 3, .. })
        ));
    }

    #[test]
    fn test_extra_cells_keyed_by_position() {
        let reader = TabularReader::from_bytes("test", b"A,B\n1,2,\n", &config()).unwrap();
        let row = reader.rows().next().unwrap().unwrap();

        assert_eq!(row.get("A"), Some("1"));
        assert_eq!(row.get("B"), Some("2"));
        assert_eq!(row.get("3"), Some(""));
    }

    #[test]
    fn test_open_missing_file() {
        let err = TabularReader::open("does-not-exist.csv", &config()).unwrap_err();
        assert!(matches!(err, InputError::OpenFailed { .. }));
    }
}
