//! Input row model

use super::errors::InputError;
use std::collections::BTreeMap;

/// One data line of the input table, keyed by column name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    /// 1-based line number in the input file
    pub line: u64,

    /// Raw cell values by column name
    pub fields: BTreeMap<String, String>,
}

impl Row {
    pub fn new(line: u64, fields: BTreeMap<String, String>) -> Self {
        Self { line, fields }
    }

    /// Builds a row from `(column, value)` pairs
    pub fn from_pairs<K, V>(line: u64, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            line,
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw value of a column, if present
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Raw value of a column that must be present
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MissingColumn`] when the row has no such column
    pub fn require(&self, column: &str) -> Result<&str, InputError> {
        self.get(column).ok_or_else(|| InputError::MissingColumn {
            line: self.line,
            column: column.to_string(),
        })
    }
}
