//! Coded-measurement catalog
//!
//! Declarative table of the lab measurements the loader tracks. Each entry
//! names the input column holding the raw value, the prefix used to derive
//! Observation ids, and the LOINC/UCUM coding written to the resource.
//! Adding a measurement is a data change: one entry here (or in the
//! `[[catalog.measurements]]` configuration table) plus the input column.

use crate::domain::observation::{Coding, Quantity};
use crate::domain::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// LOINC code system URI
pub const LOINC_SYSTEM: &str = "http://loinc.org";

/// UCUM unit system URI
pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";

/// Coding metadata for one tracked measurement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Measurement key, e.g. `RBC`
    pub key: String,

    /// Input column holding the raw value; defaults to the key
    #[serde(default)]
    pub column: Option<String>,

    /// Prefix of the Observation id, e.g. `rbc-`
    pub id_prefix: String,

    /// Code system URI
    #[serde(default = "default_code_system")]
    pub code_system: String,

    /// Code within the code system
    pub code: String,

    /// Human-readable display for the code
    pub display: String,

    /// Unit system URI
    #[serde(default = "default_unit_system")]
    pub unit_system: String,

    /// Unit code within the unit system
    pub unit_code: String,

    /// Unit display text; defaults to the unit code
    #[serde(default)]
    pub unit_display: Option<String>,
}

impl CatalogEntry {
    /// Creates a LOINC/UCUM entry whose column equals its key
    pub fn loinc(
        key: &str,
        id_prefix: &str,
        code: &str,
        display: &str,
        unit_code: &str,
    ) -> Self {
        Self {
            key: key.to_string(),
            column: None,
            id_prefix: id_prefix.to_string(),
            code_system: LOINC_SYSTEM.to_string(),
            code: code.to_string(),
            display: display.to_string(),
            unit_system: UCUM_SYSTEM.to_string(),
            unit_code: unit_code.to_string(),
            unit_display: None,
        }
    }

    /// Input column for this measurement
    pub fn column(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.key)
    }

    /// Unit display text
    pub fn unit_display(&self) -> &str {
        self.unit_display.as_deref().unwrap_or(&self.unit_code)
    }

    /// Observation code for this measurement
    pub fn coding(&self) -> Coding {
        Coding {
            system: self.code_system.clone(),
            code: self.code.clone(),
            display: Some(self.display.clone()),
        }
    }

    /// Observation value for this measurement
    pub fn quantity(&self, value: Decimal) -> Quantity {
        Quantity {
            value,
            unit: self.unit_display().to_string(),
            system: self.unit_system.clone(),
            code: self.unit_code.clone(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        let required = [
            ("key", self.key.as_str()),
            ("id_prefix", self.id_prefix.as_str()),
            ("code_system", self.code_system.as_str()),
            ("code", self.code.as_str()),
            ("display", self.display.as_str()),
            ("unit_system", self.unit_system.as_str()),
            ("unit_code", self.unit_code.as_str()),
            ("column", self.column()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(format!(
                    "catalog entry '{}': {field} cannot be empty",
                    self.key
                ));
            }
        }
        Ok(())
    }
}

fn default_code_system() -> String {
    LOINC_SYSTEM.to_string()
}

fn default_unit_system() -> String {
    UCUM_SYSTEM.to_string()
}

/// Read-only catalog of tracked measurements in declaration order
///
/// # Examples
///
/// ```
/// use labload::core::catalog::MeasurementCatalog;
///
/// let catalog = MeasurementCatalog::builtin();
/// let hb = catalog.lookup("HB").unwrap();
/// assert_eq!(hb.code, "718-7");
/// assert_eq!(hb.unit_code, "g/dL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementCatalog {
    entries: Vec<CatalogEntry>,
}

impl MeasurementCatalog {
    /// Built-in complete blood count entries: RBC, WBC, HB
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                CatalogEntry::loinc(
                    "RBC",
                    "rbc-",
                    "789-8",
                    "Erythrocytes [#/volume] in Blood by Automated count",
                    "10*6/uL",
                ),
                CatalogEntry::loinc(
                    "WBC",
                    "wbc-",
                    "6690-2",
                    "Leukocytes [#/volume] in Blood by Automated count",
                    "10*3/uL",
                ),
                CatalogEntry::loinc(
                    "HB",
                    "hb-",
                    "718-7",
                    "Hemoglobin [Mass/volume] in Blood",
                    "g/dL",
                ),
            ],
        }
    }

    /// Builds a catalog from explicit entries
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, an entry has an empty field,
    /// or two entries share a key, column or id prefix.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, String> {
        if entries.is_empty() {
            return Err("catalog must contain at least one measurement".to_string());
        }

        let mut keys = HashSet::new();
        let mut columns = HashSet::new();
        let mut prefixes = HashSet::new();
        for entry in &entries {
            entry.validate()?;
            if !keys.insert(entry.key.as_str()) {
                return Err(format!("duplicate catalog key '{}'", entry.key));
            }
            if !columns.insert(entry.column()) {
                return Err(format!("duplicate catalog column '{}'", entry.column()));
            }
            if !prefixes.insert(entry.id_prefix.as_str()) {
                return Err(format!("duplicate catalog id_prefix '{}'", entry.id_prefix));
            }
        }

        Ok(Self { entries })
    }

    /// Uses configured entries when present, the built-in table otherwise
    pub fn from_entries(entries: Option<&[CatalogEntry]>) -> Result<Self, String> {
        match entries {
            Some(entries) => Self::new(entries.to_vec()),
            None => Ok(Self::builtin()),
        }
    }

    /// Looks up an entry by measurement key
    pub fn lookup(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MeasurementCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_and_codes() {
        let catalog = MeasurementCatalog::builtin();
        let keys: Vec<&str> = catalog.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["RBC", "WBC", "HB"]);

        let rbc = catalog.lookup("RBC").unwrap();
        assert_eq!(rbc.code, "789-8");
        assert_eq!(rbc.unit_code, "10*6/uL");
        assert_eq!(rbc.id_prefix, "rbc-");

        let wbc = catalog.lookup("WBC").unwrap();
        assert_eq!(wbc.code, "6690-2");
        assert_eq!(wbc.unit_code, "10*3/uL");

        assert!(catalog.lookup("PLT").is_none());
        assert_eq!(catalog.len(), 3);
        assert!(MeasurementCatalog::new(catalog.entries().to_vec()).is_ok());
    }

    #[test]
    fn test_entry_defaults() {
        let entry = CatalogEntry::loinc("HB", "hb-", "718-7", "Hemoglobin", "g/dL");
        assert_eq!(entry.column(), "HB");
        assert_eq!(entry.unit_display(), "g/dL");

        let quantity = entry.quantity(Decimal::parse("13.2").unwrap());
        assert_eq!(quantity.unit, "g/dL");
        assert_eq!(quantity.code, "g/dL");
        assert_eq!(quantity.system, UCUM_SYSTEM);

        let coding = entry.coding();
        assert_eq!(coding.system, LOINC_SYSTEM);
        assert_eq!(coding.display.as_deref(), Some("Hemoglobin"));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(MeasurementCatalog::new(vec![]).is_err());
    }

    #[test]
    fn test_duplicate_prefix_rejected() {
        let result = MeasurementCatalog::new(vec![
            CatalogEntry::loinc("HB", "x-", "718-7", "Hemoglobin", "g/dL"),
            CatalogEntry::loinc("HCT", "x-", "4544-3", "Hematocrit", "%"),
        ]);
        assert!(result.unwrap_err().contains("duplicate catalog id_prefix"));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = MeasurementCatalog::new(vec![
            CatalogEntry::loinc("HB", "hb-", "718-7", "Hemoglobin", "g/dL"),
            CatalogEntry::loinc("HB", "hb2-", "718-7", "Hemoglobin", "g/dL"),
        ]);
        assert!(result.unwrap_err().contains("duplicate catalog key"));
    }

    #[test]
    fn test_empty_field_rejected() {
        let result = MeasurementCatalog::new(vec![CatalogEntry::loinc(
            "HB", "hb-", "", "Hemoglobin", "g/dL",
        )]);
        assert!(result.unwrap_err().contains("code cannot be empty"));
    }

    #[test]
    fn test_from_entries_falls_back_to_builtin() {
        let catalog = MeasurementCatalog::from_entries(None).unwrap();
        assert_eq!(catalog, MeasurementCatalog::builtin());

        let custom = vec![CatalogEntry::loinc(
            "PLT",
            "plt-",
            "777-3",
            "Platelets [#/volume] in Blood by Automated count",
            "10*3/uL",
        )];
        let catalog = MeasurementCatalog::from_entries(Some(&custom)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.lookup("PLT").is_some());
    }

    #[test]
    fn test_entry_deserializes_with_defaults() {
        let entry: CatalogEntry = toml::from_str(
            r#"
key = "PLT"
id_prefix = "plt-"
code = "777-3"
display = "Platelets"
unit_code = "10*3/uL"
"#,
        )
        .unwrap();
        assert_eq!(entry.code_system, LOINC_SYSTEM);
        assert_eq!(entry.unit_system, UCUM_SYSTEM);
        assert_eq!(entry.column(), "PLT");
    }
}
