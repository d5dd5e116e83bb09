use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use super::loader::LoadError;

// ---------------------------------------------------------------------------
// Column names of the launch table
// ---------------------------------------------------------------------------

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    COL_LAUNCH_SITE,
    COL_PAYLOAD_MASS,
    COL_CLASS,
    COL_BOOSTER_CATEGORY,
];

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    #[serde(rename = "Launch Site")]
    pub launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    pub payload_mass_kg: f64,
    /// Outcome: 1 = success, 0 = failure.
    #[serde(rename = "class", deserialize_with = "deserialize_class")]
    pub class: u8,
    #[serde(rename = "Booster Version Category")]
    pub booster_version_category: String,
}

/// Interpret a numeric outcome cell. Integral floats (`1.0`) are accepted,
/// anything other than 0 or 1 is not.
pub fn class_from_number(value: f64) -> Option<u8> {
    if value == 0.0 {
        Some(0)
    } else if value == 1.0 {
        Some(1)
    } else {
        None
    }
}

fn deserialize_class<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = f64::deserialize(deserializer)?;
    class_from_number(value)
        .ok_or_else(|| serde::de::Error::custom(format!("class must be 0 or 1, got {value}")))
}

impl LaunchRecord {
    #[cfg(test)]
    pub fn new(site: &str, payload_mass_kg: f64, class: u8, booster: &str) -> Self {
        Self {
            launch_site: site.to_string(),
            payload_mass_kg,
            class,
            booster_version_category: booster.to_string(),
        }
    }

    /// Check the per-row invariants. `row` is only used for the error message.
    pub fn validate(&self, row: usize) -> Result<(), LoadError> {
        if !self.payload_mass_kg.is_finite() || self.payload_mass_kg < 0.0 {
            return Err(LoadError::InvalidRow {
                row,
                message: format!(
                    "payload mass {} is not a non-negative number",
                    self.payload_mass_kg
                ),
            });
        }
        if self.class > 1 {
            return Err(LoadError::InvalidRow {
                row,
                message: format!("class must be 0 or 1, got {}", self.class),
            });
        }
        if self.launch_site.trim().is_empty() {
            return Err(LoadError::InvalidRow {
                row,
                message: "empty launch site".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed launch table with pre-computed extremes and category sets.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<LaunchRecord>,
    min_payload: f64,
    max_payload: f64,
    /// Distinct launch sites, sorted.
    pub sites: BTreeSet<String>,
    /// Distinct booster version categories, sorted.
    pub booster_categories: BTreeSet<String>,
}

impl Dataset {
    /// Build the dataset and its derived attributes from validated rows.
    pub fn from_records(records: Vec<LaunchRecord>) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::Empty);
        }
        for (row, rec) in records.iter().enumerate() {
            rec.validate(row)?;
        }

        let mut min_payload = f64::INFINITY;
        let mut max_payload = f64::NEG_INFINITY;
        let mut sites = BTreeSet::new();
        let mut booster_categories = BTreeSet::new();

        for rec in &records {
            min_payload = min_payload.min(rec.payload_mass_kg);
            max_payload = max_payload.max(rec.payload_mass_kg);
            sites.insert(rec.launch_site.clone());
            booster_categories.insert(rec.booster_version_category.clone());
        }

        Ok(Dataset {
            records,
            min_payload,
            max_payload,
            sites,
            booster_categories,
        })
    }

    /// Fail if any row names a site outside `known`.
    pub fn validate_sites<S: AsRef<str>>(&self, known: &[S]) -> Result<(), LoadError> {
        for (row, rec) in self.records.iter().enumerate() {
            if !known.iter().any(|k| k.as_ref() == rec.launch_site) {
                return Err(LoadError::UnknownSite {
                    row,
                    site: rec.launch_site.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn min_payload(&self) -> f64 {
        self.min_payload
    }

    pub fn max_payload(&self) -> f64 {
        self.max_payload
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_and_categories() {
        let ds = Dataset::from_records(vec![
            LaunchRecord::new("A", 500.0, 1, "v1.0"),
            LaunchRecord::new("A", 2000.0, 0, "FT"),
            LaunchRecord::new("B", 1000.0, 1, "FT"),
        ])
        .unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.min_payload(), 500.0);
        assert_eq!(ds.max_payload(), 2000.0);
        assert_eq!(ds.sites.len(), 2);
        assert_eq!(
            ds.booster_categories.iter().cloned().collect::<Vec<_>>(),
            vec!["FT".to_string(), "v1.0".to_string()]
        );
    }

    #[test]
    fn empty_is_rejected() {
        assert!(matches!(Dataset::from_records(Vec::new()), Err(LoadError::Empty)));
    }

    #[test]
    fn bad_rows_are_rejected() {
        let err = Dataset::from_records(vec![
            LaunchRecord::new("A", 500.0, 1, "FT"),
            LaunchRecord::new("A", -1.0, 1, "FT"),
        ])
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidRow { row: 1, .. }));

        let err = Dataset::from_records(vec![LaunchRecord::new("A", 5.0, 2, "FT")]).unwrap_err();
        assert!(matches!(err, LoadError::InvalidRow { row: 0, .. }));
    }

    #[test]
    fn unknown_site_is_reported() {
        let ds = Dataset::from_records(vec![
            LaunchRecord::new("KSC LC-39A", 500.0, 1, "FT"),
            LaunchRecord::new("Boca Chica", 500.0, 1, "FT"),
        ])
        .unwrap();
        assert!(ds.validate_sites(&["KSC LC-39A", "Boca Chica"]).is_ok());
        let err = ds.validate_sites(&["KSC LC-39A"]).unwrap_err();
        assert!(matches!(err, LoadError::UnknownSite { row: 1, .. }));
    }
}
