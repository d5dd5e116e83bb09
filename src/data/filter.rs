use std::fmt;

use super::model::{Dataset, LaunchRecord};

// ---------------------------------------------------------------------------
// Selection state: which site and which payload window
// ---------------------------------------------------------------------------

/// Value of the site dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteSelection {
    /// Every launch site (dropdown value `"ALL"`).
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    pub const ALL_VALUE: &'static str = "ALL";

    /// Parse a dropdown value; `"ALL"` is the sentinel for every site.
    pub fn from_value(value: &str) -> Self {
        if value == Self::ALL_VALUE {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    /// The dropdown value this selection corresponds to.
    pub fn value(&self) -> &str {
        match self {
            SiteSelection::All => Self::ALL_VALUE,
            SiteSelection::Site(s) => s,
        }
    }

    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(s) => s == site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Inclusive payload window `[lo, hi]` in kilograms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    pub lo: f64,
    pub hi: f64,
}

impl PayloadRange {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, payload: f64) -> bool {
        self.lo <= payload && payload <= self.hi
    }
}

/// Current values of both input controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub site: SiteSelection,
    pub range: PayloadRange,
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Rows whose payload lies in `range` and, unless `site` is `All`, whose
/// launch site equals the selected one.  Source order is preserved.
pub fn filter<'a>(
    dataset: &'a Dataset,
    site: &SiteSelection,
    range: &PayloadRange,
) -> Vec<&'a LaunchRecord> {
    dataset
        .records()
        .iter()
        .filter(|rec| range.contains(rec.payload_mass_kg) && site.matches(&rec.launch_site))
        .collect()
}
