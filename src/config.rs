use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Optional settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "spacex_dash.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// One entry of the site dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SiteOption {
    pub label: String,
    pub value: String,
}

impl SiteOption {
    fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// Startup settings.  Every field may be omitted from the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Launch table read once at startup.
    pub data_path: PathBuf,
    pub title: String,
    pub window_size: [f32; 2],
    /// Lower bound of the payload slider.
    pub payload_lower_bound: f64,
    /// Launch sites offered besides "All Sites"; the data may not name others.
    pub sites: Vec<SiteOption>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("spacex_launch_dash.csv"),
            title: "SpaceX Launches".to_string(),
            window_size: [1200.0, 900.0],
            payload_lower_bound: 0.0,
            sites: vec![
                SiteOption::new("Cape Canaveral Space Force Station LC-40", "CCAFS LC-40"),
                SiteOption::new("Cape Canaveral Space Force Station SLC-40", "CCAFS SLC-40"),
                SiteOption::new("Kennedy Space Center LC-39A", "KSC LC-39A"),
                SiteOption::new("Vandenberg AFB SLC-4E", "VAFB SLC-4E"),
            ],
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DashboardConfig {
    /// Read `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No {} found, using default settings", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Dropdown values of the configured sites.
    pub fn site_values(&self) -> Vec<&str> {
        self.sites.iter().map(|s| s.value.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = DashboardConfig::load_or_default(Path::new("no/such/spacex_dash.json")).unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(
            cfg.site_values(),
            vec!["CCAFS LC-40", "CCAFS SLC-40", "KSC LC-39A", "VAFB SLC-4E"]
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"data_path": "data/launches.parquet", "title": "Launches"}}"#).unwrap();
        let cfg = DashboardConfig::load_or_default(file.path()).unwrap();
        assert_eq!(cfg.data_path, PathBuf::from("data/launches.parquet"));
        assert_eq!(cfg.title, "Launches");
        assert_eq!(cfg.sites.len(), 4);
        assert_eq!(cfg.payload_lower_bound, 0.0);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            DashboardConfig::load_or_default(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
