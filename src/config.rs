//! Application configuration, read from an optional JSON file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "wine_explorer.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// ZIP archive holding the dataset.
    pub archive_path: PathBuf,
    /// Archive member with the delimited data.
    pub member_name: String,
    /// Directory receiving the rendered charts.
    pub output_dir: PathBuf,
    pub head_rows: usize,
    pub histogram_bins: usize,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Open each chart with the system image viewer once written.
    pub open_charts: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            archive_path: PathBuf::from("wine.zip"),
            member_name: "wine.data".to_string(),
            output_dir: PathBuf::from("plots"),
            head_rows: 5,
            histogram_bins: 30,
            chart_width: 1000,
            chart_height: 600,
            open_charts: false,
        }
    }
}

impl AppConfig {
    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.archive_path, PathBuf::from("wine.zip"));
        assert_eq!(config.member_name, "wine.data");
        assert_eq!(config.histogram_bins, 30);
    }

    #[test]
    fn partial_file_overrides_named_fields_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "output_dir": "charts", "open_charts": true }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("charts"));
        assert!(config.open_charts);
        assert_eq!(config.head_rows, 5);
    }

    #[test]
    fn malformed_file_is_rejected() {
        assert!(matches!(
            AppConfig::from_json("{ head_rows: 5"),
            Err(ConfigError::Parse(_))
        ));
    }
}
