// Dashboard configuration - optional JSON file under the user config directory
use crate::error::{DashError, DashResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Width at which scenario labels wrap in the bar chart
    pub label_width: usize,
    /// Bar length in cells for the largest value
    pub bar_width: usize,
    /// Scenario cards per row
    pub card_columns: usize,
    /// Inner width of a scenario card
    pub card_width: usize,
    /// desc, asc or original
    pub default_sort: String,
    /// Dataset file used instead of the built-in tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            label_width: 32,
            bar_width: 40,
            card_columns: 3,
            card_width: 34,
            default_sort: "desc".to_string(),
            data_file: None,
        }
    }
}

impl DashConfig {
    /// Load from the default location; a missing file means defaults
    pub fn load() -> DashResult<Self> {
        match Self::config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> DashResult<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: DashConfig =
            serde_json::from_str(&content).map_err(|source| DashError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `<config dir>/scenario-dash/config.json`
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|dir| dir.join("scenario-dash").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, DashConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"label_width": 24, "default_sort": "asc"}"#).unwrap();

        let config = DashConfig::load_from(&path).unwrap();
        assert_eq!(config.label_width, 24);
        assert_eq!(config.default_sort, "asc");
        assert_eq!(config.bar_width, 40);
        assert!(config.data_file.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "label_width = 24").unwrap();

        assert!(matches!(
            DashConfig::load_from(&path),
            Err(DashError::ConfigParse { .. })
        ));
    }
}
