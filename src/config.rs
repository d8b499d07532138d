//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! draft-config.toml file: the reference points drafts are computed for, the
//! minimum draft drawn on the charts, and the default chart window.

use crate::points::{display_label, ReferencePointRegistry};
use crate::range::DEFAULT_WINDOW_HOURS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "draft-config.toml";

/// Application configuration loaded from draft-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Chart and threshold settings
    pub display: DisplayConfig,
    /// Seabed points, in display order
    #[serde(default)]
    pub points: Vec<PointConfig>,
}

/// Chart and threshold settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Minimum draft in meters, drawn as a threshold line only
    pub min_draft: f64,
    /// Length of the default chart window in hours
    pub window_hours: i64,
}

/// One seabed reference point
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PointConfig {
    /// Short name; the displayed label adds the elevation
    pub name: String,
    /// Elevation in meters relative to LAT
    pub elevation: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            display: DisplayConfig {
                min_draft: 2.85,
                window_hours: DEFAULT_WINDOW_HOURS,
            },
            points: vec![
                PointConfig {
                    name: "Barra de Arena".to_string(),
                    elevation: -1.40,
                },
                PointConfig {
                    name: "CPT-NS-01".to_string(),
                    elevation: -3.20,
                },
                PointConfig {
                    name: "CPT-NS-02".to_string(),
                    elevation: -1.76,
                },
            ],
        }
    }
}

impl Config {
    /// Load configuration from draft-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        points = config.points.len(),
                        "loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }

    /// Registry of the configured points, labelled with their elevation
    pub fn registry(&self) -> ReferencePointRegistry {
        self.points
            .iter()
            .map(|p| (display_label(&p.name, p.elevation), p.elevation))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.min_draft, 2.85);
        assert_eq!(config.display.window_hours, 24);
        assert_eq!(config.points.len(), 3);
        assert_eq!(config.points[1].name, "CPT-NS-01");
        assert_eq!(config.points[1].elevation, -3.20);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_custom_points() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            r#"
[display]
min_draft = 3.0
window_hours = 12

[[points]]
name = "Quay"
elevation = -4.5
"#,
        )
        .unwrap();

        let config = Config::load_from_path(file.path());
        assert_eq!(config.display.min_draft, 3.0);
        assert_eq!(config.display.window_hours, 12);
        assert_eq!(config.points.len(), 1);

        let registry = config.registry();
        assert_eq!(registry.all()[0].name, "Quay (-4.50 m LAT)");
        assert_eq!(registry.all()[0].elevation, -4.5);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "display = 'nope'").unwrap();
        assert_eq!(Config::load_from_path(file.path()), Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.display.min_draft = 4.25;

        config.save_to_path(file.path()).unwrap();
        assert_eq!(Config::load_from_path(file.path()), config);
    }

    #[test]
    fn test_registry_keeps_order() {
        let registry = Config::default().registry();
        let names: Vec<_> = registry.all().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Barra de Arena (-1.40 m LAT)",
                "CPT-NS-01 (-3.20 m LAT)",
                "CPT-NS-02 (-1.76 m LAT)"
            ]
        );
    }
}
