//! Prism configuration file handling
//!
//! `prism.toml` is optional. Every field has a default, so a missing file
//! and an empty file behave the same.

use anyhow::{Context, Result};
use prism_core::{Tolerance, ToleranceType, STANDARD_FLATTENING_TOLERANCE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "prism.toml";

/// Configuration stored in prism.toml
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct PrismConfig {
    #[serde(default)]
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Curve flattening settings
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct GeometryConfig {
    #[serde(default = "default_tolerance")]
    pub flattening_tolerance: f64,
    #[serde(default)]
    pub tolerance_type: ToleranceTypeConfig,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            flattening_tolerance: default_tolerance(),
            tolerance_type: ToleranceTypeConfig::default(),
        }
    }
}

fn default_tolerance() -> f64 {
    STANDARD_FLATTENING_TOLERANCE
}

#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToleranceTypeConfig {
    #[default]
    Absolute,
    Relative,
}

impl From<ToleranceTypeConfig> for ToleranceType {
    fn from(value: ToleranceTypeConfig) -> Self {
        match value {
            ToleranceTypeConfig::Absolute => ToleranceType::Absolute,
            ToleranceTypeConfig::Relative => ToleranceType::Relative,
        }
    }
}

/// Log output settings
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `--verbose` is not given
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

impl PrismConfig {
    /// Load prism.toml from a directory, falling back to defaults
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load(&config_path)
    }

    /// Load an explicit configuration file
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Flattening tolerance for bounds and hit testing
    pub fn tolerance(&self) -> Tolerance {
        Tolerance {
            value: self.geometry.flattening_tolerance,
            kind: self.geometry.tolerance_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = PrismConfig::from_toml("").unwrap();
        assert_eq!(config, PrismConfig::default());
        assert_eq!(config.tolerance(), Tolerance::default());
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_relative_tolerance() {
        let config = PrismConfig::from_toml(
            r#"
            [geometry]
            flattening_tolerance = 0.01
            tolerance_type = "relative"

            [logging]
            filter = "prism_render=trace"
            "#,
        )
        .unwrap();

        assert_eq!(config.tolerance(), Tolerance::relative(0.01));
        assert_eq!(config.logging.filter, "prism_render=trace");
    }

    #[test]
    fn test_unknown_tolerance_type_is_rejected() {
        let result = PrismConfig::from_toml(
            r#"
            [geometry]
            tolerance_type = "fuzzy"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = PrismConfig::load_from_dir(Path::new("/nonexistent/prism")).unwrap();
        assert_eq!(config, PrismConfig::default());
    }
}
