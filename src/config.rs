//! File configuration.
//!
//! Every section is optional; missing keys fall back to the defaults the
//! scanner was tuned with.

use crate::color::{ClassifierKind, HsvRules};
use crate::detection::FilterConfig;
use crate::scan::StabilizerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Classifier selection and its rule table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Strategy to use.
    pub kind: ClassifierKind,
    /// Rules for the HSV strategy.
    pub hsv: HsvRules,
}

impl ClassifierConfig {
    /// Validates the HSV rule table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let white = &self.hsv.white;
        if !(0.0..=1.0).contains(&white.s_max) || !(0.0..=1.0).contains(&white.v_min) {
            return Err(ConfigError::Invalid("white rule outside [0, 1]".into()));
        }
        for rule in &self.hsv.colors {
            if rule.hue.is_empty() {
                return Err(ConfigError::Invalid(format!("{} has no hue range", rule.color)));
            }
            if rule.hue.iter().any(|r| r.min > r.max) {
                return Err(ConfigError::Invalid(format!("{} has an inverted hue range", rule.color)));
            }
        }
        Ok(())
    }
}

/// Demo binary settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Frames each face stays in view.
    pub frames_per_face: usize,
    /// Moves in the generated scramble.
    pub scramble_length: usize,
    /// Scramble seed.
    pub seed: u64,
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            frames_per_face: 12,
            scramble_length: 20,
            seed: 1,
            metrics_port: 0,
        }
    }
}

/// Full configuration file format.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Candidate filter thresholds.
    pub filter: FilterConfig,
    /// Temporal stabilizer settings.
    pub stabilizer: StabilizerConfig,
    /// Color classification.
    pub classifier: ClassifierConfig,
    /// Demo settings.
    pub output: OutputConfig,
}

impl FileConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.filter.validate()?;
        self.stabilizer.validate()?;
        self.classifier.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(FileConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = FileConfig::from_toml("").unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = FileConfig::from_toml(
            r#"
            [filter]
            dedup_distance = 25.0

            [stabilizer]
            cooldown_ms = 500

            [classifier]
            kind = "hsv"
            "#,
        )
        .unwrap();
        assert_eq!(config.filter.dedup_distance, 25.0);
        assert_eq!(config.filter.min_area, 1000.0);
        assert_eq!(config.stabilizer.cooldown_ms, 500);
        assert_eq!(config.classifier.kind, ClassifierKind::Hsv);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = FileConfig::from_toml(
            r#"
            [stabilizer]
            history_capacity = 3
            min_valid_samples = 5
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            FileConfig::from_toml("[filter"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            FileConfig::from_file("/nonexistent/cube-scan.toml"),
            Err(ConfigError::FileReadError(_))
        ));
    }
}
