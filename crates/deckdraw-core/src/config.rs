//! Editor configuration.

use crate::history::MAX_UNDO_HISTORY;
use crate::shapes::SerializableColor;
use crate::snap::SnapConfig;
use crate::style::StyleConfig;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating an [`EditorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Editor configuration. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub snap: SnapConfig,
    pub background_color: SerializableColor,
    /// Maximum snapshots kept by the history (0 = unbounded).
    pub history_limit: usize,
    pub style: StyleConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            canvas_height: 800.0,
            snap: SnapConfig::default(),
            background_color: SerializableColor::white(),
            history_limit: MAX_UNDO_HISTORY,
            style: StyleConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("Loading config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.canvas_width) || !positive(self.canvas_height) {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if !self.snap.threshold.is_finite() || self.snap.threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "snap threshold must be non-negative, got {}",
                self.snap.threshold
            )));
        }
        if !self.snap.grid_size.is_finite() {
            return Err(ConfigError::Invalid("grid size must be finite".to_string()));
        }
        if !(0.0..=1.0).contains(&self.style.opacity) {
            return Err(ConfigError::Invalid(format!(
                "opacity must be within 0..=1, got {}",
                self.style.opacity
            )));
        }
        if !self.style.font_size.is_finite() || self.style.font_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "font size must be positive, got {}",
                self.style.font_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.canvas_size(), Size::new(1200.0, 800.0));
        assert_eq!(config.snap.grid_size, 5.0);
        assert_eq!(config.snap.threshold, 5.0);
        assert_eq!(config.history_limit, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(
            r##"{"canvas_width": 800, "snap": {"threshold": 8}, "background_color": "#000"}"##,
        )
        .unwrap();
        assert_eq!(config.canvas_width, 800.0);
        assert_eq!(config.canvas_height, 800.0);
        assert_eq!(config.snap.threshold, 8.0);
        assert_eq!(config.snap.grid_size, 5.0);
        assert_eq!(config.background_color, SerializableColor::black());
    }

    #[test]
    fn test_invalid_values() {
        let err = EditorConfig::from_json(r#"{"canvas_width": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EditorConfig::from_json(r#"{"snap": {"threshold": -1}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EditorConfig::from_json(r#"{"style": {"opacity": 2}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = EditorConfig::from_json(r#"{"background_color": "blue"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r##"{{"history_limit": 10, "style": {{"fill_color": "#ff0000"}}}}"##).unwrap();

        let config = EditorConfig::load(file.path()).unwrap();
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.style.fill_color, SerializableColor::new(255, 0, 0, 255));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EditorConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
