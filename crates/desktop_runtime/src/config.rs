//! Typed window-manager tuning loaded from TOML.
//!
//! Every field has a default, so an empty document (or no file at all) yields the stock desktop
//! behaviour. Semantic validation runs after deserialization.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::QUADRANT_GUTTER;
use crate::model::{ScreenMetrics, DEFAULT_TASKBAR_HEIGHT};
use crate::snap_zone::{SnapZoneThresholds, DEFAULT_CORNER_SIZE, DEFAULT_EDGE_BAND};
use crate::throttle::DEFAULT_FRAME_INTERVAL_MS;

pub const MIN_WINDOW_WIDTH: f64 = 200.0;
pub const MIN_WINDOW_HEIGHT: f64 = 150.0;
pub const OVERLAY_DELAY_MS: u64 = 100;
pub const TASKBAR_PREVIEW_DISMISS_MS: u64 = 220;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WmConfig {
    pub taskbar_height: f64,
    pub min_window_width: f64,
    pub min_window_height: f64,
    pub quadrant_gutter: f64,
    pub corner_size: f64,
    pub edge_band: f64,
    pub overlay_delay_ms: u64,
    pub frame_interval_ms: u64,
    pub taskbar_preview_dismiss_ms: u64,
}

impl Default for WmConfig {
    fn default() -> Self {
        Self {
            taskbar_height: DEFAULT_TASKBAR_HEIGHT,
            min_window_width: MIN_WINDOW_WIDTH,
            min_window_height: MIN_WINDOW_HEIGHT,
            quadrant_gutter: QUADRANT_GUTTER,
            corner_size: DEFAULT_CORNER_SIZE,
            edge_band: DEFAULT_EDGE_BAND,
            overlay_delay_ms: OVERLAY_DELAY_MS,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            taskbar_preview_dismiss_ms: TASKBAR_PREVIEW_DISMISS_MS,
        }
    }
}

impl WmConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let body = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&body)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("taskbar_height", self.taskbar_height),
            ("min_window_width", self.min_window_width),
            ("min_window_height", self.min_window_height),
            ("quadrant_gutter", self.quadrant_gutter),
            ("corner_size", self.corner_size),
            ("edge_band", self.edge_band),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    message: format!("expected a finite non-negative number, got {value}"),
                });
            }
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "frame_interval_ms",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn snap_thresholds(&self) -> SnapZoneThresholds {
        SnapZoneThresholds {
            corner_size: self.corner_size,
            edge_band: self.edge_band,
        }
    }

    pub fn screen(&self, width: f64, height: f64) -> ScreenMetrics {
        ScreenMetrics::new(width, height, self.taskbar_height)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(WmConfig::from_toml_str("").unwrap(), WmConfig::default());
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config = WmConfig::from_toml_str("corner_size = 120.0\noverlay_delay_ms = 50\n")
            .expect("parse config");
        assert_eq!(config.corner_size, 120.0);
        assert_eq!(config.overlay_delay_ms, 50);
        assert_eq!(config.edge_band, DEFAULT_EDGE_BAND);
    }

    #[test]
    fn rejects_zero_frame_interval() {
        let err = WmConfig::from_toml_str("frame_interval_ms = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "frame_interval_ms",
                ..
            }
        ));
    }

    #[test]
    fn rejects_negative_sizes_and_unknown_keys() {
        assert!(matches!(
            WmConfig::from_toml_str("edge_band = -1.0"),
            Err(ConfigError::Invalid {
                field: "edge_band",
                ..
            })
        ));
        assert!(matches!(
            WmConfig::from_toml_str("snap_everything = true"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = WmConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
