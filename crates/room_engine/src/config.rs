use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::placement::StackLimits;

/// Numeric and behavioural tuning for a room session. No UI bindings live here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub default_zoom: f64,
    pub zoom_step_factor: f64,
    pub zoom_epsilon: f64,
    pub stack_unit: f64,
    pub max_stack_z: f64,
    pub stack_epsilon: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub visual_speed_tiles_per_second: f64,
    pub arrival_epsilon: f64,
    pub pan_threshold_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.5,
            max_zoom: 3.0,
            default_zoom: 1.0,
            zoom_step_factor: 1.1,
            zoom_epsilon: 1e-6,
            stack_unit: 1.0,
            max_stack_z: 40.0,
            stack_epsilon: 1e-4,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            visual_speed_tiles_per_second: 4.0,
            arrival_epsilon: 0.01,
            pan_threshold_px: 4.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse engine config: {message}")]
    Parse { message: String },
    #[error("invalid engine config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parse errors name the offending JSON path.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config: Self = serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            let path = error.path().to_string();
            let source = error.into_inner();
            let message = if path.is_empty() || path == "." {
                format!("parse config json: {source}")
            } else {
                format!("parse config json at {path}: {source}")
            };
            ConfigError::Parse { message }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("default_zoom", self.default_zoom),
            ("zoom_step_factor", self.zoom_step_factor),
            ("stack_unit", self.stack_unit),
            ("max_stack_z", self.max_stack_z),
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
            ("visual_speed_tiles_per_second", self.visual_speed_tiles_per_second),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a finite number greater than zero",
                });
            }
        }

        let non_negative = [
            ("zoom_epsilon", self.zoom_epsilon),
            ("stack_epsilon", self.stack_epsilon),
            ("arrival_epsilon", self.arrival_epsilon),
            ("pan_threshold_px", self.pan_threshold_px),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a finite number of at least zero",
                });
            }
        }

        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid {
                field: "min_zoom",
                reason: "must not exceed max_zoom",
            });
        }
        if self.default_zoom < self.min_zoom || self.default_zoom > self.max_zoom {
            return Err(ConfigError::Invalid {
                field: "default_zoom",
                reason: "must lie within [min_zoom, max_zoom]",
            });
        }
        Ok(())
    }

    pub fn stack_limits(&self) -> StackLimits {
        StackLimits {
            stack_unit: self.stack_unit,
            max_stack_z: self.max_stack_z,
            epsilon: self.stack_epsilon,
        }
    }
}
