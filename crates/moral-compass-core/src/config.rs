//! Configuration for compass projection and reporting.
//!
//! Every field has a default, so an empty YAML document is a valid config.
//!
//! ```yaml
//! canvas:
//!   width: 400
//!   height: 400
//! geometry:
//!   axis_margin: 20
//!   arrow_margin: 40
//! blend:
//!   decision: 0.6
//!   philosophy: 0.4
//! determinism:
//!   evaluated_at: "2025-12-20T10:00:00Z"
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::compass::Canvas;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompassConfig {
    /// Default drawing surface for compass layouts
    #[serde(default)]
    pub canvas: Canvas,

    /// Margins and marker sizes for the compass drawing
    #[serde(default)]
    pub geometry: GeometryConfig,

    /// How goodness and philosophy scores combine into the compass direction
    #[serde(default)]
    pub blend: BlendWeights,

    /// Determinism configuration
    #[serde(default)]
    pub determinism: DeterminismConfig,
}

impl CompassConfig {
    /// Parse and validate a config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: CompassConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Check that every numeric setting is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.canvas.width > 0.0 && self.canvas.height > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "canvas must have positive size, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }

        let lengths = [
            ("geometry.axis_margin", self.geometry.axis_margin),
            ("geometry.arrow_margin", self.geometry.arrow_margin),
            ("geometry.label_offset", self.geometry.label_offset),
            ("geometry.arrowhead_size", self.geometry.arrowhead_size),
            ("blend.decision", self.blend.decision),
            ("blend.philosophy", self.blend.philosophy),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be a finite, non-negative number, got {}",
                    field, value
                )));
            }
        }

        Ok(())
    }
}

/// Margins and marker sizes, in canvas units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Gap between the dimension axes' full length and the canvas edge
    #[serde(default = "default_axis_margin")]
    pub axis_margin: f64,

    /// Gap between the goodness arrow's tip and the canvas edge
    #[serde(default = "default_arrow_margin")]
    pub arrow_margin: f64,

    /// Distance of dimension labels beyond the axis end
    #[serde(default = "default_label_offset")]
    pub label_offset: f64,

    /// Length of the arrowhead's sides
    #[serde(default = "default_arrowhead_size")]
    pub arrowhead_size: f64,
}

fn default_axis_margin() -> f64 {
    20.0
}

fn default_arrow_margin() -> f64 {
    40.0
}

fn default_label_offset() -> f64 {
    20.0
}

fn default_arrowhead_size() -> f64 {
    15.0
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            axis_margin: 20.0,
            arrow_margin: 40.0,
            label_offset: 20.0,
            arrowhead_size: 15.0,
        }
    }
}

/// Weights for the blended compass direction.
///
/// `combined = goodness * decision + mean(philosophy scores) * philosophy`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BlendWeights {
    #[serde(default = "default_decision_weight")]
    pub decision: f64,

    #[serde(default = "default_philosophy_weight")]
    pub philosophy: f64,
}

fn default_decision_weight() -> f64 {
    0.6
}

fn default_philosophy_weight() -> f64 {
    0.4
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            decision: 0.6,
            philosophy: 0.4,
        }
    }
}

/// Determinism configuration for reproducible reports.
///
/// When `evaluated_at` is set, reports carry that timestamp instead of the
/// current system time. Use it for golden files and replay.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeterminismConfig {
    /// Fixed timestamp, ISO 8601 (e.g. "2025-12-20T10:00:00Z")
    #[serde(default)]
    pub evaluated_at: Option<DateTime<Utc>>,
}
