// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas configuration.
//!
//! Sizes are in canvas units. The configuration is plain data that can be
//! read from and written to RON; missing fields take their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// RON parse error
    #[error("Failed to parse canvas config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("Failed to serialize canvas config: {0}")]
    Serialize(#[from] ron::Error),

    /// A value is out of range
    #[error("Invalid canvas config: {0}")]
    Invalid(String),
}

/// Layout, hit-testing and interaction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Grid size used to snap rendered node positions
    pub grid_size: f32,
    /// Width and height of a node's body
    pub node_size: f32,
    /// Height of the name label below the body
    pub text_height: f32,
    /// Width of the output hit-zone at the trailing edge
    pub output_zone_width: f32,
    /// Height of one input port slot
    pub port_height: f32,
    /// Gap between port slots
    pub port_margin: f32,
    /// Distance above the body's bottom edge where the label area starts
    pub label_hit_margin: f32,
    /// Offset applied to pasted nodes
    pub paste_offset: f32,
    /// Maximum distance from a connection that still hits it
    pub connection_hit_tolerance: f32,
    /// Minimum camera zoom
    pub min_zoom: f32,
    /// Maximum camera zoom
    pub max_zoom: f32,
    /// Filter candidate ports by type instead of offering every input
    pub type_checked_ports: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            grid_size: 20.0,
            node_size: 70.0,
            text_height: 14.0,
            output_zone_width: 20.0,
            port_height: 7.0,
            port_margin: 1.0,
            label_hit_margin: 4.0,
            paste_offset: 5.0,
            connection_hit_tolerance: 5.0,
            min_zoom: 0.2,
            max_zoom: 1.0,
            type_checked_ports: false,
        }
    }
}

impl CanvasConfig {
    /// Parse a configuration from RON and validate it
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Check that sizes are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size.is_nan() || self.grid_size <= 0.0 {
            return Err(ConfigError::Invalid(format!("grid_size must be positive, got {}", self.grid_size)));
        }
        if self.node_size.is_nan() || self.node_size <= 0.0 {
            return Err(ConfigError::Invalid(format!("node_size must be positive, got {}", self.node_size)));
        }
        if self.output_zone_width < 0.0 || self.output_zone_width > self.node_size {
            return Err(ConfigError::Invalid(format!(
                "output_zone_width must be within 0..={}, got {}",
                self.node_size, self.output_zone_width
            )));
        }
        if self.port_height < 0.0 || self.port_margin < 0.0 {
            return Err(ConfigError::Invalid("port sizes cannot be negative".to_string()));
        }
        if self.min_zoom.is_nan() || self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "zoom range {}..{} is empty",
                self.min_zoom, self.max_zoom
            )));
        }
        Ok(())
    }

    /// Full height of a node including its label
    pub fn node_height(&self) -> f32 {
        self.node_size + self.text_height
    }
}
