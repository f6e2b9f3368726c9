//! Engine configuration.
//!
//! Every field has a default matching the editor's stock look, so a config
//! file only needs to name what it changes.

use crate::diagram::Color;
use crate::error::{EngineError, EngineResult};
use crate::geometry::DEFAULT_EDGE_TOLERANCE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hit tolerance for "pointer is on a circle's outline".
    pub edge_tolerance: f64,
    /// Colour every overlap region starts each pass with.
    pub base_color: Color,
    /// Colour applied to chosen circles and regions.
    pub highlight_color: Color,
    /// Fill given to newly added circles.
    pub circle_fill: Color,
    pub outline_width: f64,
    pub outline_selected: Color,
    pub outline_unselected: Color,
    /// Radius used when a circle is added without one.
    pub default_radius: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            edge_tolerance: DEFAULT_EDGE_TOLERANCE,
            base_color: Color::BLACK,
            highlight_color: Color::GREEN,
            circle_fill: Color::TRANSPARENT,
            outline_width: 5.0,
            outline_selected: Color::WHITE,
            outline_unselected: Color::GREY,
            default_radius: 100.0,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON config document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !self.edge_tolerance.is_finite() || self.edge_tolerance <= 0.0 {
            return Err(EngineError::Config(format!(
                "edge_tolerance must be positive, got {}",
                self.edge_tolerance
            )));
        }
        if !self.outline_width.is_finite() || self.outline_width < 0.0 {
            return Err(EngineError::Config(format!(
                "outline_width must be non-negative, got {}",
                self.outline_width
            )));
        }
        if !self.default_radius.is_finite() || self.default_radius <= 0.0 {
            return Err(EngineError::Config(format!(
                "default_radius must be positive, got {}",
                self.default_radius
            )));
        }
        if self.highlight_color == self.base_color {
            return Err(EngineError::Config(
                "highlight_color must differ from base_color".to_string(),
            ));
        }
        Ok(())
    }
}
