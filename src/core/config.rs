//! Glow overlay configuration.
//!
//! Defaults reproduce the classic orange date-stamp look. A TOML file may
//! override any subset of the fields:
//!
//! ```toml
//! core_color = "#FABD5A"
//! halo_color = [255, 120, 0, 120]
//! halo_spread = 4
//! ```

use crate::core::error::ConfigError;
use crate::core::types::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of the dual-layer glowing text overlay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlowSpec {
    /// Colour of the sharp glyph layer. Alpha is ignored.
    pub core_color: Color,
    /// Colour of the blurred halo layer, alpha applied uniformly.
    pub halo_color: Color,
    /// Font size as a fraction of the image height.
    pub font_size_ratio: f64,
    /// Added to `font_size_ratio` when the preferred font is unavailable,
    /// so the fallback face is always slightly larger.
    pub fallback_size_delta: f64,
    /// Largest halo stamp offset in pixels.
    pub halo_spread: u32,
    /// Gaussian sigma applied to the halo layer.
    pub halo_blur_radius: f32,
    /// Edge padding as a fraction of width (x) and height (y).
    pub padding_ratio: f64,
    /// Preferred font file name or path.
    pub font_name: String,
}

impl Default for GlowSpec {
    fn default() -> Self {
        Self {
            core_color: Color::rgb(250, 189, 90),
            halo_color: Color::new(255, 120, 0, 120),
            font_size_ratio: 0.018,
            fallback_size_delta: 0.01,
            halo_spread: 3,
            halo_blur_radius: 1.5,
            padding_ratio: 0.03,
            font_name: "arial.ttf".to_string(),
        }
    }
}

impl GlowSpec {
    /// Parse glow settings from TOML text and validate them.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let spec: GlowSpec = toml::from_str(text)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Load glow settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Check that every numeric field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |field: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {}", value),
                })
            }
        };

        positive("font_size_ratio", self.font_size_ratio)?;
        positive("fallback_size_delta", self.fallback_size_delta)?;

        if !self.halo_blur_radius.is_finite() || self.halo_blur_radius < 0.0 {
            return Err(ConfigError::Invalid {
                field: "halo_blur_radius",
                reason: format!("must be zero or positive, got {}", self.halo_blur_radius),
            });
        }

        if !self.padding_ratio.is_finite() || !(0.0..0.5).contains(&self.padding_ratio) {
            return Err(ConfigError::Invalid {
                field: "padding_ratio",
                reason: format!("must lie in [0, 0.5), got {}", self.padding_ratio),
            });
        }

        Ok(())
    }

    /// Preferred font size in pixels for an image of the given height.
    pub fn font_size(&self, image_height: u32) -> u32 {
        ((image_height as f64 * self.font_size_ratio).round() as u32).max(1)
    }

    /// Fallback font size in pixels for an image of the given height.
    pub fn fallback_font_size(&self, image_height: u32) -> u32 {
        ((image_height as f64 * (self.font_size_ratio + self.fallback_size_delta)).round() as u32).max(1)
    }
}
