//! Pixel-level value types shared by every stage of the grading pipeline.
//!
//! Images flowing through the pipeline are plain [`image::RgbImage`] buffers:
//! three 8-bit samples per pixel, owned by whichever stage currently holds
//! them. The only place an alpha channel appears is the transient overlay
//! layer built by the text compositor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rec. 601 luma weights used for every tone-shaping decision.
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Weighted brightness estimate of a pixel, in double precision so
/// truncation and rounding land where a float64 reference puts them.
///
/// Only ever used as an intermediate; it is never written back to an image.
#[inline]
pub fn luma(rgb: [u8; 3]) -> f64 {
    LUMA_WEIGHTS[0] * rgb[0] as f64 + LUMA_WEIGHTS[1] * rgb[1] as f64 + LUMA_WEIGHTS[2] * rgb[2] as f64
}

/// Clamp an integer sample into the 8-bit range.
#[inline]
pub fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Round a floating point sample and clamp it into the 8-bit range.
#[inline]
pub fn round_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// RGBA color value.
///
/// Deserializes from a hex string (`"#FF7800"`, `"#FF780078"`) or from an
/// array of three or four channel values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "ColorRepr", into = "String")]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha; 255 is opaque.
    pub a: u8,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Channels(Vec<u8>),
}

impl TryFrom<ColorRepr> for Color {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Hex(hex) => Color::from_hex(&hex),
            ColorRepr::Channels(c) => match c.as_slice() {
                [r, g, b] => Ok(Color::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Color::new(*r, *g, *b, *a)),
                other => Err(format!(
                    "Invalid color: expected 3 or 4 channels, got {}",
                    other.len()
                )),
            },
        }
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl Color {
    /// Create a new color from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from RGB components (alpha = 255).
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a hex color string.
    ///
    /// Supports formats: "#RGB", "#RRGGBB", "#RRGGBBAA"
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let hex = hex.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .ok_or_else(|| format!("Invalid hex color: {}", hex))
                .and_then(|s| u8::from_str_radix(s, 16).map_err(|e| e.to_string()))
        };

        match hex.len() {
            3 => Ok(Self::rgb(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
            )),
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(format!(
                "Invalid hex color format: expected 3, 6, or 8 characters, got {}",
                hex.len()
            )),
        }
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Convert to image crate's Rgba type.
    pub fn to_rgba(&self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }

    /// Convert to image crate's Rgb type, dropping alpha.
    pub fn to_rgb(&self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_of_gray_is_gray() {
        assert!((luma([128, 128, 128]) - 128.0).abs() < 1e-3);
        assert!((luma([30, 30, 30]) - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_channel_clamping() {
        assert_eq!(clamp_channel(-40), 0);
        assert_eq!(clamp_channel(300), 255);
        assert_eq!(clamp_channel(17), 17);
        assert_eq!(round_channel(254.6), 255);
        assert_eq!(round_channel(-0.4), 0);
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#FABD5A").unwrap(), Color::rgb(250, 189, 90));
        assert_eq!(Color::from_hex("FF780078").unwrap(), Color::new(255, 120, 0, 120));
        assert_eq!(Color::from_hex("F00").unwrap(), Color::rgb(255, 0, 0));
        assert!(Color::from_hex("#12345").is_err());
    }

    #[test]
    fn test_color_to_hex() {
        assert_eq!(Color::rgb(250, 189, 90).to_hex(), "#FABD5A");
        assert_eq!(Color::new(255, 120, 0, 120).to_hex(), "#FF780078");
    }

    #[test]
    fn test_color_deserializes_from_array_or_hex() {
        let from_array: Color = serde_json::from_str("[255, 120, 0, 120]").unwrap();
        let from_hex: Color = serde_json::from_str("\"#FF780078\"").unwrap();
        assert_eq!(from_array, from_hex);

        let rgb: Color = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(rgb, Color::rgb(1, 2, 3));

        assert!(serde_json::from_str::<Color>("[1, 2]").is_err());
    }
}
