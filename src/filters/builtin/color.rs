//! Per-pixel colour shifts applied as the last stage of every preset.
//!
//! A colour pass reads each source pixel from an immutable snapshot, computes
//! its shifted value (branching on luma or hue where the shift asks for it),
//! adds that pixel's grain and clamps, writing into a fresh output buffer.

use crate::core::random::RandomSource;
use crate::core::types::{clamp_channel, luma};
use crate::filters::builtin::grain::Grain;
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// Luma threshold with a proportional strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LumaKnee {
    /// Luma at which the knee starts.
    pub threshold: f64,
    /// Adjustment per unit of luma past the threshold.
    pub strength: f64,
}

/// A white-balance style shift, optionally conditional on the pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorShift {
    /// Add fixed per-channel offsets.
    Offset {
        /// Red, green and blue offsets.
        rgb: [i32; 3],
    },

    /// Add offsets, then blend each channel toward the original luma.
    /// Results truncate toward zero.
    LumaBlend {
        /// Red, green and blue offsets.
        rgb: [i32; 3],
        /// Weight of the luma in the blend.
        blend: f64,
    },

    /// Pick between two offsets depending on whether the pixel reads as blue:
    /// `B > (R + G) / 2 + threshold`.
    SelectiveBlue {
        /// Margin by which blue must exceed the red/green mean.
        threshold: f64,
        /// Offsets for blue pixels.
        blue: [i32; 3],
        /// Offsets for every other pixel.
        other: [i32; 3],
    },

    /// Add offsets, lift shadows below `shadow.threshold` and pull down
    /// highlights above `highlight.threshold`, equally on all channels.
    ToneShape {
        /// Red, green and blue offsets.
        rgb: [i32; 3],
        /// Lift below this knee.
        shadow: LumaKnee,
        /// Darken above this knee.
        highlight: LumaKnee,
    },
}

impl ColorShift {
    /// Shifted value of one pixel before grain and clamping.
    pub fn shift(&self, px: [u8; 3]) -> [i32; 3] {
        let [r, g, b] = px.map(i32::from);
        match self {
            ColorShift::Offset { rgb } => offset(px, *rgb),
            ColorShift::LumaBlend { rgb, blend } => {
                let y = luma(px);
                offset(px, *rgb).map(|v| (v as f64 * (1.0 - blend) + y * blend) as i32)
            }
            ColorShift::SelectiveBlue { threshold, blue, other } => {
                let is_blue = b as f64 > (r + g) as f64 / 2.0 + threshold;
                offset(px, if is_blue { *blue } else { *other })
            }
            ColorShift::ToneShape { rgb, shadow, highlight } => {
                let y = luma(px);
                let mut adjust = 0;
                if y < shadow.threshold {
                    adjust += ((shadow.threshold - y) * shadow.strength).round() as i32;
                }
                if y > highlight.threshold {
                    adjust -= ((y - highlight.threshold) * highlight.strength).round() as i32;
                }
                offset(px, *rgb).map(|v| v + adjust)
            }
        }
    }

    /// Short human readable summary, used by `info`.
    pub fn describe(&self) -> String {
        match self {
            ColorShift::Offset { rgb } => format!("shift {}", signed(rgb)),
            ColorShift::LumaBlend { rgb, blend } => {
                format!("shift {} then {:.0}% blend toward luma", signed(rgb), blend * 100.0)
            }
            ColorShift::SelectiveBlue { threshold, blue, other } => format!(
                "if B > avg(R,G)+{}: shift {} else shift {}",
                threshold,
                signed(blue),
                signed(other)
            ),
            ColorShift::ToneShape { rgb, shadow, highlight } => format!(
                "shift {}, lift luma<{} by x{}, darken luma>{} by x{}",
                signed(rgb),
                shadow.threshold,
                shadow.strength,
                highlight.threshold,
                highlight.strength
            ),
        }
    }
}

fn offset(px: [u8; 3], rgb: [i32; 3]) -> [i32; 3] {
    [
        px[0] as i32 + rgb[0],
        px[1] as i32 + rgb[1],
        px[2] as i32 + rgb[2],
    ]
}

fn signed(rgb: &[i32; 3]) -> String {
    format!("R{:+} G{:+} B{:+}", rgb[0], rgb[1], rgb[2])
}

/// Run one shift + grain traversal over the whole image.
pub fn color_pass(
    source: &RgbImage,
    shift: &ColorShift,
    grain: Grain,
    rng: &mut dyn RandomSource,
) -> RgbImage {
    let (width, height) = source.dimensions();
    let mut output = RgbImage::new(width, height);

    for (x, y, px) in source.enumerate_pixels() {
        let shifted = shift.shift(px.0);
        let noise = grain.offsets(rng);
        output.put_pixel(
            x,
            y,
            Rgb([
                clamp_channel(shifted[0] + noise[0]),
                clamp_channel(shifted[1] + noise[1]),
                clamp_channel(shifted[2] + noise[2]),
            ]),
        );
    }

    output
}
