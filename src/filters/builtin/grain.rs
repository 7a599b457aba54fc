//! Synthetic film grain.

use crate::core::random::RandomSource;
use crate::core::types::clamp_channel;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// How grain offsets are drawn for a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrainMode {
    /// Three independent draws, one per channel.
    PerChannel,
    /// One draw added identically to all three channels (no colour cast).
    Shared,
}

/// Uniform additive grain in `[-amount, amount]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grain {
    /// Largest offset; zero or less disables grain.
    pub amount: i32,
    /// How draws map onto channels.
    pub mode: GrainMode,
}

impl Grain {
    /// No grain at all; consumes no random draws.
    pub const fn none() -> Self {
        Self { amount: 0, mode: GrainMode::PerChannel }
    }

    /// Independent draws per channel.
    pub const fn per_channel(amount: i32) -> Self {
        Self { amount, mode: GrainMode::PerChannel }
    }

    /// One draw shared by all channels.
    pub const fn shared(amount: i32) -> Self {
        Self { amount, mode: GrainMode::Shared }
    }

    /// Draw the offsets for one pixel, red first.
    pub fn offsets(&self, rng: &mut dyn RandomSource) -> [i32; 3] {
        if self.amount <= 0 {
            return [0; 3];
        }
        let (lo, hi) = (-self.amount, self.amount);
        match self.mode {
            GrainMode::PerChannel => [
                rng.next_int(lo, hi),
                rng.next_int(lo, hi),
                rng.next_int(lo, hi),
            ],
            GrainMode::Shared => {
                let noise = rng.next_int(lo, hi);
                [noise; 3]
            }
        }
    }
}

/// Add independent per-channel grain to every pixel.
///
/// Pixels are visited row by row, so a seeded source reproduces the same
/// grain for the same image size.
pub fn add_grain(image: RgbImage, amount: i32, rng: &mut dyn RandomSource) -> RgbImage {
    apply(image, Grain::per_channel(amount), rng)
}

/// Add grain using the given draw mode.
pub fn apply(mut image: RgbImage, grain: Grain, rng: &mut dyn RandomSource) -> RgbImage {
    if grain.amount <= 0 {
        return image;
    }
    for px in image.pixels_mut() {
        let offsets = grain.offsets(rng);
        for (sample, offset) in px.0.iter_mut().zip(offsets) {
            *sample = clamp_channel(*sample as i32 + offset);
        }
    }
    image
}
