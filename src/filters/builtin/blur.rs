//! Gaussian softening for graded images and overlay layers.

use image::{RgbImage, RgbaImage};

/// Strength-to-radius divisor for lens softening.
pub const SOFTEN_DIVISOR: f32 = 2.5;

/// Simulate lens softening / reduced clarity.
///
/// A positive `strength` blurs with a Gaussian of radius `strength / 2.5`.
/// Zero or negative strength returns the image untouched; there is no
/// sharpening branch.
pub fn soften(image: RgbImage, strength: f32) -> RgbImage {
    let radius = strength / SOFTEN_DIVISOR;
    if !usable_radius(radius) {
        return image;
    }
    imageproc::filter::gaussian_blur_f32(&image, radius)
}

/// Blur a straight-alpha overlay layer; non-positive radii are a no-op.
pub fn blur_layer(layer: RgbaImage, radius: f32) -> RgbaImage {
    if !usable_radius(radius) {
        return layer;
    }
    imageproc::filter::gaussian_blur_f32(&layer, radius)
}

fn usable_radius(radius: f32) -> bool {
    radius.is_finite() && radius > 0.0
}
