//! Global tone adjustments: brightness, contrast, saturation.
//!
//! Every adjustment moves each sample along the line through a reference
//! value: `out = reference + (in - reference) * factor`. Brightness uses
//! black as the reference, contrast uses mid-gray, saturation uses the
//! pixel's own luma.

use crate::core::types::{luma, round_channel};
use image::RgbImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mid-gray reference for contrast.
pub const CONTRAST_PIVOT: f64 = 128.0;

/// Which global adjustment to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneKind {
    /// Scale toward black.
    Brightness,
    /// Scale toward mid-gray.
    Contrast,
    /// Scale toward the pixel's luma.
    Saturation,
}

impl fmt::Display for ToneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToneKind::Brightness => "brightness",
            ToneKind::Contrast => "contrast",
            ToneKind::Saturation => "saturation",
        };
        f.write_str(name)
    }
}

/// Apply a global tone adjustment.
///
/// `factor` must be finite and positive; `1.0` is the identity.
pub fn enhance(mut image: RgbImage, kind: ToneKind, factor: f64) -> RgbImage {
    image.par_chunks_exact_mut(3).for_each(|px| {
        let rgb = [px[0], px[1], px[2]];
        let reference = match kind {
            ToneKind::Brightness => 0.0,
            ToneKind::Contrast => CONTRAST_PIVOT,
            ToneKind::Saturation => luma(rgb),
        };
        for (out, v) in px.iter_mut().zip(rgb) {
            *out = round_channel(reference + (v as f64 - reference) * factor);
        }
    });
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use proptest::prelude::*;

    fn single(rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(1, 1, Rgb(rgb))
    }

    #[test]
    fn test_brightness_scales_samples() {
        let out = enhance(single([100, 200, 10]), ToneKind::Brightness, 1.05);
        assert_eq!(out.get_pixel(0, 0).0, [105, 210, 11]);

        let out = enhance(single([250, 250, 250]), ToneKind::Brightness, 1.08);
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_contrast_pulls_toward_mid_gray() {
        let out = enhance(single([28, 128, 228]), ToneKind::Contrast, 0.5);
        assert_eq!(out.get_pixel(0, 0).0, [78, 128, 178]);
    }

    #[test]
    fn test_saturation_zero_is_grayscale() {
        let out = enhance(single([255, 0, 0]), ToneKind::Saturation, 0.0);
        let [r, g, b] = out.get_pixel(0, 0).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(r, 76);
    }

    #[test]
    fn test_saturation_leaves_gray_alone() {
        let out = enhance(single([90, 90, 90]), ToneKind::Saturation, 1.5);
        assert_eq!(out.get_pixel(0, 0).0, [90, 90, 90]);
    }

    proptest! {
        #[test]
        fn prop_unit_factor_is_identity(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            for kind in [ToneKind::Brightness, ToneKind::Contrast, ToneKind::Saturation] {
                let out = enhance(single([r, g, b]), kind, 1.0);
                prop_assert_eq!(out.get_pixel(0, 0).0, [r, g, b]);
            }
        }

        #[test]
        fn prop_dimensions_preserved(w in 1u32..12, h in 1u32..12, factor in 0.1f64..3.0) {
            let img = RgbImage::from_fn(w, h, |x, y| Rgb([(x * 20) as u8, (y * 20) as u8, 77]));
            let out = enhance(img, ToneKind::Saturation, factor);
            prop_assert_eq!(out.dimensions(), (w, h));
        }
    }
}
