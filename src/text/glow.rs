//! Glowing date stamp compositor.
//!
//! Text is drawn twice: a halo layer stamped at a diamond of offsets around
//! each anchor, blurred and alpha-blended onto the photo, then the sharp core
//! glyphs drawn opaque at the exact anchors on top.

use crate::core::config::GlowSpec;
use crate::core::types::round_channel;
use crate::filters::builtin::blur::blur_layer;
use crate::text::font::{FontService, GlyphFont};
use image::{Rgba, RgbImage, RgbaImage};
use log::warn;

/// A string and the top-left anchor it is drawn at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPlacement {
    /// Text to draw.
    pub text: String,
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
}

/// Resolve the overlay font for an image of the given height.
///
/// A missing preferred font is not an error: the built-in bitmap font is used
/// at the slightly larger fallback size instead.
pub fn resolve_font(fonts: &dyn FontService, spec: &GlowSpec, image_height: u32) -> GlyphFont {
    let size = spec.font_size(image_height);
    match fonts.load_font(&spec.font_name, size) {
        Some(font) => font,
        None => {
            let fallback = spec.fallback_font_size(image_height);
            warn!(
                "font '{}' unavailable, using built-in font at {}px",
                spec.font_name, fallback
            );
            GlyphFont::bitmap(fallback)
        }
    }
}

/// Anchor the timestamp bottom-left and, when non-blank, the message
/// top-right. Both strings share one font.
pub fn layout(
    fonts: &dyn FontService,
    font: &GlyphFont,
    spec: &GlowSpec,
    dimensions: (u32, u32),
    timestamp: &str,
    message: &str,
) -> Vec<TextPlacement> {
    let (width, height) = dimensions;
    let padding_x = (width as f64 * spec.padding_ratio) as i32;
    let padding_y = (height as f64 * spec.padding_ratio) as i32;

    let (_, stamp_height) = fonts.measure_text(font, timestamp);
    let mut placements = vec![TextPlacement {
        text: timestamp.to_string(),
        x: padding_x,
        y: height as i32 - stamp_height as i32 - padding_y,
    }];

    let message = message.trim();
    if !message.is_empty() {
        let (message_width, _) = fonts.measure_text(font, message);
        placements.push(TextPlacement {
            text: message.to_string(),
            x: width as i32 - padding_x - message_width as i32,
            y: padding_y,
        });
    }

    placements
}

/// Halo stamp offsets: the four axis neighbours at every radius from
/// `spread` down to 1.
pub fn halo_offsets(spread: u32) -> Vec<(i32, i32)> {
    (1..=spread as i32)
        .rev()
        .flat_map(|i| [(i, 0), (-i, 0), (0, i), (0, -i)])
        .collect()
}

/// Renders the glowing timestamp and message onto graded images.
pub struct GlowTextCompositor<'a> {
    fonts: &'a dyn FontService,
    spec: GlowSpec,
}

impl<'a> GlowTextCompositor<'a> {
    /// Compositor drawing with `fonts` and the given glow settings.
    pub fn new(fonts: &'a dyn FontService, spec: GlowSpec) -> Self {
        Self { fonts, spec }
    }

    /// Glow settings in use.
    pub fn spec(&self) -> &GlowSpec {
        &self.spec
    }

    /// Composite the timestamp (and optional message) onto `image`.
    pub fn composite(&self, image: RgbImage, timestamp: &str, message: &str) -> RgbImage {
        let font = resolve_font(self.fonts, &self.spec, image.height());
        let placements = layout(self.fonts, &font, &self.spec, image.dimensions(), timestamp, message);
        self.render(image, &font, &placements)
    }

    /// Draw already laid-out text.
    pub fn render(&self, image: RgbImage, font: &GlyphFont, placements: &[TextPlacement]) -> RgbImage {
        let halo = self.halo_layer(image.dimensions(), font, placements);
        let mut image = alpha_composite(image, &halo);

        let core = self.spec.core_color.to_rgb();
        for placement in placements {
            font.draw_rgb(&mut image, core, placement.x, placement.y, &placement.text);
        }
        image
    }

    fn halo_layer(&self, (width, height): (u32, u32), font: &GlyphFont, placements: &[TextPlacement]) -> RgbaImage {
        let mut layer = RgbaImage::new(width, height);
        let color = self.spec.halo_color.to_rgba();
        let offsets = halo_offsets(self.spec.halo_spread);

        for placement in placements {
            for (dx, dy) in &offsets {
                font.draw_rgba(
                    &mut layer,
                    color,
                    placement.x + dx,
                    placement.y + dy,
                    &placement.text,
                );
            }
        }

        blur_layer(layer, self.spec.halo_blur_radius)
    }
}

/// Straight-alpha "over" of `overlay` onto an opaque image.
pub fn alpha_composite(mut image: RgbImage, overlay: &RgbaImage) -> RgbImage {
    for (base, top) in image.pixels_mut().zip(overlay.pixels()) {
        let Rgba([r, g, b, a]) = *top;
        if a == 0 {
            continue;
        }
        let alpha = a as f64 / 255.0;
        for (channel, src) in base.0.iter_mut().zip([r, g, b]) {
            *channel = round_channel(*channel as f64 * (1.0 - alpha) + src as f64 * alpha);
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::font::{BuiltinFonts, SystemFonts};
    use image::Rgb;

    const GRAY: [u8; 3] = [90, 90, 90];

    fn canvas() -> RgbImage {
        RgbImage::from_pixel(400, 300, Rgb(GRAY))
    }

    fn region_changed(img: &RgbImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> bool {
        ys.clone()
            .any(|y| xs.clone().any(|x| img.get_pixel(x, y).0 != GRAY))
    }

    #[test]
    fn test_halo_offsets_form_diamond() {
        let offsets = halo_offsets(3);
        assert_eq!(offsets.len(), 12);
        assert_eq!(&offsets[..4], &[(3, 0), (-3, 0), (0, 3), (0, -3)]);
        assert!(!offsets.contains(&(0, 0)));
        assert!(offsets.iter().all(|(x, y)| *x == 0 || *y == 0));
        assert!(halo_offsets(0).is_empty());
    }

    #[test]
    fn test_font_falls_back_to_bitmap() {
        let spec = GlowSpec::default();
        let font = resolve_font(&BuiltinFonts, &spec, 1000);
        assert!(font.is_bitmap());
        assert_eq!(font.size(), 28);
    }

    #[test]
    fn test_layout_anchors() {
        let spec = GlowSpec::default();
        let font = GlyphFont::bitmap(16);
        let placements = layout(&BuiltinFonts, &font, &spec, (400, 300), "01-02-'24", "  DAY 1 ");
        assert_eq!(placements.len(), 2);

        // padding is 3% of each dimension: 12px and 9px
        assert_eq!(placements[0], TextPlacement { text: "01-02-'24".into(), x: 12, y: 300 - 14 - 9 });

        let (w, _) = font.measure("DAY 1");
        assert_eq!(placements[1], TextPlacement { text: "DAY 1".into(), x: 400 - 12 - w as i32, y: 9 });
    }

    #[test]
    fn test_blank_message_is_skipped() {
        let spec = GlowSpec::default();
        let font = GlyphFont::bitmap(8);
        let placements = layout(&BuiltinFonts, &font, &spec, (100, 100), "01-02-'24", "   ");
        assert_eq!(placements.len(), 1);
    }

    #[test]
    fn test_timestamp_only() {
        let compositor = GlowTextCompositor::new(&BuiltinFonts, GlowSpec::default());
        let out = compositor.composite(canvas(), "01-02-'24", "");

        assert_eq!(out.dimensions(), (400, 300));
        assert!(region_changed(&out, 0..200, 200..300));
        assert!(!region_changed(&out, 200..400, 0..150));
    }

    #[test]
    fn test_timestamp_and_message() {
        let compositor = GlowTextCompositor::new(&BuiltinFonts, GlowSpec::default());
        let out = compositor.composite(canvas(), "01-02-'24", "DAY 1");

        assert!(region_changed(&out, 0..200, 200..300));
        assert!(region_changed(&out, 200..400, 0..150));
    }

    #[test]
    fn test_truetype_stamp_marks_both_corners() {
        let fonts = SystemFonts::with_dirs(vec![concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures").into()]);
        let spec = GlowSpec {
            font_name: "DejaVuSansMono.ttf".to_string(),
            font_size_ratio: 0.08,
            ..GlowSpec::default()
        };
        assert!(!resolve_font(&fonts, &spec, 300).is_bitmap());

        let compositor = GlowTextCompositor::new(&fonts, spec);
        let stamped = compositor.composite(canvas(), "01-02-'24", "DAY 1");
        assert!(region_changed(&stamped, 0..200, 200..300));
        assert!(region_changed(&stamped, 200..400, 0..150));

        let stamp_only = compositor.composite(canvas(), "01-02-'24", "");
        assert!(!region_changed(&stamp_only, 200..400, 0..150));
    }

    #[test]
    fn test_core_color_drawn_on_top() {
        let spec = GlowSpec::default();
        let core = spec.core_color.to_rgb().0;
        let compositor = GlowTextCompositor::new(&BuiltinFonts, spec);
        let out = compositor.composite(canvas(), "8", "");
        assert!(out.pixels().any(|p| p.0 == core));
    }

    #[test]
    fn test_alpha_composite() {
        let base = RgbImage::from_pixel(2, 1, Rgb([0, 0, 0]));
        let mut overlay = RgbaImage::new(2, 1);
        overlay.put_pixel(0, 0, Rgba([255, 120, 0, 255]));
        let out = alpha_composite(base, &overlay);
        assert_eq!(out.get_pixel(0, 0).0, [255, 120, 0]);
        assert_eq!(out.get_pixel(1, 0).0, [0, 0, 0]);

        let base = RgbImage::from_pixel(1, 1, Rgb([100, 100, 100]));
        let mut overlay = RgbaImage::new(1, 1);
        overlay.put_pixel(0, 0, Rgba([200, 200, 200, 51]));
        assert_eq!(alpha_composite(base, &overlay).get_pixel(0, 0).0, [120, 120, 120]);
    }
}
