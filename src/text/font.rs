//! Font loading, measurement and glyph drawing.
//!
//! TrueType faces are parsed with `ab_glyph` and drawn through `imageproc`.
//! When no face can be found the caller falls back to [`GlyphFont::bitmap`],
//! a built-in 5x7 pixel font scaled to the requested size.

use ab_glyph::{FontArc, PxScale};
use image::{ImageBuffer, Pixel, Rgb, RgbImage, Rgba, RgbaImage};
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};

/// Bitmap glyph cell: 5 columns by 7 rows.
const CELL_WIDTH: u32 = 5;
const CELL_HEIGHT: u32 = 7;
/// Blank columns between bitmap glyphs.
const CELL_SPACING: u32 = 1;

/// A font resolved at a fixed pixel size.
#[derive(Clone)]
pub enum GlyphFont {
    /// Parsed TrueType / OpenType face.
    Outline {
        /// Parsed face.
        font: FontArc,
        /// Pixel height.
        size: u32,
    },
    /// Built-in bitmap face; each cell pixel becomes a `scale`x`scale` block.
    Bitmap {
        /// Requested pixel height.
        size: u32,
        /// Block size of one cell pixel.
        scale: u32,
    },
}

impl fmt::Debug for GlyphFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlyphFont::Outline { size, .. } => f.debug_struct("Outline").field("size", size).finish(),
            GlyphFont::Bitmap { size, scale } => f
                .debug_struct("Bitmap")
                .field("size", size)
                .field("scale", scale)
                .finish(),
        }
    }
}

impl GlyphFont {
    /// Outline font at `size` pixels.
    pub fn outline(font: FontArc, size: u32) -> Self {
        GlyphFont::Outline { font, size: size.max(1) }
    }

    /// Built-in bitmap font approximating `size` pixels per line.
    pub fn bitmap(size: u32) -> Self {
        let scale = (size / (CELL_HEIGHT + 1)).max(1);
        GlyphFont::Bitmap { size: size.max(1), scale }
    }

    /// Requested pixel size.
    pub fn size(&self) -> u32 {
        match self {
            GlyphFont::Outline { size, .. } | GlyphFont::Bitmap { size, .. } => *size,
        }
    }

    /// Whether this is the built-in fallback face.
    pub fn is_bitmap(&self) -> bool {
        matches!(self, GlyphFont::Bitmap { .. })
    }

    /// Bounding box `(width, height)` of `text` drawn at the origin.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            GlyphFont::Outline { font, size } => {
                imageproc::drawing::text_size(PxScale::from(*size as f32), font, text)
            }
            GlyphFont::Bitmap { scale, .. } => {
                let count = text.chars().count() as u32;
                if count == 0 {
                    return (0, 0);
                }
                let advance = (CELL_WIDTH + CELL_SPACING) * scale;
                (count * advance - CELL_SPACING * scale, CELL_HEIGHT * scale)
            }
        }
    }

    /// Draw `text` onto an overlay layer.
    pub fn draw_rgba(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, text: &str) {
        match self {
            GlyphFont::Outline { font, size } => imageproc::drawing::draw_text_mut(
                canvas,
                color,
                x,
                y,
                PxScale::from(*size as f32),
                font,
                text,
            ),
            GlyphFont::Bitmap { scale, .. } => stamp_bitmap(canvas, color, x, y, *scale, text),
        }
    }

    /// Draw `text` directly onto an RGB image.
    pub fn draw_rgb(&self, canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, text: &str) {
        match self {
            GlyphFont::Outline { font, size } => imageproc::drawing::draw_text_mut(
                canvas,
                color,
                x,
                y,
                PxScale::from(*size as f32),
                font,
                text,
            ),
            GlyphFont::Bitmap { scale, .. } => stamp_bitmap(canvas, color, x, y, *scale, text),
        }
    }
}

/// Source of fonts for the text compositor.
pub trait FontService {
    /// Load the named font at `size` pixels, or `None` if it is unavailable.
    fn load_font(&self, name: &str, size: u32) -> Option<GlyphFont>;

    /// Bounding box of `text` under `font`.
    fn measure_text(&self, font: &GlyphFont, text: &str) -> (u32, u32) {
        font.measure(text)
    }
}

/// Looks fonts up on disk: first as a direct path, then by file name inside
/// each search directory.
#[derive(Debug, Clone)]
pub struct SystemFonts {
    search_dirs: Vec<PathBuf>,
}

impl SystemFonts {
    /// Search the usual platform font directories.
    pub fn new() -> Self {
        let dirs = [
            "fonts",
            "/usr/share/fonts/truetype/msttcorefonts",
            "/usr/share/fonts/truetype/dejavu",
            "/usr/share/fonts/TTF",
            "/usr/local/share/fonts",
            "/Library/Fonts",
            "/System/Library/Fonts/Supplemental",
            "C:\\Windows\\Fonts",
        ];
        Self {
            search_dirs: dirs.iter().map(PathBuf::from).collect(),
        }
    }

    /// Search only the given directories.
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs: dirs }
    }

    /// Add a directory searched before the existing ones.
    pub fn prepend_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.insert(0, dir.into());
        self
    }

    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(name)];
        for dir in &self.search_dirs {
            paths.push(dir.join(name));
            let lower = name.to_lowercase();
            if lower != name {
                paths.push(dir.join(lower));
            }
        }
        paths
    }

    fn read_font(path: &Path) -> Option<FontArc> {
        let bytes = std::fs::read(path).ok()?;
        match FontArc::try_from_vec(bytes) {
            Ok(font) => Some(font),
            Err(e) => {
                debug!("{} is not a usable font: {}", path.display(), e);
                None
            }
        }
    }
}

impl Default for SystemFonts {
    fn default() -> Self {
        Self::new()
    }
}

impl FontService for SystemFonts {
    fn load_font(&self, name: &str, size: u32) -> Option<GlyphFont> {
        self.candidates(name)
            .iter()
            .filter(|path| path.is_file())
            .find_map(|path| {
                let font = Self::read_font(path)?;
                debug!("loaded font {} at {}px", path.display(), size);
                Some(GlyphFont::outline(font, size))
            })
    }
}

/// Font service with no faces; every lookup falls back to the bitmap font.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFonts;

impl FontService for BuiltinFonts {
    fn load_font(&self, _name: &str, _size: u32) -> Option<GlyphFont> {
        None
    }
}

fn stamp_bitmap<P>(
    canvas: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    color: P,
    x: i32,
    y: i32,
    scale: u32,
    text: &str,
) where
    P: Pixel,
{
    let (width, height) = canvas.dimensions();
    let scale = scale as i32;
    let advance = (CELL_WIDTH + CELL_SPACING) as i32 * scale;

    for (index, ch) in text.chars().enumerate() {
        let origin_x = x + index as i32 * advance;
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..CELL_WIDTH as i32 {
                if bits & (1 << (CELL_WIDTH as i32 - 1 - col)) == 0 {
                    continue;
                }
                let block_x = origin_x + col * scale;
                let block_y = y + row as i32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let (px, py) = (block_x + dx, block_y + dy);
                        if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                            canvas.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
    }
}

/// Row bitmaps of the built-in font; bit 4 is the leftmost column.
fn glyph(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        ' ' => [0x00; 7],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '\'' => [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '/' => [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        '#' => [0x0A, 0x0A, 0x1F, 0x0A, 0x1F, 0x0A, 0x0A],
        '&' => [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        _ => [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F],
    }
}
