//! Text overlay: font resolution and the glowing stamp compositor.

pub mod font;
pub mod glow;

pub use font::{BuiltinFonts, FontService, GlyphFont, SystemFonts};
pub use glow::{GlowTextCompositor, TextPlacement};
