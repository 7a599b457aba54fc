//! # Filmstamp - Film Simulation Grading
//!
//! Filmstamp applies a film simulation look to a photograph and overlays a
//! glowing, retro-style date stamp.
//!
//! ## Features
//!
//! - **Five presets**: Modern Fuji, Terracotta Sun, Portra 800, Reala Ace and
//!   Dreamy Negative, each a fixed list of tone, softening and colour steps
//! - **Inspectable pipelines**: presets are data, so their steps can be
//!   listed, serialized and tested without running them
//! - **Reproducible grain**: the random source is injected, so a seed gives
//!   byte-identical output
//! - **Glowing text**: a blurred halo layer under a sharp core layer, with a
//!   built-in bitmap font when no TrueType face is available
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use filmstamp::prelude::*;
//! use std::path::Path;
//!
//! let engine = FilmEngine::new();
//! let options = ApplyOptions::new().with_seed(7);
//!
//! engine.apply(
//!     "portra_800_sim",
//!     Path::new("your_input_photo.jpg"),
//!     Path::new("retro_output_portra_800_sim.jpg"),
//!     "01-02-'24",
//!     "DAY 1",
//!     &options,
//! )?;
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: pixel helpers, colours, errors, random source, configuration
//! - [`filters`]: tone/softening/grain primitives, presets and the registry
//! - [`text`]: fonts and the glowing text compositor
//! - [`execution`]: codec, progress reporting and the `apply` entry point

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod execution;
pub mod filters;
pub mod text;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use filmstamp::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{luma, Color};
    pub use crate::core::config::GlowSpec;
    pub use crate::core::random::RandomSource;

    // Errors
    pub use crate::core::error::{ConfigError, FilmError, FilmResult};

    // Filters
    pub use crate::filters::builtin::{
        add_grain, enhance, soften, ColorShift, Grain, GrainMode, Pipeline, Preset, Step, ToneKind,
    };
    pub use crate::filters::registry::{FilterRegistry, RegistryEntry};

    // Text
    pub use crate::text::font::{BuiltinFonts, FontService, GlyphFont, SystemFonts};
    pub use crate::text::glow::{GlowTextCompositor, TextPlacement};

    // Execution
    pub use crate::execution::codec::{FileCodec, ImageCodec};
    pub use crate::execution::engine::{ApplyOptions, FilmEngine};
    pub use crate::execution::progress::{ProgressCallback, ProgressUpdate};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
