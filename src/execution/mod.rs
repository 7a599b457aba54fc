//! Execution module.
//!
//! This module runs a preset and the text overlay end to end, between
//! decoding the input photo and encoding the result.

pub mod engine;
pub mod codec;
pub mod progress;

pub use engine::{ApplyOptions, FilmEngine};
pub use codec::{FileCodec, ImageCodec};
pub use progress::{ProgressCallback, ProgressTracker, ProgressUpdate};
