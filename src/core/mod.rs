//! Core types for the Filmstamp grading system.
//!
//! This module contains the foundational pieces every stage shares:
//! - Pixel helpers and the [`Color`] value type
//! - Error types
//! - The injectable random source used for grain
//! - Glow overlay configuration

pub mod types;
pub mod error;
pub mod random;
pub mod config;

// Re-export commonly used types
pub use types::{Color, luma, clamp_channel, round_channel};
pub use error::{FilmError, FilmResult, ConfigError};
pub use random::RandomSource;
pub use config::GlowSpec;
