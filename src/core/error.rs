//! Error types for Filmstamp.
//!
//! Uses thiserror for structured errors with context. Every failure of a
//! single `apply` invocation is terminal for that invocation only; nothing
//! here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Filmstamp.
#[derive(Error, Debug)]
pub enum FilmError {
    /// The requested filter name is not registered.
    #[error("Unknown filter name '{name}'. Please choose from: {}", valid.join(", "))]
    Lookup {
        /// Name that was asked for.
        name: String,
        /// Registered names, in registry order.
        valid: Vec<String>,
    },

    /// The input image does not exist.
    #[error("Input file not found at {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Any unexpected failure while decoding, grading or encoding.
    #[error("An error occurred during image processing: {0}")]
    Processing(String),

    /// Unusable glow configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while loading or validating configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read {path}: {error}")]
    Read {
        /// File path.
        path: String,
        /// Underlying I/O error.
        error: String,
    },

    /// The file is not valid TOML for this configuration.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field parsed but holds an unusable value.
    #[error("Invalid value for '{field}': {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<image::ImageError> for FilmError {
    fn from(error: image::ImageError) -> Self {
        FilmError::Processing(error.to_string())
    }
}

impl From<std::io::Error> for FilmError {
    fn from(error: std::io::Error) -> Self {
        FilmError::Processing(error.to_string())
    }
}

impl FilmError {
    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            FilmError::Lookup { valid, .. } => {
                Some(format!("Use one of: {}", valid.join(", ")))
            }
            FilmError::NotFound { path } => {
                Some(format!("Check that the file '{}' exists", path.display()))
            }
            FilmError::Config(ConfigError::Invalid { field, .. }) => {
                Some(format!("Adjust '{}' in the glow configuration", field))
            }
            _ => None,
        }
    }

    /// Whether the failure was caused by the caller's input rather than by
    /// processing itself.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            FilmError::Lookup { .. } | FilmError::NotFound { .. } | FilmError::Config(_)
        )
    }
}

/// Result type alias for Filmstamp operations.
pub type FilmResult<T> = Result<T, FilmError>;
