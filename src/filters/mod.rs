//! Filter module.
//!
//! Contains the filter registry and the built-in film presets.

pub mod registry;
pub mod builtin;

pub use registry::{FilterRegistry, RegistryEntry};
