//! Filter registry mapping filter names to presets.

use crate::core::error::{FilmError, FilmResult};
use crate::filters::builtin::presets::{Pipeline, Preset};
use indexmap::IndexMap;
use serde::Serialize;

/// Registry entry containing the preset and its display metadata.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryEntry {
    /// Preset this name resolves to.
    pub preset: Preset,
    /// Human readable name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Tags for organization and search.
    pub tags: Vec<String>,
}

impl RegistryEntry {
    fn from_preset(preset: Preset) -> Self {
        Self {
            preset,
            name: preset.name().to_string(),
            description: preset.description().to_string(),
            tags: preset.tags().iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Registry of the available film simulations.
///
/// Lookup is by exact identifier (`"portra_800_sim"`); iteration preserves
/// registration order.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    filters: IndexMap<String, RegistryEntry>,
}

impl FilterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            filters: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with every built-in preset.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for preset in Preset::ALL {
            registry.register(preset);
        }
        registry
    }

    /// Register a preset under its identifier.
    pub fn register(&mut self, preset: Preset) {
        self.filters
            .insert(preset.id().to_string(), RegistryEntry::from_preset(preset));
    }

    /// Resolve a filter name to its pipeline.
    pub fn resolve(&self, name: &str) -> FilmResult<Pipeline> {
        self.filters
            .get(name)
            .map(|entry| entry.preset.pipeline())
            .ok_or_else(|| FilmError::Lookup {
                name: name.to_string(),
                valid: self.filter_ids().map(str::to_string).collect(),
            })
    }

    /// Get a registry entry.
    pub fn get_entry(&self, id: &str) -> Option<&RegistryEntry> {
        self.filters.get(id)
    }

    /// Check if a filter is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.filters.contains_key(id)
    }

    /// Get all registered filter IDs.
    pub fn filter_ids(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(|s| s.as_str())
    }

    /// Get all registered filters.
    pub fn filters(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Search filters by id, name, description or tag.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();

        self.filters
            .iter()
            .filter(|(id, entry)| {
                id.to_lowercase().contains(&query)
                    || entry.name.to_lowercase().contains(&query)
                    || entry.description.to_lowercase().contains(&query)
                    || entry.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Get the total number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_name() {
        let registry = FilterRegistry::with_builtins();
        let pipeline = registry.resolve("portra_800_sim").unwrap();
        assert_eq!(pipeline.preset(), Preset::Portra800);
    }

    #[test]
    fn test_resolve_unknown_name_lists_all_valid() {
        let registry = FilterRegistry::with_builtins();
        match registry.resolve("nonexistent") {
            Err(FilmError::Lookup { name, valid }) => {
                assert_eq!(name, "nonexistent");
                assert_eq!(
                    valid,
                    vec![
                        "modern_fuji_sim",
                        "terracotta_sun_sim",
                        "portra_800_sim",
                        "reala_ace_sim",
                        "dreamy_negative_sim",
                    ]
                );
            }
            other => panic!("expected lookup error, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = FilterRegistry::with_builtins();
        assert!(registry.resolve("Portra_800_sim").is_err());
        assert!(registry.resolve("portra_800_sim ").is_err());
    }

    #[test]
    fn test_search() {
        let registry = FilterRegistry::with_builtins();
        assert_eq!(registry.search("portra"), vec!["portra_800_sim"]);
        assert_eq!(registry.search("MATTE"), vec!["dreamy_negative_sim"]);
        assert!(registry.search("nonexistent").is_empty());
    }

    #[test]
    fn test_empty_registry() {
        let registry = FilterRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.resolve("modern_fuji_sim"),
            Err(FilmError::Lookup { valid, .. }) if valid.is_empty()
        ));
        assert_eq!(FilterRegistry::default().len(), 5);
    }
}
