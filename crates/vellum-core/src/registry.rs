/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The pipeline registry.
 */

//! The pipeline registry.
//!
//! Pipelines are addressed by name: dependency declarations and the
//! execution driver both refer to pipelines by the name they were
//! registered under. The registry guarantees that names are unique under
//! case-insensitive comparison and that enumeration is insertion-ordered,
//! so execution plans built from it are reproducible run to run.
//!
//! The registry is populated once at configuration time and treated as
//! read-only during execution; it provides no internal locking.

use indexmap::IndexMap;
use thiserror::Error;

use vellum_meta::{Key, KeyQuery};

use crate::stage::Pipeline;

/// Errors from registry mutation.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A pipeline with a case-insensitively equal name is already
    /// registered. The registry is left unchanged.
    #[error("a pipeline named '{existing}' is already registered (attempted to add '{name}')")]
    DuplicateName {
        /// The name the caller tried to add
        name: String,
        /// The already registered name, in its original casing
        existing: String,
    },
}

/// Insertion-ordered collection of uniquely named pipelines.
///
/// Names compare case-insensitively: `"Content"` and `"content"` are the
/// same identity, and adding both is an error rather than a silent
/// overwrite. Iteration yields entries in the order they were added.
#[derive(Default)]
pub struct PipelineRegistry {
    pipelines: IndexMap<Key, Pipeline>,
}

impl PipelineRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            pipelines: IndexMap::new(),
        }
    }

    /// Register a pipeline under a name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if a pipeline is already
    /// registered under a case-insensitively equal name; the registry is
    /// unchanged in that case.
    pub fn add(&mut self, name: impl Into<String>, pipeline: Pipeline) -> Result<(), RegistryError> {
        let name = name.into();
        if let Some((existing, _)) = self.pipelines.get_key_value(&KeyQuery(&name)) {
            return Err(RegistryError::DuplicateName {
                existing: existing.as_str().to_string(),
                name,
            });
        }
        self.pipelines.insert(Key::new(name), pipeline);
        Ok(())
    }

    /// Case-insensitive membership test.
    pub fn contains_key(&self, name: &str) -> bool {
        self.pipelines.contains_key(&KeyQuery(name))
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Pipeline> {
        self.pipelines.get(&KeyQuery(name))
    }

    /// Case-insensitive mutable lookup.
    ///
    /// Only meaningful during the configuration phase; the registry is
    /// read-only once execution starts.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Pipeline> {
        self.pipelines.get_mut(&KeyQuery(name))
    }

    /// Remove a pipeline, preserving the order of the remaining entries.
    ///
    /// Returns whether the name was registered; removing an unknown name
    /// is a no-op.
    pub fn remove(&mut self, name: &str) -> bool {
        self.pipelines.shift_remove(&KeyQuery(name)).is_some()
    }

    /// Registered `(name, pipeline)` pairs in insertion order.
    ///
    /// Re-iterating without intervening mutation yields the same sequence,
    /// which is what makes execution plans reproducible.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Pipeline)> + '_ {
        self.pipelines.iter().map(|(key, pipeline)| (key.as_str(), pipeline))
    }

    /// Registered names in insertion order, original casing.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.pipelines.keys().map(Key::as_str)
    }

    /// Number of registered pipelines.
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

impl std::fmt::Debug for PipelineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRegistry")
            .field("pipelines", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
