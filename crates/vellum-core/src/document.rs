/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The document unit that flows through pipelines.
 */

//! Documents.
//!
//! A [`Document`] is the unit of work pipelines operate on: a metadata
//! store plus an optional text body. Content providers and stream I/O live
//! outside this core; the body here is the minimal hook stages need to hand
//! rendered text down the line.

use std::sync::Arc;

use vellum_meta::Metadata;

/// A unit of content flowing through pipeline stages.
///
/// Cloning is cheap where it matters: the body is shared, and metadata
/// slots are `Arc`-backed, so a stage that clones a document to emit a
/// variant does not copy resolved values.
#[derive(Debug, Clone)]
pub struct Document {
    metadata: Metadata,
    content: Option<Arc<str>>,
}

impl Document {
    /// Create an empty document with default metadata.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::new(),
            content: None,
        }
    }

    /// Create a document carrying the given metadata.
    pub fn with_metadata(metadata: Metadata) -> Self {
        Self {
            metadata,
            content: None,
        }
    }

    /// Attach a text body.
    pub fn with_content(mut self, content: impl Into<Arc<str>>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// This document's metadata store.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Mutable access to the metadata store.
    ///
    /// Only the pipeline stage that currently owns the document should
    /// mutate it; downstream consumers read through the typed accessors.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// The text body, if one has been attached.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Whether a body has been attached.
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
