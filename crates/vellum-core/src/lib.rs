//! Pipeline registry and stage execution core for vellum
//!
//! This crate contains the pipeline infrastructure of the vellum
//! content-generation engine: documents, stages, pipeline definitions and
//! the named registry the execution driver enumerates.
//!
//! # Architecture
//!
//! The engine is organized around these key types:
//!
//! - [`Document`] - A metadata store plus an optional text body
//! - [`Stage`] - A single processing step over a document batch
//! - [`Pipeline`] - An ordered stage sequence with declared dependencies
//! - [`PipelineRegistry`] - Case-insensitively unique, insertion-ordered
//!   pipeline collection
//! - [`StageContext`] - Per-run mutable state passed through stages
//!
//! # Example
//!
//! ```ignore
//! use vellum_core::{Document, Pipeline, PipelineRegistry, StageContext};
//!
//! // Configuration phase: assemble pipelines and register them by name.
//! let mut content = Pipeline::new();
//! content.push(Box::new(FrontMatterStage));
//! content.push(Box::new(RenderStage));
//!
//! let mut registry = PipelineRegistry::new();
//! registry.add("Content", content)?;
//! registry.add("Feeds", Pipeline::new().with_dependency("content"))?;
//!
//! // Execution phase: the driver enumerates the registry in declared
//! // order and runs each pipeline over its input documents.
//! let mut ctx = StageContext::new();
//! for (name, pipeline) in registry.iter() {
//!     let outputs = pipeline.run(inputs_for(name), &mut ctx).await?;
//!     // ...
//! }
//! ```

pub mod document;
pub mod registry;
pub mod stage;

// Re-export commonly used types
pub use document::Document;
pub use registry::{PipelineRegistry, RegistryError};
pub use stage::{Pipeline, PipelineError, Stage, StageContext};
pub use vellum_meta::{ConversionTable, Metadata, MetadataError, Value};
