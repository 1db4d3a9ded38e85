/*
 * stage/traits.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Stage trait definition.
 */

//! Pipeline stage trait.
//!
//! The [`Stage`] trait is the interface every pipeline stage implements.
//! Stages take a batch of documents and produce a batch of documents; a
//! stage may filter, reorder, fan out or collapse the batch as it sees fit.

use async_trait::async_trait;

use super::context::StageContext;
use super::error::PipelineError;
use crate::document::Document;

/// A single stage in a pipeline.
///
/// # Design Philosophy
///
/// - **Stages are unconditional**: they always run when included in a
///   pipeline. Conditional assembly belongs to whoever builds the
///   [`Pipeline`](super::Pipeline).
///
/// - **Stages can hold configuration** but should not hold mutable state
///   between executions; mutable state goes in [`StageContext`].
///
/// - **Stages are async**: even trivial stages are async so that stages
///   needing I/O (through external collaborators) compose with the rest.
///
/// # Thread Safety
///
/// Stages must be `Send + Sync` so pipelines can be shared across threads
/// during a parallel read phase.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Human-readable name for logging and error messages.
    fn name(&self) -> &str;

    /// Run the stage over a document batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage fails; non-fatal issues should be
    /// recorded with [`StageContext::add_warning`] instead.
    async fn run(
        &self,
        inputs: Vec<Document>,
        ctx: &mut StageContext,
    ) -> Result<Vec<Document>, PipelineError>;
}
