/*
 * stage/pipeline.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Pipeline definition and stage execution.
 */

//! Pipeline definition and execution.
//!
//! A [`Pipeline`] is an ordered sequence of stages plus the names of other
//! pipelines it depends on. Stages run in insertion order; dependency
//! names are data for an external execution driver and are not interpreted
//! here.

use super::context::StageContext;
use super::error::PipelineError;
use super::traits::Stage;
use crate::document::Document;

/// An ordered sequence of stages documents flow through.
///
/// # Example
///
/// ```ignore
/// use vellum_core::stage::{Pipeline, Stage};
///
/// let mut pipeline = Pipeline::new().with_dependency("assets");
/// pipeline.push(Box::new(FrontMatterStage));
/// pipeline.push(Box::new(RenderStage));
///
/// let outputs = pipeline.run(inputs, &mut ctx).await?;
/// ```
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    dependencies: Vec<String>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Create a pipeline from a stage sequence.
    pub fn with_stages(stages: Vec<Box<dyn Stage>>) -> Self {
        Self {
            stages,
            dependencies: Vec::new(),
        }
    }

    /// Add a stage to the end of the pipeline.
    ///
    /// Stages run in the order they are added.
    pub fn push(&mut self, stage: Box<dyn Stage>) {
        self.stages.push(stage);
    }

    /// Add multiple stages to the pipeline.
    pub fn extend(&mut self, stages: impl IntoIterator<Item = Box<dyn Stage>>) {
        self.stages.extend(stages);
    }

    /// Declare that another pipeline must execute before this one.
    ///
    /// The name is matched case-insensitively by the registry; this
    /// pipeline only records it.
    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(name.into());
        self
    }

    /// Names of pipelines that must execute before this one.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Get the number of stages in the pipeline.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check if the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// List the names of all stages in execution order.
    ///
    /// Useful for debugging and logging.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run the pipeline over a document batch.
    ///
    /// Each stage's output batch becomes the next stage's input. An empty
    /// pipeline yields its input unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered. Execution stops on error.
    pub async fn run(
        &self,
        inputs: Vec<Document>,
        ctx: &mut StageContext,
    ) -> Result<Vec<Document>, PipelineError> {
        let mut documents = inputs;
        for stage in &self.stages {
            tracing::debug!(
                stage = stage.name(),
                documents = documents.len(),
                "Running stage"
            );
            documents = stage.run(documents, ctx).await?;
        }
        Ok(documents)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use vellum_meta::Value;

    /// A test stage that records its execution order.
    struct CountingStage {
        name: &'static str,
        counter: Arc<AtomicUsize>,
        my_order: usize,
        order_tracker: Arc<Mutex<Vec<usize>>>,
    }

    #[async_trait]
    impl Stage for CountingStage {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(
            &self,
            inputs: Vec<Document>,
            _ctx: &mut StageContext,
        ) -> Result<Vec<Document>, PipelineError> {
            self.counter.fetch_add(1, Ordering::SeqCst);
            self.order_tracker.lock().unwrap().push(self.my_order);
            Ok(inputs)
        }
    }

    /// A stage that always fails.
    struct FailingStage;

    #[async_trait]
    impl Stage for FailingStage {
        fn name(&self) -> &str {
            "failing"
        }

        async fn run(
            &self,
            _inputs: Vec<Document>,
            _ctx: &mut StageContext,
        ) -> Result<Vec<Document>, PipelineError> {
            Err(PipelineError::stage_error("failing", "Intentional failure"))
        }
    }

    /// Derives a slug from each document's title.
    struct SlugStage;

    #[async_trait]
    impl Stage for SlugStage {
        fn name(&self) -> &str {
            "slug"
        }

        async fn run(
            &self,
            mut inputs: Vec<Document>,
            ctx: &mut StageContext,
        ) -> Result<Vec<Document>, PipelineError> {
            for doc in &mut inputs {
                if !doc.metadata().contains_key("title") {
                    ctx.add_warning("document without a title");
                    continue;
                }
                doc.metadata_mut().insert(
                    "slug",
                    Value::computed(|m| {
                        let title: String = m.get("title").unwrap_or_default();
                        Value::from(title.to_lowercase().replace(' ', "-"))
                    }),
                );
            }
            Ok(inputs)
        }
    }

    fn counting(
        name: &'static str,
        counter: &Arc<AtomicUsize>,
        my_order: usize,
        order_tracker: &Arc<Mutex<Vec<usize>>>,
    ) -> Box<dyn Stage> {
        Box::new(CountingStage {
            name,
            counter: counter.clone(),
            my_order,
            order_tracker: order_tracker.clone(),
        })
    }

    #[test]
    fn test_empty_pipeline_passes_batch_through() {
        let pipeline = Pipeline::new();
        assert!(pipeline.is_empty());

        let mut ctx = StageContext::new();
        let out = pollster::block_on(pipeline.run(vec![Document::new()], &mut ctx)).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_stages_run_in_insertion_order() {
        let counter = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut pipeline = Pipeline::new();
        pipeline.push(counting("first", &counter, 1, &order));
        pipeline.push(counting("second", &counter, 2, &order));
        pipeline.push(counting("third", &counter, 3, &order));

        let mut ctx = StageContext::new();
        pollster::block_on(pipeline.run(Vec::new(), &mut ctx)).unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_error_stops_execution() {
        let counter = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut pipeline = Pipeline::new();
        pipeline.push(counting("before-fail", &counter, 1, &order));
        pipeline.push(Box::new(FailingStage));
        pipeline.push(counting("after-fail", &counter, 3, &order));

        let mut ctx = StageContext::new();
        let result = pollster::block_on(pipeline.run(Vec::new(), &mut ctx));

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(*order.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_stage_names() {
        let counter = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut pipeline = Pipeline::new();
        pipeline.push(counting("alpha", &counter, 1, &order));
        pipeline.push(counting("beta", &counter, 2, &order));

        assert_eq!(pipeline.stage_names(), vec!["alpha", "beta"]);
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn test_dependencies_are_recorded() {
        let pipeline = Pipeline::new()
            .with_dependency("assets")
            .with_dependency("Content");

        assert_eq!(pipeline.dependencies(), &["assets", "Content"]);
    }

    #[test]
    fn test_stage_derives_metadata() {
        let mut pipeline = Pipeline::new();
        pipeline.push(Box::new(SlugStage));

        let mut doc = Document::new().with_content("# Post");
        doc.metadata_mut().insert("Title", "Hello World");

        let mut ctx = StageContext::new();
        let out = pollster::block_on(pipeline.run(vec![doc], &mut ctx)).unwrap();

        assert_eq!(
            out[0].metadata().get::<String>("slug").unwrap(),
            "hello-world"
        );
        assert!(ctx.warnings.is_empty());
    }

    #[test]
    fn test_stage_warnings_accumulate() {
        let mut pipeline = Pipeline::new();
        pipeline.push(Box::new(SlugStage));

        let docs = vec![Document::new(), Document::new()];
        let mut ctx = StageContext::new();
        pollster::block_on(pipeline.run(docs, &mut ctx)).unwrap();

        assert_eq!(ctx.warnings.len(), 2);
    }

    #[test]
    fn test_pipeline_debug() {
        let counter = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut pipeline = Pipeline::new().with_dependency("assets");
        pipeline.push(counting("parse", &counter, 1, &order));

        let debug = format!("{:?}", pipeline);
        assert!(debug.contains("Pipeline"));
        assert!(debug.contains("parse"));
        assert!(debug.contains("assets"));
    }
}
