/*
 * stage/error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Pipeline error types.
 */

//! Error types for pipeline execution.

use vellum_meta::MetadataError;

/// Error that occurs during pipeline execution.
#[derive(Debug)]
pub enum PipelineError {
    /// A stage failed.
    StageError {
        /// Name of the stage that failed
        stage: String,
        /// What went wrong
        message: String,
    },

    /// A metadata read inside a stage failed.
    Metadata(MetadataError),

    /// Other error with message.
    Other(String),
}

impl PipelineError {
    /// Create a StageError.
    pub fn stage_error(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StageError {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Create an Other error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::StageError { stage, message } => {
                write!(f, "Stage '{}' failed: {}", stage, message)
            }
            PipelineError::Metadata(e) => write!(f, "Metadata error: {}", e),
            PipelineError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Metadata(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MetadataError> for PipelineError {
    fn from(e: MetadataError) -> Self {
        PipelineError::Metadata(e)
    }
}
