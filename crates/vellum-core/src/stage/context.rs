/*
 * stage/context.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Stage execution context.
 */

//! Stage execution context.
//!
//! The [`StageContext`] is the owned context passed to every stage. All
//! data is owned rather than borrowed, which keeps async stage futures free
//! of lifetime parameters.

use vellum_meta::Metadata;

/// Owned context passed to all pipeline stages.
///
/// Carries the engine-wide settings store and collects non-fatal warnings.
/// The settings are populated once during configuration and treated as
/// read-only while stages execute; warnings accumulate across the whole
/// pipeline run.
#[derive(Debug, Default)]
pub struct StageContext {
    /// Engine-wide settings, readable by stages and by computed metadata
    /// values resolved against it.
    pub settings: Metadata,

    /// Non-fatal issues collected during execution.
    pub warnings: Vec<String>,
}

impl StageContext {
    /// Create a context with empty settings.
    pub fn new() -> Self {
        Self {
            settings: Metadata::new(),
            warnings: Vec::new(),
        }
    }

    /// Create a context around an existing settings store.
    pub fn with_settings(settings: Metadata) -> Self {
        Self {
            settings,
            warnings: Vec::new(),
        }
    }

    /// Record a non-fatal issue.
    ///
    /// Stages should warn rather than fail for conditions that do not
    /// invalidate the output.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_is_empty() {
        let ctx = StageContext::new();
        assert!(ctx.settings.is_empty());
        assert!(ctx.warnings.is_empty());
    }

    #[test]
    fn test_with_settings() {
        let mut settings = Metadata::new();
        settings.insert("BaseUrl", "https://example.org");

        let ctx = StageContext::with_settings(settings);
        assert_eq!(
            ctx.settings.get::<String>("baseurl").unwrap(),
            "https://example.org"
        );
    }

    #[test]
    fn test_warnings_accumulate() {
        let mut ctx = StageContext::new();
        ctx.add_warning("first");
        ctx.add_warning("second".to_string());

        assert_eq!(ctx.warnings, vec!["first", "second"]);
    }
}
