//! Error types for typed metadata access.

use thiserror::Error;

/// Errors surfaced by typed metadata access.
///
/// A `&str` key can never be null, so the null-key failure mode of the
/// accessor contract is unrepresentable here; absent keys are the only
/// "missing" condition and only the strict accessor treats them as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// Strict accessor called with a key the store does not contain.
    #[error("metadata key not found: {key}")]
    KeyNotFound {
        /// The key as the caller wrote it
        key: String,
    },

    /// The resolved value's runtime type does not match the requested type
    /// and no conversion is registered for the pair (or the registered
    /// conversion failed).
    #[error("cannot read metadata key '{key}' as {to}: stored value is {from}")]
    InvalidCast {
        /// The key as the caller wrote it
        key: String,
        /// Runtime type of the stored (resolved) value
        from: &'static str,
        /// Type the caller requested
        to: &'static str,
    },

    /// A computed value kept yielding further computed values past the
    /// expansion cap. The chain is almost certainly self-referential.
    #[error("computed value for metadata key '{key}' did not settle after {limit} expansions")]
    CyclicComputation {
        /// The key as the caller wrote it
        key: String,
        /// Number of expansions attempted before giving up
        limit: usize,
    },
}
