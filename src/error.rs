//! Error types for proxy-model.
//!
//! Only construction can fail. Every access operation resolves absence and
//! read-only attempts into its normal return contract, so these errors are
//! about configuration and input documents.

use thiserror::Error;

use crate::key::Key;
use crate::value::Value;

/// Errors raised while building a model or its inputs.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No source was supplied.
    #[error("No valid source specified: a model needs at least one source")]
    NoSources,

    /// `options.write_source` does not name a source.
    #[error("Write source index {index} is out of range ({count} sources)")]
    InvalidWriteTarget {
        /// Requested source index.
        index: usize,
        /// Number of sources.
        count: usize,
    },

    /// A source was built from JSON that is not an object.
    #[error("Source document must be a JSON object, got {found}")]
    NotAnObject {
        /// JSON type that was found.
        found: &'static str,
    },

    /// Options JSON could not be parsed.
    #[error("Invalid model options: {0}")]
    Options(#[from] serde_json::Error),
}

impl ModelError {
    /// Returns true if this error was caused by the model configuration
    /// rather than by an input document.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NoSources | Self::InvalidWriteTarget { .. } | Self::Options(_)
        )
    }
}

/// Diagnostic record for a write rejected by the read-only policy.
///
/// Never raised as an error: it travels on the write context and in
/// [`crate::WriteOutcome`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReadonlyViolation {
    /// Key as the caller supplied it.
    pub requested: Key,
    /// Key after alias resolution.
    pub key: Key,
    /// Raw value that would have been written.
    pub attempted: Value,
    /// Index of the source the write was routed to.
    pub target: usize,
}

impl std::fmt::Display for ReadonlyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.requested == self.key {
            write!(f, "readonly property '{}'", self.key)
        } else {
            write!(f, "readonly property '{}' (via '{}')", self.key, self.requested)
        }
    }
}

/// Result type alias for proxy-model construction.
pub type ModelResult<T> = Result<T, ModelError>;
