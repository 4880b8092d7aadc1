//! Model options.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Behaviour switches resolved once when a model is built.
///
/// Every field has a default, so options can be loaded from partial JSON.
///
/// # Examples
///
/// ```
/// use proxy_model::ModelOptions;
///
/// let opts = ModelOptions::from_json(r#"{"readonly_fail": true}"#).unwrap();
/// assert!(!opts.readonly_write_succeeds());
/// assert!(opts.confirm_delete);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ModelOptions {
    /// Include non-enumerable named keys of the primary source in `keys()`.
    pub enumerate_non_enumerable: bool,
    /// Append symbol keys of the primary source to `keys()`.
    pub enumerate_symbols: bool,
    /// After a default delete, report success only if the key is gone.
    pub confirm_delete: bool,
    /// Report read-only writes as failures. Ignored if `readonly_return` is set.
    pub readonly_fail: bool,
    /// Explicit result for read-only writes.
    pub readonly_return: Option<bool>,
    /// Index of the source that writes, deletes, descriptors and
    /// enumeration go to.
    pub write_source: usize,
    /// Attach a [`crate::observe::TraceObserver`] at construction.
    pub trace_events: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            enumerate_non_enumerable: false,
            enumerate_symbols: false,
            confirm_delete: true,
            readonly_fail: false,
            readonly_return: None,
            write_source: 0,
            trace_events: false,
        }
    }
}

impl ModelOptions {
    /// Parses options from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Options` if the JSON is malformed or a field has
    /// the wrong type.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// What a write to a read-only key reports.
    #[must_use]
    pub fn readonly_write_succeeds(&self) -> bool {
        self.readonly_return.unwrap_or(!self.readonly_fail)
    }
}
