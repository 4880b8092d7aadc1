//! Properties derived by the model rather than stored in a source.

use std::sync::Arc;

use crate::model::Model;
use crate::value::Value;

/// Getter of a computed property. It receives the model, so it may read
/// other (converted) properties through it.
pub type ComputedFn = Arc<dyn Fn(&Model) -> Value + Send + Sync>;

/// A read-only property answered by the model when no source holds the key.
///
/// # Examples
///
/// ```
/// use proxy_model::{ComputedProperty, Model, Source, Value};
/// use serde_json::json;
///
/// let model = Model::builder()
///     .source(Source::from_json(json!({"first": "Ada", "last": "Lovelace"})).unwrap())
///     .computed("full", ComputedProperty::new(|m| {
///         let first = m.get("first").unwrap_or_default();
///         let last = m.get("last").unwrap_or_default();
///         Value::from(format!("{} {}", first.as_string().unwrap_or(""), last.as_string().unwrap_or("")))
///     }))
///     .build()
///     .unwrap();
///
/// assert_eq!(model.get("full"), Some(Value::from("Ada Lovelace")));
/// ```
#[derive(Clone)]
pub struct ComputedProperty {
    getter: ComputedFn,
    enumerable: bool,
}

impl std::fmt::Debug for ComputedProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputedProperty")
            .field("enumerable", &self.enumerable)
            .finish_non_exhaustive()
    }
}

impl ComputedProperty {
    /// A non-enumerable computed property.
    pub fn new<F>(getter: F) -> Self
    where
        F: Fn(&Model) -> Value + Send + Sync + 'static,
    {
        Self {
            getter: Arc::new(getter),
            enumerable: false,
        }
    }

    /// Sets whether the property is enumerable in its descriptor.
    #[must_use]
    pub fn enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = enumerable;
        self
    }

    /// True if the property is enumerable.
    pub const fn is_enumerable(&self) -> bool {
        self.enumerable
    }

    pub(crate) fn compute(&self, model: &Model) -> Value {
        (self.getter)(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use serde_json::json;

    #[test]
    fn test_defaults_to_hidden() {
        let prop = ComputedProperty::new(|_| Value::Null);
        assert!(!prop.is_enumerable());
        assert!(prop.enumerable(true).is_enumerable());
    }

    #[test]
    fn test_compute_sees_model() {
        let model = Model::builder()
            .source(Source::from_json(json!({"n": 2})).unwrap())
            .build()
            .unwrap();
        let prop = ComputedProperty::new(|m| {
            Value::Int(m.get("n").and_then(|v| v.as_int()).unwrap_or(0) + 1)
        });
        assert_eq!(prop.compute(&model), Value::Int(3));
    }
}
