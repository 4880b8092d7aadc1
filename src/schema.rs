//! Declarative model definitions.
//!
//! A schema declares, once, everything a model type needs: aliases,
//! read-only keys, converters, computed properties and a setup hook. Every
//! member has an empty default, so a schema only states what it uses.

use crate::computed::ComputedProperty;
use crate::convert::ConversionRegistry;
use crate::key::Key;
use crate::model::Model;
use crate::options::ModelOptions;

/// Capability declaration for a kind of model.
///
/// Apply one with [`crate::ModelBuilder::schema`].
///
/// # Examples
///
/// ```
/// use proxy_model::{Key, Model, ModelSchema, Source};
/// use serde_json::json;
///
/// struct User;
///
/// impl ModelSchema for User {
///     fn aliases(&self) -> Vec<(Key, Key)> {
///         vec![(Key::from("id"), Key::from("_id"))]
///     }
///
///     fn readonly_keys(&self) -> Vec<Key> {
///         vec![Key::from("id")]
///     }
/// }
///
/// let user = Model::builder()
///     .source(Source::from_json(json!({"_id": "1"})).unwrap())
///     .schema(User)
///     .build()
///     .unwrap();
///
/// assert!(user.is_readonly("_id"));
/// ```
pub trait ModelSchema {
    /// Options for models of this kind; `None` keeps the builder's.
    fn options(&self) -> Option<ModelOptions> {
        None
    }

    /// Public keys mapped onto the keys they are stored under.
    fn aliases(&self) -> Vec<(Key, Key)> {
        Vec::new()
    }

    /// Keys that refuse writes.
    fn readonly_keys(&self) -> Vec<Key> {
        Vec::new()
    }

    /// Keys enumerated after the primary source's own keys.
    fn extra_keys(&self) -> Vec<Key> {
        Vec::new()
    }

    /// Field converters and an optional default.
    fn converters(&self) -> ConversionRegistry {
        ConversionRegistry::new()
    }

    /// Computed properties answered when no source holds the key.
    fn computed(&self) -> Vec<(Key, ComputedProperty)> {
        Vec::new()
    }

    /// Runs once on each new model, after construction. The usual place to
    /// register listeners.
    fn setup(&self, _model: &Model) {}
}
