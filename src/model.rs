//! The model façade.
//!
//! A [`Model`] presents one or more sources as a single record. Every
//! accessor delegates to the access engine; none of them fails for a
//! missing key.

use std::any::Any;
use std::sync::{Arc, Weak};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::access::{AccessEngine, WriteOutcome};
use crate::alias::AliasTable;
use crate::builder::ModelBuilder;
use crate::convert::ConversionRegistry;
use crate::events::{AccessEvent, EventChannel, EventKind, ListenerId};
use crate::key::Key;
use crate::options::ModelOptions;
use crate::resolve::Origin;
use crate::source::{PropertyDescriptor, Source};
use crate::value::Value;

/// A virtualized record over one or more sources.
///
/// Cloning a `Model` clones the handle; clones share sources, listeners
/// and the resolution cache.
///
/// # Examples
///
/// ```
/// use proxy_model::{Model, Source, Value};
/// use serde_json::json;
///
/// let model = Model::builder()
///     .source(Source::from_json(json!({"name": "Tim", "level": 99})).unwrap())
///     .alias("id", "_id")
///     .readonly("level")
///     .build()
///     .unwrap();
///
/// assert_eq!(model.get("name"), Some(Value::from("Tim")));
/// assert!(model.set("level", 50));
/// assert_eq!(model.get("level"), Some(Value::Int(99)));
/// assert!(!model.has("id"));
/// ```
#[derive(Clone)]
pub struct Model {
    engine: Arc<AccessEngine>,
}

/// Non-owning model handle, for listeners and computed properties that
/// need to reach back into the model that holds them.
#[derive(Clone)]
pub struct WeakModel {
    engine: Weak<AccessEngine>,
}

impl WeakModel {
    /// The model, if it is still alive.
    pub fn upgrade(&self) -> Option<Model> {
        self.engine.upgrade().map(|engine| Model { engine })
    }
}

impl std::fmt::Debug for WeakModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakModel")
            .field("alive", &(self.engine.strong_count() > 0))
            .finish()
    }
}

impl Model {
    /// Starts building a model.
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    pub(crate) fn from_engine(engine: AccessEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Reads a property. `None` means no source and no computed property
    /// defines it.
    pub fn get(&self, key: impl Into<Key>) -> Option<Value> {
        self.engine.get(self, key.into())
    }

    /// Writes a property and reports success per the model's policy.
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) -> bool {
        self.assign(key, value).ok
    }

    /// Writes a property and returns the full outcome, including any
    /// read-only violation.
    pub fn assign(&self, key: impl Into<Key>, value: impl Into<Value>) -> WriteOutcome {
        self.engine.set(key.into(), value.into())
    }

    /// True if any source or computed property defines the key.
    pub fn has(&self, key: impl Into<Key>) -> bool {
        self.engine.has(key.into())
    }

    /// Own keys: the primary source's keys, then the declared extra keys.
    pub fn keys(&self) -> Vec<Key> {
        self.engine.own_keys()
    }

    /// Descriptor of a property: the primary source's, else a computed property's.
    pub fn describe(&self, key: impl Into<Key>) -> Option<PropertyDescriptor> {
        self.engine.describe(key.into())
    }

    /// Removes a property from the primary source.
    pub fn delete(&self, key: impl Into<Key>) -> bool {
        self.engine.delete(key.into())
    }

    /// The model's event channel.
    pub fn events(&self) -> &EventChannel {
        &self.engine.events
    }

    /// Shortcut for `events().on(..)`.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&mut AccessEvent<'_>) + Send + Sync + 'static,
    {
        self.engine.events.on(kind, listener)
    }

    /// Options the model was built with.
    pub fn options(&self) -> &ModelOptions {
        &self.engine.options
    }

    /// Alias table.
    pub fn aliases(&self) -> &AliasTable {
        &self.engine.aliases
    }

    /// Conversion registry.
    pub fn converters(&self) -> &ConversionRegistry {
        &self.engine.converters
    }

    /// Keys enumerated after the primary source's own.
    pub fn extra_keys(&self) -> &[Key] {
        &self.engine.extra_keys
    }

    /// True if writes to `key` (after alias resolution) are refused.
    pub fn is_readonly(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        self.engine.readonly.contains(self.engine.aliases.resolve(&key))
    }

    /// The underlying sources, for direct inspection.
    pub fn sources(&self) -> &[Source] {
        self.engine.sources.as_slice()
    }

    /// The source at `index`, in registration order.
    pub fn source(&self, index: usize) -> Option<&Source> {
        self.engine.sources.get(index)
    }

    /// The source that writes, deletes, descriptors and enumeration use.
    pub fn primary(&self) -> &Source {
        // write_source is checked against the source count at build time
        &self.engine.sources.as_slice()[self.engine.options.write_source]
    }

    /// The parent handle given at construction, if it has type `T`.
    pub fn parent<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.engine
            .parent
            .as_deref()
            .and_then(|p| p.downcast_ref::<T>())
    }

    /// Which source answered the last uncached read of `key`.
    pub fn cached_origin(&self, key: impl Into<Key>) -> Option<Origin> {
        let key = key.into();
        self.engine.sources.cached(self.engine.aliases.resolve(&key))
    }

    /// Drops the cached origin of `key` so the next read scans the sources
    /// again.
    pub fn forget(&self, key: impl Into<Key>) -> Option<Origin> {
        let key = key.into();
        self.engine.sources.forget(self.engine.aliases.resolve(&key))
    }

    /// Drops every cached origin.
    pub fn clear_cache(&self) {
        self.engine.sources.clear_cache();
    }

    /// A non-owning handle to this model.
    pub fn downgrade(&self) -> WeakModel {
        WeakModel {
            engine: Arc::downgrade(&self.engine),
        }
    }

    /// True if both handles refer to the same model.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.engine, &other.engine)
    }

    /// The virtualized view as a JSON object: every named key from
    /// [`Model::keys`] with its value from [`Model::get`]. Absent values are
    /// skipped.
    pub fn snapshot(&self) -> serde_json::Map<String, serde_json::Value> {
        self.keys()
            .into_iter()
            .filter_map(|key| {
                let name = key.as_name()?.to_string();
                self.get(key).map(|v| (name, v.to_json()))
            })
            .collect()
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("sources", &self.engine.sources.len())
            .field("cached", &self.engine.sources.cache_len())
            .field("options", &self.engine.options)
            .field("events", &self.engine.events)
            .finish_non_exhaustive()
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let snapshot = self.snapshot();
        let mut map = serializer.serialize_map(Some(snapshot.len()))?;
        for (k, v) in &snapshot {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
