//! Backing containers for model properties.
//!
//! A [`Document`] is an insertion-ordered property map. A [`Source`] is a
//! shared handle to one, so the caller and any number of models can see the
//! same container without copying it.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::key::Key;
use crate::value::Value;

/// Attribute flags of a stored property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct PropertyFlags {
    /// Listed by default enumeration.
    pub enumerable: bool,
    /// Can be overwritten.
    pub writable: bool,
    /// Can be removed or redefined.
    pub configurable: bool,
}

impl PropertyFlags {
    /// Enumerable, writable and configurable.
    pub const DEFAULT: Self = Self {
        enumerable: true,
        writable: true,
        configurable: true,
    };

    /// Writable and configurable, but skipped by default enumeration.
    pub const HIDDEN: Self = Self {
        enumerable: false,
        writable: true,
        configurable: true,
    };

    /// Enumerable, but can be neither overwritten nor removed.
    pub const FROZEN: Self = Self {
        enumerable: true,
        writable: false,
        configurable: false,
    };
}

impl Default for PropertyFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Property {
    value: Value,
    flags: PropertyFlags,
}

/// Describes a property as seen through a model.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyDescriptor {
    /// A property stored in a source.
    Data {
        /// Stored value.
        value: Value,
        /// Can be overwritten.
        writable: bool,
        /// Listed by default enumeration.
        enumerable: bool,
        /// Can be removed.
        configurable: bool,
    },

    /// A computed property declared on the model itself.
    Computed {
        /// Listed by default enumeration.
        enumerable: bool,
    },
}

impl PropertyDescriptor {
    /// True for a stored property.
    pub const fn is_data(&self) -> bool {
        matches!(self, Self::Data { .. })
    }

    /// True for a computed property.
    pub const fn is_computed(&self) -> bool {
        matches!(self, Self::Computed { .. })
    }

    /// Whether the property is enumerable.
    pub const fn enumerable(&self) -> bool {
        match self {
            Self::Data { enumerable, .. } | Self::Computed { enumerable } => *enumerable,
        }
    }

    /// The stored value, for data properties.
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Data { value, .. } => Some(value),
            Self::Computed { .. } => None,
        }
    }
}

/// An in-memory record: ordered keys mapped to values.
///
/// # Examples
///
/// ```
/// use proxy_model::{Document, Key, Value};
///
/// let mut doc = Document::new();
/// doc.insert("name", "Tim");
/// doc.insert("level", 99);
///
/// assert_eq!(doc.get(&Key::from("level")), Some(&Value::Int(99)));
/// assert_eq!(doc.keys(), vec![Key::from("name"), Key::from("level")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    props: IndexMap<Key, Property>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from a JSON object, keeping its key order.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::NotAnObject` for any other JSON value.
    pub fn from_json(json: serde_json::Value) -> Result<Self, ModelError> {
        let serde_json::Value::Object(map) = json else {
            return Err(ModelError::NotAnObject {
                found: json_type_name(&json),
            });
        };

        let mut doc = Self::new();
        for (k, v) in map {
            doc.insert(k, Value::from(v));
        }
        Ok(doc)
    }

    /// Writes a value with default flags, or overwrites an existing value
    /// keeping its flags.
    ///
    /// Returns false (and leaves the document unchanged) if the existing
    /// property is not writable.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> bool {
        let key = key.into();
        let value = value.into();
        match self.props.get_mut(&key) {
            Some(prop) if !prop.flags.writable => false,
            Some(prop) => {
                prop.value = value;
                true
            }
            None => {
                self.props.insert(
                    key,
                    Property {
                        value,
                        flags: PropertyFlags::DEFAULT,
                    },
                );
                true
            }
        }
    }

    /// Defines a property with explicit flags, replacing any existing one
    /// unless it is non-configurable.
    pub fn define(
        &mut self,
        key: impl Into<Key>,
        value: impl Into<Value>,
        flags: PropertyFlags,
    ) -> bool {
        let key = key.into();
        if self.props.get(&key).is_some_and(|p| !p.flags.configurable) {
            return false;
        }
        let value = value.into();
        match self.props.get_mut(&key) {
            Some(prop) => {
                prop.value = value;
                prop.flags = flags;
            }
            None => {
                self.props.insert(key, Property { value, flags });
            }
        }
        true
    }

    /// The value stored under `key`.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.props.get(key).map(|p| &p.value)
    }

    /// True if `key` is defined, whatever its value.
    pub fn contains(&self, key: &Key) -> bool {
        self.props.contains_key(key)
    }

    /// Removes a property, preserving the order of the remaining keys.
    ///
    /// Returns false if the property is non-configurable. Removing an absent
    /// key succeeds.
    pub fn remove(&mut self, key: &Key) -> bool {
        match self.props.get(key) {
            Some(prop) if !prop.flags.configurable => false,
            Some(_) => {
                self.props.shift_remove(key);
                true
            }
            None => true,
        }
    }

    /// Flags of the property under `key`.
    pub fn flags(&self, key: &Key) -> Option<PropertyFlags> {
        self.props.get(key).map(|p| p.flags)
    }

    /// The native descriptor for a stored property.
    pub fn descriptor(&self, key: &Key) -> Option<PropertyDescriptor> {
        self.props.get(key).map(|p| PropertyDescriptor::Data {
            value: p.value.clone(),
            writable: p.flags.writable,
            enumerable: p.flags.enumerable,
            configurable: p.flags.configurable,
        })
    }

    /// Enumerable named keys, in insertion order.
    pub fn keys(&self) -> Vec<Key> {
        self.props
            .iter()
            .filter(|(k, p)| k.is_name() && p.flags.enumerable)
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// All named keys, enumerable or not, in insertion order.
    pub fn names(&self) -> Vec<Key> {
        self.props.keys().filter(|k| k.is_name()).cloned().collect()
    }

    /// All symbol keys, in insertion order.
    pub fn symbols(&self) -> Vec<Key> {
        self.props.keys().filter(|k| k.is_symbol()).cloned().collect()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// True if the document has no properties.
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Plain JSON object of the named properties.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .props
            .iter()
            .filter_map(|(k, p)| k.as_name().map(|n| (n.to_string(), p.value.to_json())))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl TryFrom<serde_json::Value> for Document {
    type Error = ModelError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Self::from_json(json)
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut doc = Self::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

fn json_type_name(json: &serde_json::Value) -> &'static str {
    use serde_json::Value as Json;

    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Shared handle to a [`Document`].
///
/// Cloning a `Source` clones the handle, not the document. A model never
/// copies its sources; writes through the model are visible to every other
/// holder of the handle.
#[derive(Debug, Clone, Default)]
pub struct Source {
    doc: Arc<RwLock<Document>>,
}

impl Source {
    /// Wraps a document in a new shared handle.
    #[must_use]
    pub fn new(doc: Document) -> Self {
        Self {
            doc: Arc::new(RwLock::new(doc)),
        }
    }

    /// Builds a source from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::NotAnObject` for any other JSON value.
    pub fn from_json(json: serde_json::Value) -> Result<Self, ModelError> {
        Document::from_json(json).map(Self::new)
    }

    // Lock poisoning only means a listener panicked mid-access; the document
    // itself is still consistent, so recover the guard.
    /// Read access to the document.
    pub fn read(&self) -> RwLockReadGuard<'_, Document> {
        self.doc.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write access to the document.
    pub fn write(&self) -> RwLockWriteGuard<'_, Document> {
        self.doc.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clones the value stored under `key`.
    pub fn lookup(&self, key: &Key) -> Option<Value> {
        self.read().get(key).cloned()
    }

    /// True if `key` is defined.
    pub fn contains(&self, key: &Key) -> bool {
        self.read().contains(key)
    }

    /// True if both handles point at the same document.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.doc, &other.doc)
    }
}

impl From<Document> for Source {
    fn from(doc: Document) -> Self {
        Self::new(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Symbol;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_order() {
        let doc = Document::from_json(json!({"name": "Tim", "level": 99, "admin": true})).unwrap();
        assert_eq!(
            doc.keys(),
            vec![Key::from("name"), Key::from("level"), Key::from("admin")]
        );
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = Document::from_json(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ModelError::NotAnObject { found: "array" }));
    }

    #[test]
    fn test_null_is_stored() {
        let mut doc = Document::new();
        doc.insert("gone", Value::Null);
        assert!(doc.contains(&Key::from("gone")));
        assert_eq!(doc.get(&Key::from("gone")), Some(&Value::Null));
    }

    #[test]
    fn test_hidden_keys_only_in_names() {
        let mut doc = Document::new();
        doc.insert("a", 1);
        doc.define("secret", 2, PropertyFlags::HIDDEN);
        doc.insert("b", 3);

        assert_eq!(doc.keys(), vec![Key::from("a"), Key::from("b")]);
        assert_eq!(
            doc.names(),
            vec![Key::from("a"), Key::from("secret"), Key::from("b")]
        );
    }

    #[test]
    fn test_symbols_listed_separately() {
        let sym = Symbol::new("meta");
        let mut doc = Document::new();
        doc.insert(sym.clone(), 1);
        doc.insert("a", 2);

        assert_eq!(doc.keys(), vec![Key::from("a")]);
        assert_eq!(doc.symbols(), vec![Key::from(sym)]);
    }

    #[test]
    fn test_frozen_property_resists_write_and_remove() {
        let key = Key::from("id");
        let mut doc = Document::new();
        doc.define("id", 7, PropertyFlags::FROZEN);

        assert!(!doc.insert("id", 8));
        assert!(!doc.remove(&key));
        assert!(!doc.define("id", 9, PropertyFlags::DEFAULT));
        assert_eq!(doc.get(&key), Some(&Value::Int(7)));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut doc: Document = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert!(doc.remove(&Key::from("b")));
        assert!(doc.remove(&Key::from("missing")));
        assert_eq!(doc.keys(), vec![Key::from("a"), Key::from("c")]);
    }

    #[test]
    fn test_descriptor() {
        let mut doc = Document::new();
        doc.define("x", 1, PropertyFlags::HIDDEN);
        let desc = doc.descriptor(&Key::from("x")).unwrap();
        assert_eq!(
            desc,
            PropertyDescriptor::Data {
                value: Value::Int(1),
                writable: true,
                enumerable: false,
                configurable: true,
            }
        );
        assert!(doc.descriptor(&Key::from("y")).is_none());
    }

    #[test]
    fn test_source_handles_share_document() {
        let a = Source::from_json(json!({"n": 1})).unwrap();
        let b = a.clone();
        b.write().insert("n", 2);
        assert_eq!(a.lookup(&Key::from("n")), Some(Value::Int(2)));
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&Source::default()));
    }

    #[test]
    fn test_to_json_skips_symbols() {
        let mut doc = Document::new();
        doc.insert("a", 1);
        doc.insert(Symbol::new("s"), 2);
        assert_eq!(doc.to_json(), json!({"a": 1}));
    }
}
