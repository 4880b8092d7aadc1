//! Value conversion between stored and API shapes.
//!
//! A field converter pairs an optional `get` (raw to API) with an optional
//! `set` (API to raw). A field may instead carry a catch-all that sees the
//! whole read context, and the registry may hold a default catch-all for
//! fields without a converter of their own.

/// MongoDB extended-JSON converters.
pub mod mongodb;

use std::collections::HashMap;
use std::sync::Arc;

use crate::events::ReadContext;
use crate::key::Key;
use crate::value::Value;

/// Raw-to-API transform. The raw value is `None` when nothing answered for
/// the key. Returning `None` keeps the current value.
pub type GetFn = Arc<dyn Fn(Option<&Value>, &ReadContext) -> Option<Value> + Send + Sync>;

/// API-to-raw transform.
pub type SetFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Catch-all read transform over the full context. Returning `None` keeps
/// the current value.
pub type ContextFn = Arc<dyn Fn(&ReadContext) -> Option<Value> + Send + Sync>;

/// A bidirectional value transform for one field.
///
/// # Examples
///
/// ```
/// use proxy_model::{Converter, Value};
///
/// let upper = Converter::new()
///     .with_get(|raw, _| raw?.as_string().map(|s| Value::from(s.to_uppercase())))
///     .with_set(|v| match v {
///         Value::String(s) => Value::String(s.to_lowercase()),
///         other => other,
///     });
/// assert!(upper.has_get());
/// assert!(upper.has_set());
/// ```
#[derive(Clone, Default)]
pub struct Converter {
    get: Option<GetFn>,
    set: Option<SetFn>,
    all: Option<ContextFn>,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("get", &self.get.is_some())
            .field("set", &self.set.is_some())
            .field("all", &self.all.is_some())
            .finish()
    }
}

impl Converter {
    /// A converter with no transforms.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A field converter whose read side sees the whole context.
    #[must_use]
    pub fn all<F>(f: F) -> Self
    where
        F: Fn(&ReadContext) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            all: Some(Arc::new(f)),
            ..Self::default()
        }
    }

    /// Sets the raw-to-API transform. It runs on every read of the field,
    /// including reads of an absent key.
    #[must_use]
    pub fn with_get<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&Value>, &ReadContext) -> Option<Value> + Send + Sync + 'static,
    {
        self.get = Some(Arc::new(f));
        self
    }

    /// Sets the API-to-raw transform applied before writes.
    #[must_use]
    pub fn with_set<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.set = Some(Arc::new(f));
        self
    }

    /// True if a raw-to-API transform is set.
    pub const fn has_get(&self) -> bool {
        self.get.is_some()
    }

    /// True if an API-to-raw transform is set.
    pub const fn has_set(&self) -> bool {
        self.set.is_some()
    }

    // `get` wins over `all`.
    fn read(&self, ctx: &ReadContext) -> Option<Value> {
        if let Some(get) = &self.get {
            return get(ctx.raw.as_ref(), ctx);
        }
        self.all.as_ref().and_then(|all| all(ctx))
    }
}

/// Field converters plus an optional default catch-all.
///
/// Keys are physical keys: the engine consults the registry after alias
/// resolution.
#[derive(Debug, Clone, Default)]
pub struct ConversionRegistry {
    fields: HashMap<Key, Converter>,
    default: Option<Converter>,
}

impl ConversionRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field converter, returning the one it replaces.
    pub fn insert(&mut self, key: impl Into<Key>, converter: Converter) -> Option<Converter> {
        self.fields.insert(key.into(), converter)
    }

    /// Sets the catch-all used for fields without their own converter.
    pub fn set_default<F>(&mut self, f: F)
    where
        F: Fn(&ReadContext) -> Option<Value> + Send + Sync + 'static,
    {
        self.default = Some(Converter::all(f));
    }

    /// Takes over `other`'s field converters, and its default if it has one.
    pub fn merge(&mut self, other: Self) {
        self.fields.extend(other.fields);
        if other.default.is_some() {
            self.default = other.default;
        }
    }

    /// True if `key` has a field converter of its own.
    pub fn has_converter(&self, key: &Key) -> bool {
        self.fields.contains_key(key)
    }

    /// True if a default catch-all is set.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The field converter for `key`.
    pub fn get(&self, key: &Key) -> Option<&Converter> {
        self.fields.get(key)
    }

    /// Converts a resolved raw value for the caller.
    ///
    /// Returns `None` when no transform applies or the transform declined,
    /// in which case the raw value stands.
    pub fn apply_get(&self, ctx: &ReadContext) -> Option<Value> {
        match self.fields.get(&ctx.key) {
            Some(conv) => conv.read(ctx),
            None => self.default.as_ref().and_then(|d| d.read(ctx)),
        }
    }

    /// Converts an API value into the shape it is stored in.
    pub fn apply_set(&self, key: &Key, value: Value) -> Value {
        match self.fields.get(key).and_then(|c| c.set.as_ref()) {
            Some(set) => set(value),
            None => value,
        }
    }

    /// Number of field converters.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if there are no field converters and no default.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.default.is_none()
    }
}

impl<K: Into<Key>> FromIterator<(K, Converter)> for ConversionRegistry {
    fn from_iter<T: IntoIterator<Item = (K, Converter)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, c)| (k.into(), c)).collect(),
            default: None,
        }
    }
}

impl<K: Into<Key>> Extend<(K, Converter)> for ConversionRegistry {
    fn extend<T: IntoIterator<Item = (K, Converter)>>(&mut self, iter: T) {
        self.fields
            .extend(iter.into_iter().map(|(k, c)| (k.into(), c)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Origin;

    fn ctx(key: &str, raw: Option<Value>) -> ReadContext {
        ReadContext {
            requested: Key::from(key),
            key: Key::from(key),
            value: raw.clone(),
            raw,
            origin: Some(Origin::Source(0)),
        }
    }

    fn doubler() -> Converter {
        Converter::new()
            .with_get(|raw, _| raw?.as_int().map(|n| Value::Int(n * 2)))
            .with_set(|v| v.as_int().map_or(v, |n| Value::Int(n / 2)))
    }

    #[test]
    fn test_no_converter_passes_through() {
        let reg = ConversionRegistry::new();
        assert_eq!(reg.apply_get(&ctx("n", Some(Value::Int(1)))), None);
        assert_eq!(reg.apply_set(&Key::from("n"), Value::Int(1)), Value::Int(1));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_field_converter_both_ways() {
        let reg: ConversionRegistry = [("n", doubler())].into_iter().collect();
        assert!(reg.has_converter(&Key::from("n")));
        assert_eq!(reg.apply_get(&ctx("n", Some(Value::Int(4)))), Some(Value::Int(8)));
        assert_eq!(reg.apply_set(&Key::from("n"), Value::Int(8)), Value::Int(4));
    }

    #[test]
    fn test_field_get_runs_for_absent_raw() {
        let reg: ConversionRegistry = [(
            "level",
            Converter::new().with_get(|raw, _| match raw {
                Some(v) => Some(v.clone()),
                None => Some(Value::Int(1)),
            }),
        )]
        .into_iter()
        .collect();
        assert_eq!(reg.apply_get(&ctx("level", None)), Some(Value::Int(1)));
        assert_eq!(
            reg.apply_get(&ctx("level", Some(Value::Int(5)))),
            Some(Value::Int(5))
        );
    }

    #[test]
    fn test_declining_get_keeps_absence() {
        let reg: ConversionRegistry = [("n", doubler())].into_iter().collect();
        assert_eq!(reg.apply_get(&ctx("n", None)), None);
    }

    #[test]
    fn test_default_applies_only_without_field_converter() {
        let mut reg: ConversionRegistry = [("n", doubler())].into_iter().collect();
        reg.set_default(|ctx| {
            if ctx.raw.is_none() {
                Some(Value::from("fallback"))
            } else {
                None
            }
        });

        assert_eq!(reg.apply_get(&ctx("missing", None)), Some(Value::from("fallback")));
        assert_eq!(reg.apply_get(&ctx("other", Some(Value::Int(1)))), None);
        // Field converter shadows the default, even when it declines.
        assert_eq!(reg.apply_get(&ctx("n", None)), None);
    }

    #[test]
    fn test_field_catch_all_sees_origin() {
        let reg: ConversionRegistry = [(
            "src",
            Converter::all(|ctx| ctx.origin.map(|o| Value::from(o.to_string()))),
        )]
        .into_iter()
        .collect();

        assert_eq!(
            reg.apply_get(&ctx("src", Some(Value::Null))),
            Some(Value::from("source:0"))
        );
    }

    #[test]
    fn test_set_only_converter_leaves_reads_alone() {
        let reg: ConversionRegistry = [("s", Converter::new().with_set(|_| Value::Null))]
            .into_iter()
            .collect();
        assert_eq!(reg.apply_get(&ctx("s", Some(Value::Int(1)))), None);
        assert_eq!(reg.apply_set(&Key::from("s"), Value::Int(1)), Value::Null);
    }
}
