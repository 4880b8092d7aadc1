//! Ordered sources and the memoized key-to-source map.
//!
//! Reads scan the sources in registration order and remember which one
//! answered. The memo is trusted on later reads and is never invalidated by
//! writes or deletes made through the model: a write that lands in a
//! different source than the cached one stays invisible to GET until the
//! entry is dropped with [`SourceSet::forget`] or [`SourceSet::clear_cache`].

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::key::Key;
use crate::source::Source;
use crate::value::Value;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// The source at this registration index.
    Source(usize),
    /// A computed property of the model itself.
    Computed,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(i) => write!(f, "source:{i}"),
            Self::Computed => write!(f, "computed"),
        }
    }
}

/// Sources in priority order plus the resolution cache.
#[derive(Debug)]
pub struct SourceSet {
    sources: Vec<Source>,
    cache: RwLock<HashMap<Key, Origin>>,
}

impl SourceSet {
    /// Wraps the given sources. Handles that point at the same document are
    /// kept once, at their first position.
    #[must_use]
    pub fn new(sources: Vec<Source>) -> Self {
        let mut unique: Vec<Source> = Vec::with_capacity(sources.len());
        for src in sources {
            if !unique.iter().any(|s| s.ptr_eq(&src)) {
                unique.push(src);
            }
        }
        Self {
            sources: unique,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The source at `index`.
    pub fn get(&self, index: usize) -> Option<&Source> {
        self.sources.get(index)
    }

    /// All sources, in priority order.
    pub fn as_slice(&self) -> &[Source] {
        &self.sources
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True if there are no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Resolves `key` to a value and its origin.
    ///
    /// `fallback` supplies the model's computed value when no source holds
    /// the key. It runs with no lock held, so it may reenter the model.
    /// `Value::Null` counts as found.
    pub fn resolve<F>(&self, key: &Key, fallback: F) -> Option<(Value, Origin)>
    where
        F: FnOnce(&Key) -> Option<Value>,
    {
        if let Some(origin) = self.cached(key) {
            let value = match origin {
                Origin::Source(i) => self.sources.get(i).and_then(|s| s.lookup(key)),
                Origin::Computed => fallback(key),
            };
            return value.map(|v| (v, origin));
        }

        let found = self
            .sources
            .iter()
            .enumerate()
            .find_map(|(i, src)| src.lookup(key).map(|v| (v, Origin::Source(i))))
            .or_else(|| fallback(key).map(|v| (v, Origin::Computed)));

        if let Some((_, origin)) = &found {
            self.cache
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.clone(), *origin);
        }
        found
    }

    /// True if any source defines `key`, whatever its value.
    pub fn contains(&self, key: &Key) -> bool {
        self.sources.iter().any(|s| s.contains(key))
    }

    /// Writes a raw value into one source. Returns false if the index is out
    /// of range or the stored property is not writable.
    pub fn write(&self, index: usize, key: Key, value: Value) -> bool {
        self.sources
            .get(index)
            .is_some_and(|s| s.write().insert(key, value))
    }

    /// Removes `key` from one source only.
    ///
    /// Returns false if the index is out of range or the property is
    /// non-configurable. An absent key counts as removed.
    pub fn remove(&self, index: usize, key: &Key) -> bool {
        self.sources
            .get(index)
            .is_some_and(|s| s.write().remove(key))
    }

    /// The cached origin of `key`.
    pub fn cached(&self, key: &Key) -> Option<Origin> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }

    /// Drops the cache entry for `key`, returning it.
    pub fn forget(&self, key: &Key) -> Option<Origin> {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    /// Drops every cache entry.
    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached keys.
    pub fn cache_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
