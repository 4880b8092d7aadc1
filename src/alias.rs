//! Logical-to-physical key renames.

use std::collections::HashMap;

use crate::key::Key;

/// Maps public field names onto the keys they are stored under.
///
/// Resolution is a single hop: an alias whose target is itself aliased is
/// not followed further.
///
/// # Examples
///
/// ```
/// use proxy_model::{AliasTable, Key};
///
/// let mut aliases = AliasTable::new();
/// aliases.insert("id", "_id");
///
/// assert_eq!(aliases.resolve(&Key::from("id")), &Key::from("_id"));
/// assert_eq!(aliases.resolve(&Key::from("name")), &Key::from("name"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    map: HashMap<Key, Key>,
}

impl AliasTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an alias, returning the previous target.
    pub fn insert(&mut self, alias: impl Into<Key>, target: impl Into<Key>) -> Option<Key> {
        self.map.insert(alias.into(), target.into())
    }

    /// Returns the physical key for `key`, or `key` itself.
    pub fn resolve<'a>(&'a self, key: &'a Key) -> &'a Key {
        self.map.get(key).unwrap_or(key)
    }

    /// True if `key` is an alias.
    pub fn is_alias(&self, key: &Key) -> bool {
        self.map.contains_key(key)
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if no aliases are declared.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<A: Into<Key>, T: Into<Key>> FromIterator<(A, T)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (A, T)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(a, t)| (a.into(), t.into()))
                .collect(),
        }
    }
}

impl<A: Into<Key>, T: Into<Key>> Extend<(A, T)> for AliasTable {
    fn extend<I: IntoIterator<Item = (A, T)>>(&mut self, iter: I) {
        self.map
            .extend(iter.into_iter().map(|(a, t)| (a.into(), t.into())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unaliased_key_passes_through() {
        let table = AliasTable::new();
        let key = Key::from("name");
        assert_eq!(table.resolve(&key), &key);
        assert!(table.is_empty());
    }

    #[test]
    fn test_single_hop_only() {
        let table: AliasTable = [("a", "b"), ("b", "c")].into_iter().collect();
        assert_eq!(table.resolve(&Key::from("a")), &Key::from("b"));
        assert_eq!(table.resolve(&Key::from("b")), &Key::from("c"));
    }

    #[test]
    fn test_physical_key_resolves_to_itself() {
        let table: AliasTable = [("id", "_id")].into_iter().collect();
        assert!(table.is_alias(&Key::from("id")));
        assert!(!table.is_alias(&Key::from("_id")));
        assert_eq!(table.resolve(&Key::from("_id")), &Key::from("_id"));
    }

    #[test]
    fn test_insert_replaces() {
        let mut table = AliasTable::new();
        assert_eq!(table.insert("id", "_id"), None);
        assert_eq!(table.insert("id", "uid"), Some(Key::from("_id")));
        assert_eq!(table.len(), 1);
    }
}
