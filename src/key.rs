//! Property keys.
//!
//! A model is addressed by keys that are either plain names or unique
//! symbols. Symbols never collide with names and are only enumerated when
//! the model is configured to include them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique key that can never collide with a named key.
///
/// Two symbols are equal only if they were cloned from the same
/// [`Symbol::new`] call; the description is informational.
///
/// # Examples
///
/// ```
/// use proxy_model::Symbol;
///
/// let a = Symbol::new("meta");
/// let b = Symbol::new("meta");
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Symbol {
    /// Creates a new symbol with a description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: Some(description.into()),
        }
    }

    /// Creates a new symbol without a description.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            id: Uuid::new_v4(),
            description: None,
        }
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn id(&self) -> &Uuid {
        &self.id
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(d) => write!(f, "Symbol({d})"),
            None => write!(f, "Symbol()"),
        }
    }
}

/// A property key: a name or a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "key", rename_all = "snake_case")]
pub enum Key {
    /// A named key.
    Name(String),
    /// A symbol key.
    Symbol(Symbol),
}

impl Key {
    /// True for a named key.
    pub const fn is_name(&self) -> bool {
        matches!(self, Self::Name(_))
    }

    /// True for a symbol key.
    pub const fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    /// The name, if this is a named key.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(n) => Some(n),
            Self::Symbol(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(n) => write!(f, "{n}"),
            Self::Symbol(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Self::Name(v.to_string())
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Self::Name(v)
    }
}

impl From<&String> for Key {
    fn from(v: &String) -> Self {
        Self::Name(v.clone())
    }
}

impl From<Symbol> for Key {
    fn from(v: Symbol) -> Self {
        Self::Symbol(v)
    }
}

impl From<&Symbol> for Key {
    fn from(v: &Symbol) -> Self {
        Self::Symbol(v.clone())
    }
}

impl From<&Key> for Key {
    fn from(v: &Key) -> Self {
        v.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_key() {
        let key = Key::from("name");
        assert!(key.is_name());
        assert_eq!(key.as_name(), Some("name"));
        assert_eq!(key.to_string(), "name");
    }

    #[test]
    fn test_symbol_identity() {
        let sym = Symbol::new("hidden");
        let key = Key::from(&sym);
        assert!(key.is_symbol());
        assert_eq!(key, Key::Symbol(sym.clone()));
        assert_ne!(key, Key::Symbol(Symbol::new("hidden")));
        assert_eq!(key.as_name(), None);
    }

    #[test]
    fn test_symbol_never_equals_name() {
        let sym = Symbol::new("name");
        assert_ne!(Key::from(sym), Key::from("name"));
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(Symbol::new("x").to_string(), "Symbol(x)");
        assert_eq!(Symbol::anonymous().to_string(), "Symbol()");
    }
}
