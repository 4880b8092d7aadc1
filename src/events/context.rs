//! Per-operation access contexts.
//!
//! Each operation builds one context, hands it to listeners by mutable
//! reference, then reads it back. Listeners steer the outcome by editing it.

use crate::error::ReadonlyViolation;
use crate::key::Key;
use crate::resolve::Origin;
use crate::source::PropertyDescriptor;
use crate::value::Value;

/// Lifecycle moments a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Before a write; listeners may take the write over.
    Validate,
    /// After a write attempt, whatever its outcome.
    Set,
    /// After a read resolved; listeners may rewrite the value.
    Get,
    /// After a presence check; listeners may override it.
    Has,
    /// After keys were collected; listeners may edit the list.
    OwnKeys,
    /// After a descriptor lookup.
    Describe,
    /// Before a delete; listeners may supply the outcome.
    Delete,
}

impl EventKind {
    /// Every kind, in operation order.
    pub const ALL: [Self; 7] = [
        Self::Validate,
        Self::Set,
        Self::Get,
        Self::Has,
        Self::OwnKeys,
        Self::Describe,
        Self::Delete,
    ];

    /// The event name observers know it by.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Set => "set",
            Self::Get => "get",
            Self::Has => "has",
            Self::OwnKeys => "ownKeys",
            Self::Describe => "getOwnPropertyDescriptor",
            Self::Delete => "deleteProperty",
        }
    }

    /// Looks an event kind up by its name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Context of a GET.
///
/// `value` starts equal to `raw` and holds the converted value once the
/// conversion registry has run. Whatever `value` holds after the `get`
/// listeners is returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadContext {
    /// Key as the caller supplied it.
    pub requested: Key,
    /// Key after alias resolution.
    pub key: Key,
    /// Value as stored, before conversion.
    pub raw: Option<Value>,
    /// Value returned to the caller.
    pub value: Option<Value>,
    /// Where the raw value came from, if anywhere.
    pub origin: Option<Origin>,
}

/// Context of a SET, shared by the `validate` and `set` events.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteContext {
    /// Key as the caller supplied it.
    pub requested: Key,
    /// Key after alias resolution.
    pub key: Key,
    /// Raw value to store, after the set converter.
    pub value: Value,
    /// Index of the source the write goes to.
    pub target: usize,
    /// Set by a `validate` listener to skip the default write, and by the
    /// engine once the write has landed.
    pub done: bool,
    /// Set when the read-only policy rejected the write.
    pub violation: Option<ReadonlyViolation>,
}

/// Context of a HAS.
#[derive(Debug, Clone, PartialEq)]
pub struct HasContext {
    /// Key as the caller supplied it.
    pub requested: Key,
    /// Key after alias resolution.
    pub key: Key,
    /// Whether the key is defined.
    pub exists: bool,
}

/// Context of an OWN-KEYS. Duplicates are removed after the listeners run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeysContext {
    /// Keys in enumeration order.
    pub keys: Vec<Key>,
}

/// Context of a GET-DESCRIPTOR.
#[derive(Debug, Clone, PartialEq)]
pub struct DescribeContext {
    /// Key as the caller supplied it.
    pub requested: Key,
    /// Key after alias resolution.
    pub key: Key,
    /// Descriptor returned to the caller.
    pub descriptor: Option<PropertyDescriptor>,
}

/// Context of a DELETE.
///
/// A `deleteProperty` listener that sets `outcome` short-circuits the
/// default removal.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteContext {
    /// Key as the caller supplied it.
    pub requested: Key,
    /// Key after alias resolution.
    pub key: Key,
    /// Index of the source the delete goes to.
    pub target: usize,
    /// Outcome supplied by a listener.
    pub outcome: Option<bool>,
}

/// An event in flight, borrowing the operation's context.
#[derive(Debug)]
pub enum AccessEvent<'a> {
    /// Pre-write.
    Validate(&'a mut WriteContext),
    /// Post-write.
    Set(&'a mut WriteContext),
    /// Read.
    Get(&'a mut ReadContext),
    /// Presence check.
    Has(&'a mut HasContext),
    /// Key enumeration.
    OwnKeys(&'a mut KeysContext),
    /// Descriptor lookup.
    Describe(&'a mut DescribeContext),
    /// Pre-delete.
    Delete(&'a mut DeleteContext),
}

impl AccessEvent<'_> {
    /// The kind this event is delivered under.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Validate(_) => EventKind::Validate,
            Self::Set(_) => EventKind::Set,
            Self::Get(_) => EventKind::Get,
            Self::Has(_) => EventKind::Has,
            Self::OwnKeys(_) => EventKind::OwnKeys,
            Self::Describe(_) => EventKind::Describe,
            Self::Delete(_) => EventKind::Delete,
        }
    }

    /// The resolved key the event concerns; `None` for OWN-KEYS.
    #[must_use]
    pub fn key(&self) -> Option<&Key> {
        match self {
            Self::Validate(c) | Self::Set(c) => Some(&c.key),
            Self::Get(c) => Some(&c.key),
            Self::Has(c) => Some(&c.key),
            Self::Describe(c) => Some(&c.key),
            Self::Delete(c) => Some(&c.key),
            Self::OwnKeys(_) => None,
        }
    }
}
