//! Synchronous listener registry.
//!
//! Listeners run on the caller's thread, in registration order, before the
//! operation that emitted the event returns.

use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use super::context::{
    AccessEvent, DeleteContext, DescribeContext, EventKind, HasContext, KeysContext, ReadContext,
    WriteContext,
};

/// A registered event listener.
pub type Listener = Arc<dyn Fn(&mut AccessEvent<'_>) + Send + Sync>;

/// Handle returned by registration, used to remove a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Registration {
    id: ListenerId,
    kind: EventKind,
    listener: Listener,
}

/// Publish/subscribe channel for access lifecycle events.
///
/// The listener list is snapshotted before dispatch, so a listener may
/// register or remove listeners, or reenter the model, without deadlocking.
/// Changes take effect from the next emit.
#[derive(Default)]
pub struct EventChannel {
    listeners: RwLock<Vec<Registration>>,
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("EventChannel")
            .field("listeners", &listeners.len())
            .finish()
    }
}

impl EventChannel {
    /// Creates a channel with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for one event kind.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&mut AccessEvent<'_>) + Send + Sync + 'static,
    {
        let id = ListenerId::new();
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Registration {
                id,
                kind,
                listener: Arc::new(listener),
            });
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|r| r.id != id);
        listeners.len() != before
    }

    /// Delivers an event to every listener registered for its kind.
    pub fn emit(&self, event: &mut AccessEvent<'_>) {
        let kind = event.kind();
        let snapshot: Vec<Listener> = {
            let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
            listeners
                .iter()
                .filter(|r| r.kind == kind)
                .map(|r| Arc::clone(&r.listener))
                .collect()
        };

        for listener in snapshot {
            listener(&mut *event);
        }
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }

    /// True if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Registers a `validate` listener.
    pub fn on_validate<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&mut WriteContext) + Send + Sync + 'static,
    {
        self.on(EventKind::Validate, move |event| {
            if let AccessEvent::Validate(ctx) = event {
                f(ctx);
            }
        })
    }

    /// Registers a `set` listener.
    pub fn on_set<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&mut WriteContext) + Send + Sync + 'static,
    {
        self.on(EventKind::Set, move |event| {
            if let AccessEvent::Set(ctx) = event {
                f(ctx);
            }
        })
    }

    /// Registers a `get` listener.
    pub fn on_get<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&mut ReadContext) + Send + Sync + 'static,
    {
        self.on(EventKind::Get, move |event| {
            if let AccessEvent::Get(ctx) = event {
                f(ctx);
            }
        })
    }

    /// Registers a `has` listener.
    pub fn on_has<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&mut HasContext) + Send + Sync + 'static,
    {
        self.on(EventKind::Has, move |event| {
            if let AccessEvent::Has(ctx) = event {
                f(ctx);
            }
        })
    }

    /// Registers an `ownKeys` listener.
    pub fn on_own_keys<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&mut KeysContext) + Send + Sync + 'static,
    {
        self.on(EventKind::OwnKeys, move |event| {
            if let AccessEvent::OwnKeys(ctx) = event {
                f(ctx);
            }
        })
    }

    /// Registers a `getOwnPropertyDescriptor` listener.
    pub fn on_describe<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&mut DescribeContext) + Send + Sync + 'static,
    {
        self.on(EventKind::Describe, move |event| {
            if let AccessEvent::Describe(ctx) = event {
                f(ctx);
            }
        })
    }

    /// Registers a `deleteProperty` listener.
    pub fn on_delete<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&mut DeleteContext) + Send + Sync + 'static,
    {
        self.on(EventKind::Delete, move |event| {
            if let AccessEvent::Delete(ctx) = event {
                f(ctx);
            }
        })
    }
}
