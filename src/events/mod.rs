//! Access lifecycle events.
//!
//! Every model operation announces itself through an [`EventChannel`] with a
//! mutable context. Observers can rewrite values, take over writes and
//! deletes, or simply watch.

/// Listener registry and dispatch.
pub mod channel;
/// Per-operation contexts and event kinds.
pub mod context;

pub use channel::{EventChannel, Listener, ListenerId};
pub use context::{
    AccessEvent, DeleteContext, DescribeContext, EventKind, HasContext, KeysContext, ReadContext,
    WriteContext,
};
