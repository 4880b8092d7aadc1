//! Tracing-backed event observer.
//!
//! The engine never logs. Diagnostics leave a model only through its event
//! channel; this observer turns them into `tracing` records. Every event is
//! reported at `trace` level, rejected read-only writes at `warn`.

use tracing::{trace, warn};

use crate::events::{AccessEvent, EventChannel, EventKind, ListenerId};

/// Listener set that reports access events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceObserver;

impl TraceObserver {
    /// Subscribes to every event kind. The returned ids detach it again.
    pub fn attach(channel: &EventChannel) -> Vec<ListenerId> {
        EventKind::ALL
            .into_iter()
            .map(|kind| channel.on(kind, report))
            .collect()
    }

    /// Removes listeners returned by [`TraceObserver::attach`].
    pub fn detach(channel: &EventChannel, ids: &[ListenerId]) {
        for id in ids {
            channel.off(*id);
        }
    }
}

fn report(event: &mut AccessEvent<'_>) {
    match event {
        AccessEvent::Get(ctx) => trace!(
            event = "get",
            key = %ctx.key,
            requested = %ctx.requested,
            origin = ?ctx.origin,
            found = ctx.value.is_some()
        ),
        AccessEvent::Validate(ctx) => trace!(
            event = "validate",
            key = %ctx.key,
            target = ctx.target,
            value = %ctx.value
        ),
        AccessEvent::Set(ctx) => match &ctx.violation {
            Some(violation) => warn!(
                event = "set",
                key = %violation.key,
                requested = %violation.requested,
                attempted = %violation.attempted,
                target = violation.target,
                "write rejected: {violation}"
            ),
            None => trace!(
                event = "set",
                key = %ctx.key,
                target = ctx.target,
                done = ctx.done
            ),
        },
        AccessEvent::Has(ctx) => trace!(event = "has", key = %ctx.key, exists = ctx.exists),
        AccessEvent::OwnKeys(ctx) => trace!(event = "ownKeys", count = ctx.keys.len()),
        AccessEvent::Describe(ctx) => trace!(
            event = "getOwnPropertyDescriptor",
            key = %ctx.key,
            found = ctx.descriptor.is_some()
        ),
        AccessEvent::Delete(ctx) => trace!(
            event = "deleteProperty",
            key = %ctx.key,
            target = ctx.target,
            outcome = ?ctx.outcome
        ),
    }
}
