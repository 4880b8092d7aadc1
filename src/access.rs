//! The property resolution engine.
//!
//! Every façade operation lands here as one self-contained transaction:
//! resolve the alias once, consult sources (and the resolution cache on the
//! read path), apply conversions and the read-only policy, and announce the
//! operation on the event channel. Nothing but the resolution cache
//! carries over between calls.
//!
//! No operation fails for a missing key. The only policy outcome is a write
//! to a read-only key, which is reported through [`WriteOutcome`] and the
//! `set` event, never raised.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexSet;

use crate::alias::AliasTable;
use crate::computed::ComputedProperty;
use crate::convert::ConversionRegistry;
use crate::error::ReadonlyViolation;
use crate::events::{
    AccessEvent, DeleteContext, DescribeContext, EventChannel, HasContext, KeysContext,
    ReadContext, WriteContext,
};
use crate::key::Key;
use crate::model::Model;
use crate::options::ModelOptions;
use crate::resolve::SourceSet;
use crate::source::PropertyDescriptor;
use crate::value::Value;

/// Result of a SET.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    /// What the caller is told: true for a landed or intercepted write, the
    /// configured read-only result for a read-only key, false if the target
    /// refused the write.
    pub ok: bool,
    /// The write landed, or a `validate` listener took it over.
    pub done: bool,
    /// Present when the read-only policy rejected the write.
    pub violation: Option<ReadonlyViolation>,
}

/// Fixed configuration of one model plus its event channel and cache.
pub(crate) struct AccessEngine {
    pub(crate) sources: SourceSet,
    pub(crate) aliases: AliasTable,
    pub(crate) converters: ConversionRegistry,
    pub(crate) readonly: HashSet<Key>,
    pub(crate) extra_keys: Vec<Key>,
    pub(crate) computed: HashMap<Key, ComputedProperty>,
    pub(crate) options: ModelOptions,
    pub(crate) events: EventChannel,
    pub(crate) parent: Option<Arc<dyn Any + Send + Sync>>,
}

impl AccessEngine {
    fn target(&self) -> usize {
        self.options.write_source
    }

    fn computed_value(&self, facade: &Model, key: &Key) -> Option<Value> {
        self.computed.get(key).map(|c| c.compute(facade))
    }

    pub(crate) fn get(&self, facade: &Model, requested: Key) -> Option<Value> {
        let key = self.aliases.resolve(&requested).clone();
        let (raw, origin) = self
            .sources
            .resolve(&key, |k| self.computed_value(facade, k))
            .unzip();

        let mut ctx = ReadContext {
            requested,
            key,
            value: raw.clone(),
            raw,
            origin,
        };

        if let Some(converted) = self.converters.apply_get(&ctx) {
            ctx.value = Some(converted);
        }

        self.events.emit(&mut AccessEvent::Get(&mut ctx));
        ctx.value
    }

    pub(crate) fn set(&self, requested: Key, value: Value) -> WriteOutcome {
        let key = self.aliases.resolve(&requested).clone();
        let raw = self.converters.apply_set(&key, value);

        let mut ctx = WriteContext {
            requested,
            key,
            value: raw,
            target: self.target(),
            done: false,
            violation: None,
        };

        self.events.emit(&mut AccessEvent::Validate(&mut ctx));

        let mut ok = true;
        if !ctx.done {
            if self.readonly.contains(&ctx.key) {
                ctx.violation = Some(ReadonlyViolation {
                    requested: ctx.requested.clone(),
                    key: ctx.key.clone(),
                    attempted: ctx.value.clone(),
                    target: ctx.target,
                });
                ok = self.options.readonly_write_succeeds();
            } else if self
                .sources
                .write(ctx.target, ctx.key.clone(), ctx.value.clone())
            {
                ctx.done = true;
            } else {
                ok = false;
            }
        }

        self.events.emit(&mut AccessEvent::Set(&mut ctx));

        WriteOutcome {
            ok,
            done: ctx.done,
            violation: ctx.violation,
        }
    }

    pub(crate) fn has(&self, requested: Key) -> bool {
        let key = self.aliases.resolve(&requested).clone();
        let exists = self.sources.contains(&key) || self.computed.contains_key(&key);

        let mut ctx = HasContext {
            requested,
            key,
            exists,
        };
        self.events.emit(&mut AccessEvent::Has(&mut ctx));
        ctx.exists
    }

    pub(crate) fn own_keys(&self) -> Vec<Key> {
        let mut keys = match self.sources.get(self.target()) {
            Some(src) => {
                let doc = src.read();
                let mut keys = if self.options.enumerate_non_enumerable {
                    doc.names()
                } else {
                    doc.keys()
                };
                if self.options.enumerate_symbols {
                    keys.extend(doc.symbols());
                }
                keys
            }
            None => Vec::new(),
        };
        keys.extend(self.extra_keys.iter().cloned());

        let mut ctx = KeysContext { keys };
        self.events.emit(&mut AccessEvent::OwnKeys(&mut ctx));

        // First occurrence wins.
        ctx.keys
            .into_iter()
            .collect::<IndexSet<Key>>()
            .into_iter()
            .collect()
    }

    pub(crate) fn describe(&self, requested: Key) -> Option<PropertyDescriptor> {
        let key = self.aliases.resolve(&requested).clone();
        let descriptor = self
            .sources
            .get(self.target())
            .and_then(|src| src.read().descriptor(&key))
            .or_else(|| {
                self.computed.get(&key).map(|c| PropertyDescriptor::Computed {
                    enumerable: c.is_enumerable(),
                })
            });

        let mut ctx = DescribeContext {
            requested,
            key,
            descriptor,
        };
        self.events.emit(&mut AccessEvent::Describe(&mut ctx));
        ctx.descriptor
    }

    pub(crate) fn delete(&self, requested: Key) -> bool {
        let key = self.aliases.resolve(&requested).clone();

        let mut ctx = DeleteContext {
            requested,
            key,
            target: self.target(),
            outcome: None,
        };
        self.events.emit(&mut AccessEvent::Delete(&mut ctx));

        if let Some(outcome) = ctx.outcome {
            return outcome;
        }

        let removed = self.sources.remove(ctx.target, &ctx.key);
        removed || !self.options.confirm_delete
    }
}

#[cfg(test)]
mod tests {
    use crate::events::EventKind;
    use crate::key::Key;
    use crate::model::Model;
    use crate::options::ModelOptions;
    use crate::source::{Document, PropertyFlags, Source};
    use crate::value::Value;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn model(options: ModelOptions) -> Model {
        Model::builder()
            .source(Source::from_json(json!({"_id": 1, "level": 99})).unwrap())
            .alias("id", "_id")
            .readonly("level")
            .options(options)
            .build()
            .unwrap()
    }

    #[test]
    fn test_contexts_carry_requested_and_physical_key() {
        let model = model(ModelOptions::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        for kind in [EventKind::Get, EventKind::Validate, EventKind::Has, EventKind::Delete] {
            let seen = Arc::clone(&seen);
            model.on(kind, move |event| {
                let key = event.key().map(ToString::to_string);
                seen.lock().unwrap().push((event.kind(), key));
            });
        }

        model.get("id");
        model.set("id", 2);
        model.has("id");
        model.delete("id");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|(_, key)| key.as_deref() == Some("_id")));
    }

    #[test]
    fn test_write_outcome_for_each_path() {
        let mut doc = Document::new();
        doc.define("frozen", 0, PropertyFlags::FROZEN);
        let model = Model::builder()
            .source(doc)
            .readonly("level")
            .options(ModelOptions {
                readonly_return: Some(false),
                ..ModelOptions::default()
            })
            .build()
            .unwrap();

        let landed = model.assign("x", 1);
        assert!(landed.ok && landed.done && landed.violation.is_none());

        let refused = model.assign("frozen", 1);
        assert!(!refused.ok && !refused.done && refused.violation.is_none());

        let rejected = model.assign("level", 1);
        assert!(!rejected.ok && !rejected.done);
        assert_eq!(rejected.violation.map(|v| v.key), Some(Key::from("level")));
    }

    #[test]
    fn test_validate_sees_converted_value() {
        let model = Model::builder()
            .source(Source::default())
            .converter(
                "n",
                crate::convert::Converter::new().with_set(|v| {
                    v.as_int().map_or(v, |n| Value::Int(n * 10))
                }),
            )
            .build()
            .unwrap();
        let seen = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&seen);
        model.events().on_validate(move |ctx| {
            *slot.lock().unwrap() = Some(ctx.value.clone());
        });

        model.set("n", 3);
        assert_eq!(*seen.lock().unwrap(), Some(Value::Int(30)));
        assert_eq!(model.get("n"), Some(Value::Int(30)));
    }

    #[test]
    fn test_delete_outcome_follows_removal() {
        let mut doc = Document::new();
        doc.define("frozen", 0, PropertyFlags::FROZEN);
        doc.insert("loose", 1);
        let source = Source::new(doc);
        let model = Model::builder().source(source.clone()).build().unwrap();

        assert!(model.delete("loose"));
        assert!(!source.contains(&Key::from("loose")));
        assert!(model.delete("never"));
        assert!(!model.delete("frozen"));
        assert!(source.contains(&Key::from("frozen")));
    }

    #[test]
    fn test_alias_target_is_not_enumerated_twice() {
        let model = model(ModelOptions::default());
        assert_eq!(model.keys(), vec![Key::from("_id"), Key::from("level")]);
    }
}
