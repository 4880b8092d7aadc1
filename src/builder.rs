//! Model construction.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::access::AccessEngine;
use crate::alias::AliasTable;
use crate::computed::ComputedProperty;
use crate::convert::{ConversionRegistry, Converter};
use crate::error::{ModelError, ModelResult};
use crate::events::{EventChannel, ReadContext};
use crate::key::Key;
use crate::model::Model;
use crate::observe::TraceObserver;
use crate::options::ModelOptions;
use crate::resolve::SourceSet;
use crate::schema::ModelSchema;
use crate::source::Source;
use crate::value::Value;

type SetupHook = Box<dyn FnOnce(&Model) + Send>;

/// Builder for [`Model`].
///
/// # Example
/// ```rust,ignore
/// let user = Model::builder()
///     .source(Source::from_json(doc)?)
///     .alias("id", "_id")
///     .converter("_id", mongodb::object_id())
///     .converter("birthday", mongodb::date())
///     .readonly("age")
///     .computed("age", ComputedProperty::new(age_in_years))
///     .build()?;
/// ```
#[derive(Default)]
pub struct ModelBuilder {
    sources: Vec<Source>,
    data: Option<Source>,
    aliases: AliasTable,
    converters: ConversionRegistry,
    readonly: Vec<Key>,
    extra_keys: Vec<Key>,
    computed: HashMap<Key, ComputedProperty>,
    options: ModelOptions,
    parent: Option<Arc<dyn Any + Send + Sync>>,
    setup: Vec<SetupHook>,
}

impl ModelBuilder {
    /// Creates a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source. Sources are consulted in the order they are added.
    #[must_use]
    pub fn source(mut self, source: impl Into<Source>) -> Self {
        self.sources.push(source.into());
        self
    }

    /// Appends several sources, in order.
    #[must_use]
    pub fn sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Source>,
    {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    /// Sets a single data source, used only if no `source`/`sources` were
    /// given.
    #[must_use]
    pub fn data(mut self, data: impl Into<Source>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Maps a public key onto the key it is stored under.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<Key>, target: impl Into<Key>) -> Self {
        self.aliases.insert(alias, target);
        self
    }

    /// Adds several aliases.
    #[must_use]
    pub fn aliases<I, A, T>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (A, T)>,
        A: Into<Key>,
        T: Into<Key>,
    {
        self.aliases.extend(aliases);
        self
    }

    /// Marks a key read-only. Aliases are resolved when the model is built.
    #[must_use]
    pub fn readonly(mut self, key: impl Into<Key>) -> Self {
        self.readonly.push(key.into());
        self
    }

    /// Marks several keys read-only.
    #[must_use]
    pub fn readonly_keys<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        self.readonly.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Adds a key to enumerate after the primary source's own keys.
    #[must_use]
    pub fn extra_key(mut self, key: impl Into<Key>) -> Self {
        self.extra_keys.push(key.into());
        self
    }

    /// Adds several extra keys.
    #[must_use]
    pub fn extra_keys<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        self.extra_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Registers a converter for a physical key.
    #[must_use]
    pub fn converter(mut self, key: impl Into<Key>, converter: Converter) -> Self {
        self.converters.insert(key, converter);
        self
    }

    /// Registers the catch-all read transform for keys without a converter.
    #[must_use]
    pub fn default_converter<F>(mut self, f: F) -> Self
    where
        F: Fn(&ReadContext) -> Option<Value> + Send + Sync + 'static,
    {
        self.converters.set_default(f);
        self
    }

    /// Declares a computed property answered when no source holds `key`.
    #[must_use]
    pub fn computed(mut self, key: impl Into<Key>, property: ComputedProperty) -> Self {
        self.computed.insert(key.into(), property);
        self
    }

    /// Replaces the model options.
    #[must_use]
    pub fn options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self
    }

    /// Attaches a parent handle, retrievable with [`Model::parent`].
    #[must_use]
    pub fn parent<P: Any + Send + Sync>(mut self, parent: Arc<P>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Runs `f` once on the finished model, before `build` returns.
    #[must_use]
    pub fn setup<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&Model) + Send + 'static,
    {
        self.setup.push(Box::new(f));
        self
    }

    /// Applies every declaration of a schema, and queues its setup hook.
    ///
    /// Schema options replace the builder's options when the schema
    /// declares any; later builder calls still override.
    #[must_use]
    pub fn schema<S>(mut self, schema: S) -> Self
    where
        S: ModelSchema + Send + 'static,
    {
        if let Some(options) = schema.options() {
            self.options = options;
        }
        self.aliases.extend(schema.aliases());
        self.readonly.extend(schema.readonly_keys());
        self.extra_keys.extend(schema.extra_keys());
        self.converters.merge(schema.converters());
        self.computed.extend(schema.computed());
        self.setup.push(Box::new(move |model| schema.setup(model)));
        self
    }

    /// Builds the model.
    ///
    /// Returns `ModelError::NoSources` if no source was given and
    /// `ModelError::InvalidWriteTarget` if `options.write_source` does not
    /// name one of them.
    pub fn build(self) -> ModelResult<Model> {
        let sources = if self.sources.is_empty() {
            self.data.into_iter().collect()
        } else {
            self.sources
        };
        if sources.is_empty() {
            return Err(ModelError::NoSources);
        }

        let sources = SourceSet::new(sources);
        if self.options.write_source >= sources.len() {
            return Err(ModelError::InvalidWriteTarget {
                index: self.options.write_source,
                count: sources.len(),
            });
        }

        let readonly: HashSet<Key> = self
            .readonly
            .iter()
            .map(|k| self.aliases.resolve(k).clone())
            .collect();

        debug!(
            sources = sources.len(),
            aliases = self.aliases.len(),
            converters = self.converters.len(),
            readonly = readonly.len(),
            computed = self.computed.len(),
            "model constructed"
        );

        let model = Model::from_engine(AccessEngine {
            sources,
            aliases: self.aliases,
            converters: self.converters,
            readonly,
            extra_keys: self.extra_keys,
            computed: self.computed,
            options: self.options,
            events: EventChannel::new(),
            parent: self.parent,
        });

        if model.options().trace_events {
            TraceObserver::attach(model.events());
        }

        for hook in self.setup {
            hook(&model);
        }

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_sources_is_fatal() {
        let err = ModelBuilder::new().alias("id", "_id").build().unwrap_err();
        assert!(matches!(err, ModelError::NoSources));
    }

    #[test]
    fn test_data_used_when_no_sources() {
        let data = Source::from_json(json!({"a": 1})).unwrap();
        let model = ModelBuilder::new().data(data.clone()).build().unwrap();
        assert!(model.primary().ptr_eq(&data));
    }

    #[test]
    fn test_sources_take_precedence_over_data() {
        let data = Source::from_json(json!({"a": 1})).unwrap();
        let src = Source::from_json(json!({"a": 2})).unwrap();
        let model = ModelBuilder::new()
            .data(data)
            .source(src.clone())
            .build()
            .unwrap();
        assert_eq!(model.sources().len(), 1);
        assert!(model.primary().ptr_eq(&src));
    }

    #[test]
    fn test_write_source_out_of_range() {
        let err = ModelBuilder::new()
            .source(Source::default())
            .options(ModelOptions {
                write_source: 1,
                ..ModelOptions::default()
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidWriteTarget { index: 1, count: 1 }));
    }

    #[test]
    fn test_readonly_alias_is_normalised() {
        let model = ModelBuilder::new()
            .source(Source::default())
            .alias("id", "_id")
            .readonly("id")
            .build()
            .unwrap();
        assert!(model.is_readonly("_id"));
    }

    #[test]
    fn test_setup_hooks_run_in_order() {
        use std::sync::Mutex;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let (a, b) = (Arc::clone(&seen), Arc::clone(&seen));
        ModelBuilder::new()
            .source(Source::default())
            .setup(move |_| a.lock().unwrap().push("first"))
            .setup(move |_| b.lock().unwrap().push("second"))
            .build()
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_trace_events_attaches_observer() {
        let model = ModelBuilder::new()
            .source(Source::default())
            .options(ModelOptions {
                trace_events: true,
                ..ModelOptions::default()
            })
            .build()
            .unwrap();
        assert!(!model.events().is_empty());
    }
}
