use indexmap::IndexSet;
use proptest::prelude::*;

use proxy_model::{Document, Key, Model, ModelOptions, Value};

fn name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn model_over(fields: &[(String, i64)], extras: &[String]) -> Model {
    let doc: Document = fields.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    Model::builder()
        .source(doc)
        .extra_keys(extras.iter().map(String::as_str))
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn alias_reads_match_target(target in name(), value in any::<i64>()) {
        let alias = format!("{target}_alias");
        let doc: Document = [(target.as_str(), value)].into_iter().collect();
        let model = Model::builder()
            .source(doc)
            .alias(alias.as_str(), target.as_str())
            .build()
            .unwrap();

        prop_assert_eq!(model.get(alias.as_str()), Some(Value::Int(value)));
        prop_assert_eq!(model.get(alias.as_str()), model.get(target.as_str()));
        prop_assert_eq!(model.has(alias.as_str()), model.has(target.as_str()));
    }

    #[test]
    fn absent_keys_read_as_absent(
        fields in proptest::collection::vec((name(), any::<i64>()), 0..8),
        probe in "[A-Z]{1,8}",
    ) {
        let model = model_over(&fields, &[]);
        prop_assert!(!model.has(probe.as_str()));
        prop_assert_eq!(model.get(probe.as_str()), None);
        prop_assert!(!model.keys().contains(&Key::from(probe.as_str())));
    }

    #[test]
    fn own_keys_are_unique_and_ordered(
        fields in proptest::collection::vec((name(), any::<i64>()), 0..8),
        extras in proptest::collection::vec(name(), 0..8),
    ) {
        let model = model_over(&fields, &extras);

        let expected: IndexSet<Key> = fields
            .iter()
            .map(|(k, _)| Key::from(k.as_str()))
            .chain(extras.iter().map(|k| Key::from(k.as_str())))
            .collect();

        prop_assert_eq!(model.keys(), expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn readonly_writes_never_land(
        value in any::<i64>(),
        attempt in any::<i64>(),
        fail in any::<bool>(),
    ) {
        let doc: Document = [("locked", value)].into_iter().collect();
        let model = Model::builder()
            .source(doc)
            .readonly("locked")
            .options(ModelOptions { readonly_fail: fail, ..ModelOptions::default() })
            .build()
            .unwrap();

        prop_assert_eq!(model.set("locked", attempt), !fail);
        prop_assert_eq!(model.get("locked"), Some(Value::Int(value)));
    }

    #[test]
    fn writes_read_back(key in name(), first in any::<i64>(), second in any::<i64>()) {
        let model = model_over(&[], &[]);
        prop_assert!(model.set(key.as_str(), first));
        prop_assert!(model.set(key.as_str(), second));
        prop_assert_eq!(model.get(key.as_str()), Some(Value::Int(second)));
    }
}
