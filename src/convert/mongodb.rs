//! Converters for MongoDB extended JSON.
//!
//! Documents exported from MongoDB wrap dates and object ids in `$date` and
//! `$oid` envelopes. These converters expose them as plain values and wrap
//! them again on write. Shapes they do not recognise pass through untouched.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use super::Converter;
use crate::value::Value;

/// `{"$date": ...}` <-> `Value::Date`.
///
/// Accepts canonical (`{"$numberLong": "<ms>"}`), relaxed (`<ms>`) and
/// RFC 3339 string payloads. Writes the canonical form.
///
/// # Examples
///
/// ```
/// use proxy_model::convert::mongodb;
/// use proxy_model::{Model, Source, Value};
/// use serde_json::json;
///
/// let model = Model::builder()
///     .source(Source::from_json(json!({"born": {"$date": {"$numberLong": "0"}}})).unwrap())
///     .converter("born", mongodb::date())
///     .build()
///     .unwrap();
///
/// let born = model.get("born").and_then(|v| v.as_date()).unwrap();
/// assert_eq!(born.timestamp_millis(), 0);
/// ```
#[must_use]
pub fn date() -> Converter {
    Converter::new()
        .with_get(|raw, _| raw?.as_structured().and_then(parse_date).map(Value::Date))
        .with_set(|value| match value {
            Value::Date(at) => Value::Structured(date_to_json(at)),
            other => other,
        })
}

/// `{"$oid": "<hex>"}` <-> `Value::String`.
#[must_use]
pub fn object_id() -> Converter {
    Converter::new()
        .with_get(|raw, _| {
            raw?.as_structured()
                .and_then(|doc| doc.get("$oid"))
                .and_then(serde_json::Value::as_str)
                .map(Value::from)
        })
        .with_set(|value| match value {
            Value::String(oid) => Value::Structured(json!({ "$oid": oid })),
            other => other,
        })
}

/// Reads the instant out of a `$date` envelope.
#[must_use]
pub fn parse_date(doc: &serde_json::Value) -> Option<DateTime<Utc>> {
    let inner = doc.get("$date")?;

    if let Some(millis) = inner
        .get("$numberLong")
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse::<i64>().ok())
    {
        return Utc.timestamp_millis_opt(millis).single();
    }

    if let Some(millis) = inner.as_i64() {
        return Utc.timestamp_millis_opt(millis).single();
    }

    inner
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Canonical `$date` envelope for an instant.
#[must_use]
pub fn date_to_json(at: DateTime<Utc>) -> serde_json::Value {
    json!({ "$date": { "$numberLong": at.timestamp_millis().to_string() } })
}
