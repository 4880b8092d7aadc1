//! Values held by model sources and returned by the façade.
//!
//! Raw source values and API-facing values share one type. Converters move a
//! value between its stored shape (often `Structured` extended JSON) and its
//! API shape (for example a `Date`).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A property value.
///
/// Absence is never a `Value`: lookups return `Option<Value>` and
/// `Value::Null` is a present, explicit null.
///
/// # Examples
///
/// ```
/// use proxy_model::Value;
///
/// let level = Value::Int(99);
/// let name = Value::from("Tim");
///
/// assert!(level.is_int());
/// assert_eq!(name.as_string(), Some("Tim"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// String.
    String(String),
    /// UTC instant.
    Date(DateTime<Utc>),
    /// Arrays, objects and numbers outside `i64`, as JSON.
    Structured(serde_json::Value),
    /// Explicit null.
    Null,
}

impl Value {
    /// True for `Bool`.
    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// True for `Int`.
    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// True for `Float`.
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// True for `String`.
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// True for `Date`.
    pub const fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// True for `Structured`.
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// True for `Null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The boolean, if this is one.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The integer, if this is one.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The number as a float; integers convert.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// The string, if this is one.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// The instant, if this is a date.
    pub const fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// The JSON, if this is structured.
    pub const fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Structured(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a human-readable type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Structured(_) => "structured",
            Self::Null => "null",
        }
    }

    /// Plain JSON form of the value.
    ///
    /// Dates become RFC 3339 strings with millisecond precision; non-finite
    /// floats become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Self::Bool(v) => Json::Bool(*v),
            Self::Int(v) => Json::from(*v),
            Self::Float(v) => serde_json::Number::from_f64(*v).map_or(Json::Null, Json::Number),
            Self::String(v) => Json::String(v.clone()),
            Self::Date(v) => Json::String(v.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Structured(v) => v.clone(),
            Self::Null => Json::Null,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Date(v) => write!(f, "date:{}", v.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Structured(v) => write!(f, "{v}"),
            Self::Null => write!(f, "null"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// Scalars map onto native variants; arrays and objects stay structured.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match v {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            // Integers beyond i64 keep their exact JSON form.
            Json::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None if n.is_f64() => n.as_f64().map_or(Self::Null, Self::Float),
                None => Self::Structured(Json::Number(n)),
            },
            Json::String(s) => Self::String(s),
            other @ (Json::Array(_) | Json::Object(_)) => Self::Structured(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_value_int() {
        let val = Value::Int(42);
        assert!(val.is_int());
        assert_eq!(val.as_int(), Some(42));
        assert_eq!(val.as_float(), Some(42.0)); // Int can be read as float
        assert_eq!(val.type_name(), "int");
    }

    #[test]
    fn test_json_numbers_keep_precision() {
        assert_eq!(Value::from(json!(-3)), Value::Int(-3));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));

        let big = Value::from(json!(u64::MAX));
        assert!(big.is_structured());
        assert_eq!(big.to_json(), json!(u64::MAX));
    }

    #[test]
    fn test_value_date() {
        let at = Utc.timestamp_millis_opt(0).unwrap();
        let val = Value::Date(at);
        assert!(val.is_date());
        assert_eq!(val.as_date(), Some(at));
        assert_eq!(val.to_json(), json!("1970-01-01T00:00:00.000Z"));
    }

    #[test]
    fn test_value_null_is_present() {
        let val: Value = serde_json::Value::Null.into();
        assert!(val.is_null());
        assert_eq!(val.type_name(), "null");
    }

    #[test]
    fn test_value_from_json_scalars() {
        assert_eq!(Value::from(json!(true)), Value::Bool(true));
        assert_eq!(Value::from(json!(99)), Value::Int(99));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
        assert_eq!(Value::from(json!("Tim")), Value::String("Tim".into()));
    }

    #[test]
    fn test_value_from_json_keeps_documents_structured() {
        let doc = json!({"$oid": "1"});
        assert_eq!(Value::from(doc.clone()), Value::Structured(doc));
        let list = json!([1, 2]);
        assert_eq!(Value::from(list.clone()), Value::Structured(list));
    }

    #[test]
    fn test_value_to_json_round_trip_scalars() {
        for json in [json!(null), json!(false), json!(7), json!("x"), json!({"a": 1})] {
            assert_eq!(Value::from(json.clone()).to_json(), json);
        }
    }

    #[test]
    fn test_value_display() {
        assert_eq!(format!("{}", Value::Bool(true)), "true");
        assert_eq!(format!("{}", Value::Int(42)), "42");
        assert_eq!(format!("{}", Value::String("hi".into())), "\"hi\"");
        assert_eq!(format!("{}", Value::Null), "null");
    }

    #[test]
    fn test_value_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::String("a".into()));
    }

    #[test]
    fn test_value_serialization() {
        let val = Value::String("test".into());
        let json = serde_json::to_string(&val).unwrap();
        let deserialized: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(val, deserialized);
    }

    #[test]
    fn test_value_type_mismatch() {
        let val = Value::Bool(true);
        assert!(val.as_int().is_none());
        assert!(val.as_float().is_none());
        assert!(val.as_string().is_none());
        assert!(val.as_date().is_none());
    }
}
