//! Tabular result records
//!
//! A record maps variable names to binding values. Query results arrive in
//! several shapes: bare scalars, `{ "value": ..., "type": ... }` wrappers, or
//! nulls. [`BindingValue`] closes over those shapes so lookups never need to
//! inspect JSON at run time.

use super::{RecordError, RecordResult};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// One binding in a result record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BindingValue {
    /// Absent or null
    #[default]
    Empty,
    /// Bare scalar, cast to its string form
    Scalar(String),
    /// `{ "value": ... }` wrapper
    Wrapped(String),
}

impl BindingValue {
    /// The normalized string value; empty for [`BindingValue::Empty`]
    pub fn as_str(&self) -> &str {
        match self {
            BindingValue::Empty => "",
            BindingValue::Scalar(s) | BindingValue::Wrapped(s) => s,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Convert a JSON value. Objects without a `value` field wrap the empty
    /// string; arrays keep their JSON text.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => BindingValue::Empty,
            JsonValue::String(s) => BindingValue::Scalar(s.clone()),
            JsonValue::Bool(b) => BindingValue::Scalar(b.to_string()),
            JsonValue::Number(n) => BindingValue::Scalar(n.to_string()),
            JsonValue::Object(map) => match map.get("value") {
                Some(JsonValue::String(s)) => BindingValue::Wrapped(s.clone()),
                Some(JsonValue::Null) | None => BindingValue::Wrapped(String::new()),
                Some(other) => BindingValue::Wrapped(other.to_string()),
            },
            JsonValue::Array(_) => BindingValue::Scalar(value.to_string()),
        }
    }
}

impl From<&str> for BindingValue {
    fn from(s: &str) -> Self {
        BindingValue::Scalar(s.to_string())
    }
}

/// A result record: variable name → binding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, BindingValue>,
}

static EMPTY: BindingValue = BindingValue::Empty;

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON object.
    pub fn from_json(value: &JsonValue) -> RecordResult<Self> {
        let map = value.as_object().ok_or_else(|| RecordError::NotAnObject(json_kind(value)))?;
        let fields = map
            .iter()
            .map(|(k, v)| (k.clone(), BindingValue::from_json(v)))
            .collect();
        Ok(Record { fields })
    }

    pub fn with(mut self, field: impl Into<String>, value: BindingValue) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: BindingValue) {
        self.fields.insert(field.into(), value);
    }

    /// Binding for `field`, [`BindingValue::Empty`] when absent
    pub fn get(&self, field: &str) -> &BindingValue {
        self.fields.get(field).unwrap_or(&EMPTY)
    }

    /// String value of `field`, or `""`. Never fails.
    pub fn get_value(&self, field: &str) -> &str {
        self.get(field).as_str()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_binding_shapes() {
        assert_eq!(BindingValue::from_json(&json!(null)), BindingValue::Empty);
        assert_eq!(BindingValue::from_json(&json!("x")), BindingValue::Scalar("x".into()));
        assert_eq!(BindingValue::from_json(&json!(42)), BindingValue::Scalar("42".into()));
        assert_eq!(BindingValue::from_json(&json!(true)), BindingValue::Scalar("true".into()));
        assert_eq!(
            BindingValue::from_json(&json!({"type": "uri", "value": "http://x/entity/Q1"})),
            BindingValue::Wrapped("http://x/entity/Q1".into())
        );
        assert_eq!(
            BindingValue::from_json(&json!({"type": "literal"})),
            BindingValue::Wrapped(String::new())
        );
    }

    #[test]
    fn test_get_value_never_fails() {
        let record = Record::from_json(&json!({
            "item": {"value": "http://x/entity/Q1"},
            "itemLabel": "A",
            "nothing": null
        }))
        .unwrap();

        assert_eq!(record.get_value("item"), "http://x/entity/Q1");
        assert_eq!(record.get_value("itemLabel"), "A");
        assert_eq!(record.get_value("nothing"), "");
        assert_eq!(record.get_value("missing"), "");
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_non_object_record_is_error() {
        let err = Record::from_json(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, RecordError::NotAnObject("array")));
    }
}
