//! Dynamically-typed record values.
//!
//! [`PropertyValue`] is the tagged union stored in a record's property map.
//! Its JSON form is the plain JSON value, so both encodings of a string list
//! (`["a", "b"]` and a mixed array such as `["a", 1, "b"]`) round-trip through
//! any JSON persistence layer unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A dynamically-typed property value.
///
/// Numbers are always `f64`, including whole-second epoch timestamps written
/// by [`DataRecord::set_time`](super::DataRecord::set_time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// A boolean value.
    Bool(bool),
    /// A numeric value.
    Number(f64),
    /// A string value.
    String(String),
    /// A list made only of strings.
    Strings(Vec<String>),
    /// A list of arbitrary values; string accessors keep only the strings.
    List(Vec<PropertyValue>),
    /// Anything else JSON can express (null, objects).
    Other(Value),
}

impl PropertyValue {
    /// Converts a JSON value, preferring the most specific variant.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Bool(b) => PropertyValue::Bool(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => PropertyValue::Number(f),
                None => PropertyValue::Other(Value::Number(n)),
            },
            Value::String(s) => PropertyValue::String(s),
            Value::Array(items) => {
                if items.iter().all(Value::is_string) {
                    PropertyValue::Strings(
                        items
                            .into_iter()
                            .filter_map(|v| match v {
                                Value::String(s) => Some(s),
                                _ => None,
                            })
                            .collect(),
                    )
                } else {
                    PropertyValue::List(items.into_iter().map(PropertyValue::from_json).collect())
                }
            }
            other => PropertyValue::Other(other),
        }
    }

    /// Converts back to a plain JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Bool(b) => Value::Bool(*b),
            PropertyValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PropertyValue::String(s) => Value::String(s.clone()),
            PropertyValue::Strings(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            PropertyValue::List(items) => {
                Value::Array(items.iter().map(PropertyValue::to_json).collect())
            }
            PropertyValue::Other(v) => v.clone(),
        }
    }

    /// Renders the value as display text, used for matching and snippets.
    pub fn to_text(&self) -> String {
        match self {
            PropertyValue::Bool(b) => b.to_string(),
            PropertyValue::Number(n) => format!("{:.2}", n),
            PropertyValue::String(s) => s.clone(),
            PropertyValue::Strings(items) => items.join(", "),
            PropertyValue::List(items) => items
                .iter()
                .map(PropertyValue::to_text)
                .collect::<Vec<_>>()
                .join(", "),
            PropertyValue::Other(Value::Null) => String::new(),
            PropertyValue::Other(v) => v.to_string(),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<i32> for PropertyValue {
    fn from(n: i32) -> Self {
        PropertyValue::Number(f64::from(n))
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Number(n as f64)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(items: Vec<String>) -> Self {
        PropertyValue::Strings(items)
    }
}

impl From<Vec<&str>> for PropertyValue {
    fn from(items: Vec<&str>) -> Self {
        PropertyValue::Strings(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(items: Vec<PropertyValue>) -> Self {
        PropertyValue::List(items)
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        PropertyValue::from_json(value)
    }
}
