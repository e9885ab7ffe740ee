/// A compact JSON-like value store for raw region metadata.
///
/// Region data arrives as JSON objects whose values are almost always
/// strings; list-valued entries are encoded as a single `~`-separated string.
/// [`JsoMap`] keeps exactly that shape: string leaves and nested objects.
/// Scalars other than strings are stringified on the way in, arrays are
/// joined with `~`, and `null` entries are dropped, so consumers never have
/// to deal with the full `serde_json::Value` model.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::DATA_SEPARATOR;

// ---------------------------------------------------------------------------
// JsoError
// ---------------------------------------------------------------------------

/// Error returned when text cannot be turned into a [`JsoMap`].
#[derive(Debug, Error)]
pub enum JsoError {
    /// The text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    /// The JSON value is valid but not an object.
    #[error("expected a JSON object at the top level")]
    NotAnObject,
}

// ---------------------------------------------------------------------------
// JsoValue / JsoMap
// ---------------------------------------------------------------------------

/// A value stored in a [`JsoMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsoValue {
    String(String),
    Object(JsoMap),
}

impl JsoValue {
    /// Returns the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            Self::Object(_) => None,
        }
    }

    /// Returns the nested map, if this is an object.
    pub fn as_object(&self) -> Option<&JsoMap> {
        match self {
            Self::Object(m) => Some(m),
            Self::String(_) => None,
        }
    }
}

/// An ordered string-keyed map of string and object values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub struct JsoMap {
    entries: BTreeMap<String, JsoValue>,
}

impl JsoMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses JSON text whose top-level value is an object.
    ///
    /// # Errors
    ///
    /// [`JsoError::Syntax`] for invalid JSON and [`JsoError::NotAnObject`]
    /// when the top-level value is not an object.
    pub fn parse(text: &str) -> Result<Self, JsoError> {
        let value: serde_json::Value = serde_json::from_str(text).map_err(JsoError::Syntax)?;
        Self::try_from(value)
    }

    /// Returns the string stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(JsoValue::as_str)
    }

    /// Returns the object stored under `key`.
    pub fn get_obj(&self, key: &str) -> Option<&JsoMap> {
        self.entries.get(key).and_then(JsoValue::as_object)
    }

    /// Returns the raw value stored under `key`.
    pub fn value(&self, key: &str) -> Option<&JsoValue> {
        self.entries.get(key)
    }

    /// Iterates over all keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over the keys whose values are strings.
    pub fn string_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.as_str(), s)))
    }

    /// Iterates over the keys whose values are objects.
    pub fn object_entries(&self) -> impl Iterator<Item = (&str, &JsoMap)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_object().map(|m| (k.as_str(), m)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores a string, replacing any previous value.
    pub fn put_string(&mut self, key: &str, value: &str) {
        self.entries
            .insert(key.to_owned(), JsoValue::String(value.to_owned()));
    }
}

// ---------------------------------------------------------------------------
// serde_json conversions
// ---------------------------------------------------------------------------

/// Flattens a scalar or array into the string form used by region data.
fn flatten_value(value: serde_json::Value) -> Option<JsoValue> {
    use serde_json::Value;
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(JsoValue::String(b.to_string())),
        Value::Number(n) => Some(JsoValue::String(n.to_string())),
        Value::String(s) => Some(JsoValue::String(s)),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .into_iter()
                .filter_map(flatten_value)
                .filter_map(|v| match v {
                    JsoValue::String(s) => Some(s),
                    JsoValue::Object(_) => None,
                })
                .collect();
            Some(JsoValue::String(parts.join(&DATA_SEPARATOR.to_string())))
        }
        Value::Object(map) => Some(JsoValue::Object(from_object(map))),
    }
}

fn from_object(map: serde_json::Map<String, serde_json::Value>) -> JsoMap {
    let entries = map
        .into_iter()
        .filter_map(|(k, v)| flatten_value(v).map(|v| (k, v)))
        .collect();
    JsoMap { entries }
}

impl TryFrom<serde_json::Value> for JsoMap {
    type Error = JsoError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Ok(from_object(map)),
            serde_json::Value::Null
            | serde_json::Value::Bool(_)
            | serde_json::Value::Number(_)
            | serde_json::Value::String(_)
            | serde_json::Value::Array(_) => Err(JsoError::NotAnObject),
        }
    }
}

impl From<JsoMap> for serde_json::Value {
    fn from(map: JsoMap) -> Self {
        let object = map
            .entries
            .into_iter()
            .map(|(k, v)| {
                let v = match v {
                    JsoValue::String(s) => serde_json::Value::String(s),
                    JsoValue::Object(m) => serde_json::Value::from(m),
                };
                (k, v)
            })
            .collect();
        serde_json::Value::Object(object)
    }
}
