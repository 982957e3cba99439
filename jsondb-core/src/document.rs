//! Flat, schema-less documents and the scalar values they hold.
//!
//! A [`Document`] maps string keys to [`Value`]s, which are either strings or numbers.
//! Documents carry no identity field; they are matched by structural equality against a
//! [`Filter`], which is just a partial document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as JsonValue};
use std::fmt;

use crate::error::{JsonDbError, JsonDbResult};

/// A scalar value stored in a document.
///
/// Serialized untagged, so on disk a value is a plain JSON string or number.
///
/// Equality is type-sensitive: `Value::from(40)` never equals `Value::from("40")`.
/// Two numbers compare by numeric value, so `40` and `40.0` are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A JSON string.
    String(String),
    /// A JSON number (integer or float).
    Number(Number),
}

impl Value {
    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            Value::Number(_) => None,
        }
    }

    /// Returns the number if this is a numeric value.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(value) => Some(value),
            Value::String(_) => None,
        }
    }

    /// Returns the value as `i64` if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    /// Returns the value as `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().and_then(Number::as_f64)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Number(left), Value::Number(right)) => numbers_equal(left, right),
            _ => false,
        }
    }
}

// Integers are compared exactly; anything involving a float is compared as f64.
fn numbers_equal(left: &Number, right: &Number) -> bool {
    if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
        return l == r;
    }

    if let (Some(l), Some(r)) = (left.as_u64(), right.as_u64()) {
        return l == r;
    }

    if left.is_f64() || right.is_f64() {
        return left.as_f64() == right.as_f64();
    }

    false
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(value) => write!(f, "{value:?}"),
            Value::Number(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl TryFrom<f64> for Value {
    type Error = JsonDbError;

    /// Fails for NaN and infinities, which JSON cannot represent.
    fn try_from(value: f64) -> JsonDbResult<Self> {
        Number::from_f64(value)
            .map(Value::Number)
            .ok_or_else(|| JsonDbError::InvalidDocument(format!("{value} is not a finite number")))
    }
}

impl TryFrom<JsonValue> for Value {
    type Error = JsonDbError;

    fn try_from(value: JsonValue) -> JsonDbResult<Self> {
        match value {
            JsonValue::String(value) => Ok(Value::String(value)),
            JsonValue::Number(value) => Ok(Value::Number(value)),
            other => Err(JsonDbError::InvalidDocument(format!(
                "expected a string or number, found {}",
                json_kind(&other)
            ))),
        }
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(value) => JsonValue::String(value),
            Value::Number(value) => JsonValue::Number(value),
        }
    }
}

pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// A flat mapping from string keys to scalar [`Value`]s.
///
/// Keys keep their insertion order, which is also the order they are written to disk.
/// Equality ignores key order.
///
/// # Example
///
/// ```ignore
/// use jsondb_core::document::Document;
///
/// let mut post = Document::new();
/// post.insert("title", "super title");
/// post.insert("views", 10);
///
/// assert!(post.matches(&Document::from_iter([("views", 10)])));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(IndexMap<String, Value>);

/// A partial document used for equality matching during read, update and delete.
///
/// An empty filter matches every document, the same as passing no filter at all.
pub type Filter = Document;

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Inserts a key, returning the previous value if the key was present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Removes a key, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the key/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Merges `patch` into this document.
    ///
    /// Keys from the patch overwrite existing values in place; new keys are appended;
    /// keys absent from the patch are left untouched.
    pub fn merge(&mut self, patch: &Document) {
        for (key, value) in patch.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Returns `true` if every key of `filter` is present in this document with an
    /// equal value. Extra keys on the document are ignored, so an empty filter matches.
    pub fn matches(&self, filter: &Filter) -> bool {
        filter
            .iter()
            .all(|(key, expected)| self.get(key) == Some(expected))
    }
}

impl<K, V> FromIterator<(K, V)> for Document
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl TryFrom<JsonValue> for Document {
    type Error = JsonDbError;

    /// Accepts only a JSON object whose members are strings or numbers.
    fn try_from(value: JsonValue) -> JsonDbResult<Self> {
        match value {
            JsonValue::Object(map) => Document::try_from(map),
            other => Err(JsonDbError::InvalidDocument(format!(
                "expected an object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

impl TryFrom<Map<String, JsonValue>> for Document {
    type Error = JsonDbError;

    fn try_from(map: Map<String, JsonValue>) -> JsonDbResult<Self> {
        let mut document = Document::new();

        for (key, value) in map {
            let value = Value::try_from(value)
                .map_err(|e| JsonDbError::InvalidDocument(format!("field {key:?}: {e}")))?;

            document.0.insert(key, value);
        }

        Ok(document)
    }
}

impl From<Document> for JsonValue {
    fn from(document: Document) -> Self {
        JsonValue::Object(
            document
                .into_iter()
                .map(|(key, value)| (key, value.into()))
                .collect(),
        )
    }
}
