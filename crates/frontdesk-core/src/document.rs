use jiff::Timestamp;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// A stored document: an identifier plus a loosely-typed JSON body.
///
/// Documents are owned by the store. Readers get snapshots and never write
/// back through them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Build a document from any model that serializes to a JSON object.
    pub fn from_model<T: Serialize>(id: impl Into<String>, model: &T) -> Result<Self, CoreError> {
        match serde_json::to_value(model)? {
            Value::Object(data) => Ok(Self::new(id, data)),
            _ => Err(CoreError::NotAnObject),
        }
    }

    pub fn to_model<T: DeserializeOwned>(&self) -> Result<T, CoreError> {
        Ok(serde_json::from_value(Value::Object(self.data.clone()))?)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    pub fn timestamp(&self, field: &str) -> Option<Timestamp> {
        self.get(field).and_then(value_timestamp)
    }

    /// The field as an equality key, if it is a scalar.
    pub fn key(&self, field: &str) -> Option<String> {
        self.get(field).and_then(scalar_key)
    }
}

/// Interpret a stored value as a point in time.
///
/// RFC 3339 strings, Unix seconds, and `{ "seconds", "nanoseconds" }`
/// objects are all accepted.
pub fn value_timestamp(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_i64().and_then(|secs| Timestamp::from_second(secs).ok()),
        Value::Object(obj) => {
            let secs = obj
                .get("seconds")
                .or_else(|| obj.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = obj
                .get("nanoseconds")
                .or_else(|| obj.get("_nanoseconds"))
                .and_then(Value::as_i64)
                .unwrap_or(0);
            Timestamp::new(secs, i32::try_from(nanos).ok()?).ok()
        }
        _ => None,
    }
}

/// Stringify a scalar for equality comparisons. Compound values have no key.
pub fn scalar_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
