//! Schema input normalization
//!
//! The schema can arrive as a structured value, as JSON text or as any
//! serializable object. Whatever the form, the editor only ever sees a
//! structured (object or array) JSON value.

use serde::Serialize;
use serde_json::{Map, Value};

use super::error::SchemaError;
use super::value::{json_kind, ConfigValue};

/// Accepted schema representations
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaInput {
    Structured(Value),
    Text(String),
    Object(Map<String, Value>),
}

impl SchemaInput {
    /// Generic structured-object form: any serializable type.
    pub fn from_serializable<T: Serialize>(schema: &T) -> Result<Self, SchemaError> {
        match serde_json::to_value(schema)? {
            Value::Object(map) => Ok(Self::Object(map)),
            other => Ok(Self::Structured(other)),
        }
    }

    /// Reads the `schema` plugin option. `null` counts as absent.
    pub fn from_option(value: &ConfigValue) -> Result<Option<Self>, SchemaError> {
        match value {
            ConfigValue::Json(Value::Null) => Ok(None),
            ConfigValue::Json(Value::String(text)) => Ok(Some(Self::Text(text.clone()))),
            ConfigValue::Json(other) => Ok(Some(Self::Structured(other.clone()))),
            ConfigValue::Object(obj) => obj
                .to_json()
                .map(|map| Some(Self::Object(map)))
                .ok_or(SchemaError::Expression),
            ConfigValue::Expression(_) => Err(SchemaError::Expression),
        }
    }
}

impl From<Value> for SchemaInput {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

impl From<Map<String, Value>> for SchemaInput {
    fn from(map: Map<String, Value>) -> Self {
        Self::Object(map)
    }
}

impl From<&str> for SchemaInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for SchemaInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A normalized schema, always a JSON object or array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schema(Value);

impl Schema {
    pub fn normalize(input: SchemaInput) -> Result<Self, SchemaError> {
        let value = match input {
            SchemaInput::Structured(value) => value,
            SchemaInput::Text(text) => serde_json::from_str(&text)?,
            SchemaInput::Object(map) => Value::Object(map),
        };

        match value {
            Value::Object(_) | Value::Array(_) => Ok(Self(value)),
            other => Err(SchemaError::NotStructured(json_kind(&other))),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl TryFrom<SchemaInput> for Schema {
    type Error = SchemaError;

    fn try_from(input: SchemaInput) -> Result<Self, Self::Error> {
        Self::normalize(input)
    }
}
