//! Editor configuration values
//!
//! Plugin options are mostly plain JSON, but a few entries must reach the
//! browser as source code rather than data (`new Jedi.Theme()`,
//! `document.getElementById(...)`). [`ConfigValue`] keeps the two apart so
//! the script encoder can quote one and inline the other.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A fragment of client-side code that is emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsExpression(String);

impl JsExpression {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    /// Wraps JSON text for inline use. `<`, `>`, `&` and the JS line
    /// separators can only occur inside JSON strings, where `\u` escapes
    /// decode to the same value.
    pub fn json_text(text: &str) -> Self {
        let mut source = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '<' => source.push_str("\\u003C"),
                '>' => source.push_str("\\u003E"),
                '&' => source.push_str("\\u0026"),
                '\u{2028}' => source.push_str("\\u2028"),
                '\u{2029}' => source.push_str("\\u2029"),
                c => source.push(c),
            }
        }
        Self(source)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JsExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Plain data. Arrays and scalars are leaves for the merger.
    Json(Value),
    /// Nested mapping
    Object(ConfigObject),
    /// Raw client code
    Expression(JsExpression),
}

impl ConfigValue {
    pub fn expression(source: impl Into<String>) -> Self {
        Self::Expression(JsExpression::new(source))
    }

    /// `true` for JSON `null`, which the defaulting rules treat as unset.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Json(Value::Null))
    }

    /// Returns the value as a mapping, lifting a `Json(Value::Object)`.
    pub fn to_mapping(&self) -> Option<ConfigObject> {
        match self {
            Self::Object(obj) => Some(obj.clone()),
            Self::Json(Value::Object(map)) => Some(ConfigObject::from(map.clone())),
            _ => None,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Json(Value::Object(_)))
    }

    /// Converts back to plain JSON. Fails when an expression is nested inside.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value.clone()),
            Self::Object(obj) => obj.to_json().map(Value::Object),
            Self::Expression(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Json(value) => json_kind(value),
            Self::Object(_) => "object",
            Self::Expression(_) => "expression",
        }
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(ConfigObject::from(map)),
            other => Self::Json(other),
        }
    }
}

impl From<ConfigObject> for ConfigValue {
    fn from(obj: ConfigObject) -> Self {
        Self::Object(obj)
    }
}

impl From<JsExpression> for ConfigValue {
    fn from(expr: JsExpression) -> Self {
        Self::Expression(expr)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Json(Value::String(s.to_string()))
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::Json(Value::String(s))
    }
}

/// Insertion-ordered mapping of option names to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigObject {
    entries: Vec<(String, ConfigValue)>,
}

impl ConfigObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// `isset` semantics: present and not `null`.
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_null())
    }

    /// Replaces the value in place when the key exists, appends otherwise.
    /// Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Plain JSON view, or `None` if any nested value is an expression.
    pub fn to_json(&self) -> Option<Map<String, Value>> {
        let mut map = Map::new();
        for (key, value) in &self.entries {
            map.insert(key.clone(), value.to_json()?);
        }
        Some(map)
    }
}

impl From<Map<String, Value>> for ConfigObject {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            entries: map.into_iter().map(|(k, v)| (k, ConfigValue::from(v))).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ConfigObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut obj = Self::new();
        for (k, v) in iter {
            obj.insert(k, v);
        }
        obj
    }
}

impl TryFrom<Value> for ConfigObject {
    type Error = &'static str;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self::from(map)),
            other => Err(json_kind(&other)),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
