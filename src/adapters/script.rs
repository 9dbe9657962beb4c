//! Client script generation
//!
//! Encodes configuration values as JavaScript source that is safe to place
//! inside an inline `<script>` element, and renders the startup routine
//! that builds the editor.

use serde::Serialize;
use serde_json::Value;
use tera::{Context, Tera};

use crate::domain::{ConfigObject, ConfigValue, Schema, WidgetResult};

const BOOTSTRAP_TEMPLATE: &str = r#"const initEditor{{ slug }} = async () => {
    const schema = {{ schema }}
    const refParser = {{ ref_parser }}

    if (refParser) {
        await refParser.dereference(schema)
    }

    const editorOptions = {{ options }}

    const editor = new {{ constructor }}(editorOptions)

    if (editor) {
        window[{{ registry_key }}] = editor
    }
}

initEditor{{ slug }}()
"#;

/// Inputs of the startup routine
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapScript {
    /// Suffix of the routine name, must be identifier-safe
    pub slug: String,
    /// JS source of the schema
    pub schema: String,
    /// JS source of the reference parser (`null` when disabled)
    pub ref_parser: String,
    /// JS source of the effective options object
    pub options: String,
    pub constructor: String,
    /// JS string literal under which the instance is exposed on `window`
    pub registry_key: String,
}

impl BootstrapScript {
    pub fn new(
        slug: impl Into<String>,
        schema: &Schema,
        ref_parser: Option<&ConfigValue>,
        options: &ConfigObject,
        constructor: impl Into<String>,
        registry_key: &str,
    ) -> Self {
        Self {
            slug: slug.into(),
            schema: encode_json(schema.as_value()),
            ref_parser: ref_parser.map(encode).unwrap_or_else(|| "null".to_string()),
            options: encode_object(options),
            constructor: constructor.into(),
            registry_key: encode_string(registry_key),
        }
    }

    pub fn render(&self) -> WidgetResult<String> {
        let context = Context::from_serialize(self)?;
        Ok(Tera::one_off(BOOTSTRAP_TEMPLATE, &context, false)?)
    }
}

/// Encodes a configuration value: data is quoted, expressions are inlined.
pub fn encode(value: &ConfigValue) -> String {
    match value {
        ConfigValue::Json(json) => encode_json(json),
        ConfigValue::Object(obj) => encode_object(obj),
        ConfigValue::Expression(expr) => expr.to_string(),
    }
}

pub fn encode_object(obj: &ConfigObject) -> String {
    let fields: Vec<String> = obj
        .iter()
        .map(|(key, value)| format!("{}:{}", encode_string(key), encode(value)))
        .collect();
    format!("{{{}}}", fields.join(","))
}

/// JSON text with markup-significant characters escaped inside strings.
pub fn encode_json(value: &Value) -> String {
    match value {
        Value::String(s) => encode_string(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(encode_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}:{}", encode_string(key), encode_json(value)))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        scalar => scalar.to_string(),
    }
}

/// Double-quoted string literal, valid as both JSON and JavaScript.
pub fn encode_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\u0022"),
            '\'' => out.push_str("\\u0027"),
            '<' => out.push_str("\\u003C"),
            '>' => out.push_str("\\u003E"),
            '&' => out.push_str("\\u0026"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
