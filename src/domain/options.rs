//! Plugin option defaulting
//!
//! Turns caller-supplied plugin options into the custom options handed to
//! the editor: wiring keys the widget owns are stripped, the client defaults
//! for `theme` and `refParser` are filled in and `data` is seeded from the
//! bound form value.

use serde_json::Value;

use super::diagnostics::{DiagnosticCode, Diagnostics};
use super::error::SchemaError;
use super::merge::deep_merge;
use super::schema::SchemaInput;
use super::value::{ConfigObject, ConfigValue, JsExpression};

pub const CONTAINER: &str = "container";
pub const SCHEMA: &str = "schema";
pub const HIDDEN_INPUT_ATTRIBUTES: &str = "hiddenInputAttributes";
pub const THEME: &str = "theme";
pub const REF_PARSER: &str = "refParser";
pub const DATA: &str = "data";

/// Client-side defaults of the editor library
#[derive(Debug, Clone, PartialEq)]
pub struct EditorDefaults {
    /// Constructor invoked with the effective options
    pub constructor: String,
    pub theme: JsExpression,
    pub ref_parser: JsExpression,
    /// Site-wide options applied under every caller's options
    pub base_options: ConfigObject,
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            constructor: "Jedi.Create".to_string(),
            theme: JsExpression::new("new Jedi.Theme()"),
            ref_parser: JsExpression::new("new Jedi.RefParser()"),
            base_options: ConfigObject::new(),
        }
    }
}

/// Current value of the bound form field
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Text(String),
    Structured(Value),
}

impl From<&str> for BoundValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for BoundValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for BoundValue {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

/// Result of [`prepare_plugin_options`]
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedOptions {
    pub options: ConfigObject,
    /// Schema found under the `schema` option, if any
    pub schema: Option<SchemaInput>,
    pub diagnostics: Diagnostics,
}

/// Prepares caller options for rendering. Pure apart from log output.
pub fn prepare_plugin_options(
    options: &ConfigObject,
    defaults: &EditorDefaults,
    value: Option<&BoundValue>,
) -> Result<PreparedOptions, SchemaError> {
    let mut diagnostics = Diagnostics::new();
    let mut options = deep_merge(&defaults.base_options, options);

    let schema = match options.remove(SCHEMA) {
        Some(raw) => SchemaInput::from_option(&raw)?,
        None => None,
    };

    strip_wiring(&mut options, &mut diagnostics);

    if !options.is_set(THEME) {
        options.insert(THEME, defaults.theme.clone());
    }
    if !options.is_set(REF_PARSER) {
        options.insert(REF_PARSER, defaults.ref_parser.clone());
    }

    match value {
        Some(BoundValue::Text(text)) if is_valid_json(text) => {
            options.insert(DATA, JsExpression::json_text(text));
        }
        Some(BoundValue::Structured(_)) => {
            diagnostics.info(
                DiagnosticCode::StructuredData,
                "Bound value is not a JSON string, data default skipped.",
            );
        }
        _ => diagnostics.warn(DiagnosticCode::InvalidData, "Data is not a valid JSON."),
    }

    Ok(PreparedOptions {
        options,
        schema,
        diagnostics,
    })
}

/// Removes the keys the widget always sets itself.
fn strip_wiring(options: &mut ConfigObject, diagnostics: &mut Diagnostics) {
    options.remove(CONTAINER);

    let Some(attributes) = options.get(HIDDEN_INPUT_ATTRIBUTES) else {
        return;
    };
    match attributes.to_mapping() {
        Some(mut attributes) => {
            attributes.remove("name");
            attributes.remove("id");
            options.insert(HIDDEN_INPUT_ATTRIBUTES, attributes);
        }
        None if attributes.is_null() => {
            options.remove(HIDDEN_INPUT_ATTRIBUTES);
        }
        None => {
            let kind = attributes.kind();
            options.remove(HIDDEN_INPUT_ATTRIBUTES);
            diagnostics.warn(
                DiagnosticCode::InvalidHiddenInputAttributes,
                format!("hiddenInputAttributes must be a mapping, got {kind}; ignored."),
            );
        }
    }
}

fn is_valid_json(text: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(text).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> ConfigObject {
        ConfigObject::try_from(value).unwrap()
    }

    fn prepare(options: Value, value: Option<BoundValue>) -> PreparedOptions {
        prepare_plugin_options(&obj(options), &EditorDefaults::default(), value.as_ref()).unwrap()
    }

    #[test]
    fn test_defaults_are_filled_in() {
        let prepared = prepare(json!({}), Some("{}".into()));

        assert_eq!(prepared.options.get(THEME), Some(&ConfigValue::expression("new Jedi.Theme()")));
        assert_eq!(
            prepared.options.get(REF_PARSER),
            Some(&ConfigValue::expression("new Jedi.RefParser()"))
        );
        assert!(prepared.diagnostics.is_empty());
    }

    #[test]
    fn test_caller_theme_is_kept_and_null_is_replaced() {
        let prepared = prepare(json!({"theme": "bootstrap5", "refParser": null}), None);

        assert_eq!(prepared.options.get(THEME), Some(&ConfigValue::from("bootstrap5")));
        assert_eq!(
            prepared.options.get(REF_PARSER),
            Some(&ConfigValue::expression("new Jedi.RefParser()"))
        );
    }

    #[test]
    fn test_ref_parser_false_is_kept() {
        let prepared = prepare(json!({"refParser": false}), None);
        assert_eq!(prepared.options.get(REF_PARSER), Some(&ConfigValue::from(json!(false))));
    }

    #[test]
    fn test_wiring_keys_are_stripped() {
        let prepared = prepare(
            json!({
                "container": "#elsewhere",
                "hiddenInputAttributes": {"name": "x", "id": "y", "class": "keep"}
            }),
            None,
        );

        assert!(!prepared.options.contains_key(CONTAINER));
        assert_eq!(
            prepared.options.get(HIDDEN_INPUT_ATTRIBUTES),
            Some(&ConfigValue::from(json!({"class": "keep"})))
        );
    }

    #[test]
    fn test_non_mapping_hidden_attributes_are_dropped_with_warning() {
        let prepared = prepare(json!({"hiddenInputAttributes": "oops"}), Some("1".into()));

        assert!(!prepared.options.contains_key(HIDDEN_INPUT_ATTRIBUTES));
        assert!(prepared.diagnostics.contains(DiagnosticCode::InvalidHiddenInputAttributes));
    }

    #[test]
    fn test_valid_json_value_sets_data_expression() {
        let prepared = prepare(json!({"data": {"old": true}}), Some(r#"{"x":1}"#.into()));

        assert_eq!(prepared.options.get(DATA), Some(&ConfigValue::expression(r#"{"x":1}"#)));
        assert!(prepared.diagnostics.is_empty());
    }

    #[test]
    fn test_markup_in_bound_value_is_escaped() {
        let text = r#"{"x":"</script><b>&"}"#;
        let prepared = prepare(json!({}), Some(text.into()));

        let Some(ConfigValue::Expression(data)) = prepared.options.get(DATA) else {
            panic!("data should be an expression");
        };
        assert_eq!(data.as_str(), r#"{"x":"\u003C/script\u003E\u003Cb\u003E\u0026"}"#);

        let decoded: Value = serde_json::from_str(data.as_str()).unwrap();
        assert_eq!(decoded, serde_json::from_str::<Value>(text).unwrap());
    }

    #[test]
    fn test_invalid_json_value_warns_and_skips_data() {
        let prepared = prepare(json!({}), Some("not json".into()));

        assert!(!prepared.options.contains_key(DATA));
        assert!(prepared.diagnostics.contains(DiagnosticCode::InvalidData));
        assert!(prepared.diagnostics.has_warnings());
    }

    #[test]
    fn test_missing_and_empty_values_warn() {
        assert!(prepare(json!({}), None).diagnostics.contains(DiagnosticCode::InvalidData));
        assert!(prepare(json!({}), Some("".into())).diagnostics.contains(DiagnosticCode::InvalidData));
    }

    #[test]
    fn test_caller_data_survives_invalid_value() {
        let prepared = prepare(json!({"data": {"a": 1}}), Some("nope".into()));
        assert_eq!(prepared.options.get(DATA), Some(&ConfigValue::from(json!({"a": 1}))));
    }

    #[test]
    fn test_structured_value_skips_data_without_warning() {
        let prepared = prepare(json!({}), Some(json!({"x": 1}).into()));

        assert!(!prepared.options.contains_key(DATA));
        assert!(prepared.diagnostics.contains(DiagnosticCode::StructuredData));
        assert!(!prepared.diagnostics.has_warnings());
    }

    #[test]
    fn test_schema_is_pulled_out_of_options() {
        let prepared = prepare(json!({"schema": {"type": "object"}, "theme": "x"}), None);

        assert!(!prepared.options.contains_key(SCHEMA));
        assert_eq!(
            prepared.schema,
            Some(SchemaInput::Object(json!({"type": "object"}).as_object().unwrap().clone()))
        );
    }

    #[test]
    fn test_base_options_apply_under_caller_options() {
        let defaults = EditorDefaults {
            base_options: obj(json!({"showErrors": "always", "assertFormat": true})),
            ..EditorDefaults::default()
        };

        let prepared =
            prepare_plugin_options(&obj(json!({"showErrors": "never"})), &defaults, None).unwrap();

        assert_eq!(prepared.options.get("showErrors"), Some(&ConfigValue::from("never")));
        assert_eq!(prepared.options.get("assertFormat"), Some(&ConfigValue::from(json!(true))));
    }

    #[test]
    fn test_input_options_are_not_mutated() {
        let options = obj(json!({"container": "x", "schema": {}}));
        let before = options.clone();

        let _ = prepare_plugin_options(&options, &EditorDefaults::default(), None).unwrap();

        assert_eq!(options, before);
    }
}
