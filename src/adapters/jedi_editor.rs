//! JSON-schema form editor widget
//!
//! Renders an empty container element and registers a startup script that
//! builds a Jedi editor inside it. The editor keeps a hidden form field in
//! sync with the edited document, so the surrounding form submits the JSON
//! like any other input.
//!
//! ```rust
//! use jedi_widget::adapters::jedi_editor::{InputBinding, JediEditor};
//! use jedi_widget::adapters::view::View;
//! use serde_json::json;
//!
//! let mut view = View::new();
//! let rendered = JediEditor::new(InputBinding::model("Settings", "payload", Some(r#"{"a":1}"#.into())))
//!     .schema(json!({"type": "object"}))
//!     .widget(&mut view)?;
//!
//! assert_eq!(rendered.html, r#"<div id="settings-payload-container"></div>"#);
//! # Ok::<(), jedi_widget::domain::WidgetError>(())
//! ```

use serde::Serialize;

use super::html::{self, HtmlAttributes};
use super::script::{encode_string, BootstrapScript};
use super::view::{AssetBundle, View};
use crate::config::AssetSettings;
use crate::domain::options::{CONTAINER, HIDDEN_INPUT_ATTRIBUTES, REF_PARSER, SCHEMA};
use crate::domain::{
    deep_merge, prepare_plugin_options, BoundValue, ConfigObject, ConfigValue, Diagnostics,
    EditorDefaults, Schema, SchemaInput, WidgetError, WidgetResult,
};

/// Form field the editor writes to
#[derive(Debug, Clone, PartialEq)]
pub enum InputBinding {
    /// Attribute of a named form model, e.g. `Settings[payload]`
    Model {
        form_name: String,
        attribute: String,
        value: Option<BoundValue>,
    },
    /// Free-standing field
    Named { name: String, value: Option<BoundValue> },
}

impl InputBinding {
    pub fn model(form_name: impl Into<String>, attribute: impl Into<String>, value: Option<BoundValue>) -> Self {
        Self::Model {
            form_name: form_name.into(),
            attribute: attribute.into(),
            value,
        }
    }

    pub fn named(name: impl Into<String>, value: Option<BoundValue>) -> Self {
        Self::Named {
            name: name.into(),
            value,
        }
    }

    pub fn value(&self) -> Option<&BoundValue> {
        match self {
            Self::Model { value, .. } | Self::Named { value, .. } => value.as_ref(),
        }
    }

    fn validate(&self) -> WidgetResult<()> {
        let missing = match self {
            Self::Model { attribute, .. } => attribute.is_empty(),
            Self::Named { name, .. } => name.is_empty(),
        };
        if missing {
            return Err(WidgetError::MissingBinding);
        }
        Ok(())
    }
}

/// Widget configuration, consumed by [`JediEditor::init`].
#[derive(Debug, Clone)]
pub struct JediEditor {
    binding: InputBinding,
    options: HtmlAttributes,
    container_options: HtmlAttributes,
    schema: Option<SchemaInput>,
    plugin_options: ConfigObject,
    defaults: EditorDefaults,
    assets: AssetSettings,
}

impl JediEditor {
    pub fn new(binding: InputBinding) -> Self {
        Self {
            binding,
            options: HtmlAttributes::new(),
            container_options: HtmlAttributes::new(),
            schema: None,
            plugin_options: ConfigObject::new(),
            defaults: EditorDefaults::default(),
            assets: AssetSettings::default(),
        }
    }

    /// Form schema. A `schema` entry in the plugin options takes precedence.
    pub fn schema(mut self, schema: impl Into<SchemaInput>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Options passed to the client editor.
    pub fn plugin_options(mut self, options: ConfigObject) -> Self {
        self.plugin_options = options;
        self
    }

    pub fn plugin_option(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.plugin_options.insert(key, value);
        self
    }

    /// Attributes of the bound input; only `id` is used.
    pub fn options(mut self, options: HtmlAttributes) -> Self {
        self.options = options;
        self
    }

    /// Attributes of the container element.
    pub fn container_options(mut self, options: HtmlAttributes) -> Self {
        self.container_options = options;
        self
    }

    pub fn defaults(mut self, defaults: EditorDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn assets(mut self, assets: AssetSettings) -> Self {
        self.assets = assets;
        self
    }

    /// Validates the configuration and computes everything needed to render.
    ///
    /// Fails before anything is registered on `view` when no schema is given
    /// or the widget is not bound to a field.
    pub fn init(mut self, view: &mut View) -> WidgetResult<PreparedEditor> {
        self.binding.validate()?;

        let prepared = prepare_plugin_options(&self.plugin_options, &self.defaults, self.binding.value())?;
        let schema_input = prepared.schema.or(self.schema).ok_or(WidgetError::MissingSchema)?;
        let schema = Schema::normalize(schema_input)?;

        let (input_name, input_id) = match &self.binding {
            InputBinding::Model { form_name, attribute, .. } => {
                let name = html::input_name(form_name, attribute);
                let id = html::input_id(&name);
                if !self.options.contains("id") {
                    self.options.set("id", id.as_str());
                }
                (name, id)
            }
            InputBinding::Named { name, .. } => {
                if !self.options.contains("id") {
                    self.options.set("id", view.next_widget_id());
                }
                let id = self.options.get("id").unwrap_or_default().to_string();
                (name.clone(), id)
            }
        };

        let slug = view.unique_slug(html::slug(&input_id));

        if !self.container_options.contains("id") {
            let options_id = self.options.get("id").unwrap_or_default();
            self.container_options.set("id", format!("{options_id}-container"));
        }

        Ok(PreparedEditor {
            container_options: self.container_options,
            input_name,
            input_id,
            slug,
            schema,
            custom_options: prepared.options,
            diagnostics: prepared.diagnostics,
            defaults: self.defaults,
            assets: self.assets,
        })
    }

    /// `init` + `run` in one step.
    pub fn widget(self, view: &mut View) -> WidgetResult<RenderedEditor> {
        let prepared = self.init(view)?;
        let html = prepared.run(view)?;
        Ok(RenderedEditor {
            html,
            input_id: prepared.input_id,
            diagnostics: prepared.diagnostics,
        })
    }
}

/// A validated widget, ready to render
#[derive(Debug, Clone)]
pub struct PreparedEditor {
    container_options: HtmlAttributes,
    input_name: String,
    input_id: String,
    slug: String,
    schema: Schema,
    custom_options: ConfigObject,
    diagnostics: Diagnostics,
    defaults: EditorDefaults,
    assets: AssetSettings,
}

impl PreparedEditor {
    pub fn container_id(&self) -> &str {
        self.container_options.get("id").unwrap_or_default()
    }

    pub fn input_id(&self) -> &str {
        &self.input_id
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Suffix of the startup routine name, unique within the page.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Caller options after defaulting, before the wiring is merged in.
    pub fn custom_options(&self) -> &ConfigObject {
        &self.custom_options
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Options the client editor is constructed with.
    ///
    /// The wiring keys always come from the widget: they are removed from the
    /// custom options before the merge. `refParser` points at the routine's
    /// parser constant so the parser is built once.
    pub fn effective_options(&self) -> ConfigObject {
        let mut custom = self.custom_options.clone();
        if custom.is_set(REF_PARSER) {
            custom.insert(REF_PARSER, ConfigValue::expression("refParser"));
        }
        deep_merge(&wiring_defaults(self.container_id(), &self.input_name, &self.input_id), &custom)
    }

    /// Startup script for this widget.
    pub fn script(&self) -> WidgetResult<String> {
        BootstrapScript::new(
            self.slug.as_str(),
            &self.schema,
            self.custom_options.get(REF_PARSER).filter(|v| !v.is_null()),
            &self.effective_options(),
            self.defaults.constructor.as_str(),
            &self.input_id,
        )
        .render()
    }

    /// Registers the editor assets and script on `view` and returns the
    /// container markup.
    pub fn run(&self, view: &mut View) -> WidgetResult<String> {
        let script = self.script()?;
        view.register_asset_bundle(AssetBundle::jedi(&self.assets));
        view.register_js(script);
        Ok(html::tag("div", "", &self.container_options))
    }
}

/// Output of [`JediEditor::widget`]
#[derive(Debug, Clone, Serialize)]
pub struct RenderedEditor {
    pub html: String,
    pub input_id: String,
    pub diagnostics: Diagnostics,
}

/// Options the widget owns: the container element, the schema constant and
/// the hidden field's name and id.
pub fn wiring_defaults(container_id: &str, input_name: &str, input_id: &str) -> ConfigObject {
    ConfigObject::new()
        .with(
            CONTAINER,
            ConfigValue::expression(format!("document.getElementById({})", encode_string(container_id))),
        )
        .with(SCHEMA, ConfigValue::expression("schema"))
        .with(
            HIDDEN_INPUT_ATTRIBUTES,
            ConfigObject::new().with("name", input_name).with("id", input_id),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DiagnosticCode;
    use serde_json::json;

    fn model_editor(value: Option<&str>) -> JediEditor {
        JediEditor::new(InputBinding::model("Settings", "payload", value.map(BoundValue::from)))
            .schema(json!({"type": "object"}))
    }

    #[test]
    fn test_missing_schema_is_rejected_before_rendering() {
        let mut view = View::new();
        let err = JediEditor::new(InputBinding::named("payload", None))
            .init(&mut view)
            .unwrap_err();

        assert!(matches!(err, WidgetError::MissingSchema));
        assert!(view.scripts().is_empty());
        assert!(view.asset_bundles().is_empty());
    }

    #[test]
    fn test_missing_binding_is_rejected() {
        let mut view = View::new();
        let err = JediEditor::new(InputBinding::named("", None))
            .schema(json!({}))
            .init(&mut view)
            .unwrap_err();
        assert!(matches!(err, WidgetError::MissingBinding));

        let err = JediEditor::new(InputBinding::model("Form", "", None))
            .schema(json!({}))
            .init(&mut view)
            .unwrap_err();
        assert!(matches!(err, WidgetError::MissingBinding));
    }

    #[test]
    fn test_model_binding_ids() {
        let mut view = View::new();
        let prepared = model_editor(Some("{}")).init(&mut view).unwrap();

        assert_eq!(prepared.input_name(), "Settings[payload]");
        assert_eq!(prepared.input_id(), "settings-payload");
        assert_eq!(prepared.container_id(), "settings-payload-container");
    }

    #[test]
    fn test_named_binding_uses_auto_id() {
        let mut view = View::new();
        let first = JediEditor::new(InputBinding::named("a", None))
            .schema(json!({}))
            .init(&mut view)
            .unwrap();
        let second = JediEditor::new(InputBinding::named("b", None))
            .schema(json!({}))
            .options(HtmlAttributes::new().with("id", "custom"))
            .container_options(HtmlAttributes::new().with("id", "box").with("class", "editor"))
            .init(&mut view)
            .unwrap();

        assert_eq!(first.input_id(), "w0");
        assert_eq!(first.container_id(), "w0-container");
        assert_eq!(second.input_id(), "custom");
        assert_eq!(second.container_id(), "box");
    }

    #[test]
    fn test_wiring_cannot_be_overridden() {
        let mut view = View::new();
        let prepared = model_editor(None)
            .plugin_options(
                ConfigObject::try_from(json!({
                    "container": "elsewhere",
                    "hiddenInputAttributes": {"name": "hijack", "id": "hijack", "class": "x"}
                }))
                .unwrap(),
            )
            .init(&mut view)
            .unwrap();

        let options = prepared.effective_options();
        assert_eq!(
            options.get(CONTAINER),
            Some(&ConfigValue::expression(r#"document.getElementById("settings-payload-container")"#))
        );
        assert_eq!(
            options.get(HIDDEN_INPUT_ATTRIBUTES),
            Some(&ConfigValue::from(json!({
                "name": "Settings[payload]",
                "id": "settings-payload",
                "class": "x"
            })))
        );
    }

    #[test]
    fn test_wiring_in_base_options_is_ignored() {
        let mut view = View::new();
        let defaults = EditorDefaults {
            base_options: ConfigObject::try_from(json!({
                "container": "site-wide",
                "hiddenInputAttributes": {"name": "site", "id": "site", "data-site": "1"}
            }))
            .unwrap(),
            ..EditorDefaults::default()
        };
        let prepared = model_editor(None).defaults(defaults).init(&mut view).unwrap();

        let options = prepared.effective_options();
        assert_eq!(
            options.get(CONTAINER),
            Some(&ConfigValue::expression(r#"document.getElementById("settings-payload-container")"#))
        );
        assert_eq!(
            options.get(HIDDEN_INPUT_ATTRIBUTES),
            Some(&ConfigValue::from(json!({
                "name": "Settings[payload]",
                "id": "settings-payload",
                "data-site": "1"
            })))
        );
    }

    #[test]
    fn test_routine_names_stay_unique_on_one_page() {
        let mut view = View::new();
        for (name, id) in [("first", "form-a_b"), ("second", "form-ab")] {
            JediEditor::new(InputBinding::named(name, None))
                .schema(json!({}))
                .options(HtmlAttributes::new().with("id", id))
                .widget(&mut view)
                .unwrap();
        }

        assert!(view.scripts()[0].contains("const initEditorformab = async"));
        assert!(view.scripts()[1].contains("const initEditorformab_2 = async"));
        assert!(view.scripts()[1].contains("initEditorformab_2()"));
    }

    #[test]
    fn test_schema_from_plugin_options_wins() {
        let mut view = View::new();
        let prepared = model_editor(None)
            .plugin_option("schema", r#"{"type":"array"}"#)
            .init(&mut view)
            .unwrap();

        assert_eq!(prepared.schema().as_value(), &json!({"type": "array"}));
        assert!(!prepared.custom_options().contains_key(SCHEMA));
        assert_eq!(prepared.effective_options().get(SCHEMA), Some(&ConfigValue::expression("schema")));
    }

    #[test]
    fn test_schema_only_in_plugin_options() {
        let mut view = View::new();
        let prepared = JediEditor::new(InputBinding::named("payload", None))
            .plugin_option("schema", json!({"type": "object"}))
            .init(&mut view)
            .unwrap();
        assert_eq!(prepared.schema().as_value(), &json!({"type": "object"}));
    }

    #[test]
    fn test_ref_parser_is_shared_with_options() {
        let mut view = View::new();
        let prepared = model_editor(Some("{}")).init(&mut view).unwrap();
        let script = prepared.script().unwrap();

        assert!(script.contains("const refParser = new Jedi.RefParser()"));
        assert!(script.contains(r#""refParser":refParser"#));
        assert!(script.contains(r#""theme":new Jedi.Theme()"#));
        assert!(script.contains(r#""data":{}"#));
    }

    #[test]
    fn test_run_registers_assets_and_script() {
        let mut view = View::new();
        let rendered = model_editor(Some(r#"{"x":1}"#))
            .container_options(HtmlAttributes::new().with("class", "form-editor"))
            .widget(&mut view)
            .unwrap();

        assert_eq!(
            rendered.html,
            r#"<div id="settings-payload-container" class="form-editor"></div>"#
        );
        assert_eq!(view.asset_bundles().len(), 1);
        assert_eq!(view.scripts().len(), 1);
        assert!(view.scripts()[0].contains("initEditorsettingspayload()"));
        assert!(rendered.diagnostics.is_empty());
    }

    #[test]
    fn test_invalid_value_renders_with_warning() {
        let mut view = View::new();
        let rendered = model_editor(Some("not json")).widget(&mut view).unwrap();

        assert!(rendered.diagnostics.contains(DiagnosticCode::InvalidData));
        assert!(!view.scripts()[0].contains(r#""data":"#));
    }
}
