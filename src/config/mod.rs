use config::{Config, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub mod validator;
pub mod watcher;

use crate::cli::Cli;
use crate::domain::{ConfigObject, EditorDefaults, JsExpression, SchemaInput};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub editor: EditorSettings,
    #[serde(default)]
    pub assets: AssetSettings,
    /// Site-wide plugin options, loaded from `editor.options_path`.
    /// Kept out of the TOML file because the `config` crate lowercases table keys.
    #[serde(skip)]
    pub default_options: Value,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Client editor defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EditorSettings {
    /// Schema file (JSON, YAML or TOML) shown by the preview server
    #[serde(default)]
    pub schema_path: Option<PathBuf>,
    /// JSON file with plugin options applied under every widget's options
    #[serde(default)]
    pub options_path: Option<PathBuf>,
    #[serde(default = "default_constructor")]
    pub constructor: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_ref_parser")]
    pub ref_parser: String,
    /// Form field name used by the preview page
    #[serde(default = "default_field_name")]
    pub field_name: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            schema_path: None,
            options_path: None,
            constructor: default_constructor(),
            theme: default_theme(),
            ref_parser: default_ref_parser(),
            field_name: default_field_name(),
        }
    }
}

fn default_constructor() -> String {
    "Jedi.Create".to_string()
}

fn default_theme() -> String {
    "new Jedi.Theme()".to_string()
}

fn default_ref_parser() -> String {
    "new Jedi.RefParser()".to_string()
}

fn default_field_name() -> String {
    "payload".to_string()
}

/// Files of the editor asset bundle
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssetSettings {
    #[serde(default = "default_scripts")]
    pub scripts: Vec<String>,
    #[serde(default = "default_styles")]
    pub styles: Vec<String>,
    /// Local directory served under `/assets`
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            scripts: default_scripts(),
            styles: default_styles(),
            dir: None,
        }
    }
}

fn default_scripts() -> Vec<String> {
    vec!["/assets/jedi.js".to_string()]
}

fn default_styles() -> Vec<String> {
    vec!["/assets/jedi.css".to_string()]
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Create settings from CLI arguments (config file, then CLI/env overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let root = cli
            .config
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let mut settings = Self::load(cli.config.clone())?;
        settings.apply_cli_overrides(cli);
        settings.finish(&root)?;
        Ok(settings)
    }

    pub fn from_root(root: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let root = root.as_ref();
        let mut settings = Self::load(root.join("jedi"))?;
        settings.finish(root)?;
        Ok(settings)
    }

    fn load(config_path: PathBuf) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(config_path).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .build()?;
        Ok(s.try_deserialize()?)
    }

    /// Resolves relative paths, loads external files and validates.
    fn finish(&mut self, root: &Path) -> Result<(), anyhow::Error> {
        self.resolve_paths(root);
        self.load_default_options()?;

        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!("Configuration validation failed:\n{}", error_messages.join("\n"))
        })
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(schema) = &cli.schema {
            self.editor.schema_path = Some(schema.clone());
        }
        if let Some(dir) = &cli.assets_dir {
            self.assets.dir = Some(dir.clone());
        }
    }

    fn resolve_paths(&mut self, root: &Path) {
        let resolve = |path: &mut Option<PathBuf>| {
            if let Some(p) = path.as_mut() {
                if p.is_relative() {
                    *p = root.join(&*p);
                }
            }
        };
        resolve(&mut self.editor.schema_path);
        resolve(&mut self.editor.options_path);
        resolve(&mut self.assets.dir);
    }

    fn load_default_options(&mut self) -> Result<(), anyhow::Error> {
        self.default_options = match &self.editor.options_path {
            Some(path) => read_structured(path)?,
            None => Value::Object(Default::default()),
        };
        Ok(())
    }

    /// Editor defaults for widgets rendered with these settings.
    pub fn editor_defaults(&self) -> EditorDefaults {
        EditorDefaults {
            constructor: self.editor.constructor.clone(),
            theme: JsExpression::new(self.editor.theme.as_str()),
            ref_parser: JsExpression::new(self.editor.ref_parser.as_str()),
            // Validation guarantees an object
            base_options: ConfigObject::try_from(self.default_options.clone()).unwrap_or_default(),
        }
    }

    /// Reads the configured schema file, if any.
    pub fn load_schema(&self) -> Result<Option<SchemaInput>, anyhow::Error> {
        self.editor.schema_path.as_deref().map(load_schema_file).transpose()
    }
}

/// Reads a schema file. JSON is handed over as text, YAML and TOML are decoded.
pub fn load_schema_file(path: &Path) -> Result<SchemaInput, anyhow::Error> {
    let content = std::fs::read_to_string(path)?;
    match extension(path) {
        "json" => Ok(SchemaInput::Text(content)),
        _ => Ok(SchemaInput::Structured(parse_structured(path, &content)?)),
    }
}

fn read_structured(path: &Path) -> Result<Value, anyhow::Error> {
    let content = std::fs::read_to_string(path)?;
    parse_structured(path, &content)
}

fn parse_structured(path: &Path, content: &str) -> Result<Value, anyhow::Error> {
    let value = match extension(path) {
        "json" => serde_json::from_str(content)?,
        "yaml" | "yml" => serde_yaml::from_str(content)?,
        "toml" => toml::from_str(content)?,
        other => anyhow::bail!("Unsupported file format '{}': {}", other, path.display()),
    };
    Ok(value)
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or_default()
}
