use thiserror::Error;

use crate::config::{AssetSettings, EditorSettings, ServerSettings, Settings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("File not found for {field}: {path}")]
    FileNotFound { field: String, path: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_server(&settings.server) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_editor(&settings.editor) {
            errors.extend(e);
        }

        if !settings.default_options.is_object() {
            errors.push(ValidationError::InvalidValue {
                field: "editor.options_path".to_string(),
                reason: "Default plugin options must be an object".to_string(),
            });
        }

        if let Err(e) = Self::validate_assets(&settings.assets) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &ServerSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_editor(editor: &EditorSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if editor.constructor.is_empty() {
            errors.push(ValidationError::MissingField("editor.constructor".to_string()));
        } else if !is_member_path(&editor.constructor) {
            errors.push(ValidationError::InvalidValue {
                field: "editor.constructor".to_string(),
                reason: format!("'{}' is not a dotted identifier", editor.constructor),
            });
        }

        for (field, value) in [("editor.theme", &editor.theme), ("editor.ref_parser", &editor.ref_parser)] {
            if value.trim().is_empty() {
                errors.push(ValidationError::MissingField(field.to_string()));
            }
        }

        if editor.field_name.is_empty() {
            errors.push(ValidationError::MissingField("editor.field_name".to_string()));
        }

        if let Some(path) = &editor.schema_path {
            if !path.is_file() {
                errors.push(ValidationError::FileNotFound {
                    field: "editor.schema_path".to_string(),
                    path: path.display().to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_assets(assets: &AssetSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (idx, url) in assets.scripts.iter().enumerate() {
            if url.is_empty() {
                errors.push(ValidationError::MissingField(format!("assets.scripts[{}]", idx)));
            }
        }

        for (idx, url) in assets.styles.iter().enumerate() {
            if url.is_empty() {
                errors.push(ValidationError::MissingField(format!("assets.styles[{}]", idx)));
            }
        }

        if let Some(dir) = &assets.dir {
            if !dir.is_dir() {
                errors.push(ValidationError::FileNotFound {
                    field: "assets.dir".to_string(),
                    path: dir.display().to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// `Jedi.Create`, `window.MyEditor`, ...
fn is_member_path(path: &str) -> bool {
    path.split('.').all(|segment| {
        let mut chars = segment.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    })
}
