//! Error types for the editor widget

use thiserror::Error;

/// Errors raised while preparing or rendering an editor widget
#[derive(Debug, Error)]
pub enum WidgetError {
    /// No schema was given, neither directly nor through the plugin options
    #[error("Property 'schema' must be specified.")]
    MissingSchema,

    /// The widget is not bound to a form field
    #[error("Either 'name', or 'model' and 'attribute' properties must be specified.")]
    MissingBinding,

    /// Schema could not be normalized
    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    /// Script or markup template failed to render
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

/// Errors raised by schema normalization
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Text form is not valid JSON
    #[error("schema is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Decoded schema is a scalar
    #[error("schema must be an object or an array, got {0}")]
    NotStructured(&'static str),

    /// The `schema` plugin option holds client code instead of data
    #[error("schema cannot be a client expression")]
    Expression,
}

/// Errors raised by the configuration merger
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("{side} configuration must be a mapping, got {kind}")]
    NotAMapping { side: &'static str, kind: &'static str },
}

pub type WidgetResult<T> = Result<T, WidgetError>;
