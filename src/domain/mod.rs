//! Core types of the editor widget: configuration values, the option
//! merger, schema normalization and option defaulting. Nothing in here
//! renders markup or touches I/O.

pub mod diagnostics;
pub mod error;
pub mod merge;
pub mod options;
pub mod schema;
pub mod value;

pub use diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Severity};
pub use error::{MergeError, SchemaError, WidgetError, WidgetResult};
pub use merge::{deep_merge, merge_json, merge_values};
pub use options::{prepare_plugin_options, BoundValue, EditorDefaults, PreparedOptions};
pub use schema::{Schema, SchemaInput};
pub use value::{ConfigObject, ConfigValue, JsExpression};
