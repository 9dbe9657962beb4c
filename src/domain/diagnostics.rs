//! Non-fatal findings collected while preparing a widget
//!
//! Warnings are handed back to the caller together with the rendered
//! output instead of only going to the process log.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// Bound value is not JSON, `data` was not set
    InvalidData,
    /// Bound value is already structured, `data` default skipped
    StructuredData,
    /// `hiddenInputAttributes` was not a mapping and got dropped
    InvalidHiddenInputAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and forwards it to the tracing subscriber.
    pub fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(?code, "{}", message);
        self.0.push(Diagnostic {
            severity: Severity::Warning,
            code,
            message,
        });
    }

    /// Records an informational note; logged at debug level only.
    pub fn info(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(?code, "{}", message);
        self.0.push(Diagnostic {
            severity: Severity::Info,
            code,
            message,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn contains(&self, code: DiagnosticCode) -> bool {
        self.0.iter().any(|d| d.code == code)
    }

    pub fn has_warnings(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Warning)
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
