//! Host-facing diagnostics and the relay of esbuild messages into them.

use super::esbuild::{Location, Message};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single error or warning reported back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

impl From<&super::Error> for Diagnostic {
    fn from(err: &super::Error) -> Self {
        Self::error(err.summary(), err.to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        };
        write!(f, "{label}: {}", self.summary)?;
        for line in self.detail.lines() {
            write!(f, "\n  {line}")?;
        }
        Ok(())
    }
}

/// Ordered collection of diagnostics for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::error(summary, detail));
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::warning(summary, detail));
    }

    pub fn append(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// `<file>:<line> - suggestion: <suggestion>`
pub fn format_location(location: &Location) -> String {
    format!(
        "{}:{} - suggestion: {}",
        location.file, location.line, location.suggestion
    )
}

/// Location first, then one line per note.
pub fn message_detail(message: &Message) -> String {
    let mut detail = String::new();

    if let Some(location) = &message.location {
        detail.push_str(&format_location(location));
        detail.push_str("\n\n");
    }

    for note in &message.notes {
        detail.push('\n');
        match &note.location {
            Some(location) => {
                detail.push_str(&format_location(location));
                detail.push_str(": ");
                detail.push_str(&note.text);
            }
            None => detail.push_str(&note.text),
        }
    }

    detail
}

/// Relays esbuild errors and warnings, errors first.
pub fn relay_messages(errors: &[Message], warnings: &[Message]) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    for message in errors {
        diagnostics.add_error(
            format!("esbuild error: {}", message.text),
            message_detail(message),
        );
    }

    // Warnings still go out after errors so the host sees the full build log.
    for message in warnings {
        log::warn!("esbuild warning: {}", message.text);
        diagnostics.add_warning(
            format!("esbuild warning: {}", message.text),
            message_detail(message),
        );
    }

    diagnostics
}
