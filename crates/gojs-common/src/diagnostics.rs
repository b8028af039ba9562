//! Diagnostic types reported by the analysis phases.
//!
//! Codes are stable so that drivers can filter or localize them without
//! matching on message text.

use serde::Serialize;
use std::fmt;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

impl DiagnosticCategory {
    pub const fn name(self) -> &'static str {
        match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        }
    }
}

/// Related information for a diagnostic (e.g., "see also" locations).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

/// A compiler diagnostic with optional related information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Related information spans (e.g., where a type was declared)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            file: file.into(),
            start,
            length,
            message_text: message.into(),
            category: DiagnosticCategory::Error,
            code,
            related_information: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_related(
        mut self,
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
    ) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            category: DiagnosticCategory::Message,
            code: 0,
            file: file.into(),
            start,
            length,
            message_text: message.into(),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} GJ{}: {}",
            self.file,
            self.start,
            self.category.name(),
            self.code,
            self.message_text
        )
    }
}

/// Substitute `{0}`, `{1}`, ... placeholders in a message template.
pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Stable codes for construction errors raised while indexing a program.
pub mod diagnostic_codes {
    pub const UNHANDLED_DECLARATION_KIND: u32 = 1001;
    pub const UNRESOLVED_RUNTIME_PACKAGE: u32 = 1002;
    pub const EXPECTED_INTERFACE_TYPE: u32 = 1003;
    pub const UNRESOLVED_DECLARATION_OBJECT: u32 = 1004;
    pub const INVALID_INDEX_OPTIONS: u32 = 1005;
}

/// Message templates matching [`diagnostic_codes`].
pub mod diagnostic_messages {
    pub const UNHANDLED_DECLARATION_KIND: &str = "Unhandled declaration kind '{0}'.";
    pub const UNRESOLVED_RUNTIME_PACKAGE: &str =
        "Unable to resolve runtime package '{0}': {1}.";
    pub const EXPECTED_INTERFACE_TYPE: &str =
        "Expected the type of interface declaration '{0}' to be an interface.";
    pub const UNRESOLVED_DECLARATION_OBJECT: &str = "Declaration '{0}' has no resolved object.";
    pub const INVALID_INDEX_OPTIONS: &str = "Invalid index options: {0}.";
    /// Related information, not a diagnostic of its own.
    pub const INTERFACE_DECLARED_HERE: &str = "Interface '{0}' is declared here.";
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
