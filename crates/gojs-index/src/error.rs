//! Construction errors.
//!
//! Every variant aborts the compile: there is no partial or degraded index.
//! Lookup misses are not errors and are reported as `None` or empty lists.

use gojs_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use gojs_common::{Diagnostic, Span};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("{file}:{}: unhandled declaration kind {kind}", .span.start)]
    UnhandledDecl {
        kind: &'static str,
        file: String,
        span: Span,
    },

    #[error("unable to resolve runtime package {path:?}: {reason}")]
    UnresolvedRuntime { path: String, reason: String },

    /// `span` covers the offending type expression, `name_span` the
    /// declared name.
    #[error("{file}:{}: expected the type of interface {name} to be an interface", .span.start)]
    NotAnInterface {
        name: String,
        file: String,
        span: Span,
        name_span: Span,
    },

    #[error("{file}:{}: declaration {name} has no resolved object", .span.start)]
    MissingObject {
        name: String,
        file: String,
        span: Span,
    },

    #[error("invalid index options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

impl IndexError {
    pub const fn code(&self) -> u32 {
        match self {
            IndexError::UnhandledDecl { .. } => diagnostic_codes::UNHANDLED_DECLARATION_KIND,
            IndexError::UnresolvedRuntime { .. } => diagnostic_codes::UNRESOLVED_RUNTIME_PACKAGE,
            IndexError::NotAnInterface { .. } => diagnostic_codes::EXPECTED_INTERFACE_TYPE,
            IndexError::MissingObject { .. } => diagnostic_codes::UNRESOLVED_DECLARATION_OBJECT,
            IndexError::InvalidOptions(_) => diagnostic_codes::INVALID_INDEX_OPTIONS,
        }
    }

    /// Render as a compiler diagnostic anchored at the offending declaration.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = self.code();
        match self {
            IndexError::UnhandledDecl { kind, file, span } => Diagnostic::error(
                file.as_str(),
                span.start,
                span.len(),
                format_message(diagnostic_messages::UNHANDLED_DECLARATION_KIND, &[*kind]),
                code,
            ),
            IndexError::UnresolvedRuntime { path, reason } => Diagnostic::error(
                "",
                0,
                0,
                format_message(
                    diagnostic_messages::UNRESOLVED_RUNTIME_PACKAGE,
                    &[path.as_str(), reason.as_str()],
                ),
                code,
            ),
            IndexError::NotAnInterface {
                name,
                file,
                span,
                name_span,
            } => Diagnostic::error(
                file.as_str(),
                span.start,
                span.len(),
                format_message(diagnostic_messages::EXPECTED_INTERFACE_TYPE, &[name.as_str()]),
                code,
            )
            .with_related(
                file.as_str(),
                name_span.start,
                name_span.len(),
                format_message(diagnostic_messages::INTERFACE_DECLARED_HERE, &[name.as_str()]),
            ),
            IndexError::MissingObject { name, file, span } => Diagnostic::error(
                file.as_str(),
                span.start,
                span.len(),
                format_message(diagnostic_messages::UNRESOLVED_DECLARATION_OBJECT, &[name.as_str()]),
                code,
            ),
            IndexError::InvalidOptions(err) => Diagnostic::error(
                "",
                0,
                0,
                format_message(
                    diagnostic_messages::INVALID_INDEX_OPTIONS,
                    &[&err.to_string()],
                ),
                code,
            ),
        }
    }
}
