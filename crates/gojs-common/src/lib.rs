//! Common types and utilities for the gojs compiler.
//!
//! This crate provides foundational types used across all gojs crates:
//! - Source spans (`Span`)
//! - Compiler diagnostics (`Diagnostic`, `DiagnosticCategory`) and their codes

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Diagnostics reported by the analysis phases
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};
