//! gojs analysis core.
//!
//! Builds a whole-program index of every top-level declaration, resolves
//! what each declaration references (including calls dispatched through
//! interfaces), and computes which declarations an entry package keeps
//! alive. The emitter only sees the reachable ones.
//!
//! ```ignore
//! let analysis = gojs::analyze(&program, IndexOptions::default(), "main")?;
//! for decl in analysis.emitted() {
//!     emit(decl);
//! }
//! ```

pub use gojs_common as common;
pub use gojs_index as index;
pub use gojs_model as model;

pub use gojs_common::{Diagnostic, DiagnosticCategory, Span};
pub use gojs_index::{
    AnyDef, DeclId, DeclKind, Declaration, Definition, Definitions, IndexError, IndexOptions,
    InterfaceDef, ReachableSet, SymbolIndex,
};
pub use gojs_model::{Program, ProgramBuilder};

pub mod tracing_config;

pub mod pipeline;
pub use pipeline::{Analysis, AnalysisReport, analyze, analyze_with_runtime};

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod pipeline_tests;

#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tracing_config_tests;
