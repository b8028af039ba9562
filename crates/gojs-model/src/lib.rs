//! Whole-program model for the gojs compiler.
//!
//! The analysis phases never parse or type-check source themselves. They
//! consume this model: per package, the parsed top-level declarations, and
//! a static type resolver answering `TypeOf`, `ObjectOf` and the structural
//! `Implements` relation.
//!
//! - `ast` - declarations, specs, expressions and statements
//! - `types` - the program-wide `TypeTable`
//! - `objects` - what identifiers resolve to
//! - `program` - packages, files and the per-package `TypeInfo`
//! - `visit` - AST traversal
//! - `builder` - constructs a resolved `Program` without a front end

pub mod ast;
pub use ast::{Decl, Expr, ExprKind, FuncDecl, GenDecl, Ident, NodeId, Spec, Stmt, TypeSpec};

pub mod types;
pub use types::{InterfaceShape, TypeData, TypeId, TypeTable};

pub mod objects;
pub use objects::{Object, ObjectId, ObjectKind, ObjectScope, is_exported};

pub mod program;
pub use program::{File, Package, Program, TypeInfo};

pub mod visit;
pub use visit::Visitor;

pub mod builder;
pub use builder::{BodyBuilder, FnSig, PackageBuilder, ProgramBuilder, Recv};
