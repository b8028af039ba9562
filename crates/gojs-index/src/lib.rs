//! Symbol resolution and dependency analysis for the gojs compiler.
//!
//! The analysis runs after parsing and type checking, over the whole
//! program at once:
//!
//! 1. [`SymbolIndex::build`] indexes every top-level declaration of every
//!    package, together with imports, interface shapes and method receivers.
//! 2. [`Definitions::build`] wraps each declaration in its definition variant
//!    and resolves what each one depends on.
//! 3. [`reachable`] computes the declarations reachable from a set of roots;
//!    only those are handed to the emitter.
//!
//! The index never changes once built and is shared by reference.

pub mod error;
pub use error::IndexError;

pub mod options;
pub use options::IndexOptions;

pub mod declaration;
pub use declaration::{DeclId, DeclKind, DeclNode, Declaration};

pub mod lookup;

pub mod index;
pub use index::SymbolIndex;

pub mod def;
pub use def::{AnyDef, Definition, Definitions, FunctionDef, InterfaceDef, MethodDef, TypeDef, ValueDef};

pub mod resolver;
pub use resolver::{DependencyResolver, Dispatch, Resolved};

pub mod reachability;
pub use reachability::{ReachableSet, package_roots, reachable, runtime_roots};

#[cfg(test)]
#[path = "../tests/test_fixtures.rs"]
pub(crate) mod test_fixtures;

#[cfg(test)]
#[path = "../tests/concurrent_tests.rs"]
mod concurrent_tests;
