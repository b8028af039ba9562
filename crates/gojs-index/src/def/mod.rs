//! Definitions.
//!
//! Every indexed declaration is wrapped in the variant for its kind. All
//! variants share the [`Definition`] contract; [`AnyDef`] dispatches it.
//!
//! [`Definitions::build`] constructs them in two explicit phases:
//! 1. construct every variant (interfaces are checked structurally here)
//! 2. resolve each variant's dependencies and run the one-time interface
//!    processing step

mod function;
mod iface;
mod type_def;
mod value;

pub use function::{FunctionDef, MethodDef};
pub use iface::InterfaceDef;
pub use type_def::TypeDef;
pub use value::ValueDef;

use crate::declaration::{DeclId, DeclKind, Declaration};
use crate::error::IndexError;
use crate::index::SymbolIndex;
use crate::resolver::{DependencyResolver, Dispatch, Resolved};
use gojs_model::TypeId;
use indexmap::IndexMap;
use tracing::{Level, debug, span};

/// Contract shared by every definition variant.
pub trait Definition<'a> {
    /// Position of the underlying declaration in the index.
    fn decl_id(&self) -> DeclId;

    fn id(&self) -> &str;

    fn name(&self) -> &str;

    /// Declaring package path.
    fn path(&self) -> &str;

    fn exported(&self) -> bool;

    /// Implemented outside the program; never emitted.
    fn omitted(&self) -> bool {
        false
    }

    /// Declarations this one refers to, in first-reference order.
    fn dependencies(&self) -> &[DeclId];

    /// Interface-typed call sites in this definition.
    fn dispatches(&self) -> &[Dispatch] {
        &[]
    }

    /// Alias -> import path table used to re-qualify references.
    fn imports(&self) -> IndexMap<String, String>;

    fn kind(&self) -> DeclKind;

    /// Static type.
    fn ty(&self) -> Option<TypeId>;

    /// Declared in the runtime-support package.
    fn from_runtime(&self) -> bool {
        false
    }
}

/// Implements [`Definition`] for a variant holding `decl`, `index` and
/// `resolved` fields.
macro_rules! declared_definition {
    ($def:ident) => {
        impl<'a> $crate::def::Definition<'a> for $def<'a> {
            fn decl_id(&self) -> $crate::declaration::DeclId {
                self.decl.decl_id
            }

            fn id(&self) -> &str {
                &self.decl.id
            }

            fn name(&self) -> &str {
                self.decl.name
            }

            fn path(&self) -> &str {
                self.decl.path()
            }

            fn exported(&self) -> bool {
                self.decl.exported
            }

            fn omitted(&self) -> bool {
                self.decl.omitted()
            }

            fn dependencies(&self) -> &[$crate::declaration::DeclId] {
                &self.resolved.dependencies
            }

            fn dispatches(&self) -> &[$crate::resolver::Dispatch] {
                &self.resolved.dispatches
            }

            fn imports(&self) -> indexmap::IndexMap<String, String> {
                self.index
                    .imports(self.decl.path())
                    .cloned()
                    .unwrap_or_default()
            }

            fn kind(&self) -> $crate::declaration::DeclKind {
                self.decl.kind
            }

            fn ty(&self) -> Option<gojs_model::TypeId> {
                self.decl.ty()
            }

            fn from_runtime(&self) -> bool {
                self.index.options().runtime_package.as_deref() == Some(self.decl.path())
            }
        }
    };
}
pub(crate) use declared_definition;

// =============================================================================
// AnyDef
// =============================================================================

pub enum AnyDef<'a> {
    Function(FunctionDef<'a>),
    Method(MethodDef<'a>),
    Type(TypeDef<'a>),
    Value(ValueDef<'a>),
    Interface(InterfaceDef<'a>),
}

impl<'a> AnyDef<'a> {
    fn new(index: &'a SymbolIndex<'a>, decl: &'a Declaration<'a>) -> Result<Self, IndexError> {
        Ok(match decl.kind {
            DeclKind::Function => AnyDef::Function(FunctionDef::new(index, decl)),
            DeclKind::Method => AnyDef::Method(MethodDef::new(index, decl)),
            DeclKind::TypeAlias => AnyDef::Type(TypeDef::new(index, decl)),
            DeclKind::Var | DeclKind::Const => AnyDef::Value(ValueDef::new(index, decl)),
            DeclKind::Interface => {
                let spec = decl
                    .node
                    .as_type_spec()
                    .ok_or_else(|| IndexError::NotAnInterface {
                        name: decl.name.to_string(),
                        file: decl.file.to_string(),
                        span: decl.node.span(),
                        name_span: decl.node.span(),
                    })?;
                AnyDef::Interface(InterfaceDef::new(index, decl.package, decl.object, spec)?)
            }
        })
    }

    pub fn as_definition(&self) -> &dyn Definition<'a> {
        match self {
            AnyDef::Function(def) => def,
            AnyDef::Method(def) => def,
            AnyDef::Type(def) => def,
            AnyDef::Value(def) => def,
            AnyDef::Interface(def) => def,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceDef<'a>> {
        match self {
            AnyDef::Interface(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodDef<'a>> {
        match self {
            AnyDef::Method(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&TypeDef<'a>> {
        match self {
            AnyDef::Type(def) => Some(def),
            _ => None,
        }
    }

    fn resolved_mut(&mut self) -> Option<&mut Resolved> {
        match self {
            AnyDef::Function(def) => Some(&mut def.resolved),
            AnyDef::Method(def) => Some(&mut def.resolved),
            AnyDef::Type(def) => Some(&mut def.resolved),
            AnyDef::Value(def) => Some(&mut def.resolved),
            AnyDef::Interface(_) => None,
        }
    }
}

impl<'a> Definition<'a> for AnyDef<'a> {
    fn decl_id(&self) -> DeclId {
        self.as_definition().decl_id()
    }

    fn id(&self) -> &str {
        self.as_definition().id()
    }

    fn name(&self) -> &str {
        self.as_definition().name()
    }

    fn path(&self) -> &str {
        self.as_definition().path()
    }

    fn exported(&self) -> bool {
        self.as_definition().exported()
    }

    fn omitted(&self) -> bool {
        self.as_definition().omitted()
    }

    fn dependencies(&self) -> &[DeclId] {
        self.as_definition().dependencies()
    }

    fn dispatches(&self) -> &[Dispatch] {
        self.as_definition().dispatches()
    }

    fn imports(&self) -> IndexMap<String, String> {
        self.as_definition().imports()
    }

    fn kind(&self) -> DeclKind {
        self.as_definition().kind()
    }

    fn ty(&self) -> Option<TypeId> {
        self.as_definition().ty()
    }

    fn from_runtime(&self) -> bool {
        self.as_definition().from_runtime()
    }
}

// =============================================================================
// Definitions
// =============================================================================

/// One definition per indexed declaration, addressed by the same [`DeclId`].
pub struct Definitions<'a> {
    index: &'a SymbolIndex<'a>,
    defs: Vec<AnyDef<'a>>,
}

impl<'a> Definitions<'a> {
    pub fn build(index: &'a SymbolIndex<'a>) -> Result<Self, IndexError> {
        let _span = span!(Level::DEBUG, "build_definitions", declarations = index.len()).entered();

        // Phase 1: construct every variant.
        let mut defs = index
            .declarations()
            .iter()
            .map(|decl| AnyDef::new(index, decl))
            .collect::<Result<Vec<_>, _>>()?;

        // Phase 2: resolve dependencies, process interfaces.
        let mut edges = 0;
        for (decl, def) in index.declarations().iter().zip(&mut defs) {
            if let AnyDef::Interface(iface) = def {
                iface.process();
                continue;
            }
            if let Some(resolved) = def.resolved_mut() {
                *resolved = DependencyResolver::resolve(index, decl);
                edges += resolved.dependencies.len();
            }
        }

        debug!(definitions = defs.len(), edges, "definitions built");
        Ok(Self { index, defs })
    }

    pub fn get(&self, decl: DeclId) -> Option<&AnyDef<'a>> {
        self.defs.get(decl.index())
    }

    /// Definition registered under `id`; see [`SymbolIndex::find_by_id`].
    pub fn find(&self, id: &str) -> Option<&AnyDef<'a>> {
        let decl = self.index.find_by_id(id)?;
        self.get(decl.decl_id)
    }

    pub fn interface(&self, id: &str) -> Option<&InterfaceDef<'a>> {
        self.find(id).and_then(AnyDef::as_interface)
    }

    /// Method definitions implementing `method` of `iface`.
    pub fn implemented_by(&self, iface: &InterfaceDef<'a>, method: &str) -> Vec<&MethodDef<'a>> {
        iface
            .implemented_by(method)
            .into_iter()
            .filter_map(|decl| self.get(decl.decl_id).and_then(AnyDef::as_method))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnyDef<'a>> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn index(&self) -> &'a SymbolIndex<'a> {
        self.index
    }
}

#[cfg(test)]
#[path = "../../tests/def_tests.rs"]
mod tests;
