//! Indexed declarations.

use gojs_model::ast::{FuncDecl, GenDecl, TypeSpec, ValueSpec};
use gojs_model::{Object, Package, TypeId};
use gojs_common::Span;
use std::fmt;

/// Index of a declaration in the [`SymbolIndex`](crate::SymbolIndex).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

impl DeclId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind tag of a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Function,
    Method,
    /// A non-interface type declaration (`type T U` or `type T = U`).
    TypeAlias,
    Interface,
    Var,
    Const,
}

impl DeclKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            DeclKind::Function => "FUNCTION",
            DeclKind::Method => "METHOD",
            DeclKind::TypeAlias => "TYPE",
            DeclKind::Interface => "INTERFACE",
            DeclKind::Var => "VAR",
            DeclKind::Const => "CONST",
        }
    }

    pub const fn is_type(self) -> bool {
        matches!(self, DeclKind::TypeAlias | DeclKind::Interface)
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The AST subtree a declaration was indexed from. Owned by the program.
#[derive(Clone, Copy, Debug)]
pub enum DeclNode<'p> {
    Func(&'p FuncDecl),
    Value {
        decl: &'p GenDecl,
        spec: &'p ValueSpec,
    },
    Type {
        decl: &'p GenDecl,
        spec: &'p TypeSpec,
    },
}

impl<'p> DeclNode<'p> {
    pub fn span(&self) -> Span {
        match self {
            DeclNode::Func(func) => func.span,
            DeclNode::Value { spec, .. } => spec.span,
            DeclNode::Type { spec, .. } => spec.span,
        }
    }

    pub fn as_func(&self) -> Option<&'p FuncDecl> {
        match self {
            DeclNode::Func(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_type_spec(&self) -> Option<&'p TypeSpec> {
        match self {
            DeclNode::Type { spec, .. } => Some(spec),
            _ => None,
        }
    }
}

/// One top-level declaration, registered once under its canonical id.
#[derive(Clone, Debug)]
pub struct Declaration<'p> {
    pub decl_id: DeclId,
    pub id: String,
    pub name: &'p str,
    pub exported: bool,
    pub kind: DeclKind,
    pub node: DeclNode<'p>,
    /// Parameter names; functions and methods only.
    pub params: Vec<&'p str>,
    pub package: &'p Package,
    /// Name of the declaring file.
    pub file: &'p str,
    pub object: &'p Object,
}

impl<'p> Declaration<'p> {
    /// Declaring package path.
    pub fn path(&self) -> &'p str {
        &self.package.path
    }

    pub fn ty(&self) -> Option<TypeId> {
        self.object.ty
    }

    /// Functions without a body are implemented outside the program and are
    /// never emitted.
    pub fn omitted(&self) -> bool {
        self.node.as_func().is_some_and(|func| func.body.is_none())
    }
}
