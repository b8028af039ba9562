use super::declared_definition;
use crate::declaration::{DeclKind, DeclNode, Declaration};
use crate::index::SymbolIndex;
use crate::resolver::Resolved;
use gojs_model::ast::ValueSpec;

/// A package-level `var` or `const`.
pub struct ValueDef<'a> {
    pub(super) decl: &'a Declaration<'a>,
    pub(super) index: &'a SymbolIndex<'a>,
    pub(super) resolved: Resolved,
}

impl<'a> ValueDef<'a> {
    pub(super) fn new(index: &'a SymbolIndex<'a>, decl: &'a Declaration<'a>) -> Self {
        Self {
            decl,
            index,
            resolved: Resolved::default(),
        }
    }

    pub fn declaration(&self) -> &'a Declaration<'a> {
        self.decl
    }

    /// The spec declaring this name; shared by every name of the spec.
    pub fn node(&self) -> Option<&'a ValueSpec> {
        match self.decl.node {
            DeclNode::Value { spec, .. } => Some(spec),
            _ => None,
        }
    }

    pub fn is_const(&self) -> bool {
        self.decl.kind == DeclKind::Const
    }
}

declared_definition!(ValueDef);
