use super::declared_definition;
use crate::declaration::Declaration;
use crate::index::SymbolIndex;
use crate::resolver::Resolved;
use gojs_model::ast::TypeSpec;

/// A non-interface type declaration: `type T U` or `type T = U`.
pub struct TypeDef<'a> {
    pub(super) decl: &'a Declaration<'a>,
    pub(super) index: &'a SymbolIndex<'a>,
    pub(super) resolved: Resolved,
}

impl<'a> TypeDef<'a> {
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

    pub fn node(&self) -> Option<&'a TypeSpec> {
        self.decl.node.as_type_spec()
    }

    /// `type T = U` rather than a new named type.
    pub fn is_alias(&self) -> bool {
        self.node().is_some_and(|spec| spec.assign)
    }

    /// Canonical string of the declared static type.
    pub fn type_id(&self) -> Option<String> {
        self.decl.ty().map(|ty| self.index.program().type_string(ty))
    }

    /// Methods declared on this type (through `T` or, failing that, `*T`).
    pub fn methods(&self) -> Vec<&'a Declaration<'a>> {
        match self.type_id() {
            Some(id) => self.index.methods(&id),
            None => Vec::new(),
        }
    }
}

declared_definition!(TypeDef);
