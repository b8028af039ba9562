use super::declared_definition;
use crate::declaration::Declaration;
use crate::index::SymbolIndex;
use crate::resolver::Resolved;
use gojs_model::TypeId;
use gojs_model::ast::FuncDecl;

/// A package-level function.
pub struct FunctionDef<'a> {
    pub(super) decl: &'a Declaration<'a>,
    pub(super) index: &'a SymbolIndex<'a>,
    pub(super) resolved: Resolved,
}

impl<'a> FunctionDef<'a> {
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

    pub fn node(&self) -> Option<&'a FuncDecl> {
        self.decl.node.as_func()
    }

    pub fn params(&self) -> &[&'a str] {
        &self.decl.params
    }

    /// Whether this is the configured program entry point.
    pub fn is_entry_point(&self) -> bool {
        self.decl.name == self.index.options().entry_point
    }
}

declared_definition!(FunctionDef);

/// A function with a receiver.
pub struct MethodDef<'a> {
    pub(super) decl: &'a Declaration<'a>,
    pub(super) index: &'a SymbolIndex<'a>,
    pub(super) resolved: Resolved,
    recv: Option<TypeId>,
}

impl<'a> MethodDef<'a> {
    pub(super) fn new(index: &'a SymbolIndex<'a>, decl: &'a Declaration<'a>) -> Self {
        let info = index.program().info(decl.package);
        let recv = decl
            .node
            .as_func()
            .and_then(|func| func.recv.as_ref())
            .and_then(|recv| info.type_of(&recv.ty));
        Self {
            decl,
            index,
            resolved: Resolved::default(),
            recv,
        }
    }

    pub fn declaration(&self) -> &'a Declaration<'a> {
        self.decl
    }

    pub fn node(&self) -> Option<&'a FuncDecl> {
        self.decl.node.as_func()
    }

    pub fn params(&self) -> &[&'a str] {
        &self.decl.params
    }

    /// Static receiver type, as declared (`T` or `*T`).
    pub fn recv(&self) -> Option<TypeId> {
        self.recv
    }

    /// Canonical string of the receiver type.
    pub fn recv_id(&self) -> Option<String> {
        self.recv.map(|ty| self.index.program().type_string(ty))
    }

    pub fn has_pointer_recv(&self) -> bool {
        self.recv
            .is_some_and(|ty| self.index.program().types().deref(ty) != ty)
    }
}

declared_definition!(MethodDef);
