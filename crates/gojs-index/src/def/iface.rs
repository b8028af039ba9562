//! Interface definitions.
//!
//! An interface is a contract, not code: it has no dependencies of its own
//! and is never emitted through itself. What it contributes is the
//! structural relation to the concrete methods that satisfy it.

use super::Definition;
use crate::declaration::{DeclId, DeclKind, Declaration};
use crate::error::IndexError;
use crate::index::SymbolIndex;
use gojs_model::ast::TypeSpec;
use gojs_model::{ExprKind, Object, Package, TypeData, TypeId};
use indexmap::IndexMap;
use std::sync::OnceLock;
use tracing::trace;

pub struct InterfaceDef<'a> {
    index: &'a SymbolIndex<'a>,
    decl: DeclId,
    id: String,
    path: &'a str,
    name: &'a str,
    node: &'a TypeSpec,
    /// Method names in declaration order.
    methods: Vec<&'a str>,
    /// The structural interface type of the declaration.
    shape: TypeId,
    local_imports: IndexMap<String, String>,
    processed: OnceLock<()>,
}

impl<'a> InterfaceDef<'a> {
    /// Wrap the interface declared by `spec` in `package`.
    ///
    /// Fails when the static type of the spec is not a structural interface,
    /// or when the declaration was never indexed.
    pub fn new(
        index: &'a SymbolIndex<'a>,
        package: &'a Package,
        object: &'a Object,
        spec: &'a TypeSpec,
    ) -> Result<Self, IndexError> {
        let path = package.path.as_str();
        let name = object.name.as_str();
        let id = format!("{path} {name}");
        let decl = index.find_by_id(&id).filter(|decl| decl.kind == DeclKind::Interface);
        let file = decl.map_or_else(String::new, |decl| decl.file.to_string());
        let not_an_interface = || IndexError::NotAnInterface {
            name: name.to_string(),
            file: file.clone(),
            span: spec.ty.span,
            name_span: spec.name.span,
        };

        let ExprKind::InterfaceType(fields) = &spec.ty.kind else {
            return Err(not_an_interface());
        };
        let methods = fields
            .iter()
            .flat_map(|field| field.names.iter().map(|ident| ident.name.as_str()))
            .collect();

        let program = index.program();
        let shape = program
            .info(package)
            .type_of(&spec.ty)
            .filter(|ty| matches!(program.types().get(*ty), Some(TypeData::Interface(_))))
            .ok_or_else(not_an_interface)?;

        let decl = decl.ok_or_else(|| IndexError::MissingObject {
            name: id.clone(),
            file: file.clone(),
            span: spec.span,
        })?;

        Ok(Self {
            index,
            decl: decl.decl_id,
            id,
            path,
            name,
            node: spec,
            methods,
            shape,
            local_imports: IndexMap::new(),
            processed: OnceLock::new(),
        })
    }

    /// Add an import alias local to this interface, for the emitter to
    /// register aliases it introduces when re-qualifying the method
    /// signatures. [`Definitions::build`](super::Definitions::build) adds
    /// none. Aliases from the declaring package take precedence in
    /// [`Definition::imports`].
    pub fn with_local_import(mut self, alias: impl Into<String>, path: impl Into<String>) -> Self {
        self.local_imports.insert(alias.into(), path.into());
        self
    }

    /// One-time processing step; later calls do nothing.
    pub fn process(&self) {
        self.processed.get_or_init(|| {
            for method in &self.methods {
                trace!(interface = %self.id, method, "interface method");
            }
        });
    }

    pub fn is_processed(&self) -> bool {
        self.processed.get().is_some()
    }

    /// Concrete methods named `method` whose receiver satisfies this
    /// interface.
    pub fn implemented_by(&self, method: &str) -> Vec<&'a Declaration<'a>> {
        self.index.implemented_by_type(self.shape, method)
    }

    /// Always empty: an interface method has no body to depend on.
    pub fn dependencies_of(&self, _method: &str) -> &[DeclId] {
        &[]
    }

    pub fn node(&self) -> &'a TypeSpec {
        self.node
    }

    pub fn methods(&self) -> &[&'a str] {
        &self.methods
    }
}

impl<'a> Definition<'a> for InterfaceDef<'a> {
    fn decl_id(&self) -> DeclId {
        self.decl
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    fn path(&self) -> &str {
        self.path
    }

    fn exported(&self) -> bool {
        false
    }

    fn dependencies(&self) -> &[DeclId] {
        self.process();
        &[]
    }

    fn imports(&self) -> IndexMap<String, String> {
        let mut imports = self.local_imports.clone();
        if let Some(package) = self.index.imports(self.path) {
            imports.extend(package.iter().map(|(alias, path)| (alias.clone(), path.clone())));
        }
        imports
    }

    fn kind(&self) -> DeclKind {
        DeclKind::Interface
    }

    fn ty(&self) -> Option<TypeId> {
        Some(self.shape)
    }
}

#[cfg(test)]
#[path = "../../tests/iface_tests.rs"]
mod tests;
