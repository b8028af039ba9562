//! The Symbol Index.
//!
//! Built once per compile in a single pass over every package, file and
//! top-level declaration of the [`Program`]; immutable afterwards and safe to
//! share across threads for reads.
//!
//! Tables:
//! - declarations, addressed by [`DeclId`] and keyed by canonical id
//! - aliases: a type declaration's static type string -> canonical id
//! - imports: per package, alias -> import path
//! - interfaces: interface shapes keyed by declared id and static type id
//! - receivers: (receiver static type, method) pairs, regrouped into
//!   receiver type id -> methods once the pass is done
//! - runtime: functions of the runtime-support package by bare name

use crate::declaration::{DeclId, DeclKind, DeclNode, Declaration};
use crate::error::IndexError;
use crate::lookup::{default_import_name, dependency_id, pointer_id, trim_indirection};
use crate::options::{IndexOptions, validate_import_path};
use gojs_model::ast::{DeclToken, Expr, ExprKind, FuncDecl, GenDecl, Ident, Spec, TypeSpec};
use gojs_model::{Decl, File, Object, Program, TypeData, TypeId, TypeInfo};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{Level, debug, span, trace};

/// A method recorded with the static type of its receiver.
#[derive(Clone, Copy, Debug)]
struct Receiver {
    ty: TypeId,
    decl: DeclId,
}

#[derive(Debug)]
pub struct SymbolIndex<'p> {
    program: &'p Program,
    options: IndexOptions,
    declarations: Vec<Declaration<'p>>,
    by_id: FxHashMap<String, DeclId>,
    aliases: FxHashMap<String, String>,
    runtime: FxHashMap<&'p str, DeclId>,
    imports: FxHashMap<&'p str, IndexMap<String, String>>,
    interfaces: FxHashMap<String, TypeId>,
    /// Every receiver in declaration order.
    receivers: Vec<Receiver>,
    /// Method name -> positions in `receivers`.
    receivers_by_method: FxHashMap<&'p str, SmallVec<[usize; 2]>>,
    /// Receiver type string -> methods, in declaration order.
    methods: IndexMap<String, Vec<DeclId>>,
}

impl<'p> SymbolIndex<'p> {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Index every declaration of `program`.
    ///
    /// Fails on the first declaration the index cannot classify, on a
    /// runtime-support package that is malformed or missing from the
    /// program, and on an interface declaration whose static type is not an
    /// interface.
    pub fn build(program: &'p Program, options: IndexOptions) -> Result<Self, IndexError> {
        let _span = span!(
            Level::DEBUG,
            "index_program",
            packages = program.packages().len()
        )
        .entered();

        let runtime_path = resolve_runtime(program, options.runtime_package.as_deref())?;
        let mut index = Self {
            program,
            options,
            declarations: Vec::new(),
            by_id: FxHashMap::default(),
            aliases: FxHashMap::default(),
            runtime: FxHashMap::default(),
            imports: FxHashMap::default(),
            interfaces: FxHashMap::default(),
            receivers: Vec::new(),
            receivers_by_method: FxHashMap::default(),
            methods: IndexMap::new(),
        };

        for package in program.packages() {
            debug!(
                package = %package.path,
                files = package.files.len(),
                "indexing package"
            );
            let info = program.info(package);
            let is_runtime = runtime_path == Some(package.path.as_str());
            for file in &package.files {
                for decl in &file.decls {
                    match decl {
                        Decl::Func(func) => index.index_func(info, file, func, is_runtime)?,
                        Decl::Gen(gen_decl) => index.index_gen(info, file, gen_decl)?,
                        Decl::Bad(_) => {
                            return Err(IndexError::UnhandledDecl {
                                kind: decl.kind_name(),
                                file: file.name.clone(),
                                span: decl.span(),
                            });
                        }
                    }
                }
            }
        }

        index.group_methods();
        debug!(
            declarations = index.declarations.len(),
            interfaces = index.interfaces.len(),
            receivers = index.receivers.len(),
            runtime = index.runtime.len(),
            "symbol index built"
        );
        Ok(index)
    }

    fn index_func(
        &mut self,
        info: TypeInfo<'p>,
        file: &'p File,
        func: &'p FuncDecl,
        is_runtime: bool,
    ) -> Result<(), IndexError> {
        let (object, id) = resolve_object(info, file, &func.name)?;
        let name = func.name.name.as_str();
        let exported = if func.is_method() {
            false
        } else if name == self.options.entry_point {
            true
        } else {
            object.exported()
        };

        let decl = self.register(Declaration {
            decl_id: self.next_id(),
            id,
            name,
            exported,
            kind: if func.is_method() {
                DeclKind::Method
            } else {
                DeclKind::Function
            },
            node: DeclNode::Func(func),
            params: func.param_names().collect(),
            package: info.package(),
            file: &file.name,
            object,
        });

        if let Some(recv) = &func.recv {
            let ty = info
                .type_of(&recv.ty)
                .ok_or_else(|| IndexError::MissingObject {
                    name: format!("receiver of {name}"),
                    file: file.name.clone(),
                    span: recv.ty.span,
                })?;
            self.receivers_by_method
                .entry(name)
                .or_default()
                .push(self.receivers.len());
            self.receivers.push(Receiver { ty, decl });
        }
        // Methods included; on a name collision the last one indexed wins.
        if is_runtime {
            self.runtime.insert(name, decl);
        }
        Ok(())
    }

    fn index_gen(
        &mut self,
        info: TypeInfo<'p>,
        file: &'p File,
        gen_decl: &'p GenDecl,
    ) -> Result<(), IndexError> {
        for spec in &gen_decl.specs {
            match spec {
                Spec::Import(import) => {
                    let path = import.unquoted_path();
                    let alias = import
                        .name
                        .as_ref()
                        .map_or_else(|| default_import_name(path), |name| name.name.as_str());
                    self.imports
                        .entry(info.package().path.as_str())
                        .or_default()
                        .insert(alias.to_string(), path.to_string());
                }
                Spec::Value(value) => {
                    let kind = if gen_decl.tok == DeclToken::Const {
                        DeclKind::Const
                    } else {
                        DeclKind::Var
                    };
                    for name in &value.names {
                        let (object, id) = resolve_object(info, file, name)?;
                        self.register(Declaration {
                            decl_id: self.next_id(),
                            id,
                            name: &name.name,
                            exported: object.exported(),
                            kind,
                            node: DeclNode::Value {
                                decl: gen_decl,
                                spec: value,
                            },
                            params: Vec::new(),
                            package: info.package(),
                            file: &file.name,
                            object,
                        });
                    }
                }
                Spec::Type(spec) => self.index_type(info, file, gen_decl, spec)?,
            }
        }
        Ok(())
    }

    fn index_type(
        &mut self,
        info: TypeInfo<'p>,
        file: &'p File,
        gen_decl: &'p GenDecl,
        spec: &'p TypeSpec,
    ) -> Result<(), IndexError> {
        let (object, id) = resolve_object(info, file, &spec.name)?;
        let is_interface = matches!(spec.ty.kind, ExprKind::InterfaceType(_));
        let decl = self.register(Declaration {
            decl_id: self.next_id(),
            id,
            name: &spec.name.name,
            // Interfaces are never exported.
            exported: object.exported() && !is_interface,
            kind: if is_interface {
                DeclKind::Interface
            } else {
                DeclKind::TypeAlias
            },
            node: DeclNode::Type {
                decl: gen_decl,
                spec,
            },
            params: Vec::new(),
            package: info.package(),
            file: &file.name,
            object,
        });
        let id = self.declarations[decl.index()].id.clone();

        let static_id = info
            .type_of_ident(&spec.name)
            .or(object.ty)
            .map(|ty| self.program.type_string(ty));
        if let Some(static_id) = static_id.as_ref().filter(|s| **s != id) {
            self.aliases
                .entry(static_id.clone())
                .or_insert_with(|| id.clone());
        }

        if is_interface {
            let iface = info
                .type_of(&spec.ty)
                .filter(|ty| matches!(info.types().get(*ty), Some(TypeData::Interface(_))))
                .ok_or_else(|| IndexError::NotAnInterface {
                    name: spec.name.name.clone(),
                    file: file.name.clone(),
                    span: spec.ty.span,
                    name_span: spec.name.span,
                })?;
            if let Some(static_id) = static_id {
                self.interfaces.insert(static_id, iface);
            }
            self.interfaces.insert(id, iface);
        }
        Ok(())
    }

    fn next_id(&self) -> DeclId {
        DeclId(self.declarations.len() as u32)
    }

    /// Store `decl` under its canonical id. A repeated id (several `init`
    /// functions in one package) gets a `#2`, `#3`, ... suffix.
    fn register(&mut self, mut decl: Declaration<'p>) -> DeclId {
        if self.by_id.contains_key(&decl.id) {
            let base = std::mem::take(&mut decl.id);
            decl.id = (2..)
                .map(|n| format!("{base}#{n}"))
                .find(|candidate| !self.by_id.contains_key(candidate))
                .unwrap_or(base);
        }
        let decl_id = decl.decl_id;
        trace!(
            id = %decl.id,
            kind = %decl.kind,
            exported = decl.exported,
            file = decl.file,
            "declaration"
        );
        self.by_id.insert(decl.id.clone(), decl_id);
        self.declarations.push(decl);
        decl_id
    }

    fn group_methods(&mut self) {
        for recv in &self.receivers {
            self.methods
                .entry(self.program.type_string(recv.ty))
                .or_default()
                .push(recv.decl);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Declaration registered under `id` (a canonical id or a type
    /// declaration's static type id). Leading `*` markers are ignored.
    pub fn find_by_id(&self, id: &str) -> Option<&Declaration<'p>> {
        let id = trim_indirection(id);
        let decl = match self.by_id.get(id) {
            Some(decl) => *decl,
            None => {
                let canonical = self.aliases.get(id)?;
                *self.by_id.get(canonical)?
            }
        };
        self.get(decl)
    }

    /// Declaration of a model object. Only variables, functions, constants
    /// and type names have one.
    pub fn find_by_object(&self, object: &Object) -> Option<&Declaration<'p>> {
        let id = dependency_id(object, self.program.types())?;
        self.find_by_id(&id)
    }

    pub fn find_by_ident(&self, info: TypeInfo<'_>, ident: &Ident) -> Option<&Declaration<'p>> {
        self.find_by_object(info.object_of(ident)?)
    }

    /// Declaration an expression refers to: identifiers resolve directly,
    /// `*x` resolves `x` and `x.sel` resolves `sel`.
    pub fn find_by_node(&self, info: TypeInfo<'_>, expr: &Expr) -> Option<&Declaration<'p>> {
        match &expr.kind {
            ExprKind::Ident(ident) => self.find_by_ident(info, ident),
            ExprKind::Star(x) => self.find_by_node(info, x),
            ExprKind::Selector { sel, .. } => self.find_by_ident(info, sel),
            _ => None,
        }
    }

    /// Alias -> import path table of the package at `path`.
    pub fn imports(&self, path: &str) -> Option<&IndexMap<String, String>> {
        self.imports.get(path)
    }

    /// Runtime-support function named `name`.
    pub fn runtime(&self, name: &str) -> Option<&Declaration<'p>> {
        self.runtime.get(name).and_then(|decl| self.get(*decl))
    }

    /// Methods named `method` whose receiver type implements the interface
    /// registered under `id`.
    pub fn implemented_by(&self, id: &str, method: &str) -> Vec<&Declaration<'p>> {
        match self.interfaces.get(id) {
            Some(iface) => self.implemented_by_type(*iface, method),
            None => Vec::new(),
        }
    }

    /// Methods named `method` whose receiver type implements `iface`.
    pub fn implemented_by_type(&self, iface: TypeId, method: &str) -> Vec<&Declaration<'p>> {
        let Some(positions) = self.receivers_by_method.get(method) else {
            return Vec::new();
        };
        positions
            .iter()
            .map(|pos| self.receivers[*pos])
            .filter(|recv| self.program.implements(recv.ty, iface))
            .filter_map(|recv| self.get(recv.decl))
            .collect()
    }

    /// Methods declared on the receiver type `type_id`. Falls back to the
    /// pointer receiver `*type_id` when the bare id has none.
    pub fn methods(&self, type_id: &str) -> Vec<&Declaration<'p>> {
        self.method_ids(type_id)
            .iter()
            .filter_map(|decl| self.get(*decl))
            .collect()
    }

    pub fn method_ids(&self, type_id: &str) -> &[DeclId] {
        self.methods
            .get(type_id)
            .filter(|decls| !decls.is_empty())
            .or_else(|| self.methods.get(&pointer_id(type_id)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Interface type registered under a declared or static type id.
    pub fn interface(&self, id: &str) -> Option<TypeId> {
        self.interfaces.get(id).copied()
    }

    pub fn get(&self, decl: DeclId) -> Option<&Declaration<'p>> {
        self.declarations.get(decl.index())
    }

    /// All declarations in indexing order.
    pub fn declarations(&self) -> &[Declaration<'p>] {
        &self.declarations
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }
}

/// Object and canonical id a declared name resolves to.
fn resolve_object<'p>(
    info: TypeInfo<'p>,
    file: &File,
    ident: &Ident,
) -> Result<(&'p Object, String), IndexError> {
    info.object_of(ident)
        .and_then(|object| Some((object, object.canonical_id(info.types())?)))
        .ok_or_else(|| IndexError::MissingObject {
            name: ident.name.clone(),
            file: file.name.clone(),
            span: ident.span,
        })
}

/// Path of the configured runtime-support package as stored in `program`.
fn resolve_runtime<'p>(
    program: &'p Program,
    path: Option<&str>,
) -> Result<Option<&'p str>, IndexError> {
    let Some(path) = path else {
        return Ok(None);
    };
    validate_import_path(path).map_err(|reason| IndexError::UnresolvedRuntime {
        path: path.to_string(),
        reason,
    })?;
    match program.package(path) {
        Some(package) => Ok(Some(package.path.as_str())),
        None => Err(IndexError::UnresolvedRuntime {
            path: path.to_string(),
            reason: "package is not part of the program".to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "../tests/index_tests.rs"]
mod tests;
