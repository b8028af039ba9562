//! Programmatic construction of a resolved [`Program`].
//!
//! `ProgramBuilder` produces the same artifacts a parser plus type checker
//! would: declarations with node ids, the static type of every type
//! expression, and the object every identifier resolves to. References by
//! name are resolved when the program is finished, so declarations may be
//! added in any order.
//!
//! ```ignore
//! let mut b = ProgramBuilder::new();
//! let float64 = b.basic("float64");
//! let area = b.signature(&[], &[float64]);
//! b.package("a").interface("Shape", &[("Area", area)]);
//! let program = b.finish();
//! ```

use crate::ast::{
    BadDecl, Block, Decl, DeclToken, Expr, ExprKind, Field, FuncDecl, FuncType, GenDecl, Ident,
    ImportSpec, LitKind, NodeId, Spec, Stmt, TypeSpec, ValueSpec,
};
use crate::objects::{Object, ObjectId, ObjectKind, ObjectScope};
use crate::program::{File, Package, PackageInfo, Program};
use crate::types::{InterfaceShape, MethodSig, NamedType, Signature, StructField, TypeData, TypeId};
use gojs_common::Span;
use rustc_hash::FxHashMap;
use smallvec::smallvec;

const BASIC_TYPES: &[&str] = &[
    "bool", "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32",
    "uint64", "uintptr", "float32", "float64", "string", "byte", "rune",
];

const BUILTIN_FUNCS: &[&str] = &[
    "append", "cap", "close", "copy", "delete", "len", "make", "new", "panic", "print", "println",
    "recover",
];

/// Function signature with named parameters.
#[derive(Clone, Debug, Default)]
pub struct FnSig {
    pub params: Vec<(String, TypeId)>,
    pub results: Vec<TypeId>,
}

impl FnSig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: &str, ty: TypeId) -> Self {
        self.params.push((name.to_string(), ty));
        self
    }

    pub fn result(mut self, ty: TypeId) -> Self {
        self.results.push(ty);
        self
    }
}

/// Receiver of a method declaration.
#[derive(Clone, Debug)]
pub struct Recv {
    pub name: String,
    /// The named receiver base type.
    pub ty: TypeId,
    pub pointer: bool,
}

impl Recv {
    pub fn value(name: &str, ty: TypeId) -> Self {
        Self {
            name: name.to_string(),
            ty,
            pointer: false,
        }
    }

    pub fn pointer(name: &str, ty: TypeId) -> Self {
        Self {
            name: name.to_string(),
            ty,
            pointer: true,
        }
    }
}

#[derive(Debug)]
enum UseTarget {
    Name(String),
    Qualified { path: String, name: String },
    Method { recv: TypeId, name: String },
}

#[derive(Debug)]
struct PendingUse {
    pkg: usize,
    node: NodeId,
    target: UseTarget,
}

// =============================================================================
// ProgramBuilder
// =============================================================================

pub struct ProgramBuilder {
    program: Program,
    next_node: u32,
    next_pos: u32,
    basics: FxHashMap<String, TypeId>,
    universe: FxHashMap<String, ObjectId>,
    /// Package-scope objects keyed by (package index, name).
    scopes: FxHashMap<(usize, String), ObjectId>,
    /// Import names keyed by (package index, file index, alias).
    imports: FxHashMap<(usize, usize, String), (String, ObjectId)>,
    type_objects: FxHashMap<TypeId, ObjectId>,
    methods: FxHashMap<(TypeId, String), ObjectId>,
    interface_methods: FxHashMap<(TypeId, String), ObjectId>,
    pending: Vec<PendingUse>,
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            program: Program::default(),
            next_node: 0,
            next_pos: 0,
            basics: FxHashMap::default(),
            universe: FxHashMap::default(),
            scopes: FxHashMap::default(),
            imports: FxHashMap::default(),
            type_objects: FxHashMap::default(),
            methods: FxHashMap::default(),
            interface_methods: FxHashMap::default(),
            pending: Vec::new(),
        };
        builder.declare_universe();
        builder
    }

    fn declare_universe(&mut self) {
        for name in BASIC_TYPES {
            self.basic(name);
        }
        for name in BUILTIN_FUNCS {
            let id = self.alloc_object(ObjectKind::Builtin, name, None, None, ObjectScope::Universe);
            self.universe.insert((*name).to_string(), id);
        }
        let bool_ty = self.basic("bool");
        for name in ["true", "false"] {
            let id = self.alloc_object(
                ObjectKind::Const,
                name,
                None,
                Some(bool_ty),
                ObjectScope::Universe,
            );
            self.universe.insert(name.to_string(), id);
        }
        let nil = self.alloc_object(ObjectKind::Nil, "nil", None, None, ObjectScope::Universe);
        self.universe.insert("nil".to_string(), nil);

        // type error interface { Error() string }
        let string = self.basic("string");
        let error_sig = self.signature(&[], &[string]);
        let shape = self.interface_type(&[("Error", error_sig)]);
        let error = self.program.types.alloc(TypeData::Named(NamedType {
            pkg: String::new(),
            name: "error".to_string(),
            underlying: shape,
            methods: Vec::new(),
        }));
        let obj = self.alloc_object(
            ObjectKind::TypeName,
            "error",
            None,
            Some(error),
            ObjectScope::Universe,
        );
        self.universe.insert("error".to_string(), obj);
        self.type_objects.insert(error, obj);
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Predeclared basic type `name`.
    pub fn basic(&mut self, name: &str) -> TypeId {
        if let Some(&id) = self.basics.get(name) {
            return id;
        }
        let id = self.program.types.alloc(TypeData::Basic(name.to_string()));
        self.basics.insert(name.to_string(), id);
        let obj = self.alloc_object(
            ObjectKind::TypeName,
            name,
            None,
            Some(id),
            ObjectScope::Universe,
        );
        self.universe.insert(name.to_string(), obj);
        self.type_objects.insert(id, obj);
        id
    }

    /// The predeclared `error` interface.
    pub fn error_type(&self) -> TypeId {
        self.universe
            .get("error")
            .and_then(|obj| self.program.object(*obj))
            .and_then(|obj| obj.ty)
            .unwrap_or(TypeId(0))
    }

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.program.types.alloc(TypeData::Pointer(elem))
    }

    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        self.program.types.alloc(TypeData::Slice(elem))
    }

    pub fn map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.program.types.alloc(TypeData::Map(key, value))
    }

    pub fn signature(&mut self, params: &[TypeId], results: &[TypeId]) -> TypeId {
        self.program.types.alloc(TypeData::Signature(Signature {
            params: params.to_vec(),
            results: results.to_vec(),
            variadic: false,
        }))
    }

    /// Unnamed interface type.
    pub fn interface_type(&mut self, methods: &[(&str, TypeId)]) -> TypeId {
        let shape = InterfaceShape {
            methods: methods
                .iter()
                .map(|(name, sig)| ((*name).to_string(), *sig))
                .collect(),
        };
        self.program.types.alloc(TypeData::Interface(shape))
    }

    /// Unnamed struct type.
    pub fn struct_type(&mut self, fields: &[(&str, TypeId)]) -> TypeId {
        let fields = fields
            .iter()
            .map(|(name, ty)| StructField {
                name: (*name).to_string(),
                ty: *ty,
                embedded: false,
            })
            .collect();
        self.program.types.alloc(TypeData::Struct(fields))
    }

    /// Override the static type recorded for the type expression of the
    /// type spec `name` in package `path`. Simulates a checker that
    /// disagrees with the syntax.
    pub fn override_spec_type(&mut self, path: &str, name: &str, ty: TypeId) -> bool {
        let Some(pkg) = self.program.packages.iter_mut().find(|p| p.path == path) else {
            return false;
        };
        let node = pkg
            .files
            .iter()
            .flat_map(|file| &file.decls)
            .filter_map(|decl| match decl {
                Decl::Gen(gen_decl) => Some(gen_decl),
                _ => None,
            })
            .flat_map(|gen_decl| &gen_decl.specs)
            .find_map(|spec| match spec {
                Spec::Type(ts) if ts.name.name == name => Some(ts.ty.id),
                _ => None,
            });
        match node {
            Some(node) => {
                pkg.info.types.insert(node, ty);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Packages
    // =========================================================================

    /// Open package `path`, creating it on first use.
    pub fn package(&mut self, path: &str) -> PackageBuilder<'_> {
        let pkg = match self.program.packages.iter().position(|p| p.path == path) {
            Some(pkg) => pkg,
            None => {
                let name = path.rsplit('/').next().unwrap_or(path).to_string();
                self.program.packages.push(Package {
                    path: path.to_string(),
                    files: vec![File {
                        name: format!("{name}.go"),
                        decls: Vec::new(),
                    }],
                    name,
                    info: PackageInfo::default(),
                });
                self.program.packages.len() - 1
            }
        };
        PackageBuilder {
            b: self,
            pkg,
            file: 0,
        }
    }

    /// Resolve every by-name reference and return the finished program.
    pub fn finish(mut self) -> Program {
        let pending = std::mem::take(&mut self.pending);
        for PendingUse { pkg, node, target } in pending {
            let resolved = match target {
                UseTarget::Name(name) => self
                    .scopes
                    .get(&(pkg, name.clone()))
                    .or_else(|| self.universe.get(&name))
                    .copied(),
                UseTarget::Qualified { path, name } => self
                    .program
                    .packages
                    .iter()
                    .position(|p| p.path == path)
                    .and_then(|target| self.scopes.get(&(target, name)).copied()),
                UseTarget::Method { recv, name } => self.resolve_method(pkg, recv, &name),
            };
            if let Some(obj) = resolved {
                self.program.packages[pkg].info.objects.insert(node, obj);
            }
        }
        self.program
    }

    fn resolve_method(&mut self, pkg: usize, recv: TypeId, name: &str) -> Option<ObjectId> {
        let base = self.program.types.deref(recv);
        if self.program.types.is_interface(base) {
            let pkg_path = self
                .program
                .types
                .named(base)
                .map(|named| named.pkg.clone())
                .unwrap_or_else(|| self.program.packages[pkg].path.clone());
            return Some(self.interface_method(base, name, &pkg_path));
        }
        self.methods.get(&(base, name.to_string())).copied()
    }

    fn interface_method(&mut self, iface: TypeId, name: &str, pkg: &str) -> ObjectId {
        if let Some(&id) = self.interface_methods.get(&(iface, name.to_string())) {
            return id;
        }
        let sig = self
            .program
            .types
            .interface(iface)
            .and_then(|shape| shape.methods.get(name).copied());
        let id = self.alloc_object(
            ObjectKind::Func,
            name,
            Some(pkg),
            sig,
            ObjectScope::InterfaceMethod { iface },
        );
        self.interface_methods.insert((iface, name.to_string()), id);
        id
    }

    // =========================================================================
    // Nodes and objects
    // =========================================================================

    fn node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    fn span(&mut self, len: usize) -> Span {
        let start = self.next_pos;
        self.next_pos += len as u32 + 1;
        Span::new(start, start + len as u32)
    }

    fn alloc_object(
        &mut self,
        kind: ObjectKind,
        name: &str,
        pkg: Option<&str>,
        ty: Option<TypeId>,
        scope: ObjectScope,
    ) -> ObjectId {
        let id = ObjectId(self.program.objects.len() as u32);
        self.program.objects.push(Object {
            kind,
            name: name.to_string(),
            pkg: pkg.map(str::to_string),
            ty,
            scope,
        });
        id
    }

    fn ident(&mut self, name: &str) -> Ident {
        let span = self.span(name.len());
        Ident {
            id: self.node(),
            name: name.to_string(),
            span,
        }
    }

    fn record_object(&mut self, pkg: usize, node: NodeId, obj: ObjectId) {
        self.program.packages[pkg].info.objects.insert(node, obj);
    }

    fn record_type(&mut self, pkg: usize, node: NodeId, ty: TypeId) {
        self.program.packages[pkg].info.types.insert(node, ty);
    }

    fn expr(&mut self, kind: ExprKind, span: Span) -> Expr {
        Expr {
            id: self.node(),
            kind,
            span,
        }
    }

    fn ident_expr(ident: Ident) -> Expr {
        Expr {
            id: ident.id,
            span: ident.span,
            kind: ExprKind::Ident(ident),
        }
    }

    /// Build the type expression spelling `ty` inside file `file` of `pkg`.
    fn type_expr(&mut self, pkg: usize, file: usize, ty: TypeId) -> Expr {
        let data = self
            .program
            .types
            .get(ty)
            .cloned()
            .unwrap_or(TypeData::Basic("invalid".to_string()));
        let expr = match data {
            TypeData::Basic(name) => {
                let ident = self.ident(&name);
                if let Some(&obj) = self.type_objects.get(&ty) {
                    self.record_object(pkg, ident.id, obj);
                }
                Self::ident_expr(ident)
            }
            TypeData::Named(named) => {
                let obj = self.type_objects.get(&ty).copied();
                let sel = self.ident(&named.name);
                if let Some(obj) = obj {
                    self.record_object(pkg, sel.id, obj);
                }
                if named.pkg.is_empty() || named.pkg == self.program.packages[pkg].path {
                    Self::ident_expr(sel)
                } else {
                    let alias = self.import_alias_for(pkg, file, &named.pkg);
                    let x = self.ident(&alias.0);
                    if let Some(pkg_obj) = alias.1 {
                        self.record_object(pkg, x.id, pkg_obj);
                    }
                    let span = x.span.cover(sel.span);
                    let x = Self::ident_expr(x);
                    self.expr(
                        ExprKind::Selector {
                            x: Box::new(x),
                            sel,
                        },
                        span,
                    )
                }
            }
            TypeData::Pointer(elem) => {
                let inner = self.type_expr(pkg, file, elem);
                let span = inner.span;
                self.expr(ExprKind::Star(Box::new(inner)), span)
            }
            TypeData::Slice(elem) => {
                let elem = self.type_expr(pkg, file, elem);
                let span = elem.span;
                self.expr(
                    ExprKind::ArrayType {
                        len: None,
                        elem: Box::new(elem),
                    },
                    span,
                )
            }
            TypeData::Array(len, elem) => {
                let span = self.span(len.to_string().len());
                let len = self.expr(
                    ExprKind::BasicLit {
                        kind: LitKind::Int,
                        value: len.to_string(),
                    },
                    span,
                );
                let elem = self.type_expr(pkg, file, elem);
                let span = len.span.cover(elem.span);
                self.expr(
                    ExprKind::ArrayType {
                        len: Some(Box::new(len)),
                        elem: Box::new(elem),
                    },
                    span,
                )
            }
            TypeData::Map(key, value) => {
                let key = self.type_expr(pkg, file, key);
                let value = self.type_expr(pkg, file, value);
                let span = key.span.cover(value.span);
                self.expr(
                    ExprKind::MapType {
                        key: Box::new(key),
                        value: Box::new(value),
                    },
                    span,
                )
            }
            TypeData::Struct(fields) => {
                let pkg_path = self.program.packages[pkg].path.clone();
                let mut out = Vec::with_capacity(fields.len());
                for field in fields {
                    let name = self.ident(&field.name);
                    let obj = self.alloc_object(
                        ObjectKind::Var,
                        &field.name,
                        Some(&pkg_path),
                        Some(field.ty),
                        ObjectScope::Field,
                    );
                    self.record_object(pkg, name.id, obj);
                    let ty = self.type_expr(pkg, file, field.ty);
                    out.push(Field {
                        names: smallvec![name],
                        ty,
                    });
                }
                let span = self.span(6);
                self.expr(ExprKind::StructType(out), span)
            }
            TypeData::Interface(shape) => {
                let pkg_path = self.program.packages[pkg].path.clone();
                let mut out = Vec::with_capacity(shape.methods.len());
                for (name, sig) in shape.methods {
                    let ident = self.ident(&name);
                    let obj = self.interface_method(ty, &name, &pkg_path);
                    self.record_object(pkg, ident.id, obj);
                    let sig_expr = self.type_expr(pkg, file, sig);
                    out.push(Field {
                        names: smallvec![ident],
                        ty: sig_expr,
                    });
                }
                let span = self.span(9);
                self.expr(ExprKind::InterfaceType(out), span)
            }
            TypeData::Signature(sig) => {
                let func_type = self.func_type(pkg, file, &[], &sig.params, &sig.results);
                let span = self.span(4);
                self.expr(ExprKind::FuncType(func_type), span)
            }
        };
        self.record_type(pkg, expr.id, ty);
        expr
    }

    fn func_type(
        &mut self,
        pkg: usize,
        file: usize,
        names: &[Ident],
        params: &[TypeId],
        results: &[TypeId],
    ) -> FuncType {
        let params = params
            .iter()
            .enumerate()
            .map(|(i, ty)| Field {
                names: names.get(i).cloned().into_iter().collect(),
                ty: self.type_expr(pkg, file, *ty),
            })
            .collect();
        let results = results
            .iter()
            .map(|ty| Field {
                names: Default::default(),
                ty: self.type_expr(pkg, file, *ty),
            })
            .collect();
        FuncType { params, results }
    }

    /// Alias under which `file` refers to package `path`, with its package
    /// name object when the file imports it.
    fn import_alias_for(&self, pkg: usize, file: usize, path: &str) -> (String, Option<ObjectId>) {
        self.imports
            .iter()
            .find(|((p, f, _), (target, _))| *p == pkg && *f == file && target == path)
            .map(|((_, _, alias), (_, obj))| (alias.clone(), Some(*obj)))
            .unwrap_or_else(|| {
                let base = path.rsplit('/').next().unwrap_or(path);
                (base.to_string(), None)
            })
    }

    fn push_decl(&mut self, pkg: usize, file: usize, decl: Decl) {
        self.program.packages[pkg].files[file].decls.push(decl);
    }

    fn declare(&mut self, pkg: usize, name: &str, obj: ObjectId) {
        self.scopes.insert((pkg, name.to_string()), obj);
    }
}

// =============================================================================
// PackageBuilder
// =============================================================================

/// Adds top-level declarations to one file of a package.
pub struct PackageBuilder<'b> {
    b: &'b mut ProgramBuilder,
    pkg: usize,
    file: usize,
}

impl PackageBuilder<'_> {
    fn path(&self) -> String {
        self.b.program.packages[self.pkg].path.clone()
    }

    /// Switch to file `name`, creating it if needed.
    pub fn file(&mut self, name: &str) -> &mut Self {
        let files = &mut self.b.program.packages[self.pkg].files;
        self.file = match files.iter().position(|f| f.name == name) {
            Some(idx) => idx,
            None => {
                files.push(File {
                    name: name.to_string(),
                    decls: Vec::new(),
                });
                files.len() - 1
            }
        };
        self
    }

    pub fn import(&mut self, path: &str) -> &mut Self {
        self.import_spec(None, path)
    }

    pub fn import_as(&mut self, alias: &str, path: &str) -> &mut Self {
        self.import_spec(Some(alias), path)
    }

    fn import_spec(&mut self, alias: Option<&str>, path: &str) -> &mut Self {
        let pkg_path = self.path();
        let local = alias
            .map(str::to_string)
            .unwrap_or_else(|| path.rsplit('/').next().unwrap_or(path).to_string());
        let obj = self.b.alloc_object(
            ObjectKind::PkgName,
            &local,
            Some(&pkg_path),
            None,
            ObjectScope::File,
        );
        let name = alias.map(|alias| self.b.ident(alias));
        if let Some(name) = &name {
            self.b.record_object(self.pkg, name.id, obj);
        }
        self.b
            .imports
            .insert((self.pkg, self.file, local), (path.to_string(), obj));
        let quoted = format!("\"{path}\"");
        let span = self.b.span(quoted.len());
        let id = self.b.node();
        let decl = GenDecl {
            id,
            tok: DeclToken::Import,
            specs: vec![Spec::Import(ImportSpec {
                name,
                path: quoted,
                span,
            })],
            span,
        };
        self.b.push_decl(self.pkg, self.file, Decl::Gen(decl));
        self
    }

    /// `type name underlying`; returns the new named type.
    pub fn named(&mut self, name: &str, underlying: TypeId) -> TypeId {
        let named = self.b.program.types.alloc(TypeData::Named(NamedType {
            pkg: self.path(),
            name: name.to_string(),
            underlying,
            methods: Vec::new(),
        }));
        self.type_spec(name, named, underlying, false);
        named
    }

    /// `type name struct { fields }`.
    pub fn struct_named(&mut self, name: &str, fields: &[(&str, TypeId)]) -> TypeId {
        let underlying = self.b.struct_type(fields);
        self.named(name, underlying)
    }

    /// `type name interface { methods }`.
    pub fn interface(&mut self, name: &str, methods: &[(&str, TypeId)]) -> TypeId {
        let underlying = self.b.interface_type(methods);
        self.named(name, underlying)
    }

    /// `type name = target`.
    pub fn alias(&mut self, name: &str, target: TypeId) -> ObjectId {
        self.type_spec(name, target, target, true)
    }

    fn type_spec(&mut self, name: &str, denoted: TypeId, spelled: TypeId, assign: bool) -> ObjectId {
        let pkg_path = self.path();
        let obj = self.b.alloc_object(
            ObjectKind::TypeName,
            name,
            Some(&pkg_path),
            Some(denoted),
            ObjectScope::Package,
        );
        if !assign {
            self.b.type_objects.insert(denoted, obj);
        }
        self.b.declare(self.pkg, name, obj);

        let ident = self.b.ident(name);
        self.b.record_object(self.pkg, ident.id, obj);
        self.b.record_type(self.pkg, ident.id, denoted);
        let ty = self.b.type_expr(self.pkg, self.file, spelled);
        let span = ident.span.cover(ty.span);
        let id = self.b.node();
        let decl = GenDecl {
            id,
            tok: DeclToken::Type,
            specs: vec![Spec::Type(TypeSpec {
                name: ident,
                assign,
                ty,
                span,
            })],
            span,
        };
        self.b.push_decl(self.pkg, self.file, Decl::Gen(decl));
        obj
    }

    /// `var name ty`.
    pub fn var(&mut self, name: &str, ty: TypeId) -> ObjectId {
        self.value(DeclToken::Var, name, Some(ty), |_| None)
    }

    /// `var name [ty] = init`.
    pub fn var_init(
        &mut self,
        name: &str,
        ty: Option<TypeId>,
        init: impl FnOnce(&mut BodyBuilder<'_>) -> Expr,
    ) -> ObjectId {
        self.value(DeclToken::Var, name, ty, |body| Some(init(body)))
    }

    /// `const name [ty] = value`.
    pub fn constant(
        &mut self,
        name: &str,
        ty: Option<TypeId>,
        value: impl FnOnce(&mut BodyBuilder<'_>) -> Expr,
    ) -> ObjectId {
        self.value(DeclToken::Const, name, ty, |body| Some(value(body)))
    }

    fn value(
        &mut self,
        tok: DeclToken,
        name: &str,
        ty: Option<TypeId>,
        init: impl FnOnce(&mut BodyBuilder<'_>) -> Option<Expr>,
    ) -> ObjectId {
        let pkg_path = self.path();
        let kind = if tok == DeclToken::Const {
            ObjectKind::Const
        } else {
            ObjectKind::Var
        };
        let obj = self
            .b
            .alloc_object(kind, name, Some(&pkg_path), ty, ObjectScope::Package);
        self.b.declare(self.pkg, name, obj);

        let ident = self.b.ident(name);
        self.b.record_object(self.pkg, ident.id, obj);
        let ty_expr = ty.map(|ty| self.b.type_expr(self.pkg, self.file, ty));
        let mut body = BodyBuilder::new(self.b, self.pkg, self.file, Vec::new());
        let values: Vec<Expr> = init(&mut body).into_iter().collect();
        let span = values.iter().fold(ident.span, |span, v| span.cover(v.span));
        let id = self.b.node();
        let decl = GenDecl {
            id,
            tok,
            specs: vec![Spec::Value(ValueSpec {
                names: smallvec![ident],
                ty: ty_expr,
                values,
                span,
            })],
            span,
        };
        self.b.push_decl(self.pkg, self.file, Decl::Gen(decl));
        obj
    }

    /// `func name(sig) { body }`.
    pub fn func(
        &mut self,
        name: &str,
        sig: FnSig,
        body: impl FnOnce(&mut BodyBuilder<'_>),
    ) -> ObjectId {
        self.func_decl(None, name, sig, Some(body))
    }

    /// `func name(sig)` without a body (implemented outside the program).
    pub fn extern_func(&mut self, name: &str, sig: FnSig) -> ObjectId {
        self.func_decl(None, name, sig, None::<fn(&mut BodyBuilder<'_>)>)
    }

    /// `func (recv) name(sig) { body }`.
    pub fn method(
        &mut self,
        recv: Recv,
        name: &str,
        sig: FnSig,
        body: impl FnOnce(&mut BodyBuilder<'_>),
    ) -> ObjectId {
        self.func_decl(Some(recv), name, sig, Some(body))
    }

    fn func_decl(
        &mut self,
        recv: Option<Recv>,
        name: &str,
        sig: FnSig,
        body: Option<impl FnOnce(&mut BodyBuilder<'_>)>,
    ) -> ObjectId {
        let pkg_path = self.path();
        let param_types: Vec<TypeId> = sig.params.iter().map(|(_, ty)| *ty).collect();
        let sig_ty = self.b.signature(&param_types, &sig.results);

        let (scope, recv_field, mut locals) = match &recv {
            Some(recv) => {
                let recv_ty = if recv.pointer {
                    self.b.pointer(recv.ty)
                } else {
                    recv.ty
                };
                if let Some(TypeData::Named(named)) = self.b.program.types.get_mut(recv.ty) {
                    named.methods.push(MethodSig {
                        name: name.to_string(),
                        sig: sig_ty,
                        pointer_recv: recv.pointer,
                    });
                }
                let local = self.local(&recv.name, recv_ty);
                let ty = self.b.type_expr(self.pkg, self.file, recv_ty);
                (
                    ObjectScope::Method { recv: recv_ty },
                    Some(Field {
                        names: smallvec![local.0],
                        ty,
                    }),
                    vec![(recv.name.clone(), local.1)],
                )
            }
            None => (ObjectScope::Package, None, Vec::new()),
        };

        let obj = self
            .b
            .alloc_object(ObjectKind::Func, name, Some(&pkg_path), Some(sig_ty), scope);
        match &recv {
            Some(recv) => {
                self.b.methods.insert((recv.ty, name.to_string()), obj);
            }
            None => self.b.declare(self.pkg, name, obj),
        }
        let ident = self.b.ident(name);
        self.b.record_object(self.pkg, ident.id, obj);

        let mut param_names = Vec::with_capacity(sig.params.len());
        for (param, ty) in &sig.params {
            let (ident, obj) = self.local(param, *ty);
            locals.push((param.clone(), obj));
            param_names.push(ident);
        }
        let ty = self
            .b
            .func_type(self.pkg, self.file, &param_names, &param_types, &sig.results);

        let body = body.map(|build| {
            let mut builder = BodyBuilder::new(self.b, self.pkg, self.file, locals);
            build(&mut builder);
            Block {
                stmts: builder.stmts,
            }
        });
        let span = self.b.span(name.len() + 8).cover(ident.span);
        let id = self.b.node();
        self.b.push_decl(
            self.pkg,
            self.file,
            Decl::Func(FuncDecl {
                id,
                recv: recv_field,
                name: ident,
                ty,
                body,
                span,
            }),
        );
        obj
    }

    fn local(&mut self, name: &str, ty: TypeId) -> (Ident, ObjectId) {
        let pkg_path = self.path();
        let obj = self.b.alloc_object(
            ObjectKind::Var,
            name,
            Some(&pkg_path),
            Some(ty),
            ObjectScope::Local,
        );
        let ident = self.b.ident(name);
        self.b.record_object(self.pkg, ident.id, obj);
        (ident, obj)
    }

    /// A declaration the parser could not classify.
    pub fn bad_decl(&mut self) -> &mut Self {
        let span = self.b.span(3);
        self.b
            .push_decl(self.pkg, self.file, Decl::Bad(BadDecl { span }));
        self
    }
}

// =============================================================================
// BodyBuilder
// =============================================================================

/// Builds expressions and statements inside a function body or initializer.
pub struct BodyBuilder<'a> {
    b: &'a mut ProgramBuilder,
    pkg: usize,
    file: usize,
    locals: Vec<(String, ObjectId)>,
    stmts: Vec<Stmt>,
}

impl<'a> BodyBuilder<'a> {
    fn new(
        b: &'a mut ProgramBuilder,
        pkg: usize,
        file: usize,
        locals: Vec<(String, ObjectId)>,
    ) -> Self {
        Self {
            b,
            pkg,
            file,
            locals,
            stmts: Vec::new(),
        }
    }

    fn pending(&mut self, node: NodeId, target: UseTarget) {
        self.b.pending.push(PendingUse {
            pkg: self.pkg,
            node,
            target,
        });
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    /// Reference `name`: a local if one is in scope, otherwise a package or
    /// universe object resolved when the program is finished.
    pub fn name(&mut self, name: &str) -> Expr {
        let ident = self.b.ident(name);
        let local = self
            .locals
            .iter()
            .rev()
            .find(|(local, _)| local == name)
            .map(|(_, obj)| *obj);
        match local {
            Some(obj) => self.b.record_object(self.pkg, ident.id, obj),
            None => self.pending(ident.id, UseTarget::Name(name.to_string())),
        }
        ProgramBuilder::ident_expr(ident)
    }

    /// `alias.name` through an import of the current file.
    pub fn qualified(&mut self, alias: &str, name: &str) -> Expr {
        let x = self.b.ident(alias);
        let import = self
            .b
            .imports
            .get(&(self.pkg, self.file, alias.to_string()))
            .cloned();
        let sel = self.b.ident(name);
        if let Some((path, obj)) = import {
            self.b.record_object(self.pkg, x.id, obj);
            self.pending(
                sel.id,
                UseTarget::Qualified {
                    path,
                    name: name.to_string(),
                },
            );
        }
        let span = x.span.cover(sel.span);
        let x = ProgramBuilder::ident_expr(x);
        self.b.expr(
            ExprKind::Selector {
                x: Box::new(x),
                sel,
            },
            span,
        )
    }

    /// `x.name` where `x` has static type `recv`.
    pub fn method(&mut self, x: Expr, recv: TypeId, name: &str) -> Expr {
        let sel = self.b.ident(name);
        self.pending(
            sel.id,
            UseTarget::Method {
                recv,
                name: name.to_string(),
            },
        );
        let span = x.span.cover(sel.span);
        self.b.expr(
            ExprKind::Selector {
                x: Box::new(x),
                sel,
            },
            span,
        )
    }

    /// `x.name` selecting a struct field.
    pub fn field(&mut self, x: Expr, name: &str) -> Expr {
        let pkg_path = self.b.program.packages[self.pkg].path.clone();
        let sel = self.b.ident(name);
        let obj = self.b.alloc_object(
            ObjectKind::Var,
            name,
            Some(&pkg_path),
            None,
            ObjectScope::Field,
        );
        self.b.record_object(self.pkg, sel.id, obj);
        let span = x.span.cover(sel.span);
        self.b.expr(
            ExprKind::Selector {
                x: Box::new(x),
                sel,
            },
            span,
        )
    }

    pub fn call(&mut self, fun: Expr, args: Vec<Expr>) -> Expr {
        let span = args.iter().fold(fun.span, |span, a| span.cover(a.span));
        self.b.expr(
            ExprKind::Call {
                fun: Box::new(fun),
                args,
            },
            span,
        )
    }

    pub fn int(&mut self, value: i64) -> Expr {
        self.lit(LitKind::Int, value.to_string())
    }

    pub fn string(&mut self, value: &str) -> Expr {
        self.lit(LitKind::String, format!("{value:?}"))
    }

    fn lit(&mut self, kind: LitKind, value: String) -> Expr {
        let span = self.b.span(value.len());
        self.b.expr(ExprKind::BasicLit { kind, value }, span)
    }

    /// Type expression spelling `ty`.
    pub fn type_expr(&mut self, ty: TypeId) -> Expr {
        self.b.type_expr(self.pkg, self.file, ty)
    }

    /// `T{elts}`.
    pub fn composite(&mut self, ty: TypeId, elts: Vec<Expr>) -> Expr {
        let ty = self.type_expr(ty);
        let span = elts.iter().fold(ty.span, |span, e| span.cover(e.span));
        self.b.expr(
            ExprKind::Composite {
                ty: Some(Box::new(ty)),
                elts,
            },
            span,
        )
    }

    /// `&x`.
    pub fn addr(&mut self, x: Expr) -> Expr {
        self.unary("&", x)
    }

    pub fn unary(&mut self, op: &str, x: Expr) -> Expr {
        let span = x.span;
        self.b.expr(
            ExprKind::Unary {
                op: op.to_string(),
                x: Box::new(x),
            },
            span,
        )
    }

    pub fn binary(&mut self, op: &str, x: Expr, y: Expr) -> Expr {
        let span = x.span.cover(y.span);
        self.b.expr(
            ExprKind::Binary {
                op: op.to_string(),
                x: Box::new(x),
                y: Box::new(y),
            },
            span,
        )
    }

    /// `func(sig) { body }` closing over the current locals.
    pub fn func_lit(&mut self, sig: FnSig, body: impl FnOnce(&mut BodyBuilder<'_>)) -> Expr {
        let pkg_path = self.b.program.packages[self.pkg].path.clone();
        let mut locals = self.locals.clone();
        let mut names = Vec::with_capacity(sig.params.len());
        for (param, ty) in &sig.params {
            let obj = self.b.alloc_object(
                ObjectKind::Var,
                param,
                Some(&pkg_path),
                Some(*ty),
                ObjectScope::Local,
            );
            let ident = self.b.ident(param);
            self.b.record_object(self.pkg, ident.id, obj);
            locals.push((param.clone(), obj));
            names.push(ident);
        }
        let param_types: Vec<TypeId> = sig.params.iter().map(|(_, ty)| *ty).collect();
        let ty = self
            .b
            .func_type(self.pkg, self.file, &names, &param_types, &sig.results);
        let mut inner = BodyBuilder::new(self.b, self.pkg, self.file, locals);
        body(&mut inner);
        let block = Block {
            stmts: inner.stmts,
        };
        let span = self.b.span(4);
        self.b.expr(ExprKind::FuncLit { ty, body: block }, span)
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    /// Expression statement.
    pub fn expr(&mut self, expr: Expr) -> &mut Self {
        self.stmts.push(Stmt::Expr(expr));
        self
    }

    /// `name := value`; declares a local of type `ty`.
    pub fn define(&mut self, name: &str, ty: Option<TypeId>, value: Expr) -> &mut Self {
        let pkg_path = self.b.program.packages[self.pkg].path.clone();
        let obj = self
            .b
            .alloc_object(ObjectKind::Var, name, Some(&pkg_path), ty, ObjectScope::Local);
        let ident = self.b.ident(name);
        self.b.record_object(self.pkg, ident.id, obj);
        self.locals.push((name.to_string(), obj));
        self.stmts.push(Stmt::Assign {
            lhs: vec![ProgramBuilder::ident_expr(ident)],
            rhs: vec![value],
            define: true,
        });
        self
    }

    /// `lhs = rhs`.
    pub fn assign(&mut self, lhs: Expr, rhs: Expr) -> &mut Self {
        self.stmts.push(Stmt::Assign {
            lhs: vec![lhs],
            rhs: vec![rhs],
            define: false,
        });
        self
    }

    pub fn ret(&mut self, results: Vec<Expr>) -> &mut Self {
        self.stmts.push(Stmt::Return(results));
        self
    }

    pub fn defer(&mut self, call: Expr) -> &mut Self {
        self.stmts.push(Stmt::Defer(call));
        self
    }

    /// `if cond { then }`.
    pub fn if_then(&mut self, cond: Expr, then: impl FnOnce(&mut BodyBuilder<'_>)) -> &mut Self {
        let locals = self.locals.clone();
        let mut inner = BodyBuilder::new(self.b, self.pkg, self.file, locals);
        then(&mut inner);
        let then = Block {
            stmts: inner.stmts,
        };
        self.stmts.push(Stmt::If {
            cond,
            then,
            els: None,
        });
        self
    }
}

#[cfg(test)]
#[path = "../tests/builder_tests.rs"]
mod tests;
