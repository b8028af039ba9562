//! The whole program: packages, files and the static type resolver.

use crate::ast::{Decl, Expr, Ident, NodeId};
use crate::objects::{Object, ObjectId};
use crate::types::{TypeId, TypeTable};
use rustc_hash::FxHashMap;

/// A parsed and type-checked program spanning every compiled package.
#[derive(Debug, Default)]
pub struct Program {
    pub(crate) packages: Vec<Package>,
    pub(crate) types: TypeTable,
    pub(crate) objects: Vec<Object>,
}

#[derive(Debug)]
pub struct Package {
    /// Import path (`github.com/acme/shapes`).
    pub path: String,
    /// Package clause name (`shapes`).
    pub name: String,
    pub files: Vec<File>,
    pub(crate) info: PackageInfo,
}

#[derive(Debug)]
pub struct File {
    pub name: String,
    pub decls: Vec<Decl>,
}

/// Checker annotations for one package.
#[derive(Debug, Default)]
pub(crate) struct PackageInfo {
    pub(crate) types: FxHashMap<NodeId, TypeId>,
    pub(crate) objects: FxHashMap<NodeId, ObjectId>,
}

impl Program {
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn package(&self, path: &str) -> Option<&Package> {
        self.packages.iter().find(|pkg| pkg.path == path)
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0 as usize)
    }

    /// Static type resolver for `package`.
    pub fn info<'p>(&'p self, package: &'p Package) -> TypeInfo<'p> {
        TypeInfo {
            program: self,
            package,
        }
    }

    /// Static type resolver for the package at `path`.
    pub fn info_for(&self, path: &str) -> Option<TypeInfo<'_>> {
        self.package(path).map(|package| self.info(package))
    }

    /// Canonical string of `ty`.
    pub fn type_string(&self, ty: TypeId) -> String {
        self.types.type_string(ty)
    }

    /// Structural `Implements(concrete, iface)`.
    pub fn implements(&self, concrete: TypeId, iface: TypeId) -> bool {
        self.types.implements(concrete, iface)
    }
}

/// Per-package view answering `TypeOf` and `ObjectOf`.
#[derive(Clone, Copy, Debug)]
pub struct TypeInfo<'p> {
    program: &'p Program,
    package: &'p Package,
}

impl<'p> TypeInfo<'p> {
    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub fn package(&self) -> &'p Package {
        self.package
    }

    pub fn types(&self) -> &'p TypeTable {
        &self.program.types
    }

    pub fn type_of(&self, expr: &Expr) -> Option<TypeId> {
        self.package.info.types.get(&expr.id).copied()
    }

    /// Type denoted or held by an identifier (e.g. the name of a type spec).
    pub fn type_of_ident(&self, ident: &Ident) -> Option<TypeId> {
        self.package.info.types.get(&ident.id).copied()
    }

    pub fn object_of(&self, ident: &Ident) -> Option<&'p Object> {
        let id = self.package.info.objects.get(&ident.id)?;
        self.program.object(*id)
    }
}
