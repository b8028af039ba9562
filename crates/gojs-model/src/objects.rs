//! Resolved objects: what an identifier denotes after type checking.

use crate::types::{TypeId, TypeTable};

/// Index of an object in the program's object arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Var,
    Const,
    TypeName,
    Func,
    /// An imported package name.
    PkgName,
    /// A universe-scope function (`len`, `append`, ...).
    Builtin,
    Nil,
}

/// Where an object is declared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectScope {
    /// Package scope (top-level declarations).
    Package,
    /// Universe scope (predeclared identifiers).
    Universe,
    /// File scope (import names).
    File,
    /// Function parameters and locals.
    Local,
    /// A struct field.
    Field,
    /// A concrete method; `recv` is the receiver type as declared.
    Method { recv: TypeId },
    /// An abstract interface method.
    InterfaceMethod { iface: TypeId },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub kind: ObjectKind,
    pub name: String,
    /// Declaring package path; `None` for universe objects.
    pub pkg: Option<String>,
    pub ty: Option<TypeId>,
    pub scope: ObjectScope,
}

impl Object {
    pub fn exported(&self) -> bool {
        is_exported(&self.name)
    }

    pub fn is_method(&self) -> bool {
        matches!(self.scope, ObjectScope::Method { .. })
    }

    /// The process-wide identity of this object, if it has one.
    ///
    /// Package-level objects are `"<pkgpath> <name>"`, methods are
    /// `"<pkgpath> <Recv>.<name>"`. Locals, fields, imports, abstract
    /// interface methods and universe objects have no identity.
    pub fn canonical_id(&self, types: &TypeTable) -> Option<String> {
        let pkg = self.pkg.as_deref()?;
        match self.scope {
            ObjectScope::Package => Some(format!("{pkg} {}", self.name)),
            ObjectScope::Method { recv } => {
                let base = types.deref(recv);
                let recv_name = types.named(base)?.name.as_str();
                Some(format!("{pkg} {recv_name}.{}", self.name))
            }
            _ => None,
        }
    }
}

/// Whether `name` is exported: it starts with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
