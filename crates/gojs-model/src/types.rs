//! Static types of the whole-program model.
//!
//! Types live in a single program-wide [`TypeTable`] and are addressed by
//! [`TypeId`]. Named types are nominal (identical only to themselves); every
//! other type compares structurally.
//!
//! Canonical type strings double as lookup keys in the symbol index:
//!
//! | Type | String |
//! |------|--------|
//! | named | `"<pkgpath> <Name>"` |
//! | pointer | `"*" + elem` |
//! | slice / array | `"[]E"` / `"[N]E"` |
//! | map | `"map[K]V"` |
//! | signature | `"func(P, Q) R"` |

use indexmap::IndexMap;
use std::fmt::Write;

/// Index of a type in the [`TypeTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

#[derive(Clone, Debug, PartialEq)]
pub enum TypeData {
    /// Predeclared type (`int`, `float64`, `string`, `error`, ...).
    Basic(String),
    Named(NamedType),
    Pointer(TypeId),
    Slice(TypeId),
    Array(u64, TypeId),
    Map(TypeId, TypeId),
    Struct(Vec<StructField>),
    Interface(InterfaceShape),
    Signature(Signature),
}

#[derive(Clone, Debug, PartialEq)]
pub struct NamedType {
    pub pkg: String,
    pub name: String,
    pub underlying: TypeId,
    /// Declared methods in declaration order.
    pub methods: Vec<MethodSig>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodSig {
    pub name: String,
    pub sig: TypeId,
    /// Declared on `*T` rather than `T`.
    pub pointer_recv: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructField {
    pub name: String,
    pub ty: TypeId,
    pub embedded: bool,
}

/// Structural interface shape: method name to signature.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InterfaceShape {
    pub methods: IndexMap<String, TypeId>,
}

impl InterfaceShape {
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Signature {
    pub params: Vec<TypeId>,
    pub results: Vec<TypeId>,
    pub variadic: bool,
}

// =============================================================================
// TypeTable
// =============================================================================

/// Program-wide type storage.
#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    types: Vec<TypeData>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    pub fn alloc(&mut self, data: TypeData) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(data);
        id
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeData> {
        self.types.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: TypeId) -> Option<&mut TypeData> {
        self.types.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn named(&self, id: TypeId) -> Option<&NamedType> {
        match self.get(id)? {
            TypeData::Named(named) => Some(named),
            _ => None,
        }
    }

    /// Follow named types to their underlying type.
    pub fn underlying(&self, mut id: TypeId) -> TypeId {
        // Bounded so a malformed self-referential named type cannot loop.
        for _ in 0..self.types.len() {
            match self.get(id) {
                Some(TypeData::Named(named)) if named.underlying != id => id = named.underlying,
                _ => break,
            }
        }
        id
    }

    /// The interface shape of `id` or of its underlying type.
    pub fn interface(&self, id: TypeId) -> Option<&InterfaceShape> {
        match self.get(self.underlying(id))? {
            TypeData::Interface(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn is_interface(&self, id: TypeId) -> bool {
        self.interface(id).is_some()
    }

    /// Strip one level of pointer indirection, if any.
    pub fn deref(&self, id: TypeId) -> TypeId {
        match self.get(id) {
            Some(TypeData::Pointer(elem)) => *elem,
            _ => id,
        }
    }

    // =========================================================================
    // Identity and structural satisfaction
    // =========================================================================

    /// Type identity: named types by identity, everything else structurally.
    pub fn identical(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        let (Some(da), Some(db)) = (self.get(a), self.get(b)) else {
            return false;
        };
        match (da, db) {
            (TypeData::Basic(x), TypeData::Basic(y)) => x == y,
            (TypeData::Named(_), _) | (_, TypeData::Named(_)) => false,
            (TypeData::Pointer(x), TypeData::Pointer(y)) | (TypeData::Slice(x), TypeData::Slice(y)) => {
                self.identical(*x, *y)
            }
            (TypeData::Array(n, x), TypeData::Array(m, y)) => n == m && self.identical(*x, *y),
            (TypeData::Map(k1, v1), TypeData::Map(k2, v2)) => {
                self.identical(*k1, *k2) && self.identical(*v1, *v2)
            }
            (TypeData::Struct(f1), TypeData::Struct(f2)) => {
                f1.len() == f2.len()
                    && f1.iter().zip(f2).all(|(x, y)| {
                        x.name == y.name && x.embedded == y.embedded && self.identical(x.ty, y.ty)
                    })
            }
            (TypeData::Interface(s1), TypeData::Interface(s2)) => {
                s1.methods.len() == s2.methods.len()
                    && s1.methods.iter().all(|(name, sig)| {
                        s2.methods
                            .get(name)
                            .is_some_and(|other| self.identical(*sig, *other))
                    })
            }
            (TypeData::Signature(s1), TypeData::Signature(s2)) => {
                s1.variadic == s2.variadic
                    && self.identical_lists(&s1.params, &s2.params)
                    && self.identical_lists(&s1.results, &s2.results)
            }
            _ => false,
        }
    }

    fn identical_lists(&self, a: &[TypeId], b: &[TypeId]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| self.identical(*x, *y))
    }

    /// Signature of method `name` in the method set of `ty`.
    ///
    /// A named non-interface type contributes its value-receiver methods, a
    /// pointer to a named type contributes all of them, and an interface
    /// contributes its own methods.
    pub fn lookup_method(&self, ty: TypeId, name: &str) -> Option<TypeId> {
        if let Some(shape) = self.interface(ty) {
            return shape.methods.get(name).copied();
        }
        match self.get(ty)? {
            TypeData::Named(named) => named
                .methods
                .iter()
                .find(|m| m.name == name && !m.pointer_recv)
                .map(|m| m.sig),
            TypeData::Pointer(elem) => match self.get(*elem)? {
                TypeData::Named(named) if !self.is_interface(*elem) => named
                    .methods
                    .iter()
                    .find(|m| m.name == name)
                    .map(|m| m.sig),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether `ty` structurally satisfies the interface `iface`.
    ///
    /// Returns false when `iface` is not (or does not name) an interface.
    pub fn implements(&self, ty: TypeId, iface: TypeId) -> bool {
        let Some(shape) = self.interface(iface) else {
            return false;
        };
        shape.methods.iter().all(|(name, sig)| {
            self.lookup_method(ty, name)
                .is_some_and(|found| self.identical(found, *sig))
        })
    }

    // =========================================================================
    // Canonical strings
    // =========================================================================

    pub fn type_string(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id);
        out
    }

    fn write_type(&self, out: &mut String, id: TypeId) {
        let Some(data) = self.get(id) else {
            out.push_str("invalid type");
            return;
        };
        match data {
            TypeData::Basic(name) => out.push_str(name),
            TypeData::Named(named) if named.pkg.is_empty() => out.push_str(&named.name),
            TypeData::Named(named) => {
                let _ = write!(out, "{} {}", named.pkg, named.name);
            }
            TypeData::Pointer(elem) => {
                out.push('*');
                self.write_type(out, *elem);
            }
            TypeData::Slice(elem) => {
                out.push_str("[]");
                self.write_type(out, *elem);
            }
            TypeData::Array(len, elem) => {
                let _ = write!(out, "[{len}]");
                self.write_type(out, *elem);
            }
            TypeData::Map(key, value) => {
                out.push_str("map[");
                self.write_type(out, *key);
                out.push(']');
                self.write_type(out, *value);
            }
            TypeData::Struct(fields) => {
                out.push_str("struct{");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    if !field.embedded {
                        out.push_str(&field.name);
                        out.push(' ');
                    }
                    self.write_type(out, field.ty);
                }
                out.push('}');
            }
            TypeData::Interface(shape) => {
                out.push_str("interface{");
                for (i, (name, sig)) in shape.methods.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    out.push_str(name);
                    self.write_signature_tail(out, *sig);
                }
                out.push('}');
            }
            TypeData::Signature(_) => {
                out.push_str("func");
                self.write_signature_tail(out, id);
            }
        }
    }

    /// `(P, Q) R` part of a signature.
    fn write_signature_tail(&self, out: &mut String, id: TypeId) {
        let Some(TypeData::Signature(sig)) = self.get(id) else {
            out.push_str("()");
            return;
        };
        out.push('(');
        for (i, param) in sig.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if sig.variadic && i + 1 == sig.params.len() {
                out.push_str("...");
                self.write_type(out, self.slice_elem(*param));
            } else {
                self.write_type(out, *param);
            }
        }
        out.push(')');
        match sig.results.as_slice() {
            [] => {}
            [single] => {
                out.push(' ');
                self.write_type(out, *single);
            }
            many => {
                out.push_str(" (");
                for (i, result) in many.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(out, *result);
                }
                out.push(')');
            }
        }
    }

    fn slice_elem(&self, id: TypeId) -> TypeId {
        match self.get(id) {
            Some(TypeData::Slice(elem)) => *elem,
            _ => id,
        }
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
