//! Dependency Resolver.
//!
//! Walks one declaration's AST and resolves every identifier through the
//! [`SymbolIndex`]. The result is the declaration's edge list in the
//! program use-graph, plus the interface-typed call sites whose concrete
//! targets are only known once reachability asks for implementations.

use crate::declaration::{DeclId, DeclKind, DeclNode, Declaration};
use crate::index::SymbolIndex;
use gojs_model::visit::{Visitor, walk_expr, walk_func_decl};
use gojs_model::{Ident, ObjectScope, TypeId, TypeInfo};
use rustc_hash::FxHashSet;
use tracing::trace;

/// A call through an interface: `iface` is the static interface type,
/// `method` the abstract method selected on it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dispatch {
    pub iface: TypeId,
    pub method: String,
}

/// Dependencies of one declaration, in first-reference order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolved {
    pub dependencies: Vec<DeclId>,
    pub dispatches: Vec<Dispatch>,
}

impl Resolved {
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dispatches.is_empty()
    }
}

pub struct DependencyResolver<'i, 'p> {
    index: &'i SymbolIndex<'p>,
    info: TypeInfo<'p>,
    this: DeclId,
    seen: FxHashSet<DeclId>,
    seen_dispatches: FxHashSet<Dispatch>,
    resolved: Resolved,
}

impl<'i, 'p> DependencyResolver<'i, 'p> {
    fn new(index: &'i SymbolIndex<'p>, decl: &Declaration<'p>) -> Self {
        Self {
            index,
            info: index.program().info(decl.package),
            this: decl.decl_id,
            seen: FxHashSet::default(),
            seen_dispatches: FxHashSet::default(),
            resolved: Resolved::default(),
        }
    }

    /// Resolve what `decl` refers to. Interfaces refer to nothing: their
    /// method bodies are analyzed through the concrete implementations.
    pub fn resolve(index: &'i SymbolIndex<'p>, decl: &Declaration<'p>) -> Resolved {
        if decl.kind == DeclKind::Interface {
            return Resolved::default();
        }
        let mut resolver = Self::new(index, decl);
        match decl.node {
            DeclNode::Func(func) => walk_func_decl(&mut resolver, func),
            DeclNode::Value { spec, .. } => {
                for expr in spec.ty.iter().chain(&spec.values) {
                    walk_expr(&mut resolver, expr);
                }
            }
            DeclNode::Type { spec, .. } => walk_expr(&mut resolver, &spec.ty),
        }
        trace!(
            id = %decl.id,
            dependencies = resolver.resolved.dependencies.len(),
            dispatches = resolver.resolved.dispatches.len(),
            "resolved dependencies"
        );
        resolver.resolved
    }

    fn depend(&mut self, decl: DeclId) {
        if decl != self.this && self.seen.insert(decl) {
            self.resolved.dependencies.push(decl);
        }
    }

    fn dispatch(&mut self, iface: TypeId, method: &str) {
        let dispatch = Dispatch {
            iface,
            method: method.to_string(),
        };
        if self.seen_dispatches.insert(dispatch.clone()) {
            self.resolved.dispatches.push(dispatch);
        }
        // A named interface is itself a dependency of its call sites.
        let iface_id = self.index.program().type_string(iface);
        let decl = self
            .index
            .find_by_id(&iface_id)
            .filter(|decl| decl.kind == DeclKind::Interface)
            .map(|decl| decl.decl_id);
        if let Some(decl) = decl {
            self.depend(decl);
        }
    }
}

impl Visitor for DependencyResolver<'_, '_> {
    fn visit_ident(&mut self, ident: &Ident) {
        let Some(object) = self.info.object_of(ident) else {
            return;
        };
        if let ObjectScope::InterfaceMethod { iface } = object.scope {
            self.dispatch(iface, &object.name);
            return;
        }
        if let Some(decl) = self.index.find_by_object(object).map(|decl| decl.decl_id) {
            self.depend(decl);
        }
    }
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
