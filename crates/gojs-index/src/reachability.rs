//! Reachability over the definition use-graph.
//!
//! Starting from the roots, a definition is reachable when a reachable
//! definition depends on it, when it implements a method dispatched through
//! an interface by a reachable definition, or when it is a method of a
//! reachable type. Only reachable, non-omitted definitions are emitted.

use crate::declaration::DeclId;
use crate::def::{AnyDef, Definition, Definitions};
use crate::index::SymbolIndex;
use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::{Level, debug, span, trace};

/// Reachable declarations in discovery order.
#[derive(Clone, Debug, Default)]
pub struct ReachableSet {
    decls: IndexSet<DeclId>,
    omitted: FxHashSet<DeclId>,
}

impl ReachableSet {
    pub fn contains(&self, decl: DeclId) -> bool {
        self.decls.contains(&decl)
    }

    pub fn iter(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.decls.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Reachable declarations that are emitted, i.e. not implemented
    /// outside the program.
    pub fn emitted(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.iter().filter(|decl| !self.omitted.contains(decl))
    }
}

/// Exported declarations of the package at `path`.
pub fn package_roots(defs: &Definitions<'_>, path: &str) -> Vec<DeclId> {
    defs.iter()
        .filter(|def| def.path() == path && def.exported())
        .map(|def| def.decl_id())
        .collect()
}

/// Runtime-support functions the compiler synthesizes references to.
/// Names the runtime package does not declare are skipped.
pub fn runtime_roots(index: &SymbolIndex<'_>, names: &[&str]) -> Vec<DeclId> {
    names
        .iter()
        .filter_map(|name| {
            let decl = index.runtime(name);
            if decl.is_none() {
                trace!(name, "unknown runtime function");
            }
            decl.map(|decl| decl.decl_id)
        })
        .collect()
}

struct Walk<'d, 'a> {
    defs: &'d Definitions<'a>,
    set: ReachableSet,
    queue: VecDeque<DeclId>,
}

impl Walk<'_, '_> {
    fn visit(&mut self, decl: DeclId) {
        let Some(def) = self.defs.get(decl) else {
            return;
        };
        if self.set.decls.insert(decl) {
            if def.omitted() {
                self.set.omitted.insert(decl);
            }
            self.queue.push_back(decl);
        }
    }
}

/// Transitive closure of `roots` over dependencies, interface dispatch and
/// type method sets.
pub fn reachable(defs: &Definitions<'_>, roots: impl IntoIterator<Item = DeclId>) -> ReachableSet {
    let _span = span!(Level::DEBUG, "reachable").entered();
    let index = defs.index();
    let mut walk = Walk {
        defs,
        set: ReachableSet::default(),
        queue: VecDeque::new(),
    };
    for root in roots {
        walk.visit(root);
    }
    let roots = walk.set.len();

    while let Some(decl) = walk.queue.pop_front() {
        let Some(def) = defs.get(decl) else {
            continue;
        };
        for dep in def.dependencies() {
            walk.visit(*dep);
        }
        for dispatch in def.dispatches() {
            for method in index.implemented_by_type(dispatch.iface, &dispatch.method) {
                walk.visit(method.decl_id);
            }
        }
        if let AnyDef::Type(ty) = def {
            for method in ty.methods() {
                walk.visit(method.decl_id);
            }
        }
    }

    debug!(
        roots,
        reachable = walk.set.len(),
        omitted = walk.set.omitted.len(),
        "reachability computed"
    );
    walk.set
}

#[cfg(test)]
#[path = "../tests/reachability_tests.rs"]
mod tests;
