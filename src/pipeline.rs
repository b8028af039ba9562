//! One-call analysis: model -> index -> definitions -> reachable set.

use gojs_index::{
    DeclId, Declaration, Definitions, IndexError, IndexOptions, ReachableSet, SymbolIndex,
    package_roots, reachable, runtime_roots,
};
use gojs_model::Program;
use serde::Serialize;
use tracing::{Level, debug, span};

/// Result of analysing a program from one entry package.
///
/// Owns the index so the emitter can keep querying it; the definitions are
/// only needed to compute the reachable set and are dropped afterwards.
pub struct Analysis<'p> {
    entry_package: String,
    index: SymbolIndex<'p>,
    roots: Vec<DeclId>,
    reachable: ReachableSet,
}

/// Serializable summary of an [`Analysis`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub entry_package: String,
    pub declarations: usize,
    pub reachable: usize,
    pub emitted: Vec<String>,
}

impl<'p> Analysis<'p> {
    pub fn entry_package(&self) -> &str {
        &self.entry_package
    }

    pub fn index(&self) -> &SymbolIndex<'p> {
        &self.index
    }

    pub fn roots(&self) -> &[DeclId] {
        &self.roots
    }

    pub fn reachable(&self) -> &ReachableSet {
        &self.reachable
    }

    /// Declarations the emitter must produce code for, in discovery order.
    pub fn emitted(&self) -> impl Iterator<Item = &Declaration<'p>> + '_ {
        self.reachable
            .emitted()
            .filter_map(|decl| self.index.get(decl))
    }

    pub fn is_reachable(&self, id: &str) -> bool {
        self.index
            .find_by_id(id)
            .is_some_and(|decl| self.reachable.contains(decl.decl_id))
    }

    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            entry_package: self.entry_package.clone(),
            declarations: self.index.len(),
            reachable: self.reachable.len(),
            emitted: self.emitted().map(|decl| decl.id.clone()).collect(),
        }
    }
}

/// Analyse `program`, rooting reachability at the exported declarations of
/// `entry_package`.
pub fn analyze<'p>(
    program: &'p Program,
    options: IndexOptions,
    entry_package: &str,
) -> Result<Analysis<'p>, IndexError> {
    analyze_with_runtime(program, options, entry_package, &[])
}

/// Like [`analyze`], additionally rooting the named runtime-support
/// functions the compiler synthesizes calls to.
pub fn analyze_with_runtime<'p>(
    program: &'p Program,
    options: IndexOptions,
    entry_package: &str,
    runtime_names: &[&str],
) -> Result<Analysis<'p>, IndexError> {
    let _span = span!(Level::DEBUG, "analyze", entry = entry_package).entered();
    let index = SymbolIndex::build(program, options)?;

    let (roots, set) = {
        let defs = Definitions::build(&index)?;
        let mut roots = package_roots(&defs, entry_package);
        if roots.is_empty() {
            debug!(entry = entry_package, "entry package has no exported declarations");
        }
        roots.extend(runtime_roots(&index, runtime_names));
        let set = reachable(&defs, roots.iter().copied());
        (roots, set)
    };

    Ok(Analysis {
        entry_package: entry_package.to_string(),
        index,
        roots,
        reachable: set,
    })
}
