use super::*;
use crate::options::IndexOptions;
use crate::test_fixtures::{RUNTIME, SHAPES, shapes, with_runtime};
use gojs_model::{FnSig, ProgramBuilder};

fn id(name: &str) -> String {
    format!("{SHAPES} {name}")
}

fn ids(defs: &Definitions<'_>, decls: impl Iterator<Item = DeclId>) -> Vec<String> {
    decls
        .filter_map(|decl| defs.get(decl))
        .map(|def| def.id().to_string())
        .collect()
}

fn decl_of(defs: &Definitions<'_>, id: &str) -> DeclId {
    defs.find(id).expect("defined").decl_id()
}

#[test]
fn test_closure_follows_dependencies_dispatch_and_methods() {
    let program = shapes();
    let index = SymbolIndex::build(&program, IndexOptions::default()).expect("program indexes");
    let defs = Definitions::build(&index).expect("definitions build");
    let set = reachable(&defs, [decl_of(&defs, &id("main"))]);

    assert_eq!(
        ids(&defs, set.iter()),
        vec![
            id("main"),
            id("Circle"),
            id("Describe"),
            id("Circle.Area"),
            id("Shape"),
            id("Rect.Area"),
            id("Rect"),
        ]
    );
    for unreachable in ["Square", "Square.Area", "helper", "now", "Unit", "Pi", "Circle.Grow"] {
        assert!(!set.contains(decl_of(&defs, &id(unreachable))), "{unreachable}");
    }
}

#[test]
fn test_package_roots_are_exported_declarations() {
    let program = shapes();
    let index = SymbolIndex::build(&program, IndexOptions::default()).expect("program indexes");
    let defs = Definitions::build(&index).expect("definitions build");
    let roots = ids(&defs, package_roots(&defs, SHAPES).into_iter());
    assert!(roots.contains(&id("main")));
    assert!(roots.contains(&id("Describe")));
    assert!(roots.contains(&id("Circle")));
    assert!(!roots.contains(&id("helper")));
    assert!(!roots.contains(&id("Shape")));
    assert!(!roots.contains(&id("Circle.Area")));
    assert!(package_roots(&defs, "elsewhere").is_empty());
}

#[test]
fn test_omitted_declarations_are_reachable_but_not_emitted() {
    let mut b = ProgramBuilder::new();
    let int64 = b.basic("int64");
    {
        let mut pkg = b.package("main");
        pkg.extern_func("now", FnSig::new().result(int64));
        pkg.func("main", FnSig::new(), |body| {
            let now = body.name("now");
            let call = body.call(now, vec![]);
            body.expr(call);
        });
    }
    let program = b.finish();
    let index = SymbolIndex::build(&program, IndexOptions::default()).expect("program indexes");
    let defs = Definitions::build(&index).expect("definitions build");
    let set = reachable(&defs, package_roots(&defs, "main"));

    assert_eq!(set.len(), 2);
    assert!(set.contains(decl_of(&defs, "main now")));
    assert_eq!(ids(&defs, set.emitted()), vec!["main main".to_string()]);
}

#[test]
fn test_runtime_roots_skip_unknown_names() {
    let program = with_runtime();
    let options = IndexOptions::default().with_runtime_package(RUNTIME);
    let index = SymbolIndex::build(&program, options).expect("program indexes");
    let defs = Definitions::build(&index).expect("definitions build");
    let roots = runtime_roots(&index, &["Alloc", "missing"]);
    assert_eq!(ids(&defs, roots.iter().copied()), vec![format!("{RUNTIME} Alloc")]);

    let mut all = package_roots(&defs, "main");
    all.extend(roots);
    let set = reachable(&defs, all);
    assert!(set.contains(decl_of(&defs, &format!("{RUNTIME} Alloc"))));
    assert!(!set.contains(decl_of(&defs, &format!("{RUNTIME} panicIndex"))));
}

#[test]
fn test_unknown_roots_are_ignored() {
    let program = shapes();
    let index = SymbolIndex::build(&program, IndexOptions::default()).expect("program indexes");
    let defs = Definitions::build(&index).expect("definitions build");
    let set = reachable(&defs, [DeclId(u32::MAX)]);
    assert!(set.is_empty());
}
