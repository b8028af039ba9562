use super::*;
use crate::test_fixtures::{RUNTIME, SHAPES, shapes, two_packages, with_runtime};
use gojs_model::{FnSig, ProgramBuilder, Recv};

fn id(name: &str) -> String {
    format!("{SHAPES} {name}")
}

fn ids<'a>(decls: &[&'a Declaration<'_>]) -> Vec<&'a str> {
    decls.iter().map(|decl| decl.id.as_str()).collect()
}

fn build(program: &Program) -> SymbolIndex<'_> {
    SymbolIndex::build(program, IndexOptions::default()).expect("program indexes")
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_every_declaration_is_found_by_its_own_id() {
    let program = shapes();
    let index = build(&program);
    assert!(!index.is_empty());
    for decl in index.declarations() {
        let found = index.find_by_id(&decl.id).expect("registered");
        assert_eq!(found.decl_id, decl.decl_id, "{}", decl.id);
        assert_eq!(index.get(decl.decl_id).map(|d| d.id.as_str()), Some(decl.id.as_str()));
    }
    assert_eq!(index.len(), index.declarations().len());
}

#[test]
fn test_declaration_kinds_and_metadata() {
    let program = shapes();
    let index = build(&program);

    let cases = [
        ("Shape", DeclKind::Interface),
        ("Circle", DeclKind::TypeAlias),
        ("Circle.Area", DeclKind::Method),
        ("Round", DeclKind::TypeAlias),
        ("Unit", DeclKind::Var),
        ("Pi", DeclKind::Const),
        ("Describe", DeclKind::Function),
    ];
    for (name, kind) in cases {
        let decl = index.find_by_id(&id(name)).expect(name);
        assert_eq!(decl.kind, kind, "{name}");
        assert_eq!(decl.path(), SHAPES);
        assert_eq!(decl.file, "shapes.go");
    }

    let describe = index.find_by_id(&id("Describe")).expect("registered");
    assert_eq!(describe.name, "Describe");
    assert_eq!(describe.params, vec!["s"]);
    let area = index.find_by_id(&id("Square.Area")).expect("registered");
    assert_eq!(area.params, vec!["scale"]);
}

#[test]
fn test_pointer_marker_is_insignificant() {
    let program = shapes();
    let index = build(&program);
    let bare = index.find_by_id(&id("Circle")).expect("registered");
    let pointer = index.find_by_id(&format!("*{}", id("Circle"))).expect("registered");
    assert_eq!(bare.decl_id, pointer.decl_id);
    assert!(index.find_by_id(&format!("**{}", id("Circle"))).is_some());
}

#[test]
fn test_type_declaration_found_by_static_type_id() {
    let program = shapes();
    let index = build(&program);
    let circle = index.find_by_id(&id("Circle")).expect("registered");
    let static_id = program.type_string(circle.ty().expect("typed"));
    let by_type = index.find_by_id(&static_id).expect("aliased");
    assert_eq!(by_type.decl_id, circle.decl_id);
}

#[test]
fn test_canonical_id_wins_over_alias() {
    let program = shapes();
    let index = build(&program);
    // `type Round = Circle` has the static type of Circle.
    let round = index.find_by_id(&id("Round")).expect("registered");
    assert_eq!(round.name, "Round");
    let circle = index.find_by_id(&id("Circle")).expect("registered");
    assert_eq!(circle.name, "Circle");
}

#[test]
fn test_alias_of_basic_type_resolves_through_alias_map() {
    let mut b = ProgramBuilder::new();
    let int = b.basic("int");
    b.package("p").alias("Count", int);
    let program = b.finish();
    let index = build(&program);
    let decl = index.find_by_id("int").expect("aliased");
    assert_eq!(decl.id, "p Count");
}

#[test]
fn test_duplicate_ids_are_suffixed() {
    let mut b = ProgramBuilder::new();
    {
        let mut pkg = b.package("p");
        pkg.func("init", FnSig::new(), |_| {});
        pkg.file("second.go").func("init", FnSig::new(), |_| {});
    }
    let program = b.finish();
    let index = build(&program);
    let first = index.find_by_id("p init").expect("first init");
    let second = index.find_by_id("p init#2").expect("second init");
    assert_ne!(first.decl_id, second.decl_id);
    assert_eq!(first.file, "p.go");
    assert_eq!(second.file, "second.go");
}

#[test]
fn test_unknown_ids_miss() {
    let program = shapes();
    let index = build(&program);
    assert!(index.find_by_id("nowhere Nothing").is_none());
    assert!(index.find_by_id("").is_none());
}

// =============================================================================
// Export rules
// =============================================================================

#[test]
fn test_methods_and_interfaces_are_never_exported() {
    let program = shapes();
    let index = build(&program);
    for decl in index.declarations() {
        if matches!(decl.kind, DeclKind::Method | DeclKind::Interface) {
            assert!(!decl.exported, "{} must not be exported", decl.id);
        }
    }
    assert!(index.find_by_id(&id("Circle")).expect("registered").exported);
    assert!(index.find_by_id(&id("Describe")).expect("registered").exported);
    assert!(!index.find_by_id(&id("helper")).expect("registered").exported);
}

#[test]
fn test_entry_point_is_always_exported() {
    let program = shapes();
    let index = build(&program);
    let main = index.find_by_id(&id("main")).expect("registered");
    assert_eq!(main.kind, DeclKind::Function);
    assert!(main.exported);
}

#[test]
fn test_configured_entry_point_is_exported() {
    let program = shapes();
    let options = IndexOptions::default().with_entry_point("helper");
    let index = SymbolIndex::build(&program, options).expect("program indexes");
    assert!(index.find_by_id(&id("helper")).expect("registered").exported);
    assert!(!index.find_by_id(&id("main")).expect("registered").exported);
}

#[test]
fn test_entry_point_method_is_not_exported() {
    let mut b = ProgramBuilder::new();
    {
        let mut pkg = b.package("p");
        let server = pkg.struct_named("Server", &[]);
        pkg.method(Recv::value("s", server), "main", FnSig::new(), |_| {});
    }
    let program = b.finish();
    let index = build(&program);
    assert!(!index.find_by_id("p Server.main").expect("registered").exported);
}

#[test]
fn test_omitted_functions_have_no_body() {
    let program = shapes();
    let index = build(&program);
    assert!(index.find_by_id(&id("now")).expect("registered").omitted());
    assert!(!index.find_by_id(&id("helper")).expect("registered").omitted());
    assert!(!index.find_by_id(&id("Unit")).expect("registered").omitted());
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn test_find_by_object_ignores_objects_without_identity() {
    let program = shapes();
    let index = build(&program);
    let main = index.find_by_id(&id("main")).expect("registered");
    assert!(index.find_by_object(main.object).is_some());

    let builtin = gojs_model::Object {
        kind: gojs_model::ObjectKind::Builtin,
        name: "len".to_string(),
        pkg: None,
        ty: None,
        scope: gojs_model::ObjectScope::Universe,
    };
    assert!(index.find_by_object(&builtin).is_none());
}

#[test]
fn test_find_by_node_recurses_through_star_and_selector() {
    let program = shapes();
    let index = build(&program);
    let info = program.info_for(SHAPES).expect("package exists");
    let grow = index.find_by_id(&id("Circle.Grow")).expect("registered");
    let recv = grow
        .node
        .as_func()
        .and_then(|func| func.recv.as_ref())
        .expect("method receiver");
    // `*Circle`
    assert!(matches!(recv.ty.kind, ExprKind::Star(_)));
    let found = index.find_by_node(info, &recv.ty).expect("resolves");
    assert_eq!(found.id, id("Circle"));

    let main = index.find_by_id(&id("main")).expect("registered");
    let body = main.node.as_func().and_then(|f| f.body.as_ref()).expect("body");
    let gojs_model::Stmt::Expr(call) = &body.stmts[1] else {
        panic!("expected call statement");
    };
    let ExprKind::Call { fun, .. } = &call.kind else {
        panic!("expected call");
    };
    assert_eq!(index.find_by_node(info, fun).map(|d| d.id.as_str()), Some(id("Describe").as_str()));
}

#[test]
fn test_find_by_node_resolves_qualified_reference() {
    let mut b = ProgramBuilder::new();
    b.package("lib").func("Helper", FnSig::new(), |_| {});
    let mut reference = None;
    {
        let mut app = b.package("app");
        app.import("lib");
        app.func("main", FnSig::new(), |body| {
            let callee = body.qualified("lib", "Helper");
            reference = Some(callee.clone());
            let call = body.call(callee, vec![]);
            body.expr(call);
        });
    }
    let program = b.finish();
    let index = build(&program);
    let info = program.info_for("app").expect("package exists");
    let found = index
        .find_by_node(info, &reference.expect("built"))
        .expect("resolves");
    assert_eq!(found.id, "lib Helper");
}

#[test]
fn test_find_by_node_misses_literals() {
    let program = shapes();
    let index = build(&program);
    let info = program.info_for(SHAPES).expect("package exists");
    let pi = index.find_by_id(&id("Pi")).expect("registered");
    let DeclNode::Value { spec, .. } = pi.node else {
        panic!("expected value spec");
    };
    assert!(index.find_by_node(info, &spec.values[0]).is_none());
}

// =============================================================================
// Imports
// =============================================================================

#[test]
fn test_imports_one_entry_per_import_statement() {
    let program = shapes();
    let index = build(&program);
    let imports = index.imports(SHAPES).expect("package imports");
    assert_eq!(imports.len(), 2);
    assert_eq!(imports.get("fmt").map(String::as_str), Some("fmt"));
    assert_eq!(imports.get("m").map(String::as_str), Some("math"));
    assert!(index.imports("b").is_none());
}

#[test]
fn test_unaliased_import_defaults_to_last_segment() {
    let mut b = ProgramBuilder::new();
    b.package("app").import("github.com/acme/geometry/vec");
    let program = b.finish();
    let index = build(&program);
    let imports = index.imports("app").expect("package imports");
    assert_eq!(
        imports.get("vec").map(String::as_str),
        Some("github.com/acme/geometry/vec")
    );
}

// =============================================================================
// Interfaces and methods
// =============================================================================

#[test]
fn test_implemented_by_is_structural() {
    let program = shapes();
    let index = build(&program);
    let found = index.implemented_by(&id("Shape"), "Area");
    let found = ids(&found);
    assert!(found.contains(&id("Circle.Area").as_str()));
    // Square.Area takes a parameter, so Square is not a Shape.
    assert!(!found.contains(&id("Square.Area").as_str()));
    // Only *Rect has Area, and *Rect is the recorded receiver.
    assert!(found.contains(&id("Rect.Area").as_str()));
    assert_eq!(found.len(), 2);
}

#[test]
fn test_implemented_by_two_package_scenario() {
    let program = two_packages();
    let index = build(&program);
    let found = index.implemented_by("a Shape", "Area");
    assert_eq!(ids(&found), vec!["b Circle.Area"]);
    assert_eq!(ids(&index.methods("b Circle")), vec!["b Circle.Area"]);
}

#[test]
fn test_implemented_by_unknown_interface_or_method_is_empty() {
    let program = shapes();
    let index = build(&program);
    assert!(index.implemented_by(&id("Circle"), "Area").is_empty());
    assert!(index.implemented_by(&id("Shape"), "Perimeter").is_empty());
}

#[test]
fn test_implemented_by_type_matches_named_lookup() {
    let program = shapes();
    let index = build(&program);
    let iface = index.interface(&id("Shape")).expect("interface shape");
    let by_type = index.implemented_by_type(iface, "Area");
    let by_id = index.implemented_by(&id("Shape"), "Area");
    assert_eq!(ids(&by_type), ids(&by_id));
}

#[test]
fn test_methods_in_declaration_order() {
    let program = shapes();
    let index = build(&program);
    assert_eq!(ids(&index.methods(&id("Circle"))), vec![id("Circle.Area")]);
    assert_eq!(
        ids(&index.methods(&format!("*{}", id("Circle")))),
        vec![id("Circle.Grow")]
    );
}

#[test]
fn test_methods_fall_back_to_pointer_receiver() {
    let program = shapes();
    let index = build(&program);
    assert_eq!(ids(&index.methods(&id("Rect"))), vec![id("Rect.Area")]);
    assert!(index.methods(&id("Shape")).is_empty());
}

#[test]
fn test_pointer_methods_do_not_fall_back_to_value_receiver() {
    let program = shapes();
    let index = build(&program);
    assert_eq!(ids(&index.methods(&id("Square"))), vec![id("Square.Area")]);
    assert!(index.methods(&format!("*{}", id("Square"))).is_empty());
    assert!(index.method_ids(&format!("*{}", id("Square"))).is_empty());
}

// =============================================================================
// Runtime package
// =============================================================================

#[test]
fn test_runtime_functions_by_bare_name() {
    let program = with_runtime();
    let options = IndexOptions::default().with_runtime_package(RUNTIME);
    let index = SymbolIndex::build(&program, options).expect("program indexes");
    let alloc = index.runtime("Alloc").expect("runtime function");
    assert_eq!(alloc.id, format!("{RUNTIME} Alloc"));
    assert!(index.runtime("panicIndex").is_some());
    let len = index.runtime("Len").expect("runtime method");
    assert_eq!(len.id, format!("{RUNTIME} Buffer.Len"));
    assert_eq!(len.kind, DeclKind::Method);
    assert!(index.runtime("main").is_none());
}

#[test]
fn test_runtime_name_collision_keeps_last_indexed() {
    let mut b = ProgramBuilder::new();
    let int = b.basic("int");
    {
        let mut runtime = b.package(RUNTIME);
        let buffer = runtime.struct_named("Buffer", &[]);
        runtime.method(Recv::value("b", buffer), "Len", FnSig::new().result(int), |body| {
            let zero = body.int(0);
            body.ret(vec![zero]);
        });
        runtime.func("Len", FnSig::new().result(int), |body| {
            let one = body.int(1);
            body.ret(vec![one]);
        });
    }
    let program = b.finish();
    let options = IndexOptions::default().with_runtime_package(RUNTIME);
    let index = SymbolIndex::build(&program, options).expect("program indexes");
    let len = index.runtime("Len").expect("runtime function");
    assert_eq!(len.id, format!("{RUNTIME} Len"));
    assert_eq!(len.kind, DeclKind::Function);
}

#[test]
fn test_runtime_disabled_by_default() {
    let program = with_runtime();
    let index = build(&program);
    assert!(index.runtime("Alloc").is_none());
}

#[test]
fn test_missing_runtime_package_is_an_error() {
    let program = shapes();
    let options = IndexOptions::default().with_runtime_package(RUNTIME);
    let err = SymbolIndex::build(&program, options).unwrap_err();
    assert!(matches!(err, IndexError::UnresolvedRuntime { ref path, .. } if path == RUNTIME));
}

#[test]
fn test_malformed_runtime_path_is_an_error() {
    let program = with_runtime();
    let options = IndexOptions::default().with_runtime_package("acme//runtime");
    let err = SymbolIndex::build(&program, options).unwrap_err();
    assert!(matches!(err, IndexError::UnresolvedRuntime { .. }));
}

// =============================================================================
// Construction errors
// =============================================================================

#[test]
fn test_unhandled_declaration_kind_is_an_error() {
    let mut b = ProgramBuilder::new();
    b.package("p").bad_decl();
    let program = b.finish();
    let err = SymbolIndex::build(&program, IndexOptions::default()).unwrap_err();
    let IndexError::UnhandledDecl { kind, file, .. } = &err else {
        panic!("expected UnhandledDecl, got {err:?}");
    };
    assert_eq!(*kind, "BadDecl");
    assert_eq!(file, "p.go");
    assert!(err.to_string().contains("BadDecl"));
}

#[test]
fn test_interface_with_non_interface_static_type_is_an_error() {
    let mut b = ProgramBuilder::new();
    let int = b.basic("int");
    b.package("p").interface("Broken", &[]);
    assert!(b.override_spec_type("p", "Broken", int));
    let program = b.finish();
    let err = SymbolIndex::build(&program, IndexOptions::default()).unwrap_err();
    let IndexError::NotAnInterface {
        name,
        span,
        name_span,
        ..
    } = &err
    else {
        panic!("expected NotAnInterface, got {err:?}");
    };
    assert_eq!(name, "Broken");
    assert_ne!(span, name_span);

    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.file, "p.go");
    assert_eq!(diagnostic.start, span.start);
    assert_eq!(diagnostic.related_information.len(), 1);
    let related = &diagnostic.related_information[0];
    assert_eq!(related.file, "p.go");
    assert_eq!(related.start, name_span.start);
    assert_eq!(related.message_text, "Interface 'Broken' is declared here.");
}
