use super::*;
use crate::options::IndexOptions;
use crate::test_fixtures::{SHAPES, shapes, two_packages};
use rayon::prelude::*;

fn interface<'a>(index: &'a SymbolIndex<'a>, id: &str) -> Result<InterfaceDef<'a>, IndexError> {
    let decl = index.find_by_id(id).expect("registered");
    let spec = decl.node.as_type_spec().expect("type spec");
    InterfaceDef::new(index, decl.package, decl.object, spec)
}

#[test]
fn test_new_collects_identity_and_methods() {
    let program = two_packages();
    let index = SymbolIndex::build(&program, IndexOptions::default()).expect("program indexes");
    let shape = interface(&index, "a Shape").expect("interface");
    assert_eq!(shape.id(), "a Shape");
    assert_eq!(shape.name(), "Shape");
    assert_eq!(shape.path(), "a");
    assert_eq!(shape.methods(), &["Area"]);
    assert_eq!(shape.node().name.name, "Shape");
    assert_eq!(shape.kind(), DeclKind::Interface);
    assert_eq!(shape.decl_id(), index.find_by_id("a Shape").expect("registered").decl_id);
    assert!(shape.ty().is_some_and(|ty| index.program().types().is_interface(ty)));
}

#[test]
fn test_contract_constants() {
    let program = two_packages();
    let index = SymbolIndex::build(&program, IndexOptions::default()).expect("program indexes");
    let shape = interface(&index, "a Shape").expect("interface");
    assert!(!shape.exported());
    assert!(!shape.omitted());
    assert!(!shape.from_runtime());
    assert!(shape.dependencies_of("Area").is_empty());
    assert!(shape.dependencies_of("Missing").is_empty());
}

#[test]
fn test_implemented_by_structural_match() {
    let program = two_packages();
    let index = SymbolIndex::build(&program, IndexOptions::default()).expect("program indexes");
    let shape = interface(&index, "a Shape").expect("interface");
    let found: Vec<&str> = shape
        .implemented_by("Area")
        .iter()
        .map(|decl| decl.id.as_str())
        .collect();
    assert_eq!(found, vec!["b Circle.Area"]);
    assert!(shape.implemented_by("Perimeter").is_empty());
}

#[test]
fn test_implemented_by_excludes_mismatched_signature() {
    let program = shapes();
    let index = SymbolIndex::build(&program, IndexOptions::default()).expect("program indexes");
    let shape = interface(&index, &format!("{SHAPES} Shape")).expect("interface");
    let found: Vec<String> = shape
        .implemented_by("Area")
        .iter()
        .map(|decl| decl.id.clone())
        .collect();
    assert!(found.contains(&format!("{SHAPES} Circle.Area")));
    assert!(!found.contains(&format!("{SHAPES} Square.Area")));
}

#[test]
fn test_dependencies_process_once_and_stay_empty() {
    let program = two_packages();
    let index = SymbolIndex::build(&program, IndexOptions::default()).expect("program indexes");
    let shape = interface(&index, "a Shape").expect("interface");
    assert!(!shape.is_processed());
    assert!(shape.dependencies().is_empty());
    assert!(shape.is_processed());
    assert!(shape.dependencies().is_empty());
}

#[test]
fn test_concurrent_first_access_is_safe() {
    let program = two_packages();
    let index = SymbolIndex::build(&program, IndexOptions::default()).expect("program indexes");
    let shape = interface(&index, "a Shape").expect("interface");
    let total: usize = (0..64)
        .into_par_iter()
        .map(|_| shape.dependencies().len())
        .sum();
    assert_eq!(total, 0);
    assert!(shape.is_processed());
}

#[test]
fn test_imports_merge_with_package_entries_winning() {
    let program = shapes();
    let index = SymbolIndex::build(&program, IndexOptions::default()).expect("program indexes");
    let shape = interface(&index, &format!("{SHAPES} Shape"))
        .expect("interface")
        .with_local_import("m", "github.com/acme/othermath")
        .with_local_import("geo", "github.com/acme/geo");
    let imports = shape.imports();
    assert_eq!(imports.get("m").map(String::as_str), Some("math"));
    assert_eq!(imports.get("fmt").map(String::as_str), Some("fmt"));
    assert_eq!(imports.get("geo").map(String::as_str), Some("github.com/acme/geo"));
    assert_eq!(imports.len(), 3);
}

#[test]
fn test_non_interface_spec_is_rejected() {
    let program = two_packages();
    let index = SymbolIndex::build(&program, IndexOptions::default()).expect("program indexes");
    let err = interface(&index, "b Circle").err().expect("rejected");
    assert!(matches!(err, IndexError::NotAnInterface { ref name, .. } if name == "Circle"));
}
