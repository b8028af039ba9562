use crate::pipeline::{AnalysisReport, analyze, analyze_with_runtime};
use gojs_index::{IndexError, IndexOptions};
use gojs_model::{FnSig, Program, ProgramBuilder, Recv};
use rayon::prelude::*;

/// ```text
/// package geom
///
/// type Shape interface { Area() float64 }
/// type Circle struct {}
/// func (c Circle) Area() float64 { return 1 }
/// type Unused struct {}
/// func (u Unused) Area() float64 { return 2 }
/// func Describe(s Shape) float64 { return s.Area() }
/// func Unrelated() {}
/// func Now() int64
///
/// package main
///
/// import "geom"
///
/// func main() { c := geom.Circle{}; geom.Describe(c); geom.Now() }
/// ```
fn app() -> Program {
    let mut b = ProgramBuilder::new();
    let float64 = b.basic("float64");
    let int64 = b.basic("int64");
    let area = b.signature(&[], &[float64]);

    let circle = {
        let mut geom = b.package("geom");
        let shape = geom.interface("Shape", &[("Area", area)]);
        let circle = geom.struct_named("Circle", &[]);
        geom.method(
            Recv::value("c", circle),
            "Area",
            FnSig::new().result(float64),
            |body| {
                let one = body.int(1);
                body.ret(vec![one]);
            },
        );
        let unused = geom.struct_named("Unused", &[]);
        geom.method(
            Recv::value("u", unused),
            "Area",
            FnSig::new().result(float64),
            |body| {
                let two = body.int(2);
                body.ret(vec![two]);
            },
        );
        geom.func(
            "Describe",
            FnSig::new().param("s", shape).result(float64),
            |body| {
                let s = body.name("s");
                let method = body.method(s, shape, "Area");
                let call = body.call(method, vec![]);
                body.ret(vec![call]);
            },
        );
        geom.func("Unrelated", FnSig::new(), |_| {});
        geom.extern_func("Now", FnSig::new().result(int64));
        circle
    };

    {
        let mut main = b.package("main");
        main.import("geom");
        main.func("main", FnSig::new(), |body| {
            let value = body.composite(circle, vec![]);
            body.define("c", Some(circle), value);
            let describe = body.qualified("geom", "Describe");
            let c = body.name("c");
            let call = body.call(describe, vec![c]);
            body.expr(call);
            let now = body.qualified("geom", "Now");
            let call = body.call(now, vec![]);
            body.expr(call);
        });
    }
    b.finish()
}

fn with_runtime() -> Program {
    let mut b = ProgramBuilder::new();
    let int = b.basic("int");
    {
        let mut rt = b.package("rt");
        rt.func("Alloc", FnSig::new().param("n", int).result(int), |body| {
            let n = body.name("n");
            body.ret(vec![n]);
        });
        rt.func("panicIndex", FnSig::new(), |_| {});
    }
    b.package("main").func("main", FnSig::new(), |_| {});
    b.finish()
}

#[test]
fn test_analyze_keeps_what_main_reaches() {
    let program = app();
    let analysis = analyze(&program, IndexOptions::default(), "main").expect("analysis");
    let emitted: Vec<&str> = analysis.emitted().map(|decl| decl.id.as_str()).collect();
    assert_eq!(
        emitted,
        vec![
            "main main",
            "geom Circle",
            "geom Describe",
            "geom Circle.Area",
            "geom Shape",
            "geom Unused.Area",
            "geom Unused",
        ]
    );
    assert!(!analysis.is_reachable("geom Unrelated"));
    assert_eq!(analysis.roots().len(), 1);
    assert_eq!(analysis.entry_package(), "main");
}

#[test]
fn test_omitted_declarations_are_reachable_not_emitted() {
    let program = app();
    let analysis = analyze(&program, IndexOptions::default(), "main").expect("analysis");
    assert!(analysis.is_reachable("geom Now"));
    assert!(analysis.emitted().all(|decl| decl.id != "geom Now"));
    assert_eq!(analysis.reachable().len(), analysis.emitted().count() + 1);
}

#[test]
fn test_unknown_entry_package_reaches_nothing() {
    let program = app();
    let analysis = analyze(&program, IndexOptions::default(), "nowhere").expect("analysis");
    assert!(analysis.roots().is_empty());
    assert!(analysis.reachable().is_empty());
    assert_eq!(analysis.index().len(), 9);
}

#[test]
fn test_runtime_functions_become_roots() {
    let program = with_runtime();
    let options = IndexOptions::default().with_runtime_package("rt");
    let analysis = analyze_with_runtime(&program, options, "main", &["Alloc", "missing"])
        .expect("analysis");
    assert_eq!(analysis.roots().len(), 2);
    assert!(analysis.is_reachable("rt Alloc"));
    assert!(!analysis.is_reachable("rt panicIndex"));
}

#[test]
fn test_construction_errors_propagate() {
    let program = app();
    let options = IndexOptions::default().with_runtime_package("rt");
    let err = analyze(&program, options, "main").err().expect("missing runtime package");
    assert!(matches!(err, IndexError::UnresolvedRuntime { ref path, .. } if path == "rt"));
}

#[test]
fn test_report_serializes_camel_case() {
    let program = app();
    let analysis = analyze(&program, IndexOptions::default(), "main").expect("analysis");
    let report = analysis.report();
    assert_eq!(
        report,
        AnalysisReport {
            entry_package: "main".to_string(),
            declarations: 9,
            reachable: 8,
            emitted: analysis.emitted().map(|decl| decl.id.clone()).collect(),
        }
    );
    let json = serde_json::to_value(&report).expect("serializes");
    assert_eq!(json["entryPackage"], "main");
    assert_eq!(json["declarations"], 9);
    assert_eq!(json["emitted"][0], "main main");
}

#[test]
fn test_analysis_is_shareable_across_threads() {
    let program = app();
    let analysis = analyze(&program, IndexOptions::default(), "main").expect("analysis");
    let hits = (0..64)
        .into_par_iter()
        .filter(|i| {
            let id = if i % 2 == 0 { "geom Circle" } else { "geom Unrelated" };
            analysis.is_reachable(id)
        })
        .count();
    assert_eq!(hits, 32);
}
