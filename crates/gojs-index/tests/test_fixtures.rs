//! Programs shared by the index, definition and reachability tests.

use gojs_model::{FnSig, Program, ProgramBuilder, Recv};

pub(crate) const SHAPES: &str = "github.com/acme/shapes";
pub(crate) const RUNTIME: &str = "github.com/acme/runtime";

/// Package `a` declares `Shape interface { Area() float64 }`; package `b`
/// declares `Circle struct{}` with `func (c Circle) Area() float64`.
pub(crate) fn two_packages() -> Program {
    let mut b = ProgramBuilder::new();
    let float64 = b.basic("float64");
    let area = b.signature(&[], &[float64]);
    b.package("a").interface("Shape", &[("Area", area)]);

    let mut pkg = b.package("b");
    let circle = pkg.struct_named("Circle", &[]);
    pkg.method(
        Recv::value("c", circle),
        "Area",
        FnSig::new().result(float64),
        |body| {
            let one = body.int(1);
            body.ret(vec![one]);
        },
    );
    b.finish()
}

/// One package exercising every declaration kind:
///
/// ```text
/// package shapes
///
/// import "fmt"
/// import m "math"
///
/// type Shape interface { Area() float64 }
/// type Circle struct { R float64 }
/// func (c Circle) Area() float64 { return c.R }
/// func (c *Circle) Grow() {}
/// type Square struct { S float64 }
/// func (s Square) Area(scale float64) float64 { return s.S }
/// type Rect struct {}
/// func (r *Rect) Area() float64 { return 2 }
/// type Round = Circle
/// var Unit Circle
/// const Pi = 3
/// func Describe(s Shape) float64 { return s.Area() }
/// func helper() {}
/// func main() { c := Circle{}; Describe(c) }
/// func now() int64
/// ```
pub(crate) fn shapes() -> Program {
    let mut b = ProgramBuilder::new();
    let float64 = b.basic("float64");
    let int64 = b.basic("int64");
    let area = b.signature(&[], &[float64]);

    let mut pkg = b.package(SHAPES);
    pkg.import("fmt").import_as("m", "math");
    let shape = pkg.interface("Shape", &[("Area", area)]);

    let circle = pkg.struct_named("Circle", &[("R", float64)]);
    pkg.method(
        Recv::value("c", circle),
        "Area",
        FnSig::new().result(float64),
        |body| {
            let c = body.name("c");
            let r = body.field(c, "R");
            body.ret(vec![r]);
        },
    );
    pkg.method(Recv::pointer("c", circle), "Grow", FnSig::new(), |_| {});

    let square = pkg.struct_named("Square", &[("S", float64)]);
    pkg.method(
        Recv::value("s", square),
        "Area",
        FnSig::new().param("scale", float64).result(float64),
        |body| {
            let s = body.name("s");
            let side = body.field(s, "S");
            body.ret(vec![side]);
        },
    );

    let rect = pkg.struct_named("Rect", &[]);
    pkg.method(
        Recv::pointer("r", rect),
        "Area",
        FnSig::new().result(float64),
        |body| {
            let two = body.int(2);
            body.ret(vec![two]);
        },
    );

    pkg.alias("Round", circle);
    pkg.var("Unit", circle);
    pkg.constant("Pi", None, |body| body.int(3));

    pkg.func(
        "Describe",
        FnSig::new().param("s", shape).result(float64),
        |body| {
            let s = body.name("s");
            let method = body.method(s, shape, "Area");
            let call = body.call(method, vec![]);
            body.ret(vec![call]);
        },
    );
    pkg.func("helper", FnSig::new(), |_| {});
    pkg.func("main", FnSig::new(), |body| {
        let value = body.composite(circle, vec![]);
        body.define("c", Some(circle), value);
        let describe = body.name("Describe");
        let c = body.name("c");
        let call = body.call(describe, vec![c]);
        body.expr(call);
    });
    pkg.extern_func("now", FnSig::new().result(int64));
    b.finish()
}

/// A runtime-support package next to a program that uses it.
///
/// ```text
/// package runtime
///
/// func Alloc(n int) int { return n }
/// func panicIndex() {}
/// func (b Buffer) Len() int { return 0 }
/// type Buffer struct {}
///
/// package main
///
/// func main() {}
/// ```
pub(crate) fn with_runtime() -> Program {
    let mut b = ProgramBuilder::new();
    let int = b.basic("int");
    {
        let mut runtime = b.package(RUNTIME);
        let buffer = runtime.struct_named("Buffer", &[]);
        runtime.func(
            "Alloc",
            FnSig::new().param("n", int).result(int),
            |body| {
                let n = body.name("n");
                body.ret(vec![n]);
            },
        );
        runtime.func("panicIndex", FnSig::new(), |_| {});
        runtime.method(
            Recv::value("b", buffer),
            "Len",
            FnSig::new().result(int),
            |body| {
                let zero = body.int(0);
                body.ret(vec![zero]);
            },
        );
    }
    b.package("main").func("main", FnSig::new(), |_| {});
    b.finish()
}
