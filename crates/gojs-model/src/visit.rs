//! AST traversal.
//!
//! Implement [`Visitor`] and drive it with the `walk_*` functions. Returning
//! `false` from a `visit_*` hook skips the children of that node.

use crate::ast::{Block, Decl, Expr, ExprKind, Field, FuncDecl, FuncType, GenDecl, Ident, Spec, Stmt};

pub trait Visitor {
    fn visit_ident(&mut self, _ident: &Ident) {}

    fn visit_expr(&mut self, _expr: &Expr) -> bool {
        true
    }

    fn visit_stmt(&mut self, _stmt: &Stmt) -> bool {
        true
    }
}

pub fn walk_decl<V: Visitor + ?Sized>(v: &mut V, decl: &Decl) {
    match decl {
        Decl::Func(func) => walk_func_decl(v, func),
        Decl::Gen(gen_decl) => walk_gen_decl(v, gen_decl),
        Decl::Bad(_) => {}
    }
}

/// Receiver, signature and body of a function declaration.
/// The declared name itself is not visited.
pub fn walk_func_decl<V: Visitor + ?Sized>(v: &mut V, func: &FuncDecl) {
    if let Some(recv) = &func.recv {
        walk_field(v, recv);
    }
    walk_func_type(v, &func.ty);
    if let Some(body) = &func.body {
        walk_block(v, body);
    }
}

pub fn walk_gen_decl<V: Visitor + ?Sized>(v: &mut V, decl: &GenDecl) {
    for spec in &decl.specs {
        walk_spec(v, spec);
    }
}

/// Type and initializer expressions of a spec. Declared names are not
/// visited; import specs have nothing to walk.
pub fn walk_spec<V: Visitor + ?Sized>(v: &mut V, spec: &Spec) {
    match spec {
        Spec::Import(_) => {}
        Spec::Value(value) => {
            if let Some(ty) = &value.ty {
                walk_expr(v, ty);
            }
            for expr in &value.values {
                walk_expr(v, expr);
            }
        }
        Spec::Type(ty) => walk_expr(v, &ty.ty),
    }
}

pub fn walk_func_type<V: Visitor + ?Sized>(v: &mut V, ty: &FuncType) {
    for field in ty.params.iter().chain(&ty.results) {
        walk_field(v, field);
    }
}

/// Only the field's type is walked; field names are declarations.
pub fn walk_field<V: Visitor + ?Sized>(v: &mut V, field: &Field) {
    walk_expr(v, &field.ty);
}

pub fn walk_block<V: Visitor + ?Sized>(v: &mut V, block: &Block) {
    for stmt in &block.stmts {
        walk_stmt(v, stmt);
    }
}

pub fn walk_stmt<V: Visitor + ?Sized>(v: &mut V, stmt: &Stmt) {
    if !v.visit_stmt(stmt) {
        return;
    }
    match stmt {
        Stmt::Expr(expr) | Stmt::Defer(expr) | Stmt::Go(expr) => walk_expr(v, expr),
        Stmt::Assign { lhs, rhs, .. } => {
            for expr in lhs.iter().chain(rhs) {
                walk_expr(v, expr);
            }
        }
        Stmt::Decl(decl) => walk_gen_decl(v, decl),
        Stmt::Return(results) => {
            for expr in results {
                walk_expr(v, expr);
            }
        }
        Stmt::Block(block) => walk_block(v, block),
        Stmt::If { cond, then, els } => {
            walk_expr(v, cond);
            walk_block(v, then);
            if let Some(els) = els {
                walk_stmt(v, els);
            }
        }
        Stmt::For { cond, body } => {
            if let Some(cond) = cond {
                walk_expr(v, cond);
            }
            walk_block(v, body);
        }
        Stmt::Range {
            key,
            value,
            x,
            body,
        } => {
            for expr in [key, value].into_iter().flatten() {
                walk_expr(v, expr);
            }
            walk_expr(v, x);
            walk_block(v, body);
        }
    }
}

pub fn walk_expr<V: Visitor + ?Sized>(v: &mut V, expr: &Expr) {
    if !v.visit_expr(expr) {
        return;
    }
    match &expr.kind {
        ExprKind::Ident(ident) => v.visit_ident(ident),
        ExprKind::BasicLit { .. } => {}
        ExprKind::Star(x) | ExprKind::Paren(x) => walk_expr(v, x),
        ExprKind::Unary { x, .. } => walk_expr(v, x),
        ExprKind::Binary { x, y, .. } => {
            walk_expr(v, x);
            walk_expr(v, y);
        }
        ExprKind::Selector { x, sel } => {
            walk_expr(v, x);
            v.visit_ident(sel);
        }
        ExprKind::Call { fun, args } => {
            walk_expr(v, fun);
            for arg in args {
                walk_expr(v, arg);
            }
        }
        ExprKind::Composite { ty, elts } => {
            if let Some(ty) = ty {
                walk_expr(v, ty);
            }
            for elt in elts {
                walk_expr(v, elt);
            }
        }
        ExprKind::KeyValue { key, value } => {
            walk_expr(v, key);
            walk_expr(v, value);
        }
        ExprKind::FuncLit { ty, body } => {
            walk_func_type(v, ty);
            walk_block(v, body);
        }
        ExprKind::Index { x, index } => {
            walk_expr(v, x);
            walk_expr(v, index);
        }
        ExprKind::ArrayType { len, elem } => {
            if let Some(len) = len {
                walk_expr(v, len);
            }
            walk_expr(v, elem);
        }
        ExprKind::MapType { key, value } => {
            walk_expr(v, key);
            walk_expr(v, value);
        }
        ExprKind::FuncType(ty) => walk_func_type(v, ty),
        ExprKind::StructType(fields) | ExprKind::InterfaceType(fields) => {
            for field in fields {
                walk_field(v, field);
            }
        }
    }
}
