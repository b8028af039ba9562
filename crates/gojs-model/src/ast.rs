//! Parsed declarations of the whole-program model.
//!
//! Every node that the type checker annotates carries a [`NodeId`]; the
//! per-package [`TypeInfo`](crate::TypeInfo) maps those ids to static types
//! and resolved objects. Identifier expressions share the id of their
//! [`Ident`].

use gojs_common::Span;
use smallvec::SmallVec;

/// Program-wide unique identity of an AST node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    pub id: NodeId,
    pub name: String,
    pub span: Span,
}

impl Ident {
    /// The blank identifier `_` never declares or references anything.
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

// =============================================================================
// Declarations
// =============================================================================

/// A top-level declaration of a source file.
#[derive(Clone, Debug, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
    /// A declaration the parser could not classify.
    Bad(BadDecl),
}

impl Decl {
    /// Node kind name used when reporting errors about this declaration.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Decl::Func(_) => "FuncDecl",
            Decl::Gen(_) => "GenDecl",
            Decl::Bad(_) => "BadDecl",
        }
    }

    pub const fn span(&self) -> Span {
        match self {
            Decl::Func(f) => f.span,
            Decl::Gen(g) => g.span,
            Decl::Bad(b) => b.span,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FuncDecl {
    pub id: NodeId,
    /// Receiver of a method; `None` for plain functions.
    pub recv: Option<Field>,
    pub name: Ident,
    pub ty: FuncType,
    /// `None` for functions implemented outside the program.
    pub body: Option<Block>,
    pub span: Span,
}

impl FuncDecl {
    pub fn is_method(&self) -> bool {
        self.recv.is_some()
    }

    /// Parameter names in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.ty
            .params
            .iter()
            .flat_map(|field| field.names.iter().map(|n| n.name.as_str()))
    }
}

/// Keyword introducing a grouped declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclToken {
    Import,
    Const,
    Type,
    Var,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GenDecl {
    pub id: NodeId,
    pub tok: DeclToken,
    pub specs: Vec<Spec>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportSpec {
    /// Explicit alias (`import f "fmt"`).
    pub name: Option<Ident>,
    /// Quoted import path literal, as written.
    pub path: String,
    pub span: Span,
}

impl ImportSpec {
    /// Import path with the surrounding quotes removed.
    pub fn unquoted_path(&self) -> &str {
        self.path.trim_matches(|c| c == '"' || c == '`')
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValueSpec {
    pub names: SmallVec<[Ident; 1]>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeSpec {
    pub name: Ident,
    /// `type T = U` rather than `type T U`.
    pub assign: bool,
    pub ty: Expr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BadDecl {
    pub span: Span,
}

// =============================================================================
// Fields and signatures
// =============================================================================

/// A parameter, result, struct field, receiver or interface method.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub names: SmallVec<[Ident; 1]>,
    pub ty: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FuncType {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    String,
    Char,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Ident(Ident),
    BasicLit {
        kind: LitKind,
        value: String,
    },
    /// Pointer type `*T` or dereference `*x`.
    Star(Box<Expr>),
    Unary {
        op: String,
        x: Box<Expr>,
    },
    Binary {
        op: String,
        x: Box<Expr>,
        y: Box<Expr>,
    },
    Selector {
        x: Box<Expr>,
        sel: Ident,
    },
    Call {
        fun: Box<Expr>,
        args: Vec<Expr>,
    },
    Composite {
        ty: Option<Box<Expr>>,
        elts: Vec<Expr>,
    },
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    FuncLit {
        ty: FuncType,
        body: Block,
    },
    Index {
        x: Box<Expr>,
        index: Box<Expr>,
    },
    Paren(Box<Expr>),
    ArrayType {
        len: Option<Box<Expr>>,
        elem: Box<Expr>,
    },
    MapType {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    FuncType(FuncType),
    StructType(Vec<Field>),
    InterfaceType(Vec<Field>),
}

impl Expr {
    pub fn as_ident(&self) -> Option<&Ident> {
        match &self.kind {
            ExprKind::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Assign {
        lhs: Vec<Expr>,
        rhs: Vec<Expr>,
        /// `:=` rather than `=`.
        define: bool,
    },
    Decl(GenDecl),
    Return(Vec<Expr>),
    Block(Block),
    If {
        cond: Expr,
        then: Block,
        els: Option<Box<Stmt>>,
    },
    For {
        cond: Option<Expr>,
        body: Block,
    },
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        x: Expr,
        body: Block,
    },
    Defer(Expr),
    Go(Expr),
}
