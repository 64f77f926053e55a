//! Syntax tree handed over by the host front end.
//!
//! Every node category the verifier understands is a variant of a closed
//! enum. Expressions carry the resolved type the host computed for them, so
//! the tree doubles as the "type of expression" half of the oracle.
//!
//! Anything the front end cannot express with these variants is sent as
//! [`Stmt::Unsupported`] (statements) or [`ExprKind::Opaque`] (expressions).

use serde::{Deserialize, Serialize};

use super::program::{ObjectId, TypeId};

/// 1-indexed source position inside a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

impl Pos {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A single comment, including its `//` or `/* */` delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub pos: Pos,
    pub text: String,
}

/// One source file of a unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    /// Every comment in the file, attached or free-floating.
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub decls: Vec<Decl>,
}

/// Top-level declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "decl", rename_all = "snake_case")]
pub enum Decl {
    /// `type`, `const` or `var` group.
    Gen(GenDecl),
    Func(FuncDecl),
}

/// A declaration group: `type ( A ...; B ... )`, `const ( ... )`, or a single spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenDecl {
    pub pos: Pos,
    /// Doc comment of the whole group.
    #[serde(default)]
    pub doc: Vec<Comment>,
    #[serde(default)]
    pub specs: Vec<Spec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "spec", rename_all = "snake_case")]
pub enum Spec {
    Type(TypeSpec),
    Value(ValueSpec),
}

/// `type Name Underlying`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSpec {
    pub pos: Pos,
    pub name: String,
    /// The type-name object the declaration defines.
    pub object: ObjectId,
    /// Leading doc comment.
    #[serde(default)]
    pub doc: Vec<Comment>,
    /// Trailing same-line comment.
    #[serde(default)]
    pub comment: Vec<Comment>,
}

/// `var a, b T = x, y` or `const a T = x`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueSpec {
    pub pos: Pos,
    #[serde(default)]
    pub names: Vec<String>,
    /// Resolved type of the explicit type expression, when one is written.
    #[serde(default)]
    pub ty: Option<TypeId>,
    #[serde(default)]
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncDecl {
    pub pos: Pos,
    pub name: String,
    /// One entry per result slot, named or not.
    #[serde(default)]
    pub results: Vec<TypeId>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "stmt", rename_all = "snake_case")]
pub enum Stmt {
    /// Local `var`/`const`/`type` declaration.
    Decl(GenDecl),
    Expr {
        expr: Expr,
    },
    /// `a, b = x, y` or `a := x`.
    Assign {
        pos: Pos,
        lhs: Vec<Expr>,
        rhs: Vec<Expr>,
        #[serde(default)]
        define: bool,
    },
    /// Value dispatch: `switch tag { case ...: }`.
    Switch {
        pos: Pos,
        #[serde(default)]
        init: Option<Box<Stmt>>,
        #[serde(default)]
        tag: Option<Expr>,
        #[serde(default)]
        clauses: Vec<CaseClause>,
    },
    /// Type-narrowing dispatch: `switch v := x.(type) { case T: }`.
    TypeSwitch {
        pos: Pos,
        #[serde(default)]
        init: Option<Box<Stmt>>,
        /// Either `v := x.(type)` or the bare expression statement `x.(type)`.
        guard: Box<Stmt>,
        #[serde(default)]
        clauses: Vec<TypeClause>,
    },
    Return {
        pos: Pos,
        #[serde(default)]
        results: Vec<Expr>,
    },
    /// `ch <- value`
    Send {
        pos: Pos,
        chan: Expr,
        value: Expr,
    },
    Block {
        #[serde(default)]
        stmts: Vec<Stmt>,
    },
    If {
        pos: Pos,
        #[serde(default)]
        init: Option<Box<Stmt>>,
        cond: Expr,
        #[serde(default)]
        then: Vec<Stmt>,
        #[serde(default)]
        otherwise: Option<Box<Stmt>>,
    },
    For {
        pos: Pos,
        #[serde(default)]
        init: Option<Box<Stmt>>,
        #[serde(default)]
        cond: Option<Expr>,
        #[serde(default)]
        post: Option<Box<Stmt>>,
        #[serde(default)]
        body: Vec<Stmt>,
    },
    Range {
        pos: Pos,
        expr: Expr,
        #[serde(default)]
        body: Vec<Stmt>,
    },
    Go {
        call: Expr,
    },
    Defer {
        call: Expr,
    },
    Labeled {
        label: String,
        body: Box<Stmt>,
    },
    /// `break`, `continue`, `goto`, `fallthrough`.
    Branch {
        pos: Pos,
    },
    /// A statement category the front end could not map onto this tree.
    Unsupported {
        pos: Pos,
        what: String,
    },
}

/// One clause of a value dispatch. No labels means the catch-all clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseClause {
    pub pos: Pos,
    #[serde(default)]
    pub labels: Vec<Expr>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

impl CaseClause {
    pub fn is_default(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One clause of a type-narrowing dispatch. No labels means the catch-all clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeClause {
    pub pos: Pos,
    #[serde(default)]
    pub labels: Vec<TypeLabel>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

/// A type written as a type-switch label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeLabel {
    pub pos: Pos,
    #[serde(default)]
    pub ty: Option<TypeId>,
    /// Source text, used only when the label cannot be resolved.
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expr {
    pub pos: Pos,
    /// Resolved type of the expression, if the oracle produced one.
    #[serde(default)]
    pub ty: Option<TypeId>,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
    Bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum ExprKind {
    /// Literal exactly as written, quotes included.
    Lit { lit: LitKind, value: String },
    Ident {
        name: String,
        #[serde(default)]
        object: Option<ObjectId>,
    },
    /// `base.name`, e.g. a qualified member `pkg.Alpha` or a field `s.Value`.
    Selector {
        base: Box<Expr>,
        name: String,
        #[serde(default)]
        object: Option<ObjectId>,
    },
    /// `T{...}`
    Composite {
        #[serde(default)]
        elems: Vec<Expr>,
    },
    /// Function call or conversion; only calls whose callee resolves to a
    /// signature pass arguments.
    Call {
        func: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
        /// `f(xs...)`
        #[serde(default)]
        ellipsis: bool,
    },
    /// `base.(T)`; `ty` on the enclosing expression is `T`, absent for `.(type)`.
    TypeAssert { base: Box<Expr> },
    FuncLit {
        #[serde(default)]
        results: Vec<TypeId>,
        #[serde(default)]
        body: Vec<Stmt>,
    },
    Unary { op: String, operand: Box<Expr> },
    Binary {
        op: String,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Paren { inner: Box<Expr> },
    Index { base: Box<Expr>, index: Box<Expr> },
    KeyValue { key: Box<Expr>, value: Box<Expr> },
    /// Anything else; children are still walked.
    Opaque {
        #[serde(default)]
        text: String,
        #[serde(default)]
        children: Vec<Expr>,
    },
}

impl ExprKind {
    /// Short category name for internal error messages.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Lit { .. } => "literal",
            Self::Ident { .. } => "identifier",
            Self::Selector { .. } => "selector",
            Self::Composite { .. } => "composite literal",
            Self::Call { .. } => "call",
            Self::TypeAssert { .. } => "type assertion",
            Self::FuncLit { .. } => "function literal",
            Self::Unary { .. } => "unary expression",
            Self::Binary { .. } => "binary expression",
            Self::Paren { .. } => "parenthesized expression",
            Self::Index { .. } => "index expression",
            Self::KeyValue { .. } => "key-value pair",
            Self::Opaque { .. } => "opaque expression",
        }
    }
}
