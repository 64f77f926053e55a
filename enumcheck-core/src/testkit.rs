//! Programmatic snapshot construction for tests.
//!
//! Every node is placed on an explicit line so assertions can name exact
//! positions. Columns default to 2 for statements and to the label column
//! for clause labels.

use crate::syntax::{
    CaseClause, ChanDir, Comment, Decl, Expr, ExprKind, FuncDecl, GenDecl, LitKind, Object,
    ObjectId, ObjectKind, Pos, Program, SourceFile, Spec, Stmt, TypeClause, TypeId, TypeLabel,
    TypeShape, TypeSpec, Unit, ValueSpec,
};

#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_type(&mut self, shape: TypeShape) -> TypeId {
        self.program.types.push(shape);
        TypeId(self.program.types.len() as u32 - 1)
    }

    pub fn basic(&mut self, name: &str) -> TypeId {
        self.push_type(TypeShape::Basic {
            name: name.to_string(),
        })
    }

    pub fn named(&mut self, unit: &str, name: &str, underlying: TypeId) -> TypeId {
        self.push_type(TypeShape::Named {
            name: name.to_string(),
            unit: unit.to_string(),
            underlying,
        })
    }

    pub fn interface(&mut self, display: &str) -> TypeId {
        self.push_type(TypeShape::Interface {
            display: display.to_string(),
        })
    }

    pub fn structure(&mut self, display: &str) -> TypeId {
        self.push_type(TypeShape::Struct {
            display: display.to_string(),
        })
    }

    pub fn chan(&mut self, elem: TypeId) -> TypeId {
        self.push_type(TypeShape::Chan {
            elem,
            dir: ChanDir::Both,
        })
    }

    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        self.push_type(TypeShape::Slice { elem })
    }

    /// Result type of a call returning several values.
    pub fn tuple(&mut self, elems: &[TypeId]) -> TypeId {
        self.push_type(TypeShape::Tuple {
            elems: elems.to_vec(),
        })
    }

    pub fn signature(&mut self, params: &[TypeId], results: &[TypeId], variadic: bool) -> TypeId {
        self.push_type(TypeShape::Signature {
            params: params.to_vec(),
            results: results.to_vec(),
            variadic,
        })
    }

    /// Declares an object without putting it in any unit scope (locals,
    /// parameters, fields).
    pub fn local(&mut self, unit: &str, name: &str, kind: ObjectKind, ty: TypeId) -> ObjectId {
        self.program.objects.push(Object {
            name: name.to_string(),
            kind,
            ty,
            unit: unit.to_string(),
        });
        ObjectId(self.program.objects.len() as u32 - 1)
    }

    /// Declares an object in the unit-scope symbol table.
    pub fn object(&mut self, unit: &str, name: &str, kind: ObjectKind, ty: TypeId) -> ObjectId {
        let id = self.local(unit, name, kind, ty);
        self.unit_mut(unit).scope.push(id);
        id
    }

    pub fn unit(&mut self, path: &str, imports: &[&str]) -> &mut Self {
        let unit = self.unit_mut(path);
        unit.imports = imports.iter().map(|s| s.to_string()).collect();
        self
    }

    fn unit_mut(&mut self, path: &str) -> &mut Unit {
        if let Some(index) = self.program.units.iter().position(|u| u.path == path) {
            return &mut self.program.units[index];
        }
        self.program.units.push(Unit {
            path: path.to_string(),
            ..Unit::default()
        });
        let last = self.program.units.len() - 1;
        &mut self.program.units[last]
    }

    /// Adds a file to `unit`; comments given separately are free-floating.
    pub fn file(&mut self, unit: &str, name: &str, decls: Vec<Decl>, comments: Vec<Comment>) {
        self.unit_mut(unit).files.push(SourceFile {
            name: name.to_string(),
            comments,
            decls,
        });
    }

    pub fn build(self) -> Program {
        self.program
    }
}

pub fn pos(line: u32) -> Pos {
    Pos::new(line, 2)
}

pub fn comment(line: u32, text: &str) -> Comment {
    Comment {
        pos: Pos::new(line, 1),
        text: text.to_string(),
    }
}

/// `type Name ...` with an optional doc and trailing comment.
pub fn type_spec(
    line: u32,
    name: &str,
    object: ObjectId,
    doc: Option<&str>,
    trailing: Option<&str>,
) -> Spec {
    Spec::Type(TypeSpec {
        pos: Pos::new(line, 6),
        name: name.to_string(),
        object,
        doc: doc.map(|d| vec![comment(line - 1, d)]).unwrap_or_default(),
        comment: trailing
            .map(|t| vec![Comment {
                pos: Pos::new(line, 20),
                text: t.to_string(),
            }])
            .unwrap_or_default(),
    })
}

pub fn group(line: u32, doc: Option<&str>, specs: Vec<Spec>) -> Decl {
    Decl::Gen(GenDecl {
        pos: Pos::new(line, 1),
        doc: doc.map(|d| vec![comment(line - 1, d)]).unwrap_or_default(),
        specs,
    })
}

pub fn value_spec(line: u32, names: &[&str], ty: Option<TypeId>, values: Vec<Expr>) -> Spec {
    Spec::Value(ValueSpec {
        pos: Pos::new(line, 2),
        names: names.iter().map(|s| s.to_string()).collect(),
        ty,
        values,
    })
}

pub fn func(line: u32, name: &str, results: &[TypeId], body: Vec<Stmt>) -> Decl {
    Decl::Func(FuncDecl {
        pos: Pos::new(line, 1),
        name: name.to_string(),
        results: results.to_vec(),
        body,
    })
}

pub fn int(line: u32, value: &str) -> Expr {
    Expr {
        pos: Pos::new(line, 10),
        ty: None,
        kind: ExprKind::Lit {
            lit: LitKind::Int,
            value: value.to_string(),
        },
    }
}

pub fn string(line: u32, value: &str) -> Expr {
    Expr {
        pos: Pos::new(line, 10),
        ty: None,
        kind: ExprKind::Lit {
            lit: LitKind::String,
            value: format!("{:?}", value),
        },
    }
}

pub fn ident(line: u32, name: &str, object: ObjectId, ty: TypeId) -> Expr {
    Expr {
        pos: Pos::new(line, 7),
        ty: Some(ty),
        kind: ExprKind::Ident {
            name: name.to_string(),
            object: Some(object),
        },
    }
}

/// `unit.Name` referring to an object of another unit.
pub fn qualified(line: u32, unit: &str, name: &str, object: ObjectId, ty: TypeId) -> Expr {
    Expr {
        pos: Pos::new(line, 7),
        ty: Some(ty),
        kind: ExprKind::Selector {
            base: Box::new(Expr {
                pos: Pos::new(line, 7),
                ty: None,
                kind: ExprKind::Ident {
                    name: unit.to_string(),
                    object: None,
                },
            }),
            name: name.to_string(),
            object: Some(object),
        },
    }
}

/// `base.name` resolving to a field of type `ty`.
pub fn field(line: u32, base: Expr, name: &str, object: ObjectId, ty: TypeId) -> Expr {
    Expr {
        pos: Pos::new(line, 7),
        ty: Some(ty),
        kind: ExprKind::Selector {
            base: Box::new(base),
            name: name.to_string(),
            object: Some(object),
        },
    }
}

/// `T{}` of type `ty`.
pub fn composite(line: u32, ty: TypeId) -> Expr {
    Expr {
        pos: Pos::new(line, 7),
        ty: Some(ty),
        kind: ExprKind::Composite { elems: Vec::new() },
    }
}

pub fn call(line: u32, callee: Expr, args: Vec<Expr>) -> Expr {
    Expr {
        pos: Pos::new(line, 2),
        ty: None,
        kind: ExprKind::Call {
            func: Box::new(callee),
            args,
            ellipsis: false,
        },
    }
}

pub fn func_lit(line: u32, results: &[TypeId], body: Vec<Stmt>) -> Expr {
    Expr {
        pos: Pos::new(line, 7),
        ty: None,
        kind: ExprKind::FuncLit {
            results: results.to_vec(),
            body,
        },
    }
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr { expr }
}

pub fn assign(line: u32, lhs: Vec<Expr>, rhs: Vec<Expr>) -> Stmt {
    Stmt::Assign {
        pos: pos(line),
        lhs,
        rhs,
        define: false,
    }
}

pub fn labeled(label: &str, body: Stmt) -> Stmt {
    Stmt::Labeled {
        label: label.to_string(),
        body: Box::new(body),
    }
}

pub fn ret(line: u32, results: Vec<Expr>) -> Stmt {
    Stmt::Return {
        pos: pos(line),
        results,
    }
}

pub fn send(line: u32, chan: Expr, value: Expr) -> Stmt {
    Stmt::Send {
        pos: pos(line),
        chan,
        value,
    }
}

pub fn local_var(line: u32, name: &str, ty: TypeId, values: Vec<Expr>) -> Stmt {
    Stmt::Decl(GenDecl {
        pos: pos(line),
        doc: Vec::new(),
        specs: vec![value_spec(line, &[name], Some(ty), values)],
    })
}

pub fn switch(line: u32, tag: Expr, clauses: Vec<CaseClause>) -> Stmt {
    Stmt::Switch {
        pos: pos(line),
        init: None,
        tag: Some(tag),
        clauses,
    }
}

pub fn case(line: u32, labels: Vec<Expr>) -> CaseClause {
    CaseClause {
        pos: pos(line),
        labels,
        body: Vec::new(),
    }
}

pub fn default_case(line: u32) -> CaseClause {
    case(line, Vec::new())
}

/// `switch x.(type) { ... }` over `subject`.
pub fn type_switch(line: u32, subject: Expr, clauses: Vec<TypeClause>) -> Stmt {
    Stmt::TypeSwitch {
        pos: pos(line),
        init: None,
        guard: Box::new(Stmt::Expr {
            expr: Expr {
                pos: Pos::new(line, 9),
                ty: None,
                kind: ExprKind::TypeAssert {
                    base: Box::new(subject),
                },
            },
        }),
        clauses,
    }
}

pub fn type_case(line: u32, labels: &[TypeId]) -> TypeClause {
    TypeClause {
        pos: pos(line),
        labels: labels
            .iter()
            .map(|ty| TypeLabel {
                pos: Pos::new(line, 7),
                ty: Some(*ty),
                text: String::new(),
            })
            .collect(),
        body: Vec::new(),
    }
}

pub fn type_default(line: u32) -> TypeClause {
    type_case(line, &[])
}
