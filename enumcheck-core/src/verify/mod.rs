//! Usage verifier.
//!
//! One walk over every declaration, statement and expression of a unit. Each
//! node is checked on its own against the merged closed-type table; dispatch
//! statements look at all of their clauses within the same visit.
//!
//! # Layout
//!
//! ```text
//! mod.rs       walk + diagnostic sink (suppression applied on emission)
//! flow.rs      declarations, assignments, calls, returns, sends
//! dispatch.rs  value dispatch and type-narrowing dispatch
//! ```

mod dispatch;
mod flow;

use crate::diagnostic::{Diagnostic, DiagnosticKind, InternalError};
use crate::facts::{ClosedType, ClosedTypeTable};
use crate::logging::log_internal_error;
use crate::suppress::SuppressionIndex;
use crate::syntax::{Decl, Expr, ExprKind, GenDecl, Pos, Spec, Stmt, TypeId, TypeOracle, Unit};

/// Collects findings for one unit.
#[derive(Debug)]
pub struct Sink<'a> {
    unit: String,
    suppress: &'a SuppressionIndex,
    diagnostics: Vec<Diagnostic>,
    internal_errors: Vec<InternalError>,
    suppressed: usize,
}

impl<'a> Sink<'a> {
    pub fn new(unit: impl Into<String>, suppress: &'a SuppressionIndex) -> Self {
        Self {
            unit: unit.into(),
            suppress,
            diagnostics: Vec::new(),
            internal_errors: Vec::new(),
            suppressed: 0,
        }
    }

    /// Records a finding unless its line carries an ignore directive.
    pub fn report(&mut self, file: &str, pos: Pos, kind: DiagnosticKind, message: String) {
        if self.suppress.is_suppressed(file, pos.line) {
            self.suppressed += 1;
            return;
        }
        self.diagnostics.push(Diagnostic {
            unit: self.unit.clone(),
            file: file.to_string(),
            line: pos.line,
            column: pos.column,
            kind,
            message,
        });
    }

    /// Records an unexpected syntax shape. Not subject to suppression.
    pub fn internal(&mut self, file: &str, pos: Pos, message: String) {
        let err = InternalError {
            unit: self.unit.clone(),
            file: file.to_string(),
            line: pos.line,
            column: pos.column,
            message,
        };
        log_internal_error(&err);
        self.internal_errors.push(err);
    }

    pub fn finish(self) -> VerifyOutcome {
        VerifyOutcome {
            diagnostics: self.diagnostics,
            internal_errors: self.internal_errors,
            suppressed: self.suppressed,
        }
    }
}

/// Everything the verifier produced for one unit.
#[derive(Debug, Clone, Default)]
pub struct VerifyOutcome {
    pub diagnostics: Vec<Diagnostic>,
    pub internal_errors: Vec<InternalError>,
    /// Findings computed but dropped by an ignore directive.
    pub suppressed: usize,
}

/// Walks a unit and checks every closed-type usage site.
pub fn verify_unit<'a>(
    unit: &'a Unit,
    oracle: &'a dyn TypeOracle,
    table: &'a ClosedTypeTable,
    suppress: &'a SuppressionIndex,
) -> VerifyOutcome {
    let mut verifier = Verifier {
        unit: &unit.path,
        oracle,
        table,
        file: "",
        results: Vec::new(),
        sink: Sink::new(unit.path.clone(), suppress),
    };

    for file in &unit.files {
        verifier.file = &file.name;
        for decl in &file.decls {
            verifier.visit_decl(decl);
        }
    }

    verifier.sink.finish()
}

pub(crate) struct Verifier<'a> {
    unit: &'a str,
    oracle: &'a dyn TypeOracle,
    table: &'a ClosedTypeTable,
    /// File currently being walked.
    file: &'a str,
    /// Result types of the enclosing functions, innermost last.
    results: Vec<&'a [TypeId]>,
    sink: Sink<'a>,
}

impl<'a> Verifier<'a> {
    fn report(&mut self, pos: Pos, kind: DiagnosticKind, message: String) {
        self.sink.report(self.file, pos, kind, message);
    }

    fn internal(&mut self, pos: Pos, message: String) {
        self.sink.internal(self.file, pos, message);
    }

    fn closed(&self, ty: Option<TypeId>) -> Option<&'a ClosedType> {
        self.table.lookup(ty)
    }

    fn visit_decl(&mut self, decl: &'a Decl) {
        match decl {
            Decl::Gen(group) => self.visit_gen_decl(group),
            Decl::Func(func) => {
                self.results.push(&func.results);
                self.visit_stmts(&func.body);
                self.results.pop();
            }
        }
    }

    fn visit_gen_decl(&mut self, group: &'a GenDecl) {
        for spec in &group.specs {
            if let Spec::Value(vs) = spec {
                self.check_value_spec(vs);
                self.visit_exprs(&vs.values);
            }
        }
    }

    fn visit_stmts(&mut self, stmts: &'a [Stmt]) {
        for stmt in stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_opt_stmt(&mut self, stmt: &'a Option<Box<Stmt>>) {
        if let Some(stmt) = stmt {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::Decl(group) => self.visit_gen_decl(group),
            Stmt::Expr { expr } => self.visit_expr(expr),
            Stmt::Assign { pos, lhs, rhs, .. } => {
                self.check_assign(*pos, lhs, rhs);
                self.visit_exprs(lhs);
                self.visit_exprs(rhs);
            }
            Stmt::Switch {
                pos,
                init,
                tag,
                clauses,
            } => {
                self.visit_opt_stmt(init);
                self.check_switch(*pos, tag.as_ref(), clauses);
                if let Some(tag) = tag {
                    self.visit_expr(tag);
                }
                for clause in clauses {
                    self.visit_exprs(&clause.labels);
                    self.visit_stmts(&clause.body);
                }
            }
            Stmt::TypeSwitch {
                pos,
                init,
                guard,
                clauses,
            } => {
                self.visit_opt_stmt(init);
                if let Some(subject) = self.check_type_switch(*pos, guard, clauses) {
                    self.visit_expr(subject);
                }
                for clause in clauses {
                    self.visit_stmts(&clause.body);
                }
            }
            Stmt::Return { pos, results } => {
                self.check_return(*pos, results);
                self.visit_exprs(results);
            }
            Stmt::Send { pos, chan, value } => {
                self.check_send(*pos, chan, value);
                self.visit_expr(chan);
                self.visit_expr(value);
            }
            Stmt::Block { stmts } => self.visit_stmts(stmts),
            Stmt::If {
                init,
                cond,
                then,
                otherwise,
                ..
            } => {
                self.visit_opt_stmt(init);
                self.visit_expr(cond);
                self.visit_stmts(then);
                self.visit_opt_stmt(otherwise);
            }
            Stmt::For {
                init,
                cond,
                post,
                body,
                ..
            } => {
                self.visit_opt_stmt(init);
                if let Some(cond) = cond {
                    self.visit_expr(cond);
                }
                self.visit_opt_stmt(post);
                self.visit_stmts(body);
            }
            Stmt::Range { expr, body, .. } => {
                self.visit_expr(expr);
                self.visit_stmts(body);
            }
            Stmt::Go { call } | Stmt::Defer { call } => self.visit_expr(call),
            Stmt::Labeled { body, .. } => self.visit_stmt(body),
            Stmt::Branch { .. } => {}
            Stmt::Unsupported { pos, what } => {
                self.internal(*pos, format!("unhandled statement {}", what));
            }
        }
    }

    fn visit_exprs(&mut self, exprs: &'a [Expr]) {
        for expr in exprs {
            self.visit_expr(expr);
        }
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        match &expr.kind {
            ExprKind::Lit { .. } | ExprKind::Ident { .. } => {}
            ExprKind::Selector { base, .. } => self.visit_expr(base),
            ExprKind::Composite { elems } => self.visit_exprs(elems),
            ExprKind::Call {
                func,
                args,
                ellipsis,
            } => {
                self.check_call(expr.pos, func, args, *ellipsis);
                self.visit_expr(func);
                self.visit_exprs(args);
            }
            ExprKind::TypeAssert { base } => self.visit_expr(base),
            ExprKind::FuncLit { results, body } => {
                self.results.push(results);
                self.visit_stmts(body);
                self.results.pop();
            }
            ExprKind::Unary { operand, .. } => self.visit_expr(operand),
            ExprKind::Binary { lhs, rhs, .. } => {
                self.visit_expr(lhs);
                self.visit_expr(rhs);
            }
            ExprKind::Paren { inner } => self.visit_expr(inner),
            ExprKind::Index { base, index } => {
                self.visit_expr(base);
                self.visit_expr(index);
            }
            ExprKind::KeyValue { key, value } => {
                self.visit_expr(key);
                self.visit_expr(value);
            }
            ExprKind::Opaque { children, .. } => self.visit_exprs(children),
        }
    }
}
