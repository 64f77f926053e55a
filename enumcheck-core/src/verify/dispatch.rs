//! Dispatch sites: value `switch` and type-narrowing `switch`.

use std::collections::HashSet;

use crate::diagnostic::{humane_list, DiagnosticKind};
use crate::facts::ClosedKind;
use crate::syntax::{CaseClause, Expr, ExprKind, ObjectId, Pos, Stmt, TypeClause, TypeId};

use super::Verifier;

impl<'a> Verifier<'a> {
    /// `switch tag { ... }` where `tag` is of closed type.
    pub(super) fn check_switch(
        &mut self,
        pos: Pos,
        tag: Option<&'a Expr>,
        clauses: &'a [CaseClause],
    ) {
        let Some(ct) = tag.and_then(|tag| self.closed(tag.ty)) else {
            return;
        };

        let mut found: HashSet<ObjectId> = HashSet::new();
        let mut has_default = false;
        for clause in clauses {
            if clause.is_default() {
                has_default = true;
                continue;
            }
            for label in &clause.labels {
                match &label.kind {
                    ExprKind::Lit { value, .. } => self.report(
                        label.pos,
                        DiagnosticKind::ImplicitConversion,
                        format!("implicit conversion of {} to {}", value, ct.name),
                    ),
                    ExprKind::Ident { object, .. } | ExprKind::Selector { object, .. } => {
                        if let Some(object) = object {
                            found.insert(*object);
                        }
                    }
                    ExprKind::Composite { .. } => self.report(
                        label.pos,
                        DiagnosticKind::InvalidEnum,
                        format!("invalid enum for {}", ct.name),
                    ),
                    other => self.internal(
                        label.pos,
                        format!("unhandled clause type {}", other.category()),
                    ),
                }
            }
        }

        let mut missing: Vec<&str> = ct
            .values()
            .iter()
            .filter(|member| !found.contains(&member.object))
            .map(|member| member.name.as_str())
            .collect();
        if ct.mode.needs_default() && !has_default {
            missing.push("default");
        }

        if !missing.is_empty() {
            self.report(
                pos,
                DiagnosticKind::MissingCases,
                format!("missing cases {}", humane_list(&missing)),
            );
        }
    }

    /// `switch v := x.(type) { ... }` where `x` is a closed interface.
    ///
    /// Returns the subject expression so the walk can descend into it; `None`
    /// when the guard has an unexpected shape.
    pub(super) fn check_type_switch(
        &mut self,
        pos: Pos,
        guard: &'a Stmt,
        clauses: &'a [TypeClause],
    ) -> Option<&'a Expr> {
        let Some(subject) = type_switch_subject(guard) else {
            self.internal(pos, "unhandled type switch guard".to_string());
            return None;
        };
        let Some(ct) = self
            .closed(subject.ty)
            .filter(|ct| ct.kind() == ClosedKind::TypeEnum)
        else {
            return Some(subject);
        };

        let mut found: HashSet<TypeId> = HashSet::new();
        for clause in clauses {
            for label in &clause.labels {
                let Some(ty) = label.ty else {
                    self.internal(
                        label.pos,
                        format!("unhandled clause type {}", label.text),
                    );
                    continue;
                };
                if !ct.accepts(ty) {
                    self.report(
                        label.pos,
                        DiagnosticKind::ImplicitConversion,
                        format!(
                            "implicit conversion of {} to {}",
                            self.oracle.type_string(ty),
                            ct.name
                        ),
                    );
                }
                found.insert(ty);
            }
        }

        let missing: Vec<&str> = ct
            .types()
            .iter()
            .filter(|member| !found.contains(&member.ty))
            .map(|member| member.display.as_str())
            .collect();
        if !missing.is_empty() {
            self.report(
                pos,
                DiagnosticKind::MissingCases,
                format!("missing cases {}", humane_list(&missing)),
            );
        }
        Some(subject)
    }
}

/// `v := x.(type)` or `x.(type)` yields `x`.
fn type_switch_subject(guard: &Stmt) -> Option<&Expr> {
    let assertion = match guard {
        Stmt::Assign { rhs, .. } if rhs.len() == 1 => &rhs[0],
        Stmt::Expr { expr } => expr,
        _ => return None,
    };
    match &assertion.kind {
        ExprKind::TypeAssert { base } => Some(&**base),
        _ => None,
    }
}
