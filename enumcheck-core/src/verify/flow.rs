//! Value-flow sites: declarations, assignments, calls, returns and sends.
//!
//! Every site reduces to one or more value slots of a known type; a slot of
//! closed type is checked with [`Verifier::check_slot`].

use crate::diagnostic::DiagnosticKind;
use crate::facts::{ClosedKind, ClosedType};
use crate::syntax::{Expr, ExprKind, Pos, TypeId, TypeShape, ValueSpec};

use super::Verifier;

impl<'a> Verifier<'a> {
    /// Checks one expression flowing into a closed-type slot. Reports at most
    /// one finding, at `at`.
    pub(super) fn check_slot(&mut self, ct: &'a ClosedType, expr: &'a Expr, at: Pos) {
        if let ExprKind::Lit { value, .. } = &expr.kind {
            self.report(
                at,
                DiagnosticKind::ImplicitConversion,
                format!("implicit conversion of {} to {}", value, ct.name),
            );
            return;
        }

        // Value enums accept any expression of the slot's static type.
        if ct.kind() == ClosedKind::ValueEnum {
            return;
        }

        let Some(ty) = expr.ty else {
            self.internal(
                expr.pos,
                format!("unresolved type for {}", expr.kind.category()),
            );
            return;
        };
        if !ct.accepts(ty) {
            self.report(
                at,
                DiagnosticKind::ImplicitConversion,
                format!(
                    "implicit conversion of {} to {}",
                    self.oracle.type_string(ty),
                    ct.name
                ),
            );
        }
    }

    /// `var x, y T = a, b` with `T` closed.
    pub(super) fn check_value_spec(&mut self, vs: &'a ValueSpec) {
        let Some(ct) = self.closed(vs.ty) else {
            return;
        };
        // Unit-scope values of a value enum in its own unit are its members.
        if self.results.is_empty()
            && ct.kind() == ClosedKind::ValueEnum
            && ct.owning_unit == self.unit
        {
            return;
        }
        for value in &vs.values {
            self.check_slot(ct, value, vs.pos);
        }
    }

    /// Pairs targets with values by index. `a, b = f()` is left to the
    /// compiler.
    pub(super) fn check_assign(&mut self, pos: Pos, lhs: &'a [Expr], rhs: &'a [Expr]) {
        if lhs.len() != rhs.len() {
            return;
        }
        for (target, value) in lhs.iter().zip(rhs) {
            if let Some(ct) = self.closed(self.target_type(target)) {
                self.check_slot(ct, value, pos);
            }
        }
    }

    /// Type of an assignment target. Identifiers resolve through their
    /// declared object so that `x := ...` targets still have a type.
    fn target_type(&self, target: &Expr) -> Option<TypeId> {
        if let ExprKind::Ident {
            object: Some(id), ..
        } = &target.kind
        {
            if let Some(object) = self.oracle.object(*id) {
                return Some(object.ty);
            }
        }
        target.ty
    }

    /// Arguments against the callee's parameters. Conversions like `T(5)`
    /// have no signature and are never checked.
    pub(super) fn check_call(
        &mut self,
        pos: Pos,
        func: &'a Expr,
        args: &'a [Expr],
        ellipsis: bool,
    ) {
        let oracle = self.oracle;
        let Some(TypeShape::Signature {
            params, variadic, ..
        }) = func.ty.and_then(|ty| oracle.underlying(ty))
        else {
            return;
        };
        self.check_arguments(pos, params, *variadic, args, ellipsis);
    }

    /// `f(xs...)` carries its slice straight into the variadic parameter.
    fn check_arguments(
        &mut self,
        pos: Pos,
        params: &[TypeId],
        variadic: bool,
        args: &'a [Expr],
        ellipsis: bool,
    ) {
        let fixed = if variadic {
            params.len().saturating_sub(1)
        } else {
            params.len()
        };
        // Arity mismatches are left to the compiler.
        if args.len() < fixed || (!variadic && args.len() != params.len()) {
            return;
        }
        // `f(g())` spreading a multi-value result is left to the type checker.
        if let [only] = args {
            if (variadic || params.len() > 1) && self.is_tuple(only.ty) {
                return;
            }
        }

        for (i, arg) in args.iter().enumerate() {
            let slot = if i < fixed || ellipsis {
                params.get(i).copied()
            } else {
                params.last().copied().and_then(|last| self.slice_elem(last))
            };
            if let Some(ct) = self.closed(slot) {
                self.check_slot(ct, arg, pos);
            }
        }
    }

    fn is_tuple(&self, ty: Option<TypeId>) -> bool {
        matches!(
            ty.and_then(|ty| self.oracle.shape(ty)),
            Some(TypeShape::Tuple { .. })
        )
    }

    fn slice_elem(&self, ty: TypeId) -> Option<TypeId> {
        match self.oracle.underlying(ty)? {
            TypeShape::Slice { elem } => Some(*elem),
            _ => None,
        }
    }

    /// Results against the innermost enclosing function or function literal.
    pub(super) fn check_return(&mut self, pos: Pos, results: &'a [Expr]) {
        let Some(expected) = self.results.last().copied() else {
            self.internal(pos, "return outside of a function".to_string());
            return;
        };
        // Bare returns and `return g()` are checked by the compiler.
        if results.is_empty() || expected.len() != results.len() {
            return;
        }
        for (ty, value) in expected.iter().zip(results) {
            if let Some(ct) = self.closed(Some(*ty)) {
                self.check_slot(ct, value, pos);
            }
        }
    }

    /// `ch <- value`; named channel types are unwrapped to their element.
    pub(super) fn check_send(&mut self, pos: Pos, chan: &'a Expr, value: &'a Expr) {
        let Some(ty) = chan.ty else {
            self.internal(
                chan.pos,
                format!("unresolved type for {}", chan.kind.category()),
            );
            return;
        };
        let oracle = self.oracle;
        match oracle.underlying(ty) {
            Some(TypeShape::Chan { elem, .. }) => {
                if let Some(ct) = self.closed(Some(*elem)) {
                    self.check_slot(ct, value, pos);
                }
            }
            _ => self.internal(
                pos,
                format!("unhandled send channel type {}", oracle.type_string(ty)),
            ),
        }
    }
}
