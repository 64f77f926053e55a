//! Host-facing model: syntax trees, the program snapshot, and the
//! type-resolution oracle the engine queries.
//!
//! The engine never parses source text or infers types itself. Front ends
//! produce a [`Program`] (usually deserialized from JSON) and the analysis
//! reads it through [`TypeOracle`].

pub mod ast;
pub mod program;

pub use ast::{
    CaseClause, Comment, Decl, Expr, ExprKind, FuncDecl, GenDecl, LitKind, Pos, SourceFile, Spec,
    Stmt, TypeClause, TypeLabel, TypeSpec, ValueSpec,
};
pub use program::{ChanDir, Object, ObjectId, ObjectKind, Program, TypeId, TypeShape, Unit};

/// Type-resolution oracle.
///
/// Implementors only provide table lookups; display strings and underlying
/// type resolution are derived from them.
pub trait TypeOracle: Sync {
    fn shape(&self, ty: TypeId) -> Option<&TypeShape>;

    fn object(&self, id: ObjectId) -> Option<&Object>;

    /// Follows named types down to their representation.
    fn underlying(&self, ty: TypeId) -> Option<&TypeShape> {
        let mut current = self.shape(ty)?;
        // Bounded so a malformed snapshot with a named cycle cannot hang.
        for _ in 0..64 {
            match current {
                TypeShape::Named { underlying, .. } => current = self.shape(*underlying)?,
                shape => return Some(shape),
            }
        }
        None
    }

    fn is_interface(&self, ty: TypeId) -> bool {
        matches!(self.underlying(ty), Some(TypeShape::Interface { .. }))
    }

    /// Fully qualified display string, e.g. `enumbyte.Letter`.
    fn type_string(&self, ty: TypeId) -> String {
        let mut out = String::new();
        write_type(self, ty, None, &mut out);
        out
    }

    /// Display string with types of `unit` left unqualified.
    fn type_string_relative(&self, ty: TypeId, unit: &str) -> String {
        let mut out = String::new();
        write_type(self, ty, Some(unit), &mut out);
        out
    }
}

fn write_list<O: TypeOracle + ?Sized>(
    oracle: &O,
    types: &[TypeId],
    relative_to: Option<&str>,
    out: &mut String,
) {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_type(oracle, *ty, relative_to, out);
    }
}

fn write_type<O: TypeOracle + ?Sized>(
    oracle: &O,
    ty: TypeId,
    relative_to: Option<&str>,
    out: &mut String,
) {
    let Some(shape) = oracle.shape(ty) else {
        out.push_str("<invalid type>");
        return;
    };

    match shape {
        TypeShape::Basic { name } => out.push_str(name),
        TypeShape::Named { name, unit, .. } => {
            if relative_to != Some(unit.as_str()) {
                out.push_str(unit);
                out.push('.');
            }
            out.push_str(name);
        }
        TypeShape::Struct { display }
        | TypeShape::Interface { display }
        | TypeShape::Other { display } => out.push_str(display),
        TypeShape::Chan { elem, dir } => {
            out.push_str(match dir {
                ChanDir::Both => "chan ",
                ChanDir::Send => "chan<- ",
                ChanDir::Recv => "<-chan ",
            });
            write_type(oracle, *elem, relative_to, out);
        }
        TypeShape::Slice { elem } => {
            out.push_str("[]");
            write_type(oracle, *elem, relative_to, out);
        }
        TypeShape::Pointer { elem } => {
            out.push('*');
            write_type(oracle, *elem, relative_to, out);
        }
        TypeShape::Signature {
            params,
            results,
            variadic,
        } => {
            out.push_str("func(");
            match params.split_last() {
                Some((last, fixed)) if *variadic => {
                    write_list(oracle, fixed, relative_to, out);
                    if !fixed.is_empty() {
                        out.push_str(", ");
                    }
                    out.push_str("...");
                    // The variadic parameter is a slice; show its element.
                    match oracle.shape(*last) {
                        Some(TypeShape::Slice { elem }) => write_type(oracle, *elem, relative_to, out),
                        _ => write_type(oracle, *last, relative_to, out),
                    }
                }
                _ => write_list(oracle, params, relative_to, out),
            }
            out.push(')');
            match results.as_slice() {
                [] => {}
                [single] => {
                    out.push(' ');
                    write_type(oracle, *single, relative_to, out);
                }
                many => {
                    out.push_str(" (");
                    write_list(oracle, many, relative_to, out);
                    out.push(')');
                }
            }
        }
        TypeShape::Tuple { elems } => {
            out.push('(');
            write_list(oracle, elems, relative_to, out);
            out.push(')');
        }
    }
}
