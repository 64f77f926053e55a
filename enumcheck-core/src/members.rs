//! Membership collection for annotated types.
//!
//! Value enums are enumerated by every unit-scope constant or variable of
//! exactly the annotated type. Type enums are enumerated by the initializer
//! types of unit-level variables declared with the interface type, e.g.
//! `var _ Expr = Add{}`.

use std::collections::BTreeMap;

use tracing::debug;

use crate::directive::Annotation;
use crate::facts::{ClosedKind, ClosedType, TypeMember, ValueMember};
use crate::syntax::{Decl, ObjectKind, Spec, TypeId, TypeOracle, Unit};

/// Builds the closed types of a unit from its annotations.
///
/// The result is normalized and ordered by type name. Empty member sets are
/// legal and kept.
pub fn collect_members(
    unit: &Unit,
    oracle: &dyn TypeOracle,
    annotations: &[Annotation],
) -> Vec<ClosedType> {
    let mut closed: BTreeMap<TypeId, ClosedType> = BTreeMap::new();
    for annotation in annotations {
        let kind = if oracle.is_interface(annotation.ty) {
            ClosedKind::TypeEnum
        } else {
            ClosedKind::ValueEnum
        };
        closed.entry(annotation.ty).or_insert_with(|| {
            ClosedType::new(
                annotation.ty,
                oracle.type_string(annotation.ty),
                unit.path.clone(),
                kind,
                annotation.mode,
            )
        });
    }

    if closed.is_empty() {
        return Vec::new();
    }

    collect_values(unit, oracle, &mut closed);
    collect_types(unit, oracle, &mut closed);

    let mut result: Vec<ClosedType> = closed.into_values().collect();
    for ct in &mut result {
        ct.normalize();
        debug!(unit = %unit.path, closed_type = %ct, "collected members");
    }
    result.sort_by(|a, b| a.name.cmp(&b.name));
    result
}

fn collect_values(unit: &Unit, oracle: &dyn TypeOracle, closed: &mut BTreeMap<TypeId, ClosedType>) {
    for id in &unit.scope {
        let Some(object) = oracle.object(*id) else {
            continue;
        };
        if !matches!(object.kind, ObjectKind::Const | ObjectKind::Var) {
            continue;
        }
        let Some(ct) = closed.get_mut(&object.ty) else {
            continue;
        };
        if ct.kind() == ClosedKind::ValueEnum {
            ct.push_value(ValueMember {
                object: *id,
                name: object.name.clone(),
            });
        }
    }
}

fn collect_types(unit: &Unit, oracle: &dyn TypeOracle, closed: &mut BTreeMap<TypeId, ClosedType>) {
    for file in &unit.files {
        for decl in &file.decls {
            let Decl::Gen(group) = decl else { continue };
            for spec in &group.specs {
                let Spec::Value(vs) = spec else { continue };
                let Some(ct) = vs.ty.and_then(|ty| closed.get_mut(&ty)) else {
                    continue;
                };
                if ct.kind() != ClosedKind::TypeEnum {
                    continue;
                }
                for value in &vs.values {
                    // Unresolved initializers cannot name a member.
                    let Some(ty) = value.ty else { continue };
                    ct.push_type(TypeMember {
                        ty,
                        display: oracle.type_string(ty),
                        relative: oracle.type_string_relative(ty, &unit.path),
                    });
                }
            }
        }
    }
}
