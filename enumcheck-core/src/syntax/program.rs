//! Whole-program snapshot: type universe, declared objects and units.
//!
//! Type and object identities are indices into the snapshot's tables. Two
//! types are the same type exactly when their ids are equal; names play no
//! part in identity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ast::SourceFile;
use super::TypeOracle;
use crate::error::{EnumcheckError, EnumcheckResult};

/// Resolved type identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

/// Declared object identity (constant, variable, type name, function).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u32);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    #[default]
    Both,
    Send,
    Recv,
}

/// Structure of a resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeShape {
    /// Predeclared scalar or string type (`int`, `byte`, `string`, `untyped int`, ...).
    Basic { name: String },
    /// Nominal type declared in `unit`.
    Named {
        name: String,
        unit: String,
        underlying: TypeId,
    },
    Struct { display: String },
    /// Open polymorphic capability type.
    Interface { display: String },
    Chan {
        elem: TypeId,
        #[serde(default)]
        dir: ChanDir,
    },
    Slice { elem: TypeId },
    Pointer { elem: TypeId },
    Signature {
        #[serde(default)]
        params: Vec<TypeId>,
        #[serde(default)]
        results: Vec<TypeId>,
        #[serde(default)]
        variadic: bool,
    },
    Tuple {
        #[serde(default)]
        elems: Vec<TypeId>,
    },
    Other { display: String },
}

impl TypeShape {
    fn referenced(&self) -> Vec<TypeId> {
        match self {
            Self::Named { underlying, .. } => vec![*underlying],
            Self::Chan { elem, .. } | Self::Slice { elem } | Self::Pointer { elem } => vec![*elem],
            Self::Signature {
                params, results, ..
            } => params.iter().chain(results).copied().collect(),
            Self::Tuple { elems } => elems.clone(),
            Self::Basic { .. } | Self::Struct { .. } | Self::Interface { .. } | Self::Other { .. } => {
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Const,
    Var,
    Type,
    Func,
}

/// A declared, named entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    pub name: String,
    pub kind: ObjectKind,
    pub ty: TypeId,
    pub unit: String,
}

/// A compilation unit: the granularity of fact export and scheduling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Unit {
    pub path: String,
    /// Direct imports, by unit path.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Unit-scope symbol table.
    #[serde(default)]
    pub scope: Vec<ObjectId>,
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

/// The complete snapshot a host hands to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub types: Vec<TypeShape>,
    #[serde(default)]
    pub objects: Vec<Object>,
    #[serde(default)]
    pub units: Vec<Unit>,
}

impl Program {
    pub fn unit(&self, path: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.path == path)
    }

    /// Checks table references so later lookups only miss on tree-level ids.
    pub fn validate(&self) -> EnumcheckResult<()> {
        let type_count = self.types.len();
        let check_type = |ty: TypeId, what: &dyn Fn() -> String| {
            if (ty.0 as usize) < type_count {
                Ok(())
            } else {
                Err(EnumcheckError::invalid(format!(
                    "{} references unknown type #{}",
                    what(),
                    ty.0
                )))
            }
        };

        for (index, shape) in self.types.iter().enumerate() {
            for referenced in shape.referenced() {
                check_type(referenced, &|| format!("type #{}", index))?;
            }
        }

        for (index, object) in self.objects.iter().enumerate() {
            check_type(object.ty, &|| format!("object '{}' (#{})", object.name, index))?;
        }

        let mut paths = HashSet::with_capacity(self.units.len());
        for unit in &self.units {
            if !paths.insert(unit.path.as_str()) {
                return Err(EnumcheckError::invalid(format!(
                    "unit '{}' is declared more than once",
                    unit.path
                )));
            }
        }

        for unit in &self.units {
            for import in &unit.imports {
                if !paths.contains(import.as_str()) {
                    return Err(EnumcheckError::UnknownUnit {
                        unit: import.clone(),
                    });
                }
            }
            for id in &unit.scope {
                if self.objects.get(id.0 as usize).is_none() {
                    return Err(EnumcheckError::invalid(format!(
                        "scope of unit '{}' references unknown object #{}",
                        unit.path, id.0
                    )));
                }
            }
        }

        Ok(())
    }
}

impl TypeOracle for Program {
    fn shape(&self, ty: TypeId) -> Option<&TypeShape> {
        self.types.get(ty.0 as usize)
    }

    fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter_program() -> Program {
        Program {
            types: vec![
                TypeShape::Basic {
                    name: "byte".to_string(),
                },
                TypeShape::Named {
                    name: "Letter".to_string(),
                    unit: "enumbyte".to_string(),
                    underlying: TypeId(0),
                },
            ],
            objects: vec![Object {
                name: "Alpha".to_string(),
                kind: ObjectKind::Const,
                ty: TypeId(1),
                unit: "enumbyte".to_string(),
            }],
            units: vec![Unit {
                path: "enumbyte".to_string(),
                scope: vec![ObjectId(0)],
                ..Unit::default()
            }],
        }
    }

    #[test]
    fn test_validate_accepts_consistent_snapshot() {
        assert!(letter_program().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_dangling_type() {
        let mut program = letter_program();
        program.objects[0].ty = TypeId(9);
        let err = program.validate().unwrap_err();
        assert!(err.to_string().contains("unknown type #9"));
    }

    #[test]
    fn test_validate_rejects_unknown_import() {
        let mut program = letter_program();
        program.units[0].imports.push("missing".to_string());
        assert!(matches!(
            program.validate(),
            Err(EnumcheckError::UnknownUnit { unit }) if unit == "missing"
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_unit() {
        let mut program = letter_program();
        program.units.push(Unit {
            path: "enumbyte".to_string(),
            ..Unit::default()
        });
        assert!(program.validate().is_err());
    }

    #[test]
    fn test_deserialize_tagged_shapes() {
        let json = r#"{
            "types": [
                {"kind": "basic", "name": "int"},
                {"kind": "named", "name": "Letter", "unit": "enumbyte", "underlying": 0},
                {"kind": "chan", "elem": 1}
            ],
            "objects": [{"name": "Alpha", "kind": "const", "ty": 1, "unit": "enumbyte"}],
            "units": [{"path": "enumbyte", "scope": [0]}]
        }"#;
        let program: Program = serde_json::from_str(json).unwrap();
        assert_eq!(program.types.len(), 3);
        assert_eq!(
            program.types[2],
            TypeShape::Chan {
                elem: TypeId(1),
                dir: ChanDir::Both
            }
        );
        assert_eq!(program.objects[0].kind, ObjectKind::Const);
        assert!(program.validate().is_ok());
    }
}
