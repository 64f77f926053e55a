//! Closed-type descriptors, per-unit fact bundles and the merged table.
//!
//! A [`FactBundle`] is frozen once built. Verification of a unit works on a
//! [`ClosedTypeTable`] rebuilt from the unit's own bundle and every bundle of
//! its transitive imports.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::directive::Mode;
use crate::error::{EnumcheckError, EnumcheckResult};
use crate::syntax::{ObjectId, TypeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedKind {
    /// Enumerated by named constants/variables.
    ValueEnum,
    /// Enumerated by the concrete types registered against an interface.
    TypeEnum,
}

/// A named constant or variable belonging to a value enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueMember {
    pub object: ObjectId,
    pub name: String,
}

/// A concrete type belonging to a type enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMember {
    pub ty: TypeId,
    /// Qualified display string; also the sort key.
    pub display: String,
    /// Display string relative to the owning unit, used in the fact rendering.
    pub relative: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "members", rename_all = "snake_case")]
pub enum Members {
    Values(Vec<ValueMember>),
    Types(Vec<TypeMember>),
}

/// One closed type, as declared by its owning unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedType {
    pub identity: TypeId,
    /// Qualified display name, e.g. `enumbyte.Letter`.
    pub name: String,
    pub owning_unit: String,
    pub mode: Mode,
    pub members: Members,
}

impl ClosedType {
    pub fn new(
        identity: TypeId,
        name: impl Into<String>,
        owning_unit: impl Into<String>,
        kind: ClosedKind,
        mode: Mode,
    ) -> Self {
        let members = match kind {
            ClosedKind::ValueEnum => Members::Values(Vec::new()),
            ClosedKind::TypeEnum => Members::Types(Vec::new()),
        };
        Self {
            identity,
            name: name.into(),
            owning_unit: owning_unit.into(),
            mode,
            members,
        }
    }

    pub fn kind(&self) -> ClosedKind {
        match self.members {
            Members::Values(_) => ClosedKind::ValueEnum,
            Members::Types(_) => ClosedKind::TypeEnum,
        }
    }

    pub fn values(&self) -> &[ValueMember] {
        match &self.members {
            Members::Values(values) => values,
            Members::Types(_) => &[],
        }
    }

    pub fn types(&self) -> &[TypeMember] {
        match &self.members {
            Members::Types(types) => types,
            Members::Values(_) => &[],
        }
    }

    /// Adds a value member; ignored for type enums.
    pub fn push_value(&mut self, member: ValueMember) {
        if let Members::Values(values) = &mut self.members {
            values.push(member);
        }
    }

    /// Adds a type member; ignored for value enums.
    pub fn push_type(&mut self, member: TypeMember) {
        if let Members::Types(types) = &mut self.members {
            types.push(member);
        }
    }

    /// Sorts members by display name and drops duplicates.
    pub fn normalize(&mut self) {
        match &mut self.members {
            Members::Values(values) => {
                values.sort_by(|a, b| a.name.cmp(&b.name).then(a.object.cmp(&b.object)));
                values.dedup_by(|a, b| a.name == b.name);
            }
            Members::Types(types) => {
                types.sort_by(|a, b| a.display.cmp(&b.display).then(a.ty.cmp(&b.ty)));
                types.dedup_by(|a, b| a.ty == b.ty);
            }
        }
    }

    /// Whether a value of type `ty` may flow into this closed type.
    ///
    /// Value enums accept any expression of the right static type; only type
    /// enums restrict the dynamic type.
    pub fn accepts(&self, ty: TypeId) -> bool {
        match &self.members {
            Members::Values(_) => true,
            Members::Types(types) => types.iter().any(|t| t.ty == ty),
        }
    }

    pub fn describe(&self) -> String {
        let mode = match self.mode {
            Mode::Exhaustive => "exhaustive",
            Mode::Relaxed => "relaxed",
        };
        let kind = match self.kind() {
            ClosedKind::ValueEnum => "value enum",
            ClosedKind::TypeEnum => "type enum",
        };
        format!("{} {} declared in {}", mode, kind, self.owning_unit)
    }

    fn absorb(&mut self, other: &ClosedType) -> EnumcheckResult<()> {
        if self.kind() != other.kind()
            || self.mode != other.mode
            || self.owning_unit != other.owning_unit
        {
            return Err(EnumcheckError::FactConflict {
                type_name: self.name.clone(),
                existing: self.describe(),
                incoming: other.describe(),
            });
        }

        match (&mut self.members, &other.members) {
            (Members::Values(mine), Members::Values(theirs)) => {
                mine.extend(theirs.iter().cloned())
            }
            (Members::Types(mine), Members::Types(theirs)) => mine.extend(theirs.iter().cloned()),
            _ => {
                return Err(EnumcheckError::internal(format!(
                    "member kinds of {} diverged after comparison",
                    self.name
                )))
            }
        }
        self.normalize();
        Ok(())
    }
}

impl fmt::Display for ClosedType {
    /// `enumbyte.Letter = {Alpha | Beta | Gamma}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = match &self.members {
            Members::Values(values) => values.iter().map(|v| v.name.as_str()).collect(),
            Members::Types(types) => types.iter().map(|t| t.relative.as_str()).collect(),
        };
        write!(f, "{} = {{{}}}", self.name, names.join(" | "))
    }
}

/// The exported, immutable snapshot of one unit's closed types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactBundle {
    unit: String,
    types: BTreeMap<TypeId, ClosedType>,
}

impl FactBundle {
    /// Freezes a unit's closed types. Members are normalized here.
    pub fn new(unit: impl Into<String>, closed: impl IntoIterator<Item = ClosedType>) -> Self {
        let mut types = BTreeMap::new();
        for mut ct in closed {
            ct.normalize();
            types.entry(ct.identity).or_insert(ct);
        }
        Self {
            unit: unit.into(),
            types,
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn get(&self, ty: TypeId) -> Option<&ClosedType> {
        self.types.get(&ty)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClosedType> {
        self.types.values()
    }

    /// Canonical text form: every closed type, sorted by name, joined by `", "`.
    pub fn render(&self) -> String {
        let mut entries: Vec<&ClosedType> = self.types.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
            .iter()
            .map(|ct| ct.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FactBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Identity-keyed union of fact bundles, rebuilt for every verified unit.
#[derive(Debug, Clone, Default)]
pub struct ClosedTypeTable {
    types: HashMap<TypeId, ClosedType>,
}

impl ClosedTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from bundles in any order.
    pub fn from_bundles<'a>(
        bundles: impl IntoIterator<Item = &'a FactBundle>,
    ) -> EnumcheckResult<Self> {
        let mut table = Self::new();
        for bundle in bundles {
            table.merge(bundle)?;
        }
        Ok(table)
    }

    /// Adds a bundle. Members already present are kept; disagreeing
    /// descriptors for the same identity are rejected.
    pub fn merge(&mut self, bundle: &FactBundle) -> EnumcheckResult<()> {
        for ct in bundle.iter() {
            match self.types.get_mut(&ct.identity) {
                Some(existing) => existing.absorb(ct)?,
                None => {
                    self.types.insert(ct.identity, ct.clone());
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, ty: TypeId) -> Option<&ClosedType> {
        self.types.get(&ty)
    }

    /// Lookup for an optional resolved type.
    pub fn lookup(&self, ty: Option<TypeId>) -> Option<&ClosedType> {
        ty.and_then(|t| self.types.get(&t))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Entries sorted by name, for deterministic comparisons and output.
    pub fn sorted(&self) -> Vec<&ClosedType> {
        let mut entries: Vec<&ClosedType> = self.types.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}
