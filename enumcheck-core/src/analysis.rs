//! The per-unit pipeline.
//!
//! ```text
//! scan annotations -> collect members -> export bundle
//!                  -> import dependency bundles -> build suppression index -> verify
//! ```
//!
//! Phases run strictly in this order for one unit. Scheduling across units
//! belongs to [`crate::driver`].

use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::diagnostic::{Diagnostic, InternalError};
use crate::directive::{scan_annotations, DirectiveParser};
use crate::error::EnumcheckResult;
use crate::facts::{ClosedTypeTable, FactBundle};
use crate::members::collect_members;
use crate::store::FactStore;
use crate::suppress::SuppressionIndex;
use crate::syntax::{TypeOracle, Unit};
use crate::verify::verify_unit;

/// Outcome of analyzing one unit.
#[derive(Debug, Clone)]
pub struct UnitReport {
    pub unit: String,
    /// Exported facts; `None` when the unit declares no closed type.
    pub bundle: Option<Arc<FactBundle>>,
    pub diagnostics: Vec<Diagnostic>,
    pub internal_errors: Vec<InternalError>,
    /// Findings dropped by ignore directives.
    pub suppressed: usize,
}

/// Scans and collects the closed types a unit declares, without exporting.
pub fn build_facts(unit: &Unit, oracle: &dyn TypeOracle, parser: &DirectiveParser) -> FactBundle {
    let annotations = scan_annotations(unit, oracle, parser);
    let closed = collect_members(unit, oracle, &annotations);
    FactBundle::new(unit.path.clone(), closed)
}

/// Runs the whole pipeline for one unit.
///
/// `deps` lists every transitive import of the unit; their bundles must
/// already be in `store`.
pub fn analyze_unit(
    unit: &Unit,
    oracle: &dyn TypeOracle,
    parser: &DirectiveParser,
    store: &dyn FactStore,
    deps: &[String],
) -> EnumcheckResult<UnitReport> {
    let _span = debug_span!("unit", unit = %unit.path).entered();

    let facts = build_facts(unit, oracle, parser);
    let bundle = if facts.is_empty() {
        None
    } else {
        debug!(closed_types = facts.len(), facts = %facts, "exporting facts");
        Some(store.export(&unit.path, facts)?)
    };

    let mut table = ClosedTypeTable::new();
    if let Some(own) = &bundle {
        table.merge(own)?;
    }
    for dep in deps {
        if let Some(imported) = store.import(dep)? {
            table.merge(&imported)?;
        }
    }
    debug!(known_closed_types = table.len(), "merged fact table");

    let suppress = SuppressionIndex::build(unit, parser);
    let outcome = verify_unit(unit, oracle, &table, &suppress);
    debug!(
        diagnostics = outcome.diagnostics.len(),
        internal_errors = outcome.internal_errors.len(),
        suppressed = outcome.suppressed,
        "verified unit"
    );

    Ok(UnitReport {
        unit: unit.path.clone(),
        bundle,
        diagnostics: outcome.diagnostics,
        internal_errors: outcome.internal_errors,
        suppressed: outcome.suppressed,
    })
}
