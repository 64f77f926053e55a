//! Dependency-ordered scheduling of units.
//!
//! The import graph is a `DiGraphMap<&str, ()>` with an edge from every unit
//! to each unit it imports. Units are grouped into waves: a unit's wave is one
//! past the deepest wave of its imports, so every bundle a unit needs has been
//! exported by the time its wave starts. Units of one wave share no edge and
//! run in parallel on the rayon pool.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::analysis::{analyze_unit, UnitReport};
use crate::diagnostic::{sort_diagnostics, Diagnostic, InternalError};
use crate::directive::DirectiveParser;
use crate::error::{EnumcheckError, EnumcheckResult};
use crate::facts::FactBundle;
use crate::store::FactStore;
use crate::syntax::Program;

/// Builds the import graph. Imports of units missing from the program are
/// rejected.
pub fn build_import_graph(program: &Program) -> EnumcheckResult<DiGraphMap<&str, ()>> {
    let mut g = DiGraphMap::new();

    for unit in &program.units {
        g.add_node(unit.path.as_str());
    }

    for unit in &program.units {
        for import in &unit.imports {
            if !g.contains_node(import.as_str()) {
                return Err(EnumcheckError::UnknownUnit {
                    unit: import.clone(),
                });
            }
            g.add_edge(unit.path.as_str(), import.as_str(), ());
        }
    }

    Ok(g)
}

/// Groups units into dependency waves, leaves first. Each wave is sorted.
pub fn dependency_waves<'a>(g: &DiGraphMap<&'a str, ()>) -> EnumcheckResult<Vec<Vec<&'a str>>> {
    let order = toposort(g, None).map_err(|cycle| EnumcheckError::Cycle {
        unit: cycle.node_id().to_string(),
    })?;

    // Importers come before their imports in `order`; walk it backwards.
    let mut depth: HashMap<&str, usize> = HashMap::new();
    for &node in order.iter().rev() {
        let wave = g
            .neighbors(node)
            .filter_map(|dep| depth.get(dep))
            .map(|d| d + 1)
            .max()
            .unwrap_or(0);
        depth.insert(node, wave);
    }

    let count = depth.values().copied().max().map_or(0, |d| d + 1);
    let mut waves: Vec<Vec<&str>> = vec![Vec::new(); count];
    for (node, wave) in depth {
        waves[wave].push(node);
    }
    for wave in &mut waves {
        wave.sort_unstable();
    }
    Ok(waves)
}

/// Every unit reachable from `unit` through imports, excluding `unit`
/// itself. Sorted.
pub fn transitive_imports(g: &DiGraphMap<&str, ()>, unit: &str) -> Vec<String> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();

    if g.contains_node(unit) {
        queue.push_back(unit);
    }
    while let Some(node) = queue.pop_front() {
        for next in g.neighbors(node) {
            if next != unit && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    let mut deps: Vec<String> = visited.into_iter().map(String::from).collect();
    deps.sort();
    deps
}

/// Runs the per-unit pipeline over a whole program.
#[derive(Debug, Clone)]
pub struct Driver<'p> {
    program: &'p Program,
    parser: DirectiveParser,
    parallel: bool,
}

impl<'p> Driver<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            parser: DirectiveParser::default(),
            parallel: true,
        }
    }

    pub fn with_parser(mut self, parser: DirectiveParser) -> Self {
        self.parser = parser;
        self
    }

    /// Run independent units of a wave concurrently (default `true`).
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn run(&self, store: &dyn FactStore) -> EnumcheckResult<RunReport> {
        let graph = build_import_graph(self.program)?;
        let waves = dependency_waves(&graph)?;
        debug!(units = graph.node_count(), waves = waves.len(), "scheduled units");

        let mut units = Vec::with_capacity(graph.node_count());
        for wave in &waves {
            let reports: Vec<UnitReport> = if self.parallel {
                wave.par_iter()
                    .map(|path| self.run_unit(&graph, path, store))
                    .collect::<EnumcheckResult<_>>()?
            } else {
                wave.iter()
                    .map(|path| self.run_unit(&graph, path, store))
                    .collect::<EnumcheckResult<_>>()?
            };
            units.extend(reports);
        }
        units.sort_by(|a, b| a.unit.cmp(&b.unit));

        let report = RunReport { units };
        info!(
            units = report.units.len(),
            diagnostics = report.diagnostic_count(),
            internal_errors = report.internal_errors().len(),
            "analysis finished"
        );
        Ok(report)
    }

    fn run_unit(
        &self,
        graph: &DiGraphMap<&str, ()>,
        path: &str,
        store: &dyn FactStore,
    ) -> EnumcheckResult<UnitReport> {
        let unit = self
            .program
            .unit(path)
            .ok_or_else(|| EnumcheckError::UnknownUnit {
                unit: path.to_string(),
            })?;
        let deps = transitive_imports(graph, path);
        analyze_unit(unit, self.program, &self.parser, store, &deps)
    }
}

/// Reports of every unit of a run, sorted by unit path.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub units: Vec<UnitReport>,
}

impl RunReport {
    /// All diagnostics, sorted by position.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut all: Vec<Diagnostic> = self
            .units
            .iter()
            .flat_map(|u| u.diagnostics.iter().cloned())
            .collect();
        sort_diagnostics(&mut all);
        all
    }

    pub fn diagnostic_count(&self) -> usize {
        self.units.iter().map(|u| u.diagnostics.len()).sum()
    }

    pub fn internal_errors(&self) -> Vec<InternalError> {
        self.units
            .iter()
            .flat_map(|u| u.internal_errors.iter().cloned())
            .collect()
    }

    /// Exported bundles, one per unit that declares closed types.
    pub fn facts(&self) -> Vec<Arc<FactBundle>> {
        self.units.iter().filter_map(|u| u.bundle.clone()).collect()
    }

    pub fn suppressed(&self) -> usize {
        self.units.iter().map(|u| u.suppressed).sum()
    }

    pub fn unit(&self, path: &str) -> Option<&UnitReport> {
        self.units.iter().find(|u| u.unit == path)
    }
}
