//! Builder pattern API for enumcheck analysis.
//!
//! ```rust,ignore
//! use enumcheck_core::prelude::*;
//!
//! let result = Enumcheck::new("/path/to/snapshots")
//!     .marker("enumcheck")
//!     .parallel(true)
//!     .ignore_units(["vendor/*"])
//!     .analyze()?;
//!
//! for diagnostic in &result.diagnostics {
//!     println!("{}", diagnostic);
//! }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::{load_config, EnumcheckConfig, OutputFormat};
use crate::diagnostic::{sort_diagnostics, Diagnostic, InternalError};
use crate::directive::DirectiveParser;
use crate::driver::Driver;
use crate::load::{gather_snapshots, load_programs};
use crate::store::MemoryFactStore;

/// Builder for configuring a run over one snapshot or a directory of them.
#[derive(Debug, Clone)]
pub struct Enumcheck {
    /// Snapshot file or directory to analyze
    root: PathBuf,

    /// Marker override; falls back to the config file, then the default
    marker: Option<String>,

    /// Whether independent units run concurrently
    parallel: bool,

    /// Whether to read enumcheck.toml
    use_config: bool,

    /// Unit path patterns whose findings are not reported
    ignored_patterns: Vec<String>,
}

impl Enumcheck {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            marker: None,
            parallel: true,
            use_config: true,
            ignored_patterns: Vec::new(),
        }
    }

    /// Sets the directive marker token.
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Enable or disable parallel execution of independent units.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Enable or disable reading enumcheck.toml.
    pub fn with_config(mut self, enabled: bool) -> Self {
        self.use_config = enabled;
        self
    }

    /// Add unit patterns whose findings are not reported. Their facts are
    /// still exported so dependents are checked normally.
    pub fn ignore_units(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignored_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Run the analysis and return results.
    pub fn analyze(&self) -> Result<AnalysisResult> {
        // 1. Config, when present
        let config = if self.use_config {
            match load_config(&self.root) {
                Ok(cfg) => cfg.unwrap_or_default(),
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable config");
                    EnumcheckConfig::default()
                }
            }
        } else {
            EnumcheckConfig::default()
        };

        let marker = self
            .marker
            .clone()
            .unwrap_or_else(|| config.marker().to_string());
        let parser = DirectiveParser::new(marker);
        let mut ignored = self.ignored_patterns.clone();
        ignored.extend(config.ignore_patterns().iter().cloned());

        // 2. Snapshots
        let paths = gather_snapshots(&self.root)
            .with_context(|| format!("Failed to gather snapshots from {}", self.root.display()))?;
        let mut result = AnalysisResult {
            root: self.root.clone(),
            output_format: config.output_format(),
            ..AnalysisResult::default()
        };
        let mut programs = Vec::with_capacity(paths.len());
        for (path, loaded) in load_programs(&paths) {
            match loaded {
                Ok(program) => programs.push((path, program)),
                Err(e) if e.is_recoverable() => {
                    warn!(snapshot = %path.display(), error = %e, "skipping snapshot");
                    result.skipped.push(path);
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to load snapshot {}", path.display()))
                }
            }
        }
        result.snapshots = programs.len();

        // 3. One driver run per snapshot, each with its own fact store
        for (path, program) in &programs {
            let store = MemoryFactStore::new();
            let report = Driver::new(program)
                .with_parser(parser.clone())
                .parallel(self.parallel)
                .run(&store)
                .with_context(|| format!("Failed to analyze {}", path.display()))?;

            result.units += report.units.len();
            for unit in &report.units {
                if let Some(bundle) = &unit.bundle {
                    result.facts.insert(unit.unit.clone(), bundle.render());
                }
                if is_ignored(&ignored, &unit.unit) {
                    continue;
                }
                result.diagnostics.extend(unit.diagnostics.iter().cloned());
                result.internal_errors.extend(unit.internal_errors.iter().cloned());
                result.suppressed += unit.suppressed;
            }
        }
        sort_diagnostics(&mut result.diagnostics);

        info!(
            snapshots = result.snapshots,
            units = result.units,
            diagnostics = result.diagnostics.len(),
            "run complete"
        );
        Ok(result)
    }
}

/// Check if a unit path matches any ignored pattern.
///
/// `prefix*` and `*suffix` match by prefix and suffix; any other pattern
/// matches exactly or as a substring.
pub fn is_ignored(patterns: &[String], unit: &str) -> bool {
    patterns.iter().any(|pattern| {
        if let Some(prefix) = pattern.strip_suffix('*') {
            unit.starts_with(prefix)
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            unit.ends_with(suffix)
        } else {
            unit == pattern || unit.contains(pattern.as_str())
        }
    })
}

/// Result of running enumcheck.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    /// Path that was analyzed
    pub root: PathBuf,

    /// Number of snapshots loaded
    pub snapshots: usize,

    /// Number of units analyzed across all snapshots
    pub units: usize,

    /// Reported findings, sorted by position
    pub diagnostics: Vec<Diagnostic>,

    /// Rendered fact bundle per declaring unit
    pub facts: BTreeMap<String, String>,

    /// Unexpected syntax shapes met during verification
    pub internal_errors: Vec<InternalError>,

    /// Findings dropped by ignore directives
    pub suppressed: usize,

    /// Snapshots that failed to parse or validate and were left out
    pub skipped: Vec<PathBuf>,

    /// Output format requested by the config file
    pub output_format: Option<OutputFormat>,
}

impl AnalysisResult {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.len()
    }
}
