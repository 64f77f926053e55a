//! enumcheck-core: closed-set discipline for nominal types.
//!
//! A type marked with a directive comment is treated as a closed set. The
//! engine discovers its members (named constants/variables, or the concrete
//! types registered against an interface) and checks every place the type is
//! produced, consumed or matched:
//!
//! - raw literals flowing into a closed type are reported as implicit
//!   conversions;
//! - dispatches that do not mention every member are reported as missing
//!   cases;
//! - composite values used as dispatch labels are reported as invalid.
//!
//! The engine does not parse source text. A host front end hands over a
//! [`Program`] snapshot (syntax trees plus resolved types), usually as JSON.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use enumcheck_core::prelude::*;
//!
//! let result = Enumcheck::new("/path/to/snapshots").analyze()?;
//!
//! for diagnostic in &result.diagnostics {
//!     println!("{}", diagnostic);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`syntax`]: Snapshot model and the type-resolution oracle
//! - [`directive`]: Directive grammar and annotation scanning
//! - [`members`]: Membership collection
//! - [`facts`]: Closed-type descriptors, fact bundles, merged table
//! - [`store`]: Fact persistence between units
//! - [`suppress`]: Line-level ignore directives
//! - [`verify`]: Usage verifier
//! - [`analysis`]: The per-unit pipeline
//! - [`driver`]: Dependency-ordered scheduling over a program
//! - [`load`]: Snapshot discovery and loading
//! - [`builder`]: Fluent builder API for configuration
//! - [`error`]: Typed error handling

pub mod analysis;
pub mod builder;
pub mod config;
pub mod diagnostic;
pub mod directive;
pub mod driver;
pub mod error;
pub mod facts;
pub mod load;
pub mod logging;
pub mod members;
pub mod prelude;
pub mod report;
pub mod store;
pub mod suppress;
pub mod syntax;
pub mod verify;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{EnumcheckError, EnumcheckResult, IoResultExt};

// Builder API
pub use builder::{is_ignored, AnalysisResult, Enumcheck};

// Configuration
pub use config::{load_config, EnumcheckConfig, OutputConfig, OutputFormat, CONFIG_FILE};

// Snapshot model
pub use syntax::{Program, TypeId, TypeOracle, Unit};

// Directives
pub use directive::{
    scan_annotations, Annotation, Directive, DirectiveParser, Mode, DEFAULT_MARKER,
};

// Facts
pub use facts::{ClosedKind, ClosedType, ClosedTypeTable, FactBundle, Members};
pub use members::collect_members;
pub use store::{FactStore, MemoryFactStore};

// Verification
pub use diagnostic::{humane_list, Diagnostic, DiagnosticKind, InternalError};
pub use suppress::{SuppressionIndex, SuppressionMark};
pub use verify::{verify_unit, Sink, VerifyOutcome};

// Pipeline and scheduling
pub use analysis::{analyze_unit, build_facts, UnitReport};
pub use driver::{build_import_graph, dependency_waves, transitive_imports, Driver, RunReport};

// Loading
pub use load::{gather_snapshots, load_program, load_programs, parse_program};

// Logging
pub use logging::{init_structured_logging, log_internal_error};

// Reporting
pub use report::{print_facts, print_json, print_plain, render_plain, to_json};

#[cfg(test)]
mod testkit;
