//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use enumcheck_core::prelude::*;
//! ```

// Core analysis types
pub use crate::diagnostic::{Diagnostic, DiagnosticKind, InternalError};
pub use crate::error::{EnumcheckError, EnumcheckResult};
pub use crate::facts::{ClosedType, FactBundle};

// Snapshot model
pub use crate::syntax::{Program, TypeOracle};

// Pipeline
pub use crate::driver::{Driver, RunReport};
pub use crate::store::{FactStore, MemoryFactStore};

// Loading
pub use crate::load::{gather_snapshots, load_program};

// Configuration
pub use crate::config::{load_config, EnumcheckConfig};

// Builder API
pub use crate::builder::{AnalysisResult, Enumcheck};
