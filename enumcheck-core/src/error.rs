//! Typed error handling for enumcheck.
//!
//! These are failures of the engine or its host plumbing. Findings about the
//! analyzed program are [`crate::Diagnostic`]s and never travel through here.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for enumcheck operations.
#[derive(Error, Debug)]
pub enum EnumcheckError {
    /// I/O error when reading snapshots or config
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Malformed snapshot document
    #[error("Parse error in {path}: {message}")]
    Parse {
        path: PathBuf,
        message: String,
        /// Line number (1-indexed) if available
        line: Option<usize>,
        /// Column number (1-indexed) if available
        column: Option<usize>,
    },

    /// Snapshot parsed but references things it does not define
    #[error("Invalid snapshot: {message}")]
    InvalidSnapshot { message: String },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A unit was requested or imported that the snapshot does not contain
    #[error("Unknown unit: {unit}")]
    UnknownUnit { unit: String },

    /// Units import each other in a loop
    #[error("Import cycle through unit {unit}")]
    Cycle { unit: String },

    /// Two fact bundles describe the same type differently
    #[error("Conflicting facts for {type_name}: {existing} vs {incoming}")]
    FactConflict {
        type_name: String,
        existing: String,
        incoming: String,
    },

    /// A unit tried to export its facts twice
    #[error("Facts for unit {unit} were already exported")]
    DuplicateExport { unit: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EnumcheckError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a parse error from a JSON failure, keeping its location.
    pub fn json(path: impl Into<PathBuf>, err: &serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            message: err.to_string(),
            line: Some(err.line()).filter(|l| *l > 0),
            column: Some(err.column()).filter(|c| *c > 0),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if analysis of other snapshots can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::InvalidSnapshot { .. } | Self::Config { .. }
        )
    }
}

/// Convenience type alias for enumcheck results.
pub type EnumcheckResult<T> = Result<T, EnumcheckError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> EnumcheckResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> EnumcheckResult<T> {
        self.map_err(|e| EnumcheckError::io(path, e))
    }
}
