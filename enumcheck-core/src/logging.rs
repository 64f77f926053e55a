//! Structured logging using **tracing**.
//!
//! Library code only emits events (`debug!` per pipeline phase, `info!` per
//! run, `warn!` for internal errors). Binaries install the subscriber once
//! with [`init_structured_logging`]; events are written as JSON to stderr so
//! stdout stays reserved for diagnostics.

use tracing::warn;

use crate::diagnostic::InternalError;

/// Initializes the global tracing subscriber.
///
/// Call once at startup. Later calls are ignored.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=enumcheck_core=debug`)
pub fn init_structured_logging() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Logs an internal error with its location as structured fields.
pub fn log_internal_error(err: &InternalError) {
    warn!(
        unit = %err.unit,
        file = %err.file,
        line = err.line,
        column = err.column,
        detail = %err.message,
        "enumcheck internal error"
    );
}
