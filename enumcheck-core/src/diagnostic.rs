//! Findings reported to users and the separate internal-error channel.

use std::fmt;

use serde::Serialize;

/// The three kinds of user-facing findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A raw literal or out-of-set value reaches a closed-type slot.
    ImplicitConversion,
    /// A composite value is matched instead of a named member.
    InvalidEnum,
    /// A dispatch does not cover every member.
    MissingCases,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub unit: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: {}", self.file, self.line, self.column, self.message)
    }
}

/// A syntax shape the verifier did not expect. Never user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InternalError {
    pub unit: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: enumcheck internal error: {}",
            self.file, self.line, self.column, self.message
        )
    }
}

/// Joins items as `A`, `A and B`, `A, B and C`.
pub fn humane_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{} and {}", head.join(", "), last.as_ref())
        }
    }
}

/// Orders findings by file, then position, then message.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.unit
            .cmp(&b.unit)
            .then_with(|| a.file.cmp(&b.file))
            .then(a.line.cmp(&b.line))
            .then(a.column.cmp(&b.column))
            .then_with(|| a.message.cmp(&b.message))
    });
}
