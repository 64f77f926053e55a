//! Directive comments and the annotation scanner.
//!
//! Grammar, after the comment delimiters and surrounding blanks are removed:
//!
//! ```text
//! directive := marker [ ":" option { "," option } ]
//! option    := "exhaustive" | "relaxed" | "ignore" | <anything else, ignored>
//! ```
//!
//! A directive on a type declaration marks it as a closed type. A directive
//! carrying `ignore` only suppresses diagnostics on its own line.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::syntax::{Comment, Decl, ObjectId, Pos, Spec, TypeId, TypeOracle, Unit};

/// Marker token used when no other is configured.
pub const DEFAULT_MARKER: &str = "enumcheck";

/// Whether dispatches over a closed type must also carry a catch-all clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// The representation is open (sized integer, string, ...), so unknown
    /// values can still show up at run time and need a `default` arm.
    #[default]
    Exhaustive,
    Relaxed,
}

impl Mode {
    pub fn needs_default(self) -> bool {
        self == Mode::Exhaustive
    }
}

/// One option of the directive option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveOption {
    Exhaustive,
    Relaxed,
    Ignore,
    /// Accepted for forward compatibility, has no effect.
    Unknown(String),
}

impl DirectiveOption {
    fn parse(word: &str) -> Self {
        match word {
            "exhaustive" => Self::Exhaustive,
            "relaxed" => Self::Relaxed,
            "ignore" => Self::Ignore,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// A parsed directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directive {
    pub mode: Mode,
    pub ignore: bool,
    pub unknown: Vec<String>,
}

impl Directive {
    /// Whether this directive declares a closed type when attached to one.
    pub fn declares(&self) -> bool {
        !self.ignore
    }
}

/// Recognizes directives for one marker token.
#[derive(Debug, Clone)]
pub struct DirectiveParser {
    marker: String,
}

impl Default for DirectiveParser {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl DirectiveParser {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Parses one raw comment. Returns `None` when it is not a directive.
    pub fn parse(&self, comment: &str) -> Option<Directive> {
        let body = strip_delimiters(comment).trim();
        let rest = body.strip_prefix(self.marker.as_str())?;

        let options = if rest.is_empty() {
            ""
        } else {
            rest.strip_prefix(':')?
        };

        let mut directive = Directive::default();
        for word in options.split(',').map(str::trim).filter(|w| !w.is_empty()) {
            match DirectiveOption::parse(word) {
                DirectiveOption::Exhaustive => directive.mode = Mode::Exhaustive,
                DirectiveOption::Relaxed => directive.mode = Mode::Relaxed,
                DirectiveOption::Ignore => directive.ignore = true,
                DirectiveOption::Unknown(word) => directive.unknown.push(word),
            }
        }
        Some(directive)
    }

    /// First directive in a comment list, if any.
    pub fn first_in(&self, comments: &[Comment]) -> Option<Directive> {
        comments.iter().find_map(|c| self.parse(&c.text))
    }
}

fn strip_delimiters(comment: &str) -> &str {
    if let Some(line) = comment.strip_prefix("//") {
        line
    } else if let Some(block) = comment.strip_prefix("/*") {
        block.strip_suffix("*/").unwrap_or(block)
    } else {
        comment
    }
}

/// A type declaration marked as a closed type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub name: String,
    pub object: ObjectId,
    pub ty: TypeId,
    pub pos: Pos,
    pub mode: Mode,
}

/// Finds every annotated type declaration of a unit.
///
/// A directive on the type itself (doc comment first, then trailing comment)
/// wins over one on the enclosing declaration group.
pub fn scan_annotations(
    unit: &Unit,
    oracle: &dyn TypeOracle,
    parser: &DirectiveParser,
) -> Vec<Annotation> {
    let mut found = Vec::new();

    for file in &unit.files {
        for decl in &file.decls {
            let Decl::Gen(group) = decl else { continue };
            let group_directive = parser.first_in(&group.doc);

            for spec in &group.specs {
                let Spec::Type(ts) = spec else { continue };

                let local = parser
                    .first_in(&ts.doc)
                    .or_else(|| parser.first_in(&ts.comment));
                let Some(directive) = local.or_else(|| group_directive.clone()) else {
                    continue;
                };

                if !directive.unknown.is_empty() {
                    debug!(
                        unit = %unit.path,
                        type_name = %ts.name,
                        options = ?directive.unknown,
                        "ignoring unknown directive options"
                    );
                }
                if !directive.declares() {
                    continue;
                }

                let Some(object) = oracle.object(ts.object) else {
                    warn!(
                        unit = %unit.path,
                        file = %file.name,
                        line = ts.pos.line,
                        type_name = %ts.name,
                        "annotated type has no resolved object, skipping"
                    );
                    continue;
                };

                found.push(Annotation {
                    name: ts.name.clone(),
                    object: ts.object,
                    ty: object.ty,
                    pos: ts.pos,
                    mode: directive.mode,
                });
            }
        }
    }

    found
}
