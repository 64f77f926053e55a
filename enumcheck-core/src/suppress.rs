//! Line-level suppression through `ignore` directives.
//!
//! Purely syntactic: any comment on a line carrying an ignore directive
//! silences every diagnostic reported on that line of that file.

use std::collections::{HashMap, HashSet};

use crate::directive::DirectiveParser;
use crate::syntax::Unit;

/// A suppressed `(file, line)` location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SuppressionMark {
    pub file: String,
    pub line: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SuppressionIndex {
    /// file name -> suppressed lines
    marks: HashMap<String, HashSet<u32>>,
}

impl SuppressionIndex {
    /// Scans every comment of every file of the unit once.
    pub fn build(unit: &Unit, parser: &DirectiveParser) -> Self {
        let mut index = Self::default();
        for file in &unit.files {
            for comment in &file.comments {
                if parser.parse(&comment.text).is_some_and(|d| d.ignore) {
                    index.insert(SuppressionMark {
                        file: file.name.clone(),
                        line: comment.pos.line,
                    });
                }
            }
        }
        index
    }

    pub fn insert(&mut self, mark: SuppressionMark) {
        self.marks.entry(mark.file).or_default().insert(mark.line);
    }

    pub fn is_suppressed(&self, file: &str, line: u32) -> bool {
        self.marks.get(file).is_some_and(|lines| lines.contains(&line))
    }

    /// Number of suppressed lines across all files.
    pub fn len(&self) -> usize {
        self.marks.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Comment, Pos, SourceFile};

    fn unit_with_comments(comments: &[(u32, &str)]) -> Unit {
        Unit {
            path: "app".to_string(),
            files: vec![SourceFile {
                name: "main.go".to_string(),
                comments: comments
                    .iter()
                    .map(|(line, text)| Comment {
                        pos: Pos::new(*line, 20),
                        text: text.to_string(),
                    })
                    .collect(),
                decls: Vec::new(),
            }],
            ..Unit::default()
        }
    }

    #[test]
    fn test_ignore_marks_line() {
        let unit = unit_with_comments(&[(4, "//enumcheck:ignore"), (9, "// plain comment")]);
        let index = SuppressionIndex::build(&unit, &DirectiveParser::default());
        assert_eq!(index.len(), 1);
        assert!(index.is_suppressed("main.go", 4));
        assert!(!index.is_suppressed("main.go", 9));
        assert!(!index.is_suppressed("other.go", 4));
    }

    #[test]
    fn test_non_ignore_directive_is_not_a_mark() {
        let unit = unit_with_comments(&[(2, "//enumcheck:relaxed"), (3, "//enumcheck")]);
        let index = SuppressionIndex::build(&unit, &DirectiveParser::default());
        assert!(index.is_empty());
    }

    #[test]
    fn test_combined_options_still_ignore() {
        let unit = unit_with_comments(&[(7, "//enumcheck:relaxed,ignore")]);
        let index = SuppressionIndex::build(&unit, &DirectiveParser::default());
        assert!(index.is_suppressed("main.go", 7));
    }
}
