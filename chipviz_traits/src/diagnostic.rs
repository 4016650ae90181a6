use serde::Serialize;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Why a single line of an input file was skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LineIssue {
    #[error("bad integer {token:?}")]
    BadInteger { token: String },

    #[error("bad real number {token:?}")]
    BadFloat { token: String },

    #[error("expected {expected} fields, found {found}")]
    WrongFieldCount { expected: usize, found: usize },

    #[error("bad adjacency token {token:?}")]
    BadAdjacencyToken { token: String },
}

/// A skipped line, with its 1-based line number and original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDiagnostic {
    pub line: usize,
    pub text: String,
    pub issue: LineIssue,
}

impl Display for LineDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} skipped ({}): {}", self.line, self.issue, self.text)
    }
}

/// The result of a lenient parse: the value built from the good lines and
/// one diagnostic per skipped line.
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    pub value: T,
    pub diagnostics: Vec<LineDiagnostic>,
}

impl<T> Parsed<T> {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display() {
        let diag = LineDiagnostic {
            line: 4,
            text: "1|2".to_string(),
            issue: LineIssue::WrongFieldCount {
                expected: 4,
                found: 2,
            },
        };
        assert_eq!(
            diag.to_string(),
            "line 4 skipped (expected 4 fields, found 2): 1|2"
        );
    }
}
