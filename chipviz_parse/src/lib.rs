//! Parsers for the text files produced by the graph construction, hyperplane and
//! classifier tools.
//!
//! All three formats are line oriented and parsed leniently: a malformed line is
//! skipped, reported as a [`LineDiagnostic`] and logged, and the parse carries on.
//! Only a missing or unreadable file fails the whole call.

pub mod classification;
pub mod graph;
pub mod midpoints;

pub use classification::{
    parse_classification_str, read_classification, read_classification_with_diagnostics,
    ClassificationMap,
};
pub use graph::{
    parse_graph_str, read_graph, read_graph_with_diagnostics, Adjacency, DrawnEdges, EdgeSegment,
    Graph, GraphVertex, VertexId,
};
pub use midpoints::{
    parse_midpoints_str, read_midpoints, read_midpoints_with_diagnostics, Midpoint, MidpointSet,
};

use chipviz_traits::{ChipError, ChipResult, LineDiagnostic, LineIssue};
use log::warn;
use std::path::Path;

/// Reads a whole input file, mapping a missing file and non UTF-8 content to
/// their distinct errors.
pub(crate) fn read_source(path: &Path) -> ChipResult<String> {
    std::fs::read_to_string(path).map_err(|e| ChipError::from_io(path, e))
}

/// Iterates over the trimmed, non empty lines of `content` with their 1-based numbers.
pub(crate) fn records(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Records a skipped line and logs it.
pub(crate) fn skip_line(
    diagnostics: &mut Vec<LineDiagnostic>,
    source: &str,
    line: usize,
    text: &str,
    issue: LineIssue,
) {
    let diagnostic = LineDiagnostic {
        line,
        text: text.to_string(),
        issue,
    };
    warn!("{source}: {diagnostic}");
    diagnostics.push(diagnostic);
}

pub(crate) fn parse_integer(token: &str) -> Result<i64, LineIssue> {
    let token = token.trim();
    token.parse::<i64>().map_err(|_| LineIssue::BadInteger {
        token: token.to_string(),
    })
}

pub(crate) fn parse_real(token: &str) -> Result<f64, LineIssue> {
    let token = token.trim();
    token.parse::<f64>().map_err(|_| LineIssue::BadFloat {
        token: token.to_string(),
    })
}

/// Parses a comma separated list of reals, ignoring empty tokens so that
/// trailing separators are tolerated.
pub(crate) fn parse_real_list(field: &str) -> Result<Vec<f64>, LineIssue> {
    field
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_real)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_skip_blank_lines() {
        let content = "a\n\n   \n b \r\nc";
        let lines: Vec<_> = records(content).collect();
        assert_eq!(lines, vec![(1, "a"), (4, "b"), (5, "c")]);
    }

    #[test]
    fn real_list_tolerates_trailing_commas() {
        assert_eq!(parse_real_list("1.5, -2,,3e1,").unwrap(), vec![1.5, -2.0, 30.0]);
        assert_eq!(parse_real_list("").unwrap(), Vec::<f64>::new());
        assert_eq!(
            parse_real_list("1,x"),
            Err(LineIssue::BadFloat {
                token: "x".to_string()
            })
        );
    }

    #[test]
    fn integer_tokens_are_trimmed() {
        assert_eq!(parse_integer(" -12 "), Ok(-12));
        assert!(matches!(parse_integer("1.0"), Err(LineIssue::BadInteger { .. })));
    }

    #[test]
    fn missing_file_is_distinct() {
        let err = read_source(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ChipError::FileNotFound(_)));
    }
}
