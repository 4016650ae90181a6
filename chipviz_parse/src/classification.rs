//! `id,class` lines written by the classifiers.

use crate::{parse_integer, read_source, records, skip_line};
use chipviz_traits::{ChipResult, LineIssue, Parsed};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

const CLASSIFICATION_FIELDS: usize = 2;

/// Vertex id to class id. Ids absent from the map are unclassified, lookups
/// take the caller's default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassificationMap {
    classes: BTreeMap<i64, i64>,
}

impl ClassificationMap {
    pub fn get(&self, id: i64) -> Option<i64> {
        self.classes.get(&id).copied()
    }

    pub fn class_or(&self, id: i64, default: i64) -> i64 {
        self.get(id).unwrap_or(default)
    }

    /// Classes of `ids` in order, `default` standing in for unclassified ids.
    pub fn classes_for<I>(&self, ids: I, default: i64) -> Vec<i64>
    where
        I: IntoIterator<Item = i64>,
    {
        ids.into_iter().map(|id| self.class_or(id, default)).collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// (vertex id, class id) pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.classes.iter().map(|(id, class)| (*id, *class))
    }
}

fn parse_record(line: &str) -> Result<(i64, i64), LineIssue> {
    let fields: Vec<&str> = line.split(',').collect();
    let [id, class] = fields.as_slice() else {
        return Err(LineIssue::WrongFieldCount {
            expected: CLASSIFICATION_FIELDS,
            found: fields.len(),
        });
    };
    Ok((parse_integer(id)?, parse_integer(class)?))
}

fn parse_classification(source: &str, content: &str) -> Parsed<ClassificationMap> {
    let mut classes = BTreeMap::new();
    let mut diagnostics = Vec::new();
    for (number, line) in records(content) {
        match parse_record(line) {
            Ok((id, class)) => {
                classes.insert(id, class);
            }
            Err(issue) => skip_line(&mut diagnostics, source, number, line, issue),
        }
    }
    Parsed {
        value: ClassificationMap { classes },
        diagnostics,
    }
}

pub fn parse_classification_str(content: &str) -> Parsed<ClassificationMap> {
    parse_classification("<memory>", content)
}

pub fn read_classification_with_diagnostics(
    path: impl AsRef<Path>,
) -> ChipResult<Parsed<ClassificationMap>> {
    let path = path.as_ref();
    let content = read_source(path)?;
    let parsed = parse_classification(&path.display().to_string(), &content);
    info!(
        "{}: {} classified vertices",
        path.display(),
        parsed.value.len()
    );
    Ok(parsed)
}

/// Reads a classifier output file. Malformed lines are logged and skipped.
pub fn read_classification(path: impl AsRef<Path>) -> ChipResult<ClassificationMap> {
    read_classification_with_diagnostics(path).map(Parsed::into_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins_and_bad_lines_are_skipped() {
        let parsed = parse_classification_str("5,1\n7,0\nbad-line\n5,2");
        let map = parsed.value;
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(5), Some(2));
        assert_eq!(map.get(7), Some(0));
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].line, 3);
    }

    #[test]
    fn exactly_two_fields() {
        let parsed = parse_classification_str("1,2,3\n4\n-3, 1\n");
        assert_eq!(parsed.value.iter().collect::<Vec<_>>(), vec![(-3, 1)]);
        assert!(parsed.diagnostics.iter().all(|d| matches!(
            d.issue,
            LineIssue::WrongFieldCount { expected: 2, .. }
        )));
    }

    #[test]
    fn defaults_are_supplied_by_the_caller() {
        let map = parse_classification_str("-2,1\n").value;
        assert_eq!(map.class_or(-1, 0), 0);
        assert_eq!(map.classes_for(-3..0, 9), vec![9, 1, 9]);
    }
}
