//! Hyperplane records written by the hyperplane tool, one per support edge:
//!
//! ```text
//! id | v0,v1 | w0,w1,... | m0,m1,... | bias
//! ```
//!
//! Only the midpoint block (fourth field) is kept.

use crate::{parse_real_list, read_source, records, skip_line};
use chipviz_traits::{ChipError, ChipResult, LineIssue, Parsed, Point2};
use log::{debug, info};
use serde::Serialize;
use std::ops::Index;
use std::path::Path;

const HYPERPLANE_MIN_FIELDS: usize = 4;
const MIDPOINT_FIELD: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Midpoint(Vec<f64>);

impl Midpoint {
    pub fn new(coords: Vec<f64>) -> Self {
        Self(coords)
    }

    pub fn coords(&self) -> &[f64] {
        &self.0
    }

    pub fn dimensions(&self) -> usize {
        self.0.len()
    }
}

impl AsRef<[f64]> for Midpoint {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Midpoints in file order, all of the same dimensionality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MidpointSet {
    dimensions: usize,
    points: Vec<Midpoint>,
}

impl MidpointSet {
    pub fn empty(dimensions: usize) -> Self {
        Self {
            dimensions,
            points: Vec::new(),
        }
    }

    /// Builds a set from coordinate vectors, dropping those not of `dimensions` coordinates.
    pub fn from_coords<I>(dimensions: usize, coords: I) -> Self
    where
        I: IntoIterator<Item = Vec<f64>>,
    {
        let points = coords
            .into_iter()
            .filter(|c| c.len() == dimensions)
            .map(Midpoint)
            .collect();
        Self { dimensions, points }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Midpoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Midpoint> {
        self.points.iter()
    }

    /// The points as plane coordinates. Only 2-D sets can be drawn as a boundary.
    pub fn planar(&self) -> ChipResult<Vec<Point2>> {
        if self.dimensions != 2 {
            return Err(ChipError::UnsupportedDimensions {
                expected: 2,
                found: self.dimensions,
            });
        }
        Ok(self.points.iter().map(|p| [p.0[0], p.0[1]]).collect())
    }
}

impl Index<usize> for MidpointSet {
    type Output = Midpoint;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a MidpointSet {
    type Item = &'a Midpoint;
    type IntoIter = std::slice::Iter<'a, Midpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

fn parse_midpoints(source: &str, content: &str, dimensions: usize) -> Parsed<MidpointSet> {
    let mut points = Vec::new();
    let mut diagnostics = Vec::new();
    for (number, line) in records(content) {
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() < HYPERPLANE_MIN_FIELDS {
            let issue = LineIssue::WrongFieldCount {
                expected: HYPERPLANE_MIN_FIELDS,
                found: fields.len(),
            };
            skip_line(&mut diagnostics, source, number, line, issue);
            continue;
        }
        match parse_real_list(fields[MIDPOINT_FIELD]) {
            Ok(coords) if coords.len() == dimensions => points.push(Midpoint(coords)),
            Ok(coords) => debug!(
                "{source}: line {number} has a {}-D midpoint, expected {dimensions}-D, dropped",
                coords.len()
            ),
            Err(issue) => skip_line(&mut diagnostics, source, number, line, issue),
        }
    }
    Parsed {
        value: MidpointSet { dimensions, points },
        diagnostics,
    }
}

/// Parses hyperplane text held in memory, keeping the `dimensions`-D midpoints.
pub fn parse_midpoints_str(content: &str, dimensions: usize) -> Parsed<MidpointSet> {
    parse_midpoints("<memory>", content, dimensions)
}

pub fn read_midpoints_with_diagnostics(
    path: impl AsRef<Path>,
    dimensions: usize,
) -> ChipResult<Parsed<MidpointSet>> {
    let path = path.as_ref();
    let content = read_source(path)?;
    let parsed = parse_midpoints(&path.display().to_string(), &content, dimensions);
    info!(
        "{}: {} midpoints of dimension {dimensions}",
        path.display(),
        parsed.value.len()
    );
    Ok(parsed)
}

/// Reads the midpoints of a hyperplane file. Records whose midpoint does not have
/// exactly `dimensions` coordinates are dropped.
pub fn read_midpoints(path: impl AsRef<Path>, dimensions: usize) -> ChipResult<MidpointSet> {
    read_midpoints_with_diagnostics(path, dimensions).map(Parsed::into_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_matching_dimensions() {
        let content = "0,|1,2,|1.0,0.0,|0.5,0.5,|0.3\n1|2,3|0,1|1.5,2.5,3.5|0\n";
        let parsed = parse_midpoints_str(content, 2);
        assert!(parsed.is_clean());
        assert_eq!(parsed.value.len(), 1);
        assert_eq!(parsed.value[0].coords(), &[0.5, 0.5]);
    }

    #[test]
    fn empty_result_keeps_dimensions() {
        let set = parse_midpoints_str("\n\n", 3).value;
        assert!(set.is_empty());
        assert_eq!(set.dimensions(), 3);
    }

    #[test]
    fn short_and_bad_lines() {
        let parsed = parse_midpoints_str("a|b|c\n0|1,2|1,0|x,1|0\n1|1,2|1,0|3,4|0\n", 2);
        assert_eq!(parsed.value.len(), 1);
        assert_eq!(parsed.diagnostics.len(), 2);
        assert!(matches!(
            parsed.diagnostics[0].issue,
            LineIssue::WrongFieldCount { found: 3, .. }
        ));
        assert!(matches!(parsed.diagnostics[1].issue, LineIssue::BadFloat { .. }));
    }

    #[test]
    fn planar_requires_two_dimensions() {
        let set = MidpointSet::from_coords(2, vec![vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(set.planar().unwrap(), vec![[1.0, 2.0]]);
        let set = MidpointSet::empty(3);
        assert!(matches!(
            set.planar(),
            Err(ChipError::UnsupportedDimensions {
                expected: 2,
                found: 3
            })
        ));
    }
}
