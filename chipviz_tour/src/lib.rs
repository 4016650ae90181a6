//! Orders an unordered set of points into an open path so it can be drawn as a polyline.
//!
//! The route starts at point 0 and is built greedily by always moving to the closest
//! unvisited point, then shortened by 2-opt segment reversals until a full pass finds
//! no strictly shorter route. The path is open: the last point does not connect back
//! to the first. Refinement never moves the first or the last point of the route.
//!
//! ```
//! use chipviz_tour::TourBuilder;
//!
//! let points = [[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]];
//! let tour = TourBuilder::default().build(&points);
//! assert_eq!(tour.as_slice(), &[0, 1, 2]);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Euclidean distance between two points of the same dimensionality.
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Length of the open path visiting `points` in `order`.
pub fn path_length<P: AsRef<[f64]>>(order: &[usize], points: &[P]) -> f64 {
    order
        .windows(2)
        .map(|w| distance(points[w[0]].as_ref(), points[w[1]].as_ref()))
        .sum()
}

/// Greedy nearest neighbor route starting at index 0. Ties go to the lowest index.
pub fn nearest_neighbor_order<P: AsRef<[f64]>>(points: &[P]) -> Vec<usize> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }
    let mut visited = vec![false; n];
    let mut route = Vec::with_capacity(n);
    let mut current = 0;
    visited[current] = true;
    route.push(current);

    while route.len() < n {
        let here = points[current].as_ref();
        let mut best: Option<(usize, f64)> = None;
        for (candidate, point) in points.iter().enumerate() {
            if visited[candidate] {
                continue;
            }
            let d = distance(here, point.as_ref());
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((candidate, d)),
            }
        }
        // at least one unvisited point remains while the route is short
        let Some((next, _)) = best else { break };
        visited[next] = true;
        route.push(next);
        current = next;
    }
    route
}

/// Change in open path length when `route[i..j]` is reversed, `1 <= i` and `j < n`.
/// Only the edge entering the segment and the edge leaving it change.
fn reversal_delta<P: AsRef<[f64]>>(route: &[usize], points: &[P], i: usize, j: usize) -> f64 {
    let p = |k: usize| points[route[k]].as_ref();
    let before = distance(p(i - 1), p(i)) + distance(p(j - 1), p(j));
    let after = distance(p(i - 1), p(j - 1)) + distance(p(i), p(j));
    after - before
}

/// Refinement limits. The default runs 2-opt until convergence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourOptions {
    /// Stop after this many full passes even if the last one still improved.
    #[serde(default)]
    pub max_passes: Option<usize>,
}

/// What happened while building a tour.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TourStats {
    /// Length of the route handed to [`two_opt`], the nearest neighbor route when
    /// built through [`TourBuilder`].
    pub initial_length: f64,
    pub refined_length: f64,
    pub passes: usize,
    pub moves: usize,
    /// False when `max_passes` stopped the refinement before a pass without improvement.
    pub converged: bool,
}

/// Improves `route` in place with 2-opt reversals of `route[i..j]` (end excluded),
/// `1 <= i <= n-3` and `i+2 <= j <= n-1`, adopting each strictly shorter candidate
/// as soon as it is found. `route[0]` and `route[n-1]` stay where they are.
pub fn two_opt<P: AsRef<[f64]>>(
    route: &mut [usize],
    points: &[P],
    options: &TourOptions,
) -> TourStats {
    let n = route.len();
    let start_length = path_length(route, points);
    let mut stats = TourStats {
        initial_length: start_length,
        refined_length: start_length,
        converged: true,
        ..TourStats::default()
    };
    if n < 4 {
        return stats;
    }

    let mut improved = true;
    while improved {
        if options.max_passes.is_some_and(|max| stats.passes >= max) {
            stats.converged = false;
            break;
        }
        improved = false;
        stats.passes += 1;
        for i in 1..=n - 3 {
            for j in i + 2..n {
                if reversal_delta(route, points, i, j) < 0.0 {
                    route[i..j].reverse();
                    stats.moves += 1;
                    improved = true;
                }
            }
        }
    }
    stats.refined_length = path_length(route, points);
    stats
}

/// A visiting order over a point set: every index in `0..n` exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tour {
    order: Vec<usize>,
}

impl Tour {
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.order.iter()
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.order
    }

    /// Open path length of this tour over `points`.
    pub fn length<P: AsRef<[f64]>>(&self, points: &[P]) -> f64 {
        path_length(&self.order, points)
    }

    /// The points in tour order.
    pub fn arrange<T: Clone>(&self, points: &[T]) -> Vec<T> {
        self.order.iter().map(|&i| points[i].clone()).collect()
    }
}

impl Index<usize> for Tour {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.order[index]
    }
}

impl<'a> IntoIterator for &'a Tour {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TourBuilder {
    options: TourOptions,
}

impl TourBuilder {
    pub fn new(options: TourOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TourOptions {
        &self.options
    }

    pub fn build<P: AsRef<[f64]>>(&self, points: &[P]) -> Tour {
        self.build_with_stats(points).0
    }

    pub fn build_with_stats<P: AsRef<[f64]>>(&self, points: &[P]) -> (Tour, TourStats) {
        let mut order = nearest_neighbor_order(points);
        let stats = two_opt(&mut order, points, &self.options);
        debug!(
            "tour over {} points: {:.4} -> {:.4} in {} passes, {} moves",
            order.len(),
            stats.initial_length,
            stats.refined_length,
            stats.passes,
            stats.moves
        );
        (Tour { order }, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single() {
        let none: [[f64; 2]; 0] = [];
        assert!(TourBuilder::default().build(&none).is_empty());
        assert_eq!(TourBuilder::default().build(&[[3.0, 4.0]]).as_slice(), &[0]);
    }

    #[test]
    fn ties_go_to_the_lowest_index() {
        let points = [[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]];
        assert_eq!(nearest_neighbor_order(&points), vec![0, 1, 2]);
        let (tour, stats) = TourBuilder::default().build_with_stats(&points);
        assert_eq!(tour.as_slice(), &[0, 1, 2]);
        assert_eq!(stats.moves, 0);
        assert_eq!(stats.initial_length, stats.refined_length);
    }

    #[test]
    fn path_is_open() {
        let points = [[0.0, 0.0], [3.0, 4.0], [3.0, 0.0]];
        assert_eq!(path_length(&[0, 1, 2], &points), 9.0);
    }

    #[test]
    fn delta_matches_full_recomputation() {
        let points = [
            [0.0, 0.0],
            [4.0, 1.0],
            [1.0, 3.0],
            [5.0, 5.0],
            [2.0, -1.0],
            [6.0, 2.0],
        ];
        let route: Vec<usize> = (0..points.len()).collect();
        for i in 1..=route.len() - 3 {
            for j in i + 2..route.len() {
                let mut reversed = route.clone();
                reversed[i..j].reverse();
                let expected = path_length(&reversed, &points) - path_length(&route, &points);
                assert!((reversal_delta(&route, &points, i, j) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn endpoints_stay_fixed() {
        // reversing the tail would give [0, 3, 2, 1] of length 5
        let points = [[0.0, 0.0], [3.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        let mut route = vec![0, 1, 2, 3];
        let stats = two_opt(&mut route, &points, &TourOptions::default());
        assert_eq!(route, vec![0, 2, 1, 3]);
        assert_eq!(stats.initial_length, 6.0);
        assert_eq!(stats.refined_length, 4.0);
        assert_eq!(stats.moves, 1);
    }

    #[test]
    fn swaps_two_neighbors() {
        let points = [[0.0, 0.0], [2.0, 0.0], [1.0, 0.0], [3.0, 0.0], [4.0, 0.0]];
        let mut route = vec![0, 1, 2, 3, 4];
        two_opt(&mut route, &points, &TourOptions::default());
        assert_eq!(route, vec![0, 2, 1, 3, 4]);
    }

    #[test]
    fn uncrosses_a_zigzag() {
        // nearest neighbor leaves a long jump back that 2-opt removes
        let points = [
            [0.0, 0.0],
            [1.0, 0.0],
            [3.0, 0.0],
            [2.0, 0.1],
            [4.0, 0.0],
            [1.5, 5.0],
        ];
        let (tour, stats) = TourBuilder::default().build_with_stats(&points);
        assert!(stats.refined_length <= stats.initial_length);
        assert!(stats.converged);
        assert_eq!(tour.len(), points.len());
    }

    #[test]
    fn max_passes_caps_refinement() {
        let points: Vec<[f64; 2]> = (0..40)
            .map(|k| {
                let k = k as f64;
                [(k * 7.3).sin() * 10.0, (k * 3.1).cos() * 10.0]
            })
            .collect();
        let capped = TourBuilder::new(TourOptions {
            max_passes: Some(0),
        });
        let (tour, stats) = capped.build_with_stats(&points);
        assert_eq!(tour.into_vec(), nearest_neighbor_order(&points));
        assert_eq!(stats.passes, 0);
        assert!(!stats.converged);
    }

    #[test]
    fn works_in_higher_dimensions() {
        let points = vec![
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 5.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.0, 2.0],
        ];
        let tour = TourBuilder::default().build(&points);
        assert_eq!(tour.as_slice(), &[0, 2, 3, 1]);
    }
}
