//! Plane geometry for drawing boundaries inside a viewport.

use chipviz_traits::{ChipError, ChipResult, Point2};
use log::debug;
use serde::{Deserialize, Serialize};

/// Direction components at or below this magnitude count as zero.
pub const DIRECTION_EPSILON: f64 = 1e-8;

/// Fraction of the data extent added on every side by [`Viewport::enclosing`].
pub const DEFAULT_MARGIN: f64 = 0.05;

/// Relative slack allowed on the uncrossed coordinate of an exit point.
pub const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Axis aligned viewing rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Viewport {
    /// Creates a viewport, rejecting non finite or inverted bounds.
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> ChipResult<Self> {
        let viewport = Self {
            xmin,
            xmax,
            ymin,
            ymax,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    pub fn validate(&self) -> ChipResult<()> {
        let bounds = [self.xmin, self.xmax, self.ymin, self.ymax];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(ChipError::InvalidViewport(format!(
                "non finite bounds {bounds:?}"
            )));
        }
        if self.xmin > self.xmax || self.ymin > self.ymax {
            return Err(ChipError::InvalidViewport(format!(
                "inverted bounds x [{}, {}] y [{}, {}]",
                self.xmin, self.xmax, self.ymin, self.ymax
            )));
        }
        Ok(())
    }

    /// Bounding box of `points` padded by `margin` times its extent on every side,
    /// the way plots autoscale. A flat axis is padded by `margin` itself.
    /// Returns `None` for an empty or non finite point set.
    pub fn enclosing(points: &[Point2], margin: f64) -> Option<Self> {
        let first = points.first()?;
        let (mut xmin, mut xmax, mut ymin, mut ymax) = (first[0], first[0], first[1], first[1]);
        for p in &points[1..] {
            xmin = xmin.min(p[0]);
            xmax = xmax.max(p[0]);
            ymin = ymin.min(p[1]);
            ymax = ymax.max(p[1]);
        }
        let pad = |lo: f64, hi: f64| {
            let extent = hi - lo;
            if extent > 0.0 {
                extent * margin
            } else {
                margin
            }
        };
        let (px, py) = (pad(xmin, xmax), pad(ymin, ymax));
        Self::new(xmin - px, xmax + px, ymin - py, ymax + py).ok()
    }

    pub fn contains(&self, p: Point2) -> bool {
        p[0] >= self.xmin && p[0] <= self.xmax && p[1] >= self.ymin && p[1] <= self.ymax
    }

    /// True when `p` lies on one of the four edges, within `tolerance`.
    pub fn on_boundary(&self, p: Point2, tolerance: f64) -> bool {
        let within = |v: f64, lo: f64, hi: f64| v >= lo - tolerance && v <= hi + tolerance;
        let near = |v: f64, b: f64| (v - b).abs() <= tolerance;
        let on_vertical = (near(p[0], self.xmin) || near(p[0], self.xmax))
            && within(p[1], self.ymin, self.ymax);
        let on_horizontal = (near(p[1], self.ymin) || near(p[1], self.ymax))
            && within(p[0], self.xmin, self.xmax);
        on_vertical || on_horizontal
    }

    fn tolerance(&self) -> f64 {
        let span = (self.xmax - self.xmin).max(self.ymax - self.ymin);
        BOUNDARY_TOLERANCE * span.max(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Where a ray leaves the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Smallest strictly positive ray parameter among the candidates.
    pub t: f64,
    pub point: Point2,
}

pub fn is_zero_direction(direction: Point2) -> bool {
    direction.iter().all(|c| c.abs() <= DIRECTION_EPSILON)
}

/// Casts a ray from `origin` along `direction` (not zero) and finds the first
/// viewport edge it crosses.
///
/// Each axis with a non zero component proposes one candidate, the edge on the side
/// its sign points to. Only strictly positive candidates count, and the smallest wins.
/// The crossed coordinate is set exactly onto the edge; the other one must then lie
/// within its axis range. A ray with no positive candidate, or one that misses the
/// viewport (leaving it from an edge or passing beside it), is degenerate and
/// [`ChipError::DegenerateRay`] is returned.
///
/// # Examples
///
/// ```
/// use chipviz_boundary::{ray_exit, Viewport};
/// let viewport = Viewport::new(0.0, 10.0, 0.0, 10.0).unwrap();
/// let hit = ray_exit([5.0, 5.0], [1.0, 0.5], &viewport).unwrap();
/// assert_eq!(hit.point, [10.0, 7.5]);
/// ```
pub fn ray_exit(origin: Point2, direction: Point2, viewport: &Viewport) -> ChipResult<RayHit> {
    let mut candidates: Vec<(f64, Axis, f64)> = Vec::with_capacity(2);
    if direction[0] != 0.0 {
        let bound = if direction[0] > 0.0 {
            viewport.xmax
        } else {
            viewport.xmin
        };
        candidates.push(((bound - origin[0]) / direction[0], Axis::X, bound));
    }
    if direction[1] != 0.0 {
        let bound = if direction[1] > 0.0 {
            viewport.ymax
        } else {
            viewport.ymin
        };
        candidates.push(((bound - origin[1]) / direction[1], Axis::Y, bound));
    }

    let (t, axis, bound) = candidates
        .into_iter()
        .filter(|(t, _, _)| *t > 0.0)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .ok_or(ChipError::DegenerateRay { origin, direction })?;

    let mut point = [origin[0] + t * direction[0], origin[1] + t * direction[1]];
    let (other, lo, hi) = match axis {
        Axis::X => {
            point[0] = bound;
            (1, viewport.ymin, viewport.ymax)
        }
        Axis::Y => {
            point[1] = bound;
            (0, viewport.xmin, viewport.xmax)
        }
    };
    let tolerance = viewport.tolerance();
    if !(point[other] >= lo - tolerance && point[other] <= hi + tolerance) {
        debug!("ray from {origin:?} along {direction:?} misses the viewport at {point:?}");
        return Err(ChipError::DegenerateRay { origin, direction });
    }
    point[other] = point[other].clamp(lo, hi);
    Ok(RayHit { t, point })
}

/// Moves `point` along `direction` onto the viewport edge. A zero direction
/// leaves the point where it is.
pub fn extend_point(point: Point2, direction: Point2, viewport: &Viewport) -> ChipResult<Point2> {
    if is_zero_direction(direction) {
        debug!("zero direction at {point:?}, not extended");
        return Ok(point);
    }
    ray_exit(point, direction, viewport).map(|hit| hit.point)
}

/// Prepends the start of `polyline` continued backward to the viewport edge and
/// appends its end continued forward. The original points are kept in between.
/// With fewer than two points there is no segment to follow and the polyline is
/// returned as is.
pub fn extend_polyline(polyline: &[Point2], viewport: &Viewport) -> ChipResult<Vec<Point2>> {
    let n = polyline.len();
    if n < 2 {
        return Ok(polyline.to_vec());
    }
    let sub = |a: Point2, b: Point2| [a[0] - b[0], a[1] - b[1]];

    let start = extend_point(polyline[0], sub(polyline[0], polyline[1]), viewport)?;
    let end = extend_point(
        polyline[n - 1],
        sub(polyline[n - 1], polyline[n - 2]),
        viewport,
    )?;

    let mut extended = Vec::with_capacity(n + 2);
    extended.push(start);
    extended.extend_from_slice(polyline);
    extended.push(end);
    Ok(extended)
}
