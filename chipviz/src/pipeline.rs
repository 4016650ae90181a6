//! Parse, order and extend: the whole trip from a hyperplane file to a drawable boundary.

use crate::config::BoundaryConfig;
use chipviz_boundary::{extend_polyline, Viewport};
use chipviz_parse::{read_midpoints, MidpointSet};
use chipviz_tour::{Tour, TourBuilder, TourStats};
use chipviz_traits::{ChipResult, Point2};
use log::info;
use serde::Serialize;
use std::path::Path;

/// A boundary ready to be drawn.
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryTrace {
    pub tour: Tour,
    pub stats: TourStats,
    /// None only when there were no midpoints and no configured viewport.
    pub viewport: Option<Viewport>,
    /// Midpoints in tour order.
    pub polyline: Vec<Point2>,
    /// `polyline` with both ends stretched to the viewport edges.
    pub extended: Vec<Point2>,
}

/// Orders the 2-D `midpoints` and extends the resulting polyline to the configured
/// viewport, or to their padded bounding box when none is configured.
pub fn trace_boundary(midpoints: &MidpointSet, config: &BoundaryConfig) -> ChipResult<BoundaryTrace> {
    let planar = midpoints.planar()?;
    let (tour, stats) = TourBuilder::new(config.tour.clone()).build_with_stats(&planar);
    let polyline = tour.arrange(&planar);

    let viewport = match config.viewport {
        Some(viewport) => {
            viewport.validate()?;
            Some(viewport)
        }
        None => Viewport::enclosing(&planar, config.margin()),
    };
    let extended = match &viewport {
        Some(viewport) => extend_polyline(&polyline, viewport)?,
        None => polyline.clone(),
    };

    Ok(BoundaryTrace {
        tour,
        stats,
        viewport,
        polyline,
        extended,
    })
}

/// Reads the midpoints of a hyperplane file and traces their boundary.
pub fn trace_boundary_file(
    path: impl AsRef<Path>,
    config: &BoundaryConfig,
) -> ChipResult<BoundaryTrace> {
    let path = path.as_ref();
    let midpoints = read_midpoints(path, config.dimensions)?;
    let trace = trace_boundary(&midpoints, config)?;
    info!(
        "{}: boundary through {} midpoints, length {:.4}",
        path.display(),
        trace.polyline.len(),
        trace.stats.refined_length
    );
    Ok(trace)
}
