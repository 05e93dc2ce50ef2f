//! Oriented lane lines anchored at the dominant vanishing point.
//!
//! The clusterer is asked for a single vanishing point. Every segment of the
//! first cluster becomes an [`OrientedLine`] from the shared vanishing point to
//! the segment endpoint nearest the camera, tagged with a signed slope angle
//! that the pair selector uses to tell left lines from right lines.
use crate::backends::VanishingCluster;
use crate::error::{LaneError, LaneResult};
use crate::types::Point;
use log::debug;
use serde::Serialize;

/// Homogeneous estimates beyond this magnitude are treated as unstable.
const MAX_VP_COORD: f64 = (i32::MAX / 4) as f64;

/// Pre-clip lane line. `bottom.y >= top.y` is not guaranteed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OrientedLine {
    /// Vanishing point, shared by all lines of a cluster.
    pub top: Point,
    pub bottom: Point,
    pub angle: f64,
}

impl OrientedLine {
    pub fn new(top: Point, bottom: Point) -> Self {
        Self {
            top,
            bottom,
            angle: slope_angle(top, bottom),
        }
    }
}

/// `atan(dy / dx)` with `dy = top.y - bottom.y`, `dx = top.x - bottom.x`.
///
/// The result lies in `[-π/2, π/2]`. Lines rising to the right towards the
/// vanishing point (left lane boundaries) are negative, lines rising to the
/// left are positive. A zero-length line yields 0.
pub fn slope_angle(top: Point, bottom: Point) -> f64 {
    let dy = (top.y - bottom.y) as f64;
    let dx = (top.x - bottom.x) as f64;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    (dy / dx).atan()
}

/// Dehomogenizes a cluster's vanishing point, rejecting points at infinity
/// and numerically unstable estimates.
pub fn vanishing_point(cluster: &VanishingCluster) -> LaneResult<Point> {
    let v = cluster.point;
    if v[2] == 0.0 {
        return Err(LaneError::DegenerateVanishingPoint);
    }
    let x = v[0] / v[2];
    let y = v[1] / v[2];
    if !x.is_finite() || !y.is_finite() || x.abs() > MAX_VP_COORD || y.abs() > MAX_VP_COORD {
        debug!("vanishing: rejecting unstable estimate ({x:.1}, {y:.1})");
        return Err(LaneError::DegenerateVanishingPoint);
    }
    Ok(Point::new(x as i32, y as i32))
}

/// Converts the first cluster into oriented lines.
pub fn build_oriented_lines(
    clusters: &[VanishingCluster],
) -> LaneResult<(Point, Vec<OrientedLine>)> {
    let cluster = clusters
        .first()
        .filter(|c| !c.segments.is_empty())
        .ok_or(LaneError::DegenerateVanishingPoint)?;
    let vp = vanishing_point(cluster)?;
    let lines: Vec<OrientedLine> = cluster
        .segments
        .iter()
        .map(|s| OrientedLine::new(vp, s.lower_endpoint()))
        .collect();
    debug!(
        "vanishing: vp=({}, {}) with {} clustered lines",
        vp.x,
        vp.y,
        lines.len()
    );
    Ok((vp, lines))
}
