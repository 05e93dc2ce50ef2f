//! RANSAC vanishing-point clustering.
//!
//! Hypotheses are intersections of segment pairs (cross products of their
//! normalized lines). Every segment pair is tried when there are few enough,
//! otherwise `iterations` random pairs are drawn. A segment supports a
//! hypothesis when its direction agrees, up to `inlier_angle_deg`, with the
//! direction from its midpoint towards the point; hypotheses are scored by the
//! summed length of their supporters. The winner is refit on its inliers by
//! length-weighted least squares. Further vanishing points are found by
//! removing the inliers and repeating.
use super::{VanishingCluster, VanishingPointClusterer};
use crate::angle::angle_between_dirless;
use crate::segments::LineSegment;
use log::debug;
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RansacVanishingPoint {
    /// Upper bound on pair hypotheses per vanishing point.
    pub iterations: usize,
    /// Inlier tolerance in degrees.
    pub inlier_angle_deg: f64,
    /// Minimum supporters for a cluster to be reported.
    pub min_inliers: usize,
    pub seed: u64,
}

impl Default for RansacVanishingPoint {
    fn default() -> Self {
        Self {
            iterations: 500,
            inlier_angle_deg: 4.0,
            min_inliers: 2,
            seed: 0x5eed,
        }
    }
}

/// Estimates a vanishing point from a family of line segments.
///
/// Solves for `v = (x, y)` minimizing `Σ w (a x + b y + c)²` over the
/// normalized lines, weighting each by its length. A near-singular normal
/// matrix (parallel family) yields a point at infinity along the longest
/// segment.
pub fn estimate_vp(segs: &[LineSegment], indices: &[usize]) -> Option<Vector3<f64>> {
    if indices.is_empty() {
        return None;
    }

    let mut a11 = 0.0f64;
    let mut a12 = 0.0f64;
    let mut a22 = 0.0f64;
    let mut bx = 0.0f64;
    let mut by = 0.0f64;
    for &idx in indices {
        let s = &segs[idx];
        let line = s.line();
        let (a, b, c) = (line[0], line[1], line[2]);
        let w = s.length().max(1.0);
        a11 += w * a * a;
        a12 += w * a * b;
        a22 += w * b * b;
        bx += -w * c * a;
        by += -w * c * b;
    }
    let det = a11 * a22 - a12 * a12;
    let trace = a11 + a22;
    if det.abs() <= 1e-9f64.max(1e-9 * trace * trace) {
        debug!("ransac-vp: normal matrix near-singular, returning point at infinity");
        let longest = indices
            .iter()
            .map(|&i| segs[i])
            .max_by_key(|s| s.length_sq())?;
        let dir = longest.direction();
        return Some(Vector3::new(dir[0], dir[1], 0.0));
    }
    let inv11 = a22 / det;
    let inv12 = -a12 / det;
    let inv22 = a11 / det;
    let x = inv11 * bx + inv12 * by;
    let y = inv12 * bx + inv22 * by;
    Some(Vector3::new(x, y, 1.0))
}

/// Angle between a segment and the direction from its midpoint to `vp`.
fn residual(seg: &LineSegment, vp: &Vector3<f64>) -> f64 {
    let mid = seg.midpoint();
    let to_vp = if vp[2].abs() > 1e-12 {
        [vp[0] / vp[2] - mid[0], vp[1] / vp[2] - mid[1]]
    } else {
        [vp[0], vp[1]]
    };
    let dir = [(seg.x2 - seg.x1) as f64, (seg.y2 - seg.y1) as f64];
    angle_between_dirless(&dir, &to_vp)
}

impl RansacVanishingPoint {
    fn hypotheses(
        &self,
        pool: &[usize],
        lines: &[Vector3<f64>],
        rng: &mut StdRng,
    ) -> Vec<Vector3<f64>> {
        let n = pool.len();
        let pairs = n * (n - 1) / 2;
        let mut out = Vec::new();
        let mut push = |i: usize, j: usize| {
            let p = lines[pool[i]].cross(&lines[pool[j]]);
            if p.norm() > 1e-12 {
                out.push(p);
            }
        };
        if pairs <= self.iterations {
            for i in 0..n {
                for j in i + 1..n {
                    push(i, j);
                }
            }
        } else {
            for _ in 0..self.iterations {
                let i = rng.gen_range(0..n);
                let mut j = rng.gen_range(0..n - 1);
                if j >= i {
                    j += 1;
                }
                push(i, j);
            }
        }
        out
    }
}

impl VanishingPointClusterer for RansacVanishingPoint {
    fn cluster(
        &self,
        segments: &[LineSegment],
        _width: usize,
        _height: usize,
        count: usize,
    ) -> Vec<VanishingCluster> {
        let lines: Vec<Vector3<f64>> = segments.iter().map(|s| s.line()).collect();
        let mut pool: Vec<usize> = (0..segments.len())
            .filter(|&i| segments[i].length_sq() > 0)
            .collect();
        let tol = self.inlier_angle_deg.to_radians();
        let min_inliers = self.min_inliers.max(2);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut clusters = Vec::new();

        while clusters.len() < count && pool.len() >= min_inliers {
            let mut best: Option<(f64, Vec<usize>)> = None;
            for vp in self.hypotheses(&pool, &lines, &mut rng) {
                let inliers: Vec<usize> = pool
                    .iter()
                    .copied()
                    .filter(|&i| residual(&segments[i], &vp) < tol)
                    .collect();
                let score: f64 = inliers.iter().map(|&i| segments[i].length()).sum();
                if best.as_ref().map_or(true, |(s, _)| score > *s) {
                    best = Some((score, inliers));
                }
            }
            let Some((score, inliers)) = best else {
                break;
            };
            if inliers.len() < min_inliers {
                break;
            }
            let Some(point) = estimate_vp(segments, &inliers) else {
                break;
            };
            debug!(
                "ransac-vp: cluster {} with {} inliers (score {:.1}) at [{:.2}, {:.2}, {:.2}]",
                clusters.len(),
                inliers.len(),
                score,
                point[0],
                point[1],
                point[2]
            );
            pool.retain(|i| !inliers.contains(i));
            clusters.push(VanishingCluster {
                point,
                segments: inliers.iter().map(|&i| segments[i]).collect(),
            });
        }
        clusters
    }
}
