//! Raw line segments as returned by a segment detector.
//!
//! Endpoints are integer pixel coordinates with no ordering guarantee. The
//! helpers expose the few derived quantities the lane stages need: axis
//! extents for candidate filtering, squared length for picking the longest
//! boundary, the lower endpoint, and the normalized line `ax + by + c = 0`
//! used by vanishing-point estimation.
use crate::types::Point;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub const fn from_points(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    pub const fn p0(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub const fn p1(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// `|y1 - y2|`
    pub fn vertical_extent(&self) -> i32 {
        (self.y1 - self.y2).abs()
    }

    /// `|x1 - x2|`
    pub fn horizontal_extent(&self) -> i32 {
        (self.x1 - self.x2).abs()
    }

    pub fn length_sq(&self) -> i64 {
        let dx = (self.x1 - self.x2) as i64;
        let dy = (self.y1 - self.y2) as i64;
        dx * dx + dy * dy
    }

    pub fn length(&self) -> f64 {
        (self.length_sq() as f64).sqrt()
    }

    /// Endpoint closer to the camera (larger `y`); `p1` on ties.
    pub fn lower_endpoint(&self) -> Point {
        if self.y1 > self.y2 {
            self.p0()
        } else {
            self.p1()
        }
    }

    pub fn midpoint(&self) -> [f64; 2] {
        [
            (self.x1 + self.x2) as f64 * 0.5,
            (self.y1 + self.y2) as f64 * 0.5,
        ]
    }

    /// Unit direction from `p0` to `p1`; zero for degenerate segments.
    pub fn direction(&self) -> [f64; 2] {
        let len = self.length();
        if len > 0.0 {
            [
                (self.x2 - self.x1) as f64 / len,
                (self.y2 - self.y1) as f64 / len,
            ]
        } else {
            [0.0, 0.0]
        }
    }

    /// Line representation: ax + by + c = 0, with sqrt(a^2+b^2)=1
    pub fn line(&self) -> Vector3<f64> {
        let (x0, y0) = (self.x1 as f64, self.y1 as f64);
        let (x1, y1) = (self.x2 as f64, self.y2 as f64);
        let a = y1 - y0;
        let b = x0 - x1;
        let c = x1 * y0 - x0 * y1;
        let norm = (a * a + b * b).sqrt().max(1e-12);
        Vector3::new(a / norm, b / norm, c / norm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extents_ignore_endpoint_order() {
        let s = LineSegment::new(30, 5, 10, 45);
        assert_eq!(s.horizontal_extent(), 20);
        assert_eq!(s.vertical_extent(), 40);
        assert_eq!(s.length_sq(), 2000);
    }

    #[test]
    fn lower_endpoint_prefers_larger_y() {
        let s = LineSegment::new(3, 90, 7, 12);
        assert_eq!(s.lower_endpoint(), Point::new(3, 90));
        let t = LineSegment::new(3, 12, 7, 90);
        assert_eq!(t.lower_endpoint(), Point::new(7, 90));
    }

    #[test]
    fn normalized_line_passes_through_endpoints() {
        let s = LineSegment::new(2, 3, 12, 27);
        let l = s.line();
        assert!((l[0] * l[0] + l[1] * l[1] - 1.0).abs() < 1e-9);
        for p in [s.p0(), s.p1()] {
            let r = l[0] * p.x as f64 + l[1] * p.y as f64 + l[2];
            assert!(r.abs() < 1e-9, "residual {r}");
        }
    }
}
