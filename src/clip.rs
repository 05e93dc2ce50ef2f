//! Clipping of vanishing-point-anchored lines to the image rectangle.
//!
//! Order of operations, all in `f64` on the supporting line through the
//! input `top` and `bottom`:
//!
//! 1. extend `bottom` to the last row `y = H-1`;
//! 2. slide `top` down to row 0 when it lies above the frame;
//! 3. when the extended `bottom` leaves the frame sideways, move it to the
//!    crossing with that side border, computed from the adjusted `top`;
//! 4. when `top` lies beside the frame, move it to that side border too.
//!
//! Coordinates are rounded and clamped to `[0, W-1] × [0, H-1]` at the end, so
//! the result is always inside the image. A result that rounds onto a single
//! column is a vertical lane and reaches the last row, which keeps clipping a
//! clipped lane again a no-op. Horizontal lines are only clamped.
use crate::types::{Lane, Point};
use crate::vanishing::OrientedLine;

#[derive(Clone, Copy, Debug)]
struct Fp {
    x: f64,
    y: f64,
}

impl From<Point> for Fp {
    fn from(p: Point) -> Self {
        Self {
            x: p.x as f64,
            y: p.y as f64,
        }
    }
}

/// Non-horizontal line through `origin`, parametrized by `y`.
struct RowLine {
    origin: Fp,
    dx: f64,
    dy: f64,
}

impl RowLine {
    fn x_at(&self, y: f64) -> f64 {
        self.origin.x + self.dx * (y - self.origin.y) / self.dy
    }

    /// `None` for vertical lines.
    fn y_at(&self, x: f64) -> Option<f64> {
        (self.dx != 0.0).then(|| self.origin.y + self.dy * (x - self.origin.x) / self.dx)
    }
}

fn snap(p: Fp, max_x: f64, max_y: f64) -> Point {
    let x = if p.x.is_finite() { p.x.round().clamp(0.0, max_x) } else { 0.0 };
    let y = if p.y.is_finite() { p.y.round().clamp(0.0, max_y) } else { 0.0 };
    Point::new(x as i32, y as i32)
}

/// Moves `p` onto the side border it lies beyond, following `line`.
fn to_side_border(p: Fp, line: &RowLine, max_x: f64) -> Fp {
    let border = if p.x > max_x {
        max_x
    } else if p.x < 0.0 {
        0.0
    } else {
        return p;
    };
    match line.y_at(border) {
        Some(y) => Fp { x: border, y },
        None => p,
    }
}

/// Clips the line from `top` through `bottom` to a `width × height` image.
pub fn clip_lane(top: Point, bottom: Point, width: usize, height: usize) -> Lane {
    let max_x = width.saturating_sub(1) as f64;
    let max_y = height.saturating_sub(1) as f64;
    let t = Fp::from(top);
    let b = Fp::from(bottom);
    if t.y == b.y {
        return Lane::new(snap(t, max_x, max_y), snap(b, max_x, max_y));
    }
    let line = RowLine {
        origin: t,
        dx: b.x - t.x,
        dy: b.y - t.y,
    };

    let mut new_bottom = Fp {
        x: line.x_at(max_y),
        y: max_y,
    };
    let mut new_top = t;
    if new_top.y < 0.0 {
        new_top = Fp {
            x: line.x_at(0.0),
            y: 0.0,
        };
    }
    let adjusted = RowLine {
        origin: new_top,
        dx: line.dx,
        dy: line.dy,
    };
    new_bottom = to_side_border(new_bottom, &adjusted, max_x);
    new_top = to_side_border(new_top, &adjusted, max_x);

    let top = snap(new_top, max_x, max_y);
    let mut bottom = snap(new_bottom, max_x, max_y);
    // a line grazing a corner can collapse onto one border column; treat the
    // result as the vertical line it became
    if top.x == bottom.x {
        bottom.y = max_y as i32;
    }
    Lane::new(top, bottom)
}

pub fn clip_oriented(line: &OrientedLine, width: usize, height: usize) -> Lane {
    clip_lane(line.top, line.bottom, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const W: usize = 640;
    const H: usize = 480;

    fn inside(p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < W as i32 && p.y < H as i32
    }

    #[test]
    fn extends_to_the_bottom_row() {
        let lane = clip_lane(Point::new(320, 200), Point::new(250, 300), W, H);
        assert_eq!(lane.top, Point::new(320, 200));
        // 320 - 70 * 279 / 100 = 124.7
        assert_eq!(lane.bottom, Point::new(125, 479));
    }

    #[test]
    fn vanishing_point_above_frame_slides_to_row_zero() {
        let lane = clip_lane(Point::new(320, -100), Point::new(220, 100), W, H);
        assert_eq!(lane.top, Point::new(270, 0));
        assert_eq!(lane.bottom, Point::new(31, 479));
    }

    #[test]
    fn bottom_beyond_left_border_moves_onto_it() {
        let lane = clip_lane(Point::new(320, 200), Point::new(120, 300), W, H);
        assert_eq!(lane.top, Point::new(320, 200));
        assert_eq!(lane.bottom, Point::new(0, 360));
    }

    #[test]
    fn bottom_beyond_right_border_uses_adjusted_top() {
        let lane = clip_lane(Point::new(300, -60), Point::new(400, 40), W, H);
        assert_eq!(lane.top, Point::new(360, 0));
        assert_eq!(lane.bottom, Point::new(639, 279));
    }

    #[test]
    fn random_lines_stay_inside_and_are_idempotent() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let top = Point::new(rng.gen_range(-800..1400), rng.gen_range(-900..400));
            let bottom = Point::new(rng.gen_range(-800..1400), rng.gen_range(-200..900));
            if top.y == bottom.y || top.x == bottom.x {
                continue;
            }
            let lane = clip_lane(top, bottom, W, H);
            assert!(inside(lane.top), "{top:?}->{bottom:?} gave top {:?}", lane.top);
            assert!(inside(lane.bottom), "{top:?}->{bottom:?} gave bottom {:?}", lane.bottom);
            assert_eq!(clip_lane(lane.top, lane.bottom, W, H), lane, "{top:?}->{bottom:?}");
        }
    }

    #[test]
    fn corner_grazing_line_becomes_a_full_border_column() {
        let lane = clip_lane(Point::new(94, -819), Point::new(238, 208), 210, 74);
        assert_eq!(lane, Lane::new(Point::new(209, 0), Point::new(209, 73)));
        assert_eq!(clip_lane(lane.top, lane.bottom, 210, 74), lane);

        let lane = clip_lane(Point::new(113, -622), Point::new(0, 1), 778, 559);
        assert_eq!(lane, Lane::new(Point::new(0, 0), Point::new(0, 558)));
        assert_eq!(clip_lane(lane.top, lane.bottom, 778, 559), lane);
    }

    #[test]
    fn random_frame_sizes_clip_idempotently() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20_000 {
            let w = rng.gen_range(2..1000usize);
            let h = rng.gen_range(2..1000usize);
            let (wi, hi) = (w as i32, h as i32);
            let top = Point::new(rng.gen_range(-2 * wi..3 * wi), rng.gen_range(-3 * hi..hi));
            let bottom = Point::new(rng.gen_range(-2 * wi..3 * wi), rng.gen_range(-hi..2 * hi));
            if top.y == bottom.y || top.x == bottom.x {
                continue;
            }
            let once = clip_lane(top, bottom, w, h);
            let twice = clip_lane(once.top, once.bottom, w, h);
            assert_eq!(once, twice, "{w}x{h} {top:?}->{bottom:?}");
        }
    }

    #[test]
    fn clipping_a_clipped_lane_is_a_no_op() {
        let cases = [
            (Point::new(320, 200), Point::new(100, 479)),
            (Point::new(320, -150), Point::new(560, 300)),
            (Point::new(330, 180), Point::new(10, 260)),
            (Point::new(-50, -40), Point::new(600, 470)),
            (Point::new(700, -300), Point::new(200, 450)),
        ];
        for (top, bottom) in cases {
            let once = clip_lane(top, bottom, W, H);
            let twice = clip_lane(once.top, once.bottom, W, H);
            assert_eq!(once, twice, "{top:?}->{bottom:?}");
        }
    }

    #[test]
    fn horizontal_lines_are_clamped() {
        let lane = clip_lane(Point::new(-10, 50), Point::new(900, 50), W, H);
        assert_eq!(lane, Lane::new(Point::new(0, 50), Point::new(639, 50)));
    }
}
