//! Progressive probabilistic Hough transform.
//!
//! Foreground pixels are visited in a seeded random order. Each visit votes
//! into a `(θ, ρ)` accumulator; once the strongest bin of the visited pixel
//! reaches the query threshold, the line through it is walked in both
//! directions with fixed-point stepping, tolerating gaps of up to
//! `max_line_gap` pixels. Walks spanning at least `min_line_length` along
//! either axis are reported. All walked pixels leave the pool, and pixels of
//! reported lines that already voted withdraw their votes.
use super::{HoughQuery, SegmentDetector};
use crate::image::{GrayImage, ImageView};
use crate::segments::LineSegment;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const SHIFT: u32 = 16;

const EMPTY: u8 = 0;
const PENDING: u8 = 1;
const VOTED: u8 = 2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbabilisticHough {
    /// Distance resolution in pixels.
    pub rho: f64,
    /// Angle resolution in radians.
    pub theta: f64,
    /// Seed of the pixel visiting order.
    pub seed: u64,
    /// Stop after this many segments.
    pub max_lines: Option<usize>,
}

impl Default for ProbabilisticHough {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta: std::f64::consts::PI / 180.0,
            seed: 0xffff_ffff,
            max_lines: None,
        }
    }
}

struct Accumulator {
    trig: Vec<(f64, f64)>,
    numrho: usize,
    offset: i64,
    votes: Vec<i32>,
}

impl Accumulator {
    fn new(width: usize, height: usize, rho: f64, theta: f64) -> Self {
        let irho = 1.0 / rho;
        let numangle = ((std::f64::consts::PI / theta).round() as usize).max(1);
        let numrho = ((((width + height) * 2 + 1) as f64) / rho).round().max(1.0) as usize;
        let trig = (0..numangle)
            .map(|n| {
                let a = n as f64 * theta;
                (a.cos() * irho, a.sin() * irho)
            })
            .collect();
        Self {
            trig,
            numrho,
            offset: (numrho as i64 - 1) / 2,
            votes: vec![0; numangle * numrho],
        }
    }

    #[inline]
    fn bin(&self, n: usize, x: usize, y: usize) -> usize {
        let (c, s) = self.trig[n];
        let r = (x as f64 * c + y as f64 * s).round() as i64 + self.offset;
        n * self.numrho + r.clamp(0, self.numrho as i64 - 1) as usize
    }

    /// Adds the pixel's votes; returns the strongest bin's angle index and count.
    fn vote(&mut self, x: usize, y: usize) -> (usize, i32) {
        let mut best = (0usize, i32::MIN);
        for n in 0..self.trig.len() {
            let b = self.bin(n, x, y);
            self.votes[b] += 1;
            if self.votes[b] > best.1 {
                best = (n, self.votes[b]);
            }
        }
        best
    }

    fn unvote(&mut self, x: usize, y: usize) {
        for n in 0..self.trig.len() {
            let b = self.bin(n, x, y);
            self.votes[b] -= 1;
        }
    }
}

/// Fixed-point walker along a line direction.
#[derive(Clone, Copy)]
struct Walk {
    x0: i64,
    y0: i64,
    dx0: i64,
    dy0: i64,
    x_major: bool,
}

impl Walk {
    fn new(x: usize, y: usize, cos: f64, sin: f64) -> Self {
        // direction is perpendicular to the normal (cos, sin)
        let a = -sin;
        let b = cos;
        let (x, y) = (x as i64, y as i64);
        let one = (1i64 << SHIFT) as f64;
        if a.abs() > b.abs() {
            Self {
                x0: x,
                y0: (y << SHIFT) + (1 << (SHIFT - 1)),
                dx0: if a > 0.0 { 1 } else { -1 },
                dy0: (b * one / a.abs()).round() as i64,
                x_major: true,
            }
        } else {
            Self {
                x0: (x << SHIFT) + (1 << (SHIFT - 1)),
                y0: y,
                dx0: (a * one / b.abs()).round() as i64,
                dy0: if b > 0.0 { 1 } else { -1 },
                x_major: false,
            }
        }
    }

    /// Pixel positions in direction `k` (0 forward, 1 backward) until the
    /// image border.
    fn pixels(self, k: usize, width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
        let sign = if k == 0 { 1 } else { -1 };
        let (dx, dy) = (self.dx0 * sign, self.dy0 * sign);
        let (mut x, mut y) = (self.x0, self.y0);
        std::iter::from_fn(move || {
            let (px, py) = if self.x_major {
                (x, y >> SHIFT)
            } else {
                (x >> SHIFT, y)
            };
            if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
                return None;
            }
            x += dx;
            y += dy;
            Some((px as usize, py as usize))
        })
    }
}

impl SegmentDetector for ProbabilisticHough {
    fn detect(&self, binary: &GrayImage, query: &HoughQuery) -> Vec<LineSegment> {
        let (w, h) = binary.dimensions();
        if w == 0 || h == 0 || self.rho <= 0.0 || self.theta <= 0.0 {
            return Vec::new();
        }
        let threshold = query.threshold.max(1) as i32;
        let min_len = query.min_line_length as i64;
        let max_gap = query.max_line_gap as usize;

        let mut acc = Accumulator::new(w, h, self.rho, self.theta);
        let mut state = vec![EMPTY; w * h];
        let mut pool = Vec::new();
        for (y, row) in binary.rows().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                if v != 0 {
                    state[y * w + x] = PENDING;
                    pool.push((x, y));
                }
            }
        }
        let total = pool.len();

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut lines = Vec::new();
        let mut remaining = pool.len();
        while remaining > 0 {
            let idx = rng.gen_range(0..remaining);
            let (x, y) = pool[idx];
            pool.swap(idx, remaining - 1);
            remaining -= 1;
            if state[y * w + x] == EMPTY {
                continue;
            }

            let (best_n, best_votes) = acc.vote(x, y);
            state[y * w + x] = VOTED;
            if best_votes < threshold {
                continue;
            }

            let (cos, sin) = acc.trig[best_n];
            let walk = Walk::new(x, y, cos, sin);
            let mut ends = [(x, y); 2];
            for (k, end) in ends.iter_mut().enumerate() {
                let mut gap = 0usize;
                for (px, py) in walk.pixels(k, w, h) {
                    if state[py * w + px] != EMPTY {
                        gap = 0;
                        *end = (px, py);
                    } else {
                        gap += 1;
                        if gap > max_gap {
                            break;
                        }
                    }
                }
            }

            let good = (ends[1].0 as i64 - ends[0].0 as i64).abs() >= min_len
                || (ends[1].1 as i64 - ends[0].1 as i64).abs() >= min_len;

            for (k, &end) in ends.iter().enumerate() {
                for (px, py) in walk.pixels(k, w, h) {
                    let s = &mut state[py * w + px];
                    if good && *s == VOTED {
                        acc.unvote(px, py);
                    }
                    *s = EMPTY;
                    if (px, py) == end {
                        break;
                    }
                }
            }

            if good {
                lines.push(LineSegment::new(
                    ends[0].0 as i32,
                    ends[0].1 as i32,
                    ends[1].0 as i32,
                    ends[1].1 as i32,
                ));
                if self.max_lines.is_some_and(|cap| lines.len() >= cap) {
                    break;
                }
            }
        }
        debug!(
            "hough: {} segments from {} foreground pixels (threshold {})",
            lines.len(),
            total,
            query.threshold
        );
        lines
    }
}
