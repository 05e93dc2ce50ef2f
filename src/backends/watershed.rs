//! Marker-controlled watershed on a colour image.
//!
//! Unknown pixels next to a seed enter one of 256 FIFO queues keyed by the
//! largest per-channel difference to that neighbour. The lowest non-empty
//! queue is always served first. A served pixel whose labelled neighbours
//! disagree becomes [`BOUNDARY_LABEL`]; otherwise it takes their label and
//! enqueues its unknown neighbours. The outermost image ring is set to the
//! boundary label up front, which keeps every neighbour access in range.
use super::{RegionSegmenter, BOUNDARY_LABEL};
use crate::image::{ImageView, LabelGrid, RgbImage};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const IN_QUEUE: i32 = -2;
const LEVELS: usize = 256;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerWatershed;

#[inline]
fn channel_diff(a: [u8; 3], b: [u8; 3]) -> usize {
    a.iter()
        .zip(b.iter())
        .map(|(&p, &q)| p.abs_diff(q) as usize)
        .max()
        .unwrap_or(0)
}

struct Queues {
    levels: Vec<VecDeque<usize>>,
    active: usize,
}

impl Queues {
    fn new() -> Self {
        Self {
            levels: vec![VecDeque::new(); LEVELS],
            active: LEVELS,
        }
    }

    fn push(&mut self, level: usize, idx: usize) {
        self.levels[level].push_back(idx);
        self.active = self.active.min(level);
    }

    fn pop(&mut self) -> Option<usize> {
        while self.active < LEVELS {
            if let Some(idx) = self.levels[self.active].pop_front() {
                return Some(idx);
            }
            self.active += 1;
        }
        None
    }
}

impl RegionSegmenter for MarkerWatershed {
    fn segment(&self, image: &RgbImage, markers: &mut LabelGrid) {
        let (w, h) = image.dimensions();
        if !markers.same_size(image) || w < 3 || h < 3 {
            return;
        }
        let px = image.as_slice();
        let m = markers.as_mut_slice();

        for x in 0..w {
            m[x] = BOUNDARY_LABEL;
            m[(h - 1) * w + x] = BOUNDARY_LABEL;
        }
        for y in 1..h - 1 {
            m[y * w] = BOUNDARY_LABEL;
            m[y * w + w - 1] = BOUNDARY_LABEL;
        }

        let mut queues = Queues::new();
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let idx = y * w + x;
                if m[idx] < 0 {
                    m[idx] = 0;
                }
                if m[idx] != 0 {
                    continue;
                }
                let best = [idx - 1, idx + 1, idx - w, idx + w]
                    .into_iter()
                    .filter(|&n| m[n] > 0)
                    .map(|n| channel_diff(px[idx], px[n]))
                    .min();
                if let Some(level) = best {
                    queues.push(level, idx);
                    m[idx] = IN_QUEUE;
                }
            }
        }

        while let Some(idx) = queues.pop() {
            let mut label = 0;
            for n in [idx - 1, idx + 1, idx - w, idx + w] {
                let t = m[n];
                if t > 0 {
                    if label == 0 {
                        label = t;
                    } else if label != t {
                        label = BOUNDARY_LABEL;
                    }
                }
            }
            if label == 0 {
                continue;
            }
            m[idx] = label;
            if label == BOUNDARY_LABEL {
                continue;
            }
            for n in [idx - 1, idx - w, idx + 1, idx + w] {
                if m[n] == 0 {
                    queues.push(channel_diff(px[idx], px[n]), n);
                    m[n] = IN_QUEUE;
                }
            }
        }
    }
}
