use super::FloodFill;
use crate::image::{GrayImage, ImageView, ImageViewMut};
use crate::types::Point;
use serde::{Deserialize, Serialize};

/// 4-connected scanline flood fill of the run of pixels equal to the seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanlineFloodFill;

impl FloodFill for ScanlineFloodFill {
    fn fill(&self, image: &mut GrayImage, seed: Point, value: u8) -> usize {
        let Some(target) = image.get_at(seed) else {
            return 0;
        };
        if target == value {
            return 0;
        }
        let (w, h) = image.dimensions();
        let mut filled = 0usize;
        let mut stack = vec![(seed.x as usize, seed.y as usize)];
        while let Some((x, y)) = stack.pop() {
            if image.get(x, y) != target {
                continue;
            }
            let row = image.row_mut(y);
            let mut left = x;
            while left > 0 && row[left - 1] == target {
                left -= 1;
            }
            let mut right = x;
            while right + 1 < w && row[right + 1] == target {
                right += 1;
            }
            row[left..=right].fill(value);
            filled += right - left + 1;

            for ny in [y.checked_sub(1), (y + 1 < h).then_some(y + 1)]
                .into_iter()
                .flatten()
            {
                let next = image.row(ny);
                let mut in_run = false;
                for (nx, &v) in next.iter().enumerate().take(right + 1).skip(left) {
                    if v == target {
                        if !in_run {
                            stack.push((nx, ny));
                            in_run = true;
                        }
                    } else {
                        in_run = false;
                    }
                }
            }
        }
        filled
    }
}
