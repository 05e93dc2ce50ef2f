//! Colour ↔ gray conversions and masking.
use super::grid::{GrayImage, Pixel, PixelGrid, RgbImage};
use super::traits::ImageView;

// BT.601 luma weights in Q14 fixed point.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

#[inline]
pub fn luma(px: [u8; 3]) -> u8 {
    let [r, g, b] = px;
    let acc = r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B + (1 << (LUMA_SHIFT - 1));
    (acc >> LUMA_SHIFT).min(255) as u8
}

/// Convert an RGB frame to 8-bit luma.
pub fn rgb_to_gray(src: &RgbImage) -> GrayImage {
    GrayImage::from_fn(src.width(), src.height(), |x, y| luma(src.get(x, y)))
}

/// Replicate a gray image into three identical channels.
pub fn gray_to_rgb(src: &GrayImage) -> RgbImage {
    RgbImage::from_fn(src.width(), src.height(), |x, y| {
        let v = src.get(x, y);
        [v, v, v]
    })
}

/// Copy `src` where `mask` is set; everything else becomes background.
///
/// Both grids must have the same size.
pub fn apply_mask<P: Pixel>(src: &PixelGrid<P>, mask: &GrayImage) -> PixelGrid<P> {
    debug_assert!(src.same_size(mask));
    PixelGrid::from_fn(src.width(), src.height(), |x, y| {
        if mask.get(x, y) != 0 {
            src.get(x, y)
        } else {
            P::default()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_of_primaries_and_extremes() {
        assert_eq!(luma([0, 0, 0]), 0);
        assert_eq!(luma([255, 255, 255]), 255);
        assert_eq!(luma([255, 0, 0]), 76);
        assert_eq!(luma([0, 255, 0]), 150);
        assert_eq!(luma([0, 0, 255]), 29);
    }

    #[test]
    fn gray_round_trip_keeps_values() {
        let gray = GrayImage::from_fn(4, 3, |x, y| (x * 40 + y * 10) as u8);
        let back = rgb_to_gray(&gray_to_rgb(&gray));
        assert_eq!(back, gray);
    }

    #[test]
    fn mask_clears_unset_pixels() {
        let src = RgbImage::filled(3, 2, [9, 8, 7]);
        let mut mask = GrayImage::new(3, 2);
        mask.as_mut_slice()[1] = 255;
        let out = apply_mask(&src, &mask);
        assert_eq!(out.get(1, 0), [9, 8, 7]);
        assert_eq!(out.get(0, 0), [0, 0, 0]);
        assert_eq!(out.count_foreground(), 1);
    }
}
