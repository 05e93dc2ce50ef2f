//! Ridge enhancement of thin bright lane markings.
//!
//! For every pixel the filter compares the centre value with the values one
//! marking width to the left and right:
//!
//! `r = 2·s(c) − s(c−w) − s(c+w) − |s(c−w) − s(c+w)|`, clamped to `[0, 255]`.
//!
//! A bright stripe about `w` pixels wide on a flat background gives a large
//! response; flat or slowly varying asphalt gives ~0, and the symmetry term
//! cancels one-sided steps such as shadow edges or the road/shoulder
//! transition. Zero source pixels and the `w`-wide left/right borders stay 0.
use crate::image::{GrayImage, ImageView, ImageViewMut};

pub fn ridge_enhance(gray: &GrayImage, marking_width: usize) -> GrayImage {
    let (w, h) = gray.dimensions();
    let mut out = GrayImage::new(w, h);
    if w <= 2 * marking_width {
        return out;
    }
    for (y, src) in gray.rows().enumerate() {
        let dst = out.row_mut(y);
        for c in marking_width..w - marking_width {
            let center = src[c] as i32;
            if center == 0 {
                continue;
            }
            let left = src[c - marking_width] as i32;
            let right = src[c + marking_width] as i32;
            let response = 2 * center - left - right - (left - right).abs();
            dst[c] = response.clamp(0, 255) as u8;
        }
    }
    out
}
