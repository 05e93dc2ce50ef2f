//! Owned row-major pixel grids (stride == width).
//!
//! One generic buffer backs the three grid kinds the pipeline touches:
//! 8-bit grayscale images and masks, 3-channel colour frames, and signed
//! label grids used as segmentation markers.
use super::traits::{ImageView, ImageViewMut};

/// Pixel types stored in a [`PixelGrid`].
///
/// The zero value is the background: black for images, "unset" for masks and
/// "unknown" for label grids.
pub trait Pixel: Copy + Default + PartialEq {
    #[inline]
    fn is_background(self) -> bool {
        self == Self::default()
    }
}

impl Pixel for u8 {}
impl Pixel for i32 {}
impl Pixel for [u8; 3] {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid<P> {
    /// Width in pixels
    w: usize,
    /// Height in pixels
    h: usize,
    /// Backing storage in row-major order
    data: Vec<P>,
}

/// Single-channel 8-bit image, also used for binary masks (0 / 255).
pub type GrayImage = PixelGrid<u8>;
/// Three-channel 8-bit image in RGB channel order.
pub type RgbImage = PixelGrid<[u8; 3]>;
/// Signed label grid for marker-based segmentation.
pub type LabelGrid = PixelGrid<i32>;

impl<P: Pixel> PixelGrid<P> {
    /// Background-initialized grid of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, P::default())
    }

    pub fn filled(w: usize, h: usize, value: P) -> Self {
        Self {
            w,
            h,
            data: vec![value; w * h],
        }
    }

    /// Wrap an existing buffer; `None` when `data.len() != w * h`.
    pub fn from_raw(w: usize, h: usize, data: Vec<P>) -> Option<Self> {
        (data.len() == w * h).then_some(Self { w, h, data })
    }

    /// Build a grid by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> P) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self { w, h, data }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [P] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<P> {
        self.data
    }

    pub fn same_size<Q>(&self, other: &PixelGrid<Q>) -> bool {
        self.w == other.w && self.h == other.h
    }

    /// Number of pixels that differ from the background value.
    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|p| !p.is_background()).count()
    }
}

impl<P: Copy> ImageView for PixelGrid<P> {
    type Pixel = P;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[P] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl<P: Copy> ImageViewMut for PixelGrid<P> {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [P] {
        let start = y * self.w;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
