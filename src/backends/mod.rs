//! Capability interfaces for the image-processing primitives the lane
//! pipeline delegates to, plus default pure-Rust implementations.
//!
//! The pipeline only ever talks to these traits, so its decision logic can be
//! driven by deterministic stubs in tests while production code plugs in
//! [`OtsuBinarizer`], [`ProbabilisticHough`], [`RansacVanishingPoint`],
//! [`ScanlineFloodFill`] and [`MarkerWatershed`].
//!
//! Implementations are synchronous and side-effect free apart from the output
//! they return or the grid they are handed mutably. They must be `Send + Sync`
//! so a detector can be shared across worker threads.

mod flood;
mod hough;
mod otsu;
mod ransac;
mod watershed;

pub use flood::ScanlineFloodFill;
pub use hough::ProbabilisticHough;
pub use otsu::{otsu_threshold, OtsuBinarizer};
pub use ransac::{estimate_vp, RansacVanishingPoint};
pub use watershed::MarkerWatershed;

use crate::image::{GrayImage, LabelGrid, RgbImage};
use crate::segments::LineSegment;
use crate::types::Point;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Label written by a [`RegionSegmenter`] on pixels separating two regions.
pub const BOUNDARY_LABEL: i32 = -1;

/// Automatic global threshold turning a grayscale image into a 0/255 mask.
pub trait Binarizer: Send + Sync {
    fn binarize(&self, gray: &GrayImage) -> GrayImage;
}

/// Per-call knobs handed to a [`SegmentDetector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoughQuery {
    /// Accumulator votes a line needs before it is walked.
    pub threshold: u32,
    pub min_line_length: u32,
    pub max_line_gap: u32,
}

/// Line-segment detector working on a binary image.
pub trait SegmentDetector: Send + Sync {
    fn detect(&self, binary: &GrayImage, query: &HoughQuery) -> Vec<LineSegment>;
}

/// One group of segments converging on a common vanishing point.
#[derive(Clone, Debug, PartialEq)]
pub struct VanishingCluster {
    /// Homogeneous image point; `z == 0` encodes a point at infinity.
    pub point: Vector3<f64>,
    pub segments: Vec<LineSegment>,
}

/// Multi-model line clusterer returning up to `count` vanishing points,
/// strongest first.
pub trait VanishingPointClusterer: Send + Sync {
    fn cluster(
        &self,
        segments: &[LineSegment],
        width: usize,
        height: usize,
        count: usize,
    ) -> Vec<VanishingCluster>;
}

/// Fills the connected region containing `seed` with `value`.
pub trait FloodFill: Send + Sync {
    /// Returns the number of pixels changed.
    fn fill(&self, image: &mut GrayImage, seed: Point, value: u8) -> usize;
}

/// Marker-controlled region growing.
///
/// On entry `markers` holds positive seed labels and 0 for unknown pixels; on
/// return every pixel carries a region label or [`BOUNDARY_LABEL`].
pub trait RegionSegmenter: Send + Sync {
    fn segment(&self, image: &RgbImage, markers: &mut LabelGrid);
}
