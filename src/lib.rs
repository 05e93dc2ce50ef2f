#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod types;

// Stage building blocks; public so tools and tests can drive single stages.
pub mod angle;
pub mod backends;
pub mod candidates;
pub mod clip;
pub mod draw;
pub mod markers;
pub mod middle;
pub mod pair;
pub mod ridge;
pub mod roi;
pub mod segments;
pub mod vanishing;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{LaneAnalysis, LaneDetector, LaneParams};
pub use crate::error::{LaneError, LaneResult};
pub use crate::types::{Lane, Point, ThreeLanes};

// Per-frame report returned by `LaneDetector::detect_with_report`.
pub use crate::diagnostics::LaneReport;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use lane_roi::prelude::*;
///
/// # fn main() {
/// let frame = RgbImage::new(640, 480);
/// let detector = LaneDetector::new(LaneParams::default());
///
/// let analysis = detector.detect_with_report(&frame);
/// println!("{}", analysis.report.summary());
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{GrayImage, ImageView, RgbImage};
    pub use crate::{Lane, LaneDetector, LaneError, LaneParams, LaneResult, Point, ThreeLanes};
}
