//! Diagnostics data model returned by [`LaneDetector::detect_with_report`]
//! and written by the command-line tools.
//!
//! [`LaneDetector::detect_with_report`]: crate::LaneDetector::detect_with_report

pub mod report;
pub mod timing;

pub use report::LaneReport;
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
