use super::timing::TimingBreakdown;
use crate::types::{Lane, Point};
use serde::{Deserialize, Serialize};

/// Serializable summary of one frame's run through the lane pipeline.
///
/// Fields for stages that did not run (or failed) stay at their defaults;
/// `error` carries the failure message in that case.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneReport {
    pub width: usize,
    pub height: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_lane: Option<Lane>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_lane: Option<Lane>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_lane: Option<Lane>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vanishing_point: Option<Point>,
    /// Segments returned by the last detector call.
    pub raw_segments: usize,
    /// Segments left after the extent filter.
    pub candidate_segments: usize,
    /// Lines in the dominant vanishing-point cluster.
    pub clustered_lines: usize,
    pub hough_threshold: u32,
    pub detection_attempts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_angle: Option<f64>,
    pub roi_pixels: usize,
    pub boundary_pixels: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timings: TimingBreakdown,
}

impl LaneReport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// One-line human readable summary, used by the command-line tools.
    pub fn summary(&self) -> String {
        let lane = |l: &Option<Lane>| {
            l.map(|l| format!("({},{})-({},{})", l.top.x, l.top.y, l.bottom.x, l.bottom.y))
                .unwrap_or_else(|| "-".to_string())
        };
        match &self.error {
            Some(err) => format!(
                "{}x{} failed after {:.2} ms: {err}",
                self.width, self.height, self.timings.total_ms
            ),
            None => format!(
                "{}x{} left={} right={} middle={} segments={}/{} in {:.2} ms",
                self.width,
                self.height,
                lane(&self.left_lane),
                lane(&self.right_lane),
                lane(&self.middle_lane),
                self.candidate_segments,
                self.raw_segments,
                self.timings.total_ms
            ),
        }
    }
}
