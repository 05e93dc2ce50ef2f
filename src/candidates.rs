//! Candidate lane segments from the binarized ridge image.
//!
//! The detector is called with an escalating vote threshold until it returns
//! no more than `max_segments` segments, bounded by `max_attempts` calls. The
//! surviving raw segments are then filtered by axis extent: near-horizontal
//! ones cannot be forward lanes and near-vertical ones belong to the middle
//! lane and would bias the vanishing-point fit.
use crate::backends::{HoughQuery, SegmentDetector};
use crate::detector::params::CandidateParams;
use crate::error::{LaneError, LaneResult};
use crate::image::GrayImage;
use crate::segments::LineSegment;
use log::{debug, warn};
use serde::Serialize;

/// Filtered segments together with the search bookkeeping.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSegments {
    pub segments: Vec<LineSegment>,
    /// Segments returned by the last detector call, before filtering.
    pub raw_count: usize,
    /// Vote threshold of the last detector call.
    pub threshold: u32,
    pub attempts: usize,
}

#[inline]
pub fn is_lane_candidate(seg: &LineSegment, params: &CandidateParams) -> bool {
    seg.vertical_extent() >= params.min_vertical_extent
        && seg.horizontal_extent() >= params.min_horizontal_extent
}

pub fn filter_candidates(raw: Vec<LineSegment>, params: &CandidateParams) -> Vec<LineSegment> {
    raw.into_iter()
        .filter(|s| is_lane_candidate(s, params))
        .collect()
}

/// Runs the detector with threshold escalation.
///
/// Returns the segments of the last call, its threshold and the number of
/// calls made. When the attempt cap is hit the last (still oversized) result
/// is kept.
pub fn detect_with_escalation(
    detector: &dyn SegmentDetector,
    binary: &GrayImage,
    params: &CandidateParams,
) -> (Vec<LineSegment>, u32, usize) {
    let max_attempts = params.max_attempts.max(1);
    let mut query = HoughQuery {
        threshold: params.initial_threshold,
        min_line_length: params.min_line_length,
        max_line_gap: params.max_line_gap,
    };
    let mut attempts = 0usize;
    loop {
        attempts += 1;
        let segments = detector.detect(binary, &query);
        if segments.len() <= params.max_segments {
            return (segments, query.threshold, attempts);
        }
        if attempts >= max_attempts {
            warn!(
                "candidates: still {} segments (> {}) after {} attempts at threshold {}",
                segments.len(),
                params.max_segments,
                attempts,
                query.threshold
            );
            return (segments, query.threshold, attempts);
        }
        debug!(
            "candidates: {} segments at threshold {} exceeds cap {}, retrying",
            segments.len(),
            query.threshold,
            params.max_segments
        );
        query.threshold = query.threshold.saturating_add(params.threshold_step);
    }
}

/// Detects, filters and checks that enough candidates remain.
pub fn collect_candidates(
    detector: &dyn SegmentDetector,
    binary: &GrayImage,
    params: &CandidateParams,
) -> LaneResult<CandidateSegments> {
    let (raw, threshold, attempts) = detect_with_escalation(detector, binary, params);
    let raw_count = raw.len();
    let segments = filter_candidates(raw, params);
    debug!(
        "candidates: kept {}/{} segments (threshold {}, {} attempts)",
        segments.len(),
        raw_count,
        threshold,
        attempts
    );
    if segments.len() < params.min_segments {
        return Err(LaneError::InsufficientSegments {
            found: segments.len(),
            required: params.min_segments,
        });
    }
    Ok(CandidateSegments {
        segments,
        raw_count,
        threshold,
        attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns `400 - 2*threshold` diagonal segments and counts calls.
    struct ThresholdSensitive {
        calls: AtomicUsize,
    }

    impl SegmentDetector for ThresholdSensitive {
        fn detect(&self, _binary: &GrayImage, query: &HoughQuery) -> Vec<LineSegment> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let n = 400usize.saturating_sub(2 * query.threshold as usize);
            (0..n as i32).map(|i| LineSegment::new(i, 0, i + 20, 40)).collect()
        }
    }

    struct Fixed(Vec<LineSegment>);

    impl SegmentDetector for Fixed {
        fn detect(&self, _binary: &GrayImage, _query: &HoughQuery) -> Vec<LineSegment> {
            self.0.clone()
        }
    }

    #[test]
    fn threshold_rises_until_count_fits() {
        let detector = ThresholdSensitive {
            calls: AtomicUsize::new(0),
        };
        let binary = GrayImage::new(8, 8);
        let (segs, threshold, attempts) =
            detect_with_escalation(&detector, &binary, &CandidateParams::default());
        assert_eq!(threshold, 100);
        assert_eq!(attempts, 4);
        assert_eq!(segs.len(), 200);
        assert_eq!(detector.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn attempt_cap_bounds_the_loop() {
        let many: Vec<_> = (0..300).map(|i| LineSegment::new(i, 0, i + 9, 30)).collect();
        let params = CandidateParams {
            max_attempts: 5,
            ..CandidateParams::default()
        };
        let (segs, threshold, attempts) =
            detect_with_escalation(&Fixed(many), &GrayImage::new(4, 4), &params);
        assert_eq!(attempts, 5);
        assert_eq!(threshold, 110);
        assert_eq!(segs.len(), 300);
    }

    #[test]
    fn filter_drops_flat_and_steep_segments() {
        let params = CandidateParams::default();
        let raw = vec![
            LineSegment::new(0, 100, 50, 95),  // near-horizontal
            LineSegment::new(40, 0, 42, 80),   // near-vertical
            LineSegment::new(10, 90, 60, 20),  // lane-like
            LineSegment::new(60, 20, 55, 30),  // exactly at both limits
        ];
        let kept = filter_candidates(raw, &params);
        assert_eq!(
            kept,
            vec![LineSegment::new(10, 90, 60, 20), LineSegment::new(60, 20, 55, 30)]
        );
    }

    #[test]
    fn too_few_candidates_fail() {
        let raw = vec![
            LineSegment::new(10, 90, 60, 20),
            LineSegment::new(200, 90, 150, 20),
            LineSegment::new(0, 50, 80, 51),
        ];
        let err = collect_candidates(&Fixed(raw), &GrayImage::new(4, 4), &CandidateParams::default())
            .unwrap_err();
        assert_eq!(
            err,
            LaneError::InsufficientSegments {
                found: 2,
                required: 3
            }
        );
    }
}
