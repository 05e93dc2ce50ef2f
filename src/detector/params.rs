//! Parameter types configuring the lane pipeline stages.
//!
//! This module groups knobs for the ridge filter, candidate segment search,
//! seed marker construction and middle-lane extraction. Backend-specific
//! tuning (Hough resolution, RANSAC budget) lives on the backend types.
//!
//! Defaults match the reference tuning for ~640×480 dash-camera frames. For
//! other resolutions, start with the marking width and the Hough lengths.

use serde::{Deserialize, Serialize};

/// Pipeline-wide parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneParams {
    pub ridge: RidgeParams,
    pub candidates: CandidateParams,
    pub markers: MarkerParams,
    pub middle: MiddleParams,
}

/// Ridge enhancement of thin bright markings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RidgeParams {
    /// Expected marking width in pixels; also the untouched border width.
    pub marking_width: usize,
}

impl Default for RidgeParams {
    fn default() -> Self {
        Self { marking_width: 10 }
    }
}

/// Segment search on the binarized ridge image and candidate filtering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateParams {
    /// First accumulator vote threshold handed to the detector.
    pub initial_threshold: u32,
    /// Increment applied while the detector returns too many segments.
    pub threshold_step: u32,
    /// Segment count above which detection is retried.
    pub max_segments: usize,
    /// Hard cap on detector invocations.
    pub max_attempts: usize,
    /// Minimum accepted segment length (detector side).
    pub min_line_length: u32,
    /// Maximum gap bridged inside one segment (detector side).
    pub max_line_gap: u32,
    /// Segments with `|y1-y2|` below this are near-horizontal and dropped.
    pub min_vertical_extent: i32,
    /// Segments with `|x1-x2|` below this are near-vertical and dropped.
    pub min_horizontal_extent: i32,
    /// Fewer surviving segments than this fails the frame.
    pub min_segments: usize,
}

impl Default for CandidateParams {
    fn default() -> Self {
        Self {
            initial_threshold: 70,
            threshold_step: 10,
            max_segments: 200,
            max_attempts: 32,
            min_line_length: 20,
            max_line_gap: 10,
            min_vertical_extent: 10,
            // Lanes can look steep in some frames, so this stays below the
            // horizontal limit.
            min_horizontal_extent: 5,
            min_segments: 3,
        }
    }
}

/// Seed markers for the middle-lane segmentation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerParams {
    /// Height of each seed band in rows.
    pub band_height: usize,
}

impl Default for MarkerParams {
    fn default() -> Self {
        Self { band_height: 10 }
    }
}

/// Boundary cleaning and line search for the middle lane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiddleParams {
    /// Boundary pixels closer than this to any image edge are dropped.
    pub edge_margin: usize,
    /// Column offset on both sides that must still be road.
    pub side_offset: usize,
    pub threshold: u32,
    pub min_line_length: u32,
    pub max_line_gap: u32,
}

impl Default for MiddleParams {
    fn default() -> Self {
        Self {
            edge_margin: 5,
            side_offset: 5,
            threshold: 70,
            min_line_length: 10,
            max_line_gap: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let params: LaneParams =
            serde_json::from_str(r#"{"ridge": {"marking_width": 6}, "candidates": {"max_segments": 50}}"#)
                .expect("valid params");
        assert_eq!(params.ridge.marking_width, 6);
        assert_eq!(params.candidates.max_segments, 50);
        assert_eq!(params.candidates.initial_threshold, 70);
        assert_eq!(params.markers, MarkerParams::default());
    }
}
