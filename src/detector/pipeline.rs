//! Lane detector orchestrating the per-frame pipeline.
//!
//! [`LaneDetector`] exposes the three public operations on a colour frame:
//! left/right lanes, road ROI and three lanes. Internally it chains:
//!
//! - Gray conversion and ridge enhancement, then binarization.
//! - Candidate segments with threshold escalation and extent filtering.
//! - Vanishing-point clustering and oriented-line conversion.
//! - Pair selection by signed angle and clipping to the frame.
//! - Road mask by flood fill between the lanes; ROI by masking the frame.
//! - Seed markers, segmentation and boundary line for the middle lane.
//!
//! Typical usage:
//! ```no_run
//! use lane_roi::LaneDetector;
//! use lane_roi::image::RgbImage;
//!
//! # fn example(frame: RgbImage) {
//! let detector = LaneDetector::default();
//! match detector.detect_three_lanes(&frame) {
//!     Ok(lanes) => println!("middle bottom: {:?}", lanes.middle.bottom),
//!     Err(err) => println!("no lanes this frame: {err}"),
//! }
//! # }
//! ```
use super::params::LaneParams;
use crate::backends::{
    Binarizer, FloodFill, MarkerWatershed, OtsuBinarizer, ProbabilisticHough,
    RansacVanishingPoint, RegionSegmenter, ScanlineFloodFill, SegmentDetector,
    VanishingPointClusterer,
};
use crate::candidates::{collect_candidates, CandidateSegments};
use crate::clip::clip_oriented;
use crate::diagnostics::{elapsed_ms, LaneReport, TimingBreakdown};
use crate::error::{LaneError, LaneResult};
use crate::image::{rgb_to_gray, GrayImage, ImageView, RgbImage};
use crate::markers::build_marker_seeds;
use crate::middle::{fit_middle_lane, segment_boundary, MiddleLane};
use crate::pair::select_lane_pair;
use crate::ridge::ridge_enhance;
use crate::roi::{build_road_mask, extract_roi};
use crate::types::{Lane, Point, ThreeLanes};
use crate::vanishing::build_oriented_lines;
use log::debug;
use rayon::prelude::*;
use std::time::Instant;

/// Left/right lanes together with the intermediate results that produced them.
#[derive(Clone, Debug)]
pub struct LaneFit {
    pub left: Lane,
    pub right: Lane,
    pub vanishing_point: Point,
    pub left_angle: f64,
    pub right_angle: f64,
    pub candidates: CandidateSegments,
    pub clustered: usize,
}

/// Road mask and the masked frame.
#[derive(Clone, Debug)]
pub struct RoadRoi {
    pub mask: GrayImage,
    pub image: RgbImage,
}

/// Output of [`LaneDetector::detect_with_report`].
#[derive(Clone, Debug)]
pub struct LaneAnalysis {
    pub report: LaneReport,
    /// Present when the left/right stage succeeded.
    pub roi: Option<RoadRoi>,
}

/// Single-frame lane detector with pluggable image-processing backends.
///
/// The detector holds no per-frame state; one instance can serve frames from
/// several threads at once.
pub struct LaneDetector {
    params: LaneParams,
    binarizer: Box<dyn Binarizer>,
    detector: Box<dyn SegmentDetector>,
    clusterer: Box<dyn VanishingPointClusterer>,
    filler: Box<dyn FloodFill>,
    segmenter: Box<dyn RegionSegmenter>,
}

impl Default for LaneDetector {
    fn default() -> Self {
        Self::new(LaneParams::default())
    }
}

impl LaneDetector {
    /// Create a detector with the supplied parameters and default backends.
    pub fn new(params: LaneParams) -> Self {
        Self {
            params,
            binarizer: Box::new(OtsuBinarizer),
            detector: Box::new(ProbabilisticHough::default()),
            clusterer: Box::new(RansacVanishingPoint::default()),
            filler: Box::new(ScanlineFloodFill),
            segmenter: Box::new(MarkerWatershed),
        }
    }

    pub fn with_binarizer(mut self, binarizer: impl Binarizer + 'static) -> Self {
        self.binarizer = Box::new(binarizer);
        self
    }

    pub fn with_segment_detector(mut self, detector: impl SegmentDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    pub fn with_clusterer(mut self, clusterer: impl VanishingPointClusterer + 'static) -> Self {
        self.clusterer = Box::new(clusterer);
        self
    }

    pub fn with_flood_fill(mut self, filler: impl FloodFill + 'static) -> Self {
        self.filler = Box::new(filler);
        self
    }

    pub fn with_segmenter(mut self, segmenter: impl RegionSegmenter + 'static) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    pub fn params(&self) -> &LaneParams {
        &self.params
    }

    /// Left and right lane boundaries, clipped to the frame.
    pub fn detect_left_right_lanes(&self, image: &RgbImage) -> LaneResult<(Lane, Lane)> {
        let fit = self.fit_lanes(image, &mut TimingBreakdown::default())?;
        Ok((fit.left, fit.right))
    }

    /// The frame with everything outside the road between the lanes blacked out.
    pub fn extract_road_roi(&self, image: &RgbImage) -> LaneResult<RgbImage> {
        let mut timings = TimingBreakdown::default();
        let fit = self.fit_lanes(image, &mut timings)?;
        Ok(self.road_roi(image, &fit, &mut timings).image)
    }

    pub fn detect_three_lanes(&self, image: &RgbImage) -> LaneResult<ThreeLanes> {
        let mut timings = TimingBreakdown::default();
        let fit = self.fit_lanes(image, &mut timings)?;
        let roi = self.road_roi(image, &fit, &mut timings);
        let boundary = self.middle_boundary(&roi.image, &fit, &mut timings);
        let middle = self.middle_lane(&boundary, &fit, &mut timings)?;
        Ok(ThreeLanes {
            left: fit.left,
            middle: middle.lane,
            right: fit.right,
        })
    }

    /// Runs all stages and captures counts, geometry and timings.
    ///
    /// Never fails: a failing stage ends the run and its message is stored in
    /// [`LaneReport::error`].
    pub fn detect_with_report(&self, image: &RgbImage) -> LaneAnalysis {
        let total_start = Instant::now();
        let (w, h) = image.dimensions();
        let mut report = LaneReport::new(w, h);
        let mut timings = TimingBreakdown::default();
        let mut roi = None;

        let outcome = self.fit_lanes(image, &mut timings).and_then(|fit| {
            report.left_lane = Some(fit.left);
            report.right_lane = Some(fit.right);
            report.vanishing_point = Some(fit.vanishing_point);
            report.left_angle = Some(fit.left_angle);
            report.right_angle = Some(fit.right_angle);
            report.raw_segments = fit.candidates.raw_count;
            report.candidate_segments = fit.candidates.segments.len();
            report.hough_threshold = fit.candidates.threshold;
            report.detection_attempts = fit.candidates.attempts;
            report.clustered_lines = fit.clustered;

            let road = self.road_roi(image, &fit, &mut timings);
            report.roi_pixels = road.mask.count_foreground();
            let boundary = self.middle_boundary(&road.image, &fit, &mut timings);
            report.boundary_pixels = boundary.count_foreground();
            roi = Some(road);
            let middle = self.middle_lane(&boundary, &fit, &mut timings)?;
            report.middle_lane = Some(middle.lane);
            Ok(())
        });
        if let Err(err) = outcome {
            debug!("LaneDetector::detect_with_report failed: {err}");
            report.error = Some(err.to_string());
        }
        timings.total_ms = elapsed_ms(total_start);
        report.timings = timings;
        LaneAnalysis { report, roi }
    }

    /// [`detect_with_report`](Self::detect_with_report) over many frames on
    /// the current rayon pool. Output order follows `frames`.
    pub fn detect_batch(&self, frames: &[RgbImage]) -> Vec<LaneAnalysis> {
        frames
            .par_iter()
            .map(|frame| self.detect_with_report(frame))
            .collect()
    }

    /// Gray → ridge → binary → candidates → clusters → pair → clip.
    pub fn fit_lanes(&self, image: &RgbImage, timings: &mut TimingBreakdown) -> LaneResult<LaneFit> {
        let (w, h) = image.dimensions();
        if image.is_empty() {
            return Err(LaneError::InvalidImage(format!("empty frame {w}x{h}")));
        }
        let params = &self.params;

        let binary = timings.measure("ridge", || {
            let gray = rgb_to_gray(image);
            let ridge = ridge_enhance(&gray, params.ridge.marking_width);
            self.binarizer.binarize(&ridge)
        });
        debug!(
            "LaneDetector::fit_lanes binary foreground={} of {}",
            binary.count_foreground(),
            w * h
        );

        let candidates = timings.measure("candidates", || {
            collect_candidates(self.detector.as_ref(), &binary, &params.candidates)
        })?;

        let clusters = timings.measure("vanishing", || {
            self.clusterer.cluster(&candidates.segments, w, h, 1)
        });
        let (vanishing_point, lines) = build_oriented_lines(&clusters)?;

        let clip_start = Instant::now();
        let (left, right) =
            select_lane_pair(&lines).ok_or(LaneError::DegenerateVanishingPoint)?;
        let left_lane = clip_oriented(&left, w, h);
        let right_lane = clip_oriented(&right, w, h);
        timings.push("pair+clip", elapsed_ms(clip_start));
        debug!(
            "LaneDetector::fit_lanes left angle={:.3} {:?} right angle={:.3} {:?}",
            left.angle, left_lane, right.angle, right_lane
        );

        Ok(LaneFit {
            left: left_lane,
            right: right_lane,
            vanishing_point,
            left_angle: left.angle,
            right_angle: right.angle,
            candidates,
            clustered: lines.len(),
        })
    }

    fn road_roi(&self, image: &RgbImage, fit: &LaneFit, timings: &mut TimingBreakdown) -> RoadRoi {
        timings.measure("roi", || {
            let mask = build_road_mask(
                image.width(),
                image.height(),
                &fit.left,
                &fit.right,
                self.filler.as_ref(),
            );
            let image = extract_roi(image, &mask);
            RoadRoi { mask, image }
        })
    }

    fn middle_boundary(
        &self,
        roi: &RgbImage,
        fit: &LaneFit,
        timings: &mut TimingBreakdown,
    ) -> GrayImage {
        let seeds = timings.measure("markers", || {
            build_marker_seeds(roi, &fit.left, &fit.right, &self.params.markers)
        });
        timings.measure("boundary", || {
            segment_boundary(roi, seeds.labels, self.segmenter.as_ref(), &self.params.middle)
        })
    }

    fn middle_lane(
        &self,
        boundary: &GrayImage,
        fit: &LaneFit,
        timings: &mut TimingBreakdown,
    ) -> LaneResult<MiddleLane> {
        timings.measure("middle", || {
            fit_middle_lane(
                boundary,
                &fit.left,
                &fit.right,
                self.detector.as_ref(),
                &self.params.middle,
            )
        })
    }
}
