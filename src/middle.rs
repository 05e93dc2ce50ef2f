//! Middle lane from the boundary between the two seeded road regions.
//!
//! The ROI is segmented from the left/right seed bands and the boundary pixels
//! that lie well inside the road are turned into a mask
//! ([`segment_boundary`]). Segments are then detected on that mask and the
//! lower end of the longest one anchors the middle lane ([`fit_middle_lane`]).
//! Its top comes from the left and right lanes, and the result is clipped like
//! any other lane.
use crate::backends::{HoughQuery, RegionSegmenter, SegmentDetector, BOUNDARY_LABEL};
use crate::clip::clip_lane;
use crate::detector::params::MiddleParams;
use crate::error::{LaneError, LaneResult};
use crate::image::{GrayImage, ImageView, ImageViewMut, LabelGrid, Pixel, PixelGrid, RgbImage};
use crate::segments::LineSegment;
use crate::types::{Lane, Point};
use log::debug;

/// Middle lane plus counts describing how it was found.
#[derive(Clone, Debug, PartialEq)]
pub struct MiddleLane {
    pub lane: Lane,
    pub boundary_pixels: usize,
    pub segments: usize,
}

/// Keeps boundary pixels that are `edge_margin` away from every image edge
/// and whose ROI value is set at the pixel and `side_offset` columns to
/// either side.
pub fn boundary_mask<P: Pixel>(
    labels: &LabelGrid,
    roi: &PixelGrid<P>,
    params: &MiddleParams,
) -> GrayImage {
    let (w, h) = labels.dimensions();
    let mut mask = GrayImage::new(w, h);
    let m = params.edge_margin;
    if w <= 2 * m || h <= 2 * m || !labels.same_size(roi) {
        return mask;
    }
    let off = params.side_offset;
    for y in m..h - m {
        let lab = labels.row(y);
        let src = roi.row(y);
        let road = |x: usize| src.get(x).is_some_and(|v| !v.is_background());
        for x in m..w - m {
            if lab[x] != BOUNDARY_LABEL || x < off {
                continue;
            }
            if road(x) && road(x - off) && road(x + off) {
                mask.set(x, y, 255);
            }
        }
    }
    mask
}

/// Longest segment by squared length; the first one wins ties.
pub fn longest_segment(segments: &[LineSegment]) -> Option<LineSegment> {
    segments.iter().copied().fold(None, |best, s| match best {
        Some(b) if b.length_sq() >= s.length_sq() => Some(b),
        _ => Some(s),
    })
}

/// Shared top when both lanes agree, otherwise the midpoint of the two tops
/// on row 0.
pub fn middle_top(left: &Lane, right: &Lane) -> Point {
    if left.top == right.top {
        left.top
    } else {
        Point::new((left.top.x + right.top.x) / 2, 0)
    }
}

/// Segments `roi` from `seeds` and returns the mask of road boundary pixels.
pub fn segment_boundary(
    roi: &RgbImage,
    mut seeds: LabelGrid,
    segmenter: &dyn RegionSegmenter,
    params: &MiddleParams,
) -> GrayImage {
    segmenter.segment(roi, &mut seeds);
    boundary_mask(&seeds, roi, params)
}

/// Detects segments on the boundary mask and clips the middle lane through
/// the lower end of the longest one.
pub fn fit_middle_lane(
    mask: &GrayImage,
    left: &Lane,
    right: &Lane,
    detector: &dyn SegmentDetector,
    params: &MiddleParams,
) -> LaneResult<MiddleLane> {
    let boundary_pixels = mask.count_foreground();
    let query = HoughQuery {
        threshold: params.threshold,
        min_line_length: params.min_line_length,
        max_line_gap: params.max_line_gap,
    };
    let segments = detector.detect(mask, &query);
    debug!(
        "middle: {} boundary pixels, {} segments",
        boundary_pixels,
        segments.len()
    );
    let longest = longest_segment(&segments).ok_or(LaneError::NoBoundaryFound)?;
    let lane = clip_lane(
        middle_top(left, right),
        longest.lower_endpoint(),
        mask.width(),
        mask.height(),
    );
    Ok(MiddleLane {
        lane,
        boundary_pixels,
        segments: segments.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_requires_road_on_both_sides() {
        let (w, h) = (40, 20);
        let roi = GrayImage::from_fn(w, h, |x, _| if (8..32).contains(&x) { 120 } else { 0 });
        let mut labels = LabelGrid::new(w, h);
        for y in 0..h {
            for x in [2usize, 10, 12, 20, 28, 37] {
                labels.set(x, y, BOUNDARY_LABEL);
            }
        }
        let mask = boundary_mask(&labels, &roi, &MiddleParams::default());
        for y in 5..15 {
            assert_eq!(mask.get(20, y), 255, "y={y}");
            assert_eq!(mask.get(12, y), 0);
            assert_eq!(mask.get(10, y), 0);
            assert_eq!(mask.get(28, y), 0);
            assert_eq!(mask.get(2, y), 0);
            assert_eq!(mask.get(37, y), 0);
        }
        for y in (0..5).chain(15..20) {
            assert_eq!(mask.get(20, y), 0);
        }
        assert_eq!(mask.count_foreground(), 10);
    }

    #[test]
    fn longest_prefers_first_on_ties() {
        let segs = [
            LineSegment::new(0, 0, 3, 4),
            LineSegment::new(10, 10, 14, 13),
            LineSegment::new(0, 0, 0, 2),
        ];
        assert_eq!(longest_segment(&segs), Some(segs[0]));
        assert_eq!(longest_segment(&[]), None);
        let more = [segs[2], LineSegment::new(5, 5, 5, 30), segs[0]];
        assert_eq!(longest_segment(&more), Some(more[1]));
    }

    #[test]
    fn top_is_shared_or_averaged_on_row_zero() {
        let a = Lane::new(Point::new(300, 120), Point::new(0, 400));
        let b = Lane::new(Point::new(300, 120), Point::new(639, 400));
        assert_eq!(middle_top(&a, &b), Point::new(300, 120));
        let c = Lane::new(Point::new(311, 0), Point::new(639, 400));
        let d = Lane::new(Point::new(290, 0), Point::new(0, 400));
        assert_eq!(middle_top(&d, &c), Point::new(300, 0));
    }

    struct Found(Vec<LineSegment>);

    impl SegmentDetector for Found {
        fn detect(&self, _binary: &GrayImage, _query: &HoughQuery) -> Vec<LineSegment> {
            self.0.clone()
        }
    }

    fn column_mask(w: usize, h: usize, x: usize, rows: std::ops::Range<usize>) -> GrayImage {
        GrayImage::from_fn(w, h, |cx, cy| if cx == x && rows.contains(&cy) { 255 } else { 0 })
    }

    #[test]
    fn middle_lane_runs_from_shared_top_through_longest_segment() {
        let left = Lane::new(Point::new(50, 10), Point::new(5, 59));
        let right = Lane::new(Point::new(50, 10), Point::new(95, 59));
        let mask = column_mask(100, 60, 50, 20..50);
        let detector = Found(vec![
            LineSegment::new(50, 20, 50, 30),
            LineSegment::new(50, 49, 50, 20),
        ]);
        let middle = fit_middle_lane(&mask, &left, &right, &detector, &MiddleParams::default())
            .expect("middle lane");
        assert_eq!(middle.lane, Lane::new(Point::new(50, 10), Point::new(50, 59)));
        assert_eq!(middle.boundary_pixels, 30);
        assert_eq!(middle.segments, 2);
    }

    #[test]
    fn boundary_survives_when_no_line_is_found() {
        let left = Lane::new(Point::new(50, 10), Point::new(5, 59));
        let right = Lane::new(Point::new(50, 10), Point::new(95, 59));
        let mask = column_mask(100, 60, 50, 20..50);
        let err = fit_middle_lane(&mask, &left, &right, &Found(Vec::new()), &MiddleParams::default());
        assert_eq!(err, Err(LaneError::NoBoundaryFound));
        assert_eq!(mask.count_foreground(), 30);
    }
}
