//! Seed markers for the middle-lane segmentation.
//!
//! One seed band is placed next to each lane: label [`LEFT_LABEL`] running
//! right from the left anchor and label [`RIGHT_LABEL`] running left from the
//! right anchor. Both bands share one row range so the segmentation grows two
//! comparable regions that meet along the middle marking.
use crate::detector::params::MarkerParams;
use crate::image::{ImageView, ImageViewMut, LabelGrid, Pixel, PixelGrid};
use crate::types::{Lane, Point};
use log::debug;

pub const LEFT_LABEL: i32 = 1;
pub const RIGHT_LABEL: i32 = 2;

/// Marker anchors, band lengths and the painted label grid.
#[derive(Clone, Debug)]
pub struct MarkerSeeds {
    pub left: Point,
    pub right: Point,
    pub left_len: i32,
    pub right_len: i32,
    pub labels: LabelGrid,
}

/// Lane bottom when it touches a side border, otherwise the lane midpoint.
pub fn marker_anchor(lane: &Lane, width: usize) -> Point {
    let last = width as i32 - 1;
    if lane.bottom.x == 0 || lane.bottom.x == last {
        lane.bottom
    } else {
        lane.midpoint()
    }
}

/// Moves the lower anchor up to the row of the higher one.
///
/// A left anchor lands on the first non-background ROI pixel scanning right
/// from column 0; a right anchor on the first one scanning left from the last
/// column. If the row is empty the scan stops on the opposite border.
pub fn align_anchors<P: Pixel>(left: Point, right: Point, roi: &PixelGrid<P>) -> (Point, Point) {
    if left.y == right.y || roi.is_empty() {
        return (left, right);
    }
    let last = roi.width() - 1;
    if left.y > right.y {
        let Some(row) = row_of(roi, right.y) else {
            return (left, right);
        };
        let x = (0..last).find(|&x| !row[x].is_background()).unwrap_or(last);
        (Point::new(x as i32, right.y), right)
    } else {
        let Some(row) = row_of(roi, left.y) else {
            return (left, right);
        };
        let x = (1..=last)
            .rev()
            .find(|&x| !row[x].is_background())
            .unwrap_or(0);
        (left, Point::new(x as i32, left.y))
    }
}

fn row_of<P: Pixel>(roi: &PixelGrid<P>, y: i32) -> Option<&[P]> {
    (y >= 0 && (y as usize) < roi.height()).then(|| roi.row(y as usize))
}

/// Seed run lengths `(left, right)` for a gap between anchors.
///
/// The half gap is split so that a lane whose bottom lies far from the image
/// centre column gets the shorter run; each run is then clamped to
/// `[gap/5, gap/3]`. Non-positive gaps yield `(0, 0)`.
pub fn marker_lengths(gap: i32, left_bottom_x: i32, right_bottom_x: i32, width: usize) -> (i32, i32) {
    if gap <= 0 {
        return (0, 0);
    }
    let half_w = (width / 2) as i64;
    let dl = (left_bottom_x as i64 - half_w).abs();
    let dr = (right_bottom_x as i64 - half_w).abs();
    let half_gap = (gap / 2) as i64;
    let (left, right) = if dl + dr == 0 {
        (half_gap, half_gap)
    } else {
        (half_gap * dr / (dl + dr), half_gap * dl / (dl + dr))
    };
    let lo = (gap / 5) as i64;
    let hi = (gap / 3) as i64;
    (left.clamp(lo, hi) as i32, right.clamp(lo, hi) as i32)
}

/// Computes anchors and paints both seed bands onto a fresh label grid.
///
/// Only non-background ROI pixels are labelled; band coordinates are clamped
/// to the image, and the right band is painted after the left one.
pub fn build_marker_seeds<P: Pixel>(
    roi: &PixelGrid<P>,
    left_lane: &Lane,
    right_lane: &Lane,
    params: &MarkerParams,
) -> MarkerSeeds {
    let (w, h) = roi.dimensions();
    let mut labels = LabelGrid::new(w, h);
    let (left, right) = align_anchors(
        marker_anchor(left_lane, w),
        marker_anchor(right_lane, w),
        roi,
    );
    let gap = right.x - left.x + 1;
    let (left_len, right_len) = marker_lengths(gap, left_lane.bottom.x, right_lane.bottom.x, w);
    debug!(
        "markers: anchors ({}, {}) / ({}, {}), gap {}, runs {} / {}",
        left.x, left.y, right.x, right.y, gap, left_len, right_len
    );
    if w == 0 || h == 0 {
        return MarkerSeeds {
            left,
            right,
            left_len,
            right_len,
            labels,
        };
    }

    let max_x = w as i32 - 1;
    let max_y = h as i32 - 1;
    let clamp = |x: i32, y: i32| Point::new(x.clamp(0, max_x), y.clamp(0, max_y));
    for r in 0..params.band_height as i32 {
        for c in 0..left_len {
            paint(&mut labels, roi, clamp(left.x + c, left.y + r), LEFT_LABEL);
        }
        for c in 0..right_len {
            paint(&mut labels, roi, clamp(right.x - c, right.y + r), RIGHT_LABEL);
        }
    }
    MarkerSeeds {
        left,
        right,
        left_len,
        right_len,
        labels,
    }
}

fn paint<P: Pixel>(labels: &mut LabelGrid, roi: &PixelGrid<P>, p: Point, label: i32) {
    if roi.get_at(p).is_some_and(|v| !v.is_background()) {
        labels.put(p, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayImage;

    #[test]
    fn anchor_uses_border_bottom_or_midpoint() {
        let border = Lane::new(Point::new(300, 0), Point::new(0, 350));
        assert_eq!(marker_anchor(&border, 640), Point::new(0, 350));
        let right_border = Lane::new(Point::new(300, 0), Point::new(639, 300));
        assert_eq!(marker_anchor(&right_border, 640), Point::new(639, 300));
        let inner = Lane::new(Point::new(320, 200), Point::new(100, 479));
        assert_eq!(marker_anchor(&inner, 640), Point::new(210, 339));
    }

    #[test]
    fn lower_left_anchor_moves_to_first_road_pixel() {
        let roi = GrayImage::from_fn(20, 10, |x, _| if (4..16).contains(&x) { 90 } else { 0 });
        let (l, r) = align_anchors(Point::new(2, 8), Point::new(17, 3), &roi);
        assert_eq!(l, Point::new(4, 3));
        assert_eq!(r, Point::new(17, 3));
    }

    #[test]
    fn lower_right_anchor_moves_to_last_road_pixel() {
        let roi = GrayImage::from_fn(20, 10, |x, _| if (4..16).contains(&x) { 90 } else { 0 });
        let (l, r) = align_anchors(Point::new(2, 3), Point::new(17, 8), &roi);
        assert_eq!(l, Point::new(2, 3));
        assert_eq!(r, Point::new(15, 3));
    }

    #[test]
    fn empty_rows_stop_on_the_opposite_border() {
        let roi = GrayImage::new(20, 10);
        let (l, _) = align_anchors(Point::new(2, 8), Point::new(17, 3), &roi);
        assert_eq!(l, Point::new(19, 3));
        let (_, r) = align_anchors(Point::new(2, 3), Point::new(17, 8), &roi);
        assert_eq!(r, Point::new(0, 3));
    }

    #[test]
    fn lengths_follow_inverse_distance_weighting() {
        // left bottom 300 px from centre, right bottom 100 px: left run shorter
        let (l, r) = marker_lengths(301, 20, 420, 640);
        assert_eq!((l, r), (60, 100));
        let (l, r) = marker_lengths(121, 320, 320, 640);
        assert_eq!((l, r), (40, 40));
    }

    #[test]
    fn lengths_stay_within_clamp_range() {
        for gap in 1..400 {
            for (lb, rb) in [(0, 639), (300, 330), (-50, 900), (320, 320), (0, 321)] {
                let (l, r) = marker_lengths(gap, lb, rb, 640);
                for len in [l, r] {
                    assert!(len >= gap / 5 && len <= gap / 3, "gap {gap}: {len}");
                }
            }
        }
        assert_eq!(marker_lengths(0, 10, 600, 640), (0, 0));
        assert_eq!(marker_lengths(-7, 10, 600, 640), (0, 0));
    }

    #[test]
    fn bands_skip_background_and_clamp() {
        let roi = GrayImage::from_fn(30, 12, |x, y| if x == 5 && y == 8 { 0 } else { 100 });
        let left_lane = Lane::new(Point::new(15, 0), Point::new(0, 6));
        let right_lane = Lane::new(Point::new(15, 0), Point::new(29, 6));
        let seeds = build_marker_seeds(&roi, &left_lane, &right_lane, &MarkerParams::default());
        assert_eq!(seeds.left, Point::new(0, 6));
        assert_eq!(seeds.right, Point::new(29, 6));
        // gap 30, distances 15 / 14: 15*14/29 = 7 and 15*15/29 = 7
        assert_eq!((seeds.left_len, seeds.right_len), (7, 7));
        assert_eq!(seeds.labels.get(0, 6), LEFT_LABEL);
        assert_eq!(seeds.labels.get(6, 11), LEFT_LABEL);
        assert_eq!(seeds.labels.get(7, 6), 0);
        assert_eq!(seeds.labels.get(5, 8), 0);
        assert_eq!(seeds.labels.get(29, 6), RIGHT_LABEL);
        assert_eq!(seeds.labels.get(23, 11), RIGHT_LABEL);
        assert_eq!(seeds.labels.get(22, 11), 0);
        assert_eq!(seeds.labels.get(15, 3), 0);
    }
}
