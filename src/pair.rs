//! Left/right lane pair selection by signed angle.
use crate::vanishing::OrientedLine;

/// Picks `(left, right)` from clustered lines.
///
/// Lines are sorted by angle. When the angles cross zero, `left` is the
/// negative line closest to zero and `right` the positive line closest to
/// zero (the adjacent pair at the sign change; lines at exactly zero are
/// skipped). When every angle has the same sign the two extremes are used:
/// `left` takes the largest angle, `right` the smallest.
///
/// Returns `None` only for an empty slice.
pub fn select_lane_pair(lines: &[OrientedLine]) -> Option<(OrientedLine, OrientedLine)> {
    let mut sorted = lines.to_vec();
    sorted.sort_by(|a, b| a.angle.total_cmp(&b.angle));
    let first = *sorted.first()?;
    let last = *sorted.last()?;
    if first.angle >= 0.0 || last.angle <= 0.0 {
        return Some((last, first));
    }
    let negatives = sorted.partition_point(|l| l.angle < 0.0);
    let non_positives = sorted.partition_point(|l| l.angle <= 0.0);
    Some((sorted[negatives - 1], sorted[non_positives]))
}
