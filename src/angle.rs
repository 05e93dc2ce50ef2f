//! Angle utilities used by the vanishing-point clusterer.

/// Computes the unsigned angle between two 2D vectors in radians.
/// Returns a value in [0, π]. Zero if the vectors are parallel
/// and pointing in the same direction; π if they are opposite.
#[inline]
pub fn angle_between(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let dot = a[0] * b[0] + a[1] * b[1];
    let na = a[0].hypot(a[1]).max(1e-12);
    let nb = b[0].hypot(b[1]).max(1e-12);
    (dot / (na * nb)).clamp(-1.0, 1.0).acos()
}

/// Computes the orientation difference between two 2D vectors while treating
/// antipodal directions as equivalent. Returns a value in [0, π/2].
///
/// Segment endpoints carry no order, so a segment tangent and the direction
/// towards a vanishing point are compared this way.
#[inline]
pub fn angle_between_dirless(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let dot = a[0] * b[0] + a[1] * b[1];
    let na = a[0].hypot(a[1]).max(1e-12);
    let nb = b[0].hypot(b[1]).max(1e-12);
    (dot / (na * nb)).abs().clamp(0.0, 1.0).acos()
}
