use thiserror::Error;

/// Reasons a frame yields no lane geometry.
///
/// Every variant is recoverable: callers treat it as "no estimate for this
/// frame" and carry on with the next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaneError {
    /// Too few usable segments survived candidate filtering.
    #[error("insufficient line segments: found {found}, need at least {required}")]
    InsufficientSegments { found: usize, required: usize },

    /// The clusterer returned no cluster or a point at infinity.
    #[error("degenerate vanishing point estimate")]
    DegenerateVanishingPoint,

    /// Segmentation did not yield a detectable boundary line.
    #[error("no middle boundary line found")]
    NoBoundaryFound,

    /// Input buffer cannot be processed (empty or mismatched sizes).
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

pub type LaneResult<T> = Result<T, LaneError>;
