//! Lane detector orchestrating the single-frame lane pipeline.
//!
//! Overview
//! - Enhances thin bright markings with a symmetric ridge filter and
//!   binarizes the response with an automatic global threshold.
//! - Detects line segments with an escalating vote threshold and drops the
//!   near-horizontal and near-vertical ones.
//! - Clusters the survivors around one dominant vanishing point and turns
//!   each clustered segment into a line from that point to its lower end.
//! - Picks the left/right pair where the signed angles cross zero, falling
//!   back to the extremes, and clips both to the frame.
//! - Floods the region between the lanes from the image centre to get the
//!   road ROI.
//! - Seeds two regions next to the lanes, segments the ROI and takes the
//!   longest boundary line as the middle lane.
//!
//! Modules
//! - [`params`] – configuration types used by the detector and CLI.
//! - `pipeline` – the main [`LaneDetector`] implementation.
//!
//! Key Ideas
//! - Every stage is a pure function of one frame; no state survives a call.
//! - The five image-processing primitives are trait objects, so the decision
//!   logic can be exercised with scripted stand-ins.
//! - Failures are typed ([`LaneError`](crate::LaneError)) and always mean "no
//!   lane geometry for this frame".

pub mod params;
mod pipeline;

pub use params::{CandidateParams, LaneParams, MarkerParams, MiddleParams, RidgeParams};
pub use pipeline::{LaneAnalysis, LaneDetector, LaneFit, RoadRoi};
