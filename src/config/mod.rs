//! JSON configuration for the command-line tools.
//!
//! [`DetectorConfig`] is shared by both tools: pipeline parameters plus the
//! tunable default backends. Each tool has its own file layout in
//! [`demo`] and [`batch`].

pub mod batch;
pub mod demo;

use crate::backends::{ProbabilisticHough, RansacVanishingPoint};
use crate::detector::{LaneDetector, LaneParams};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub params: LaneParams,
    pub hough: ProbabilisticHough,
    pub vanishing: RansacVanishingPoint,
}

impl DetectorConfig {
    /// Detector with these parameters, Hough and RANSAC settings; the other
    /// backends keep their defaults.
    pub fn build(&self) -> LaneDetector {
        LaneDetector::new(self.params.clone())
            .with_segment_detector(self.hough.clone())
            .with_clusterer(self.vanishing.clone())
    }
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
