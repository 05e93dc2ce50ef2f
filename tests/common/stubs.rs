//! Deterministic backend stand-ins for driving the pipeline logic.
use lane_roi::backends::{
    HoughQuery, RegionSegmenter, SegmentDetector, VanishingCluster, VanishingPointClusterer,
    BOUNDARY_LABEL,
};
use lane_roi::image::{GrayImage, ImageView, ImageViewMut, LabelGrid, RgbImage};
use lane_roi::segments::LineSegment;
use nalgebra::Vector3;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Returns queued results in call order, then nothing. Records every query.
#[derive(Default)]
pub struct ScriptedDetector {
    script: Mutex<VecDeque<Vec<LineSegment>>>,
    queries: Mutex<Vec<HoughQuery>>,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Vec<LineSegment>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn thresholds(&self) -> Vec<u32> {
        self.queries
            .lock()
            .expect("queries lock")
            .iter()
            .map(|q| q.threshold)
            .collect()
    }
}

impl SegmentDetector for ScriptedDetector {
    fn detect(&self, _binary: &GrayImage, query: &HoughQuery) -> Vec<LineSegment> {
        self.queries.lock().expect("queries lock").push(*query);
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_default()
    }
}

/// Returns the same segments on every call.
pub struct RepeatDetector(pub Vec<LineSegment>);

impl SegmentDetector for RepeatDetector {
    fn detect(&self, _binary: &GrayImage, _query: &HoughQuery) -> Vec<LineSegment> {
        self.0.clone()
    }
}

/// Ignores its input and returns the configured clusters.
pub struct FixedClusterer {
    pub clusters: Vec<VanishingCluster>,
}

impl FixedClusterer {
    pub fn single(point: Vector3<f64>, segments: Vec<LineSegment>) -> Self {
        Self {
            clusters: vec![VanishingCluster { point, segments }],
        }
    }
}

impl VanishingPointClusterer for FixedClusterer {
    fn cluster(
        &self,
        _segments: &[LineSegment],
        _width: usize,
        _height: usize,
        count: usize,
    ) -> Vec<VanishingCluster> {
        self.clusters.iter().take(count).cloned().collect()
    }
}

/// Marks one full column as region boundary and leaves the rest alone.
pub struct ColumnBoundary(pub usize);

impl RegionSegmenter for ColumnBoundary {
    fn segment(&self, image: &RgbImage, markers: &mut LabelGrid) {
        if self.0 >= image.width() {
            return;
        }
        for y in 0..markers.height() {
            markers.set(self.0, y, BOUNDARY_LABEL);
        }
    }
}
