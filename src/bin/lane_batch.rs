use lane_roi::config::batch::{self, LaneBatchConfig};
use lane_roi::image::io::{load_rgb_image, write_json_file};
use lane_roi::image::RgbImage;
use lane_roi::{LaneDetector, LaneReport};
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameOutput {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    load_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<LaneReport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchOutput {
    frames: usize,
    two_lane_frames: usize,
    three_lane_frames: usize,
    failed_frames: usize,
    wall_ms: f64,
    results: Vec<FrameOutput>,
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = batch::load_config(Path::new(&config_path))?;
    let frames = list_frames(&config)?;
    info!("lane_batch: {} frames in {}", frames.len(), config.input_dir.display());

    let detector = config.detector.build();
    let start = Instant::now();
    let results = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .build()
            .map_err(|e| format!("Failed to build thread pool: {e}"))?
            .install(|| process(&detector, &frames, config.chunk_size)),
        None => process(&detector, &frames, config.chunk_size),
    };
    let wall_ms = start.elapsed().as_secs_f64() * 1000.0;

    let reports = results.iter().filter_map(|r| r.report.as_ref());
    let two_lane_frames = reports.clone().filter(|r| r.left_lane.is_some()).count();
    let three_lane_frames = reports.filter(|r| r.middle_lane.is_some()).count();
    let failed_frames = results
        .iter()
        .filter(|r| r.report.as_ref().map_or(true, |rep| !rep.succeeded()))
        .count();
    let output = BatchOutput {
        frames: results.len(),
        two_lane_frames,
        three_lane_frames,
        failed_frames,
        wall_ms,
        results,
    };
    write_json_file(&config.result_json, &output)?;
    println!(
        "{} frames: {} with left/right lanes, {} with three lanes ({:.1} ms)",
        output.frames, output.two_lane_frames, output.three_lane_frames, output.wall_ms
    );
    println!("Saved results to {}", config.result_json.display());
    Ok(())
}

/// Decodes one chunk at a time in parallel and hands the decoded frames to
/// [`LaneDetector::detect_batch`]; frames that fail to load keep their slot.
fn process(detector: &LaneDetector, paths: &[PathBuf], chunk_size: usize) -> Vec<FrameOutput> {
    let mut outputs = Vec::with_capacity(paths.len());
    for chunk in paths.chunks(chunk_size.max(1)) {
        let decoded: Vec<Result<RgbImage, String>> =
            chunk.par_iter().map(|path| load_rgb_image(path)).collect();
        let mut frames = Vec::with_capacity(chunk.len());
        let mut slots = Vec::with_capacity(chunk.len());
        for (path, frame) in chunk.iter().zip(decoded) {
            let load_error = match frame {
                Ok(frame) => {
                    slots.push(outputs.len());
                    frames.push(frame);
                    None
                }
                Err(err) => {
                    warn!("{err}");
                    Some(err)
                }
            };
            outputs.push(FrameOutput {
                path: path.clone(),
                load_error,
                report: None,
            });
        }
        for (slot, analysis) in slots.into_iter().zip(detector.detect_batch(&frames)) {
            let output = &mut outputs[slot];
            info!("{}: {}", output.path.display(), analysis.report.summary());
            output.report = Some(analysis.report);
        }
    }
    outputs
}

fn list_frames(config: &LaneBatchConfig) -> Result<Vec<PathBuf>, String> {
    let entries = fs::read_dir(&config.input_dir)
        .map_err(|e| format!("Failed to read {}: {e}", config.input_dir.display()))?;
    let mut frames = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| format!("Failed to list {}: {e}", config.input_dir.display()))?
            .path();
        if path.is_file() && config.accepts(&path) {
            frames.push(path);
        }
    }
    frames.sort();
    Ok(frames)
}

fn usage() -> String {
    "Usage: lane_batch <config.json>".to_string()
}
