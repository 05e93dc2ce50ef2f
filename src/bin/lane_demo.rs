use lane_roi::config::demo::{self, LaneDemoConfig, LaneDemoOutputConfig};
use lane_roi::config::{load_json, DetectorConfig};
use lane_roi::draw::{draw_cross, draw_lane};
use lane_roi::image::io::{load_rgb_image, save_grayscale_image, save_rgb_image, write_json_file};
use lane_roi::image::{GrayImage, ImageView, RgbImage};
use lane_roi::LaneReport;
use std::env;
use std::path::{Path, PathBuf};

const LEFT_COLOR: [u8; 3] = [255, 64, 64];
const RIGHT_COLOR: [u8; 3] = [64, 128, 255];
const MIDDLE_COLOR: [u8; 3] = [64, 255, 64];
const VP_COLOR: [u8; 3] = [255, 255, 0];

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config = resolve_config()?;
    let frame = load_rgb_image(&config.input)?;
    let detector = config.detector.build();

    let analysis = detector.detect_with_report(&frame);
    let report = &analysis.report;
    println!("{}: {}", config.input.display(), report.summary());

    let (w, h) = frame.dimensions();
    match &analysis.roi {
        Some(roi) => save_rgb_image(&roi.image, &config.output.roi_image)?,
        None => save_rgb_image(&RgbImage::new(w, h), &config.output.roi_image)?,
    }
    if let Some(path) = &config.output.mask_image {
        match &analysis.roi {
            Some(roi) => save_grayscale_image(&roi.mask, path)?,
            None => save_grayscale_image(&GrayImage::new(w, h), path)?,
        }
        println!("Saved road mask to {}", path.display());
    }
    save_rgb_image(&overlay(&frame, report), &config.output.overlay_image)?;
    write_json_file(&config.output.result_json, report)?;

    println!("Saved ROI to {}", config.output.roi_image.display());
    println!("Saved overlay to {}", config.output.overlay_image.display());
    println!("Saved report to {}", config.output.result_json.display());
    Ok(())
}

/// A `.json` argument is a full config file; anything else is an input frame,
/// optionally followed by a detector config, with outputs written beside it.
fn resolve_config() -> Result<LaneDemoConfig, String> {
    let first = env::args().nth(1).ok_or_else(usage)?;
    let first = PathBuf::from(first);
    if first.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
        return demo::load_config(&first);
    }
    let detector = match env::args().nth(2) {
        Some(path) => load_json::<DetectorConfig>(Path::new(&path))?,
        None => DetectorConfig::default(),
    };
    let dir = first.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(LaneDemoConfig {
        output: LaneDemoOutputConfig::beside(&first, &dir),
        input: first,
        detector,
    })
}

fn overlay(frame: &RgbImage, report: &LaneReport) -> RgbImage {
    let mut out = frame.clone();
    for (lane, color) in [
        (report.left_lane, LEFT_COLOR),
        (report.right_lane, RIGHT_COLOR),
        (report.middle_lane, MIDDLE_COLOR),
    ] {
        if let Some(lane) = lane {
            draw_lane(&mut out, &lane, color, 3);
        }
    }
    if let Some(vp) = report.vanishing_point {
        draw_cross(&mut out, vp, 6, VP_COLOR);
    }
    out
}

fn usage() -> String {
    "Usage: lane_demo <config.json> | lane_demo <image> [detector_config.json]".to_string()
}
