use super::{load_json, DetectorConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// `lane_demo` configuration file.
#[derive(Debug, Deserialize)]
pub struct LaneDemoConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub detector: DetectorConfig,
    pub output: LaneDemoOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct LaneDemoOutputConfig {
    pub roi_image: PathBuf,
    /// Road mask PNG; skipped when unset.
    #[serde(default)]
    pub mask_image: Option<PathBuf>,
    pub overlay_image: PathBuf,
    pub result_json: PathBuf,
}

impl LaneDemoOutputConfig {
    /// `<dir>/<stem>_roi.png`, `<stem>_mask.png`, `<stem>_overlay.png` and
    /// `<stem>_report.json`.
    pub fn beside(input: &Path, dir: &Path) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frame".to_string());
        Self {
            roi_image: dir.join(format!("{stem}_roi.png")),
            mask_image: Some(dir.join(format!("{stem}_mask.png"))),
            overlay_image: dir.join(format!("{stem}_overlay.png")),
            result_json: dir.join(format!("{stem}_report.json")),
        }
    }
}

pub fn load_config(path: &Path) -> Result<LaneDemoConfig, String> {
    load_json(path)
}
