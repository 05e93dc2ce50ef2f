use super::{load_json, DetectorConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// `lane_batch` configuration file.
#[derive(Debug, Deserialize)]
pub struct LaneBatchConfig {
    pub input_dir: PathBuf,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Worker threads; the global rayon pool when unset.
    #[serde(default)]
    pub threads: Option<usize>,
    /// Frames decoded and held in memory at once.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    pub result_json: PathBuf,
}

fn default_chunk_size() -> usize {
    64
}

fn default_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg"].iter().map(|s| s.to_string()).collect()
}

impl LaneBatchConfig {
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
    }
}

pub fn load_config(path: &Path) -> Result<LaneBatchConfig, String> {
    load_json(path)
}
