use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{IngestError, Result};

pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.toml";

/// Directory layout and month window for a run, loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the raw downloads: `<raw_dir>/<tj>/<YYYY-MM>/...`
    pub raw_dir: String,
    /// Where per-month normalized output lands
    pub processed_dir: String,
    /// Combined all-sources output file
    pub unified_output: String,
    /// First month to process, inclusive ("YYYY-MM")
    pub start: String,
    /// Last month to process, inclusive ("YYYY-MM")
    pub end: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            raw_dir: "data/raw".to_string(),
            processed_dir: "data/processed".to_string(),
            unified_output: "data/processed/unified.json".to_string(),
            start: "2025-01".to_string(),
            end: "2025-12".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults; a file
    /// that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            IngestError::Config(format!("failed to read '{}': {}", path.display(), e))
        })?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }
}
