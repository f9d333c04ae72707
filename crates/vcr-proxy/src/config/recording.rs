//! Recording configuration: startup mode and storage location.

use crate::recording::Mode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordingConfig {
    /// Mode at startup: record (default) or playback
    #[serde(default)]
    pub mode: Mode,

    /// Root directory for persisted interactions
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            storage_dir: default_storage_dir(),
        }
    }
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("./recordings")
}
