//! Configuration types for vcr-proxy.

mod listen;
mod recording;
mod upstream;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use listen::{AdminConfig, ListenConfig};
pub use recording::RecordingConfig;
pub use upstream::UpstreamConfig;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Proxy listener
    #[serde(default)]
    pub listen: ListenConfig,
    /// Admin API listener
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub recording: RecordingConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Default tracing filter when RUST_LOG is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, anyhow::Error> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.listen.port != 0 && self.listen.socket_addr() == self.admin.socket_addr() {
            anyhow::bail!(
                "Proxy and admin listeners cannot share {}. Change 'listen.port' or 'admin.port'",
                self.listen.socket_addr()
            );
        }

        if self.upstream.connect_timeout_secs == 0 {
            anyhow::bail!("'upstream.connect_timeout_secs' must be greater than 0");
        }

        if self.upstream.timeout_secs == Some(0) {
            anyhow::bail!("'upstream.timeout_secs' must be greater than 0 when set");
        }

        if self.recording.storage_dir.as_os_str().is_empty() {
            anyhow::bail!("'recording.storage_dir' must not be empty");
        }

        Ok(())
    }
}
