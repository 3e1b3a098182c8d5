use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::classifier::DEFAULT_LINEAR_TOLERANCE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// A single CSV file, or a directory scanned for files ending in `suffix`.
    pub path: PathBuf,
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

fn default_suffix() -> String {
    "tracks.csv".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_tolerance")]
    pub linear_tolerance: f64,
    #[serde(default = "default_order_by_frame")]
    pub order_by_frame: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            linear_tolerance: default_tolerance(),
            order_by_frame: default_order_by_frame(),
        }
    }
}

fn default_tolerance() -> f64 {
    DEFAULT_LINEAR_TOLERANCE
}

fn default_order_by_frame() -> bool {
    true
}

/// Everything the output sinks need, handed to them at construction.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    pub project_id: String,
    pub channels_dir: PathBuf,
    #[serde(default)]
    pub table: Option<PathBuf>,
    #[serde(default)]
    pub credentials: Option<PathBuf>,
}

impl DispatchConfig {
    pub fn channel_path(&self, channel: &str) -> PathBuf {
        self.channels_dir
            .join(&self.project_id)
            .join(format!("{}.jsonl", channel))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}
