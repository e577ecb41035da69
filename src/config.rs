use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

fn default_name() -> String {
    "farmo".to_string()
}

fn default_time_unit_ms() -> u64 {
    1_000
}

fn default_snapshot_interval_units() -> u64 {
    1
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Runtime settings for one farm. Grid size, tick periods and growth rates
/// are fixed and deliberately absent here.
#[derive(Debug, Clone, Deserialize)]
pub struct FarmConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_time_unit_ms")]
    pub time_unit_ms: u64,
    #[serde(default = "default_snapshot_interval_units")]
    pub snapshot_interval_units: u64,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            seed: None,
            time_unit_ms: default_time_unit_ms(),
            snapshot_interval_units: default_snapshot_interval_units(),
            web: WebConfig::default(),
        }
    }
}

impl FarmConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: FarmConfig = serde_yaml::from_str(text).context("invalid farm config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.name.trim().is_empty(), "farm name must not be empty");
        ensure!(self.time_unit_ms > 0, "time_unit_ms must be greater than zero");
        Ok(())
    }

    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }

    /// The configured seed, or a fresh one from entropy when none is set.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<FarmConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read farm config {}", path.display()))?;
        FarmConfig::from_yaml(&data).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
