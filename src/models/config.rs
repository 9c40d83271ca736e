use std::path::{Path, PathBuf};

use luma_quant::{Execution, FilterKind, FilterSettings, DEFAULT_RETAIN};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rendering::Compression;

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV: &str = "GRAYQUANT_CONFIG";

/// Application configuration loaded from a YAML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Which filter to run
    pub filter: FilterKind,

    /// Sequential or parallel execution
    pub execution: Execution,

    pub block: BlockConfig,

    pub output: OutputConfig,
}

/// Block quantizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    /// Side of the low-frequency quadrant kept per 8x8 tile (1..=8)
    pub retain: usize,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            retain: DEFAULT_RETAIN,
        }
    }
}

/// PNG output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub compression: Compression,
}

impl AppConfig {
    /// Load configuration from an explicitly named file.
    ///
    /// Any read or parse failure is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if !(1..=8).contains(&config.block.retain) {
            tracing::warn!(
                retain = config.block.retain,
                "block.retain outside 1..=8, it will be clamped"
            );
        }
        tracing::info!(
            path = %path.display(),
            filter = %config.filter,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Resolve configuration from `--config`, then `GRAYQUANT_CONFIG`.
    ///
    /// An explicit path must load. A path from the environment that cannot
    /// be loaded only warns and falls back to defaults, as does no path.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
            Some(path) => Ok(Self::load_or_default(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration, falling back to defaults with a warning.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(%e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Filter settings for [`FilterKind::build`].
    pub fn settings(&self) -> FilterSettings {
        FilterSettings {
            execution: self.execution,
            retain: self.block.retain,
        }
    }
}
