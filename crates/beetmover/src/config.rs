//! Settings read from a TOML file, every key optional.

use std::path::{Path, PathBuf};

use beetmover_archive::{Limits, MAX_COMPRESSION_RATIO};
use beetmover_manifest::{MAVEN_ARCHIVE_NAME, REFERENCE_LOCALE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Ceiling for whole archives and compressed entries, in MB.
    pub zip_max_file_size_in_mb: u64,
    pub max_compression_ratio: f64,
    pub reference_locale: String,
    pub archive_name: String,
    /// Base directory for relative artifact paths, one subdirectory per task.
    pub artifacts_dir: Option<PathBuf>,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zip_max_file_size_in_mb: DEFAULT_MAX_SIZE_MB,
            max_compression_ratio: MAX_COMPRESSION_RATIO,
            reference_locale: REFERENCE_LOCALE.to_string(),
            archive_name: MAVEN_ARCHIVE_NAME.to_string(),
            artifacts_dir: None,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zip_max_file_size_in_mb == 0 {
            return Err(ConfigError::Invalid(
                "zip_max_file_size_in_mb must be at least 1".to_string(),
            ));
        }
        if self.max_compression_ratio.is_nan() || self.max_compression_ratio < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "max_compression_ratio must be at least 1, got {}",
                self.max_compression_ratio
            )));
        }
        if self.archive_name.is_empty() || self.archive_name.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "archive_name must be a bare file name, got '{}'",
                self.archive_name
            )));
        }
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits::new(self.zip_max_file_size_in_mb).max_compression_ratio(self.max_compression_ratio)
    }
}
