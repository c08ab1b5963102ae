//! Configuration loading for the engine binary.
//!
//! The canonical configuration lives in `backdrop-config.yaml` at the
//! workspace root. The `BACKDROP_CONFIG` environment variable points the
//! loader at a different file. Every field has a default, so a missing
//! file or a partial file both yield a runnable engine.

use std::path::{Path, PathBuf};

use backdrop_quality::QualityConfig;
use serde::Deserialize;

/// Default configuration file name, resolved against the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "backdrop-config.yaml";

/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "BACKDROP_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration. Mirrors `backdrop-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Noise field seeding.
    #[serde(default)]
    pub noise: NoiseConfig,

    /// Quality governor tuning.
    #[serde(default)]
    pub quality: QualityConfig,

    /// Frame loop pacing and the simulated surface.
    #[serde(default)]
    pub driver: DriverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the contents are not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Path the loader should read: `BACKDROP_CONFIG` when set, otherwise
    /// [`DEFAULT_CONFIG_PATH`].
    pub fn resolve_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
    }
}

/// Noise field seeding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct NoiseConfig {
    /// Seed for the session's noise field. Absent means a fresh random seed.
    #[serde(default)]
    pub seed: Option<i64>,
}

/// Frame loop pacing and the simulated display surface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriverConfig {
    /// Target wall-clock time between frames.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Stop after this many frames. Zero runs until interrupted.
    #[serde(default = "default_max_frames")]
    pub max_frames: u64,

    /// Frames between agent settings polls.
    #[serde(default = "default_poll_interval_frames")]
    pub poll_interval_frames: u32,

    /// Layout width of the simulated surface in CSS pixels.
    #[serde(default = "default_surface_width")]
    pub surface_width: f64,

    /// Layout height of the simulated surface in CSS pixels.
    #[serde(default = "default_surface_height")]
    pub surface_height: f64,

    /// Device pixel ratio of the simulated display.
    #[serde(default = "default_device_pixel_ratio")]
    pub device_pixel_ratio: f64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
            max_frames: default_max_frames(),
            poll_interval_frames: default_poll_interval_frames(),
            surface_width: default_surface_width(),
            surface_height: default_surface_height(),
            device_pixel_ratio: default_device_pixel_ratio(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_frame_interval_ms() -> u64 {
    16
}

const fn default_max_frames() -> u64 {
    1800
}

const fn default_poll_interval_frames() -> u32 {
    backdrop_quality::budget::DEFAULT_POLL_INTERVAL_FRAMES
}

const fn default_surface_width() -> f64 {
    1280.0
}

const fn default_surface_height() -> f64 {
    720.0
}

const fn default_device_pixel_ratio() -> f64 {
    1.0
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = EngineConfig::parse("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.noise.seed, None);
        assert_eq!(config.driver.frame_interval_ms, 16);
        assert_eq!(config.driver.poll_interval_frames, 30);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.quality.initial_level, "high");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = r"
noise:
  seed: 42
quality:
  adjust_interval_frames: 30
driver:
  max_frames: 0
  device_pixel_ratio: 3.0
";
        let config = EngineConfig::parse(yaml).unwrap();
        assert_eq!(config.noise.seed, Some(42));
        assert_eq!(config.quality.adjust_interval_frames, 30);
        assert_eq!(config.quality.upgrade_fps, 110.0);
        assert_eq!(config.driver.max_frames, 0);
        assert_eq!(config.driver.device_pixel_ratio, 3.0);
        assert_eq!(config.driver.surface_width, 1280.0);
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = EngineConfig::parse("driver: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = EngineConfig::from_file(Path::new("/nonexistent/backdrop-config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn workspace_config_file_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../backdrop-config.yaml");
        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.quality.levels.len(), 3);
        assert_eq!(config.quality.initial_level_index().unwrap(), 2);
    }
}
