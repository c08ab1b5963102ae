//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup so `main` can
//! propagate with `?`. The frame loop itself does not fail.

use crate::config::ConfigError;

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The quality section describes an unusable governor.
    #[error("quality error: {source}")]
    Quality {
        /// The underlying governor construction error.
        #[from]
        source: backdrop_quality::QualityError,
    },
}
