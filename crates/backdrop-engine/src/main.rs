//! Reference host for the Backdrop noise field and quality governor.
//!
//! The binary plays the role a page script plays for the visual engine:
//! it owns one [`NoiseField`] for the session and one [`QualityGovernor`],
//! drives a noise-animated agent from a paced frame loop, and lets the
//! governor resize that agent as the achieved frame rate moves.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `backdrop-config.yaml` (or `BACKDROP_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the noise field from the configured or a random seed
//! 4. Build the governor and size the agent for its initial tier
//! 5. Run the frame loop until the frame limit or Ctrl-C
//! 6. Log the run summary

mod agent;
mod config;
mod driver;
mod error;

use backdrop_noise::NoiseField;
use backdrop_quality::QualityGovernor;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::agent::DriftAgent;
use crate::config::EngineConfig;
use crate::driver::{FrameDriver, TokioClock};
use crate::error::EngineError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read or describes an
/// unusable governor.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so the outcome is
    //    reported once the subscriber is installed.
    let (config, loaded_from) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("backdrop-engine starting");
    match loaded_from {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => warn!("Config file not found, using defaults"),
    }

    // 3. Noise field.
    let field = config
        .noise
        .seed
        .map_or_else(NoiseField::from_entropy, NoiseField::new);
    info!(seed = field.seed(), "Noise field ready");

    // 4. Governor and agent.
    let governor = QualityGovernor::from_config_with_clock(TokioClock::new(), &config.quality)
        .map_err(EngineError::from)?;
    let settings = governor.settings();
    info!(
        level = settings.level.as_str(),
        levels = governor.levels().len(),
        upgrade_fps = governor.thresholds().upgrade_fps,
        downgrade_fps = governor.thresholds().downgrade_fps,
        adjust_interval_frames = governor.adjust_interval_frames(),
        "Quality governor ready"
    );

    let driver_config = &config.driver;
    let agent = DriftAgent::new(
        &settings,
        config.quality.surface_policy(),
        (driver_config.surface_width, driver_config.surface_height),
        driver_config.device_pixel_ratio,
        field.seed().unsigned_abs(),
    );

    // 5. Frame loop.
    let mut driver = FrameDriver::new(&field, governor, agent, driver_config);
    let summary = driver.run(shutdown_signal()).await;

    // 6. Summary.
    driver::log_run_end(&summary);
    Ok(())
}

/// Resolve and load the configuration file.
///
/// Returns the path it was read from, or `None` when the file does not
/// exist and defaults apply.
fn load_config() -> Result<(EngineConfig, Option<std::path::PathBuf>), EngineError> {
    let path = EngineConfig::resolve_path();
    if path.exists() {
        let config = EngineConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        Ok((EngineConfig::default(), None))
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
