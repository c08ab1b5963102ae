//! The paced frame loop.
//!
//! [`FrameDriver`] stands in for a display's frame callback. A tokio
//! interval fires once per frame; each tick closes the previous frame on
//! the governor, opens the next one, and advances the agent. The measured
//! frame duration is therefore the full tick-to-tick period, the same
//! quantity a browser frame callback reports.
//!
//! The loop ends after `max_frames` ticks (zero means never) or when the
//! shutdown future resolves.

use std::future::Future;
use std::time::Duration;

use backdrop_noise::NoiseField;
use backdrop_quality::{FrameClock, QualityGovernor, SettingsWatcher};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::agent::DriftAgent;
use crate::config::DriverConfig;

/// Largest frame step handed to the agent. Longer stalls are absorbed.
pub const MAX_AGENT_STEP: Duration = Duration::from_millis(50);

/// Frame clock on tokio's timeline, so paused test runtimes drive it.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    /// A clock whose zero is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The configured frame limit was reached.
    MaxFrames,
    /// The shutdown signal fired.
    Interrupted,
}

/// Outcome of a driver run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Why the loop stopped.
    pub end_reason: EndReason,
    /// Ticks processed.
    pub frames: u64,
    /// Tier transitions observed.
    pub tier_changes: u64,
    /// Tier in force when the loop stopped.
    pub final_level: String,
    /// Governor window mean at the end of the run.
    pub mean_fps: f64,
    /// Entities alive at the end of the run.
    pub entities: usize,
    /// Frames the governor measured. One less than `frames` once the
    /// loop has ticked, since the last frame is still open.
    pub measured_frames: u64,
    /// Agent clock at the end of the run.
    pub agent_time_ms: f64,
    /// Agent backing surface at the end of the run.
    pub surface: (u32, u32),
    /// Mean drifter position at the end of the run, if any drifter exists.
    pub centroid: Option<(f64, f64)>,
}

/// Drives one governor and one agent over a shared noise field.
#[derive(Debug)]
pub struct FrameDriver<'a> {
    field: &'a NoiseField,
    governor: QualityGovernor<TokioClock>,
    watcher: SettingsWatcher,
    agent: DriftAgent,
    frame_interval: Duration,
    max_frames: u64,
}

impl<'a> FrameDriver<'a> {
    /// Wire a driver. The agent is sized for the governor's initial tier.
    pub fn new(
        field: &'a NoiseField,
        governor: QualityGovernor<TokioClock>,
        agent: DriftAgent,
        config: &DriverConfig,
    ) -> Self {
        let mut watcher = SettingsWatcher::new(config.poll_interval_frames);
        // Prime the watcher so only genuine changes reach the agent.
        let _ = watcher.poll_now(&governor);
        Self {
            field,
            governor,
            watcher,
            agent,
            frame_interval: Duration::from_millis(config.frame_interval_ms.max(1)),
            max_frames: config.max_frames,
        }
    }

    /// Run until the frame limit or until `shutdown` resolves.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) -> RunSummary {
        let mut ticker = tokio::time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(
            frame_interval_ms = self.frame_interval.as_millis(),
            max_frames = self.max_frames,
            level = self.governor.level().name.as_str(),
            entities = self.agent.entities().len(),
            "Frame loop starting"
        );

        let mut frames: u64 = 0;
        let mut tier_changes: u64 = 0;
        let mut last_tick: Option<Instant> = None;

        let end_reason = loop {
            if self.max_frames != 0 && frames >= self.max_frames {
                break EndReason::MaxFrames;
            }

            let now = tokio::select! {
                () = &mut shutdown => break EndReason::Interrupted,
                now = ticker.tick() => now,
            };

            if last_tick.is_some() && self.governor.end_frame().is_some() {
                tier_changes = tier_changes.saturating_add(1);
            }
            self.governor.begin_frame();

            let dt = last_tick
                .map_or(self.frame_interval, |prev| now.saturating_duration_since(prev))
                .min(MAX_AGENT_STEP);
            last_tick = Some(now);
            self.agent.update(self.field, dt.as_secs_f64() * 1000.0);

            if let Some(settings) = self.watcher.tick(&self.governor) {
                debug!(
                    from = self.agent.level(),
                    to = settings.level.as_str(),
                    frame = frames,
                    "Resizing agent"
                );
                self.agent.apply_settings(&settings);
            }
            frames = frames.saturating_add(1);
        };

        RunSummary {
            end_reason,
            frames,
            tier_changes,
            final_level: self.governor.level().name.clone(),
            mean_fps: self.governor.mean_fps(),
            entities: self.agent.entities().len(),
            measured_frames: self.governor.frame_count(),
            agent_time_ms: self.agent.time_ms(),
            surface: self.agent.surface(),
            centroid: self.agent.centroid(),
        }
    }
}

/// Log the end-of-run summary.
pub fn log_run_end(summary: &RunSummary) {
    info!(
        reason = ?summary.end_reason,
        frames = summary.frames,
        tier_changes = summary.tier_changes,
        final_level = summary.final_level.as_str(),
        mean_fps = summary.mean_fps,
        entities = summary.entities,
        measured_frames = summary.measured_frames,
        agent_time_ms = summary.agent_time_ms,
        width = summary.surface.0,
        height = summary.surface.1,
        centroid = ?summary.centroid,
        "Frame loop ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use backdrop_quality::QualityConfig;

    use super::*;

    fn quality(initial: &str) -> QualityConfig {
        QualityConfig {
            window_capacity: 10,
            adjust_interval_frames: 10,
            initial_level: initial.to_owned(),
            ..QualityConfig::default()
        }
    }

    fn driver_config(frame_interval_ms: u64, max_frames: u64) -> DriverConfig {
        DriverConfig {
            frame_interval_ms,
            max_frames,
            poll_interval_frames: 5,
            ..DriverConfig::default()
        }
    }

    fn build<'a>(
        field: &'a NoiseField,
        quality: &QualityConfig,
        driver: &DriverConfig,
    ) -> FrameDriver<'a> {
        let governor = QualityGovernor::from_config_with_clock(TokioClock::new(), quality).unwrap();
        let agent = DriftAgent::new(
            &governor.settings(),
            quality.surface_policy(),
            (driver.surface_width, driver.surface_height),
            driver.device_pixel_ratio,
            1,
        );
        FrameDriver::new(field, governor, agent, driver)
    }

    #[tokio::test(start_paused = true)]
    async fn slow_frames_walk_down_to_lowest_tier() {
        let field = NoiseField::new(42);
        let mut driver = build(&field, &quality("high"), &driver_config(25, 41));

        let summary = driver.run(std::future::pending()).await;

        assert_eq!(summary.end_reason, EndReason::MaxFrames);
        assert_eq!(summary.frames, 41);
        assert_eq!(summary.measured_frames, 40);
        assert!((summary.agent_time_ms - 1025.0).abs() < 1e-6);
        assert_eq!(summary.tier_changes, 2);
        assert_eq!(summary.final_level, "low");
        assert!((summary.mean_fps - 40.0).abs() < 1e-6);
        assert_eq!(summary.entities, 80);
        assert_eq!(summary.surface, (768, 432));
    }

    #[tokio::test(start_paused = true)]
    async fn fast_frames_walk_up_to_highest_tier() {
        let field = NoiseField::new(42);
        let mut driver = build(&field, &quality("low"), &driver_config(5, 41));

        let summary = driver.run(std::future::pending()).await;

        assert_eq!(summary.final_level, "high");
        assert_eq!(summary.tier_changes, 2);
        assert_eq!(summary.entities, 220);
    }

    #[tokio::test(start_paused = true)]
    async fn in_band_frames_hold_tier() {
        let field = NoiseField::new(42);
        let mut driver = build(&field, &quality("medium"), &driver_config(12, 101));

        let summary = driver.run(std::future::pending()).await;

        assert_eq!(summary.tier_changes, 0);
        assert_eq!(summary.final_level, "medium");
        assert_eq!(summary.entities, 140);
    }

    #[tokio::test(start_paused = true)]
    async fn long_frames_advance_agent_by_capped_step() {
        let field = NoiseField::new(42);
        let mut driver = build(&field, &quality("high"), &driver_config(80, 10));

        let summary = driver.run(std::future::pending()).await;

        // Every 80 ms frame is handed to the agent as 50 ms.
        assert!((summary.agent_time_ms - 500.0).abs() < 1e-6);
        assert!((summary.mean_fps - 12.5).abs() < 1e-6);
        let (x, y) = summary.centroid.unwrap();
        assert!(x.is_finite() && y.is_finite());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_signal_stops_unbounded_loop() {
        let field = NoiseField::new(42);
        let mut driver = build(&field, &quality("high"), &driver_config(10, 0));

        let summary = driver
            .run(tokio::time::sleep(Duration::from_millis(105)))
            .await;

        assert_eq!(summary.end_reason, EndReason::Interrupted);
        assert!((10..=12).contains(&summary.frames), "frames = {}", summary.frames);
    }
}
