//! The adaptive quality governor.
//!
//! The governor watches achieved frame time and walks an ordered tier list
//! one step at a time to hold the frame rate inside a hysteresis band.
//!
//! # Cycle
//!
//! 1. [`QualityGovernor::begin_frame`] stamps the frame start.
//! 2. [`QualityGovernor::end_frame`] measures the frame, converts it to an
//!    instantaneous FPS reading, and appends it to the [`SampleWindow`].
//! 3. Every `adjust_interval_frames` frames the window mean is compared
//!    against the band: below `downgrade_fps` moves one tier down, above
//!    `upgrade_fps` moves one tier up, anything in between holds.
//!
//! At most one tier transition happens per evaluation, however far the
//! mean is from the band. Agents poll [`QualityGovernor::settings`] on
//! their own cadence.
//!
//! # Suspension
//!
//! When the host stops calling the frame hooks nothing accumulates. There
//! is no pause or reset call; resuming simply continues sampling.

use std::time::Duration;

use tracing::{debug, info};

use crate::clock::{FrameClock, SystemClock};
use crate::config::QualityConfig;
use crate::error::QualityError;
use crate::level::{FpsThresholds, QualityLevel};
use crate::settings::QualitySettings;
use crate::window::SampleWindow;

/// Frame duration substituted for zero or unmeasured frames (60 Hz).
pub const NOMINAL_FRAME: Duration = Duration::from_nanos(16_666_667);

/// Direction of a tier transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierDirection {
    /// Moved to a cheaper tier.
    Down,
    /// Moved to a more expensive tier.
    Up,
}

/// A tier transition produced by one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct TierChange {
    /// Tier index before the evaluation.
    pub from: usize,
    /// Tier index after the evaluation.
    pub to: usize,
    /// Whether the governor stepped up or down.
    pub direction: TierDirection,
    /// Window mean FPS that triggered the transition.
    pub mean_fps: f64,
    /// Frame counter value at the evaluation.
    pub frame: u64,
}

/// Frame-time driven tier state machine.
///
/// Generic over its time source so hosts can inject a [`ManualClock`];
/// the default reads the system monotonic clock.
///
/// [`ManualClock`]: crate::clock::ManualClock
#[derive(Debug, Clone)]
pub struct QualityGovernor<C: FrameClock = SystemClock> {
    /// Time source for frame measurement.
    clock: C,
    /// Tiers ordered from cheapest to most expensive. Never empty.
    levels: Vec<QualityLevel>,
    /// Hysteresis band and startup stand-in.
    thresholds: FpsThresholds,
    /// Frames between evaluations. Never zero.
    adjust_interval_frames: u64,
    /// Index of the current tier into `levels`.
    level_index: usize,
    /// Frames completed since construction.
    frame_count: u64,
    /// Recent instantaneous FPS readings.
    window: SampleWindow,
    /// Timestamp recorded by the last unmatched `begin_frame`.
    frame_start: Option<Duration>,
}

impl QualityGovernor<SystemClock> {
    /// Build a governor on the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError::InvalidConfig`] if `levels` is empty, the
    /// band is inverted or degenerate, `window_capacity` or
    /// `adjust_interval_frames` is zero, `initial_level_index` is out of
    /// range, or a tier's resolution scale is outside `(0, 1]`.
    pub fn new(
        levels: Vec<QualityLevel>,
        thresholds: FpsThresholds,
        window_capacity: usize,
        adjust_interval_frames: u64,
        initial_level_index: usize,
    ) -> Result<Self, QualityError> {
        Self::with_clock(
            SystemClock::new(),
            levels,
            thresholds,
            window_capacity,
            adjust_interval_frames,
            initial_level_index,
        )
    }

    /// Build a governor on the system clock from a configuration section.
    pub fn from_config(config: &QualityConfig) -> Result<Self, QualityError> {
        Self::from_config_with_clock(SystemClock::new(), config)
    }
}

impl<C: FrameClock> QualityGovernor<C> {
    /// Build a governor reading time from `clock`.
    ///
    /// Validation is identical to [`QualityGovernor::new`].
    pub fn with_clock(
        clock: C,
        levels: Vec<QualityLevel>,
        thresholds: FpsThresholds,
        window_capacity: usize,
        adjust_interval_frames: u64,
        initial_level_index: usize,
    ) -> Result<Self, QualityError> {
        if levels.is_empty() {
            return Err(QualityError::invalid("at least one quality level is required"));
        }
        for level in &levels {
            level.validate()?;
        }
        thresholds.validate()?;
        if window_capacity == 0 {
            return Err(QualityError::invalid("window_capacity must be at least 1"));
        }
        if adjust_interval_frames == 0 {
            return Err(QualityError::invalid(
                "adjust_interval_frames must be at least 1",
            ));
        }
        if initial_level_index >= levels.len() {
            return Err(QualityError::invalid(format!(
                "initial level index {initial_level_index} is out of range for {} levels",
                levels.len()
            )));
        }

        debug!(
            levels = levels.len(),
            initial_level = initial_level_index,
            upgrade_fps = thresholds.upgrade_fps,
            downgrade_fps = thresholds.downgrade_fps,
            window_capacity,
            adjust_interval_frames,
            "Quality governor created"
        );

        Ok(Self {
            clock,
            levels,
            thresholds,
            adjust_interval_frames,
            level_index: initial_level_index,
            frame_count: 0,
            window: SampleWindow::new(window_capacity),
            frame_start: None,
        })
    }

    /// Build a governor reading time from `clock` from a configuration
    /// section. The initial tier is looked up by name.
    pub fn from_config_with_clock(clock: C, config: &QualityConfig) -> Result<Self, QualityError> {
        config.surface_policy().validate()?;
        let initial = config.initial_level_index()?;
        Self::with_clock(
            clock,
            config.levels.clone(),
            config.thresholds(),
            config.window_capacity,
            config.adjust_interval_frames,
            initial,
        )
    }

    /// Mark the start of a frame.
    pub fn begin_frame(&mut self) {
        self.frame_start = Some(self.clock.now());
    }

    /// Mark the end of a frame and evaluate if the cadence is due.
    ///
    /// Without a matching [`Self::begin_frame`] the frame is recorded at
    /// the nominal 60 Hz duration.
    pub fn end_frame(&mut self) -> Option<TierChange> {
        let elapsed = self.frame_start.take().map_or(NOMINAL_FRAME, |start| {
            self.clock.now().saturating_sub(start)
        });
        self.record_frame(elapsed)
    }

    /// Record a frame that took `elapsed`, for hosts that time frames
    /// themselves.
    ///
    /// A zero duration is replaced by [`NOMINAL_FRAME`].
    pub fn record_frame(&mut self, elapsed: Duration) -> Option<TierChange> {
        let elapsed = if elapsed.is_zero() { NOMINAL_FRAME } else { elapsed };
        let fps = 1.0 / elapsed.as_secs_f64();
        self.window.push(fps);
        self.frame_count = self.frame_count.saturating_add(1);

        if self.frame_count.checked_rem(self.adjust_interval_frames) == Some(0) {
            self.evaluate()
        } else {
            None
        }
    }

    /// Compare the window mean against the band and step at most one tier.
    fn evaluate(&mut self) -> Option<TierChange> {
        let mean_fps = self.mean_fps();
        let from = self.level_index;
        let highest = self.levels.len().saturating_sub(1);

        let (to, direction) = if mean_fps < self.thresholds.downgrade_fps && from > 0 {
            (from.saturating_sub(1), TierDirection::Down)
        } else if mean_fps > self.thresholds.upgrade_fps && from < highest {
            (from.saturating_add(1), TierDirection::Up)
        } else {
            debug!(
                frame = self.frame_count,
                mean_fps,
                level = self.level().name.as_str(),
                "Quality held"
            );
            return None;
        };

        self.level_index = to;
        let change = TierChange {
            from,
            to,
            direction,
            mean_fps,
            frame: self.frame_count,
        };

        info!(
            frame = change.frame,
            mean_fps,
            from = self.levels.get(from).map_or("", |l| l.name.as_str()),
            to = self.level().name.as_str(),
            ?direction,
            "Quality level changed"
        );

        Some(change)
    }

    /// Snapshot of the current tier.
    pub fn settings(&self) -> QualitySettings {
        QualitySettings::from(self.level())
    }

    /// The current tier.
    #[allow(clippy::indexing_slicing)] // level_index is validated at construction and stays in bounds
    pub fn level(&self) -> &QualityLevel {
        &self.levels[self.level_index]
    }

    /// Index of the current tier.
    pub const fn level_index(&self) -> usize {
        self.level_index
    }

    /// Every tier, cheapest first.
    pub fn levels(&self) -> &[QualityLevel] {
        &self.levels
    }

    /// The hysteresis band.
    pub const fn thresholds(&self) -> &FpsThresholds {
        &self.thresholds
    }

    /// Frames completed since construction.
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames between evaluations.
    pub const fn adjust_interval_frames(&self) -> u64 {
        self.adjust_interval_frames
    }

    /// Window mean FPS, or the target FPS when no readings exist yet.
    pub fn mean_fps(&self) -> f64 {
        self.window.mean().unwrap_or(self.thresholds.target_fps)
    }

    /// The recent FPS readings.
    pub const fn window(&self) -> &SampleWindow {
        &self.window
    }

    /// The governor's time source.
    pub const fn clock(&self) -> &C {
        &self.clock
    }
}
