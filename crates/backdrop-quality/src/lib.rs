//! Adaptive rendering quality for Backdrop visual agents.
//!
//! A [`QualityGovernor`] samples achieved frame time, keeps a sliding
//! window of instantaneous FPS readings, and every N frames steps one tier
//! up or down an ordered ladder of [`QualityLevel`]s when the window mean
//! leaves the hysteresis band. Agents read a [`QualitySettings`] snapshot
//! and resize their work accordingly.
//!
//! # Modules
//!
//! - [`level`] -- Quality tiers and the FPS band.
//! - [`window`] -- Bounded FIFO of FPS readings.
//! - [`clock`] -- Monotonic time sources for frame measurement.
//! - [`governor`] -- The tier state machine.
//! - [`settings`] -- Settings snapshots and backing-surface sizing.
//! - [`budget`] -- Entity-count sync and cadence-based settings polling.
//! - [`config`] -- The YAML `quality` section.
//! - [`error`] -- Construction errors.

pub mod budget;
pub mod clock;
pub mod config;
pub mod error;
pub mod governor;
pub mod level;
pub mod settings;
pub mod window;

// Re-export primary types at crate root.
pub use budget::{BudgetChange, EntityBudget, SettingsWatcher};
pub use clock::{FrameClock, ManualClock, SystemClock};
pub use config::QualityConfig;
pub use error::QualityError;
pub use governor::{QualityGovernor, TierChange, TierDirection};
pub use level::{FpsThresholds, QualityLevel, default_levels};
pub use settings::{QualitySettings, SurfacePolicy};
pub use window::SampleWindow;
