//! Quality tiers and the FPS hysteresis band.
//!
//! Tiers are plain data: an ordered list from cheapest to most expensive.
//! The governor never refers to a tier by name, so any number of tiers in
//! any naming scheme works.

use serde::{Deserialize, Serialize};

use crate::error::QualityError;

/// Mean FPS above which the governor moves one tier up.
pub const DEFAULT_UPGRADE_FPS: f64 = 110.0;
/// Mean FPS below which the governor moves one tier down.
pub const DEFAULT_DOWNGRADE_FPS: f64 = 50.0;
/// Mean FPS assumed while no samples have been collected.
pub const DEFAULT_TARGET_FPS: f64 = 90.0;

/// A named rendering-cost tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityLevel {
    /// Display name, reported back in settings snapshots.
    pub name: String,
    /// Fraction of native resolution to render at, in `(0, 1]`.
    pub resolution_scale: f64,
    /// Upper bound on simultaneously animated entities.
    pub max_entities: u32,
}

impl QualityLevel {
    /// Create a tier.
    pub fn new(name: impl Into<String>, resolution_scale: f64, max_entities: u32) -> Self {
        Self {
            name: name.into(),
            resolution_scale,
            max_entities,
        }
    }

    /// Check that the resolution scale lies in `(0, 1]`.
    pub fn validate(&self) -> Result<(), QualityError> {
        let scale = self.resolution_scale;
        if !scale.is_finite() || scale <= 0.0 || scale > 1.0 {
            return Err(QualityError::invalid(format!(
                "level '{}' has resolution_scale {scale}, expected a value in (0, 1]",
                self.name
            )));
        }
        Ok(())
    }
}

/// The stock low/medium/high ladder.
pub fn default_levels() -> Vec<QualityLevel> {
    vec![
        QualityLevel::new("low", 0.6, 80),
        QualityLevel::new("medium", 0.85, 140),
        QualityLevel::new("high", 1.0, 220),
    ]
}

/// The hysteresis band and the startup stand-in FPS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FpsThresholds {
    /// Mean FPS strictly above which the tier moves up.
    pub upgrade_fps: f64,
    /// Mean FPS strictly below which the tier moves down.
    pub downgrade_fps: f64,
    /// Mean FPS assumed while the sample window is empty.
    pub target_fps: f64,
}

impl FpsThresholds {
    /// A band with the default target FPS.
    pub const fn new(upgrade_fps: f64, downgrade_fps: f64) -> Self {
        Self {
            upgrade_fps,
            downgrade_fps,
            target_fps: DEFAULT_TARGET_FPS,
        }
    }

    /// Replace the startup stand-in FPS.
    #[must_use]
    pub const fn with_target_fps(mut self, target_fps: f64) -> Self {
        self.target_fps = target_fps;
        self
    }

    /// Reject non-positive, non-finite, or inverted bands.
    pub fn validate(&self) -> Result<(), QualityError> {
        for (name, value) in [
            ("upgrade_fps", self.upgrade_fps),
            ("downgrade_fps", self.downgrade_fps),
            ("target_fps", self.target_fps),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(QualityError::invalid(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        if self.upgrade_fps <= self.downgrade_fps {
            return Err(QualityError::invalid(format!(
                "upgrade_fps ({}) must be strictly above downgrade_fps ({})",
                self.upgrade_fps, self.downgrade_fps
            )));
        }
        Ok(())
    }
}

impl Default for FpsThresholds {
    fn default() -> Self {
        Self::new(DEFAULT_UPGRADE_FPS, DEFAULT_DOWNGRADE_FPS)
    }
}
