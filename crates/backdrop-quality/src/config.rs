//! The `quality` section of the configuration file.
//!
//! Every field has a named default reproducing the stock tuning, so an
//! empty section (or a missing one) yields the stock governor.

use serde::{Deserialize, Serialize};

use crate::error::QualityError;
use crate::level::{
    DEFAULT_DOWNGRADE_FPS, DEFAULT_TARGET_FPS, DEFAULT_UPGRADE_FPS, FpsThresholds, QualityLevel,
    default_levels,
};
use crate::settings::{
    DEFAULT_BASE_RESOLUTION_SCALE, DEFAULT_MAX_PIXEL_RATIO, DEFAULT_MAX_RESOLUTION_SCALE,
    DEFAULT_MIN_RESOLUTION_SCALE, SurfacePolicy,
};
use crate::window::DEFAULT_WINDOW_CAPACITY;

/// Governor tuning as read from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Mean FPS assumed before any frame has been sampled.
    #[serde(default = "default_target_fps")]
    pub target_fps: f64,

    /// Mean FPS above which the governor moves one tier up.
    #[serde(default = "default_upgrade_fps")]
    pub upgrade_fps: f64,

    /// Mean FPS below which the governor moves one tier down.
    #[serde(default = "default_downgrade_fps")]
    pub downgrade_fps: f64,

    /// Number of FPS readings averaged per evaluation.
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,

    /// Frames between evaluations.
    #[serde(default = "default_adjust_interval_frames")]
    pub adjust_interval_frames: u64,

    /// Name of the tier to start on.
    #[serde(default = "default_initial_level")]
    pub initial_level: String,

    /// Ceiling applied to the device pixel ratio when sizing surfaces.
    #[serde(default = "default_max_pixel_ratio")]
    pub max_pixel_ratio: f64,

    /// Scale multiplied into every tier's resolution scale.
    #[serde(default = "default_base_resolution_scale")]
    pub base_resolution_scale: f64,

    /// Floor on the combined tier and base resolution scale.
    #[serde(default = "default_min_resolution_scale")]
    pub min_resolution_scale: f64,

    /// Ceiling on the combined tier and base resolution scale.
    #[serde(default = "default_max_resolution_scale")]
    pub max_resolution_scale: f64,

    /// Tiers ordered from cheapest to most expensive.
    #[serde(default = "default_levels")]
    pub levels: Vec<QualityLevel>,
}

impl QualityConfig {
    /// The hysteresis band described by this section.
    pub const fn thresholds(&self) -> FpsThresholds {
        FpsThresholds::new(self.upgrade_fps, self.downgrade_fps).with_target_fps(self.target_fps)
    }

    /// The surface sizing policy described by this section.
    pub const fn surface_policy(&self) -> SurfacePolicy {
        SurfacePolicy {
            max_pixel_ratio: self.max_pixel_ratio,
            base_resolution_scale: self.base_resolution_scale,
            min_resolution_scale: self.min_resolution_scale,
            max_resolution_scale: self.max_resolution_scale,
        }
    }

    /// Resolve `initial_level` to an index into `levels`.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError::InvalidConfig`] if no tier has that name.
    pub fn initial_level_index(&self) -> Result<usize, QualityError> {
        self.levels
            .iter()
            .position(|level| level.name == self.initial_level)
            .ok_or_else(|| {
                QualityError::invalid(format!(
                    "initial_level '{}' does not name a configured level",
                    self.initial_level
                ))
            })
    }
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
            upgrade_fps: default_upgrade_fps(),
            downgrade_fps: default_downgrade_fps(),
            window_capacity: default_window_capacity(),
            adjust_interval_frames: default_adjust_interval_frames(),
            initial_level: default_initial_level(),
            max_pixel_ratio: default_max_pixel_ratio(),
            base_resolution_scale: default_base_resolution_scale(),
            min_resolution_scale: default_min_resolution_scale(),
            max_resolution_scale: default_max_resolution_scale(),
            levels: default_levels(),
        }
    }
}

const fn default_target_fps() -> f64 {
    DEFAULT_TARGET_FPS
}

const fn default_upgrade_fps() -> f64 {
    DEFAULT_UPGRADE_FPS
}

const fn default_downgrade_fps() -> f64 {
    DEFAULT_DOWNGRADE_FPS
}

const fn default_window_capacity() -> usize {
    DEFAULT_WINDOW_CAPACITY
}

const fn default_adjust_interval_frames() -> u64 {
    90
}

fn default_initial_level() -> String {
    "high".to_owned()
}

const fn default_max_pixel_ratio() -> f64 {
    DEFAULT_MAX_PIXEL_RATIO
}

const fn default_base_resolution_scale() -> f64 {
    DEFAULT_BASE_RESOLUTION_SCALE
}

const fn default_min_resolution_scale() -> f64 {
    DEFAULT_MIN_RESOLUTION_SCALE
}

const fn default_max_resolution_scale() -> f64 {
    DEFAULT_MAX_RESOLUTION_SCALE
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::governor::QualityGovernor;

    #[test]
    fn empty_section_yields_stock_tuning() {
        let config: QualityConfig = serde_yml::from_str("{}").unwrap();
        assert_eq!(config, QualityConfig::default());
        assert_eq!(config.target_fps, 90.0);
        assert_eq!(config.upgrade_fps, 110.0);
        assert_eq!(config.downgrade_fps, 50.0);
        assert_eq!(config.window_capacity, 120);
        assert_eq!(config.adjust_interval_frames, 90);
        assert_eq!(config.initial_level, "high");
        assert_eq!(config.levels.len(), 3);
        assert_eq!(config.initial_level_index().unwrap(), 2);
    }

    #[test]
    fn custom_ladder_parses() {
        let yaml = r"
upgrade_fps: 70
downgrade_fps: 40
initial_level: mid
levels:
  - { name: lo, resolution_scale: 0.5, max_entities: 10 }
  - { name: mid, resolution_scale: 0.75, max_entities: 20 }
";
        let config: QualityConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.levels.len(), 2);
        assert_eq!(config.initial_level_index().unwrap(), 1);
        let thresholds = config.thresholds();
        assert_eq!(thresholds.upgrade_fps, 70.0);
        assert_eq!(thresholds.downgrade_fps, 40.0);
        assert_eq!(thresholds.target_fps, 90.0);

        let governor = QualityGovernor::from_config(&config).unwrap();
        assert_eq!(governor.settings().level, "mid");
    }

    #[test]
    fn unknown_initial_level_is_rejected() {
        let config = QualityConfig {
            initial_level: "ultra".to_owned(),
            ..QualityConfig::default()
        };
        assert!(matches!(
            config.initial_level_index(),
            Err(QualityError::InvalidConfig { .. })
        ));
        assert!(QualityGovernor::from_config(&config).is_err());
    }

    #[test]
    fn surface_policy_carries_configured_values() {
        let config = QualityConfig {
            max_pixel_ratio: 1.5,
            base_resolution_scale: 0.5,
            ..QualityConfig::default()
        };
        let policy = config.surface_policy();
        assert_eq!(policy.max_pixel_ratio, 1.5);
        assert_eq!(policy.base_resolution_scale, 0.5);
        assert_eq!(policy.min_resolution_scale, 0.6);
        assert_eq!(policy.max_resolution_scale, 1.0);
    }

    #[test]
    fn resolution_scale_range_parses_and_is_validated() {
        let config: QualityConfig =
            serde_yml::from_str("min_resolution_scale: 0.3\nmax_resolution_scale: 0.9\n").unwrap();
        let policy = config.surface_policy();
        assert_eq!(policy.min_resolution_scale, 0.3);
        assert_eq!(policy.max_resolution_scale, 0.9);

        let inverted = QualityConfig {
            min_resolution_scale: 0.9,
            max_resolution_scale: 0.3,
            ..QualityConfig::default()
        };
        assert!(matches!(
            QualityGovernor::from_config(&inverted),
            Err(QualityError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = QualityConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: QualityConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
