//! Settings snapshots handed to agents, and backing-surface sizing.

use serde::{Deserialize, Serialize};

use crate::error::QualityError;
use crate::level::QualityLevel;

/// Default cap on the device pixel ratio used for backing surfaces.
pub const DEFAULT_MAX_PIXEL_RATIO: f64 = 2.0;
/// Default resolution multiplier applied on top of every tier.
pub const DEFAULT_BASE_RESOLUTION_SCALE: f64 = 1.0;
/// Default floor on the effective resolution scale.
pub const DEFAULT_MIN_RESOLUTION_SCALE: f64 = 0.6;
/// Default ceiling on the effective resolution scale.
pub const DEFAULT_MAX_RESOLUTION_SCALE: f64 = 1.0;

/// What an agent should render at right now.
///
/// An owned snapshot: agents keep it and compare against the next poll
/// rather than holding a borrow of the governor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySettings {
    /// Name of the current tier.
    pub level: String,
    /// Fraction of native resolution to render at.
    pub resolution_scale: f64,
    /// Upper bound on simultaneously animated entities.
    pub max_entities: u32,
}

impl From<&QualityLevel> for QualitySettings {
    fn from(level: &QualityLevel) -> Self {
        Self {
            level: level.name.clone(),
            resolution_scale: level.resolution_scale,
            max_entities: level.max_entities,
        }
    }
}

/// Device-independent limits applied when sizing a backing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePolicy {
    /// Largest pixel ratio a surface is sized at.
    pub max_pixel_ratio: f64,
    /// Multiplier applied to every tier's resolution scale.
    pub base_resolution_scale: f64,
    /// Lower bound on the combined tier and base scale.
    pub min_resolution_scale: f64,
    /// Upper bound on the combined tier and base scale.
    pub max_resolution_scale: f64,
}

impl SurfacePolicy {
    /// Reject non-positive or non-finite limits and an inverted scale range.
    pub fn validate(&self) -> Result<(), QualityError> {
        for (name, value) in [
            ("max_pixel_ratio", self.max_pixel_ratio),
            ("base_resolution_scale", self.base_resolution_scale),
            ("min_resolution_scale", self.min_resolution_scale),
            ("max_resolution_scale", self.max_resolution_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(QualityError::invalid(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        if self.min_resolution_scale > self.max_resolution_scale {
            return Err(QualityError::invalid(format!(
                "min_resolution_scale ({}) must not exceed max_resolution_scale ({})",
                self.min_resolution_scale, self.max_resolution_scale
            )));
        }
        Ok(())
    }

    /// Effective resolution scale for a tier: `tier * base`, clamped into
    /// `[min_resolution_scale, max_resolution_scale]`.
    pub fn resolution_scale(&self, tier_scale: f64) -> f64 {
        (tier_scale * self.base_resolution_scale)
            .min(self.max_resolution_scale)
            .max(self.min_resolution_scale)
    }

    /// Pixel ratio for a surface rendered at `resolution_scale`.
    ///
    /// `device_pixel_ratio * resolution_scale`, capped at
    /// `max_pixel_ratio` but never below `resolution_scale` itself. Unusable
    /// device ratios fall back to 1.
    pub fn pixel_ratio(&self, device_pixel_ratio: f64, resolution_scale: f64) -> f64 {
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        (ratio * resolution_scale)
            .min(self.max_pixel_ratio)
            .max(resolution_scale)
    }
}

impl Default for SurfacePolicy {
    fn default() -> Self {
        Self {
            max_pixel_ratio: DEFAULT_MAX_PIXEL_RATIO,
            base_resolution_scale: DEFAULT_BASE_RESOLUTION_SCALE,
            min_resolution_scale: DEFAULT_MIN_RESOLUTION_SCALE,
            max_resolution_scale: DEFAULT_MAX_RESOLUTION_SCALE,
        }
    }
}

impl QualitySettings {
    /// Pixel size of the backing surface for a `css_width x css_height`
    /// layout box.
    ///
    /// The tier scale goes through [`SurfacePolicy::resolution_scale`] and
    /// [`SurfacePolicy::pixel_ratio`]; each side is `css * pixel_ratio`,
    /// floored, and never below 1.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn backing_size(
        &self,
        css_width: f64,
        css_height: f64,
        device_pixel_ratio: f64,
        policy: &SurfacePolicy,
    ) -> (u32, u32) {
        let scale = policy.resolution_scale(self.resolution_scale);
        let pixel_ratio = policy.pixel_ratio(device_pixel_ratio, scale);
        let side = |css: f64| {
            let pixels = (css * pixel_ratio).floor();
            if pixels.is_nan() {
                return 1;
            }
            // Clamped into [1, u32::MAX] before the cast.
            pixels.clamp(1.0, f64::from(u32::MAX)) as u32
        };
        (side(css_width), side(css_height))
    }
}
