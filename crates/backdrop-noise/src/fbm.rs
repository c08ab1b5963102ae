//! Fractal Brownian motion over the simplex samplers.
//!
//! Octaves are summed at doubling (by default) frequency and halving
//! amplitude, then divided by the total amplitude so the result stays
//! roughly in `[-1, 1]` whatever the octave count.

use serde::{Deserialize, Serialize};

use crate::field::NoiseField;

/// Default number of octaves.
pub const DEFAULT_OCTAVES: u32 = 6;
/// Default per-octave amplitude multiplier.
pub const DEFAULT_PERSISTENCE: f64 = 0.5;
/// Default per-octave frequency multiplier.
pub const DEFAULT_LACUNARITY: f64 = 2.0;

/// Octave parameters for fractal sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FbmParams {
    /// Number of noise layers summed.
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    /// Amplitude multiplier applied after each octave.
    #[serde(default = "default_persistence")]
    pub persistence: f64,
    /// Frequency multiplier applied after each octave.
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f64,
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            octaves: DEFAULT_OCTAVES,
            persistence: DEFAULT_PERSISTENCE,
            lacunarity: DEFAULT_LACUNARITY,
        }
    }
}

const fn default_octaves() -> u32 {
    DEFAULT_OCTAVES
}

const fn default_persistence() -> f64 {
    DEFAULT_PERSISTENCE
}

const fn default_lacunarity() -> f64 {
    DEFAULT_LACUNARITY
}

/// Sum `octaves` layers of `sample(frequency)` and renormalize.
///
/// Returns `0.0` when the amplitudes sum to zero.
#[inline]
fn accumulate(
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
    mut sample: impl FnMut(f64) -> f64,
) -> f64 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut total_amplitude = 0.0;

    for _ in 0..octaves {
        value += amplitude * sample(frequency);
        total_amplitude += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    // Zero octaves, or a negative persistence that cancels out.
    if total_amplitude.abs() < f64::EPSILON {
        return 0.0;
    }
    value / total_amplitude
}

impl NoiseField {
    /// Fractal 2D noise at `(x, y)`.
    pub fn fbm_2d(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        accumulate(octaves, persistence, lacunarity, |frequency| {
            self.sample_2d(x * frequency, y * frequency)
        })
    }

    /// Fractal 3D noise at `(x, y, z)`.
    pub fn fbm_3d(
        &self,
        x: f64,
        y: f64,
        z: f64,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
    ) -> f64 {
        accumulate(octaves, persistence, lacunarity, |frequency| {
            self.sample_3d(x * frequency, y * frequency, z * frequency)
        })
    }

    /// [`Self::fbm_2d`] with bundled parameters.
    pub fn fbm_2d_with(&self, x: f64, y: f64, params: &FbmParams) -> f64 {
        self.fbm_2d(x, y, params.octaves, params.persistence, params.lacunarity)
    }

    /// [`Self::fbm_3d`] with bundled parameters.
    pub fn fbm_3d_with(&self, x: f64, y: f64, z: f64, params: &FbmParams) -> f64 {
        self.fbm_3d(x, y, z, params.octaves, params.persistence, params.lacunarity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn single_octave_equals_plain_sample() {
        let field = NoiseField::new(42);
        for (x, y) in [(0.3, 0.7), (-2.5, 9.1), (40.0, -3.3)] {
            assert_eq!(field.fbm_2d(x, y, 1, 0.5, 2.0), field.sample_2d(x, y));
        }
        assert_eq!(
            field.fbm_3d(0.3, 0.7, 1.1, 1, 0.5, 2.0),
            field.sample_3d(0.3, 0.7, 1.1)
        );
    }

    #[test]
    fn zero_octaves_is_zero() {
        let field = NoiseField::new(42);
        assert_eq!(field.fbm_2d(1.5, 2.5, 0, 0.5, 2.0), 0.0);
        assert_eq!(field.fbm_3d(1.5, 2.5, 3.5, 0, 0.5, 2.0), 0.0);
    }

    #[test]
    fn recorded_values_for_seed_42() {
        let field = NoiseField::new(42);
        let a = field.fbm_2d(0.3, 0.7, 6, 0.5, 2.0);
        let b = field.fbm_3d(0.3, 0.7, 1.1, 4, 0.5, 2.0);
        assert!((a - 0.375_175_037_953_809_13).abs() < 1e-12, "{a}");
        assert!((b - 0.500_305_132_088_889_4).abs() < 1e-12, "{b}");
    }

    #[test]
    fn params_default_matches_free_form_call() {
        let field = NoiseField::new(5);
        let params = FbmParams::default();
        assert_eq!(
            field.fbm_2d_with(0.9, 0.1, &params),
            field.fbm_2d(0.9, 0.1, 6, 0.5, 2.0)
        );
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let params: FbmParams = serde_json::from_str(r#"{"octaves": 3}"#).unwrap();
        assert_eq!(params.octaves, 3);
        assert_eq!(params.persistence, DEFAULT_PERSISTENCE);
        assert_eq!(params.lacunarity, DEFAULT_LACUNARITY);
    }
}
