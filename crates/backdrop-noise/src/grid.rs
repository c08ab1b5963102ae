//! Batch sampling over a regular 2D grid.
//!
//! Agents that drive many entities from the same field (flow maps, height
//! fields, per-cell drift) can fill a whole buffer in one call. The grid
//! only borrows the field, so several grids may sample one shared
//! [`NoiseField`] at the same time.

use crate::fbm::FbmParams;
use crate::field::NoiseField;

/// A `width x height` lattice of sample points over a borrowed field.
///
/// Cell `(col, row)` samples at `origin + (col, row) * spacing`. Output
/// buffers are row-major.
#[derive(Debug, Clone, Copy)]
pub struct NoiseGrid<'a> {
    /// Field being sampled.
    field: &'a NoiseField,
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// Coordinate of cell `(0, 0)`.
    origin: (f64, f64),
    /// Distance between adjacent cells in field space.
    spacing: f64,
}

impl<'a> NoiseGrid<'a> {
    /// A grid at the origin with unit spacing.
    pub const fn new(field: &'a NoiseField, width: usize, height: usize) -> Self {
        Self {
            field,
            width,
            height,
            origin: (0.0, 0.0),
            spacing: 1.0,
        }
    }

    /// Move cell `(0, 0)` to `(x, y)`.
    #[must_use]
    pub const fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin = (x, y);
        self
    }

    /// Set the distance between adjacent cells.
    #[must_use]
    pub const fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Number of cells in the grid.
    pub const fn len(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Whether the grid has no cells.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field-space coordinate of cell `(col, row)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn coordinate(&self, col: usize, row: usize) -> (f64, f64) {
        // Grid dimensions are far below 2^52, so the casts are exact.
        (
            self.origin.0 + col as f64 * self.spacing,
            self.origin.1 + row as f64 * self.spacing,
        )
    }

    /// Plain 2D samples for every cell.
    pub fn sample_2d(&self) -> Vec<f64> {
        self.collect(|x, y| self.field.sample_2d(x, y))
    }

    /// Fractal 2D samples for every cell.
    pub fn sample_fbm_2d(&self, params: &FbmParams) -> Vec<f64> {
        self.collect(|x, y| self.field.fbm_2d_with(x, y, params))
    }

    /// 3D samples for every cell on the plane `z`.
    ///
    /// Stepping `z` with time animates the grid without seams.
    pub fn sample_3d_slice(&self, z: f64) -> Vec<f64> {
        self.collect(|x, y| self.field.sample_3d(x, y, z))
    }

    fn collect(&self, sample: impl Fn(f64, f64) -> f64) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.len());
        for row in 0..self.height {
            for col in 0..self.width {
                let (x, y) = self.coordinate(col, row);
                out.push(sample(x, y));
            }
        }
        out
    }
}
