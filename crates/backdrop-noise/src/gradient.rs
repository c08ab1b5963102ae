//! Constant gradient sets shared by every noise sample.
//!
//! The 2D and 3D samplers share the twelve cube-edge midpoints (2D reads
//! only the first two components). The 4D sampler uses the thirty-two
//! midpoints of the tesseract's edges.

/// Twelve gradients used for 2D and 3D sampling.
pub const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Thirty-two gradients used for 4D sampling.
pub const GRAD4: [[f64; 4]; 32] = [
    [0.0, 1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, -1.0],
    [0.0, 1.0, -1.0, 1.0],
    [0.0, 1.0, -1.0, -1.0],
    [0.0, -1.0, 1.0, 1.0],
    [0.0, -1.0, 1.0, -1.0],
    [0.0, -1.0, -1.0, 1.0],
    [0.0, -1.0, -1.0, -1.0],
    [1.0, 0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0, -1.0],
    [1.0, 0.0, -1.0, 1.0],
    [1.0, 0.0, -1.0, -1.0],
    [-1.0, 0.0, 1.0, 1.0],
    [-1.0, 0.0, 1.0, -1.0],
    [-1.0, 0.0, -1.0, 1.0],
    [-1.0, 0.0, -1.0, -1.0],
    [1.0, 1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, -1.0],
    [1.0, -1.0, 0.0, 1.0],
    [1.0, -1.0, 0.0, -1.0],
    [-1.0, 1.0, 0.0, 1.0],
    [-1.0, 1.0, 0.0, -1.0],
    [-1.0, -1.0, 0.0, 1.0],
    [-1.0, -1.0, 0.0, -1.0],
    [1.0, 1.0, 1.0, 0.0],
    [1.0, 1.0, -1.0, 0.0],
    [1.0, -1.0, 1.0, 0.0],
    [1.0, -1.0, -1.0, 0.0],
    [-1.0, 1.0, 1.0, 0.0],
    [-1.0, 1.0, -1.0, 0.0],
    [-1.0, -1.0, 1.0, 0.0],
    [-1.0, -1.0, -1.0, 0.0],
];

/// Dot product of gradient `index` (modulo 12) with a 2D offset.
#[inline]
pub(crate) fn dot2(index: usize, x: f64, y: f64) -> f64 {
    let [gx, gy, _] = GRAD3.get(index % 12).copied().unwrap_or([0.0; 3]);
    gx * x + gy * y
}

/// Dot product of gradient `index` (modulo 12) with a 3D offset.
#[inline]
pub(crate) fn dot3(index: usize, x: f64, y: f64, z: f64) -> f64 {
    let [gx, gy, gz] = GRAD3.get(index % 12).copied().unwrap_or([0.0; 3]);
    gx * x + gy * y + gz * z
}

/// Dot product of gradient `index` (modulo 32) with a 4D offset.
#[inline]
pub(crate) fn dot4(index: usize, x: f64, y: f64, z: f64, w: f64) -> f64 {
    let [gx, gy, gz, gw] = GRAD4.get(index % 32).copied().unwrap_or([0.0; 4]);
    gx * x + gy * y + gz * z + gw * w
}
