//! Simplex sampling in two, three, and four dimensions.
//!
//! Each sampler skews the input into simplex-lattice space, finds the
//! containing cell, orders the corners by rank-comparing the in-cell offset,
//! and sums a radially attenuated gradient contribution from every corner.
//!
//! Output lands roughly in `[-1, 1]`. Small overshoot is possible and
//! callers must tolerate it. Non-finite input is not guarded.
//!
//! The order of floating-point operations is fixed so that every seed and
//! coordinate produces the same bits on every run.

use crate::field::NoiseField;
use crate::gradient::{dot2, dot3, dot4};

/// 2D skew factor, `(sqrt(3) - 1) / 2`.
const F2: f64 = 0.366_025_403_784_438_6;
/// 2D unskew factor, `(3 - sqrt(3)) / 6`.
const G2: f64 = 0.211_324_865_405_187_13;
/// 3D skew factor, `1 / 3`.
const F3: f64 = 1.0 / 3.0;
/// 3D unskew factor, `1 / 6`.
const G3: f64 = 1.0 / 6.0;
/// 4D skew factor, `(sqrt(5) - 1) / 4`.
const F4: f64 = 0.309_016_994_374_947_45;
/// 4D unskew factor, `(5 - sqrt(5)) / 20`.
const G4: f64 = 0.138_196_601_125_010_5;

/// Squared kernel radius for 2D corners.
const RADIUS_SQ_2D: f64 = 0.5;
/// Squared kernel radius for 3D and 4D corners.
const RADIUS_SQ_3D: f64 = 0.6;

/// Output scale for 2D.
const SCALE_2D: f64 = 70.0;
/// Output scale for 3D.
const SCALE_3D: f64 = 32.0;
/// Output scale for 4D.
const SCALE_4D: f64 = 27.0;

/// Wrap a floored lattice coordinate into `[0, 255]`.
///
/// Equivalent to two's-complement `& 255` on the integer cell index.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lattice(cell: f64) -> usize {
    // `cell` is an integral float; the mask keeps the result non-negative.
    ((cell as i64) & 0xFF) as usize
}

/// Corner contribution: `(r^2 - d^2)^4 * dot`, or zero outside the kernel.
#[inline]
fn attenuate(t: f64, dot: impl FnOnce() -> f64) -> f64 {
    if t < 0.0 {
        return 0.0;
    }
    let t = t * t;
    t * t * dot()
}

// Lattice sums are bounded by 255 + 1 + 255, well inside the doubled tables.
#[allow(clippy::arithmetic_side_effects)]
impl NoiseField {
    /// Sample the field at `(x, y)`.
    pub fn sample_2d(&self, x: f64, y: f64) -> f64 {
        let perm = self.permutation();

        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        // Lower triangle (x0 > y0) steps along x first, upper along y.
        let (i1, j1) = if x0 > y0 { (1_u8, 0_u8) } else { (0_u8, 1_u8) };

        let x1 = x0 - f64::from(i1) + G2;
        let y1 = y0 - f64::from(j1) + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = lattice(i);
        let jj = lattice(j);
        let (i1, j1) = (usize::from(i1), usize::from(j1));

        let n0 = attenuate(RADIUS_SQ_2D - x0 * x0 - y0 * y0, || {
            dot2(perm.mod12(ii + perm.perm(jj)), x0, y0)
        });
        let n1 = attenuate(RADIUS_SQ_2D - x1 * x1 - y1 * y1, || {
            dot2(perm.mod12(ii + i1 + perm.perm(jj + j1)), x1, y1)
        });
        let n2 = attenuate(RADIUS_SQ_2D - x2 * x2 - y2 * y2, || {
            dot2(perm.mod12(ii + 1 + perm.perm(jj + 1)), x2, y2)
        });

        SCALE_2D * (n0 + n1 + n2)
    }

    /// Sample the field at `(x, y, z)`.
    pub fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let perm = self.permutation();

        let s = (x + y + z) * F3;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let t = (i + j + k) * G3;
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);

        // Second and third corners of the tetrahedron containing the point.
        let (i1, j1, k1, i2, j2, k2): (u8, u8, u8, u8, u8, u8) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - f64::from(i1) + G3;
        let y1 = y0 - f64::from(j1) + G3;
        let z1 = z0 - f64::from(k1) + G3;
        let x2 = x0 - f64::from(i2) + 2.0 * G3;
        let y2 = y0 - f64::from(j2) + 2.0 * G3;
        let z2 = z0 - f64::from(k2) + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        let ii = lattice(i);
        let jj = lattice(j);
        let kk = lattice(k);
        let hash = |di: u8, dj: u8, dk: u8| {
            let inner = perm.perm(kk + usize::from(dk));
            let mid = perm.perm(jj + usize::from(dj) + inner);
            perm.mod12(ii + usize::from(di) + mid)
        };

        let n0 = attenuate(RADIUS_SQ_3D - x0 * x0 - y0 * y0 - z0 * z0, || {
            dot3(hash(0, 0, 0), x0, y0, z0)
        });
        let n1 = attenuate(RADIUS_SQ_3D - x1 * x1 - y1 * y1 - z1 * z1, || {
            dot3(hash(i1, j1, k1), x1, y1, z1)
        });
        let n2 = attenuate(RADIUS_SQ_3D - x2 * x2 - y2 * y2 - z2 * z2, || {
            dot3(hash(i2, j2, k2), x2, y2, z2)
        });
        let n3 = attenuate(RADIUS_SQ_3D - x3 * x3 - y3 * y3 - z3 * z3, || {
            dot3(hash(1, 1, 1), x3, y3, z3)
        });

        SCALE_3D * (n0 + n1 + n2 + n3)
    }

    /// Sample the field at `(x, y, z, w)`.
    pub fn sample_4d(&self, x: f64, y: f64, z: f64, w: f64) -> f64 {
        let perm = self.permutation();

        let s = (x + y + z + w) * F4;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let l = (w + s).floor();
        let t = (i + j + k + l) * G4;
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);
        let w0 = w - (l - t);

        // Rank each axis by magnitude of its offset with six pairwise
        // comparisons. A rank of 3 means the axis is stepped first.
        let (mut rx, mut ry, mut rz, mut rw) = (0_u8, 0_u8, 0_u8, 0_u8);
        let bump = |a: bool, hi: &mut u8, lo: &mut u8| {
            if a {
                *hi = hi.saturating_add(1);
            } else {
                *lo = lo.saturating_add(1);
            }
        };
        bump(x0 > y0, &mut rx, &mut ry);
        bump(x0 > z0, &mut rx, &mut rz);
        bump(x0 > w0, &mut rx, &mut rw);
        bump(y0 > z0, &mut ry, &mut rz);
        bump(y0 > w0, &mut ry, &mut rw);
        bump(z0 > w0, &mut rz, &mut rw);

        let step = |threshold: u8| {
            [rx, ry, rz, rw].map(|rank| u8::from(rank >= threshold))
        };
        let [i1, j1, k1, l1] = step(3);
        let [i2, j2, k2, l2] = step(2);
        let [i3, j3, k3, l3] = step(1);

        let x1 = x0 - f64::from(i1) + G4;
        let y1 = y0 - f64::from(j1) + G4;
        let z1 = z0 - f64::from(k1) + G4;
        let w1 = w0 - f64::from(l1) + G4;
        let x2 = x0 - f64::from(i2) + 2.0 * G4;
        let y2 = y0 - f64::from(j2) + 2.0 * G4;
        let z2 = z0 - f64::from(k2) + 2.0 * G4;
        let w2 = w0 - f64::from(l2) + 2.0 * G4;
        let x3 = x0 - f64::from(i3) + 3.0 * G4;
        let y3 = y0 - f64::from(j3) + 3.0 * G4;
        let z3 = z0 - f64::from(k3) + 3.0 * G4;
        let w3 = w0 - f64::from(l3) + 3.0 * G4;
        let x4 = x0 - 1.0 + 4.0 * G4;
        let y4 = y0 - 1.0 + 4.0 * G4;
        let z4 = z0 - 1.0 + 4.0 * G4;
        let w4 = w0 - 1.0 + 4.0 * G4;

        let ii = lattice(i);
        let jj = lattice(j);
        let kk = lattice(k);
        let ll = lattice(l);
        let hash = |di: u8, dj: u8, dk: u8, dl: u8| {
            let a = perm.perm(ll + usize::from(dl));
            let b = perm.perm(kk + usize::from(dk) + a);
            let c = perm.perm(jj + usize::from(dj) + b);
            perm.mod32(ii + usize::from(di) + c)
        };

        let n0 = attenuate(RADIUS_SQ_3D - x0 * x0 - y0 * y0 - z0 * z0 - w0 * w0, || {
            dot4(hash(0, 0, 0, 0), x0, y0, z0, w0)
        });
        let n1 = attenuate(RADIUS_SQ_3D - x1 * x1 - y1 * y1 - z1 * z1 - w1 * w1, || {
            dot4(hash(i1, j1, k1, l1), x1, y1, z1, w1)
        });
        let n2 = attenuate(RADIUS_SQ_3D - x2 * x2 - y2 * y2 - z2 * z2 - w2 * w2, || {
            dot4(hash(i2, j2, k2, l2), x2, y2, z2, w2)
        });
        let n3 = attenuate(RADIUS_SQ_3D - x3 * x3 - y3 * y3 - z3 * z3 - w3 * w3, || {
            dot4(hash(i3, j3, k3, l3), x3, y3, z3, w3)
        });
        let n4 = attenuate(RADIUS_SQ_3D - x4 * x4 - y4 * y4 - z4 * z4 - w4 * w4, || {
            dot4(hash(1, 1, 1, 1), x4, y4, z4, w4)
        });

        SCALE_4D * (n0 + n1 + n2 + n3 + n4)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_precision_loss)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < TOLERANCE
    }

    #[test]
    fn skew_constants_match_closed_forms() {
        assert!(close(F2, 0.5 * (3.0_f64.sqrt() - 1.0)));
        assert!(close(G2, (3.0 - 3.0_f64.sqrt()) / 6.0));
        assert!(close(F4, (5.0_f64.sqrt() - 1.0) / 4.0));
        assert!(close(G4, (5.0 - 5.0_f64.sqrt()) / 20.0));
    }

    #[test]
    fn origin_is_zero_for_any_seed() {
        // Only the first corner is within the kernel at the origin and its
        // offset is the zero vector.
        for seed in [0, 1, 42, -9, 1_000_000] {
            let field = NoiseField::new(seed);
            assert!(field.sample_2d(0.0, 0.0).abs() < f64::EPSILON);
            assert!(field.sample_3d(0.0, 0.0, 0.0).abs() < f64::EPSILON);
            assert!(field.sample_4d(0.0, 0.0, 0.0, 0.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn recorded_2d_values_for_seed_42() {
        let field = NoiseField::new(42);
        assert!(close(field.sample_2d(0.5, 0.25), 0.043_886_298_893_085_62));
        assert!(close(field.sample_2d(1.7, -3.2), -0.558_513_417_356_916_1));
        assert!(close(field.sample_2d(123.456, -78.9), 0.163_424_670_849_387_05));
    }

    #[test]
    fn recorded_3d_values_for_seed_42() {
        let field = NoiseField::new(42);
        assert!(close(field.sample_3d(0.1, 0.2, 0.3), 0.578_421_461_333_333_2));
        assert!(close(field.sample_3d(-4.5, 2.25, 7.75), 0.091_475_360_082_305_88));
    }

    #[test]
    fn recorded_4d_values_for_seed_42() {
        let field = NoiseField::new(42);
        assert!(close(field.sample_4d(0.1, 0.2, 0.3, 0.4), -0.162_098_024_109_545_66));
        assert!(close(field.sample_4d(-1.5, 2.5, -3.5, 4.25), 0.501_678_650_954_157_9));
    }

    #[test]
    fn negative_lattice_cells_wrap() {
        assert_eq!(lattice(-1.0), 255);
        assert_eq!(lattice(-256.0), 0);
        assert_eq!(lattice(257.0), 1);
    }

    #[test]
    fn different_seeds_give_different_fields() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differs = (0..64).any(|n| {
            let x = f64::from(n) * 0.37 + 0.11;
            (a.sample_2d(x, x * 0.5) - b.sample_2d(x, x * 0.5)).abs() > 1e-9
        });
        assert!(differs);
    }

    #[test]
    fn integer_lattice_points_are_zero_in_3d() {
        let field = NoiseField::new(7);
        for n in -5..5 {
            let v = f64::from(n);
            assert!(field.sample_3d(v, v, v).abs() < 1e-9, "({v},{v},{v})");
        }
    }
}
