//! Seeded permutation table for lattice hashing.
//!
//! The table is a bijection on `[0, 255]` produced by a Fisher-Yates
//! shuffle driven by a Park-Miller "minimal standard" generator
//! (multiplier 16807, modulus `2^31 - 1`). It is doubled to 512 entries so
//! that `perm[i + perm[j]]` never needs an explicit wrap, and two reduced
//! copies (`mod 12`, `mod 32`) are kept for gradient selection.
//!
//! # Determinism
//!
//! The same seed always produces a byte-identical table. Seeds are folded
//! with `rem_euclid(2^31 - 1)`, so negative seeds and seeds above the
//! modulus are accepted. Seeds congruent to zero leave the generator stuck
//! at zero; the shuffle then swaps every entry with slot 0, which is still
//! a valid permutation.

/// Modulus of the Park-Miller generator (`2^31 - 1`).
pub const LCG_MODULUS: i64 = 2_147_483_647;

/// Multiplier of the Park-Miller generator.
pub const LCG_MULTIPLIER: u64 = 16_807;

/// Number of distinct entries in the base permutation.
pub const TABLE_SIZE: usize = 256;

/// Length of the doubled lookup tables.
pub const DOUBLED_SIZE: usize = 512;

/// Wraps any index into the doubled tables.
const INDEX_MASK: usize = DOUBLED_SIZE - 1;

/// A seeded permutation of `[0, 255]` plus its derived lookup tables.
///
/// Built once and never mutated afterward, so a shared reference may be
/// read from any number of threads.
#[derive(Clone, PartialEq, Eq)]
pub struct PermutationTable {
    /// The 256-entry base permutation.
    base: [u8; TABLE_SIZE],
    /// Base permutation repeated twice.
    perm: [u8; DOUBLED_SIZE],
    /// `perm[i] % 12`, indexes the 12-entry gradient set.
    perm_mod12: [u8; DOUBLED_SIZE],
    /// `perm[i] % 32`, indexes the 32-entry 4D gradient set.
    perm_mod32: [u8; DOUBLED_SIZE],
}

impl PermutationTable {
    /// Build the table for `seed`. Never fails.
    pub fn new(seed: i64) -> Self {
        let mut base = [0_u8; TABLE_SIZE];
        for (slot, value) in base.iter_mut().zip(0_u8..=u8::MAX) {
            *slot = value;
        }

        // rem_euclid keeps the state in [0, 2^31 - 1), so the conversion
        // cannot fail and the product below stays under 2^46.
        let mut state = u64::try_from(seed.rem_euclid(LCG_MODULUS)).unwrap_or(0);
        let modulus = u64::try_from(LCG_MODULUS).unwrap_or(u64::MAX);

        for i in (1..TABLE_SIZE).rev() {
            state = state
                .wrapping_mul(LCG_MULTIPLIER)
                .checked_rem(modulus)
                .unwrap_or(0);
            let bound = u64::try_from(i).unwrap_or(0).saturating_add(1);
            let j = usize::try_from(state.checked_rem(bound).unwrap_or(0)).unwrap_or(0);
            base.swap(i, j);
        }

        let mut perm = [0_u8; DOUBLED_SIZE];
        let mut perm_mod12 = [0_u8; DOUBLED_SIZE];
        let mut perm_mod32 = [0_u8; DOUBLED_SIZE];
        for (i, ((p, m12), m32)) in perm
            .iter_mut()
            .zip(perm_mod12.iter_mut())
            .zip(perm_mod32.iter_mut())
            .enumerate()
        {
            let value = base.get(i & 0xFF).copied().unwrap_or(0);
            *p = value;
            *m12 = value % 12;
            *m32 = value % 32;
        }

        Self {
            base,
            perm,
            perm_mod12,
            perm_mod32,
        }
    }

    /// The 256-entry base permutation.
    pub const fn base(&self) -> &[u8; TABLE_SIZE] {
        &self.base
    }

    /// Entry `index` of the doubled table.
    ///
    /// Callers in the sampling path keep `index < 512`; larger values are
    /// wrapped rather than rejected.
    #[inline]
    pub fn perm(&self, index: usize) -> usize {
        usize::from(self.perm.get(index & INDEX_MASK).copied().unwrap_or(0))
    }

    /// Entry `index` of the doubled table reduced modulo 12.
    #[inline]
    pub fn mod12(&self, index: usize) -> usize {
        usize::from(
            self.perm_mod12
                .get(index & INDEX_MASK)
                .copied()
                .unwrap_or(0),
        )
    }

    /// Entry `index` of the doubled table reduced modulo 32.
    #[inline]
    pub fn mod32(&self, index: usize) -> usize {
        usize::from(
            self.perm_mod32
                .get(index & INDEX_MASK)
                .copied()
                .unwrap_or(0),
        )
    }
}

impl std::fmt::Debug for PermutationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermutationTable")
            .field("head", &self.base.get(..8))
            .finish_non_exhaustive()
    }
}
