//! Deterministic procedural noise for Backdrop visual agents.
//!
//! A [`NoiseField`] is built once from a numeric seed and then sampled by
//! any number of agents per entity per frame. It supplies continuous,
//! pseudo-random motion fields without per-entity random state: the same
//! seed and coordinates always produce the same value.
//!
//! # Modules
//!
//! - [`permutation`] -- Seeded Fisher-Yates permutation table with doubled
//!   and reduced lookup copies.
//! - [`gradient`] -- Constant gradient sets for 2D/3D and 4D.
//! - [`field`] -- The [`NoiseField`] value and its constructors.
//! - [`simplex`] -- Simplex sampling in 2, 3, and 4 dimensions.
//! - [`fbm`] -- Fractal Brownian motion and [`FbmParams`].
//! - [`grid`] -- [`NoiseGrid`] batch sampling into row-major buffers.

pub mod fbm;
pub mod field;
pub mod gradient;
pub mod grid;
pub mod permutation;
pub mod simplex;

// Re-export primary types at crate root.
pub use fbm::FbmParams;
pub use field::NoiseField;
pub use grid::NoiseGrid;
pub use permutation::PermutationTable;
