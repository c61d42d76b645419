//! Deterministic seeded generation utilities.
//!
//! Every run derives two independent ChaCha8 streams from the user seed: one
//! for the noise permutation shuffle and one for object placement, so that
//! noise shape and placement vary independently. Trigonometry goes through
//! `libm` so output is bit-identical across platforms.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::noise_field::NOISE_SEED_OFFSET;

/// RNG used to shuffle the noise permutation table for `seed`.
pub fn noise_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed.wrapping_add(NOISE_SEED_OFFSET))
}

/// RNG that drives every placement and shape decision for `seed`.
pub fn placement_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Deterministic sine using libm (not platform libc).
#[inline]
pub fn det_sin(x: f64) -> f64 {
    libm::sin(x)
}

/// Deterministic cosine using libm.
#[inline]
pub fn det_cos(x: f64) -> f64 {
    libm::cos(x)
}

/// Deterministic tangent using libm.
#[inline]
pub fn det_tan(x: f64) -> f64 {
    libm::tan(x)
}
