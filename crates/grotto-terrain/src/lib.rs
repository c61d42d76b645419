//! Cave terrain primitives: a seeded Perlin noise field, the analytic floor and
//! gap height functions, and deterministic RNG derivation.

mod noise_field;
mod profile;
mod seed;

pub use noise_field::{NOISE_SEED_OFFSET, NoiseField, PERMUTATION_SIZE, fade};
pub use profile::CaveProfile;
pub use seed::{det_cos, det_sin, det_tan, noise_rng, placement_rng};
