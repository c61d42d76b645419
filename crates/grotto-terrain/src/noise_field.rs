//! Seeded 2D Perlin noise with diagonal gradients.
//!
//! The permutation table is shuffled once at construction and stored at
//! double length so corner hashing never needs a modulo. After construction
//! the field is immutable, so it can be shared across threads freely.

use noise::NoiseFn;
use rand::seq::SliceRandom;

use crate::seed::noise_rng;

/// Number of distinct lattice hashes.
pub const PERMUTATION_SIZE: usize = 256;

/// Added to the user seed before shuffling, to decorrelate the permutation
/// table from the placement RNG seeded with the same value.
pub const NOISE_SEED_OFFSET: u64 = 1337;

/// Quintic fade curve `t³(t(6t − 15) + 10)`.
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of the offset with one of four diagonal gradients.
#[inline]
fn gradient(hash: u8, dx: f64, dz: f64) -> f64 {
    match hash & 3 {
        0 => dx + dz,
        1 => -dx + dz,
        2 => dx - dz,
        _ => -dx - dz,
    }
}

/// A seeded 2D Perlin noise source returning values in `[0, 1]`.
#[derive(Clone)]
pub struct NoiseField {
    seed: u64,
    perm: [u8; PERMUTATION_SIZE * 2],
}

impl NoiseField {
    /// Build the permutation table for `seed`.
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..PERMUTATION_SIZE).map(|i| i as u8).collect();
        table.shuffle(&mut noise_rng(seed));

        let mut perm = [0u8; PERMUTATION_SIZE * 2];
        perm[..PERMUTATION_SIZE].copy_from_slice(&table);
        perm[PERMUTATION_SIZE..].copy_from_slice(&table);

        Self { seed, perm }
    }

    /// Seed the table was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    fn hash(&self, xi: usize, zi: usize) -> u8 {
        self.perm[self.perm[xi] as usize + zi]
    }

    /// Sample the field at `(x, z)`.
    ///
    /// Lattice points sample to exactly `0.5`, since every corner offset there
    /// is zero.
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        let x_floor = x.floor();
        let z_floor = z.floor();

        let xi = (x_floor as i64 & 255) as usize;
        let zi = (z_floor as i64 & 255) as usize;

        let xf = x - x_floor;
        let zf = z - z_floor;

        let u = fade(xf);
        let v = fade(zf);

        let n00 = gradient(self.hash(xi, zi), xf, zf);
        let n01 = gradient(self.hash(xi, zi + 1), xf, zf - 1.0);
        let n10 = gradient(self.hash(xi + 1, zi), xf - 1.0, zf);
        let n11 = gradient(self.hash(xi + 1, zi + 1), xf - 1.0, zf - 1.0);

        let near = lerp(n00, n10, u);
        let far = lerp(n01, n11, u);
        let raw = lerp(near, far, v);

        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Sample centred on zero, in `[-0.5, 0.5]`.
    #[inline]
    pub fn sample_centered(&self, x: f64, z: f64) -> f64 {
        self.sample(x, z) - 0.5
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl NoiseFn<f64, 2> for NoiseField {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample(point[0], point[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutation_is_doubled_shuffle() {
        let field = NoiseField::new(0);
        let (lo, hi) = field.perm.split_at(PERMUTATION_SIZE);
        assert_eq!(lo, hi, "Second half must repeat the first");

        let mut sorted = lo.to_vec();
        sorted.sort_unstable();
        let identity: Vec<u8> = (0..=255u8).collect();
        assert_eq!(sorted, identity, "Table must be a permutation of 0..256");
        assert_ne!(lo, identity.as_slice(), "Table should actually be shuffled");
    }

    #[test]
    fn test_same_seed_same_values() {
        let a = NoiseField::new(99);
        let b = NoiseField::new(99);
        for i in 0..500 {
            let x = i as f64 * 0.173 - 20.0;
            let z = i as f64 * 0.291 + 3.0;
            assert_eq!(a.sample(x, z), b.sample(x, z), "Mismatch at ({x}, {z})");
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differs = (0..200).any(|i| {
            let p = i as f64 * 0.37 + 0.11;
            a.sample(p, -p) != b.sample(p, -p)
        });
        assert!(differs, "Different seeds should produce different fields");
    }

    #[test]
    fn test_values_within_unit_range() {
        let field = NoiseField::new(12345);
        for ix in -100..100 {
            for iz in -100..100 {
                let x = ix as f64 * 0.137;
                let z = iz as f64 * 0.219;
                let value = field.sample(x, z);
                assert!(
                    (0.0..=1.0).contains(&value),
                    "Noise {value} out of range at ({x}, {z})"
                );
            }
        }
    }

    #[test]
    fn test_lattice_points_sample_to_half() {
        let field = NoiseField::new(3);
        for x in -5..5 {
            for z in -5..5 {
                assert_eq!(field.sample(x as f64, z as f64), 0.5);
            }
        }
        // Far outside the table range the lattice still wraps cleanly.
        assert_eq!(field.sample(1024.0, -4096.0), 0.5);
    }

    #[test]
    fn test_field_is_continuous() {
        let field = NoiseField::new(8);
        let step = 1e-4;
        for i in 0..10_000 {
            let x = i as f64 * 0.003 - 15.0;
            let delta = (field.sample(x + step, 0.37) - field.sample(x, 0.37)).abs();
            assert!(delta < 1e-2, "Jump of {delta} at x={x}");
        }
    }

    #[test]
    fn test_fade_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert_eq!(fade(0.5), 0.5);
    }

    #[test]
    fn test_noise_fn_matches_sample() {
        let field = NoiseField::new(21);
        assert_eq!(field.get([1.25, -3.5]), field.sample(1.25, -3.5));
    }

    #[test]
    fn test_shared_across_threads() {
        let field = std::sync::Arc::new(NoiseField::new(5));
        let expected = field.sample(0.3, 0.7);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let field = field.clone();
                std::thread::spawn(move || field.sample(0.3, 0.7))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
