//! Analytic floor and ceiling-gap height functions.
//!
//! Both are sums of sine waves over world `(x, z)`; neither touches the RNG,
//! so every generator that asks for the floor at a point gets the same answer.

use crate::seed::det_sin;

/// Constants of the floor and gap wave functions.
///
/// ```text
/// floor(x, z) = floor_base + a1·sin(f1·x)·sin(f1·z) + a2·sin(g1·x + g2·z)
/// gap(x, z)   = gap_base   + b1·sin(h1·x + h2·z)    + b2·sin(k1·x + k2·z)
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaveProfile {
    /// Mean floor height.
    pub floor_base: f64,
    /// Amplitude of the egg-crate floor wave.
    pub floor_wave_one_amplitude: f64,
    /// Frequency of the egg-crate floor wave on both axes.
    pub floor_wave_one_frequency: f64,
    /// Amplitude of the diagonal floor wave.
    pub floor_wave_two_amplitude: f64,
    pub floor_wave_two_x_frequency: f64,
    pub floor_wave_two_z_frequency: f64,
    /// Mean distance between floor and ceiling.
    pub gap_base: f64,
    pub gap_wave_one_amplitude: f64,
    pub gap_wave_one_x_frequency: f64,
    pub gap_wave_one_z_frequency: f64,
    pub gap_wave_two_amplitude: f64,
    pub gap_wave_two_x_frequency: f64,
    pub gap_wave_two_z_frequency: f64,
}

impl Default for CaveProfile {
    fn default() -> Self {
        Self {
            floor_base: -0.8,
            floor_wave_one_amplitude: 0.2,
            floor_wave_one_frequency: 1.5,
            floor_wave_two_amplitude: 0.1,
            floor_wave_two_x_frequency: 0.7,
            floor_wave_two_z_frequency: 2.1,
            gap_base: 1.6,
            gap_wave_one_amplitude: 0.25,
            gap_wave_one_x_frequency: 0.8,
            gap_wave_one_z_frequency: 1.3,
            gap_wave_two_amplitude: 0.15,
            gap_wave_two_x_frequency: 1.7,
            gap_wave_two_z_frequency: -0.5,
        }
    }
}

impl CaveProfile {
    /// Floor height at world `(x, z)`.
    pub fn floor_height(&self, x: f64, z: f64) -> f64 {
        let egg_crate = self.floor_wave_one_amplitude
            * det_sin(self.floor_wave_one_frequency * x)
            * det_sin(self.floor_wave_one_frequency * z);
        let diagonal = self.floor_wave_two_amplitude
            * det_sin(self.floor_wave_two_x_frequency * x + self.floor_wave_two_z_frequency * z);
        self.floor_base + egg_crate + diagonal
    }

    /// Vertical distance from floor to ceiling at world `(x, z)`.
    pub fn cave_gap(&self, x: f64, z: f64) -> f64 {
        let wave_one = self.gap_wave_one_amplitude
            * det_sin(self.gap_wave_one_x_frequency * x + self.gap_wave_one_z_frequency * z);
        let wave_two = self.gap_wave_two_amplitude
            * det_sin(self.gap_wave_two_x_frequency * x + self.gap_wave_two_z_frequency * z);
        self.gap_base + wave_one + wave_two
    }

    /// Ceiling height (floor plus gap) at world `(x, z)`.
    pub fn ceiling_height(&self, x: f64, z: f64) -> f64 {
        self.floor_height(x, z) + self.cave_gap(x, z)
    }

    /// Lower bound of [`Self::cave_gap`] over the whole plane.
    ///
    /// The floor and ceiling surfaces cannot cross when this is positive.
    pub fn min_gap(&self) -> f64 {
        self.gap_base - self.gap_wave_one_amplitude.abs() - self.gap_wave_two_amplitude.abs()
    }

    /// `true` when every field is finite and the gap can never close.
    pub fn is_valid(&self) -> bool {
        let fields = [
            self.floor_base,
            self.floor_wave_one_amplitude,
            self.floor_wave_one_frequency,
            self.floor_wave_two_amplitude,
            self.floor_wave_two_x_frequency,
            self.floor_wave_two_z_frequency,
            self.gap_base,
            self.gap_wave_one_amplitude,
            self.gap_wave_one_x_frequency,
            self.gap_wave_one_z_frequency,
            self.gap_wave_two_amplitude,
            self.gap_wave_two_x_frequency,
            self.gap_wave_two_z_frequency,
        ];
        fields.iter().all(|v| v.is_finite()) && self.min_gap() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_positive_on_dense_grid() {
        let profile = CaveProfile::default();
        // Covers the largest shell the defaults produce (size 10, z stretched 1.5x) with margin.
        for ix in 0..=400 {
            for iz in 0..=400 {
                let x = -10.0 + ix as f64 * 0.05;
                let z = -10.0 + iz as f64 * 0.05;
                let gap = profile.cave_gap(x, z);
                assert!(gap > 0.0, "Gap {gap} not positive at ({x}, {z})");
                assert!(gap >= profile.min_gap() - 1e-12);
            }
        }
    }

    #[test]
    fn test_default_min_gap() {
        let profile = CaveProfile::default();
        assert!((profile.min_gap() - 1.2).abs() < 1e-12);
        assert!(profile.is_valid());
    }

    #[test]
    fn test_heights_are_pure() {
        let profile = CaveProfile::default();
        let first = (profile.floor_height(1.3, -2.7), profile.cave_gap(1.3, -2.7));
        for _ in 0..10 {
            assert_eq!(
                (profile.floor_height(1.3, -2.7), profile.cave_gap(1.3, -2.7)),
                first
            );
        }
    }

    #[test]
    fn test_floor_at_origin_is_base() {
        let profile = CaveProfile::default();
        assert_eq!(profile.floor_height(0.0, 0.0), profile.floor_base);
        assert_eq!(profile.cave_gap(0.0, 0.0), profile.gap_base);
        assert_eq!(profile.ceiling_height(0.0, 0.0), profile.floor_base + profile.gap_base);
    }

    #[test]
    fn test_floor_stays_within_amplitude_band() {
        let profile = CaveProfile::default();
        let band = profile.floor_wave_one_amplitude + profile.floor_wave_two_amplitude;
        for i in 0..2000 {
            let x = i as f64 * 0.011 - 11.0;
            let z = i as f64 * -0.007 + 4.0;
            let offset = profile.floor_height(x, z) - profile.floor_base;
            assert!(offset.abs() <= band + 1e-12);
        }
    }

    #[test]
    fn test_closing_gap_is_invalid() {
        let profile = CaveProfile {
            gap_base: 0.3,
            ..Default::default()
        };
        assert!(profile.min_gap() <= 0.0);
        assert!(!profile.is_valid());

        let nan_profile = CaveProfile {
            floor_base: f64::NAN,
            ..Default::default()
        };
        assert!(!nan_profile.is_valid());
    }
}
