//! One seeded generation run and the validated generator that drives it.

use grotto_config::{Config, GenerationConfig, OutputConfig};
use grotto_mesh::{SceneBuffers, ShellParams, build_cave_shell};
use grotto_terrain::{CaveProfile, NoiseField, placement_rng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::director;
use crate::error::SceneError;
use crate::scene::{CameraRecord, CaveScene, LightRecord};

/// State owned by a single generation run.
///
/// Holds the noise field, the placement RNG and the output buffers. Nothing
/// here is shared between sessions, so runs with different seeds can proceed
/// on different threads.
pub struct GenerationSession {
    pub(crate) profile: CaveProfile,
    pub(crate) noise: NoiseField,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) buffers: SceneBuffers,
}

impl GenerationSession {
    /// Start a session: shuffle the noise table and seed the placement RNG.
    pub fn new(seed: u64, profile: CaveProfile) -> Self {
        Self {
            profile,
            noise: NoiseField::new(seed),
            rng: placement_rng(seed),
            buffers: SceneBuffers::new(),
        }
    }

    pub fn buffers(&self) -> &SceneBuffers {
        &self.buffers
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn profile(&self) -> &CaveProfile {
        &self.profile
    }

    /// Close the session into an immutable scene.
    pub fn finish(self, camera: CameraRecord, light: LightRecord) -> CaveScene {
        CaveScene {
            buffers: self.buffers,
            camera,
            light,
        }
    }
}

/// Check generation parameters before any work is done.
pub fn validate(config: &GenerationConfig, profile: &CaveProfile) -> Result<(), SceneError> {
    if config.floor_res < 1 {
        return Err(SceneError::InvalidResolution(config.floor_res));
    }
    if !(config.floor_size.is_finite() && config.floor_size > 0.0) {
        return Err(SceneError::InvalidFloorSize(config.floor_size));
    }
    if config.crystal_segments < 3 {
        return Err(SceneError::InvalidSegmentCount {
            kind: "crystal",
            count: config.crystal_segments,
        });
    }
    if config.pillar_segments < 3 {
        return Err(SceneError::InvalidSegmentCount {
            kind: "pillar",
            count: config.pillar_segments,
        });
    }
    if config.pillar_slices < 1 {
        return Err(SceneError::InvalidSliceCount(config.pillar_slices));
    }
    if !profile.is_valid() {
        return Err(SceneError::InvalidProfile(profile.min_gap()));
    }
    Ok(())
}

/// Check output settings. Runs before generation as well as before writing.
pub fn validate_output(output: &OutputConfig) -> Result<(), SceneError> {
    if !(output.scale.is_finite() && output.scale > 0.0) {
        return Err(SceneError::InvalidScale(output.scale));
    }
    Ok(())
}

/// Validated generation parameters.
///
/// Construction fails fast on bad input; [`CaveGenerator::generate`] itself
/// cannot fail.
#[derive(Clone, Debug)]
pub struct CaveGenerator {
    config: GenerationConfig,
    profile: CaveProfile,
}

impl CaveGenerator {
    /// Generator with the default cave profile.
    pub fn new(config: &GenerationConfig) -> Result<Self, SceneError> {
        Self::with_profile(config, CaveProfile::default())
    }

    /// Generator for a full configuration, rejecting bad output settings too.
    pub fn for_config(config: &Config) -> Result<Self, SceneError> {
        validate_output(&config.output)?;
        Self::new(&config.generation)
    }

    /// Generator with custom height functions.
    pub fn with_profile(
        config: &GenerationConfig,
        profile: CaveProfile,
    ) -> Result<Self, SceneError> {
        validate(config, &profile)?;
        Ok(Self {
            config: config.clone(),
            profile,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Run one full generation: camera and light, shell, then decorations.
    pub fn generate(&self) -> CaveScene {
        let config = &self.config;
        let mut session = GenerationSession::new(config.seed, self.profile);

        let (camera, light) = director::place_camera_and_light(&mut session);

        let shell_params = ShellParams::new(config.floor_size, config.floor_res);
        build_cave_shell(
            &mut session.buffers,
            &session.noise,
            &session.profile,
            &shell_params,
        );
        debug!(
            vertices = session.buffers.vertex_count(),
            "shell complete"
        );

        director::place_crystals_and_pillars(&mut session, config);

        let scene = session.finish(camera, light);
        info!(
            seed = config.seed,
            vertices = scene.buffers.vertex_count(),
            faces = scene.buffers.face_count(),
            "generated crystal cave"
        );
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grotto_mesh::ROCK_MATERIAL;

    fn config(floor_res: u32, num_crystals: u32) -> GenerationConfig {
        GenerationConfig {
            floor_res,
            num_crystals,
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_zero_resolution() {
        let err = CaveGenerator::new(&config(0, 10)).unwrap_err();
        assert!(matches!(err, SceneError::InvalidResolution(0)));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_rejects_bad_floor_size() {
        for size in [0.0, -4.0, f64::NAN, f64::INFINITY] {
            let cfg = GenerationConfig {
                floor_size: size,
                ..Default::default()
            };
            assert!(matches!(
                CaveGenerator::new(&cfg),
                Err(SceneError::InvalidFloorSize(_))
            ));
        }
    }

    #[test]
    fn test_rejects_small_segment_counts() {
        let cfg = GenerationConfig {
            crystal_segments: 2,
            ..Default::default()
        };
        assert!(matches!(
            CaveGenerator::new(&cfg),
            Err(SceneError::InvalidSegmentCount { kind: "crystal", count: 2 })
        ));

        let cfg = GenerationConfig {
            pillar_segments: 0,
            ..Default::default()
        };
        assert!(matches!(
            CaveGenerator::new(&cfg),
            Err(SceneError::InvalidSegmentCount { kind: "pillar", .. })
        ));

        let cfg = GenerationConfig {
            pillar_slices: 0,
            ..Default::default()
        };
        assert!(matches!(
            CaveGenerator::new(&cfg),
            Err(SceneError::InvalidSliceCount(0))
        ));
    }

    #[test]
    fn test_bad_scale_rejected_before_generation() {
        for scale in [f64::NAN, 0.0, -10.0, f64::INFINITY] {
            let mut full = Config::default();
            full.output.scale = scale;
            let err = CaveGenerator::for_config(&full).unwrap_err();
            assert!(matches!(err, SceneError::InvalidScale(_)), "scale {scale}");
            assert!(err.is_config_error());
        }
        assert!(CaveGenerator::for_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_closing_profile() {
        let profile = CaveProfile {
            gap_base: 0.2,
            ..Default::default()
        };
        let err = CaveGenerator::with_profile(&GenerationConfig::default(), profile).unwrap_err();
        assert!(matches!(err, SceneError::InvalidProfile(_)));
    }

    #[test]
    fn test_minimal_shell_scene() {
        let scene = CaveGenerator::new(&config(1, 0)).unwrap().generate();
        // Camera vertex, 8 shell vertices, then the minimum of 3 side and 1 center pillar.
        let pillar_vertices = 4 * (12 * 11 + 2);
        assert_eq!(scene.buffers.vertex_count(), 1 + 8 + pillar_vertices);

        let pillar_faces = 4 * (12 + 2 * 12 * 10 + 12);
        let rock = scene.buffers.faces_for(ROCK_MATERIAL).unwrap();
        assert_eq!(rock.len(), 12 + pillar_faces);
        assert_eq!(scene.buffers.groups().len(), 1, "No crystals means only rock");
    }

    #[test]
    fn test_every_face_references_existing_vertices() {
        let scene = CaveGenerator::new(&config(12, 24)).unwrap().generate();
        let count = scene.buffers.vertex_count() as u32;
        for group in scene.buffers.groups() {
            for face in &group.faces {
                for v in face.0 {
                    assert!(v.0 >= 1 && v.0 <= count, "Dangling index {v} in {group:?}");
                }
            }
        }
    }

    #[test]
    fn test_concurrent_sessions_do_not_interfere() {
        let cfg_a = GenerationConfig {
            seed: 1,
            ..config(10, 12)
        };
        let cfg_b = GenerationConfig {
            seed: 2,
            ..config(10, 12)
        };
        let expected_a = CaveGenerator::new(&cfg_a).unwrap().generate();
        let expected_b = CaveGenerator::new(&cfg_b).unwrap().generate();

        let handle_a = std::thread::spawn(move || CaveGenerator::new(&cfg_a).unwrap().generate());
        let handle_b = std::thread::spawn(move || CaveGenerator::new(&cfg_b).unwrap().generate());
        let scene_a = handle_a.join().unwrap();
        let scene_b = handle_b.join().unwrap();

        assert_eq!(scene_a.buffers.vertices(), expected_a.buffers.vertices());
        assert_eq!(scene_b.buffers.vertices(), expected_b.buffers.vertices());
        assert_ne!(scene_a.buffers.vertices(), scene_b.buffers.vertices());
    }
}
