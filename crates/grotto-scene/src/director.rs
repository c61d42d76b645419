//! Scene direction: where the camera and light go and how crystals and
//! pillars are scattered through the cave.

use std::ops::Range;

use glam::{DVec2, DVec3};
use grotto_config::GenerationConfig;
use grotto_mesh::{
    CRYSTAL_MATERIALS, Crystal, Pillar, SceneBuffers, add_hanging_crystal, add_pillar,
    add_standing_crystal,
};
use grotto_terrain::CaveProfile;
use rand::Rng;
use tracing::{debug, info};

use crate::scene::{CameraRecord, LightRecord};
use crate::session::GenerationSession;

const CAMERA_X: f64 = 0.0;
const CAMERA_Z: f64 = -1.5;
const CAMERA_HEIGHT_ABOVE_FLOOR: f64 = 0.25;
const CAMERA_LOOK_FORWARD_DIST: f64 = 2.5;
const CAMERA_LOOK_DOWN_OFFSET: f64 = 0.05;
pub const CAMERA_FOV_DEGREES: f64 = 35.0;

const LIGHT_DIRECTION: DVec3 = DVec3::new(-0.3, -0.8, -0.5);
pub const LIGHT_PARAMS: [f64; 2] = [100.0, 700.0];
pub const LIGHT_INTENSITY: f64 = 1.0;

/// Where along x an object may land, as fractions of the floor size.
#[derive(Clone, Copy, Debug)]
enum Lane {
    /// Either side of the cave, with `inner <= |x| < outer`.
    Side { inner: f64, outer: f64 },
    /// Symmetric about the center line, `|x| < half_width`.
    Center { half_width: f64 },
}

impl Lane {
    fn sample_x<R: Rng + ?Sized>(self, rng: &mut R, size: f64) -> f64 {
        match self {
            Lane::Side { inner, outer } => {
                if rng.random_bool(0.5) {
                    rng.random_range(-outer * size..-inner * size)
                } else {
                    rng.random_range(inner * size..outer * size)
                }
            }
            Lane::Center { half_width } => {
                rng.random_range(-half_width * size..half_width * size)
            }
        }
    }
}

/// One family of crystals: where they grow and how big they get.
#[derive(Clone, Copy, Debug)]
struct CrystalBand {
    lane: Lane,
    z: (f64, f64),
    radius: (f64, f64),
    height: (f64, f64),
    hanging: bool,
}

const SIDE_CRYSTALS: CrystalBand = CrystalBand {
    lane: Lane::Side {
        inner: 0.15,
        outer: 0.45,
    },
    z: (-0.6, 0.7),
    radius: (0.06, 0.18),
    height: (0.5, 1.2),
    hanging: false,
};

const CENTER_CRYSTALS: CrystalBand = CrystalBand {
    lane: Lane::Center { half_width: 0.1 },
    z: (-0.6, 0.7),
    radius: (0.04, 0.12),
    height: (0.3, 0.8),
    hanging: false,
};

const HANGING_CRYSTALS: CrystalBand = CrystalBand {
    lane: Lane::Center { half_width: 0.2 },
    z: (-0.5, 0.9),
    radius: (0.04, 0.12),
    height: (0.4, 0.9),
    hanging: true,
};

/// One family of pillars.
#[derive(Clone, Copy, Debug)]
struct PillarBand {
    lane: Lane,
    radius: (f64, f64),
}

const PILLAR_Z: (f64, f64) = (-0.6, 0.7);

const SIDE_PILLARS: PillarBand = PillarBand {
    lane: Lane::Side {
        inner: 0.25,
        outer: 0.45,
    },
    radius: (0.10, 0.24),
};

const CENTER_PILLARS: PillarBand = PillarBand {
    lane: Lane::Center { half_width: 0.18 },
    radius: (0.08, 0.16),
};

fn range((lo, hi): (f64, f64)) -> Range<f64> {
    lo..hi
}

fn scaled((lo, hi): (f64, f64), size: f64) -> Range<f64> {
    lo * size..hi * size
}

/// How many of each object a run places.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementCounts {
    pub side_crystals: u32,
    pub center_crystals: u32,
    pub hanging_crystals: u32,
    pub side_pillars: u32,
    pub center_pillars: u32,
}

impl PlacementCounts {
    /// Derive every count from the base crystal count.
    pub fn from_crystal_count(num_crystals: u32) -> Self {
        Self {
            side_crystals: num_crystals,
            center_crystals: num_crystals / 2,
            hanging_crystals: num_crystals,
            side_pillars: (num_crystals / 6).max(3),
            center_pillars: (num_crystals / 8).max(1),
        }
    }

    pub fn crystals(&self) -> u32 {
        self.side_crystals + self.center_crystals + self.hanging_crystals
    }

    pub fn pillars(&self) -> u32 {
        self.side_pillars + self.center_pillars
    }
}

/// Append the camera vertex and the camera and light helper points.
///
/// Must run before any geometry so the camera eye is vertex 1.
pub fn place_camera_and_light(session: &mut GenerationSession) -> (CameraRecord, LightRecord) {
    let camera_y = session.profile.floor_height(CAMERA_X, CAMERA_Z) + CAMERA_HEIGHT_ABOVE_FLOOR;
    let buffers = &mut session.buffers;

    let position = buffers.add_vertex(DVec3::new(CAMERA_X, camera_y, CAMERA_Z));
    let look_target = buffers.add_helper_point(DVec3::new(
        CAMERA_X,
        camera_y - CAMERA_LOOK_DOWN_OFFSET,
        CAMERA_Z + CAMERA_LOOK_FORWARD_DIST,
    ));
    let up = buffers.add_helper_point(DVec3::Y);
    let direction = buffers.add_helper_point(LIGHT_DIRECTION);

    let camera = CameraRecord {
        position,
        look_target,
        up,
        fov_degrees: CAMERA_FOV_DEGREES,
    };
    let light = LightRecord {
        direction,
        params: LIGHT_PARAMS,
        intensity: LIGHT_INTENSITY,
    };
    (camera, light)
}

fn place_crystals<R: Rng + ?Sized>(
    buffers: &mut SceneBuffers,
    rng: &mut R,
    profile: &CaveProfile,
    config: &GenerationConfig,
    band: &CrystalBand,
    count: u32,
) {
    let size = config.floor_size;
    for _ in 0..count {
        let x = band.lane.sample_x(rng, size);
        let z = rng.random_range(scaled(band.z, size));
        let base_radius = rng.random_range(range(band.radius));
        let height = rng.random_range(range(band.height));
        let material = CRYSTAL_MATERIALS[rng.random_range(0..CRYSTAL_MATERIALS.len())];

        let crystal = Crystal {
            center: DVec2::new(x, z),
            base_radius,
            height,
            segments: config.crystal_segments,
            material,
        };
        if band.hanging {
            add_hanging_crystal(buffers, rng, profile, &crystal);
        } else {
            add_standing_crystal(buffers, rng, profile, &crystal);
        }
    }
}

fn place_pillars<R: Rng + ?Sized>(
    buffers: &mut SceneBuffers,
    rng: &mut R,
    profile: &CaveProfile,
    config: &GenerationConfig,
    band: &PillarBand,
    count: u32,
) {
    let size = config.floor_size;
    for _ in 0..count {
        let x = band.lane.sample_x(rng, size);
        let z = rng.random_range(scaled(PILLAR_Z, size));
        let base_radius = rng.random_range(range(band.radius));

        let pillar = Pillar {
            center: DVec2::new(x, z),
            base_radius,
            segments: config.pillar_segments,
            slices: config.pillar_slices,
        };
        add_pillar(buffers, rng, profile, &pillar);
    }
}

/// Scatter crystals and pillars, drawing everything from the session RNG.
///
/// Order is fixed: side crystals, center crystals, hanging crystals, side
/// pillars, center pillars. Each object draws its placement then its shape.
pub fn place_crystals_and_pillars(session: &mut GenerationSession, config: &GenerationConfig) {
    let counts = PlacementCounts::from_crystal_count(config.num_crystals);
    let GenerationSession {
        profile,
        rng,
        buffers,
        ..
    } = session;

    place_crystals(buffers, rng, profile, config, &SIDE_CRYSTALS, counts.side_crystals);
    place_crystals(buffers, rng, profile, config, &CENTER_CRYSTALS, counts.center_crystals);
    place_crystals(buffers, rng, profile, config, &HANGING_CRYSTALS, counts.hanging_crystals);
    debug!(crystals = counts.crystals(), "crystals placed");

    place_pillars(buffers, rng, profile, config, &SIDE_PILLARS, counts.side_pillars);
    place_pillars(buffers, rng, profile, config, &CENTER_PILLARS, counts.center_pillars);

    info!(
        crystals = counts.crystals(),
        pillars = counts.pillars(),
        "decorations placed"
    );
}
