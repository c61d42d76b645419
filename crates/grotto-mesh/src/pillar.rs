//! Hourglass rock pillars joining floor and ceiling.

use std::f64::consts::TAU;

use glam::{DVec2, DVec3};
use grotto_terrain::{CaveProfile, det_cos, det_sin};
use rand::Rng;

use crate::ROCK_MATERIAL;
use crate::buffers::{MeshSpan, SceneBuffers, VertexId};
use crate::crystal::ring_pairs;

/// How far below the floor the pillar starts, as a fraction of the local gap.
pub const PILLAR_EXTRA_BOTTOM_DEPTH_FRACTION: f64 = 0.2;

/// Top ring height above the floor, as a fraction of the local gap.
pub const PILLAR_TOP_GAP_FRACTION: f64 = 0.95;

const PILLAR_RADIUS_RANDOM_SCALE_MIN: f64 = 0.9;
const PILLAR_RADIUS_RANDOM_SCALE_MAX: f64 = 1.1;
const PILLAR_ANGLE_JITTER: f64 = 0.1;
const PILLAR_HEIGHT_JITTER_FRACTION: f64 = 0.03;
const PILLAR_BOTTOM_CAP_OFFSET_FRACTION: f64 = 0.01;
const PILLAR_TOP_CAP_OFFSET_FRACTION: f64 = 0.02;

/// Placement and tessellation of one pillar.
#[derive(Clone, Copy, Debug)]
pub struct Pillar {
    pub center: DVec2,
    pub base_radius: f64,
    /// Ring sides. Must be at least 3.
    pub segments: u32,
    /// Ring intervals between bottom and top. Must be at least 1.
    pub slices: u32,
}

/// Radius multiplier at height fraction `t`: `1.5` at both ends, `0.5` at the waist.
pub fn hourglass_factor(t: f64) -> f64 {
    1.0 - 0.5 * det_cos(TAU * (t - 0.5))
}

/// Append a pillar spanning from just below the floor to just under the ceiling.
///
/// Rings are emitted bottom to top, then the bottom and top cap centers.
/// Every ring draws its own radius scale and every ring vertex draws its own
/// angular and vertical jitter. Faces: bottom fan, side bands, top fan.
///
/// Fewer than 3 segments or zero slices append nothing and draw nothing.
pub fn add_pillar<R: Rng + ?Sized>(
    buffers: &mut SceneBuffers,
    rng: &mut R,
    profile: &CaveProfile,
    pillar: &Pillar,
) -> MeshSpan {
    let mark = buffers.mark();
    if pillar.segments < 3 || pillar.slices < 1 {
        return buffers.span_since(mark);
    }

    let (cx, cz) = (pillar.center.x, pillar.center.y);
    let floor_y = profile.floor_height(cx, cz);
    let gap = profile.cave_gap(cx, cz);

    let bottom_y = floor_y - PILLAR_EXTRA_BOTTOM_DEPTH_FRACTION * gap;
    let top_y = floor_y + PILLAR_TOP_GAP_FRACTION * gap;
    let height = top_y - bottom_y;
    let jitter = PILLAR_HEIGHT_JITTER_FRACTION * height;

    let segments = pillar.segments;
    let mut rings: Vec<Vec<VertexId>> = Vec::with_capacity(pillar.slices as usize + 1);
    for slice in 0..=pillar.slices {
        let t = slice as f64 / pillar.slices as f64;
        let ring_y = bottom_y + t * height;
        let radius = pillar.base_radius
            * hourglass_factor(t)
            * rng.random_range(PILLAR_RADIUS_RANDOM_SCALE_MIN..PILLAR_RADIUS_RANDOM_SCALE_MAX);

        let ring = (0..segments)
            .map(|s| {
                let angle = TAU * s as f64 / segments as f64
                    + rng.random_range(-PILLAR_ANGLE_JITTER..PILLAR_ANGLE_JITTER);
                let y = ring_y + rng.random_range(-jitter..jitter);
                buffers.add_vertex(DVec3::new(
                    cx + radius * det_cos(angle),
                    y,
                    cz + radius * det_sin(angle),
                ))
            })
            .collect();
        rings.push(ring);
    }

    let bottom_cap = buffers.add_vertex(DVec3::new(
        cx,
        bottom_y - PILLAR_BOTTOM_CAP_OFFSET_FRACTION * gap,
        cz,
    ));
    let top_cap = buffers.add_vertex(DVec3::new(
        cx,
        top_y + PILLAR_TOP_CAP_OFFSET_FRACTION * gap,
        cz,
    ));

    let bottom_ring = &rings[0];
    for (s, next) in ring_pairs(segments) {
        buffers.add_face(bottom_cap, bottom_ring[next], bottom_ring[s], ROCK_MATERIAL);
    }

    for pair in rings.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        for (s, next) in ring_pairs(segments) {
            buffers.add_face(lower[s], lower[next], upper[next], ROCK_MATERIAL);
            buffers.add_face(lower[s], upper[next], upper[s], ROCK_MATERIAL);
        }
    }

    let top_ring = &rings[rings.len() - 1];
    for (s, next) in ring_pairs(segments) {
        buffers.add_face(top_ring[s], top_ring[next], top_cap, ROCK_MATERIAL);
    }

    buffers.span_since(mark)
}
