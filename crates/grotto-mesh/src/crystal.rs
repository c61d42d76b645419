//! Tapered crystal meshes: upright ones growing from the floor and inverted
//! ones hanging from the ceiling.

use std::f64::consts::TAU;

use glam::{DVec2, DVec3};
use grotto_terrain::{CaveProfile, det_cos, det_sin, det_tan};
use rand::Rng;

use crate::buffers::{MeshSpan, SceneBuffers, VertexId};

/// Largest lean, in radians, either way from vertical.
pub const CRYSTAL_TILT_MAX_ANGLE: f64 = 0.2;

/// Height of the standing crystal's top ring as a fraction of its full height.
pub const CRYSTAL_TOP_HEIGHT_FRACTION: f64 = 0.7;

/// Radius of the standing crystal's top ring relative to its base.
pub const CRYSTAL_INNER_RADIUS_SCALE: f64 = 0.45;

/// Radius of the hanging crystal's ceiling ring relative to its widest ring.
const HANGING_BASE_RADIUS_SCALE: f64 = 0.4;

/// Depth of the hanging crystal's widest ring as a fraction of its length.
const HANGING_MID_DEPTH_FRACTION: f64 = 0.4;

/// Placement and shape of one crystal instance.
#[derive(Clone, Copy, Debug)]
pub struct Crystal<'a> {
    /// World `(x, z)` of the crystal axis at the floor or ceiling.
    pub center: DVec2,
    pub base_radius: f64,
    pub height: f64,
    /// Ring sides. Must be at least 3.
    pub segments: u32,
    pub material: &'a str,
}

/// Random orientation drawn once per crystal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrystalPose {
    /// Rotation of the rings about the vertical axis.
    pub twist: f64,
    /// Lean from vertical, bounded by [`CRYSTAL_TILT_MAX_ANGLE`].
    pub tilt: f64,
    /// Heading of the lean in the xz plane.
    pub tilt_direction: f64,
}

impl CrystalPose {
    /// Draw twist, tilt and tilt direction, in that order.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let twist = rng.random_range(0.0..TAU);
        let tilt = rng.random_range(-CRYSTAL_TILT_MAX_ANGLE..=CRYSTAL_TILT_MAX_ANGLE);
        let tilt_direction = rng.random_range(0.0..TAU);
        Self {
            twist,
            tilt,
            tilt_direction,
        }
    }

    /// Horizontal offset of the axis after rising (or sinking) `distance`.
    fn lean(&self, distance: f64) -> DVec2 {
        let slope = det_tan(self.tilt);
        DVec2::new(det_cos(self.tilt_direction), det_sin(self.tilt_direction)) * distance * slope
    }

    /// Unit direction of ring vertex `segment` in the xz plane.
    fn spoke(&self, segment: u32, segments: u32) -> DVec2 {
        let angle = TAU * segment as f64 / segments as f64 + self.twist;
        DVec2::new(det_cos(angle), det_sin(angle))
    }
}

#[inline]
fn at(xz: DVec2, y: f64) -> DVec3 {
    DVec3::new(xz.x, y, xz.y)
}

/// Append a crystal standing on the floor.
///
/// Emits `segments` (base, top) vertex pairs then the apex, followed by
/// `2S` side faces, `S - 2` base-fan faces and `S` apex-fan faces.
/// Fewer than 3 segments append nothing and draw nothing.
pub fn add_standing_crystal<R: Rng + ?Sized>(
    buffers: &mut SceneBuffers,
    rng: &mut R,
    profile: &CaveProfile,
    crystal: &Crystal<'_>,
) -> MeshSpan {
    let mark = buffers.mark();
    if crystal.segments < 3 {
        return buffers.span_since(mark);
    }
    let pose = CrystalPose::sample(rng);

    let floor_y = profile.floor_height(crystal.center.x, crystal.center.y);
    let top_rise = CRYSTAL_TOP_HEIGHT_FRACTION * crystal.height;
    let top_center = crystal.center + pose.lean(top_rise);

    let segments = crystal.segments;
    let mut base_ring = Vec::with_capacity(segments as usize);
    let mut top_ring = Vec::with_capacity(segments as usize);
    for s in 0..segments {
        let spoke = pose.spoke(s, segments);
        let base = crystal.center + spoke * crystal.base_radius;
        let top = top_center + spoke * (CRYSTAL_INNER_RADIUS_SCALE * crystal.base_radius);
        base_ring.push(buffers.add_vertex(at(base, floor_y)));
        top_ring.push(buffers.add_vertex(at(top, floor_y + top_rise)));
    }

    let apex_xz = crystal.center + pose.lean(crystal.height);
    let apex = buffers.add_vertex(at(apex_xz, floor_y + crystal.height));

    let material = crystal.material;
    for (s, next) in ring_pairs(segments) {
        buffers.add_face(base_ring[s], base_ring[next], top_ring[next], material);
        buffers.add_face(base_ring[s], top_ring[next], top_ring[s], material);
    }
    for s in 1..segments as usize - 1 {
        buffers.add_face(base_ring[0], base_ring[s], base_ring[s + 1], material);
    }
    for (s, next) in ring_pairs(segments) {
        buffers.add_face(top_ring[s], top_ring[next], apex, material);
    }

    buffers.span_since(mark)
}

/// Append a crystal hanging from the ceiling.
///
/// A narrow ring sits flush with the ceiling, a full-radius ring hangs
/// `0.4·height` below it and the tip at `height` below, all leaning along the
/// drawn tilt. The ceiling fan is wound opposite to the standing crystal's
/// base fan because it faces down. Like the standing crystal, fewer than 3
/// segments append nothing.
pub fn add_hanging_crystal<R: Rng + ?Sized>(
    buffers: &mut SceneBuffers,
    rng: &mut R,
    profile: &CaveProfile,
    crystal: &Crystal<'_>,
) -> MeshSpan {
    let mark = buffers.mark();
    if crystal.segments < 3 {
        return buffers.span_since(mark);
    }
    let pose = CrystalPose::sample(rng);

    let ceiling_y = profile.ceiling_height(crystal.center.x, crystal.center.y);
    let mid_drop = HANGING_MID_DEPTH_FRACTION * crystal.height;
    let mid_center = crystal.center + pose.lean(mid_drop);

    let segments = crystal.segments;
    let mut base_ring: Vec<VertexId> = Vec::with_capacity(segments as usize);
    let mut mid_ring: Vec<VertexId> = Vec::with_capacity(segments as usize);
    for s in 0..segments {
        let spoke = pose.spoke(s, segments);
        let base = crystal.center + spoke * (HANGING_BASE_RADIUS_SCALE * crystal.base_radius);
        let mid = mid_center + spoke * crystal.base_radius;
        base_ring.push(buffers.add_vertex(at(base, ceiling_y)));
        mid_ring.push(buffers.add_vertex(at(mid, ceiling_y - mid_drop)));
    }

    let tip_xz = crystal.center + pose.lean(crystal.height);
    let tip = buffers.add_vertex(at(tip_xz, ceiling_y - crystal.height));

    let material = crystal.material;
    for (s, next) in ring_pairs(segments) {
        buffers.add_face(base_ring[s], mid_ring[next], base_ring[next], material);
        buffers.add_face(base_ring[s], mid_ring[s], mid_ring[next], material);
    }
    for s in 1..segments as usize - 1 {
        buffers.add_face(base_ring[0], base_ring[s + 1], base_ring[s], material);
    }
    for (s, next) in ring_pairs(segments) {
        buffers.add_face(mid_ring[s], tip, mid_ring[next], material);
    }

    buffers.span_since(mark)
}

/// `(i, i + 1 mod n)` for every ring segment.
pub(crate) fn ring_pairs(segments: u32) -> impl Iterator<Item = (usize, usize)> {
    let n = segments as usize;
    (0..n).map(move |i| (i, (i + 1) % n))
}
