//! Cave shell: a noisy floor grid, a parallel ceiling grid and the four walls
//! stitching their boundary rings together.
//!
//! Noise amplitude grows towards the walls, so the interior stays walkable
//! while the edges bulge in and out. Every shell triangle is wound so that its
//! right-hand normal points out of the cave volume.

use glam::DVec3;
use grotto_terrain::CaveProfile;
use noise::NoiseFn;
use tracing::debug;

use crate::buffers::{SceneBuffers, VertexId};
use crate::ROCK_MATERIAL;

/// How much longer the tunnel is along z than along x.
pub const TUNNEL_Z_STRETCH: f64 = 1.5;

/// Width (in unit-grid space) of the band near each wall where noise ramps up.
pub const EDGE_FALLOFF_DIST: f64 = 0.35;

const FLOOR_NOISE_BASE_STRENGTH: f64 = 0.12;
const FLOOR_NOISE_EDGE_EXTRA_STRENGTH: f64 = 0.22;
const CEILING_NOISE_BASE_STRENGTH: f64 = 0.10;
const CEILING_NOISE_EDGE_EXTRA_STRENGTH: f64 = 0.18;
const PLANAR_NOISE_BASE_STRENGTH: f64 = 0.05;
const PLANAR_NOISE_EDGE_EXTRA_STRENGTH: f64 = 0.25;

/// Grid layout of the shell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShellParams {
    /// World extent along x. Must be positive.
    pub floor_size: f64,
    /// Cells per side. Must be at least 1.
    pub floor_res: u32,
    /// Multiplier applied to the z extent only.
    pub z_stretch: f64,
}

impl ShellParams {
    pub fn new(floor_size: f64, floor_res: u32) -> Self {
        Self {
            floor_size,
            floor_res,
            z_stretch: TUNNEL_Z_STRETCH,
        }
    }

    /// Vertices the shell appends: one floor and one ceiling vertex per grid point.
    pub fn vertex_count(&self) -> usize {
        let side = self.floor_res as usize + 1;
        2 * side * side
    }

    /// Faces the shell appends: two per cell on floor and ceiling, two per
    /// boundary cell on each of the four walls.
    pub fn face_count(&self) -> usize {
        let res = self.floor_res as usize;
        4 * res * res + 8 * res
    }
}

/// `0` in the interior, ramping to `1` on the grid boundary.
///
/// Takes unit-grid coordinates in `[0, 1]`.
pub fn edge_proximity_factor(unit_x: f64, unit_z: f64) -> f64 {
    let to_side = unit_x.min(1.0 - unit_x);
    let to_end = unit_z.min(1.0 - unit_z);
    let nearest = to_side.min(to_end);
    ((EDGE_FALLOFF_DIST - nearest) / EDGE_FALLOFF_DIST).clamp(0.0, 1.0)
}

#[inline]
fn centered<N: NoiseFn<f64, 2>>(noise: &N, x: f64, z: f64) -> f64 {
    noise.get([x, z]) - 0.5
}

/// Vertex indices of the two shell grids, addressed by `(grid_x, grid_z)`.
#[derive(Clone, Debug)]
pub struct CaveShell {
    side: usize,
    floor: Vec<VertexId>,
    ceiling: Vec<VertexId>,
}

impl CaveShell {
    /// Grid points per side (`floor_res + 1`).
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn floor_at(&self, grid_x: usize, grid_z: usize) -> VertexId {
        self.floor[grid_x * self.side + grid_z]
    }

    pub fn ceiling_at(&self, grid_x: usize, grid_z: usize) -> VertexId {
        self.ceiling[grid_x * self.side + grid_z]
    }
}

/// Sample one grid point and append its floor and ceiling vertices.
fn push_grid_point<N: NoiseFn<f64, 2>>(
    buffers: &mut SceneBuffers,
    noise: &N,
    profile: &CaveProfile,
    params: &ShellParams,
    unit_x: f64,
    unit_z: f64,
) -> (VertexId, VertexId) {
    let world_x = (unit_x - 0.5) * params.floor_size;
    let world_z = (unit_z - 0.5) * params.floor_size * params.z_stretch;

    let gap = profile.cave_gap(world_x, world_z);
    let edge = edge_proximity_factor(unit_x, unit_z);

    let floor_noise = 0.7 * centered(noise, world_x * 1.3, world_z * 1.3)
        + 0.3 * centered(noise, world_x * 3.1 + 7.3, world_z * 3.1 - 1.1);
    let ceiling_noise = 0.7 * centered(noise, world_x * 1.7 + 10.0, world_z * 1.7 - 4.0)
        + 0.3 * centered(noise, world_x * 3.7 - 2.0, world_z * 3.7 + 8.0);

    let floor_strength = FLOOR_NOISE_BASE_STRENGTH + FLOOR_NOISE_EDGE_EXTRA_STRENGTH * edge;
    let ceiling_strength = CEILING_NOISE_BASE_STRENGTH + CEILING_NOISE_EDGE_EXTRA_STRENGTH * edge;

    let floor_y = profile.floor_height(world_x, world_z) + floor_strength * floor_noise;
    let ceiling_y = floor_y + gap + ceiling_strength * ceiling_noise;

    let shift_x = 0.6 * centered(noise, world_x * 0.7 + 20.0, world_z * 0.7 - 10.0)
        + 0.4 * centered(noise, world_x * 1.9 + 3.0, world_z * 1.9 + 11.0);
    let shift_z = 0.6 * centered(noise, world_x * 0.7 - 40.0, world_z * 0.7 + 5.0)
        + 0.4 * centered(noise, world_x * 1.9 - 6.0, world_z * 1.9 - 9.0);
    let planar_strength = PLANAR_NOISE_BASE_STRENGTH + PLANAR_NOISE_EDGE_EXTRA_STRENGTH * edge;

    let x = world_x + planar_strength * shift_x;
    let z = world_z + planar_strength * shift_z;

    let floor = buffers.add_vertex(DVec3::new(x, floor_y, z));
    let ceiling = buffers.add_vertex(DVec3::new(x, ceiling_y, z));
    (floor, ceiling)
}

/// Build the cave shell into `buffers`.
///
/// Grid points are visited x-major; each appends its floor vertex then its
/// ceiling vertex. Faces follow in this order: floor, ceiling, the min-x and
/// max-x walls (interleaved per z cell), then the min-z and max-z walls
/// (interleaved per x cell). All faces use [`ROCK_MATERIAL`].
pub fn build_cave_shell<N: NoiseFn<f64, 2>>(
    buffers: &mut SceneBuffers,
    noise: &N,
    profile: &CaveProfile,
    params: &ShellParams,
) -> CaveShell {
    debug_assert!(params.floor_res >= 1, "shell needs at least one cell");

    let res = params.floor_res as usize;
    let side = res + 1;
    let mut floor = Vec::with_capacity(side * side);
    let mut ceiling = Vec::with_capacity(side * side);

    for grid_x in 0..side {
        for grid_z in 0..side {
            let unit_x = grid_x as f64 / res as f64;
            let unit_z = grid_z as f64 / res as f64;
            let (f, c) = push_grid_point(buffers, noise, profile, params, unit_x, unit_z);
            floor.push(f);
            ceiling.push(c);
        }
    }

    let shell = CaveShell {
        side,
        floor,
        ceiling,
    };

    for gx in 0..res {
        for gz in 0..res {
            let bl = shell.floor_at(gx, gz);
            let br = shell.floor_at(gx + 1, gz);
            let tl = shell.floor_at(gx, gz + 1);
            let tr = shell.floor_at(gx + 1, gz + 1);
            buffers.add_face(bl, br, tr, ROCK_MATERIAL);
            buffers.add_face(bl, tr, tl, ROCK_MATERIAL);
        }
    }

    // Diagonal split mirrored relative to the floor.
    for gx in 0..res {
        for gz in 0..res {
            let bl = shell.ceiling_at(gx, gz);
            let br = shell.ceiling_at(gx + 1, gz);
            let tl = shell.ceiling_at(gx, gz + 1);
            let tr = shell.ceiling_at(gx + 1, gz + 1);
            buffers.add_face(bl, tr, br, ROCK_MATERIAL);
            buffers.add_face(bl, tl, tr, ROCK_MATERIAL);
        }
    }

    for gz in 0..res {
        let (fb, ft) = (shell.floor_at(0, gz), shell.floor_at(0, gz + 1));
        let (cb, ct) = (shell.ceiling_at(0, gz), shell.ceiling_at(0, gz + 1));
        buffers.add_face(fb, ft, ct, ROCK_MATERIAL);
        buffers.add_face(fb, ct, cb, ROCK_MATERIAL);

        let (fb, ft) = (shell.floor_at(res, gz), shell.floor_at(res, gz + 1));
        let (cb, ct) = (shell.ceiling_at(res, gz), shell.ceiling_at(res, gz + 1));
        buffers.add_face(fb, ct, ft, ROCK_MATERIAL);
        buffers.add_face(fb, cb, ct, ROCK_MATERIAL);
    }

    for gx in 0..res {
        let (fl, fr) = (shell.floor_at(gx, 0), shell.floor_at(gx + 1, 0));
        let (cl, cr) = (shell.ceiling_at(gx, 0), shell.ceiling_at(gx + 1, 0));
        buffers.add_face(fl, cr, fr, ROCK_MATERIAL);
        buffers.add_face(fl, cl, cr, ROCK_MATERIAL);

        let (fl, fr) = (shell.floor_at(gx, res), shell.floor_at(gx + 1, res));
        let (cl, cr) = (shell.ceiling_at(gx, res), shell.ceiling_at(gx + 1, res));
        buffers.add_face(fl, fr, cr, ROCK_MATERIAL);
        buffers.add_face(fl, cr, cl, ROCK_MATERIAL);
    }

    debug!(
        res,
        vertices = 2 * side * side,
        faces = params.face_count(),
        "built cave shell"
    );
    shell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffers::Face;
    use grotto_terrain::NoiseField;

    /// Constant noise source: every sample is `0.5`, so no perturbation is applied.
    struct FlatNoise;

    impl NoiseFn<f64, 2> for FlatNoise {
        fn get(&self, _point: [f64; 2]) -> f64 {
            0.5
        }
    }

    fn normal(buffers: &SceneBuffers, face: &Face) -> DVec3 {
        let [a, b, c] = face.0.map(|id| buffers.vertex(id).unwrap());
        (b - a).cross(c - a)
    }

    fn build(res: u32, size: f64) -> (SceneBuffers, CaveShell) {
        let mut buffers = SceneBuffers::new();
        let noise = NoiseField::new(0);
        let shell = build_cave_shell(
            &mut buffers,
            &noise,
            &CaveProfile::default(),
            &ShellParams::new(size, res),
        );
        (buffers, shell)
    }

    #[test]
    fn test_minimal_grid_counts() {
        let (buffers, shell) = build(1, 4.0);
        assert_eq!(shell.side(), 2);
        assert_eq!(buffers.vertex_count(), 8);
        assert_eq!(buffers.faces_for(ROCK_MATERIAL).unwrap().len(), 12);
    }

    #[test]
    fn test_counts_match_params() {
        for res in [1, 2, 5, 17] {
            let params = ShellParams::new(4.0, res);
            let (buffers, _) = build(res, 4.0);
            assert_eq!(buffers.vertex_count(), params.vertex_count());
            assert_eq!(buffers.face_count(), params.face_count());
        }
        assert_eq!(ShellParams::new(10.0, 80).vertex_count(), 13_122);
    }

    #[test]
    fn test_floor_and_ceiling_interleave() {
        let (_, shell) = build(3, 4.0);
        assert_eq!(shell.floor_at(0, 0), VertexId(1));
        assert_eq!(shell.ceiling_at(0, 0), VertexId(2));
        assert_eq!(shell.floor_at(0, 1), VertexId(3));
        assert_eq!(shell.floor_at(1, 0), VertexId(9));
    }

    #[test]
    fn test_ceiling_shares_planar_offset() {
        let (buffers, shell) = build(6, 4.0);
        for gx in 0..shell.side() {
            for gz in 0..shell.side() {
                let f = buffers.vertex(shell.floor_at(gx, gz)).unwrap();
                let c = buffers.vertex(shell.ceiling_at(gx, gz)).unwrap();
                assert_eq!((f.x, f.z), (c.x, c.z));
                assert!(c.y > f.y, "Ceiling below floor at ({gx}, {gz})");
            }
        }
    }

    #[test]
    fn test_flat_noise_reproduces_height_functions() {
        let mut buffers = SceneBuffers::new();
        let profile = CaveProfile::default();
        let params = ShellParams::new(4.0, 4);
        let shell = build_cave_shell(&mut buffers, &FlatNoise, &profile, &params);

        let corner = buffers.vertex(shell.floor_at(0, 0)).unwrap();
        assert_eq!(corner.x, -2.0);
        assert_eq!(corner.z, -3.0);
        assert_eq!(corner.y, profile.floor_height(-2.0, -3.0));

        let far = buffers.vertex(shell.ceiling_at(4, 4)).unwrap();
        assert_eq!((far.x, far.z), (2.0, 3.0));
        assert!((far.y - profile.ceiling_height(2.0, 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_every_face_points_out_of_the_cave() {
        let res = 4usize;
        let (buffers, _) = build(res as u32, 4.0);
        let faces = buffers.faces_for(ROCK_MATERIAL).unwrap();
        let cells = res * res;

        for face in &faces[..2 * cells] {
            assert!(normal(&buffers, face).y < 0.0, "Floor face points up: {face:?}");
        }
        for face in &faces[2 * cells..4 * cells] {
            assert!(normal(&buffers, face).y > 0.0, "Ceiling face points down: {face:?}");
        }

        let x_walls = &faces[4 * cells..4 * cells + 4 * res];
        for quad in x_walls.chunks(4) {
            assert!(normal(&buffers, &quad[0]).x < 0.0);
            assert!(normal(&buffers, &quad[1]).x < 0.0);
            assert!(normal(&buffers, &quad[2]).x > 0.0);
            assert!(normal(&buffers, &quad[3]).x > 0.0);
        }

        let z_walls = &faces[4 * cells + 4 * res..];
        assert_eq!(z_walls.len(), 4 * res);
        for quad in z_walls.chunks(4) {
            assert!(normal(&buffers, &quad[0]).z < 0.0);
            assert!(normal(&buffers, &quad[1]).z < 0.0);
            assert!(normal(&buffers, &quad[2]).z > 0.0);
            assert!(normal(&buffers, &quad[3]).z > 0.0);
        }
    }

    #[test]
    fn test_walls_never_wrap_around() {
        let res = 3;
        let (buffers, shell) = build(res as u32, 4.0);
        let faces = buffers.faces_for(ROCK_MATERIAL).unwrap();
        let left_wall: Vec<VertexId> = (0..=res)
            .flat_map(|gz| [shell.floor_at(0, gz), shell.ceiling_at(0, gz)])
            .collect();
        let right_wall: Vec<VertexId> = (0..=res)
            .flat_map(|gz| [shell.floor_at(res, gz), shell.ceiling_at(res, gz)])
            .collect();
        for face in faces {
            let touches_left = face.0.iter().any(|v| left_wall.contains(v));
            let touches_right = face.0.iter().any(|v| right_wall.contains(v));
            assert!(
                !(touches_left && touches_right),
                "Face {face:?} connects opposite walls"
            );
        }
    }

    #[test]
    fn test_edge_factor_bounds() {
        assert_eq!(edge_proximity_factor(0.5, 0.5), 0.0);
        assert_eq!(edge_proximity_factor(0.0, 0.5), 1.0);
        assert_eq!(edge_proximity_factor(0.5, 1.0), 1.0);
        assert_eq!(edge_proximity_factor(1.0, 1.0), 1.0);
        for i in 0..=100 {
            for j in 0..=100 {
                let f = edge_proximity_factor(i as f64 / 100.0, j as f64 / 100.0);
                assert!((0.0..=1.0).contains(&f));
            }
        }
        let near_wall = edge_proximity_factor(0.05, 0.5);
        let mid_band = edge_proximity_factor(0.2, 0.5);
        assert!(near_wall > mid_band && mid_band > 0.0);
    }
}
