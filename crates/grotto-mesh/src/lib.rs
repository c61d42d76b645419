//! Cave mesh construction: shared scene buffers, the noisy cave shell, and the
//! crystal and pillar generators that decorate it.
//!
//! Every generator appends into a caller-owned [`SceneBuffers`] and draws its
//! randomness from a caller-owned RNG, so separate runs never share state.

pub mod buffers;
pub mod crystal;
pub mod pillar;
pub mod shell;

/// Material of the shell and of every pillar.
pub const ROCK_MATERIAL: &str = "rock";

/// Materials a crystal can be assigned.
pub const CRYSTAL_MATERIALS: [&str; 3] = ["crystal_blue", "crystal_purple", "crystal_red"];

pub use buffers::{
    BufferMark, Face, HelperId, MaterialGroup, MeshSpan, SceneBuffers, VertexId,
};
pub use crystal::{
    CRYSTAL_TILT_MAX_ANGLE, Crystal, CrystalPose, add_hanging_crystal, add_standing_crystal,
};
pub use pillar::{Pillar, add_pillar, hourglass_factor};
pub use shell::{
    CaveShell, EDGE_FALLOFF_DIST, ShellParams, TUNNEL_Z_STRETCH, build_cave_shell,
    edge_proximity_factor,
};
