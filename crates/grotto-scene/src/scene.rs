//! The finished scene: geometry buffers plus camera and light records.

use std::fmt;

use grotto_mesh::{HelperId, SceneBuffers, VertexId};

/// Camera record: a mesh vertex for the eye, helper points for the target and up vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRecord {
    pub position: VertexId,
    pub look_target: HelperId,
    pub up: HelperId,
    pub fov_degrees: f64,
}

/// Directional light record.
///
/// `params` are written through verbatim; the renderer owns their meaning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightRecord {
    pub direction: HelperId,
    pub params: [f64; 2],
    pub intensity: f64,
}

/// A fully generated cave, ready to serialize.
#[derive(Clone, Debug)]
pub struct CaveScene {
    pub buffers: SceneBuffers,
    pub camera: CameraRecord,
    pub light: LightRecord,
}

impl CaveScene {
    /// Count summary of the scene.
    pub fn stats(&self) -> SceneStats {
        SceneStats {
            vertices: self.buffers.vertex_count(),
            helper_points: self.buffers.helper_count(),
            faces: self.buffers.face_count(),
            faces_by_material: self
                .buffers
                .groups()
                .iter()
                .map(|group| (group.material.clone(), group.faces.len()))
                .collect(),
        }
    }
}

/// Vertex, helper point and face counts of a scene.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneStats {
    pub vertices: usize,
    pub helper_points: usize,
    pub faces: usize,
    /// Face count per material, in output order.
    pub faces_by_material: Vec<(String, usize)>,
}

impl fmt::Display for SceneStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vertices, {} helper points, {} faces",
            self.vertices, self.helper_points, self.faces
        )?;
        for (material, count) in &self.faces_by_material {
            write!(f, "\n  {material}: {count}")?;
        }
        Ok(())
    }
}
