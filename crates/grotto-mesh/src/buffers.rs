//! Append-only scene buffers: mesh vertices, helper points and material-grouped faces.

use std::fmt;

use glam::DVec3;
use hashbrown::HashMap;

/// 1-based index of a mesh vertex, as written in `f` and `camera` records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub u32);

/// 1-based index of a helper point (`ng` record). Disjoint from [`VertexId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HelperId(pub u32);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for HelperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A triangle referencing three previously appended vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face(pub [VertexId; 3]);

/// All faces sharing one material, in creation order.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialGroup {
    pub material: String,
    pub faces: Vec<Face>,
}

/// Position in the buffers, used to measure what a generator appended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferMark {
    vertices: usize,
    faces: usize,
}

/// Vertex and face counts appended since a [`BufferMark`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshSpan {
    /// Index of the first vertex appended, if any were.
    pub first_vertex: Option<VertexId>,
    pub vertices: usize,
    pub faces: usize,
}

/// Owns every vertex, helper point and face of one generation run.
///
/// Indices are dense and 1-based: the Nth vertex appended is `VertexId(N)`.
/// Material groups keep the order in which each material first received a face.
#[derive(Clone, Debug, Default)]
pub struct SceneBuffers {
    vertices: Vec<DVec3>,
    helpers: Vec<DVec3>,
    groups: Vec<MaterialGroup>,
    group_lookup: HashMap<String, usize>,
    face_count: usize,
}

impl SceneBuffers {
    /// Creates empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a mesh vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> VertexId {
        self.vertices.push(position);
        VertexId(self.vertices.len() as u32)
    }

    /// Appends a helper point and returns its index.
    pub fn add_helper_point(&mut self, position: DVec3) -> HelperId {
        self.helpers.push(position);
        HelperId(self.helpers.len() as u32)
    }

    /// Appends a triangle to the group for `material`, creating the group on first use.
    pub fn add_face(&mut self, a: VertexId, b: VertexId, c: VertexId, material: &str) {
        debug_assert!(
            [a, b, c]
                .iter()
                .all(|v| v.0 >= 1 && v.0 as usize <= self.vertices.len()),
            "face ({a}, {b}, {c}) references a vertex outside 1..={}",
            self.vertices.len()
        );

        let slot = match self.group_lookup.get(material) {
            Some(&slot) => slot,
            None => {
                self.groups.push(MaterialGroup {
                    material: material.to_string(),
                    faces: Vec::new(),
                });
                let slot = self.groups.len() - 1;
                self.group_lookup.insert(material.to_string(), slot);
                slot
            }
        };
        self.groups[slot].faces.push(Face([a, b, c]));
        self.face_count += 1;
    }

    /// Mesh vertices in creation order.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Position of a vertex by index.
    pub fn vertex(&self, id: VertexId) -> Option<DVec3> {
        (id.0 as usize)
            .checked_sub(1)
            .and_then(|i| self.vertices.get(i))
            .copied()
    }

    /// Helper points in creation order.
    pub fn helper_points(&self) -> &[DVec3] {
        &self.helpers
    }

    /// Material groups in first-insertion order.
    pub fn groups(&self) -> &[MaterialGroup] {
        &self.groups
    }

    /// Faces of one material, if any were added.
    pub fn faces_for(&self, material: &str) -> Option<&[Face]> {
        self.group_lookup
            .get(material)
            .map(|&slot| self.groups[slot].faces.as_slice())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn helper_count(&self) -> usize {
        self.helpers.len()
    }

    /// Total faces across all materials.
    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Snapshot of the current counts.
    pub fn mark(&self) -> BufferMark {
        BufferMark {
            vertices: self.vertices.len(),
            faces: self.face_count,
        }
    }

    /// What was appended since `mark`.
    pub fn span_since(&self, mark: BufferMark) -> MeshSpan {
        let vertices = self.vertices.len() - mark.vertices;
        MeshSpan {
            first_vertex: (vertices > 0).then(|| VertexId(mark.vertices as u32 + 1)),
            vertices,
            faces: self.face_count - mark.faces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffers() {
        let buffers = SceneBuffers::new();
        assert_eq!(buffers.vertex_count(), 0);
        assert_eq!(buffers.helper_count(), 0);
        assert_eq!(buffers.face_count(), 0);
        assert!(buffers.groups().is_empty());
    }

    #[test]
    fn test_vertex_indices_are_dense_and_one_based() {
        let mut buffers = SceneBuffers::new();
        for n in 1..=100u32 {
            let id = buffers.add_vertex(DVec3::splat(n as f64));
            assert_eq!(id, VertexId(n));
        }
        assert_eq!(buffers.vertex(VertexId(7)), Some(DVec3::splat(7.0)));
        assert_eq!(buffers.vertex(VertexId(0)), None);
        assert_eq!(buffers.vertex(VertexId(101)), None);
    }

    #[test]
    fn test_helper_index_space_is_separate() {
        let mut buffers = SceneBuffers::new();
        buffers.add_vertex(DVec3::ZERO);
        buffers.add_vertex(DVec3::ONE);
        let helper = buffers.add_helper_point(DVec3::Y);
        assert_eq!(helper, HelperId(1));
        assert_eq!(buffers.helper_points(), &[DVec3::Y]);
    }

    #[test]
    fn test_groups_keep_first_insertion_order() {
        let mut buffers = SceneBuffers::new();
        let a = buffers.add_vertex(DVec3::ZERO);
        let b = buffers.add_vertex(DVec3::X);
        let c = buffers.add_vertex(DVec3::Z);

        buffers.add_face(a, b, c, "rock");
        buffers.add_face(a, c, b, "crystal_red");
        buffers.add_face(b, c, a, "rock");
        buffers.add_face(c, a, b, "crystal_blue");

        let names: Vec<_> = buffers.groups().iter().map(|g| g.material.as_str()).collect();
        assert_eq!(names, ["rock", "crystal_red", "crystal_blue"]);
        assert_eq!(
            buffers.faces_for("rock").unwrap(),
            &[Face([a, b, c]), Face([b, c, a])]
        );
        assert_eq!(buffers.face_count(), 4);
        assert!(buffers.faces_for("crystal_purple").is_none());
    }

    #[test]
    fn test_span_since_mark() {
        let mut buffers = SceneBuffers::new();
        buffers.add_vertex(DVec3::ZERO);
        let mark = buffers.mark();
        assert_eq!(buffers.span_since(mark), MeshSpan::default());

        let a = buffers.add_vertex(DVec3::X);
        let b = buffers.add_vertex(DVec3::Y);
        let c = buffers.add_vertex(DVec3::Z);
        buffers.add_face(a, b, c, "rock");

        let span = buffers.span_since(mark);
        assert_eq!(span.first_vertex, Some(VertexId(2)));
        assert_eq!(span.vertices, 3);
        assert_eq!(span.faces, 1);
    }

    #[test]
    #[should_panic(expected = "references a vertex")]
    #[cfg(debug_assertions)]
    fn test_dangling_face_rejected_in_debug() {
        let mut buffers = SceneBuffers::new();
        let a = buffers.add_vertex(DVec3::ZERO);
        buffers.add_face(a, VertexId(2), VertexId(3), "rock");
    }
}
