//! Mesh adjacency queries.

use hashbrown::HashMap;

use cave_types::{FaceKey, PolyMesh, VertexKey};

/// Adjacency information for a mesh.
///
/// Provides lookups for faces incident to an edge or a vertex, plus
/// boundary and manifold queries. Built once per edit pass; a
/// structural edit invalidates it.
#[derive(Debug, Clone)]
pub struct MeshAdjacency {
    edge_to_faces: HashMap<(VertexKey, VertexKey), Vec<FaceKey>>,
    vertex_to_faces: HashMap<VertexKey, Vec<FaceKey>>,
}

impl MeshAdjacency {
    /// Build adjacency information from a mesh.
    #[must_use]
    pub fn from_mesh(mesh: &PolyMesh) -> Self {
        let mut edge_to_faces: HashMap<(VertexKey, VertexKey), Vec<FaceKey>> = HashMap::new();
        let mut vertex_to_faces: HashMap<VertexKey, Vec<FaceKey>> = HashMap::new();

        for (face, ring) in mesh.faces() {
            for (i, &v) in ring.iter().enumerate() {
                vertex_to_faces.entry(v).or_default().push(face);
                let edge = normalize_edge(v, ring[(i + 1) % ring.len()]);
                edge_to_faces.entry(edge).or_default().push(face);
            }
        }

        Self {
            edge_to_faces,
            vertex_to_faces,
        }
    }

    /// Faces adjacent to an edge, or `None` if the edge doesn't exist.
    #[must_use]
    pub fn faces_for_edge(&self, a: VertexKey, b: VertexKey) -> Option<&[FaceKey]> {
        self.edge_to_faces
            .get(&normalize_edge(a, b))
            .map(Vec::as_slice)
    }

    /// Faces incident to a vertex, empty if none.
    #[must_use]
    pub fn faces_for_vertex(&self, v: VertexKey) -> &[FaceKey] {
        self.vertex_to_faces.get(&v).map_or(&[], Vec::as_slice)
    }

    /// Number of boundary edges (exactly one adjacent face).
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() == 1)
            .count()
    }

    /// Number of non-manifold edges (more than two adjacent faces).
    #[must_use]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() > 2)
            .count()
    }

    /// Whether every edge has at most two adjacent faces.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.edge_to_faces.values().all(|faces| faces.len() <= 2)
    }

    /// Total number of unique edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }
}

/// Normalize edge endpoints so the smaller key comes first.
#[inline]
fn normalize_edge(a: VertexKey, b: VertexKey) -> (VertexKey, VertexKey) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cave_types::Vertex;

    fn two_quads() -> (PolyMesh, Vec<VertexKey>) {
        let mut mesh = PolyMesh::new();
        let v: Vec<_> = [
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (2.0, 1.0),
        ]
        .iter()
        .map(|&(x, y)| mesh.add_vertex(Vertex::from_coords(x, y, 0.0)))
        .collect();
        mesh.add_face(vec![v[0], v[1], v[4], v[3]]);
        mesh.add_face(vec![v[1], v[2], v[5], v[4]]);
        (mesh, v)
    }

    #[test]
    fn shared_edge_has_two_faces() {
        let (mesh, v) = two_quads();
        let adj = MeshAdjacency::from_mesh(&mesh);
        let shared = adj.faces_for_edge(v[1], v[4]);
        assert_eq!(shared.map(<[FaceKey]>::len), Some(2));
    }

    #[test]
    fn rim_edges_are_boundary() {
        let (mesh, _) = two_quads();
        let adj = MeshAdjacency::from_mesh(&mesh);
        // 7 unique edges, 6 on the rim
        assert_eq!(adj.edge_count(), 7);
        assert_eq!(adj.boundary_edge_count(), 6);
        assert!(adj.is_manifold());
        assert_eq!(adj.non_manifold_edge_count(), 0);
    }

    #[test]
    fn vertex_incidence() {
        let (mesh, v) = two_quads();
        let adj = MeshAdjacency::from_mesh(&mesh);
        assert_eq!(adj.faces_for_vertex(v[1]).len(), 2);
        assert_eq!(adj.faces_for_vertex(v[0]).len(), 1);
    }

    #[test]
    fn tube_membrane_edges_are_non_manifold() {
        use cave_extrude::build_tube;
        use cave_path::CavePath;
        use nalgebra::Vector3;

        let path = CavePath::from_offsets(vec![Vector3::new(5.0, 0.0, 0.0); 2]);
        let tube = build_tube(5.0, &path).unwrap();
        let adj = MeshAdjacency::from_mesh(&tube.mesh);
        // The interior membrane's 4 ring edges carry 3 faces each
        assert_eq!(adj.non_manifold_edge_count(), 4);
        assert!(!adj.is_manifold());
    }
}
