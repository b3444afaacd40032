//! Polygon mesh with stable element handles.

use hashbrown::{HashMap, HashSet};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Aabb, FaceKey, Vertex, VertexKey};

/// A polygon mesh addressed through stable handles.
///
/// Vertices and faces live in insertion-ordered tables. Every element
/// is identified by a [`VertexKey`] or [`FaceKey`] that is assigned
/// monotonically and never reused, so handles survive destructive edits
/// (deleting a face never shifts another face's identity). Each face is
/// an ordered ring of at least 3 vertex keys, wound counter-clockwise
/// when viewed from outside.
///
/// Positional views — "the i-th face", flat index buffers — are derived
/// on demand from the insertion order, never stored.
///
/// # Example
///
/// ```
/// use cave_types::{PolyMesh, Vertex};
///
/// let mut mesh = PolyMesh::new();
/// let a = mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
/// let b = mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
/// let c = mesh.add_vertex(Vertex::from_coords(1.0, 1.0, 0.0));
/// let d = mesh.add_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
/// let quad = mesh.add_face(vec![a, b, c, d]);
///
/// assert_eq!(mesh.face(quad), Some(&[a, b, c, d][..]));
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolyMesh {
    vertex_order: Vec<VertexKey>,
    vertices: HashMap<VertexKey, Vertex>,
    face_order: Vec<FaceKey>,
    faces: HashMap<FaceKey, Vec<VertexKey>>,
    next_vertex: u32,
    next_face: u32,
}

/// Flat export buffers: positions plus positional face indices.
///
/// This is the hand-off format for renderers and file exporters; the
/// indices are positions in `positions`, computed from the mesh's
/// insertion order at export time.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshBuffers {
    /// Vertex positions, `[x, y, z]` per vertex.
    pub positions: Vec<[f64; 3]>,
    /// Faces as rings of indices into `positions`.
    pub faces: Vec<Vec<u32>>,
}

impl PolyMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertex_order: Vec::with_capacity(vertex_count),
            vertices: HashMap::with_capacity(vertex_count),
            face_order: Vec::with_capacity(face_count),
            faces: HashMap::with_capacity(face_count),
            next_vertex: 0,
            next_face: 0,
        }
    }

    /// Add a vertex, returning its stable key.
    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexKey {
        let key = VertexKey(self.next_vertex);
        self.next_vertex += 1;
        self.vertex_order.push(key);
        self.vertices.insert(key, vertex);
        key
    }

    /// Add a face from an ordered ring of vertex keys.
    ///
    /// The ring must have at least 3 entries and every key must be live;
    /// violating either is a programmer error (checked in debug builds).
    pub fn add_face(&mut self, ring: Vec<VertexKey>) -> FaceKey {
        debug_assert!(ring.len() >= 3, "face ring needs at least 3 vertices");
        debug_assert!(
            ring.iter().all(|v| self.vertices.contains_key(v)),
            "face ring references a removed vertex"
        );
        let key = FaceKey(self.next_face);
        self.next_face += 1;
        self.face_order.push(key);
        self.faces.insert(key, ring);
        key
    }

    /// Remove a face, returning its ring.
    ///
    /// Other faces keep their keys and their relative order. Vertices
    /// are never removed implicitly.
    pub fn remove_face(&mut self, key: FaceKey) -> Option<Vec<VertexKey>> {
        let ring = self.faces.remove(&key)?;
        self.face_order.retain(|&k| k != key);
        Some(ring)
    }

    /// Look up a vertex by key.
    #[inline]
    #[must_use]
    pub fn vertex(&self, key: VertexKey) -> Option<&Vertex> {
        self.vertices.get(&key)
    }

    /// Mutable access to a vertex.
    #[inline]
    pub fn vertex_mut(&mut self, key: VertexKey) -> Option<&mut Vertex> {
        self.vertices.get_mut(&key)
    }

    /// Position of a live vertex.
    ///
    /// # Panics
    ///
    /// Panics if the key has been removed; callers hold this invariant.
    #[inline]
    #[must_use]
    pub fn position(&self, key: VertexKey) -> Point3<f64> {
        self.vertices[&key].position
    }

    /// Look up a face ring by key.
    #[inline]
    #[must_use]
    pub fn face(&self, key: FaceKey) -> Option<&[VertexKey]> {
        self.faces.get(&key).map(Vec::as_slice)
    }

    /// Mutable access to a face ring, for seam rewrites.
    #[inline]
    pub fn face_ring_mut(&mut self, key: FaceKey) -> Option<&mut Vec<VertexKey>> {
        self.faces.get_mut(&key)
    }

    /// Whether the vertex key is live.
    #[inline]
    #[must_use]
    pub fn contains_vertex(&self, key: VertexKey) -> bool {
        self.vertices.contains_key(&key)
    }

    /// Whether the face key is live.
    #[inline]
    #[must_use]
    pub fn contains_face(&self, key: FaceKey) -> bool {
        self.faces.contains_key(&key)
    }

    /// Number of live vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_order.len()
    }

    /// Number of live faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.face_order.len()
    }

    /// Whether the mesh has no renderable geometry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertex_order.is_empty() || self.face_order.is_empty()
    }

    /// Live vertex keys in insertion order.
    pub fn vertex_keys(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.vertex_order.iter().copied()
    }

    /// Live face keys in insertion order.
    pub fn face_keys(&self) -> impl Iterator<Item = FaceKey> + '_ {
        self.face_order.iter().copied()
    }

    /// Vertices with their keys, in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexKey, &Vertex)> + '_ {
        self.vertex_order.iter().map(move |&k| (k, &self.vertices[&k]))
    }

    /// Faces with their keys, in insertion order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceKey, &[VertexKey])> + '_ {
        self.face_order
            .iter()
            .map(move |&k| (k, self.faces[&k].as_slice()))
    }

    /// The face currently at a positional index, if any.
    ///
    /// This is the lazily computed positional view: the index is a
    /// position in the current insertion order and is invalidated by
    /// the next structural edit, while the returned key is not.
    #[inline]
    #[must_use]
    pub fn face_at(&self, index: usize) -> Option<FaceKey> {
        self.face_order.get(index).copied()
    }

    /// Current positional index of a face key, if live.
    #[must_use]
    pub fn face_position(&self, key: FaceKey) -> Option<usize> {
        self.face_order.iter().position(|&k| k == key)
    }

    /// The derived edge set, in deterministic first-encounter order.
    ///
    /// Each undirected edge appears once, endpoints ordered so the
    /// smaller key comes first. Order follows the face scan, so two
    /// meshes built by the same edit sequence list edges identically.
    #[must_use]
    pub fn edge_list(&self) -> Vec<(VertexKey, VertexKey)> {
        let mut seen: HashSet<(VertexKey, VertexKey)> = HashSet::new();
        let mut edges = Vec::new();
        for &face in &self.face_order {
            let ring = &self.faces[&face];
            for i in 0..ring.len() {
                let edge = normalize_edge(ring[i], ring[(i + 1) % ring.len()]);
                if seen.insert(edge) {
                    edges.push(edge);
                }
            }
        }
        edges
    }

    /// Reverse the winding of every face and negate stored normals.
    ///
    /// Applying this twice restores the original winding exactly.
    pub fn flip_winding(&mut self) {
        for ring in self.faces.values_mut() {
            ring.reverse();
        }
        for vertex in self.vertices.values_mut() {
            if let Some(ref mut normal) = vertex.normal {
                *normal = -*normal;
            }
        }
    }

    /// Unnormalized face normal by Newell's method.
    ///
    /// The magnitude is twice the face area; returns `None` for a dead
    /// key. A degenerate face yields the zero vector.
    #[must_use]
    pub fn face_normal_raw(&self, key: FaceKey) -> Option<Vector3<f64>> {
        let ring = self.faces.get(&key)?;
        let mut n = Vector3::zeros();
        for i in 0..ring.len() {
            let p = self.vertices[&ring[i]].position;
            let q = self.vertices[&ring[(i + 1) % ring.len()]].position;
            n.x += (p.y - q.y) * (p.z + q.z);
            n.y += (p.z - q.z) * (p.x + q.x);
            n.z += (p.x - q.x) * (p.y + q.y);
        }
        Some(n)
    }

    /// Unit face normal, or `None` for a dead key or degenerate face.
    #[must_use]
    pub fn face_normal(&self, key: FaceKey) -> Option<Vector3<f64>> {
        self.face_normal_raw(key)
            .and_then(|n| n.try_normalize(f64::EPSILON))
    }

    /// Centroid of a face ring.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn face_centroid(&self, key: FaceKey) -> Option<Point3<f64>> {
        let ring = self.faces.get(&key)?;
        let mut sum = Vector3::zeros();
        for v in ring {
            sum += self.vertices[v].position.coords;
        }
        Some(Point3::from(sum / ring.len() as f64))
    }

    /// Compute per-vertex normals as the area-weighted average of
    /// incident face normals, overwriting any stored normals.
    ///
    /// Vertices with no incident faces (or a degenerate neighborhood)
    /// are left without a normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut acc: HashMap<VertexKey, Vector3<f64>> = HashMap::new();
        for &face in &self.face_order {
            let Some(n) = self.face_normal_raw(face) else {
                continue;
            };
            for &v in &self.faces[&face] {
                *acc.entry(v).or_insert_with(Vector3::zeros) += n;
            }
        }
        for &key in &self.vertex_order {
            let normal = acc
                .get(&key)
                .and_then(|n| n.try_normalize(f64::EPSILON));
            if let Some(vertex) = self.vertices.get_mut(&key) {
                vertex.normal = normal;
            }
        }
    }

    /// Bounding box of all vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertex_order.iter().map(|k| &self.vertices[k].position))
    }

    /// Export flat position and face-index buffers.
    ///
    /// Indices are positions in the current insertion order; this is
    /// the only place positional indices are materialized.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: u32 indices support ~4B vertices, far beyond any cave
    pub fn to_buffers(&self) -> MeshBuffers {
        let mut index: HashMap<VertexKey, u32> = HashMap::with_capacity(self.vertex_order.len());
        let mut positions = Vec::with_capacity(self.vertex_order.len());
        for (i, &key) in self.vertex_order.iter().enumerate() {
            index.insert(key, i as u32);
            let p = self.vertices[&key].position;
            positions.push([p.x, p.y, p.z]);
        }
        let faces = self
            .face_order
            .iter()
            .map(|k| self.faces[k].iter().map(|v| index[v]).collect())
            .collect();
        MeshBuffers { positions, faces }
    }
}

/// Normalize edge endpoints so the smaller key comes first.
#[inline]
fn normalize_edge(a: VertexKey, b: VertexKey) -> (VertexKey, VertexKey) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn quad_mesh() -> (PolyMesh, [VertexKey; 4], FaceKey) {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vertex::from_coords(1.0, 1.0, 0.0));
        let d = mesh.add_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
        let f = mesh.add_face(vec![a, b, c, d]);
        (mesh, [a, b, c, d], f)
    }

    #[test]
    fn empty_mesh() {
        let mesh = PolyMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.edge_list().len(), 0);
    }

    #[test]
    fn counts_and_lookup() {
        let (mesh, [a, ..], f) = quad_mesh();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 1);
        assert!(mesh.contains_vertex(a));
        assert_eq!(mesh.face(f).map(<[VertexKey]>::len), Some(4));
    }

    #[test]
    fn keys_survive_face_removal() {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
        let d = mesh.add_vertex(Vertex::from_coords(1.0, 1.0, 0.0));
        let f0 = mesh.add_face(vec![a, b, c]);
        let f1 = mesh.add_face(vec![b, d, c]);

        assert_eq!(mesh.face_position(f1), Some(1));
        mesh.remove_face(f0);

        // f1 keeps its key while its positional index shifts
        assert!(mesh.contains_face(f1));
        assert_eq!(mesh.face_position(f1), Some(0));
        assert_eq!(mesh.face_at(0), Some(f1));
        assert!(!mesh.contains_face(f0));
    }

    #[test]
    fn face_keys_not_reused() {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
        let f0 = mesh.add_face(vec![a, b, c]);
        mesh.remove_face(f0);
        let f1 = mesh.add_face(vec![a, b, c]);
        assert_ne!(f0, f1);
    }

    #[test]
    fn edge_list_dedups_shared_edges() {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
        let d = mesh.add_vertex(Vertex::from_coords(1.0, 1.0, 0.0));
        mesh.add_face(vec![a, b, c]);
        mesh.add_face(vec![b, d, c]);
        // 5 unique edges, (b, c) shared
        assert_eq!(mesh.edge_list().len(), 5);
    }

    #[test]
    fn flip_winding_is_involution() {
        let (mut mesh, ring, f) = quad_mesh();
        mesh.flip_winding();
        assert_eq!(mesh.face(f), Some(&[ring[3], ring[2], ring[1], ring[0]][..]));
        mesh.flip_winding();
        assert_eq!(mesh.face(f), Some(&ring[..]));
    }

    #[test]
    fn quad_normal_points_up() {
        let (mesh, _, f) = quad_mesh();
        let n = mesh.face_normal(f).unwrap();
        assert!((n - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn vertex_normals_on_flat_quad() {
        let (mut mesh, ring, _) = quad_mesh();
        mesh.compute_vertex_normals();
        for key in ring {
            let n = mesh.vertex(key).unwrap().normal.unwrap();
            assert!((n - Vector3::z()).norm() < 1e-12);
        }
    }

    #[test]
    fn buffers_reflect_live_order() {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
        let d = mesh.add_vertex(Vertex::from_coords(1.0, 1.0, 0.0));
        let f0 = mesh.add_face(vec![a, b, c]);
        mesh.add_face(vec![b, d, c]);
        mesh.remove_face(f0);

        let buffers = mesh.to_buffers();
        assert_eq!(buffers.positions.len(), 4);
        assert_eq!(buffers.faces, vec![vec![1, 3, 2]]);
    }

    #[test]
    fn bounds_cover_vertices() {
        let (mesh, ..) = quad_mesh();
        let bounds = mesh.bounds();
        assert!((bounds.size().x - 1.0).abs() < f64::EPSILON);
        assert!((bounds.size().z - 0.0).abs() < f64::EPSILON);
    }
}
