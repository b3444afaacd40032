//! Catmull-Clark subdivision.

use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use tracing::debug;

use cave_types::{FaceKey, PolyMesh, Vertex, VertexKey};

use crate::error::{SmoothError, SmoothResult};
use crate::params::{SmoothParams, MAX_LEVELS};
use crate::result::SmoothingResult;

/// Smooth a mesh with Catmull-Clark subdivision.
///
/// The input is not modified; the smoothed mesh is returned in the
/// result. Edges bordering one face (open tube ends) or three or more
/// faces (interior cross-section membranes) are treated as creases:
/// their edge points stay at the midpoint and the vertices along them
/// follow the crease rule, so open rims and membranes keep their shape
/// instead of collapsing.
///
/// # Errors
///
/// Returns an error if:
/// - The mesh has no vertices or no faces
/// - `levels` is 0
/// - `levels` is above [`MAX_LEVELS`], or the projected face count is
///   above `max_faces` — both [`SmoothError::ResourceLimitExceeded`]
///
/// # Example
///
/// ```
/// use cave_subdivide::{smooth_mesh, SmoothParams};
/// use cave_types::{PolyMesh, Vertex};
///
/// let mut mesh = PolyMesh::new();
/// let a = mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
/// let b = mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
/// let c = mesh.add_vertex(Vertex::from_coords(1.0, 1.0, 0.0));
/// let d = mesh.add_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.add_face(vec![a, b, c, d]);
///
/// let params = SmoothParams::default().with_levels(2);
/// let result = smooth_mesh(&mesh, &params).unwrap();
/// assert_eq!(result.final_faces, 16);
/// ```
pub fn smooth_mesh(mesh: &PolyMesh, params: &SmoothParams) -> SmoothResult<SmoothingResult> {
    if mesh.vertex_count() == 0 {
        return Err(SmoothError::EmptyMesh);
    }
    if mesh.face_count() == 0 {
        return Err(SmoothError::NoFaces);
    }
    if params.levels == 0 {
        return Err(SmoothError::InvalidLevels(0));
    }

    let projected = projected_faces(mesh, params.levels);
    if params.levels > MAX_LEVELS || projected > params.max_faces {
        return Err(SmoothError::ResourceLimitExceeded {
            levels: params.levels,
            projected,
        });
    }

    let original_faces = mesh.face_count();
    let original_vertices = mesh.vertex_count();

    let mut current = mesh.clone();
    for level in 0..params.levels {
        current = subdivide_once(&current);
        debug!(
            level = level + 1,
            faces = current.face_count(),
            vertices = current.vertex_count(),
            "subdivision level complete"
        );
    }

    Ok(SmoothingResult {
        original_faces,
        final_faces: current.face_count(),
        original_vertices,
        final_vertices: current.vertex_count(),
        levels: params.levels,
        mesh: current,
    })
}

/// Projected face count: one level turns each n-gon into n quads,
/// every following level multiplies by 4.
fn projected_faces(mesh: &PolyMesh, levels: u32) -> usize {
    let mut faces: usize = mesh.faces().map(|(_, ring)| ring.len()).sum();
    for _ in 1..levels {
        faces = faces.saturating_mul(4);
    }
    faces
}

/// One Catmull-Clark iteration.
fn subdivide_once(mesh: &PolyMesh) -> PolyMesh {
    let edges = mesh.edge_list();

    // Edge -> adjacent faces, in face-scan order
    let mut edge_faces: HashMap<(VertexKey, VertexKey), Vec<FaceKey>> = HashMap::new();
    for (face, ring) in mesh.faces() {
        for i in 0..ring.len() {
            let edge = normalize_edge(ring[i], ring[(i + 1) % ring.len()]);
            edge_faces.entry(edge).or_default().push(face);
        }
    }

    // Face centroids
    let mut centroids: HashMap<FaceKey, Point3<f64>> = HashMap::with_capacity(mesh.face_count());
    for (face, _) in mesh.faces() {
        if let Some(c) = mesh.face_centroid(face) {
            centroids.insert(face, c);
        }
    }

    // Edge points: face-average for interior edges, midpoint for creases
    let mut edge_points: HashMap<(VertexKey, VertexKey), Point3<f64>> =
        HashMap::with_capacity(edges.len());
    for &(a, b) in &edges {
        let pa = mesh.position(a);
        let pb = mesh.position(b);
        let adjacent = &edge_faces[&(a, b)];
        let point = if adjacent.len() == 2 {
            let c0 = centroids[&adjacent[0]];
            let c1 = centroids[&adjacent[1]];
            Point3::from((pa.coords + pb.coords + c0.coords + c1.coords) / 4.0)
        } else {
            nalgebra::center(&pa, &pb)
        };
        edge_points.insert((a, b), point);
    }

    // Per-vertex incidence, in deterministic edge/face order
    let mut vertex_edges: HashMap<VertexKey, Vec<(VertexKey, VertexKey)>> = HashMap::new();
    for &edge in &edges {
        vertex_edges.entry(edge.0).or_default().push(edge);
        vertex_edges.entry(edge.1).or_default().push(edge);
    }
    let mut vertex_faces: HashMap<VertexKey, Vec<FaceKey>> = HashMap::new();
    for (face, ring) in mesh.faces() {
        for &v in ring {
            vertex_faces.entry(v).or_default().push(face);
        }
    }

    // Repositioned original vertices
    let mut new_positions: HashMap<VertexKey, Point3<f64>> =
        HashMap::with_capacity(mesh.vertex_count());
    for (v, vertex) in mesh.vertices() {
        let incident = vertex_edges.get(&v).map_or(&[][..], Vec::as_slice);
        let creases: Vec<(VertexKey, VertexKey)> = incident
            .iter()
            .copied()
            .filter(|e| edge_faces[e].len() != 2)
            .collect();

        let p = vertex.position;
        let new_pos = match creases.len() {
            0 if !incident.is_empty() => {
                let faces = vertex_faces.get(&v).map_or(&[][..], Vec::as_slice);
                interior_position(p, incident, faces, mesh, &centroids)
            }
            2 => crease_position(v, p, &creases, mesh),
            // Corners (3+ creases), dangling vertices: keep in place
            _ => p,
        };
        new_positions.insert(v, new_pos);
    }

    // Assemble the output mesh: originals, then face points, then edge
    // points, all in deterministic scan order
    let out_vertices = mesh.vertex_count() + mesh.face_count() + edges.len();
    let out_faces: usize = mesh.faces().map(|(_, ring)| ring.len()).sum();
    let mut out = PolyMesh::with_capacity(out_vertices, out_faces);

    let mut vertex_map: HashMap<VertexKey, VertexKey> = HashMap::with_capacity(mesh.vertex_count());
    for v in mesh.vertex_keys() {
        vertex_map.insert(v, out.add_vertex(Vertex::new(new_positions[&v])));
    }
    let mut face_map: HashMap<FaceKey, VertexKey> = HashMap::with_capacity(mesh.face_count());
    for face in mesh.face_keys() {
        face_map.insert(face, out.add_vertex(Vertex::new(centroids[&face])));
    }
    let mut edge_map: HashMap<(VertexKey, VertexKey), VertexKey> =
        HashMap::with_capacity(edges.len());
    for &edge in &edges {
        edge_map.insert(edge, out.add_vertex(Vertex::new(edge_points[&edge])));
    }

    for (face, ring) in mesh.faces() {
        let n = ring.len();
        for j in 0..n {
            let prev = normalize_edge(ring[(j + n - 1) % n], ring[j]);
            let next = normalize_edge(ring[j], ring[(j + 1) % n]);
            out.add_face(vec![
                vertex_map[&ring[j]],
                edge_map[&next],
                face_map[&face],
                edge_map[&prev],
            ]);
        }
    }

    out
}

/// Catmull-Clark interior rule: `(F + 2R + (n-3)P) / n`.
fn interior_position(
    p: Point3<f64>,
    incident_edges: &[(VertexKey, VertexKey)],
    incident_faces: &[FaceKey],
    mesh: &PolyMesh,
    centroids: &HashMap<FaceKey, Point3<f64>>,
) -> Point3<f64> {
    if incident_faces.is_empty() {
        return p;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = incident_edges.len() as f64;

    let mut face_avg = Vector3::zeros();
    for face in incident_faces {
        face_avg += centroids[face].coords;
    }
    #[allow(clippy::cast_precision_loss)]
    let face_avg = face_avg / incident_faces.len() as f64;

    let mut edge_avg = Vector3::zeros();
    for &(a, b) in incident_edges {
        edge_avg += nalgebra::center(&mesh.position(a), &mesh.position(b)).coords;
    }
    let edge_avg = edge_avg / n;

    Point3::from((face_avg + 2.0 * edge_avg + (n - 3.0) * p.coords) / n)
}

/// Crease rule: `3/4 P + 1/8 (A + B)` with A, B the far endpoints of
/// the two crease edges.
fn crease_position(
    v: VertexKey,
    p: Point3<f64>,
    creases: &[(VertexKey, VertexKey)],
    mesh: &PolyMesh,
) -> Point3<f64> {
    let mut neighbor_sum = Vector3::zeros();
    for &(a, b) in creases {
        let other = if a == v { b } else { a };
        neighbor_sum += mesh.position(other).coords;
    }
    Point3::from(0.75 * p.coords + 0.125 * neighbor_sum)
}

/// Normalize edge endpoints so the smaller key comes first.
#[inline]
fn normalize_edge(a: VertexKey, b: VertexKey) -> (VertexKey, VertexKey) {
    if a <= b { (a, b) } else { (b, a) }
}
