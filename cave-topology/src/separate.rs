//! Connected-component separation.

use hashbrown::HashMap;
use tracing::debug;

use cave_types::{FaceKey, PolyMesh, VertexKey};

/// Split a mesh into its topologically connected components.
///
/// Two faces are connected when they share a vertex. Components come
/// back ordered by their first face's position in the input, and each
/// output mesh keeps its faces (and their rings) in the input's order
/// with fresh keys. Vertices referenced by no face are dropped.
///
/// A connected mesh comes back as a single-element vector.
#[must_use]
pub fn separate_loose(mesh: &PolyMesh) -> Vec<PolyMesh> {
    // Union-find over vertices, welded through each face's ring
    let mut parent: HashMap<VertexKey, VertexKey> =
        mesh.vertex_keys().map(|k| (k, k)).collect();

    for (_, ring) in mesh.faces() {
        for &v in &ring[1..] {
            union(&mut parent, ring[0], v);
        }
    }

    // Group faces by their root vertex, components in face-scan order
    let mut component_of_root: HashMap<VertexKey, usize> = HashMap::new();
    let mut face_groups: Vec<Vec<FaceKey>> = Vec::new();
    for (face, ring) in mesh.faces() {
        let root = find(&mut parent, ring[0]);
        let idx = *component_of_root.entry(root).or_insert_with(|| {
            face_groups.push(Vec::new());
            face_groups.len() - 1
        });
        face_groups[idx].push(face);
    }

    let parts: Vec<PolyMesh> = face_groups
        .iter()
        .map(|faces| extract(mesh, faces))
        .collect();

    debug!(
        components = parts.len(),
        input_faces = mesh.face_count(),
        "separated loose parts"
    );
    parts
}

/// Copy a face subset into a fresh mesh, remapping vertices in
/// first-encounter order.
fn extract(mesh: &PolyMesh, faces: &[FaceKey]) -> PolyMesh {
    let mut out = PolyMesh::new();
    let mut remap: HashMap<VertexKey, VertexKey> = HashMap::new();

    for &face in faces {
        let Some(ring) = mesh.face(face) else {
            continue;
        };
        let mut new_ring = Vec::with_capacity(ring.len());
        for &v in ring {
            let key = if let Some(&k) = remap.get(&v) {
                k
            } else if let Some(vertex) = mesh.vertex(v) {
                let k = out.add_vertex(vertex.clone());
                remap.insert(v, k);
                k
            } else {
                // Ring references a removed vertex; unreachable for
                // meshes built through PolyMesh's own API
                continue;
            };
            new_ring.push(key);
        }
        if new_ring.len() >= 3 {
            out.add_face(new_ring);
        }
    }

    out
}

fn find(parent: &mut HashMap<VertexKey, VertexKey>, v: VertexKey) -> VertexKey {
    let mut root = v;
    while parent[&root] != root {
        root = parent[&root];
    }
    // Path compression
    let mut cur = v;
    while parent[&cur] != root {
        let next = parent[&cur];
        parent.insert(cur, root);
        cur = next;
    }
    root
}

fn union(parent: &mut HashMap<VertexKey, VertexKey>, a: VertexKey, b: VertexKey) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        // Deterministic: smaller key wins as root
        if ra < rb {
            parent.insert(rb, ra);
        } else {
            parent.insert(ra, rb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cave_types::Vertex;

    fn triangle_at(mesh: &mut PolyMesh, x: f64) -> FaceKey {
        let a = mesh.add_vertex(Vertex::from_coords(x, 0.0, 0.0));
        let b = mesh.add_vertex(Vertex::from_coords(x + 1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vertex::from_coords(x, 1.0, 0.0));
        mesh.add_face(vec![a, b, c])
    }

    #[test]
    fn connected_mesh_is_one_part() {
        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
        let d = mesh.add_vertex(Vertex::from_coords(1.0, 1.0, 0.0));
        mesh.add_face(vec![a, b, c]);
        mesh.add_face(vec![b, d, c]);

        let parts = separate_loose(&mesh);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].face_count(), 2);
        assert_eq!(parts[0].vertex_count(), 4);
    }

    #[test]
    fn disjoint_islands_separate() {
        let mut mesh = PolyMesh::new();
        triangle_at(&mut mesh, 0.0);
        triangle_at(&mut mesh, 10.0);
        triangle_at(&mut mesh, 20.0);

        let parts = separate_loose(&mesh);
        assert_eq!(parts.len(), 3);
        for part in &parts {
            assert_eq!(part.face_count(), 1);
            assert_eq!(part.vertex_count(), 3);
        }
    }

    #[test]
    fn component_order_follows_face_order() {
        let mut mesh = PolyMesh::new();
        triangle_at(&mut mesh, 10.0);
        triangle_at(&mut mesh, 0.0);

        let parts = separate_loose(&mesh);
        assert_eq!(parts.len(), 2);
        // First component holds the first face, at x = 10
        let x = parts[0].bounds().min.x;
        assert!((x - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_mesh_has_no_parts() {
        let mesh = PolyMesh::new();
        assert!(separate_loose(&mesh).is_empty());
    }

    #[test]
    fn positions_survive_extraction() {
        let mut mesh = PolyMesh::new();
        triangle_at(&mut mesh, 5.0);
        let parts = separate_loose(&mesh);
        let buffers = parts[0].to_buffers();
        assert_eq!(buffers.positions[0], [5.0, 0.0, 0.0]);
    }
}
