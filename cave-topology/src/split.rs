//! Segment and edge splitting.

use hashbrown::HashSet;
use tracing::debug;

use cave_types::{FaceKey, PolyMesh, VertexKey};

use crate::adjacency::MeshAdjacency;
use crate::error::{TopologyError, TopologyResult};
use crate::separate::separate_loose;

/// The 4 side faces of one extrusion segment, in extrusion order.
pub type SegmentWindow = [FaceKey; 4];

/// How the per-segment face selection is resolved before cutting.
///
/// Both strategies cut the same seam — the vertex ring shared by
/// consecutive segments — and produce the same components; they differ
/// in which side of the cut keeps the original vertices, mirroring the
/// two historic selection senses (select the segment's own face window
/// vs. select everything except it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Select the segment's own side faces; they receive the duplicated
    /// seam vertices.
    ForwardWindow,

    /// Select the complement; the segment's side faces keep the
    /// original seam vertices.
    InverseWindow,
}

/// Detach every segment along its seam ring and separate the result.
///
/// For each pair of consecutive windows the shared vertex ring is
/// duplicated, disconnecting the later segment's side walls from the
/// earlier segment's geometry (its side walls and the cross-section
/// membrane between them). Separating by connectivity then yields one
/// mesh per segment: the first also carries the base frame, interior
/// ones carry their far membrane.
///
/// Windows are stable face keys, typically taken from the tube
/// builder's segment handles; they are resolved against the mesh as it
/// is now, not as it was when the window was computed.
///
/// # Errors
///
/// - [`TopologyError::EmptyMesh`] / [`TopologyError::NoSegments`] on
///   degenerate input
/// - [`TopologyError::TopologyInconsistency`] if a window references a
///   face a prior edit removed, or consecutive windows share no seam —
///   fatal; the caller's window bookkeeping is out of sync
pub fn split_by_segment(
    mesh: &PolyMesh,
    windows: &[SegmentWindow],
    strategy: Strategy,
) -> TopologyResult<Vec<PolyMesh>> {
    if mesh.is_empty() {
        return Err(TopologyError::EmptyMesh);
    }
    if windows.is_empty() {
        return Err(TopologyError::NoSegments);
    }
    for (i, window) in windows.iter().enumerate() {
        for &face in window {
            if !mesh.contains_face(face) {
                return Err(TopologyError::TopologyInconsistency {
                    reason: format!(
                        "segment {i} window references face {} which is no longer in the mesh",
                        face.raw()
                    ),
                });
            }
        }
    }

    let adjacency = MeshAdjacency::from_mesh(mesh);
    let mut work = mesh.clone();

    for j in 1..windows.len() {
        let seam = seam_ring(&work, &windows[j - 1], &windows[j]);
        if seam.is_empty() {
            return Err(TopologyError::TopologyInconsistency {
                reason: format!("segments {} and {j} share no seam vertices", j - 1),
            });
        }

        let window_set: HashSet<FaceKey> = windows[j].iter().copied().collect();
        for v in seam {
            let Some(vertex) = work.vertex(v).cloned() else {
                continue;
            };
            let duplicate = work.add_vertex(vertex);

            let targets: Vec<FaceKey> = match strategy {
                Strategy::ForwardWindow => windows[j].to_vec(),
                Strategy::InverseWindow => adjacency
                    .faces_for_vertex(v)
                    .iter()
                    .copied()
                    .filter(|f| !window_set.contains(f))
                    .collect(),
            };

            for face in targets {
                if let Some(ring) = work.face_ring_mut(face) {
                    for slot in ring {
                        if *slot == v {
                            *slot = duplicate;
                        }
                    }
                }
            }
        }
    }

    let parts = separate_loose(&work);
    debug!(
        segments = windows.len(),
        parts = parts.len(),
        "split by segment"
    );
    Ok(parts)
}

/// Vertices shared by two windows' side walls, in deterministic ring
/// order (scan of the later window's faces).
fn seam_ring(mesh: &PolyMesh, earlier: &SegmentWindow, later: &SegmentWindow) -> Vec<VertexKey> {
    let earlier_verts: HashSet<VertexKey> = earlier
        .iter()
        .filter_map(|&f| mesh.face(f))
        .flatten()
        .copied()
        .collect();

    let mut seam = Vec::new();
    let mut seen: HashSet<VertexKey> = HashSet::new();
    for &face in later {
        let Some(ring) = mesh.face(face) else {
            continue;
        };
        for &v in ring {
            if earlier_verts.contains(&v) && seen.insert(v) {
                seam.push(v);
            }
        }
    }
    seam
}

/// Fully disconnect every face and separate by connectivity.
///
/// Every face gets private copies of its vertices, so each face becomes
/// its own island — the coarse fallback when per-segment seams are not
/// available. Produces one mesh per input face, in face order.
///
/// # Errors
///
/// Returns [`TopologyError::EmptyMesh`] if the mesh has no faces.
pub fn split_all_edges(mesh: &PolyMesh) -> TopologyResult<Vec<PolyMesh>> {
    if mesh.is_empty() {
        return Err(TopologyError::EmptyMesh);
    }

    let ring_total: usize = mesh.faces().map(|(_, ring)| ring.len()).sum();
    let mut detached = PolyMesh::with_capacity(ring_total, mesh.face_count());
    for (_, ring) in mesh.faces() {
        let mut new_ring = Vec::with_capacity(ring.len());
        for &v in ring {
            let Some(vertex) = mesh.vertex(v) else {
                continue;
            };
            new_ring.push(detached.add_vertex(vertex.clone()));
        }
        if new_ring.len() >= 3 {
            detached.add_face(new_ring);
        }
    }

    let parts = separate_loose(&detached);
    debug!(parts = parts.len(), "split all edges");
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cave_extrude::build_tube;
    use cave_path::CavePath;
    use nalgebra::Vector3;

    fn tube_fixture(zones: usize) -> (PolyMesh, Vec<SegmentWindow>) {
        let path = CavePath::from_offsets(vec![Vector3::new(5.0, 0.0, 0.0); zones]);
        let tube = build_tube(5.0, &path).unwrap();
        let windows = tube.segments.iter().map(|s| s.sides).collect();
        (tube.mesh, windows)
    }

    #[test]
    fn three_zone_tube_splits_into_three_parts() {
        let (mesh, windows) = tube_fixture(3);
        let parts = split_by_segment(&mesh, &windows, Strategy::ForwardWindow).unwrap();

        assert_eq!(parts.len(), 3);
        // Base frame + first segment's sides + membrane
        assert_eq!(parts[0].face_count(), 5 + 4 + 1);
        // Interior segment: sides + far membrane
        assert_eq!(parts[1].face_count(), 4 + 1);
        // Last segment: sides only (exit cap was deleted)
        assert_eq!(parts[2].face_count(), 4);
    }

    #[test]
    fn seam_vertices_are_duplicated() {
        let (mesh, windows) = tube_fixture(3);
        let parts = split_by_segment(&mesh, &windows, Strategy::ForwardWindow).unwrap();

        let total: usize = parts.iter().map(PolyMesh::vertex_count).sum();
        // Two interior seams, 4 duplicated vertices each
        assert_eq!(total, mesh.vertex_count() + 8);
        assert!(total >= mesh.vertex_count());
    }

    #[test]
    fn strategies_agree_on_partition() {
        let (mesh, windows) = tube_fixture(4);
        let forward = split_by_segment(&mesh, &windows, Strategy::ForwardWindow).unwrap();
        let inverse = split_by_segment(&mesh, &windows, Strategy::InverseWindow).unwrap();

        assert_eq!(forward.len(), 4);
        assert_eq!(inverse.len(), 4);
        let forward_faces: Vec<usize> = forward.iter().map(PolyMesh::face_count).collect();
        let inverse_faces: Vec<usize> = inverse.iter().map(PolyMesh::face_count).collect();
        assert_eq!(forward_faces, inverse_faces);
    }

    #[test]
    fn single_segment_is_whole_tube() {
        let (mesh, windows) = tube_fixture(1);
        let parts = split_by_segment(&mesh, &windows, Strategy::ForwardWindow).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].face_count(), mesh.face_count());
    }

    #[test]
    fn stale_window_is_inconsistent() {
        let (mut mesh, windows) = tube_fixture(3);
        mesh.remove_face(windows[1][0]);

        let result = split_by_segment(&mesh, &windows, Strategy::ForwardWindow);
        assert!(matches!(
            result,
            Err(TopologyError::TopologyInconsistency { .. })
        ));
    }

    #[test]
    fn empty_windows_rejected() {
        let (mesh, _) = tube_fixture(1);
        let result = split_by_segment(&mesh, &[], Strategy::ForwardWindow);
        assert!(matches!(result, Err(TopologyError::NoSegments)));
    }

    #[test]
    fn split_all_edges_gives_one_mesh_per_face() {
        let (mesh, _) = tube_fixture(3);
        let parts = split_all_edges(&mesh).unwrap();

        assert_eq!(parts.len(), mesh.face_count());
        let total: usize = parts.iter().map(PolyMesh::vertex_count).sum();
        // Every face owns private copies of its 4 ring vertices
        assert_eq!(total, mesh.face_count() * 4);
    }

    #[test]
    fn split_all_edges_empty_mesh_rejected() {
        let mesh = PolyMesh::new();
        assert!(matches!(
            split_all_edges(&mesh),
            Err(TopologyError::EmptyMesh)
        ));
    }
}
