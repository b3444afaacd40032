//! Iterative face extrusion along the path.

use cave_path::CavePath;
use cave_types::{FaceKey, Point3, PolyMesh, Vertex, VertexKey};
use tracing::debug;

use crate::error::{ExtrudeError, ExtrudeResult};

/// Stable addressing for one extrusion step's geometry.
///
/// `sides` are the step's 4 side walls in ring order; `cap` is the
/// cross-section face at the step's far end. The final segment's cap is
/// `None` — it was deleted to leave the tube open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentHandle {
    /// The 4 side-wall faces, in the front ring's winding order.
    pub sides: [FaceKey; 4],

    /// Cross-section cap at the far end of the segment, if still live.
    pub cap: Option<FaceKey>,
}

/// A built tube: the mesh plus per-segment stable handles.
#[derive(Debug, Clone)]
pub struct TubeMesh {
    /// The tube geometry.
    pub mesh: PolyMesh,

    /// One handle per extrusion step, in path order.
    pub segments: Vec<SegmentHandle>,
}

impl TubeMesh {
    /// Number of extruded segments.
    #[inline]
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// Build the cave tube by extruding a cube frame along the path.
///
/// Starts from an axis-aligned cube of edge `size` and, for each path
/// offset, duplicates the active front ring, translates it by the
/// offset, and closes the gap with 4 side walls plus a new cap that
/// becomes the next front. The previous cap stays behind as an interior
/// cross-section membrane — this is what keeps segments individually
/// separable later. Finally both traversal ends are opened: the cube's
/// entry face (the cave mouth) and the last cap are deleted.
///
/// The result always has `8 + 4 * zones` vertices and
/// `6 + 5 * zones - 2` faces.
///
/// # Errors
///
/// - [`ExtrudeError::EmptyPath`] if the path has no segments.
/// - [`ExtrudeError::InvalidSize`] if `size` is not positive and finite.
///
/// # Example
///
/// ```
/// use cave_extrude::build_tube;
/// use cave_path::CavePath;
/// use nalgebra::Vector3;
///
/// let path = CavePath::from_offsets(vec![Vector3::new(5.0, 0.0, 0.0)]);
/// let tube = build_tube(5.0, &path).unwrap();
///
/// assert_eq!(tube.segment_count(), 1);
/// assert_eq!(tube.mesh.face_count(), 9);
/// ```
pub fn build_tube(size: f64, path: &CavePath) -> ExtrudeResult<TubeMesh> {
    if !(size.is_finite() && size > 0.0) {
        return Err(ExtrudeError::InvalidSize(size));
    }
    if path.is_empty() {
        return Err(ExtrudeError::EmptyPath);
    }

    let zones = path.len();
    let mut mesh = PolyMesh::with_capacity(8 + 4 * zones, 6 + 5 * zones);

    let (frame_faces, mut front_ring) = spawn_frame(&mut mesh, size);
    let entry_cap = frame_faces[FORWARD_FACE];

    let mut segments = Vec::with_capacity(zones);
    for offset in path.iter() {
        let front_positions: Vec<Point3<f64>> =
            front_ring.iter().map(|&k| mesh.position(k)).collect();
        let new_ring: Vec<VertexKey> = front_positions
            .iter()
            .map(|p| mesh.add_vertex(Vertex::new(p + offset)))
            .collect();

        let sides = [
            mesh.add_face(vec![front_ring[0], front_ring[1], new_ring[1], new_ring[0]]),
            mesh.add_face(vec![front_ring[1], front_ring[2], new_ring[2], new_ring[1]]),
            mesh.add_face(vec![front_ring[2], front_ring[3], new_ring[3], new_ring[2]]),
            mesh.add_face(vec![front_ring[3], front_ring[0], new_ring[0], new_ring[3]]),
        ];
        let cap = mesh.add_face(new_ring.clone());
        segments.push(SegmentHandle {
            sides,
            cap: Some(cap),
        });

        front_ring = new_ring;
        debug!(
            segment = segments.len(),
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "extruded segment"
        );
    }

    // Open both ends: cave mouth and the far exit
    mesh.remove_face(entry_cap);
    if let Some(last) = segments.last_mut() {
        if let Some(cap) = last.cap.take() {
            mesh.remove_face(cap);
        }
    }

    debug!(
        zones,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "tube complete"
    );

    Ok(TubeMesh { mesh, segments })
}

/// Positional index of the forward cap in the frame's face table.
const FORWARD_FACE: usize = 4;

/// Build the cube frame and return its face keys plus the forward
/// cap's vertex ring (the active extrusion front).
fn spawn_frame(mesh: &mut PolyMesh, s: f64) -> ([FaceKey; 6], Vec<VertexKey>) {
    let v = [
        mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0)),
        mesh.add_vertex(Vertex::from_coords(0.0, s, 0.0)),
        mesh.add_vertex(Vertex::from_coords(s, s, 0.0)),
        mesh.add_vertex(Vertex::from_coords(s, 0.0, 0.0)),
        mesh.add_vertex(Vertex::from_coords(0.0, 0.0, s)),
        mesh.add_vertex(Vertex::from_coords(0.0, s, s)),
        mesh.add_vertex(Vertex::from_coords(s, s, s)),
        mesh.add_vertex(Vertex::from_coords(s, 0.0, s)),
    ];

    let faces = [
        mesh.add_face(vec![v[0], v[1], v[2], v[3]]),
        mesh.add_face(vec![v[4], v[5], v[6], v[7]]),
        mesh.add_face(vec![v[0], v[4], v[5], v[1]]),
        mesh.add_face(vec![v[1], v[5], v[6], v[2]]),
        mesh.add_face(vec![v[2], v[6], v[7], v[3]]),
        mesh.add_face(vec![v[3], v[7], v[4], v[0]]),
    ];

    // Forward cap ring, in the face's stored winding (outward +X)
    let front = vec![v[2], v[6], v[7], v[3]];
    (faces, front)
}
