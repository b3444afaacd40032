//! Arch profile via loop-cut-and-slide.

use hashbrown::HashMap;
use nalgebra::Point3;
use tracing::debug;

use cave_types::{FaceKey, PolyMesh, Vertex, VertexKey};

use crate::adjacency::MeshAdjacency;
use crate::error::{TopologyError, TopologyResult};

/// Parameters for the arch cut search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchParams {
    /// Maximum number of candidate edge indices to try.
    pub max_attempts: usize,

    /// Slide factor in (-1, 1): 0 leaves the new loop centered, the
    /// sign pushes it toward one side of the ring. The default slides
    /// 76.3% of the way toward the ring's start side.
    pub slide: f64,
}

impl Default for ArchParams {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            slide: -0.763_176,
        }
    }
}

impl ArchParams {
    /// Create parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attempt budget.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the slide factor.
    #[must_use]
    pub const fn with_slide(mut self, slide: f64) -> Self {
        self.slide = slide;
        self
    }
}

/// Why a single loop-cut attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchAttemptError {
    /// The candidate index is past the end of the edge list.
    EdgeIndexOutOfRange,

    /// A ring edge has more than two adjacent faces.
    NonManifoldEdge,

    /// A ring face is not a quad, so the ring cannot continue.
    NonQuadRing,
}

/// One rejected attempt, for the aggregated failure report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchAttemptFailure {
    /// Candidate edge index that was tried.
    pub edge_index: usize,

    /// Why it was rejected.
    pub reason: ArchAttemptError,
}

/// Result of a successful arch cut.
#[derive(Debug, Clone)]
pub struct ArchCutOutcome {
    /// The cut mesh.
    pub mesh: PolyMesh,

    /// Edge index the successful cut started from.
    pub edge_index: usize,

    /// Number of faces the inserted loop crosses.
    pub loop_size: usize,

    /// Attempts rejected before the success, in order.
    pub failures: Vec<ArchAttemptFailure>,
}

/// Flatten the tube toward an arch profile with a loop cut.
///
/// Tries candidate edges at increasing indices in the mesh's derived
/// edge list. For each candidate the perpendicular quad ring is
/// traversed; if it closes (or ends cleanly on boundaries) a new edge
/// loop is inserted across it, slid toward one side by the slide
/// factor. Attempts fail individually — index out of range for the
/// current topology, non-quad ring face, non-manifold ring edge — and
/// every failure is recorded; the search stops at the first success.
///
/// # Errors
///
/// - [`TopologyError::EmptyMesh`] if the mesh has no faces
/// - [`TopologyError::InvalidSlide`] if the slide factor is not inside
///   the open interval (-1, 1)
/// - [`TopologyError::ArchCutFailed`] only when every attempt in the
///   budget was rejected
pub fn arch_cut(mesh: &PolyMesh, params: &ArchParams) -> TopologyResult<ArchCutOutcome> {
    if mesh.is_empty() {
        return Err(TopologyError::EmptyMesh);
    }
    if !(params.slide.is_finite() && params.slide > -1.0 && params.slide < 1.0) {
        return Err(TopologyError::InvalidSlide(params.slide));
    }

    let edges = mesh.edge_list();
    let adjacency = MeshAdjacency::from_mesh(mesh);

    let mut failures = Vec::new();
    for edge_index in 0..params.max_attempts {
        match try_loop_cut(mesh, &edges, &adjacency, edge_index, params.slide) {
            Ok((cut, loop_size)) => {
                debug!(
                    edge_index,
                    loop_size,
                    rejected = failures.len(),
                    "arch cut succeeded"
                );
                return Ok(ArchCutOutcome {
                    mesh: cut,
                    edge_index,
                    loop_size,
                    failures,
                });
            }
            Err(reason) => failures.push(ArchAttemptFailure { edge_index, reason }),
        }
    }

    Err(TopologyError::ArchCutFailed {
        attempts: params.max_attempts,
    })
}

/// Per-face record of the ring traversal: the face and its two crossed
/// edges (normalized).
type RingRecord = (FaceKey, (VertexKey, VertexKey), (VertexKey, VertexKey));

/// Attempt a loop cut starting at one candidate edge.
fn try_loop_cut(
    mesh: &PolyMesh,
    edges: &[(VertexKey, VertexKey)],
    adjacency: &MeshAdjacency,
    edge_index: usize,
    slide: f64,
) -> Result<(PolyMesh, usize), ArchAttemptError> {
    let &start = edges
        .get(edge_index)
        .ok_or(ArchAttemptError::EdgeIndexOutOfRange)?;

    let (records, crossed) = trace_ring(mesh, adjacency, start)?;

    // Interpolation parameter along each crossed edge's stored
    // orientation: slide -1 lands on the start side, +1 on the far side
    let t = (1.0 + slide) / 2.0;

    let mut cut = mesh.clone();
    let mut loop_vertices: HashMap<(VertexKey, VertexKey), VertexKey> =
        HashMap::with_capacity(crossed.len());
    for (normalized, (u, v)) in &crossed {
        let a = cut.position(*u);
        let b = cut.position(*v);
        let position = Point3::from(a.coords + t * (b.coords - a.coords));
        loop_vertices.insert(*normalized, cut.add_vertex(Vertex::new(position)));
    }

    for &(face, in_edge, out_edge) in &records {
        rewrite_ring_face(&mut cut, face, in_edge, out_edge, &loop_vertices);
    }

    Ok((cut, records.len()))
}

/// Walk the quad ring perpendicular to `start`, in both directions for
/// open strips. Returns per-face records and the crossed edges with a
/// consistent orientation.
#[allow(clippy::type_complexity)]
fn trace_ring(
    mesh: &PolyMesh,
    adjacency: &MeshAdjacency,
    start: (VertexKey, VertexKey),
) -> Result<
    (
        Vec<RingRecord>,
        Vec<((VertexKey, VertexKey), (VertexKey, VertexKey))>,
    ),
    ArchAttemptError,
> {
    let start_faces = adjacency
        .faces_for_edge(start.0, start.1)
        .ok_or(ArchAttemptError::EdgeIndexOutOfRange)?;
    if start_faces.len() > 2 {
        return Err(ArchAttemptError::NonManifoldEdge);
    }

    let mut records: Vec<RingRecord> = Vec::new();
    // Crossed edges as (normalized, oriented), in encounter order
    let mut crossed: Vec<((VertexKey, VertexKey), (VertexKey, VertexKey))> =
        vec![(normalize_edge(start.0, start.1), start)];
    let mut closed = false;

    walk(
        mesh,
        adjacency,
        start_faces[0],
        start,
        &mut records,
        &mut crossed,
        &mut closed,
    )?;

    if !closed {
        if let Some(&second) = start_faces.get(1) {
            walk(
                mesh,
                adjacency,
                second,
                start,
                &mut records,
                &mut crossed,
                &mut closed,
            )?;
        }
    }

    Ok((records, crossed))
}

/// Walk one direction of the ring until it closes or reaches a
/// boundary, appending to the shared records.
fn walk(
    mesh: &PolyMesh,
    adjacency: &MeshAdjacency,
    first_face: FaceKey,
    start: (VertexKey, VertexKey),
    records: &mut Vec<RingRecord>,
    crossed: &mut Vec<((VertexKey, VertexKey), (VertexKey, VertexKey))>,
    closed: &mut bool,
) -> Result<(), ArchAttemptError> {
    let start_normalized = normalize_edge(start.0, start.1);
    let mut face = first_face;
    let mut entering = start;

    // The ring can visit each face at most once
    for _ in 0..mesh.face_count() {
        let ring = mesh.face(face).ok_or(ArchAttemptError::EdgeIndexOutOfRange)?;
        if ring.len() != 4 {
            return Err(ArchAttemptError::NonQuadRing);
        }

        let exit = opposite_edge(ring, entering).ok_or(ArchAttemptError::NonQuadRing)?;
        let exit_normalized = normalize_edge(exit.0, exit.1);
        records.push((face, normalize_edge(entering.0, entering.1), exit_normalized));

        if exit_normalized == start_normalized {
            *closed = true;
            return Ok(());
        }

        let adjacent = adjacency
            .faces_for_edge(exit.0, exit.1)
            .ok_or(ArchAttemptError::EdgeIndexOutOfRange)?;
        if adjacent.len() > 2 {
            return Err(ArchAttemptError::NonManifoldEdge);
        }
        if !crossed.iter().any(|&(n, _)| n == exit_normalized) {
            crossed.push((exit_normalized, exit));
        }

        match adjacent.iter().find(|&&f| f != face) {
            Some(&next) => {
                entering = exit;
                face = next;
            }
            // Boundary: open strip ends here
            None => return Ok(()),
        }
    }
    Ok(())
}

/// Exit edge of a quad, oriented so the entering edge's first endpoint
/// corresponds to the exit edge's first endpoint across the strip.
fn opposite_edge(
    ring: &[VertexKey],
    entering: (VertexKey, VertexKey),
) -> Option<(VertexKey, VertexKey)> {
    for j in 0..4 {
        let a = ring[j];
        let b = ring[(j + 1) % 4];
        if (a, b) == entering {
            return Some((ring[(j + 3) % 4], ring[(j + 2) % 4]));
        }
        if (b, a) == entering {
            return Some((ring[(j + 2) % 4], ring[(j + 3) % 4]));
        }
    }
    None
}

/// Split one ring quad into two along the new loop.
fn rewrite_ring_face(
    mesh: &mut PolyMesh,
    face: FaceKey,
    in_edge: (VertexKey, VertexKey),
    out_edge: (VertexKey, VertexKey),
    loop_vertices: &HashMap<(VertexKey, VertexKey), VertexKey>,
) {
    let Some(ring) = mesh.face(face) else {
        return;
    };
    let ring: Vec<VertexKey> = ring.to_vec();

    // Locate the entering edge's pair position
    let Some(j) = (0..4).find(|&j| {
        normalize_edge(ring[j], ring[(j + 1) % 4]) == in_edge
    }) else {
        return;
    };
    let (Some(&m_in), Some(&m_out)) = (loop_vertices.get(&in_edge), loop_vertices.get(&out_edge))
    else {
        return;
    };

    let p0 = ring[j];
    let p1 = ring[(j + 1) % 4];
    let p2 = ring[(j + 2) % 4];
    let p3 = ring[(j + 3) % 4];

    mesh.remove_face(face);
    mesh.add_face(vec![p0, m_in, m_out, p3]);
    mesh.add_face(vec![m_in, p1, p2, m_out]);
}

/// Normalize edge endpoints so the smaller key comes first.
#[inline]
fn normalize_edge(a: VertexKey, b: VertexKey) -> (VertexKey, VertexKey) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cave_extrude::build_tube;
    use cave_path::CavePath;
    use nalgebra::Vector3;

    fn tube_mesh(zones: usize) -> PolyMesh {
        let path = CavePath::from_offsets(vec![Vector3::new(5.0, 0.0, 0.0); zones]);
        build_tube(5.0, &path).unwrap().mesh
    }

    #[test]
    fn default_params() {
        let params = ArchParams::default();
        assert_eq!(params.max_attempts, 100);
        assert!((params.slide + 0.763_176).abs() < 1e-9);
    }

    #[test]
    fn tube_cut_succeeds_with_recorded_failures() {
        let mesh = tube_mesh(3);
        let outcome = arch_cut(&mesh, &ArchParams::default()).unwrap();

        // A closed quad ring crosses 4 faces: 4 new vertices, each ring
        // quad split in two
        assert_eq!(outcome.loop_size, 4);
        assert_eq!(outcome.mesh.vertex_count(), mesh.vertex_count() + 4);
        assert_eq!(outcome.mesh.face_count(), mesh.face_count() + 4);

        // Earlier candidates that hit membrane edges were recorded
        assert_eq!(outcome.failures.len(), outcome.edge_index);
        for (i, failure) in outcome.failures.iter().enumerate() {
            assert_eq!(failure.edge_index, i);
        }
    }

    #[test]
    fn cut_is_deterministic() {
        let mesh = tube_mesh(3);
        let a = arch_cut(&mesh, &ArchParams::default()).unwrap();
        let b = arch_cut(&mesh, &ArchParams::default()).unwrap();
        assert_eq!(a.edge_index, b.edge_index);
        assert_eq!(
            a.mesh.to_buffers().positions,
            b.mesh.to_buffers().positions
        );
    }

    #[test]
    fn new_loop_sits_at_slide_fraction() {
        let mesh = tube_mesh(2);
        let params = ArchParams::default();
        let outcome = arch_cut(&mesh, &params).unwrap();
        let t = (1.0 + params.slide) / 2.0;

        // Each inserted vertex divides its crossed edge at t (or 1 - t,
        // depending on the edge's stored orientation)
        let original = mesh.to_buffers();
        for position in &outcome.mesh.to_buffers().positions[original.positions.len()..] {
            let p = Point3::new(position[0], position[1], position[2]);
            let on_split = mesh.edge_list().iter().any(|&(a, b)| {
                let pa = mesh.position(a);
                let pb = mesh.position(b);
                let at_t = pa.coords + t * (pb.coords - pa.coords);
                let at_inv = pb.coords + t * (pa.coords - pb.coords);
                (p.coords - at_t).norm() < 1e-9 || (p.coords - at_inv).norm() < 1e-9
            });
            assert!(on_split, "loop vertex {p:?} not on any split edge");
        }
    }

    #[test]
    fn all_quads_after_cut() {
        let mesh = tube_mesh(3);
        let outcome = arch_cut(&mesh, &ArchParams::default()).unwrap();
        for (_, ring) in outcome.mesh.faces() {
            assert_eq!(ring.len(), 4);
        }
    }

    #[test]
    fn triangle_mesh_exhausts_attempts() {
        use cave_types::Vertex;

        let mut mesh = PolyMesh::new();
        let a = mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.add_face(vec![a, b, c]);

        let params = ArchParams::default().with_max_attempts(10);
        let result = arch_cut(&mesh, &params);
        assert!(matches!(
            result,
            Err(TopologyError::ArchCutFailed { attempts: 10 })
        ));
    }

    #[test]
    fn invalid_slide_rejected() {
        let mesh = tube_mesh(1);
        let params = ArchParams::default().with_slide(1.5);
        assert!(matches!(
            arch_cut(&mesh, &params),
            Err(TopologyError::InvalidSlide(_))
        ));
    }

    #[test]
    fn empty_mesh_rejected() {
        let mesh = PolyMesh::new();
        assert!(matches!(
            arch_cut(&mesh, &ArchParams::default()),
            Err(TopologyError::EmptyMesh)
        ));
    }
}
