//! Generation report.

use cave_path::CavePath;
use cave_types::PolyMesh;

/// The product of one generation run.
///
/// `meshes` holds a single mesh unless a split mode was configured.
#[derive(Debug, Clone)]
pub struct CaveOutput {
    /// Final mesh, or one mesh per part after splitting.
    pub meshes: Vec<PolyMesh>,

    /// The path the tube was extruded along.
    pub path: CavePath,

    /// The scallop diameter scale used (configured or drawn).
    pub scallop_scale: f64,

    /// Edge index the arch cut succeeded at, when one was applied.
    pub arch_edge: Option<usize>,

    /// Vertex count of the raw tube, before smoothing.
    pub tube_vertices: usize,

    /// Face count of the raw tube, before smoothing.
    pub tube_faces: usize,

    /// Total vertex count across final meshes.
    pub final_vertices: usize,

    /// Total face count across final meshes.
    pub final_faces: usize,
}

impl CaveOutput {
    /// The primary mesh (the only one unless a split was requested).
    #[must_use]
    pub fn first_mesh(&self) -> Option<&PolyMesh> {
        self.meshes.first()
    }
}

impl std::fmt::Display for CaveOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cave: {} zones, {} mesh(es), tube {}v/{}f → final {}v/{}f, scallop scale {:.3}",
            self.path.len(),
            self.meshes.len(),
            self.tube_vertices,
            self.tube_faces,
            self.final_vertices,
            self.final_faces,
            self.scallop_scale
        )
    }
}
