//! Result types for smoothing operations.

// Face counts don't overflow f64 in practice
#![allow(clippy::cast_precision_loss)]

use cave_types::PolyMesh;

/// Result of surface smoothing.
#[derive(Debug, Clone)]
pub struct SmoothingResult {
    /// The smoothed mesh.
    pub mesh: PolyMesh,

    /// Number of faces in the original mesh.
    pub original_faces: usize,

    /// Number of faces in the smoothed mesh.
    pub final_faces: usize,

    /// Number of vertices in the original mesh.
    pub original_vertices: usize,

    /// Number of vertices in the smoothed mesh.
    pub final_vertices: usize,

    /// Number of levels applied.
    pub levels: u32,
}

impl SmoothingResult {
    /// Face multiplication factor.
    #[must_use]
    pub fn face_ratio(&self) -> f64 {
        if self.original_faces == 0 {
            1.0
        } else {
            self.final_faces as f64 / self.original_faces as f64
        }
    }
}

impl std::fmt::Display for SmoothingResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Smoothing: {} → {} faces ({:.1}x), {} levels",
            self.original_faces,
            self.final_faces,
            self.face_ratio(),
            self.levels
        )
    }
}
