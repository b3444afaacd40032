//! Normal orientation.

use cave_types::PolyMesh;
use tracing::debug;

/// Flip every face so normals point toward the tube interior.
///
/// Extrusion winds faces outward; a cave is viewed from inside, so the
/// whole mesh is reversed once after building. The operation is an
/// involution: applying it twice restores the original winding.
///
/// # Example
///
/// ```
/// use cave_extrude::{build_tube, orient_inward};
/// use cave_path::CavePath;
/// use nalgebra::Vector3;
///
/// let path = CavePath::from_offsets(vec![Vector3::new(5.0, 0.0, 0.0)]);
/// let mut tube = build_tube(5.0, &path).unwrap();
///
/// let before = tube.mesh.to_buffers();
/// orient_inward(&mut tube.mesh);
/// orient_inward(&mut tube.mesh);
/// assert_eq!(tube.mesh.to_buffers().faces, before.faces);
/// ```
pub fn orient_inward(mesh: &mut PolyMesh) {
    mesh.flip_winding();
    debug!(faces = mesh.face_count(), "flipped winding inward");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::build_tube;
    use cave_path::CavePath;
    use nalgebra::Vector3;

    #[test]
    fn double_application_restores_winding() {
        let path = CavePath::from_offsets(vec![
            Vector3::new(5.0, 1.0, 0.2),
            Vector3::new(5.0, -0.5, 1.0),
        ]);
        let mut tube = build_tube(5.0, &path).unwrap();
        let original: Vec<Vec<u32>> = tube.mesh.to_buffers().faces;

        orient_inward(&mut tube.mesh);
        let flipped: Vec<Vec<u32>> = tube.mesh.to_buffers().faces;
        assert_ne!(original, flipped);

        orient_inward(&mut tube.mesh);
        assert_eq!(tube.mesh.to_buffers().faces, original);
    }

    #[test]
    fn inward_bottom_face_points_up() {
        let path = CavePath::from_offsets(vec![Vector3::new(1.0, 0.0, 0.0)]);
        let mut tube = build_tube(1.0, &path).unwrap();
        orient_inward(&mut tube.mesh);

        let bottom = tube.mesh.face_at(0).unwrap();
        let n = tube.mesh.face_normal(bottom).unwrap();
        assert!((n - Vector3::z()).norm() < 1e-12);
    }
}
