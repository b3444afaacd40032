//! Tube extrusion along a cave path.
//!
//! Builds the cave's base geometry: a cube frame extruded
//! segment-by-segment along a random-walk path into a connected,
//! open-ended tube. Each extrusion step records a [`SegmentHandle`] —
//! stable face keys for the step's 4 side walls and its cross-section
//! cap — so later topology edits can address a segment without relying
//! on positional face indices.
//!
//! Extrusion winds faces outward; [`orient_inward`] flips the winding
//! so normals face the cave interior.
//!
//! # Example
//!
//! ```
//! use cave_extrude::{build_tube, orient_inward};
//! use cave_path::CavePath;
//! use nalgebra::Vector3;
//!
//! let path = CavePath::from_offsets(vec![
//!     Vector3::new(5.0, 1.0, 0.5),
//!     Vector3::new(5.0, -2.0, 0.0),
//! ]);
//!
//! let mut tube = build_tube(5.0, &path).unwrap();
//! assert_eq!(tube.mesh.vertex_count(), 8 + 4 * 2);
//! assert_eq!(tube.mesh.face_count(), 6 + 5 * 2 - 2);
//!
//! orient_inward(&mut tube.mesh);
//! ```

mod error;
mod orient;
mod tube;

pub use error::{ExtrudeError, ExtrudeResult};
pub use orient::orient_inward;
pub use tube::{build_tube, SegmentHandle, TubeMesh};
