//! Surface smoothing for cave tubes.
//!
//! The extruded tube is a chain of boxes; this crate rounds it into a
//! smooth, roughly circular cross-section with Catmull-Clark
//! subdivision. Each level replaces every n-gon with n quads, so face
//! count grows roughly fourfold per level — the level count is checked
//! against a hard ceiling and a projected face budget before any work
//! happens.
//!
//! # Example
//!
//! ```
//! use cave_subdivide::{smooth_mesh, SmoothParams};
//! use cave_types::{PolyMesh, Vertex};
//!
//! let mut mesh = PolyMesh::new();
//! let a = mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
//! let b = mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
//! let c = mesh.add_vertex(Vertex::from_coords(1.0, 1.0, 0.0));
//! let d = mesh.add_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
//! mesh.add_face(vec![a, b, c, d]);
//!
//! let result = smooth_mesh(&mesh, &SmoothParams::default()).unwrap();
//! assert_eq!(result.final_faces, 4);
//! assert_eq!(result.final_vertices, 9);
//! ```

mod error;
mod params;
mod result;
mod subdivide;

pub use error::{SmoothError, SmoothResult};
pub use params::{SmoothParams, MAX_LEVELS};
pub use result::SmoothingResult;
pub use subdivide::smooth_mesh;
