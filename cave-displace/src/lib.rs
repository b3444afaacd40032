//! Procedural surface displacement for cave walls.
//!
//! Turns a smooth tube into a natural-looking cave surface by offsetting
//! vertices with noise fields:
//!
//! - **Scallop**: cellular (Worley) noise along each vertex's local
//!   normal — the dish-shaped erosion pattern water leaves on cave walls
//! - **Penitente**: multi-octave fractal noise along a fixed world axis —
//!   fields of upward ice spikes
//!
//! Fields are pure functions of position: the same seed and mesh always
//! produce the same surface. Per-vertex evaluation is embarrassingly
//! parallel and runs on a rayon worker pool over the read-only input.
//!
//! # Example
//!
//! ```
//! use cave_displace::{displace_mesh, DisplacementField, ScallopParams};
//! use cave_types::{PolyMesh, Vertex};
//!
//! let mut mesh = PolyMesh::new();
//! let a = mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
//! let b = mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
//! let c = mesh.add_vertex(Vertex::from_coords(1.0, 1.0, 0.0));
//! let d = mesh.add_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
//! mesh.add_face(vec![a, b, c, d]);
//!
//! let field = DisplacementField::Scallop(ScallopParams::new(0.5).with_seed(42));
//! let rough = displace_mesh(&mesh, &field).unwrap();
//! assert_eq!(rough.vertex_count(), mesh.vertex_count());
//! ```

mod displace;
mod error;
mod field;

pub use displace::displace_mesh;
pub use error::{DisplaceError, DisplaceResult};
pub use field::{DisplacementField, PenitenteParams, ScallopParams};
