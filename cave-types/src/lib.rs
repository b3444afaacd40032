//! Core mesh types for cave generation.
//!
//! This crate provides the foundational types shared by the cave
//! generation pipeline:
//!
//! - [`PolyMesh`] - A polygon mesh with stable vertex/face handles
//! - [`Vertex`] - A point in 3D space with an optional normal
//! - [`VertexKey`] / [`FaceKey`] - Stable identifiers for mesh elements
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`MeshBuffers`] - Flat export arrays for renderers and exporters
//!
//! # Stable handles
//!
//! Faces reference vertices by [`VertexKey`], not by position in a
//! vertex array. Keys are handed out monotonically and never reused, so
//! a handle taken before a destructive edit (face deletion, seam
//! splitting) still addresses the same element afterwards. Positional
//! views (flat index arrays) are derived lazily at export time.
//!
//! # Winding
//!
//! Faces are wound counter-clockwise when viewed from outside, so
//! computed normals point outward by the right-hand rule. Cave meshes
//! are flipped to face inward as a pipeline stage.
//!
//! # Example
//!
//! ```
//! use cave_types::{PolyMesh, Vertex};
//!
//! let mut mesh = PolyMesh::new();
//! let a = mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
//! let b = mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
//! let c = mesh.add_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
//! let face = mesh.add_face(vec![a, b, c]);
//!
//! assert_eq!(mesh.vertex_count(), 3);
//! assert_eq!(mesh.face_count(), 1);
//! assert!(mesh.contains_face(face));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod key;
mod mesh;
mod vertex;

pub use bounds::Aabb;
pub use key::{FaceKey, VertexKey};
pub use mesh::{MeshBuffers, PolyMesh};
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
