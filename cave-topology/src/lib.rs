//! Destructive topology edits for cave meshes.
//!
//! Operations that restructure the tube after extrusion:
//!
//! - [`split_by_segment`]: detach each extrusion segment along its seam
//!   ring and separate the result into one mesh per segment
//! - [`split_all_edges`]: fully disconnect every face — the coarse
//!   fallback, one mesh per face
//! - [`arch_cut`]: bounded search for a loop-cut-and-slide that flattens
//!   the tube bottom into an arch profile
//! - [`separate_loose`]: split a mesh into connected components
//!
//! All operations take the mesh by reference and return new meshes;
//! selections are explicit face-key sets, never ambient state. Face
//! windows are resolved through stable keys, so a window taken from the
//! builder stays valid until an edit actually deletes its faces — at
//! which point the window is stale and the operation fails with
//! [`TopologyError::TopologyInconsistency`] instead of addressing the
//! wrong geometry.

mod adjacency;
mod arch;
mod error;
mod separate;
mod split;

pub use adjacency::MeshAdjacency;
pub use arch::{arch_cut, ArchAttemptError, ArchAttemptFailure, ArchCutOutcome, ArchParams};
pub use error::{TopologyError, TopologyResult};
pub use separate::separate_loose;
pub use split::{split_all_edges, split_by_segment, SegmentWindow, Strategy};
