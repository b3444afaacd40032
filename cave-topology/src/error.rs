//! Error types for topology edits.

use thiserror::Error;

/// Result type for topology edits.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors that can occur during topology edits.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// Mesh has no faces to operate on.
    #[error("mesh is empty")]
    EmptyMesh,

    /// No segment windows were supplied.
    #[error("no segment windows to split")]
    NoSegments,

    /// A face window no longer matches the mesh — stale after a prior
    /// structural edit. Programmer error; fatal, not retried.
    #[error("inconsistent topology: {reason}")]
    TopologyInconsistency {
        /// What failed to resolve.
        reason: String,
    },

    /// Every loop-cut attempt was rejected.
    #[error("arch cut failed: all {attempts} loop-cut attempts were rejected")]
    ArchCutFailed {
        /// Number of attempts made.
        attempts: usize,
    },

    /// Slide factor outside the open interval (-1, 1).
    #[error("invalid slide factor: {0} (must be within (-1, 1))")]
    InvalidSlide(f64),
}
