//! Error types for tube extrusion.

use thiserror::Error;

/// Result type for tube extrusion.
pub type ExtrudeResult<T> = Result<T, ExtrudeError>;

/// Errors that can occur while building the tube.
#[derive(Debug, Error)]
pub enum ExtrudeError {
    /// The path has zero segments; there is nothing to cave out.
    #[error("path has no segments, nothing to extrude")]
    EmptyPath,

    /// The cube edge length is not a positive finite number.
    #[error("invalid frame size: {0} (must be finite and > 0)")]
    InvalidSize(f64),
}
