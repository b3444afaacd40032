//! Error types for path generation.

use thiserror::Error;

/// Result type for path generation.
pub type PathResult<T> = Result<T, PathError>;

/// Errors that can occur during path generation.
#[derive(Debug, Error)]
pub enum PathError {
    /// A parameter is outside its valid domain.
    #[error("invalid parameter {name}: {value} (must be finite and > 0)")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
}
