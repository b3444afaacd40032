//! Error types for surface smoothing.

use thiserror::Error;

/// Result type for smoothing operations.
pub type SmoothResult<T> = Result<T, SmoothError>;

/// Errors that can occur during smoothing.
#[derive(Debug, Error)]
pub enum SmoothError {
    /// Mesh has no vertices.
    #[error("mesh has no vertices")]
    EmptyMesh,

    /// Mesh has no faces.
    #[error("mesh has no faces")]
    NoFaces,

    /// Invalid level count.
    #[error("invalid level count: {0} (must be >= 1)")]
    InvalidLevels(u32),

    /// Requested subdivision is beyond the safety ceiling or would
    /// exceed the face budget.
    #[error("subdivision to {levels} levels would exceed resource limits ({projected} projected faces)")]
    ResourceLimitExceeded {
        /// Requested level count.
        levels: u32,
        /// Projected face count at that level.
        projected: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_counts() {
        let err = SmoothError::ResourceLimitExceeded {
            levels: 11,
            projected: 4_000_000,
        };
        let display = format!("{err}");
        assert!(display.contains("11"));
        assert!(display.contains("4000000"));
    }
}
