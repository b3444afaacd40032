//! Error types for displacement.

use thiserror::Error;

/// Result type for displacement operations.
pub type DisplaceResult<T> = Result<T, DisplaceError>;

/// Errors that can occur during displacement.
#[derive(Debug, Error)]
pub enum DisplaceError {
    /// Mesh has no vertices.
    #[error("mesh has no vertices")]
    EmptyMesh,

    /// Noise scale is not a positive finite number.
    #[error("invalid noise scale: {0} (must be finite and > 0)")]
    InvalidScale(f64),

    /// Octave count must be at least 1.
    #[error("invalid octave count: {0} (must be >= 1)")]
    InvalidOctaves(u32),

    /// Displacement axis has no direction.
    #[error("displacement axis is zero-length")]
    ZeroAxis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_value() {
        let err = DisplaceError::InvalidScale(-0.5);
        assert!(format!("{err}").contains("-0.5"));
    }
}
