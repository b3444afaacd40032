//! Random-walk path generation.

use nalgebra::Vector3;
use rand::Rng;

use crate::error::{PathError, PathResult};
use crate::params::PathParams;

/// An immutable ordered sequence of per-segment translation offsets.
///
/// Generated once from parameters and a random source, then consumed
/// by the tube builder.
#[derive(Debug, Clone, PartialEq)]
pub struct CavePath {
    offsets: Vec<Vector3<f64>>,
}

impl CavePath {
    /// Wrap a precomputed offset sequence.
    #[must_use]
    pub fn from_offsets(offsets: Vec<Vector3<f64>>) -> Self {
        Self { offsets }
    }

    /// Number of segments.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the path has no segments.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// The offsets in segment order.
    #[inline]
    #[must_use]
    pub fn offsets(&self) -> &[Vector3<f64>] {
        &self.offsets
    }

    /// Iterate over the offsets in segment order.
    pub fn iter(&self) -> impl Iterator<Item = &Vector3<f64>> + '_ {
        self.offsets.iter()
    }
}

/// Generate a random-walk path.
///
/// Each of the `zones` offsets advances `size` along X and draws its
/// Y and Z wander uniformly from `[-size, size]`, damped by the
/// respective curvature divisor. `zones == 0` yields an empty path;
/// downstream consumers decide whether that is an error.
///
/// # Errors
///
/// Returns [`PathError::InvalidParameter`] if `size` is not positive
/// and finite, or either curvature divisor is zero, negative, or not
/// finite — checked before any random draw, so a failed call consumes
/// no randomness.
pub fn generate_path<R: Rng + ?Sized>(params: &PathParams, rng: &mut R) -> PathResult<CavePath> {
    validate(params)?;

    let size = params.size;
    let mut offsets = Vec::with_capacity(params.zones as usize);
    for _ in 0..params.zones {
        let y = rng.gen_range(-size..=size) / params.y_curve;
        let z = rng.gen_range(-size..=size) / params.z_curve;
        offsets.push(Vector3::new(size, y, z));
    }

    Ok(CavePath::from_offsets(offsets))
}

fn validate(params: &PathParams) -> PathResult<()> {
    if !(params.size.is_finite() && params.size > 0.0) {
        return Err(PathError::InvalidParameter {
            name: "size",
            value: params.size,
        });
    }
    if !(params.y_curve.is_finite() && params.y_curve > 0.0) {
        return Err(PathError::InvalidParameter {
            name: "y_curve",
            value: params.y_curve,
        });
    }
    if !(params.z_curve.is_finite() && params.z_curve > 0.0) {
        return Err(PathError::InvalidParameter {
            name: "z_curve",
            value: params.z_curve,
        });
    }
    Ok(())
}
