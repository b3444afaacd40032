//! Stable identifiers for mesh elements.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier for a vertex.
///
/// Keys are assigned monotonically by [`PolyMesh`](crate::PolyMesh) and
/// never reused, so a key remains a valid reference to the same vertex
/// across structural edits until that vertex is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexKey(pub(crate) u32);

impl VertexKey {
    /// Raw key value, for diagnostics and error messages.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Stable identifier for a face.
///
/// Same lifecycle as [`VertexKey`]: monotonic, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceKey(pub(crate) u32);

impl FaceKey {
    /// Raw key value, for diagnostics and error messages.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_ordered_by_creation() {
        assert!(VertexKey(0) < VertexKey(1));
        assert!(FaceKey(3) > FaceKey(2));
    }

    #[test]
    fn raw_round_trip() {
        assert_eq!(VertexKey(7).raw(), 7);
        assert_eq!(FaceKey(11).raw(), 11);
    }
}
