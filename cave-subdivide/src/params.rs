//! Smoothing parameters.

/// Hard ceiling on subdivision levels.
///
/// Face count grows ~4x per level; past this point even a bare tube
/// produces tens of millions of faces.
pub const MAX_LEVELS: u32 = 10;

/// Parameters for surface smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothParams {
    /// Number of subdivision levels. Recommended range 3-8, hard
    /// ceiling [`MAX_LEVELS`].
    pub levels: u32,

    /// Maximum faces allowed in the result.
    pub max_faces: usize,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self {
            levels: 1,
            max_faces: 10_000_000,
        }
    }
}

impl SmoothParams {
    /// Create parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the level count.
    #[must_use]
    pub const fn with_levels(mut self, levels: u32) -> Self {
        self.levels = levels;
        self
    }

    /// Set the face budget.
    #[must_use]
    pub const fn with_max_faces(mut self, max_faces: usize) -> Self {
        self.max_faces = max_faces;
        self
    }
}
