//! Generation configuration.

use thiserror::Error;

use cave_topology::Strategy;

/// Allowed range for the scallop diameter scale; the default draw is
/// uniform over this range.
pub const SCALLOP_SCALE_RANGE: (f64, f64) = (0.25, 1.25);

/// How to split the tube at the end of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// One mesh per extrusion segment, cut along seam rings.
    Segments(Strategy),

    /// One mesh per face — the coarse fallback.
    Faces,
}

/// Immutable parameter set for one generation run.
///
/// Built once, validated eagerly by [`generate`](crate::generate), and
/// threaded through every stage; no stage reads ambient state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaveConfig {
    /// Number of cave segments; total length is `zones * size`.
    /// Range 1..=50.
    pub zones: u32,

    /// Size in scene units per cave segment. Range (0, 10].
    pub size: f64,

    /// Y-plane curvature divisor; larger is straighter. Must be > 0.
    pub y_curve: f64,

    /// Z-plane curvature divisor; larger is more level. Must be > 0.
    pub z_curve: f64,

    /// Surface resolution (subdivision levels). Range 3..=8.
    pub resolution: u32,

    /// Scallop diameter scale in [0.25, 1.25]; `None` draws it
    /// uniformly from that range with the run's seed.
    pub scallop_scale: Option<f64>,

    /// Overlay a penitente spike field.
    pub penitentes: bool,

    /// Flatten the tube bottom into an arch profile.
    pub arch: bool,

    /// Split the result into independent meshes.
    pub split: Option<SplitMode>,

    /// Master seed for the whole run.
    pub seed: u64,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            zones: 3,
            size: 5.0,
            y_curve: 0.5,
            z_curve: 5.0,
            resolution: 8,
            scallop_scale: None,
            penitentes: false,
            arch: false,
            split: None,
            seed: 0,
        }
    }
}

impl CaveConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the segment count.
    #[must_use]
    pub const fn with_zones(mut self, zones: u32) -> Self {
        self.zones = zones;
        self
    }

    /// Set the per-segment size.
    #[must_use]
    pub const fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Set the Y curvature divisor.
    #[must_use]
    pub const fn with_y_curve(mut self, y_curve: f64) -> Self {
        self.y_curve = y_curve;
        self
    }

    /// Set the Z curvature divisor.
    #[must_use]
    pub const fn with_z_curve(mut self, z_curve: f64) -> Self {
        self.z_curve = z_curve;
        self
    }

    /// Set the surface resolution.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Fix the scallop diameter scale instead of drawing it.
    #[must_use]
    pub const fn with_scallop_scale(mut self, scale: f64) -> Self {
        self.scallop_scale = Some(scale);
        self
    }

    /// Enable the penitente spike field.
    #[must_use]
    pub const fn with_penitentes(mut self, enabled: bool) -> Self {
        self.penitentes = enabled;
        self
    }

    /// Enable the arch cut.
    #[must_use]
    pub const fn with_arch(mut self, enabled: bool) -> Self {
        self.arch = enabled;
        self
    }

    /// Split the result at the end of the run.
    #[must_use]
    pub const fn with_split(mut self, mode: SplitMode) -> Self {
        self.split = Some(mode);
        self
    }

    /// Set the master seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate every parameter against its documented range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvalidParameter`] found, with
    /// the parameter's name, value, and allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zones < 1 || self.zones > 50 {
            return Err(ConfigError::InvalidParameter {
                name: "zones",
                value: f64::from(self.zones),
                min: 1.0,
                max: 50.0,
            });
        }
        if !(self.size.is_finite() && self.size > 0.0 && self.size <= 10.0) {
            return Err(ConfigError::InvalidParameter {
                name: "size",
                value: self.size,
                min: 0.0,
                max: 10.0,
            });
        }
        if !(self.y_curve.is_finite() && self.y_curve > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "y_curve",
                value: self.y_curve,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        if !(self.z_curve.is_finite() && self.z_curve > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "z_curve",
                value: self.z_curve,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        if self.resolution < 3 || self.resolution > 8 {
            return Err(ConfigError::InvalidParameter {
                name: "resolution",
                value: f64::from(self.resolution),
                min: 3.0,
                max: 8.0,
            });
        }
        if let Some(scale) = self.scallop_scale {
            let (min, max) = SCALLOP_SCALE_RANGE;
            if !(scale.is_finite() && scale >= min && scale <= max) {
                return Err(ConfigError::InvalidParameter {
                    name: "scallop_scale",
                    value: scale,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Errors from configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A parameter is outside its documented range.
    #[error("invalid parameter {name}: {value} (allowed range {min}..={max})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// Lower bound (exclusive for continuous parameters at 0).
        min: f64,
        /// Upper bound.
        max: f64,
    },
}
