//! Displacement field parameters.

use nalgebra::Vector3;

/// Scallop erosion field: cellular noise along local normals.
///
/// `scale` is the scallop diameter factor — 0.25 approaches dishes of
/// ~20cm, 1.25 approaches ~2m. Depth is governed by
/// `strength * intensity` and stays shallow regardless of diameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScallopParams {
    /// Diameter scale factor applied to sample positions.
    pub scale: f64,

    /// Noise intensity weight.
    pub intensity: f64,

    /// Displacement strength along the normal.
    pub strength: f64,

    /// Noise seed.
    pub seed: u32,
}

impl ScallopParams {
    /// Scallop field with the given diameter scale and the standard
    /// erosion weights.
    #[must_use]
    pub const fn new(scale: f64) -> Self {
        Self {
            scale,
            intensity: 0.25,
            strength: 0.25,
            seed: 0,
        }
    }

    /// Set the noise seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Set the intensity weight.
    #[must_use]
    pub const fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    /// Set the displacement strength.
    #[must_use]
    pub const fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }
}

/// Penitente spike field: fractal noise along a fixed world axis.
///
/// Defaults follow the classic snow-spike profile: 3 octaves at
/// lacunarity 2.3 with spectral dimension 1.5, pushed along +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenitenteParams {
    /// Fractal spectral dimension; per-octave gain is
    /// `lacunarity^(-dimension)`.
    pub dimension: f64,

    /// Frequency multiplier between octaves.
    pub lacunarity: f64,

    /// Number of octaves.
    pub octaves: u32,

    /// Base noise scale applied to sample positions.
    pub scale: f64,

    /// Noise intensity weight.
    pub intensity: f64,

    /// Displacement strength along the axis.
    pub strength: f64,

    /// World axis the spikes grow along.
    pub axis: Vector3<f64>,

    /// Noise seed.
    pub seed: u32,
}

impl Default for PenitenteParams {
    fn default() -> Self {
        Self {
            dimension: 1.5,
            lacunarity: 2.3,
            octaves: 3,
            scale: 1.0,
            intensity: 0.4,
            strength: 4.0,
            axis: Vector3::z(),
            seed: 0,
        }
    }
}

impl PenitenteParams {
    /// Penitente field with the standard spike profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the noise seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Set the growth axis.
    #[must_use]
    pub const fn with_axis(mut self, axis: Vector3<f64>) -> Self {
        self.axis = axis;
        self
    }
}

/// A parametric displacement field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplacementField {
    /// Cellular erosion along local normals.
    Scallop(ScallopParams),

    /// Fractal spikes along a fixed world axis.
    Penitente(PenitenteParams),
}

impl DisplacementField {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Scallop(_) => "scallop",
            Self::Penitente(_) => "penitente",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scallop_standard_weights() {
        let params = ScallopParams::new(0.5);
        assert!((params.intensity - 0.25).abs() < f64::EPSILON);
        assert!((params.strength - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn penitente_defaults() {
        let params = PenitenteParams::default();
        assert!((params.lacunarity - 2.3).abs() < f64::EPSILON);
        assert_eq!(params.octaves, 3);
        assert_eq!(params.axis, Vector3::z());
    }

    #[test]
    fn field_names() {
        assert_eq!(
            DisplacementField::Scallop(ScallopParams::new(1.0)).name(),
            "scallop"
        );
        assert_eq!(
            DisplacementField::Penitente(PenitenteParams::default()).name(),
            "penitente"
        );
    }
}
