//! Pipeline error types.

use thiserror::Error;

use cave_displace::DisplaceError;
use cave_extrude::ExtrudeError;
use cave_path::PathError;
use cave_subdivide::SmoothError;
use cave_topology::TopologyError;
use cave_types::PolyMesh;

use crate::config::ConfigError;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Eager configuration validation.
    Config,
    /// Random-walk path generation.
    Path,
    /// Tube extrusion.
    Extrude,
    /// Inward normal orientation.
    Orient,
    /// Optional arch cut.
    ArchCut,
    /// Optional segment or edge splitting.
    Split,
    /// Catmull-Clark smoothing.
    Smooth,
    /// Scallop displacement.
    Scallop,
    /// Optional penitente displacement.
    Penitente,
}

impl Stage {
    /// Stage name for logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Path => "path",
            Self::Extrude => "extrude",
            Self::Orient => "orient",
            Self::ArchCut => "arch-cut",
            Self::Split => "split",
            Self::Smooth => "smooth",
            Self::Scallop => "scallop",
            Self::Penitente => "penitente",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Any error a pipeline stage can produce.
#[derive(Debug, Error)]
pub enum CaveError {
    /// Configuration validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Path generation failed.
    #[error(transparent)]
    Path(#[from] PathError),

    /// Tube extrusion failed.
    #[error(transparent)]
    Extrude(#[from] ExtrudeError),

    /// Smoothing failed.
    #[error(transparent)]
    Smooth(#[from] SmoothError),

    /// Displacement failed.
    #[error(transparent)]
    Displace(#[from] DisplaceError),

    /// Topology edit failed.
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// The cancel token was tripped between stages.
    #[error("generation cancelled")]
    Cancelled,
}

/// A failed generation run: the stage, its error, and the mesh that
/// existed before the failing stage (when one existed), for
/// diagnostics.
#[derive(Debug, Error)]
#[error("generation failed at stage {stage}: {error}")]
pub struct GenerationFailure {
    /// Stage that failed.
    pub stage: Stage,

    /// The underlying error.
    #[source]
    pub error: CaveError,

    /// The last good mesh before the failing stage, if any mesh work
    /// had happened yet.
    pub partial: Option<PolyMesh>,
}
