//! End-to-end cave generation.
//!
//! Drives the full pipeline over an immutable [`CaveConfig`]:
//!
//! 1. Random-walk path ([`cave_path`])
//! 2. Tube extrusion ([`cave_extrude`])
//! 3. Inward normal orientation
//! 4. Optional arch cut and segment/edge splitting ([`cave_topology`])
//! 5. Catmull-Clark smoothing ([`cave_subdivide`])
//! 6. Scallop and optional penitente displacement ([`cave_displace`])
//!
//! All randomness — the path, the scallop diameter draw, the noise
//! seeds — flows from the config's single seed through one seeded
//! generator, so a config reproduces its cave exactly.
//!
//! Configuration is validated eagerly, before any mesh work. A
//! mid-pipeline failure reports the failing stage together with the
//! mesh that existed before that stage, for diagnostics. A failed arch
//! cut is the one non-fatal case: the pipeline logs it and continues
//! with the unmodified tube.
//!
//! # Example
//!
//! ```
//! use cave_pipeline::{generate, CaveConfig};
//!
//! let config = CaveConfig::default()
//!     .with_zones(2)
//!     .with_resolution(3)
//!     .with_scallop_scale(0.5)
//!     .with_seed(42);
//!
//! let output = generate(&config).unwrap();
//! assert_eq!(output.meshes.len(), 1);
//! assert!(output.final_faces > output.tube_faces);
//! ```

mod cancel;
mod config;
mod error;
mod generate;
mod output;

pub use cancel::CancelToken;
pub use config::{CaveConfig, ConfigError, SplitMode};
pub use error::{CaveError, GenerationFailure, Stage};
pub use generate::{generate, generate_with_cancel};
pub use output::CaveOutput;

// Re-export the strategy enum callers need for SplitMode
pub use cave_topology::Strategy;
