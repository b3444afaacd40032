//! Random-walk centerline generation for cave tunnels.
//!
//! A cave's shape starts as a path: one translation offset per tunnel
//! segment. Each offset advances a fixed distance along X and wanders
//! in Y and Z, with the wander amplitude damped by per-axis curvature
//! divisors (a large divisor gives a straighter cave).
//!
//! Randomness is injected through any [`rand::Rng`], so a seeded
//! generator reproduces the same path exactly.
//!
//! # Example
//!
//! ```
//! use cave_path::{generate_path, PathParams};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let params = PathParams::default().with_zones(5);
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//!
//! let path = generate_path(&params, &mut rng).unwrap();
//! assert_eq!(path.len(), 5);
//! // Every segment advances a full step along X
//! assert!(path.iter().all(|o| (o.x - params.size).abs() < 1e-12));
//! ```

mod error;
mod params;
mod path;

pub use error::{PathError, PathResult};
pub use params::PathParams;
pub use path::{generate_path, CavePath};
