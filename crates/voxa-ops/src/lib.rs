//! # voxa-ops
//!
//! Processing operations on in-memory volumes.
//!
//! # Modules
//!
//! - [`combine`] - Elementwise max/min/add/subtract/multiply/divide into an
//!   8-bit owner volume
//! - [`smooth`] - Separable recursive Gaussian smoothing along X, Y and Z
//! - [`iir`] - Recursive convolution primitive with mirror boundaries
//! - `parallel` - Rayon versions of combine and smoothing (feature
//!   `parallel`, on by default)
//!
//! # Example
//!
//! ```rust
//! use voxa_core::{Shape, Volume};
//! use voxa_ops::{CombineOp, combine, smooth};
//!
//! let shape = Shape::new(16, 16, 4);
//! let mut mask: Volume<u8> = Volume::filled(shape, 5).unwrap();
//! let mut density: Volume<f32> = Volume::filled(shape, 9.0).unwrap();
//!
//! smooth::smooth_gaussian(&mut density, 1.0, 1.0, 0.0).unwrap();
//! combine::combine(&mut mask, &density, CombineOp::Max).unwrap();
//! assert!(mask.iter().all(|v| v >= 8));
//! ```
//!
//! # Dependencies
//!
//! - [`voxa_core`] - Volume storage and error types
//! - `tracing` - Operation logging
//! - `rayon` - Data parallelism (optional)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod combine;
pub mod iir;
pub mod smooth;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use combine::CombineOp;
pub use error::{OpsError, OpsResult};
pub use smooth::{IirCoefficients, Sigma3};
