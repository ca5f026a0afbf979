//! # voxa-core
//!
//! Core types for in-memory volumetric raster processing.
//!
//! This crate provides the foundational types used throughout voxa:
//!
//! - [`PixelType`] - Runtime tag for the storage kind (u8, i16, f32, f64)
//! - [`Sample`] - Storage types and their narrowing conversions
//! - [`Shape`], [`Axis`] - Volume extents and line addressing
//! - [`Volume`] - Owned slice-per-depth sample buffer
//! - [`VolumeStorage`], [`AnyVolume`], [`SliceView`] - Storage boundary used
//!   by the processing engine
//!
//! ## Crate Structure
//!
//! ```text
//! voxa-core (this crate)
//!    ^
//!    |
//!    +-- voxa-ops (combine, recursive Gaussian smoothing)
//!    +-- voxa-cli (command-line driver)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use voxa_core::prelude::*;
//!
//! let vol: Volume<f32> = Volume::filled(Shape::new(16, 16, 8), 0.5).unwrap();
//! assert_eq!(vol.pixel_type(), PixelType::F32);
//! assert_eq!(vol.slice(0).len(), 256);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod format;
pub mod sample;
pub mod shape;
pub mod storage;
pub mod volume;

pub use error::{Error, Result};
pub use format::PixelType;
pub use sample::{Sample, narrow_u8};
pub use shape::{Axis, Shape};
pub use storage::{AnyVolume, SliceView, VolumeStorage};
pub use volume::{Volume, VolumeStats};

/// Prelude module for convenient imports.
///
/// ```
/// use voxa_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::format::PixelType;
    pub use crate::sample::Sample;
    pub use crate::shape::{Axis, Shape};
    pub use crate::storage::{AnyVolume, SliceView, VolumeStorage};
    pub use crate::volume::{Volume, VolumeStats};
}
