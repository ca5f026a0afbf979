//! Error types for voxa-core operations.
//!
//! This module provides the error taxonomy shared by every volume operation.
//! The three engine errors ([`ShapeMismatch`](Error::ShapeMismatch),
//! [`UnsupportedRepresentation`](Error::UnsupportedRepresentation) and
//! [`DivideByZero`](Error::DivideByZero)) are separate variants so callers can
//! report the conflicting shapes or the offending representation tag.
//!
//! # Usage
//!
//! ```rust
//! use voxa_core::{Error, Result, Shape};
//!
//! fn check(a: Shape, b: Shape) -> Result<()> {
//!     if a != b {
//!         return Err(Error::shape_mismatch(a, b));
//!     }
//!     Ok(())
//! }
//!
//! let err = check(Shape::new(4, 4, 4), Shape::new(4, 4, 5)).unwrap_err();
//! assert!(err.to_string().contains("[4,4,5]"));
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation

use crate::shape::{Axis, Shape};
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during volume processing.
///
/// # Categories
///
/// - **Engine errors**: [`ShapeMismatch`](Error::ShapeMismatch),
///   [`UnsupportedRepresentation`](Error::UnsupportedRepresentation),
///   [`DivideByZero`](Error::DivideByZero)
/// - **Storage errors**: [`InvalidDimensions`](Error::InvalidDimensions),
///   [`OutOfBounds`](Error::OutOfBounds), [`LineLength`](Error::LineLength)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Owner and operand volumes have different shapes.
    ///
    /// Raised before any sample is touched.
    #[error("shape mismatch: owner {owner} != operand {operand}")]
    ShapeMismatch {
        /// Shape of the volume being mutated
        owner: Shape,
        /// Shape of the read-only operand
        operand: Shape,
    },

    /// The pixel representation tag is not one of the known kinds.
    #[error("unsupported pixel representation tag {tag}")]
    UnsupportedRepresentation {
        /// Raw representation tag as reported by the storage
        tag: u32,
    },

    /// An integer division hit a zero divisor.
    ///
    /// Samples processed before this position keep their new values.
    #[error("division by zero at slice {slice}, sample {index}")]
    DivideByZero {
        /// Depth slice being processed
        slice: usize,
        /// Linear sample index inside the slice
        index: usize,
    },

    /// Volume dimensions are zero or inconsistent with the supplied data.
    #[error("invalid dimensions: {shape} ({reason})")]
    InvalidDimensions {
        /// Requested shape
        shape: Shape,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// A line or slice coordinate lies outside the volume.
    #[error("{axis} line at ({a}, {b}) out of bounds for volume {shape}")]
    OutOfBounds {
        /// Axis of the requested line
        axis: Axis,
        /// First orthogonal coordinate
        a: usize,
        /// Second orthogonal coordinate
        b: usize,
        /// Volume shape
        shape: Shape,
    },

    /// A line buffer does not match the extent of its axis.
    #[error("{axis} line buffer has {got} samples, expected {expected}")]
    LineLength {
        /// Axis of the line
        axis: Axis,
        /// Axis extent
        expected: usize,
        /// Buffer length supplied
        got: usize,
    },
}

impl Error {
    /// Creates an [`Error::ShapeMismatch`] error.
    #[inline]
    pub fn shape_mismatch(owner: Shape, operand: Shape) -> Self {
        Self::ShapeMismatch { owner, operand }
    }

    /// Creates an [`Error::UnsupportedRepresentation`] error.
    #[inline]
    pub fn unsupported_representation(tag: u32) -> Self {
        Self::UnsupportedRepresentation { tag }
    }

    /// Creates an [`Error::DivideByZero`] error.
    #[inline]
    pub fn divide_by_zero(slice: usize, index: usize) -> Self {
        Self::DivideByZero { slice, index }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(shape: Shape, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            shape,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(axis: Axis, a: usize, b: usize, shape: Shape) -> Self {
        Self::OutOfBounds { axis, a, b, shape }
    }

    /// Creates an [`Error::LineLength`] error.
    #[inline]
    pub fn line_length(axis: Axis, expected: usize, got: usize) -> Self {
        Self::LineLength {
            axis,
            expected,
            got,
        }
    }

    /// Returns `true` for [`Error::ShapeMismatch`].
    #[inline]
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }

    /// Returns `true` for [`Error::UnsupportedRepresentation`].
    #[inline]
    pub fn is_unsupported_representation(&self) -> bool {
        matches!(self, Self::UnsupportedRepresentation { .. })
    }

    /// Returns `true` for [`Error::DivideByZero`].
    #[inline]
    pub fn is_divide_by_zero(&self) -> bool {
        matches!(self, Self::DivideByZero { .. })
    }

    /// Returns `true` if this is a storage access error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::LineLength { .. })
    }
}
