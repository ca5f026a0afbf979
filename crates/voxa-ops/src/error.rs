//! Error types for volume operations.

use thiserror::Error;

/// Error type for volume operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    /// Error raised by the volume storage or the engine checks
    /// (shape mismatch, unsupported representation, division by zero).
    #[error(transparent)]
    Core(#[from] voxa_core::Error),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl OpsError {
    /// Returns `true` if the operand shape differed from the owner shape.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_shape_mismatch())
    }

    /// Returns `true` if the operand representation tag was unknown.
    pub fn is_unsupported_representation(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_unsupported_representation())
    }

    /// Returns `true` if a division hit a zero divisor.
    pub fn is_divide_by_zero(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_divide_by_zero())
    }
}

/// Result type for volume operations.
pub type OpsResult<T> = Result<T, OpsError>;
