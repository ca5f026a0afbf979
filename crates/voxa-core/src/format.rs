//! Pixel representations.
//!
//! [`PixelType`] is the runtime tag for the numeric storage kind of a
//! volume. Each kind has a stable numeric tag so external storage can report
//! its representation without sharing Rust types:
//!
//! | Kind  | Tag | Storage |
//! |-------|-----|---------|
//! | `U8`  | 1   | `u8`    |
//! | `I16` | 2   | `i16`   |
//! | `F32` | 3   | `f32`   |
//! | `F64` | 4   | `f64`   |
//!
//! # Usage
//!
//! ```rust
//! use voxa_core::PixelType;
//!
//! let kind = PixelType::from_code(3).unwrap();
//! assert_eq!(kind, PixelType::F32);
//! assert!(kind.is_float());
//! assert!(PixelType::from_code(7).is_err());
//! ```

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Numeric storage kind of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelType {
    /// 8-bit unsigned integer.
    #[default]
    U8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit single-precision float.
    F32,
    /// 64-bit double-precision float.
    F64,
}

impl PixelType {
    /// All known kinds.
    pub const ALL: [PixelType; 4] = [Self::U8, Self::I16, Self::F32, Self::F64];

    /// Stable numeric tag.
    #[inline]
    pub const fn code(&self) -> u32 {
        match self {
            Self::U8 => 1,
            Self::I16 => 2,
            Self::F32 => 3,
            Self::F64 => 4,
        }
    }

    /// Decodes a numeric tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedRepresentation`] for unknown tags.
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            1 => Ok(Self::U8),
            2 => Ok(Self::I16),
            3 => Ok(Self::F32),
            4 => Ok(Self::F64),
            other => Err(Error::unsupported_representation(other)),
        }
    }

    /// Number of bits per sample.
    #[inline]
    pub const fn bits(&self) -> u32 {
        match self {
            Self::U8 => 8,
            Self::I16 => 16,
            Self::F32 => 32,
            Self::F64 => 64,
        }
    }

    /// Number of bytes per sample.
    #[inline]
    pub const fn bytes(&self) -> usize {
        (self.bits() / 8) as usize
    }

    /// Whether this is a floating-point kind.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Short name for display.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelType {
    type Err = String;

    /// Parses `u8`/`byte`, `i16`/`short`, `f32`/`float`, `f64`/`double`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "u8" | "byte" => Ok(Self::U8),
            "i16" | "short" => Ok(Self::I16),
            "f32" | "float" => Ok(Self::F32),
            "f64" | "double" => Ok(Self::F64),
            other => Err(format!("unknown pixel type '{other}' (expected u8, i16, f32, f64)")),
        }
    }
}
