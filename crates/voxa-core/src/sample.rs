//! Sample types and narrowing conversions.
//!
//! The [`Sample`] trait is implemented for the four storage types of a
//! volume (`u8`, `i16`, `f32`, `f64`). It carries two conversion rules:
//!
//! - **Narrowing to u8** ([`Sample::narrow_u8`]): the low 8 bits of the
//!   truncated integer value of the sample. Floats are truncated toward zero
//!   into an `i32` first (saturating at the `i32` range, NaN becomes 0), then
//!   wrapped. No clamping and no rounding are applied.
//! - **Storing a real value** ([`Sample::from_f64`]): the same
//!   truncate-then-wrap rule for integer kinds, a plain cast for floats.
//!
//! ```rust
//! use voxa_core::Sample;
//!
//! assert_eq!(300i16.narrow_u8(), 44);
//! assert_eq!((-1.5f32).narrow_u8(), 255);
//! assert_eq!(1000.0f64.narrow_u8(), 232);
//! assert_eq!(f64::NAN.narrow_u8(), 0);
//! ```

use crate::format::PixelType;
use crate::storage::SliceView;
use std::fmt;

/// Storage type of a volume sample.
pub trait Sample: Copy + Default + PartialOrd + fmt::Debug + Send + Sync + 'static {
    /// Runtime tag of this storage type.
    const TYPE: PixelType;

    /// Narrows to 8 bits: integer truncation, then the low byte.
    fn narrow_u8(self) -> u8;

    /// Widens to a real line sample.
    fn to_f64(self) -> f64;

    /// Stores a real line sample with truncate-then-wrap semantics.
    fn from_f64(v: f64) -> Self;

    /// Borrows a slice of this type as a runtime-typed view.
    fn view(slice: &[Self]) -> SliceView<'_>;
}

impl Sample for u8 {
    const TYPE: PixelType = PixelType::U8;

    #[inline]
    fn narrow_u8(self) -> u8 {
        self
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as i32 as u8
    }

    #[inline]
    fn view(slice: &[Self]) -> SliceView<'_> {
        SliceView::U8(slice)
    }
}

impl Sample for i16 {
    const TYPE: PixelType = PixelType::I16;

    #[inline]
    fn narrow_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as i32 as i16
    }

    #[inline]
    fn view(slice: &[Self]) -> SliceView<'_> {
        SliceView::I16(slice)
    }
}

impl Sample for f32 {
    const TYPE: PixelType = PixelType::F32;

    #[inline]
    fn narrow_u8(self) -> u8 {
        self as i32 as u8
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn view(slice: &[Self]) -> SliceView<'_> {
        SliceView::F32(slice)
    }
}

impl Sample for f64 {
    const TYPE: PixelType = PixelType::F64;

    #[inline]
    fn narrow_u8(self) -> u8 {
        self as i32 as u8
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn view(slice: &[Self]) -> SliceView<'_> {
        SliceView::F64(slice)
    }
}

/// Narrows any sample to 8 bits. See [`Sample::narrow_u8`].
#[inline]
pub fn narrow_u8<T: Sample>(value: T) -> u8 {
    value.narrow_u8()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_identity() {
        for v in [0u8, 1, 127, 128, 255] {
            assert_eq!(v.narrow_u8(), v);
        }
    }

    #[test]
    fn test_i16_low_byte() {
        assert_eq!(5i16.narrow_u8(), 5);
        assert_eq!(255i16.narrow_u8(), 255);
        assert_eq!(256i16.narrow_u8(), 0);
        assert_eq!(300i16.narrow_u8(), 44);
        assert_eq!((-1i16).narrow_u8(), 255);
        assert_eq!((-300i16).narrow_u8(), 212);
        assert_eq!(i16::MAX.narrow_u8(), 255);
        assert_eq!(i16::MIN.narrow_u8(), 0);
    }

    #[test]
    fn test_float_truncates_then_wraps() {
        assert_eq!(3.9f32.narrow_u8(), 3);
        assert_eq!((-0.7f32).narrow_u8(), 0);
        assert_eq!((-1.5f32).narrow_u8(), 255);
        assert_eq!(256.7f32.narrow_u8(), 0);
        assert_eq!(299.99f64.narrow_u8(), 43);
        assert_eq!(1000.0f64.narrow_u8(), 232);
    }

    #[test]
    fn test_float_saturates_at_i32() {
        // i32::MAX = 0x7FFF_FFFF, i32::MIN = 0x8000_0000
        assert_eq!(1e10f32.narrow_u8(), 255);
        assert_eq!((-1e10f64).narrow_u8(), 0);
        assert_eq!(f64::INFINITY.narrow_u8(), 255);
        assert_eq!(f32::NAN.narrow_u8(), 0);
    }

    #[test]
    fn test_from_f64_store_rule() {
        assert_eq!(u8::from_f64(99.999), 99);
        assert_eq!(u8::from_f64(-1.0), 255);
        assert_eq!(u8::from_f64(257.5), 1);
        assert_eq!(i16::from_f64(-3.7), -3);
        assert_eq!(i16::from_f64(40000.0), -25536);
        assert_eq!(f32::from_f64(0.5), 0.5f32);
        assert_eq!(f64::from_f64(-2.25), -2.25);
    }

    #[test]
    fn test_type_tags() {
        assert_eq!(<u8 as Sample>::TYPE, PixelType::U8);
        assert_eq!(<i16 as Sample>::TYPE, PixelType::I16);
        assert_eq!(<f32 as Sample>::TYPE, PixelType::F32);
        assert_eq!(<f64 as Sample>::TYPE, PixelType::F64);
        assert_eq!(narrow_u8(513i16), 1);
    }
}
