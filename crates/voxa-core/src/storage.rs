//! Volume storage interface.
//!
//! [`VolumeStorage`] is the boundary between the numeric engine and whatever
//! owns the sample buffers. The engine only needs:
//!
//! - the shape and the representation tag,
//! - per-slice typed read access ([`SliceView`]) for elementwise combine,
//! - line read/write along each axis for separable filtering.
//!
//! [`Volume<T>`] and the runtime-typed [`AnyVolume`] implement it. External
//! storages report their representation as a raw tag, which the engine
//! decodes with [`PixelType::from_code`] before touching any sample.

use crate::{Axis, Error, PixelType, Result, Sample, Shape, Volume, VolumeStats};

/// Borrowed depth slice in its native representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliceView<'a> {
    /// 8-bit unsigned samples
    U8(&'a [u8]),
    /// 16-bit signed samples
    I16(&'a [i16]),
    /// 32-bit float samples
    F32(&'a [f32]),
    /// 64-bit float samples
    F64(&'a [f64]),
}

impl SliceView<'_> {
    /// Representation of the viewed samples.
    pub fn pixel_type(&self) -> PixelType {
        match self {
            Self::U8(_) => PixelType::U8,
            Self::I16(_) => PixelType::I16,
            Self::F32(_) => PixelType::F32,
            Self::F64(_) => PixelType::F64,
        }
    }

    /// Number of samples in the slice.
    pub fn len(&self) -> usize {
        match self {
            Self::U8(s) => s.len(),
            Self::I16(s) => s.len(),
            Self::F32(s) => s.len(),
            Self::F64(s) => s.len(),
        }
    }

    /// Returns `true` if the slice holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Storage collaborator consumed by the processing engine.
pub trait VolumeStorage {
    /// Volume extent.
    fn shape(&self) -> Shape;

    /// Raw representation tag (see [`PixelType::code`]).
    fn type_code(&self) -> u32;

    /// Decoded representation.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedRepresentation`] if the tag is unknown.
    fn pixel_type(&self) -> Result<PixelType> {
        PixelType::from_code(self.type_code())
    }

    /// Depth slice `z` in its native representation.
    ///
    /// # Panics
    ///
    /// May panic if `z >= nz`.
    fn slice_view(&self, z: usize) -> Result<SliceView<'_>>;

    /// Reads the line along `axis` at `(a, b)` into `out`.
    fn get_line(&self, axis: Axis, a: usize, b: usize, out: &mut [f64]) -> Result<()>;

    /// Writes `line` along `axis` at `(a, b)`.
    fn put_line(&mut self, axis: Axis, a: usize, b: usize, line: &[f64]) -> Result<()>;
}

impl<T: Sample> VolumeStorage for Volume<T> {
    #[inline]
    fn shape(&self) -> Shape {
        Volume::shape(self)
    }

    #[inline]
    fn type_code(&self) -> u32 {
        T::TYPE.code()
    }

    #[inline]
    fn slice_view(&self, z: usize) -> Result<SliceView<'_>> {
        Ok(T::view(self.slice(z)))
    }

    #[inline]
    fn get_line(&self, axis: Axis, a: usize, b: usize, out: &mut [f64]) -> Result<()> {
        self.read_line(axis, a, b, out)
    }

    #[inline]
    fn put_line(&mut self, axis: Axis, a: usize, b: usize, line: &[f64]) -> Result<()> {
        self.write_line(axis, a, b, line)
    }
}

/// Volume whose representation is chosen at runtime.
///
/// # Example
///
/// ```rust
/// use voxa_core::{AnyVolume, PixelType, Shape, VolumeStorage};
///
/// let vol = AnyVolume::zeros(Shape::cube(2), PixelType::F32.code()).unwrap();
/// assert_eq!(vol.pixel_type().unwrap(), PixelType::F32);
/// assert!(AnyVolume::zeros(Shape::cube(2), 42).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum AnyVolume {
    /// 8-bit unsigned volume
    U8(Volume<u8>),
    /// 16-bit signed volume
    I16(Volume<i16>),
    /// 32-bit float volume
    F32(Volume<f32>),
    /// 64-bit float volume
    F64(Volume<f64>),
}

macro_rules! dispatch {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            AnyVolume::U8($v) => $body,
            AnyVolume::I16($v) => $body,
            AnyVolume::F32($v) => $body,
            AnyVolume::F64($v) => $body,
        }
    };
}

impl AnyVolume {
    /// Creates a zero-filled volume for a raw representation tag.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedRepresentation`] for unknown tags
    /// - [`Error::InvalidDimensions`] for empty shapes
    pub fn zeros(shape: Shape, tag: u32) -> Result<Self> {
        Self::filled(shape, PixelType::from_code(tag)?, 0.0)
    }

    /// Creates a volume of `kind` with every sample set to `value`, stored
    /// with [`Sample::from_f64`].
    pub fn filled(shape: Shape, kind: PixelType, value: f64) -> Result<Self> {
        Ok(match kind {
            PixelType::U8 => Self::U8(Volume::filled(shape, u8::from_f64(value))?),
            PixelType::I16 => Self::I16(Volume::filled(shape, i16::from_f64(value))?),
            PixelType::F32 => Self::F32(Volume::filled(shape, f32::from_f64(value))?),
            PixelType::F64 => Self::F64(Volume::filled(shape, value)?),
        })
    }

    /// Creates a volume of `kind` from a real-valued function of `(x, y, z)`.
    pub fn from_fn(
        shape: Shape,
        kind: PixelType,
        f: impl Fn(usize, usize, usize) -> f64,
    ) -> Result<Self> {
        Ok(match kind {
            PixelType::U8 => Self::U8(Volume::from_fn(shape, |x, y, z| u8::from_f64(f(x, y, z)))?),
            PixelType::I16 => {
                Self::I16(Volume::from_fn(shape, |x, y, z| i16::from_f64(f(x, y, z)))?)
            }
            PixelType::F32 => {
                Self::F32(Volume::from_fn(shape, |x, y, z| f32::from_f64(f(x, y, z)))?)
            }
            PixelType::F64 => Self::F64(Volume::from_fn(shape, f)?),
        })
    }

    /// Volume extent.
    pub fn shape(&self) -> Shape {
        dispatch!(self, v => v.shape())
    }

    /// Representation of the wrapped volume.
    pub fn kind(&self) -> PixelType {
        dispatch!(self, v => v.pixel_type())
    }

    /// Summary statistics.
    pub fn stats(&self) -> VolumeStats {
        dispatch!(self, v => v.stats())
    }

    /// Borrows the 8-bit volume, if that is the representation.
    pub fn as_u8(&self) -> Option<&Volume<u8>> {
        match self {
            Self::U8(v) => Some(v),
            _ => None,
        }
    }

    /// Mutably borrows the 8-bit volume, if that is the representation.
    pub fn as_u8_mut(&mut self) -> Option<&mut Volume<u8>> {
        match self {
            Self::U8(v) => Some(v),
            _ => None,
        }
    }
}

impl VolumeStorage for AnyVolume {
    fn shape(&self) -> Shape {
        AnyVolume::shape(self)
    }

    fn type_code(&self) -> u32 {
        self.kind().code()
    }

    fn slice_view(&self, z: usize) -> Result<SliceView<'_>> {
        dispatch!(self, v => v.slice_view(z))
    }

    fn get_line(&self, axis: Axis, a: usize, b: usize, out: &mut [f64]) -> Result<()> {
        dispatch!(self, v => v.read_line(axis, a, b, out))
    }

    fn put_line(&mut self, axis: Axis, a: usize, b: usize, line: &[f64]) -> Result<()> {
        dispatch!(self, v => v.write_line(axis, a, b, line))
    }
}

macro_rules! impl_from_volume {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Volume<$t>> for AnyVolume {
                fn from(v: Volume<$t>) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_volume!(u8 => U8, i16 => I16, f32 => F32, f64 => F64);

impl TryFrom<AnyVolume> for Volume<u8> {
    type Error = Error;

    fn try_from(v: AnyVolume) -> Result<Self> {
        match v {
            AnyVolume::U8(v) => Ok(v),
            other => Err(Error::unsupported_representation(other.kind().code())),
        }
    }
}
