//! Elementwise combination of two volumes.
//!
//! Combines an 8-bit owner volume with an operand volume of any
//! representation, writing the result back into the owner:
//!
//! - [`CombineOp::Max`] / [`CombineOp::Min`] - keep the larger / smaller value,
//!   comparing bytes as signed (`i8`)
//! - [`CombineOp::Add`] / [`CombineOp::Subtract`] / [`CombineOp::Multiply`] -
//!   8-bit wrapping arithmetic
//! - [`CombineOp::Divide`] - signed truncating division, zero divisors are
//!   errors
//!
//! # Narrow, then operate
//!
//! Each operand sample is first narrowed to 8 bits with
//! [`Sample::narrow_u8`] (integer truncation, then the low byte) and the
//! operation is applied to the two 8-bit values. An `f64` operand of `300.5`
//! therefore adds `44`, not `300`.
//!
//! ```rust
//! use voxa_core::{Shape, Volume};
//! use voxa_ops::combine::{add, subtract};
//!
//! let shape = Shape::new(2, 2, 2);
//! let mut owner: Volume<u8> = Volume::filled(shape, 250).unwrap();
//! let operand: Volume<f32> = Volume::filled(shape, 10.0).unwrap();
//!
//! add(&mut owner, &operand).unwrap();
//! assert!(owner.iter().all(|v| v == 4)); // wrapped
//!
//! subtract(&mut owner, &operand).unwrap();
//! assert!(owner.iter().all(|v| v == 250)); // wrapped back
//! ```
//!
//! # Errors
//!
//! - Shape mismatch and unknown operand representations are reported before
//!   any sample is written.
//! - A zero divisor stops the operation at that sample. Samples already
//!   written keep their new values.

use crate::OpsResult;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};
use voxa_core::{Error, PixelType, Sample, SliceView, Volume, VolumeStorage};

/// Elementwise operation applied by [`combine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombineOp {
    /// Owner takes the operand value where the operand is larger.
    Max,
    /// Owner takes the operand value where the operand is smaller.
    Min,
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction (`owner - operand`).
    Subtract,
    /// Wrapping multiplication.
    Multiply,
    /// Signed truncating division (`owner / operand`).
    Divide,
}

impl CombineOp {
    /// All operations.
    pub const ALL: [CombineOp; 6] = [
        Self::Max,
        Self::Min,
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
    ];

    /// Lowercase operation name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Max => "max",
            Self::Min => "min",
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }

    /// Applies the operation to one pair of 8-bit samples.
    ///
    /// Max, min and divide read both bytes as two's complement (`i8`), so
    /// `200` compares and divides as `-56`. Add, subtract and multiply wrap
    /// and give the same low byte either way.
    ///
    /// Returns `None` only for division by zero.
    ///
    /// ```rust
    /// use voxa_ops::CombineOp;
    ///
    /// assert_eq!(CombineOp::Add.apply(250, 10), Some(4));
    /// assert_eq!(CombineOp::Subtract.apply(4, 10), Some(250));
    /// assert_eq!(CombineOp::Multiply.apply(16, 17), Some(16));
    /// assert_eq!(CombineOp::Max.apply(200, 100), Some(100));
    /// assert_eq!(CombineOp::Divide.apply(200, 7), Some(248));
    /// assert_eq!(CombineOp::Divide.apply(1, 0), None);
    /// ```
    #[inline]
    pub fn apply(self, owner: u8, operand: u8) -> Option<u8> {
        let (a, b) = (owner as i8, operand as i8);
        match self {
            Self::Max => Some(if a < b { operand } else { owner }),
            Self::Min => Some(if a > b { operand } else { owner }),
            Self::Add => Some(owner.wrapping_add(operand)),
            Self::Subtract => Some(owner.wrapping_sub(operand)),
            Self::Multiply => Some(owner.wrapping_mul(operand)),
            // -128 / -1 overflows i8, so divide in i32
            Self::Divide => (a as i32).checked_div(b as i32).map(|q| q as u8),
        }
    }
}

impl fmt::Display for CombineOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CombineOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "max" | "maximum" => Ok(Self::Max),
            "min" | "minimum" => Ok(Self::Min),
            "add" => Ok(Self::Add),
            "sub" | "subtract" => Ok(Self::Subtract),
            "mul" | "multiply" => Ok(Self::Multiply),
            "div" | "divide" => Ok(Self::Divide),
            other => Err(format!(
                "unknown combine op '{other}' (expected max, min, add, sub, mul, div)"
            )),
        }
    }
}

/// Combines `operand` into `owner` sample by sample.
///
/// # Errors
///
/// - [`Error::ShapeMismatch`] if the shapes differ (owner untouched)
/// - [`Error::UnsupportedRepresentation`] if the operand tag is unknown
///   (owner untouched)
/// - [`Error::DivideByZero`] for [`CombineOp::Divide`] with a zero narrowed
///   divisor; earlier samples stay mutated
pub fn combine<S>(owner: &mut Volume<u8>, operand: &S, op: CombineOp) -> OpsResult<()>
where
    S: VolumeStorage + ?Sized,
{
    let kind = validate(owner, operand)?;
    let shape = owner.shape();
    trace!(%shape, %op, operand = %kind, "combine");

    for z in 0..shape.nz {
        let view = operand.slice_view(z)?;
        if view.len() != shape.slice_len() {
            return Err(Error::invalid_dimensions(
                shape,
                format!("operand slice {z} holds {} samples", view.len()),
            )
            .into());
        }
        combine_slice(owner.slice_mut(z), view, op)
            .map_err(|index| Error::divide_by_zero(z, index))?;
    }

    Ok(())
}

/// Checks shapes and decodes the operand representation.
pub(crate) fn validate<S>(owner: &Volume<u8>, operand: &S) -> OpsResult<PixelType>
where
    S: VolumeStorage + ?Sized,
{
    let (a, b) = (owner.shape(), operand.shape());
    if a != b {
        debug!(owner = %a, operand = %b, "combine rejected: shape mismatch");
        return Err(Error::shape_mismatch(a, b).into());
    }
    Ok(operand.pixel_type()?)
}

/// Combines one depth slice. On division by zero returns the sample index.
pub(crate) fn combine_slice(dst: &mut [u8], src: SliceView<'_>, op: CombineOp) -> Result<(), usize> {
    debug_assert_eq!(dst.len(), src.len(), "slice length mismatch");
    match src {
        SliceView::U8(s) => combine_samples(dst, s, op),
        SliceView::I16(s) => combine_samples(dst, s, op),
        SliceView::F32(s) => combine_samples(dst, s, op),
        SliceView::F64(s) => combine_samples(dst, s, op),
    }
}

#[inline]
fn combine_samples<T: Sample>(dst: &mut [u8], src: &[T], op: CombineOp) -> Result<(), usize> {
    for (j, (d, &s)) in dst.iter_mut().zip(src).enumerate() {
        *d = op.apply(*d, s.narrow_u8()).ok_or(j)?;
    }
    Ok(())
}

/// `owner = max(owner, operand)`.
pub fn max<S: VolumeStorage + ?Sized>(owner: &mut Volume<u8>, operand: &S) -> OpsResult<()> {
    combine(owner, operand, CombineOp::Max)
}

/// `owner = min(owner, operand)`.
pub fn min<S: VolumeStorage + ?Sized>(owner: &mut Volume<u8>, operand: &S) -> OpsResult<()> {
    combine(owner, operand, CombineOp::Min)
}

/// `owner += operand` with 8-bit wraparound.
pub fn add<S: VolumeStorage + ?Sized>(owner: &mut Volume<u8>, operand: &S) -> OpsResult<()> {
    combine(owner, operand, CombineOp::Add)
}

/// `owner -= operand` with 8-bit wraparound.
pub fn subtract<S: VolumeStorage + ?Sized>(owner: &mut Volume<u8>, operand: &S) -> OpsResult<()> {
    combine(owner, operand, CombineOp::Subtract)
}

/// `owner *= operand` with 8-bit wraparound.
pub fn multiply<S: VolumeStorage + ?Sized>(owner: &mut Volume<u8>, operand: &S) -> OpsResult<()> {
    combine(owner, operand, CombineOp::Multiply)
}

/// `owner /= operand`, truncating.
pub fn divide<S: VolumeStorage + ?Sized>(owner: &mut Volume<u8>, operand: &S) -> OpsResult<()> {
    combine(owner, operand, CombineOp::Divide)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxa_core::{AnyVolume, Axis, Shape};

    fn filled_u8(shape: Shape, v: u8) -> Volume<u8> {
        Volume::filled(shape, v).unwrap()
    }

    /// Storage reporting an unknown representation tag.
    struct Opaque(Shape);

    impl VolumeStorage for Opaque {
        fn shape(&self) -> Shape {
            self.0
        }
        fn type_code(&self) -> u32 {
            9
        }
        fn slice_view(&self, _z: usize) -> voxa_core::Result<SliceView<'_>> {
            Err(Error::unsupported_representation(9))
        }
        fn get_line(&self, _: Axis, _: usize, _: usize, _: &mut [f64]) -> voxa_core::Result<()> {
            Ok(())
        }
        fn put_line(&mut self, _: Axis, _: usize, _: usize, _: &[f64]) -> voxa_core::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_max_then_min() {
        let shape = Shape::new(3, 2, 2);
        let mut a = filled_u8(shape, 5);
        max(&mut a, &filled_u8(shape, 9)).unwrap();
        assert!(a.iter().all(|v| v == 9));

        min(&mut a, &filled_u8(shape, 3)).unwrap();
        assert!(a.iter().all(|v| v == 3));
    }

    #[test]
    fn test_max_min_compare_signed() {
        // Owner bytes read as [-56, 10, 127, -128], operand as [100, 50, -1, 127]
        let shape = Shape::new(4, 1, 1);
        let owner = Volume::from_data(shape, vec![200u8, 10, 127, 128]).unwrap();
        let operand = Volume::from_data(shape, vec![100i16, 50, -1, 127]).unwrap();

        let mut a = owner.clone();
        max(&mut a, &operand).unwrap();
        assert_eq!(a.slice(0), &[100, 50, 127, 127]);

        let mut a = owner;
        min(&mut a, &operand).unwrap();
        assert_eq!(a.slice(0), &[200, 10, 255, 128]);
    }

    #[test]
    fn test_add_subtract_wraparound() {
        let shape = Shape::cube(2);
        let mut a = filled_u8(shape, 250);
        let b = filled_u8(shape, 10);
        add(&mut a, &b).unwrap();
        assert!(a.iter().all(|v| v == 4));
        subtract(&mut a, &b).unwrap();
        assert!(a.iter().all(|v| v == 250));
    }

    #[test]
    fn test_narrow_then_operate() {
        let shape = Shape::new(4, 1, 1);
        let operand = Volume::from_data(shape, vec![300.5f64, -1.0, 7.9, 1e10]).unwrap();
        let mut a = filled_u8(shape, 1);
        add(&mut a, &operand).unwrap();
        // 300.5 -> 44, -1 -> 255, 7.9 -> 7, 1e10 -> 255
        assert_eq!(a.slice(0), &[45, 0, 8, 0]);
    }

    #[test]
    fn test_every_representation() {
        let shape = Shape::new(2, 2, 1);
        let operands: Vec<AnyVolume> = vec![
            Volume::<u8>::filled(shape, 3).unwrap().into(),
            Volume::<i16>::filled(shape, 259).unwrap().into(),
            Volume::<f32>::filled(shape, 3.99).unwrap().into(),
            Volume::<f64>::filled(shape, -253.2).unwrap().into(),
        ];
        for operand in &operands {
            let mut a = filled_u8(shape, 20);
            multiply(&mut a, operand).unwrap();
            assert!(a.iter().all(|v| v == 60), "operand {:?}", operand.kind());
        }
    }

    #[test]
    fn test_multiply_and_divide() {
        let shape = Shape::new(3, 1, 1);
        let mut a = Volume::from_data(shape, vec![16u8, 100, 255]).unwrap();
        let b = Volume::from_data(shape, vec![17i16, 3, 2]).unwrap();
        multiply(&mut a, &b).unwrap();
        assert_eq!(a.slice(0), &[16, 44, 254]);
        // 254 reads as -2
        divide(&mut a, &b).unwrap();
        assert_eq!(a.slice(0), &[0, 14, 255]);
    }

    #[test]
    fn test_divide_signed() {
        let shape = Shape::new(4, 1, 1);
        let mut a = Volume::from_data(shape, vec![200u8, 7, 100, 128]).unwrap();
        let b = Volume::from_data(shape, vec![7.0f64, 200.0, -3.0, -1.0]).unwrap();
        divide(&mut a, &b).unwrap();
        // -56 / 7, 7 / -56, 100 / -3, -128 / -1
        assert_eq!(a.slice(0), &[248, 0, 223, 128]);
    }

    #[test]
    fn test_apply_signed_ops() {
        assert_eq!(CombineOp::Max.apply(200, 100), Some(100));
        assert_eq!(CombineOp::Min.apply(100, 200), Some(200));
        assert_eq!(CombineOp::Divide.apply(200, 7), Some(248));
        assert_eq!(CombineOp::Divide.apply(128, 255), Some(128));
        assert_eq!(CombineOp::Divide.apply(200, 0), None);
    }

    #[test]
    fn test_divide_by_zero_partial_mutation() {
        let shape = Shape::new(3, 1, 2);
        let mut a = filled_u8(shape, 100);
        let mut b = filled_u8(shape, 2);
        b.set(1, 0, 1, 0);

        let err = divide(&mut a, &b).unwrap_err();
        assert!(err.is_divide_by_zero());
        assert_eq!(
            err,
            crate::OpsError::Core(Error::DivideByZero { slice: 1, index: 1 })
        );
        // Slice 0 and the first sample of slice 1 were already divided
        assert_eq!(a.slice(0), &[50, 50, 50]);
        assert_eq!(a.slice(1), &[50, 100, 100]);
    }

    #[test]
    fn test_divide_by_narrowed_zero() {
        // 256 narrows to 0
        let shape = Shape::cube(1);
        let mut a = filled_u8(shape, 9);
        let b: Volume<i16> = Volume::filled(shape, 256).unwrap();
        assert!(divide(&mut a, &b).unwrap_err().is_divide_by_zero());
    }

    #[test]
    fn test_shape_mismatch_every_op() {
        let mut a = filled_u8(Shape::cube(4), 7);
        let b = filled_u8(Shape::new(4, 4, 5), 1);
        for op in CombineOp::ALL {
            let err = combine(&mut a, &b, op).unwrap_err();
            assert!(err.is_shape_mismatch(), "{op}");
            assert!(err.to_string().contains("[4,4,4]"));
            assert!(err.to_string().contains("[4,4,5]"));
        }
        assert!(a.iter().all(|v| v == 7));
    }

    #[test]
    fn test_unknown_representation() {
        let shape = Shape::cube(2);
        let mut a = filled_u8(shape, 7);
        let err = combine(&mut a, &Opaque(shape), CombineOp::Add).unwrap_err();
        assert!(err.is_unsupported_representation());
        assert!(err.to_string().contains('9'));
        assert!(a.iter().all(|v| v == 7));
    }

    #[test]
    fn test_dyn_operand() {
        let shape = Shape::cube(2);
        let mut a = filled_u8(shape, 1);
        let b: Box<dyn VolumeStorage> = Box::new(Volume::<f32>::filled(shape, 2.5).unwrap());
        add(&mut a, b.as_ref()).unwrap();
        assert!(a.iter().all(|v| v == 3));
    }

    #[test]
    fn test_parse_ops() {
        assert_eq!("sub".parse::<CombineOp>().unwrap(), CombineOp::Subtract);
        assert_eq!("DIV".parse::<CombineOp>().unwrap(), CombineOp::Divide);
        assert!("xor".parse::<CombineOp>().is_err());
        for op in CombineOp::ALL {
            assert_eq!(op.name().parse::<CombineOp>().unwrap(), op);
        }
    }
}
