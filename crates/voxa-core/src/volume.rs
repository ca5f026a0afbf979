//! Owned volume buffers.
//!
//! [`Volume<T>`] stores a 3D raster as `nz` depth slices, each a linear
//! buffer of `nx * ny` samples in row-major order (x fastest):
//!
//! ```text
//! slice 0: [s(0,0) s(1,0) .. s(nx-1,0) s(0,1) .. s(nx-1,ny-1)]
//! slice 1: ...
//! ```
//!
//! The shape is fixed at construction and every slice always holds exactly
//! `nx * ny` samples. Operations mutate sample values in place; nothing in
//! this crate resizes or reallocates a volume.
//!
//! # Usage
//!
//! ```rust
//! use voxa_core::{Axis, Shape, Volume};
//!
//! let mut vol: Volume<u8> = Volume::filled(Shape::new(4, 3, 2), 7).unwrap();
//! vol.set(1, 2, 1, 42);
//! assert_eq!(vol.get(1, 2, 1), 42);
//!
//! // Column x=1 of slice 1, as real samples
//! let line = vol.line(Axis::Y, 1, 1).unwrap();
//! assert_eq!(line, vec![7.0, 7.0, 42.0]);
//! ```
//!
//! # Dependencies
//!
//! - [`crate::sample::Sample`] - Storage type conversions
//! - [`crate::shape::Shape`] - Extents and line addressing

use crate::{Axis, Error, PixelType, Result, Sample, Shape};

/// Owned volume of samples of type `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume<T: Sample> {
    shape: Shape,
    slices: Vec<Vec<T>>,
}

/// Summary statistics of a volume, computed over real sample values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeStats {
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
}

impl<T: Sample> Volume<T> {
    /// Creates a volume filled with zeros.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if any extent is zero.
    pub fn new(shape: Shape) -> Result<Self> {
        Self::filled(shape, T::default())
    }

    /// Creates a volume with every sample set to `value`.
    pub fn filled(shape: Shape, value: T) -> Result<Self> {
        check_shape(shape)?;
        let slices = (0..shape.nz).map(|_| vec![value; shape.slice_len()]).collect();
        Ok(Self { shape, slices })
    }

    /// Creates a volume from a function of `(x, y, z)`.
    ///
    /// ```rust
    /// use voxa_core::{Shape, Volume};
    ///
    /// let ramp: Volume<i16> = Volume::from_fn(Shape::new(3, 2, 2), |x, y, z| {
    ///     (x + 10 * y + 100 * z) as i16
    /// })
    /// .unwrap();
    /// assert_eq!(ramp.get(2, 1, 1), 112);
    /// ```
    pub fn from_fn(shape: Shape, mut f: impl FnMut(usize, usize, usize) -> T) -> Result<Self> {
        check_shape(shape)?;
        let mut slices = Vec::with_capacity(shape.nz);
        for z in 0..shape.nz {
            let mut slice = Vec::with_capacity(shape.slice_len());
            for y in 0..shape.ny {
                for x in 0..shape.nx {
                    slice.push(f(x, y, z));
                }
            }
            slices.push(slice);
        }
        Ok(Self { shape, slices })
    }

    /// Creates a volume from per-slice buffers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the slice count differs from
    /// `nz` or any slice length differs from `nx * ny`.
    pub fn from_slices(shape: Shape, slices: Vec<Vec<T>>) -> Result<Self> {
        check_shape(shape)?;
        if slices.len() != shape.nz {
            return Err(Error::invalid_dimensions(
                shape,
                format!("expected {} slices, got {}", shape.nz, slices.len()),
            ));
        }
        if let Some((z, bad)) = slices
            .iter()
            .enumerate()
            .find(|(_, s)| s.len() != shape.slice_len())
        {
            return Err(Error::invalid_dimensions(
                shape,
                format!(
                    "slice {} has {} samples, expected {}",
                    z,
                    bad.len(),
                    shape.slice_len()
                ),
            ));
        }
        Ok(Self { shape, slices })
    }

    /// Creates a volume from one contiguous buffer (slice after slice).
    pub fn from_data(shape: Shape, data: Vec<T>) -> Result<Self> {
        check_shape(shape)?;
        if data.len() != shape.len() {
            return Err(Error::invalid_dimensions(
                shape,
                format!("expected {} samples, got {}", shape.len(), data.len()),
            ));
        }
        let slices = data
            .chunks_exact(shape.slice_len())
            .map(|chunk| chunk.to_vec())
            .collect();
        Ok(Self { shape, slices })
    }

    /// Returns the volume shape.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Returns the runtime representation tag.
    #[inline]
    pub fn pixel_type(&self) -> PixelType {
        T::TYPE
    }

    /// Returns depth slice `z`.
    ///
    /// # Panics
    ///
    /// Panics if `z >= nz`.
    #[inline]
    pub fn slice(&self, z: usize) -> &[T] {
        &self.slices[z]
    }

    /// Returns depth slice `z` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `z >= nz`.
    #[inline]
    pub fn slice_mut(&mut self, z: usize) -> &mut [T] {
        &mut self.slices[z]
    }

    /// Iterates over the depth slices.
    pub fn slices(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        self.slices.iter().map(Vec::as_slice)
    }

    /// Iterates mutably over the depth slices.
    pub fn slices_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [T]> + '_ {
        self.slices.iter_mut().map(Vec::as_mut_slice)
    }

    /// Returns the sample at `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> T {
        assert!(x < self.shape.nx && y < self.shape.ny, "sample out of bounds");
        self.slices[z][self.shape.slice_index(x, y)]
    }

    /// Returns the sample at `(x, y, z)`, or `None` if out of bounds.
    #[inline]
    pub fn get_checked(&self, x: usize, y: usize, z: usize) -> Option<T> {
        let s = self.shape;
        (x < s.nx && y < s.ny && z < s.nz).then(|| self.get(x, y, z))
    }

    /// Sets the sample at `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) {
        assert!(x < self.shape.nx && y < self.shape.ny, "sample out of bounds");
        let i = self.shape.slice_index(x, y);
        self.slices[z][i] = value;
    }

    /// Sets every sample to `value`.
    pub fn fill(&mut self, value: T) {
        for slice in &mut self.slices {
            slice.fill(value);
        }
    }

    /// Iterates over all samples, slice after slice.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.slices.iter().flat_map(|s| s.iter().copied())
    }

    /// Copies all samples into one contiguous buffer.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Reads the line along `axis` at `(a, b)` into `out`.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfBounds`] if `(a, b)` is outside the line grid
    /// - [`Error::LineLength`] if `out.len()` differs from the axis extent
    pub fn read_line(&self, axis: Axis, a: usize, b: usize, out: &mut [f64]) -> Result<()> {
        self.check_line(axis, a, b, out.len())?;
        let nx = self.shape.nx;
        match axis {
            Axis::X => {
                let row = &self.slices[b][a * nx..(a + 1) * nx];
                for (dst, &v) in out.iter_mut().zip(row) {
                    *dst = v.to_f64();
                }
            }
            Axis::Y => {
                let slice = &self.slices[b];
                for (y, dst) in out.iter_mut().enumerate() {
                    *dst = slice[y * nx + a].to_f64();
                }
            }
            Axis::Z => {
                let i = b * nx + a;
                for (slice, dst) in self.slices.iter().zip(out.iter_mut()) {
                    *dst = slice[i].to_f64();
                }
            }
        }
        Ok(())
    }

    /// Writes `line` back along `axis` at `(a, b)` using [`Sample::from_f64`].
    ///
    /// # Errors
    ///
    /// Same as [`read_line`](Self::read_line).
    pub fn write_line(&mut self, axis: Axis, a: usize, b: usize, line: &[f64]) -> Result<()> {
        self.check_line(axis, a, b, line.len())?;
        let nx = self.shape.nx;
        match axis {
            Axis::X => {
                let row = &mut self.slices[b][a * nx..(a + 1) * nx];
                for (dst, &v) in row.iter_mut().zip(line) {
                    *dst = T::from_f64(v);
                }
            }
            Axis::Y => {
                let slice = &mut self.slices[b];
                for (y, &v) in line.iter().enumerate() {
                    slice[y * nx + a] = T::from_f64(v);
                }
            }
            Axis::Z => {
                let i = b * nx + a;
                for (slice, &v) in self.slices.iter_mut().zip(line) {
                    slice[i] = T::from_f64(v);
                }
            }
        }
        Ok(())
    }

    /// Returns the line along `axis` at `(a, b)` as a new buffer.
    pub fn line(&self, axis: Axis, a: usize, b: usize) -> Result<Vec<f64>> {
        let mut out = vec![0.0; self.shape.extent(axis)];
        self.read_line(axis, a, b, &mut out)?;
        Ok(out)
    }

    /// Computes min, max and mean over all samples.
    pub fn stats(&self) -> VolumeStats {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for v in self.iter().map(T::to_f64) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        VolumeStats {
            min,
            max,
            mean: sum / self.shape.len() as f64,
        }
    }

    fn check_line(&self, axis: Axis, a: usize, b: usize, len: usize) -> Result<()> {
        if !self.shape.contains_line(axis, a, b) {
            return Err(Error::out_of_bounds(axis, a, b, self.shape));
        }
        let expected = self.shape.extent(axis);
        if len != expected {
            return Err(Error::line_length(axis, expected, len));
        }
        Ok(())
    }
}

fn check_shape(shape: Shape) -> Result<()> {
    if shape.is_empty() {
        return Err(Error::invalid_dimensions(shape, "every extent must be at least 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Volume<f64> {
        Volume::from_fn(Shape::new(4, 3, 2), |x, y, z| (x + 10 * y + 100 * z) as f64).unwrap()
    }

    #[test]
    fn test_new_rejects_empty() {
        let err = Volume::<u8>::new(Shape::new(4, 0, 2)).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_slice_layout() {
        let v = ramp();
        assert_eq!(v.slice(1)[0], 100.0);
        // x fastest
        assert_eq!(v.slice(0)[1], 1.0);
        assert_eq!(v.slice(0)[4], 10.0);
        assert_eq!(v.slices().len(), 2);
    }

    #[test]
    fn test_from_slices_validates() {
        let shape = Shape::new(2, 2, 2);
        assert!(Volume::from_slices(shape, vec![vec![0u8; 4]; 2]).is_ok());
        assert!(Volume::from_slices(shape, vec![vec![0u8; 4]; 3]).is_err());
        assert!(Volume::from_slices(shape, vec![vec![0u8; 4], vec![0u8; 3]]).is_err());
    }

    #[test]
    fn test_from_data() {
        let v = Volume::from_data(Shape::new(2, 1, 3), vec![1i16, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(v.slice(2), &[5, 6]);
        assert!(Volume::from_data(Shape::new(2, 1, 3), vec![1i16; 5]).is_err());
    }

    #[test]
    fn test_read_lines() {
        let v = ramp();
        assert_eq!(v.line(Axis::X, 2, 1).unwrap(), vec![120.0, 121.0, 122.0, 123.0]);
        assert_eq!(v.line(Axis::Y, 3, 0).unwrap(), vec![3.0, 13.0, 23.0]);
        assert_eq!(v.line(Axis::Z, 1, 2).unwrap(), vec![21.0, 121.0]);
    }

    #[test]
    fn test_write_lines() {
        let mut v: Volume<u8> = Volume::new(Shape::new(3, 3, 3)).unwrap();
        v.write_line(Axis::X, 1, 2, &[1.0, 2.0, 3.0]).unwrap();
        v.write_line(Axis::Y, 0, 0, &[4.0, 5.0, 6.0]).unwrap();
        v.write_line(Axis::Z, 2, 2, &[7.9, -1.0, 256.0]).unwrap();
        assert_eq!(v.get(2, 1, 2), 3);
        assert_eq!(v.get(0, 2, 0), 6);
        assert_eq!(v.get(2, 2, 0), 7);
        assert_eq!(v.get(2, 2, 1), 255);
        assert_eq!(v.get(2, 2, 2), 0);
    }

    #[test]
    fn test_line_errors() {
        let mut v = ramp();
        let mut buf = vec![0.0; 3];
        assert!(matches!(
            v.read_line(Axis::X, 0, 0, &mut buf),
            Err(Error::LineLength { expected: 4, got: 3, .. })
        ));
        assert!(matches!(
            v.write_line(Axis::Z, 4, 0, &[0.0, 0.0]),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_stats() {
        let v = Volume::from_data(Shape::new(2, 2, 1), vec![1.0f32, 3.0, 5.0, 7.0]).unwrap();
        let s = v.stats();
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 7.0);
        assert_eq!(s.mean, 4.0);
    }

    #[test]
    fn test_get_checked_and_fill() {
        let mut v: Volume<u8> = Volume::new(Shape::cube(2)).unwrap();
        v.fill(9);
        assert_eq!(v.get_checked(1, 1, 1), Some(9));
        assert_eq!(v.get_checked(2, 0, 0), None);
        assert!(v.iter().all(|s| s == 9));
    }

    #[test]
    #[should_panic(expected = "sample out of bounds")]
    fn test_get_x_past_row_panics() {
        // (4, 0) would alias (0, 1) in the flat slice
        let v: Volume<u8> = Volume::new(Shape::new(4, 2, 1)).unwrap();
        v.get(4, 0, 0);
    }

    #[test]
    #[should_panic(expected = "sample out of bounds")]
    fn test_set_y_past_slice_panics() {
        let mut v: Volume<u8> = Volume::new(Shape::new(4, 2, 2)).unwrap();
        v.set(0, 2, 0, 1);
    }

    #[test]
    fn test_set_in_bounds_does_not_alias() {
        let mut v: Volume<u8> = Volume::new(Shape::new(4, 2, 1)).unwrap();
        v.set(3, 0, 0, 7);
        assert_eq!(v.get(0, 1, 0), 0);
        assert_eq!(v.get_checked(4, 0, 0), None);
    }
}
