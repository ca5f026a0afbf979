//! Volume shapes and axes.
//!
//! A [`Shape`] is the `(nx, ny, nz)` extent of a volume. Samples are laid out
//! as `nz` depth slices of `nx * ny` samples each, with x varying fastest.
//!
//! An [`Axis`] names one of the three sweep directions. Lines along an axis
//! are addressed by the two orthogonal coordinates `(a, b)`:
//!
//! ```text
//! Axis::X  line at (y = a, z = b)
//! Axis::Y  line at (x = a, z = b)
//! Axis::Z  line at (x = a, y = b)
//! ```

use std::fmt;

/// Sweep direction inside a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Width direction (fastest varying in memory).
    X,
    /// Height direction.
    Y,
    /// Depth direction (across slices).
    Z,
}

impl Axis {
    /// All axes in sweep order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Lowercase axis name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extent of a volume in samples.
///
/// # Example
///
/// ```rust
/// use voxa_core::{Axis, Shape};
///
/// let shape = Shape::new(8, 4, 2);
/// assert_eq!(shape.slice_len(), 32);
/// assert_eq!(shape.len(), 64);
/// assert_eq!(shape.extent(Axis::Y), 4);
/// assert_eq!(shape.line_grid(Axis::Y), (8, 2));
/// assert_eq!(shape.to_string(), "[8,4,2]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Samples along x
    pub nx: usize,
    /// Samples along y
    pub ny: usize,
    /// Number of depth slices
    pub nz: usize,
}

impl Shape {
    /// Creates a shape. Zero extents are rejected when a volume is built.
    #[inline]
    pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    /// Shape with the same extent on every axis.
    #[inline]
    pub const fn cube(n: usize) -> Self {
        Self::new(n, n, n)
    }

    /// Extent along `axis`.
    #[inline]
    pub const fn extent(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.nx,
            Axis::Y => self.ny,
            Axis::Z => self.nz,
        }
    }

    /// Samples per depth slice (`nx * ny`).
    #[inline]
    pub const fn slice_len(&self) -> usize {
        self.nx * self.ny
    }

    /// Total number of samples.
    #[inline]
    pub const fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Returns `true` if any extent is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0 || self.nz == 0
    }

    /// Extents of the two orthogonal coordinates `(a, b)` that address
    /// lines along `axis`.
    #[inline]
    pub const fn line_grid(&self, axis: Axis) -> (usize, usize) {
        match axis {
            Axis::X => (self.ny, self.nz),
            Axis::Y => (self.nx, self.nz),
            Axis::Z => (self.nx, self.ny),
        }
    }

    /// Number of lines along `axis`.
    #[inline]
    pub const fn line_count(&self, axis: Axis) -> usize {
        let (na, nb) = self.line_grid(axis);
        na * nb
    }

    /// Returns `true` if `(a, b)` addresses a line along `axis`.
    #[inline]
    pub const fn contains_line(&self, axis: Axis, a: usize, b: usize) -> bool {
        let (na, nb) = self.line_grid(axis);
        a < na && b < nb
    }

    /// Linear index of `(x, y)` inside a slice.
    #[inline]
    pub const fn slice_index(&self, x: usize, y: usize) -> usize {
        y * self.nx + x
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.nx, self.ny, self.nz)
    }
}

impl From<(usize, usize, usize)> for Shape {
    fn from((nx, ny, nz): (usize, usize, usize)) -> Self {
        Self::new(nx, ny, nz)
    }
}
