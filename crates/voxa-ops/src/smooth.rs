//! Separable recursive Gaussian smoothing.
//!
//! A Gaussian of standard deviation `sigma` is approximated by a cascade of
//! three first-order recursive filters sharing one pole, applied along X,
//! then Y, then Z. Each axis has its own sigma; an axis is skipped when its
//! extent is 1 or its sigma is not positive.
//!
//! # Pole
//!
//! With `q = 3` and `v = sigma^2`:
//!
//! ```text
//! pole = 1 + q / v - sqrt(q^2 + 2 q v) / v
//! ```
//!
//! All three taps of [`IirCoefficients`] carry this pole. Very wide kernels
//! round the pole up to 1, so it is capped at [`MAX_POLE`].
//!
//! # Example
//!
//! ```rust
//! use voxa_core::{Shape, Volume};
//! use voxa_ops::smooth::smooth_gaussian;
//!
//! let mut vol: Volume<f64> = Volume::filled(Shape::new(8, 8, 4), 10.0).unwrap();
//! smooth_gaussian(&mut vol, 1.5, 1.5, 0.0).unwrap();
//! assert!(vol.iter().all(|v| (v - 10.0).abs() < 1e-9));
//! ```
//!
//! Samples are written back with the volume's store rule, so integer volumes
//! truncate the smoothed values.

use crate::OpsResult;
use crate::iir::convolve_iir_in_place;
use tracing::{debug, trace};
use voxa_core::{Axis, VolumeStorage};

/// Shape parameter of the pole formula.
const Q: f64 = 3.0;

/// Largest pole handed to the recursive filter.
pub const MAX_POLE: f64 = 1.0 - f64::EPSILON;

/// Returns the recursive filter pole for `sigma`, capped at [`MAX_POLE`].
///
/// Only meaningful for `sigma > 0`.
#[inline]
pub fn gaussian_pole(sigma: f64) -> f64 {
    let v = sigma * sigma;
    if v.is_infinite() {
        return MAX_POLE;
    }
    let pole = 1.0 + Q / v - (Q * Q + 2.0 * Q * v).sqrt() / v;
    if pole.is_nan() {
        // v underflowed, the kernel is far narrower than a sample
        return 0.0;
    }
    pole.min(MAX_POLE)
}

/// Coefficient triple of the recursive Gaussian for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IirCoefficients {
    /// First tap.
    pub b0: f64,
    /// Second tap.
    pub b1: f64,
    /// Third tap.
    pub b2: f64,
}

impl IirCoefficients {
    /// Derives the triple from `sigma`. All three taps equal [`gaussian_pole`].
    ///
    /// ```rust
    /// use voxa_ops::smooth::IirCoefficients;
    ///
    /// let c = IirCoefficients::from_sigma(2.0);
    /// let expected = 1.75 - 33f64.sqrt() / 4.0;
    /// assert!((c.b0 - expected).abs() < 1e-12);
    /// assert_eq!(c.b0, c.b1);
    /// assert_eq!(c.b1, c.b2);
    /// ```
    pub fn from_sigma(sigma: f64) -> Self {
        let pole = gaussian_pole(sigma);
        Self {
            b0: pole,
            b1: pole,
            b2: pole,
        }
    }

    /// Taps as the pole list fed to the convolution primitive.
    #[inline]
    pub fn as_array(&self) -> [f64; 3] {
        [self.b0, self.b1, self.b2]
    }
}

/// Per-axis standard deviations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sigma3 {
    /// Sigma along X.
    pub x: f64,
    /// Sigma along Y.
    pub y: f64,
    /// Sigma along Z.
    pub z: f64,
}

impl Sigma3 {
    /// Creates per-axis sigmas.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Same sigma on every axis.
    pub const fn uniform(sigma: f64) -> Self {
        Self::new(sigma, sigma, sigma)
    }

    /// Sigma for `axis`.
    pub const fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

impl From<f64> for Sigma3 {
    fn from(sigma: f64) -> Self {
        Self::uniform(sigma)
    }
}

/// Returns `true` if an axis of `extent` samples is filtered with `sigma`.
///
/// NaN sigmas are inactive.
#[inline]
pub fn axis_is_active(extent: usize, sigma: f64) -> bool {
    extent > 1 && sigma > 0.0
}

/// Smooths a single line.
///
/// Lines of length 0 or 1 and non-positive sigmas return the input
/// unchanged.
pub fn smooth_line(line: &[f64], sigma: f64) -> OpsResult<Vec<f64>> {
    let mut out = line.to_vec();
    if axis_is_active(line.len(), sigma) {
        let coeffs = IirCoefficients::from_sigma(sigma);
        convolve_iir_in_place(&mut out, &coeffs.as_array())?;
    }
    Ok(out)
}

/// Filters every line of `volume` along `axis`.
///
/// Returns `false` without touching the volume when the axis is inactive.
pub fn smooth_axis<S>(volume: &mut S, axis: Axis, sigma: f64) -> OpsResult<bool>
where
    S: VolumeStorage + ?Sized,
{
    let shape = volume.shape();
    let extent = shape.extent(axis);
    if !axis_is_active(extent, sigma) {
        debug!(%axis, extent, sigma, "skipping axis");
        return Ok(false);
    }

    let coeffs = IirCoefficients::from_sigma(sigma);
    debug!(%axis, sigma, pole = coeffs.b0, "recursive gaussian pass");
    let poles = coeffs.as_array();

    let (na, nb) = shape.line_grid(axis);
    let mut line = vec![0.0; extent];
    for b in 0..nb {
        for a in 0..na {
            volume.get_line(axis, a, b, &mut line)?;
            convolve_iir_in_place(&mut line, &poles)?;
            volume.put_line(axis, a, b, &line)?;
        }
    }
    Ok(true)
}

/// Smooths `volume` in place with per-axis sigmas, sweeping X, Y, then Z.
///
/// Any positive sigma is accepted, infinity included. Past roughly `1e16`
/// the pole is capped at [`MAX_POLE`].
///
/// # Errors
///
/// Propagates storage errors from line access.
pub fn smooth_gaussian<S>(volume: &mut S, sigma_x: f64, sigma_y: f64, sigma_z: f64) -> OpsResult<()>
where
    S: VolumeStorage + ?Sized,
{
    let sigma = Sigma3::new(sigma_x, sigma_y, sigma_z);
    trace!(shape = %volume.shape(), sx = sigma.x, sy = sigma.y, sz = sigma.z, "smooth_gaussian");
    for axis in Axis::ALL {
        smooth_axis(volume, axis, sigma.get(axis))?;
    }
    Ok(())
}

/// Smooths `volume` with the same sigma on every axis.
pub fn smooth_gaussian_uniform<S>(volume: &mut S, sigma: f64) -> OpsResult<()>
where
    S: VolumeStorage + ?Sized,
{
    smooth_gaussian(volume, sigma, sigma, sigma)
}
