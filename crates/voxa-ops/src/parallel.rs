//! Parallel volume operations using Rayon.
//!
//! Parallel versions of [`combine`](crate::combine::combine) and
//! [`smooth_gaussian`](crate::smooth::smooth_gaussian). Depth slices (and
//! lines within one axis sweep) are independent, so they are distributed
//! over the rayon pool; the X, Y and Z sweeps still run one after another.
//!
//! Smoothing results are bit-identical to the sequential versions. For
//! [`CombineOp::Divide`](crate::CombineOp::Divide), which slices were already
//! mutated when a zero divisor is found is unspecified.
//!
//! # Example
//!
//! ```rust
//! use voxa_core::{Shape, Volume};
//! use voxa_ops::parallel;
//!
//! let mut vol: Volume<f32> = Volume::filled(Shape::new(64, 64, 16), 0.5).unwrap();
//! parallel::smooth_gaussian(&mut vol, 2.0, 2.0, 1.0).unwrap();
//! ```

use crate::OpsResult;
use crate::combine::{self, CombineOp};
use crate::iir::convolve_iir_in_place;
use crate::smooth::{IirCoefficients, Sigma3, axis_is_active};
use rayon::prelude::*;
use tracing::{debug, trace};
use voxa_core::{Axis, Error, Sample, Volume, VolumeStorage};

/// Parallel elementwise combine, one task per depth slice.
///
/// Same checks and per-sample semantics as
/// [`combine::combine`](crate::combine::combine).
pub fn combine<S>(owner: &mut Volume<u8>, operand: &S, op: CombineOp) -> OpsResult<()>
where
    S: VolumeStorage + Sync + ?Sized,
{
    let kind = combine::validate(owner, operand)?;
    let shape = owner.shape();
    trace!(%shape, %op, operand = %kind, "parallel::combine");

    let slices: Vec<&mut [u8]> = owner.slices_mut().collect();
    slices.into_par_iter().enumerate().try_for_each(|(z, dst)| -> OpsResult<()> {
        let view = operand.slice_view(z)?;
        if view.len() != dst.len() {
            return Err(Error::invalid_dimensions(
                shape,
                format!("operand slice {z} holds {} samples", view.len()),
            )
            .into());
        }
        combine::combine_slice(dst, view, op)
            .map_err(|index| Error::divide_by_zero(z, index).into())
    })
}

/// Parallel separable Gaussian smoothing with per-axis sigmas.
pub fn smooth_gaussian<T: Sample>(
    volume: &mut Volume<T>,
    sigma_x: f64,
    sigma_y: f64,
    sigma_z: f64,
) -> OpsResult<()> {
    let sigma = Sigma3::new(sigma_x, sigma_y, sigma_z);
    let shape = volume.shape();
    trace!(%shape, sx = sigma.x, sy = sigma.y, sz = sigma.z, "parallel::smooth_gaussian");

    for axis in Axis::ALL {
        let s = sigma.get(axis);
        if !axis_is_active(shape.extent(axis), s) {
            debug!(%axis, sigma = s, "skipping axis");
            continue;
        }
        let poles = IirCoefficients::from_sigma(s).as_array();
        debug!(%axis, sigma = s, pole = poles[0], "recursive gaussian pass");
        match axis {
            Axis::X => smooth_rows(volume, &poles)?,
            Axis::Y => smooth_columns(volume, &poles)?,
            Axis::Z => smooth_depth(volume, &poles)?,
        }
    }
    Ok(())
}

/// Parallel smoothing with one sigma on every axis.
pub fn smooth_gaussian_uniform<T: Sample>(volume: &mut Volume<T>, sigma: f64) -> OpsResult<()> {
    smooth_gaussian(volume, sigma, sigma, sigma)
}

fn smooth_rows<T: Sample>(volume: &mut Volume<T>, poles: &[f64]) -> OpsResult<()> {
    let nx = volume.shape().nx;
    let slices: Vec<&mut [T]> = volume.slices_mut().collect();
    slices.into_par_iter().try_for_each(|slice| -> OpsResult<()> {
        let mut line = vec![0.0; nx];
        for row in slice.chunks_mut(nx) {
            for (dst, &v) in line.iter_mut().zip(row.iter()) {
                *dst = v.to_f64();
            }
            convolve_iir_in_place(&mut line, poles)?;
            for (dst, &v) in row.iter_mut().zip(&line) {
                *dst = T::from_f64(v);
            }
        }
        Ok(())
    })
}

fn smooth_columns<T: Sample>(volume: &mut Volume<T>, poles: &[f64]) -> OpsResult<()> {
    let shape = volume.shape();
    let (nx, ny) = (shape.nx, shape.ny);
    let slices: Vec<&mut [T]> = volume.slices_mut().collect();
    slices.into_par_iter().try_for_each(|slice| -> OpsResult<()> {
        let mut line = vec![0.0; ny];
        for x in 0..nx {
            for (y, dst) in line.iter_mut().enumerate() {
                *dst = slice[y * nx + x].to_f64();
            }
            convolve_iir_in_place(&mut line, poles)?;
            for (y, &v) in line.iter().enumerate() {
                slice[y * nx + x] = T::from_f64(v);
            }
        }
        Ok(())
    })
}

fn smooth_depth<T: Sample>(volume: &mut Volume<T>, poles: &[f64]) -> OpsResult<()> {
    let shape = volume.shape();
    let src = &*volume;

    // Lines are indexed by their position inside a slice
    let lines = (0..shape.slice_len())
        .into_par_iter()
        .map(|i| -> OpsResult<Vec<f64>> {
            let mut line: Vec<f64> = src.slices().map(|s| s[i].to_f64()).collect();
            convolve_iir_in_place(&mut line, poles)?;
            Ok(line)
        })
        .collect::<OpsResult<Vec<Vec<f64>>>>()?;

    let slices: Vec<&mut [T]> = volume.slices_mut().collect();
    slices.into_par_iter().enumerate().for_each(|(z, slice)| {
        for (dst, line) in slice.iter_mut().zip(&lines) {
            *dst = T::from_f64(line[z]);
        }
    });
    Ok(())
}
