//! Recursive (IIR) convolution primitive.
//!
//! Applies a cascade of symmetric first-order recursive filters to a 1D
//! line. Each pole `z` contributes one causal and one anti-causal pass:
//!
//! ```text
//! c+[k] = s[k] + z * c+[k-1]             (causal)
//! c-[k] = z * (c-[k+1] - c+[k])          (anti-causal)
//! ```
//!
//! The input is first scaled by `prod (1 - z)(1 - 1/z)` so a constant line
//! keeps its value. Both passes start from mirror-symmetric boundary
//! conditions, so the line is treated as reflected about its end samples.
//!
//! # Example
//!
//! ```rust
//! use voxa_ops::iir::convolve_iir;
//!
//! let line = vec![4.0; 10];
//! let out = convolve_iir(&line, &[0.5, 0.5]).unwrap();
//! assert_eq!(out.len(), 10);
//! assert!(out.iter().all(|v| (v - 4.0).abs() < 1e-9));
//! ```

use crate::{OpsError, OpsResult};

/// Truncation tolerance of the causal boundary sum.
///
/// Terms of the mirror sum smaller than this relative weight are dropped
/// when the line is longer than the filter's effective support.
pub const BOUNDARY_TOLERANCE: f64 = 1e-10;

/// Filters `line` with the recursive filter defined by `poles`.
///
/// Returns a new buffer of the same length. Lines of length 0 or 1 are
/// returned unchanged. Poles with magnitude below [`f64::EPSILON`] act as
/// identity.
///
/// # Errors
///
/// Returns [`OpsError::InvalidParameter`] if a pole is not finite or its
/// magnitude is not below 1 (the filter would be unstable).
pub fn convolve_iir(line: &[f64], poles: &[f64]) -> OpsResult<Vec<f64>> {
    let mut out = line.to_vec();
    convolve_iir_in_place(&mut out, poles)?;
    Ok(out)
}

/// In-place variant of [`convolve_iir`].
pub fn convolve_iir_in_place(c: &mut [f64], poles: &[f64]) -> OpsResult<()> {
    for &z in poles {
        if !z.is_finite() || z.abs() >= 1.0 {
            return Err(OpsError::InvalidParameter(format!(
                "recursive filter pole {z} must be finite with magnitude below 1"
            )));
        }
    }

    let len = c.len();
    if len <= 1 {
        return Ok(());
    }

    let active: Vec<f64> = poles.iter().copied().filter(|z| z.abs() >= f64::EPSILON).collect();
    if active.is_empty() {
        return Ok(());
    }

    let gain: f64 = active.iter().map(|&z| (1.0 - z) * (1.0 - 1.0 / z)).product();
    for v in c.iter_mut() {
        *v *= gain;
    }

    for &z in &active {
        c[0] = initial_causal(c, z);
        for k in 1..len {
            c[k] += z * c[k - 1];
        }
        c[len - 1] = initial_anticausal(c, z);
        for k in (0..len - 1).rev() {
            c[k] = z * (c[k + 1] - c[k]);
        }
    }

    Ok(())
}

/// Initial causal coefficient for mirror boundaries.
fn initial_causal(c: &[f64], z: f64) -> f64 {
    let len = c.len();
    let horizon = (BOUNDARY_TOLERANCE.ln() / z.abs().ln()).ceil() as usize;

    if horizon < len {
        // Truncated geometric sum
        let mut zn = z;
        let mut sum = c[0];
        for &v in &c[1..horizon.max(1)] {
            sum += zn * v;
            zn *= z;
        }
        sum
    } else {
        // Full mirror sum
        let iz = 1.0 / z;
        let mut zn = z;
        let mut z2n = z.powi((len - 1) as i32);
        let mut sum = c[0] + z2n * c[len - 1];
        z2n *= z2n * iz;
        for &v in &c[1..len - 1] {
            sum += (zn + z2n) * v;
            zn *= z;
            z2n *= iz;
        }
        sum / (1.0 - zn * zn)
    }
}

/// Initial anti-causal coefficient for mirror boundaries.
#[inline]
fn initial_anticausal(c: &[f64], z: f64) -> f64 {
    let len = c.len();
    (z / (z * z - 1.0)) * (z * c[len - 2] + c[len - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_constant_line_preserved() {
        for len in [2, 3, 7, 64, 300] {
            let line = vec![3.25; len];
            let out = convolve_iir(&line, &[0.3, 0.3, 0.3]).unwrap();
            for v in out {
                assert_abs_diff_eq!(v, 3.25, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_short_lines_untouched() {
        assert!(convolve_iir(&[], &[0.5]).unwrap().is_empty());
        assert_eq!(convolve_iir(&[7.0], &[0.5]).unwrap(), vec![7.0]);
    }

    #[test]
    fn test_impulse_symmetric_and_normalized() {
        let mut line = vec![0.0; 61];
        line[30] = 1.0;
        let out = convolve_iir(&line, &[0.4, 0.4, 0.4]).unwrap();

        for k in 0..30 {
            assert_abs_diff_eq!(out[30 - k], out[30 + k], epsilon = 1e-12);
        }
        // Peak at the impulse, decaying outwards
        assert!(out[30] > out[29] && out[29] > out[28]);
        let mass: f64 = out.iter().sum();
        assert_abs_diff_eq!(mass, 1.0, epsilon = 1e-8);
    }

    #[test]
    fn test_tiny_pole_is_identity() {
        let line = vec![1.0, 5.0, -2.0, 8.0];
        assert_eq!(convolve_iir(&line, &[0.0]).unwrap(), line);
        assert_eq!(convolve_iir(&line, &[]).unwrap(), line);
    }

    #[test]
    fn test_unstable_poles_rejected() {
        let line = vec![1.0; 4];
        assert!(matches!(
            convolve_iir(&line, &[1.0]),
            Err(OpsError::InvalidParameter(_))
        ));
        assert!(convolve_iir(&line, &[f64::NAN]).is_err());
        assert!(convolve_iir(&line, &[-1.5]).is_err());
    }

    /// Direct convolution with the equivalent symmetric exponential kernel
    /// `(1 - z) / (1 + z) * z^|k|` over the mirror-extended line.
    fn reference(line: &[f64], z: f64) -> Vec<f64> {
        let n = line.len() as i64;
        let period = 2 * n - 2;
        let mirror = |i: i64| {
            let r = i.rem_euclid(period);
            if r < n { r } else { period - r }
        };
        let norm = (1.0 - z) / (1.0 + z);
        (0..n)
            .map(|i| {
                (-200..=200i64)
                    .map(|k| norm * z.powi(k.abs() as i32) * line[mirror(i - k) as usize])
                    .sum::<f64>()
            })
            .collect()
    }

    #[test]
    fn test_matches_mirrored_exponential_kernel() {
        let short = [1.0, 4.0, 2.0, 8.0, 5.0, 7.0];
        let long: Vec<f64> = (0..40).map(|i| ((i * 37) % 11) as f64).collect();
        for line in [&short[..], &long[..]] {
            let out = convolve_iir(line, &[0.2]).unwrap();
            let expected = reference(line, 0.2);
            for (a, b) in out.iter().zip(&expected) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-8);
            }
        }
    }
}
