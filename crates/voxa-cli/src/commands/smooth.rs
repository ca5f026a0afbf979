//! Smooth command
//!
//! Applies separable recursive Gaussian smoothing to a synthetic volume.

use crate::SmoothArgs;
use anyhow::{Context, Result};
use tracing::{info, trace};
use voxa_ops::Sigma3;

pub fn run(args: SmoothArgs, verbose: u8) -> Result<()> {
    let sigma = Sigma3::new(
        args.sigma_x.unwrap_or(args.sigma),
        args.sigma_y.unwrap_or(args.sigma),
        args.sigma_z.unwrap_or(args.sigma),
    );
    trace!(shape = %args.shape, kind = %args.pixel_type, ?sigma, "smooth::run");

    let mut vol = args.fill.build(args.shape, args.pixel_type)?;
    if verbose > 1 {
        super::print_summary("Input", &vol);
    }

    info!(sx = sigma.x, sy = sigma.y, sz = sigma.z, parallel = args.parallel, "Smoothing volume");
    if verbose > 0 {
        println!(
            "Smoothing {} volume {} (sigma x={} y={} z={})",
            args.pixel_type, args.shape, sigma.x, sigma.y, sigma.z
        );
    }

    super::smooth_volume(&mut vol, sigma, args.parallel).context("Smoothing failed")?;

    super::print_summary("Result", &vol);
    Ok(())
}
