//! Volume info command.
//!
//! Builds a synthetic volume and prints its shape, representation and
//! summary statistics.

use crate::InfoArgs;
use anyhow::Result;
use tracing::trace;

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    trace!(shape = %args.shape, kind = %args.pixel_type, fill = %args.fill, "info::run");

    let vol = args.fill.build(args.shape, args.pixel_type)?;
    super::print_summary(&format!("{} volume ({})", args.pixel_type, args.fill), &vol);

    if verbose > 0 {
        println!("  Slices:  {} x {} samples", args.shape.nz, args.shape.slice_len());
    }
    Ok(())
}
