//! Combine command
//!
//! Combines a synthetic operand volume into an 8-bit owner volume.

use crate::CombineArgs;
use anyhow::{Context, Result};
use tracing::{info, trace};
use voxa_core::PixelType;
use voxa_ops::combine::combine;

pub fn run(args: CombineArgs, verbose: u8) -> Result<()> {
    trace!(shape = %args.shape, op = %args.op, owner = %args.owner, operand = %args.operand, "combine::run");

    let mut owner = args.owner.build(args.shape, PixelType::U8)?;
    let operand = args.operand.build(args.shape, args.operand_type)?;

    info!(op = %args.op, operand_type = %args.operand_type, parallel = args.parallel, "Combining volumes");
    if verbose > 0 {
        println!(
            "Combining u8 owner ({}) {} {} operand ({})",
            args.owner, args.op, args.operand_type, args.operand
        );
    }

    let target = owner.as_u8_mut().context("Owner volume is not 8-bit")?;
    let result = if args.parallel {
        voxa_ops::parallel::combine(target, &operand, args.op)
    } else {
        combine(target, &operand, args.op)
    };
    result.with_context(|| format!("{} failed", args.op))?;

    super::print_summary("Result", &owner);
    if verbose > 1 {
        super::print_summary("Operand", &operand);
    }
    Ok(())
}

