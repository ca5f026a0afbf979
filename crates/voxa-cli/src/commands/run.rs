//! Pipeline command
//!
//! Loads a YAML pipeline, executes its steps in order and prints the
//! resulting volumes.

use crate::RunArgs;
use crate::pipeline::Pipeline;
use anyhow::Result;
use tracing::{info, trace};
use voxa_core::AnyVolume;

pub fn run(args: RunArgs, verbose: u8) -> Result<()> {
    trace!(path = %args.pipeline.display(), "run::run");

    let mut pipeline = Pipeline::load(&args.pipeline)?;
    if args.parallel {
        pipeline.parallel = true;
    }

    info!(steps = pipeline.steps.len(), operands = pipeline.operands.len(), "Running pipeline");
    if verbose > 0 {
        println!(
            "{}: {} steps on {}",
            args.pipeline.display(),
            pipeline.steps.len(),
            pipeline.shape
        );
        for (i, step) in pipeline.steps.iter().enumerate() {
            println!("  [{}] {step}", i + 1);
        }
    }

    let output = pipeline.execute()?;

    let owner: AnyVolume = output.owner.into();
    super::print_summary("owner", &owner);
    if verbose > 0 {
        for (name, vol) in &output.operands {
            super::print_summary(name, vol);
        }
    }
    Ok(())
}
