//! voxa - volume processing CLI
//!
//! Runs the combine and smoothing engines on synthetic volumes and YAML
//! pipelines.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use voxa_core::{PixelType, Shape};
use voxa_ops::CombineOp;

mod commands;
mod pipeline;

use commands::Fill;

#[derive(Parser)]
#[command(name = "voxa")]
#[command(author, version, about = "In-memory volume processing CLI")]
#[command(long_about = "
Elementwise combine and recursive Gaussian smoothing on 3D volumes.

Volumes are synthesized from fill specs: const:<v>, ramp, impulse:<v>.

Examples:
  voxa info -s 64x64x16 -t f32 -f ramp
  voxa combine -s 32x32x8 --owner const:250 --operand const:10 add
  voxa combine -s 32x32x8 --operand ramp -t i16 max
  voxa smooth -s 64x64x16 -t f64 -f impulse:1000 --sigma 2
  voxa smooth -s 64x64x16 -f ramp --sigma 2 --sigma-z 0
  voxa run pipeline.yaml
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a volume and print its shape, type and statistics
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Combine an operand volume into an 8-bit owner volume
    #[command(visible_alias = "c")]
    Combine(CombineArgs),

    /// Apply separable recursive Gaussian smoothing
    #[command(visible_alias = "s")]
    Smooth(SmoothArgs),

    /// Execute a YAML pipeline file
    Run(RunArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// Volume shape (NXxNYxNZ)
    #[arg(short, long, value_parser = commands::parse_shape)]
    shape: Shape,

    /// Pixel representation (u8, i16, f32, f64)
    #[arg(short = 't', long = "type", default_value = "u8")]
    pixel_type: PixelType,

    /// Fill spec
    #[arg(short, long, default_value = "const:0")]
    fill: Fill,
}

#[derive(Args)]
struct CombineArgs {
    /// Operation (max, min, add, sub, mul, div)
    op: CombineOp,

    /// Volume shape (NXxNYxNZ)
    #[arg(short, long, value_parser = commands::parse_shape)]
    shape: Shape,

    /// Fill spec of the 8-bit owner volume
    #[arg(long, default_value = "const:0")]
    owner: Fill,

    /// Fill spec of the operand volume
    #[arg(long)]
    operand: Fill,

    /// Operand representation (u8, i16, f32, f64)
    #[arg(short = 't', long = "type", default_value = "u8")]
    operand_type: PixelType,

    /// Process depth slices in parallel
    #[arg(short, long)]
    parallel: bool,
}

#[derive(Args)]
struct SmoothArgs {
    /// Volume shape (NXxNYxNZ)
    #[arg(short, long, value_parser = commands::parse_shape)]
    shape: Shape,

    /// Pixel representation (u8, i16, f32, f64)
    #[arg(short = 't', long = "type", default_value = "u8")]
    pixel_type: PixelType,

    /// Fill spec
    #[arg(short, long, default_value = "ramp")]
    fill: Fill,

    /// Sigma on every axis
    #[arg(long, default_value = "1.0")]
    sigma: f64,

    /// Sigma along X (overrides --sigma)
    #[arg(long)]
    sigma_x: Option<f64>,

    /// Sigma along Y (overrides --sigma)
    #[arg(long)]
    sigma_y: Option<f64>,

    /// Sigma along Z (overrides --sigma)
    #[arg(long)]
    sigma_z: Option<f64>,

    /// Filter lines in parallel
    #[arg(short, long)]
    parallel: bool,
}

#[derive(Args)]
struct RunArgs {
    /// Pipeline file (YAML)
    pipeline: PathBuf,

    /// Force parallel execution regardless of the file setting
    #[arg(short, long)]
    parallel: bool,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Combine(args) => commands::combine::run(args, cli.verbose),
        Commands::Smooth(args) => commands::smooth::run(args, cli.verbose),
        Commands::Run(args) => commands::run::run(args, cli.verbose),
    }
}
