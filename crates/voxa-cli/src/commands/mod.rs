//! CLI command implementations

pub mod combine;
pub mod info;
pub mod run;
pub mod smooth;

use anyhow::{Context, Result};
use std::fmt;
use std::str::FromStr;
use voxa_core::{AnyVolume, PixelType, Shape};
use voxa_ops::{OpsResult, Sigma3};

/// Synthetic volume content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    /// Every sample set to the value.
    Const(f64),
    /// Sample at `(x, y, z)` set to `x + y + z`.
    Ramp,
    /// Value at the centre voxel, zero elsewhere.
    Impulse(f64),
}

impl Fill {
    /// Builds a volume of `kind` with this content.
    pub fn build(&self, shape: Shape, kind: PixelType) -> Result<AnyVolume> {
        let vol = match *self {
            Fill::Const(v) => AnyVolume::filled(shape, kind, v),
            Fill::Ramp => AnyVolume::from_fn(shape, kind, |x, y, z| (x + y + z) as f64),
            Fill::Impulse(v) => {
                let (cx, cy, cz) = (shape.nx / 2, shape.ny / 2, shape.nz / 2);
                AnyVolume::from_fn(shape, kind, |x, y, z| {
                    if (x, y, z) == (cx, cy, cz) { v } else { 0.0 }
                })
            }
        };
        vol.with_context(|| format!("Failed to build {kind} volume {shape} from '{self}'"))
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fill::Const(v) => write!(f, "const:{v}"),
            Fill::Ramp => f.write_str("ramp"),
            Fill::Impulse(v) => write!(f, "impulse:{v}"),
        }
    }
}

impl FromStr for Fill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = match s.split_once(':') {
            Some((k, v)) => (k, Some(v)),
            None => (s, None),
        };
        let parse_value = |v: Option<&str>| -> Result<f64, String> {
            let v = v.ok_or_else(|| format!("fill '{s}' needs a value, e.g. {kind}:1"))?;
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid fill value '{v}': {e}"))
        };
        match kind.trim().to_ascii_lowercase().as_str() {
            "const" | "constant" => Ok(Fill::Const(parse_value(value)?)),
            "impulse" => Ok(Fill::Impulse(parse_value(value)?)),
            "ramp" if value.is_none() => Ok(Fill::Ramp),
            _ => Err(format!(
                "unknown fill '{s}' (expected const:<v>, ramp, impulse:<v>)"
            )),
        }
    }
}

/// Parses `NXxNYxNZ` or `NX,NY,NZ`.
pub fn parse_shape(s: &str) -> Result<Shape, String> {
    let parts: Vec<&str> = if s.contains(',') {
        s.split(',').collect()
    } else {
        s.split(['x', 'X']).collect()
    };
    if parts.len() != 3 {
        return Err(format!("invalid shape '{s}' (expected NXxNYxNZ)"));
    }
    let mut dims = [0usize; 3];
    for (dim, part) in dims.iter_mut().zip(&parts) {
        *dim = part
            .trim()
            .parse()
            .map_err(|e| format!("invalid extent '{part}': {e}"))?;
        if *dim == 0 {
            return Err(format!("shape '{s}' has a zero extent"));
        }
    }
    Ok(Shape::new(dims[0], dims[1], dims[2]))
}

/// Smooths a runtime-typed volume, optionally on the rayon pool.
pub fn smooth_volume(vol: &mut AnyVolume, sigma: Sigma3, parallel: bool) -> OpsResult<()> {
    if !parallel {
        return voxa_ops::smooth::smooth_gaussian(vol, sigma.x, sigma.y, sigma.z);
    }
    use voxa_ops::parallel::smooth_gaussian;
    match vol {
        AnyVolume::U8(v) => smooth_gaussian(v, sigma.x, sigma.y, sigma.z),
        AnyVolume::I16(v) => smooth_gaussian(v, sigma.x, sigma.y, sigma.z),
        AnyVolume::F32(v) => smooth_gaussian(v, sigma.x, sigma.y, sigma.z),
        AnyVolume::F64(v) => smooth_gaussian(v, sigma.x, sigma.y, sigma.z),
    }
}

/// Prints shape, representation and statistics.
pub fn print_summary(label: &str, vol: &AnyVolume) {
    let shape = vol.shape();
    let kind = vol.kind();
    let stats = vol.stats();
    println!("{label}");
    println!("  Shape:   {shape}");
    println!("  Type:    {kind} ({} bits)", kind.bits());
    println!("  Samples: {}", shape.len());
    println!("  Bytes:   {}", shape.len() * kind.bytes());
    println!("  Min:     {}", stats.min);
    println!("  Max:     {}", stats.max);
    println!("  Mean:    {:.6}", stats.mean);
}
