//! YAML pipeline files.
//!
//! A pipeline describes an 8-bit owner volume, named operand volumes and an
//! ordered list of steps:
//!
//! ```yaml
//! shape: [64, 64, 16]
//! parallel: true
//! owner: const:5
//! operands:
//!   density:
//!     type: f32
//!     fill: ramp
//! steps:
//!   - smooth: 1.5
//!     target: density
//!   - combine: max
//!     operand: density
//!   - smooth: [1.0, 1.0, 0.0]
//! ```
//!
//! A `combine` step names the operation and the operand. A `smooth` step
//! takes one sigma or a per-axis `[x, y, z]` triple and smooths the owner
//! unless `target` names an operand. Steps run in file order.

use crate::commands::{Fill, smooth_volume};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::debug;
use voxa_core::{AnyVolume, PixelType, Shape, Volume};
use voxa_ops::{CombineOp, Sigma3};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPipeline {
    shape: [usize; 3],
    #[serde(default)]
    parallel: bool,
    owner: Option<String>,
    #[serde(default)]
    operands: BTreeMap<String, RawOperand>,
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOperand {
    #[serde(rename = "type")]
    kind: Option<String>,
    fill: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStep {
    combine: Option<String>,
    operand: Option<String>,
    smooth: Option<RawSigma>,
    target: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSigma {
    Uniform(f64),
    PerAxis([f64; 3]),
}

/// Operand volume declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct OperandSpec {
    pub kind: PixelType,
    pub fill: Fill,
}

/// Volume a smoothing step applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Owner,
    Operand(String),
}

/// One validated pipeline step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Combine { op: CombineOp, operand: String },
    Smooth { sigma: Sigma3, target: Target },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Combine { op, operand } => write!(f, "combine {op} {operand}"),
            Step::Smooth { sigma, target } => {
                write!(f, "smooth [{}, {}, {}]", sigma.x, sigma.y, sigma.z)?;
                match target {
                    Target::Owner => Ok(()),
                    Target::Operand(name) => write!(f, " {name}"),
                }
            }
        }
    }
}

/// Validated pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub shape: Shape,
    pub parallel: bool,
    pub owner: Fill,
    pub operands: BTreeMap<String, OperandSpec>,
    pub steps: Vec<Step>,
}

/// Volumes after the last step.
#[derive(Debug)]
pub struct PipelineOutput {
    pub owner: Volume<u8>,
    pub operands: BTreeMap<String, AnyVolume>,
}

impl Pipeline {
    /// Loads and validates a pipeline file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline: {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("Invalid pipeline: {}", path.display()))
    }

    /// Parses and validates pipeline YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: RawPipeline = serde_yaml::from_str(yaml).context("Malformed pipeline YAML")?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawPipeline) -> Result<Self> {
        let [nx, ny, nz] = raw.shape;
        if nx == 0 || ny == 0 || nz == 0 {
            bail!("shape [{nx}, {ny}, {nz}] has a zero extent");
        }
        let shape = Shape::new(nx, ny, nz);

        let owner = match raw.owner.as_deref() {
            Some(spec) => spec.parse::<Fill>().map_err(anyhow::Error::msg).context("owner")?,
            None => Fill::Const(0.0),
        };

        let mut operands = BTreeMap::new();
        for (name, op) in raw.operands {
            let kind = match op.kind.as_deref() {
                Some(k) => k.parse::<PixelType>().map_err(anyhow::Error::msg),
                None => Ok(PixelType::U8),
            }
            .with_context(|| format!("operand '{name}'"))?;
            let fill = op
                .fill
                .parse::<Fill>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("operand '{name}'"))?;
            operands.insert(name, OperandSpec { kind, fill });
        }

        let mut steps = Vec::with_capacity(raw.steps.len());
        for (i, step) in raw.steps.into_iter().enumerate() {
            let step = validate_step(step, &operands).with_context(|| format!("step {}", i + 1))?;
            steps.push(step);
        }

        Ok(Self {
            shape,
            parallel: raw.parallel,
            owner,
            operands,
            steps,
        })
    }

    /// Builds the volumes and runs every step in order.
    ///
    /// Stops at the first failing step; the error names it.
    pub fn execute(&self) -> Result<PipelineOutput> {
        let owner = self.owner.build(self.shape, PixelType::U8)?;
        let mut owner = Volume::<u8>::try_from(owner)?;

        let mut operands = BTreeMap::new();
        for (name, spec) in &self.operands {
            let vol = spec
                .fill
                .build(self.shape, spec.kind)
                .with_context(|| format!("operand '{name}'"))?;
            operands.insert(name.clone(), vol);
        }

        for (i, step) in self.steps.iter().enumerate() {
            debug!(index = i + 1, %step, "pipeline step");
            self.run_step(step, &mut owner, &mut operands)
                .with_context(|| format!("step {} ({step}) failed", i + 1))?;
        }

        Ok(PipelineOutput { owner, operands })
    }

    fn run_step(
        &self,
        step: &Step,
        owner: &mut Volume<u8>,
        operands: &mut BTreeMap<String, AnyVolume>,
    ) -> Result<()> {
        match step {
            Step::Combine { op, operand } => {
                let operand = operands
                    .get(operand)
                    .with_context(|| format!("unknown operand '{operand}'"))?;
                if self.parallel {
                    voxa_ops::parallel::combine(owner, operand, *op)?;
                } else {
                    voxa_ops::combine::combine(owner, operand, *op)?;
                }
            }
            Step::Smooth { sigma, target: Target::Owner } => {
                if self.parallel {
                    voxa_ops::parallel::smooth_gaussian(owner, sigma.x, sigma.y, sigma.z)?;
                } else {
                    voxa_ops::smooth::smooth_gaussian(owner, sigma.x, sigma.y, sigma.z)?;
                }
            }
            Step::Smooth { sigma, target: Target::Operand(name) } => {
                let vol = operands
                    .get_mut(name)
                    .with_context(|| format!("unknown operand '{name}'"))?;
                smooth_volume(vol, *sigma, self.parallel)?;
            }
        }
        Ok(())
    }
}

fn validate_step(step: RawStep, operands: &BTreeMap<String, OperandSpec>) -> Result<Step> {
    let check_operand = |name: &str| -> Result<()> {
        if !operands.contains_key(name) {
            bail!("unknown operand '{name}'");
        }
        Ok(())
    };

    match (step.combine, step.smooth) {
        (Some(op), None) => {
            if step.target.is_some() {
                bail!("'target' is only valid on smooth steps");
            }
            let op: CombineOp = op.parse().map_err(anyhow::Error::msg)?;
            let operand = step.operand.context("combine step needs an 'operand'")?;
            check_operand(&operand)?;
            Ok(Step::Combine { op, operand })
        }
        (None, Some(sigma)) => {
            if step.operand.is_some() {
                bail!("'operand' is only valid on combine steps, use 'target'");
            }
            let sigma = match sigma {
                RawSigma::Uniform(s) => Sigma3::uniform(s),
                RawSigma::PerAxis([x, y, z]) => Sigma3::new(x, y, z),
            };
            let target = match step.target {
                Some(name) => {
                    check_operand(&name)?;
                    Target::Operand(name)
                }
                None => Target::Owner,
            };
            Ok(Step::Smooth { sigma, target })
        }
        (Some(_), Some(_)) => bail!("step has both 'combine' and 'smooth'"),
        (None, None) => bail!("step needs 'combine' or 'smooth'"),
    }
}
