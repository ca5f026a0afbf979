//! Table-driven combine cases.
//!
//! Each case combines a constant 8-bit owner with a constant operand of one
//! representation and states the expected owner value (or the expected
//! error). The table lives in YAML so new cases need no code:
//!
//! ```yaml
//! - name: add wraps
//!   owner: 250
//!   type: u8
//!   operand: 10
//!   op: add
//!   expect: 4
//! ```

use serde::Deserialize;
use std::path::Path;
use voxa_core::{AnyVolume, PixelType, Shape, Volume};
use voxa_ops::{CombineOp, OpsError, combine::combine};

/// Built-in cases covering narrowing of every representation.
pub const COMBINE_CASES: &str = r#"
- { name: max takes operand,      owner: 5,   type: u8,  operand: 9,      op: max, expect: 9 }
- { name: min takes operand,      owner: 9,   type: u8,  operand: 3,      op: min, expect: 3 }
- { name: add wraps,              owner: 250, type: u8,  operand: 10,     op: add, expect: 4 }
- { name: sub wraps,              owner: 4,   type: u8,  operand: 10,     op: sub, expect: 250 }
- { name: i16 low byte,           owner: 1,   type: i16, operand: 300,    op: add, expect: 45 }
- { name: i16 negative,           owner: 0,   type: i16, operand: -1,     op: add, expect: 255 }
- { name: mul wraps,              owner: 16,  type: i16, operand: 17,     op: mul, expect: 16 }
- { name: max is signed,          owner: 200, type: i16, operand: 100,    op: max, expect: 100 }
- { name: min is signed,          owner: 100, type: u8,  operand: 200,    op: min, expect: 200 }
- { name: f32 negative fraction,  owner: 100, type: f32, operand: -1.5,   op: max, expect: 255 }
- { name: f32 above range,        owner: 100, type: f32, operand: 1000.0, op: max, expect: 232 }
- { name: f32 truncates,          owner: 0,   type: f32, operand: 300.9,  op: sub, expect: 212 }
- { name: f64 nan is zero,        owner: 10,  type: f64, operand: .nan,   op: add, expect: 10 }
- { name: f64 saturates high,     owner: 0,   type: f64, operand: 1.0e10, op: add, expect: 255 }
- { name: f64 saturates low,      owner: 0,   type: f64, operand: -1.0e10, op: add, expect: 0 }
- { name: div truncates,          owner: 100, type: f64, operand: 7.9,    op: div, expect: 14 }
- { name: div is signed,          owner: 200, type: u8,  operand: 7,      op: div, expect: 248 }
- { name: div negative divisor,   owner: 100, type: i16, operand: -3,     op: div, expect: 223 }
- { name: div by fraction,        owner: 5,   type: f64, operand: 0.99,   op: div, expect: divide_by_zero }
- { name: div by wrapped zero,    owner: 5,   type: i16, operand: 512,    op: div, expect: divide_by_zero }
"#;

/// Expected outcome of a case.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Expect {
    /// Owner value after the combine.
    Value(u8),
    /// Error kind: `divide_by_zero`, `shape_mismatch` or
    /// `unsupported_representation`.
    Error(String),
}

/// One combine case.
#[derive(Debug, Clone, Deserialize)]
pub struct CombineCase {
    pub name: String,
    pub owner: u8,
    #[serde(rename = "type")]
    pub kind: String,
    pub operand: f64,
    pub op: String,
    pub expect: Expect,
}

impl CombineCase {
    /// Runs the case on volumes of `shape` and returns the owner value at
    /// the origin.
    pub fn run(&self, shape: Shape) -> Result<u8, OpsError> {
        let kind: PixelType = self.kind.parse().map_err(OpsError::InvalidParameter)?;
        let op: CombineOp = self.op.parse().map_err(OpsError::InvalidParameter)?;
        let mut owner: Volume<u8> = Volume::filled(shape, self.owner)?;
        let operand = AnyVolume::filled(shape, kind, self.operand)?;
        combine(&mut owner, &operand, op)?;
        Ok(owner.get(0, 0, 0))
    }

    /// Checks the outcome of [`run`](Self::run) against [`expect`](Self::expect).
    pub fn check(&self, result: &Result<u8, OpsError>) -> bool {
        match (&self.expect, result) {
            (Expect::Value(v), Ok(got)) => v == got,
            (Expect::Error(kind), Err(e)) => match kind.as_str() {
                "divide_by_zero" => e.is_divide_by_zero(),
                "shape_mismatch" => e.is_shape_mismatch(),
                "unsupported_representation" => e.is_unsupported_representation(),
                _ => false,
            },
            _ => false,
        }
    }
}

/// Parses a case table.
pub fn parse_cases(yaml: &str) -> Result<Vec<CombineCase>, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Loads a case table from `path`, or `None` if it cannot be read or parsed.
pub fn load_cases(path: &Path) -> Option<Vec<CombineCase>> {
    let text = std::fs::read_to_string(path).ok()?;
    parse_cases(&text).ok()
}
