//! Partial finite differences and difference quotients.
//!
//! Every stencil works one axis at a time: all coordinates except axis `i`
//! are held at the evaluation point while the function is sampled at offsets
//! along `e_i`. Orders one and two use closed-form stencils; higher orders
//! use the binomial-weighted sum.

use crate::combinatorics::{binomial_coefficient, power};
use crate::error::{try_clone, try_zeroed, CalcError, Result};
use crate::function::RealFunction;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stencil family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiniteDifferenceKind {
    Forward,
    Backward,
    Central,
}

impl FiniteDifferenceKind {
    pub const ALL: [FiniteDifferenceKind; 3] = [
        FiniteDifferenceKind::Forward,
        FiniteDifferenceKind::Backward,
        FiniteDifferenceKind::Central,
    ];

    /// Integer selector exposed to host environments.
    pub fn code(self) -> i32 {
        match self {
            FiniteDifferenceKind::Forward => 0,
            FiniteDifferenceKind::Backward => 1,
            FiniteDifferenceKind::Central => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FiniteDifferenceKind::Forward => "forward",
            FiniteDifferenceKind::Backward => "backward",
            FiniteDifferenceKind::Central => "central",
        }
    }

    fn stencil(self) -> &'static Stencil {
        match self {
            FiniteDifferenceKind::Forward => &FORWARD,
            FiniteDifferenceKind::Backward => &BACKWARD,
            FiniteDifferenceKind::Central => &CENTRAL,
        }
    }
}

impl TryFrom<i32> for FiniteDifferenceKind {
    type Error = CalcError;

    fn try_from(code: i32) -> Result<Self> {
        FiniteDifferenceKind::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or_else(|| {
                CalcError::InvalidConfiguration(format!("unknown finite difference kind {code}"))
            })
    }
}

impl FromStr for FiniteDifferenceKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        FiniteDifferenceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == lowered)
            .ok_or_else(|| {
                CalcError::InvalidConfiguration(format!("unknown finite difference kind '{s}'"))
            })
    }
}

impl fmt::Display for FiniteDifferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings for [`difference_quotient_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferenceSettings {
    pub step: f64,
    pub order: u32,
    pub kind: FiniteDifferenceKind,
}

impl Default for DifferenceSettings {
    fn default() -> Self {
        Self {
            step: 1e-5,
            order: 1,
            kind: FiniteDifferenceKind::Central,
        }
    }
}

/// Raw finite difference along one axis. `shifted_x` is a scratch copy of the
/// evaluation point; stencils must leave it unchanged on success.
type AxisStencil = fn(&RealFunction, &[f64], &mut [f64], usize, f64, u32) -> Result<f64>;

struct Stencil {
    first: AxisStencil,
    second: AxisStencil,
    nth: AxisStencil,
}

static FORWARD: Stencil = Stencil {
    first: forward_first,
    second: forward_second,
    nth: forward_nth,
};

static BACKWARD: Stencil = Stencil {
    first: backward_first,
    second: backward_second,
    nth: backward_nth,
};

static CENTRAL: Stencil = Stencil {
    first: central_first,
    second: central_second,
    nth: central_nth,
};

/// Evaluates `f` at `x + offset * e_axis`, restoring `shifted_x` afterwards.
fn shifted(
    f: &RealFunction,
    x: &[f64],
    shifted_x: &mut [f64],
    axis: usize,
    offset: f64,
) -> Result<f64> {
    shifted_x[axis] = x[axis] + offset;
    let value = f.evaluate(shifted_x);
    shifted_x[axis] = x[axis];
    value
}

fn forward_first(
    f: &RealFunction,
    x: &[f64],
    shifted_x: &mut [f64],
    axis: usize,
    h: f64,
    _n: u32,
) -> Result<f64> {
    Ok(shifted(f, x, shifted_x, axis, h)? - f.evaluate(x)?)
}

fn forward_second(
    f: &RealFunction,
    x: &[f64],
    shifted_x: &mut [f64],
    axis: usize,
    h: f64,
    _n: u32,
) -> Result<f64> {
    let far = shifted(f, x, shifted_x, axis, 2.0 * h)?;
    let near = shifted(f, x, shifted_x, axis, h)?;
    Ok(far - 2.0 * near + f.evaluate(x)?)
}

fn forward_nth(
    f: &RealFunction,
    x: &[f64],
    shifted_x: &mut [f64],
    axis: usize,
    h: f64,
    n: u32,
) -> Result<f64> {
    let mut sum = 0.0;
    for k in 0..=n {
        let sign = if (n - k) % 2 == 0 { 1.0 } else { -1.0 };
        let weight = sign * binomial_coefficient(f64::from(n), k);
        sum += weight * shifted(f, x, shifted_x, axis, f64::from(k) * h)?;
    }
    Ok(sum)
}

fn backward_first(
    f: &RealFunction,
    x: &[f64],
    shifted_x: &mut [f64],
    axis: usize,
    h: f64,
    _n: u32,
) -> Result<f64> {
    Ok(f.evaluate(x)? - shifted(f, x, shifted_x, axis, -h)?)
}

fn backward_second(
    f: &RealFunction,
    x: &[f64],
    shifted_x: &mut [f64],
    axis: usize,
    h: f64,
    _n: u32,
) -> Result<f64> {
    let near = shifted(f, x, shifted_x, axis, -h)?;
    let far = shifted(f, x, shifted_x, axis, -2.0 * h)?;
    Ok(f.evaluate(x)? - 2.0 * near + far)
}

fn backward_nth(
    f: &RealFunction,
    x: &[f64],
    shifted_x: &mut [f64],
    axis: usize,
    h: f64,
    n: u32,
) -> Result<f64> {
    let mut sum = 0.0;
    for k in 0..=n {
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        let weight = sign * binomial_coefficient(f64::from(n), k);
        sum += weight * shifted(f, x, shifted_x, axis, -f64::from(k) * h)?;
    }
    Ok(sum)
}

fn central_first(
    f: &RealFunction,
    x: &[f64],
    shifted_x: &mut [f64],
    axis: usize,
    h: f64,
    _n: u32,
) -> Result<f64> {
    let ahead = shifted(f, x, shifted_x, axis, 0.5 * h)?;
    let behind = shifted(f, x, shifted_x, axis, -0.5 * h)?;
    Ok(ahead - behind)
}

fn central_second(
    f: &RealFunction,
    x: &[f64],
    shifted_x: &mut [f64],
    axis: usize,
    h: f64,
    _n: u32,
) -> Result<f64> {
    let ahead = shifted(f, x, shifted_x, axis, h)?;
    let behind = shifted(f, x, shifted_x, axis, -h)?;
    Ok(ahead - 2.0 * f.evaluate(x)? + behind)
}

/// Offsets are `(n/2 - k) h` with a real half, so odd orders sample at
/// half steps like [`central_first`].
fn central_nth(
    f: &RealFunction,
    x: &[f64],
    shifted_x: &mut [f64],
    axis: usize,
    h: f64,
    n: u32,
) -> Result<f64> {
    let half = 0.5 * f64::from(n);
    let mut sum = 0.0;
    for k in 0..=n {
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        let weight = sign * binomial_coefficient(f64::from(n), k);
        sum += weight * shifted(f, x, shifted_x, axis, (half - f64::from(k)) * h)?;
    }
    Ok(sum)
}

fn validate(x: &[f64], h: f64, n: u32) -> Result<()> {
    if x.is_empty() {
        return Err(CalcError::InvalidGeometry(
            "evaluation point must have at least one coordinate".to_string(),
        ));
    }
    if let Some(axis) = x.iter().position(|v| !v.is_finite()) {
        return Err(CalcError::InvalidGeometry(format!(
            "coordinate {axis} of the evaluation point is not finite"
        )));
    }
    if !h.is_finite() || h <= 0.0 {
        return Err(CalcError::InvalidConfiguration(format!(
            "step size must be finite and positive, got {h}"
        )));
    }
    if n == 0 {
        return Err(CalcError::InvalidConfiguration(
            "finite difference order must be at least one".to_string(),
        ));
    }
    Ok(())
}

/// Raw order-`n` partial finite differences of `f` at `x`, one per axis,
/// without the division by `h^n`.
pub fn finite_differences(
    f: &RealFunction,
    x: &[f64],
    h: f64,
    n: u32,
    kind: FiniteDifferenceKind,
) -> Result<Vec<f64>> {
    validate(x, h, n)?;

    let stencil = kind.stencil();
    let apply = match n {
        1 => stencil.first,
        2 => stencil.second,
        _ => stencil.nth,
    };

    let mut shifted_x = try_clone(x)?;
    let mut differences = try_zeroed(x.len())?;
    for (axis, slot) in differences.iter_mut().enumerate() {
        *slot = apply(f, x, &mut shifted_x, axis, h, n)?;
    }
    Ok(differences)
}

/// Order-`n` partial difference quotients of `f` at `x`:
/// `finite_differences(f, x, h, n, kind)[i] / h^n`.
pub fn difference_quotient(
    f: &RealFunction,
    x: &[f64],
    h: f64,
    n: u32,
    kind: FiniteDifferenceKind,
) -> Result<Vec<f64>> {
    debug!(
        "difference quotient: dim={}, h={}, order={}, kind={}",
        x.len(),
        h,
        n,
        kind
    );
    let mut quotients = finite_differences(f, x, h, n, kind)?;
    let scale = power(h, n);
    for q in &mut quotients {
        *q /= scale;
    }
    Ok(quotients)
}

pub fn difference_quotient_with(
    f: &RealFunction,
    x: &[f64],
    settings: &DifferenceSettings,
) -> Result<Vec<f64>> {
    difference_quotient(f, x, settings.step, settings.order, settings.kind)
}
