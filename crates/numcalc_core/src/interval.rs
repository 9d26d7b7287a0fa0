//! One-dimensional subdivided intervals and the per-axis sampling rules.

use crate::error::{CalcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A closed interval `[lower, upper]` split into `n` equal subintervals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
    pub n: u32,
}

impl Interval {
    pub fn new(lower: f64, upper: f64, n: u32) -> Result<Self> {
        let interval = Self { lower, upper, n };
        interval.validate()?;
        Ok(interval)
    }

    /// Checks the invariants. Intervals built through serde skip [`Interval::new`],
    /// so the engines call this again before sampling.
    pub fn validate(&self) -> Result<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(CalcError::InvalidGeometry(format!(
                "interval bounds must be finite, got [{}, {}]",
                self.lower, self.upper
            )));
        }
        if self.lower > self.upper {
            return Err(CalcError::InvalidGeometry(format!(
                "interval lower bound {} exceeds upper bound {}",
                self.lower, self.upper
            )));
        }
        if self.n == 0 {
            return Err(CalcError::InvalidGeometry(
                "interval must have at least one subdivision".to_string(),
            ));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Width of one subinterval.
    pub fn step(&self) -> f64 {
        self.width() / f64::from(self.n)
    }

    pub fn subdivisions(&self) -> usize {
        self.n as usize
    }
}

/// Checks a whole interval tuple before any sampling takes place.
pub fn validate_intervals(intervals: &[Interval]) -> Result<()> {
    if intervals.is_empty() {
        return Err(CalcError::InvalidGeometry(
            "at least one interval is required".to_string(),
        ));
    }
    intervals.iter().try_for_each(Interval::validate)
}

/// Volume of one grid cell, `prod((upper_i - lower_i) / n_i)`.
pub fn cell_volume(intervals: &[Interval]) -> Result<f64> {
    validate_intervals(intervals)?;
    let (extent, cells) = intervals.iter().fold((1.0, 1.0), |(extent, cells), interval| {
        (extent * interval.width(), cells * f64::from(interval.n))
    });
    Ok(extent / cells)
}

/// Where a subinterval is sampled along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingRule {
    Left,
    Right,
    Midpoint,
    /// Grid vertices rather than cell samples; `i` ranges over `0..=n`.
    Endpoint,
}

impl SamplingRule {
    pub const ALL: [SamplingRule; 4] = [
        SamplingRule::Left,
        SamplingRule::Right,
        SamplingRule::Midpoint,
        SamplingRule::Endpoint,
    ];

    /// Integer selector exposed to host environments.
    pub fn code(self) -> i32 {
        match self {
            SamplingRule::Left => 0,
            SamplingRule::Right => 1,
            SamplingRule::Midpoint => 2,
            SamplingRule::Endpoint => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SamplingRule::Left => "left",
            SamplingRule::Right => "right",
            SamplingRule::Midpoint => "midpoint",
            SamplingRule::Endpoint => "endpoint",
        }
    }

    /// Number of valid sample indices along an axis with `n` subdivisions.
    ///
    /// `Endpoint` needs `n + 1`, which does not fit a 32-bit `usize` when
    /// `n == u32::MAX`.
    pub fn index_limit(self, n: u32) -> Result<usize> {
        let n = n as usize;
        match self {
            SamplingRule::Endpoint => n.checked_add(1).ok_or_else(|| {
                CalcError::InvalidGeometry(format!("{n} subdivisions have too many vertices"))
            }),
            _ => Ok(n),
        }
    }

    /// Coordinate of sample `i` along `interval`.
    pub fn sample(self, interval: &Interval, i: usize) -> Result<f64> {
        let limit = self.index_limit(interval.n)?;
        if i >= limit {
            return Err(CalcError::IndexOutOfBounds { index: i, limit });
        }
        Ok(self.sample_unchecked(interval, i))
    }

    pub(crate) fn sample_unchecked(self, interval: &Interval, i: usize) -> f64 {
        let dx = interval.step();
        let i = i as f64;
        match self {
            SamplingRule::Left => interval.lower + i * dx,
            SamplingRule::Right => interval.lower + (i + 1.0) * dx,
            SamplingRule::Midpoint => interval.lower + (i + 0.5) * dx,
            SamplingRule::Endpoint => {
                if i == f64::from(interval.n) {
                    interval.upper
                } else {
                    interval.lower + i * dx
                }
            }
        }
    }
}

impl TryFrom<i32> for SamplingRule {
    type Error = CalcError;

    fn try_from(code: i32) -> Result<Self> {
        SamplingRule::ALL
            .into_iter()
            .find(|rule| rule.code() == code)
            .ok_or_else(|| CalcError::InvalidConfiguration(format!("unknown sampling rule {code}")))
    }
}

impl FromStr for SamplingRule {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        SamplingRule::ALL
            .into_iter()
            .find(|rule| rule.name() == lowered)
            .ok_or_else(|| CalcError::InvalidConfiguration(format!("unknown sampling rule '{s}'")))
    }
}

impl fmt::Display for SamplingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
