//! Maclaurin-series evaluation of the elementary transcendental functions.
//!
//! Each function sums its power series term by term until the next term no
//! longer changes the partial sum. Arguments outside a series' radius of
//! convergence are first mapped inside it with the usual identities
//! (halving and squaring for `exp`, mantissa/exponent splitting for `ln`,
//! reduction modulo `2 pi` for the circular functions, reciprocal and
//! half-angle forms for the inverse functions). Where no identity applies the
//! argument is rejected with [`CalcError::Domain`].

use crate::error::{CalcError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, LN_2, SQRT_2, TAU};
use std::str::FromStr;

/// Stopping criteria for the series loops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesSettings {
    /// Upper bound on the number of terms summed.
    pub max_terms: usize,
    /// Absolute cutoff on the magnitude of a term. Zero disables it, leaving
    /// only the "term no longer changes the sum" criterion.
    pub tolerance: f64,
}

impl Default for SeriesSettings {
    fn default() -> Self {
        Self {
            max_terms: 1000,
            tolerance: 0.0,
        }
    }
}

/// Sums `term(0) + term(1) + ...` until a term is negligible.
fn sum_series<F>(settings: &SeriesSettings, name: &str, mut term: F) -> f64
where
    F: FnMut(u32) -> f64,
{
    let mut sum = 0.0;
    for n in 0..settings.max_terms {
        let t = term(n as u32);
        let next = sum + t;
        let negligible = t == 0.0 || next == sum || t.abs() <= settings.tolerance;
        sum = next;
        if negligible && n > 0 {
            return sum;
        }
    }
    warn!(
        "{} series did not converge within {} terms",
        name, settings.max_terms
    );
    sum
}

fn check_finite(name: &str, x: f64) -> Result<()> {
    if x.is_finite() {
        Ok(())
    } else {
        Err(CalcError::Domain(format!("{name} requires a finite argument, got {x}")))
    }
}

fn reciprocal(name: &str, value: f64) -> Result<f64> {
    if value == 0.0 {
        Err(CalcError::Domain(format!("{name} has a pole at this argument")))
    } else {
        Ok(1.0 / value)
    }
}

/// `e^x`.
pub fn exp(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("exp", x)?;
    let mut y = x;
    let mut halvings = 0u32;
    while y.abs() > 0.5 {
        y *= 0.5;
        halvings += 1;
    }
    let mut term = 1.0;
    let mut value = sum_series(settings, "exp", |n| {
        if n > 0 {
            term *= y / f64::from(n);
        }
        term
    });
    for _ in 0..halvings {
        value *= value;
    }
    Ok(value)
}

/// `atanh(z)` for `|z| < 1`, the workhorse behind [`ln`].
fn atanh_series(z: f64, settings: &SeriesSettings) -> f64 {
    let z2 = z * z;
    let mut power = z;
    sum_series(settings, "atanh", |n| {
        if n > 0 {
            power *= z2;
        }
        power / f64::from(2 * n + 1)
    })
}

/// Natural logarithm, `x > 0`.
pub fn ln(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("ln", x)?;
    if x <= 0.0 {
        return Err(CalcError::Domain(format!("ln requires x > 0, got {x}")));
    }
    let mut mantissa = x;
    let mut exponent = 0i32;
    while mantissa > SQRT_2 {
        mantissa *= 0.5;
        exponent += 1;
    }
    while mantissa < FRAC_1_SQRT_2 {
        mantissa *= 2.0;
        exponent -= 1;
    }
    let z = (mantissa - 1.0) / (mantissa + 1.0);
    Ok(f64::from(exponent) * LN_2 + 2.0 * atanh_series(z, settings))
}

/// `1 / (1 - x)^alpha = sum C(alpha + n - 1, n) x^n` for `|x| < 1`, `alpha >= 1`.
pub fn geometric(x: f64, alpha: u32, settings: &SeriesSettings) -> Result<f64> {
    check_finite("geometric", x)?;
    if alpha == 0 {
        return Err(CalcError::InvalidConfiguration(
            "geometric series order must be at least one".to_string(),
        ));
    }
    if x.abs() >= 1.0 {
        return Err(CalcError::Domain(format!("geometric series requires |x| < 1, got {x}")));
    }
    let alpha = f64::from(alpha);
    let mut term = 1.0;
    Ok(sum_series(settings, "geometric", |n| {
        if n > 0 {
            let n = f64::from(n);
            term *= x * (alpha + n - 1.0) / n;
        }
        term
    }))
}

/// `(1 + x)^alpha = sum C(alpha, n) x^n`.
///
/// Converges for `|x| < 1`; when `alpha` is a non-negative integer the series
/// is a finite polynomial and any `x` is accepted.
pub fn binomial(x: f64, alpha: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("binomial", x)?;
    check_finite("binomial", alpha)?;
    let polynomial = alpha >= 0.0 && alpha.fract() == 0.0;
    if !polynomial && x.abs() >= 1.0 {
        return Err(CalcError::Domain(format!(
            "binomial series with exponent {alpha} requires |x| < 1, got {x}"
        )));
    }
    let mut term = 1.0;
    Ok(sum_series(settings, "binomial", |n| {
        if n > 0 {
            let n = f64::from(n);
            term *= x * (alpha - n + 1.0) / n;
        }
        term
    }))
}

/// `sqrt(1 + x)` for `|x| < 1`.
pub fn sqrt(x: f64, settings: &SeriesSettings) -> Result<f64> {
    binomial(x, 0.5, settings)
}

/// `1 / sqrt(1 + x)` for `|x| < 1`.
pub fn invsqrt(x: f64, settings: &SeriesSettings) -> Result<f64> {
    binomial(x, -0.5, settings)
}

fn reduce_angle(x: f64) -> f64 {
    x - TAU * (x / TAU).round()
}

pub fn sin(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("sin", x)?;
    let r = reduce_angle(x);
    let r2 = r * r;
    let mut term = r;
    Ok(sum_series(settings, "sin", |n| {
        if n > 0 {
            let k = f64::from(2 * n);
            term *= -r2 / (k * (k + 1.0));
        }
        term
    }))
}

pub fn cos(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("cos", x)?;
    let r = reduce_angle(x);
    let r2 = r * r;
    let mut term = 1.0;
    Ok(sum_series(settings, "cos", |n| {
        if n > 0 {
            let k = f64::from(2 * n);
            term *= -r2 / ((k - 1.0) * k);
        }
        term
    }))
}

pub fn tan(x: f64, settings: &SeriesSettings) -> Result<f64> {
    Ok(sin(x, settings)? * reciprocal("tan", cos(x, settings)?)?)
}

pub fn sec(x: f64, settings: &SeriesSettings) -> Result<f64> {
    reciprocal("sec", cos(x, settings)?)
}

pub fn csc(x: f64, settings: &SeriesSettings) -> Result<f64> {
    reciprocal("csc", sin(x, settings)?)
}

pub fn cot(x: f64, settings: &SeriesSettings) -> Result<f64> {
    Ok(cos(x, settings)? * reciprocal("cot", sin(x, settings)?)?)
}

/// `asin` series, valid for `|z| <= 1/2` where it converges quickly.
fn arcsin_series(z: f64, settings: &SeriesSettings) -> f64 {
    let z2 = z * z;
    let mut term = z;
    sum_series(settings, "arcsin", |n| {
        if n > 0 {
            let k = f64::from(2 * n);
            term *= z2 * (k - 1.0) * (k - 1.0) / (k * (k + 1.0));
        }
        term
    })
}

pub fn arcsin(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("arcsin", x)?;
    if x.abs() > 1.0 {
        return Err(CalcError::Domain(format!("arcsin requires |x| <= 1, got {x}")));
    }
    if x.abs() <= 0.5 {
        return Ok(arcsin_series(x, settings));
    }
    // asin|x| = pi/2 - 2 asin(sqrt((1 - |x|) / 2))
    let inner = arcsin_series(((1.0 - x.abs()) * 0.5).sqrt(), settings);
    Ok((FRAC_PI_2 - 2.0 * inner).copysign(x))
}

pub fn arccos(x: f64, settings: &SeriesSettings) -> Result<f64> {
    Ok(FRAC_PI_2 - arcsin(x, settings)?)
}

pub fn arctan(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("arctan", x)?;
    if x.abs() > 1.0 {
        return Ok(FRAC_PI_2.copysign(x) - arctan(1.0 / x, settings)?);
    }
    // atan(z) = 2 atan(z / (1 + sqrt(1 + z^2))), applied until |z| <= 1/4.
    let mut z = x;
    let mut scale = 1.0;
    while z.abs() > 0.25 {
        z /= 1.0 + (1.0 + z * z).sqrt();
        scale *= 2.0;
    }
    let z2 = z * z;
    let mut power = z;
    let series = sum_series(settings, "arctan", |n| {
        if n > 0 {
            power *= -z2;
        }
        power / f64::from(2 * n + 1)
    });
    Ok(scale * series)
}

/// `acos(1 / x)`, `|x| >= 1`.
pub fn arcsec(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("arcsec", x)?;
    if x.abs() < 1.0 {
        return Err(CalcError::Domain(format!("arcsec requires |x| >= 1, got {x}")));
    }
    arccos(1.0 / x, settings)
}

/// `asin(1 / x)`, `|x| >= 1`.
pub fn arccsc(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("arccsc", x)?;
    if x.abs() < 1.0 {
        return Err(CalcError::Domain(format!("arccsc requires |x| >= 1, got {x}")));
    }
    arcsin(1.0 / x, settings)
}

/// `pi/2 - atan(x)`, with values in `(0, pi)`.
pub fn arccot(x: f64, settings: &SeriesSettings) -> Result<f64> {
    Ok(FRAC_PI_2 - arctan(x, settings)?)
}

fn sinh_series(x: f64, settings: &SeriesSettings) -> f64 {
    let x2 = x * x;
    let mut term = x;
    sum_series(settings, "sinh", |n| {
        if n > 0 {
            let k = f64::from(2 * n);
            term *= x2 / (k * (k + 1.0));
        }
        term
    })
}

fn cosh_series(x: f64, settings: &SeriesSettings) -> f64 {
    let x2 = x * x;
    let mut term = 1.0;
    sum_series(settings, "cosh", |n| {
        if n > 0 {
            let k = f64::from(2 * n);
            term *= x2 / ((k - 1.0) * k);
        }
        term
    })
}

pub fn sinh(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("sinh", x)?;
    if x.abs() <= 1.0 {
        return Ok(sinh_series(x, settings));
    }
    Ok(0.5 * (exp(x, settings)? - exp(-x, settings)?))
}

pub fn cosh(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("cosh", x)?;
    if x.abs() <= 1.0 {
        return Ok(cosh_series(x, settings));
    }
    Ok(0.5 * (exp(x, settings)? + exp(-x, settings)?))
}

pub fn tanh(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("tanh", x)?;
    if x.abs() <= 1.0 {
        return Ok(sinh_series(x, settings) / cosh_series(x, settings));
    }
    let e = exp(2.0 * x.abs(), settings)?;
    Ok((1.0 - 2.0 / (e + 1.0)).copysign(x))
}

pub fn sech(x: f64, settings: &SeriesSettings) -> Result<f64> {
    reciprocal("sech", cosh(x, settings)?)
}

pub fn csch(x: f64, settings: &SeriesSettings) -> Result<f64> {
    reciprocal("csch", sinh(x, settings)?)
}

pub fn coth(x: f64, settings: &SeriesSettings) -> Result<f64> {
    reciprocal("coth", tanh(x, settings)?)
}

pub fn arcsinh(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("arcsinh", x)?;
    if x.abs() <= 0.5 {
        let x2 = x * x;
        let mut term = x;
        return Ok(sum_series(settings, "arcsinh", |n| {
            if n > 0 {
                let k = f64::from(2 * n);
                term *= -x2 * (k - 1.0) * (k - 1.0) / (k * (k + 1.0));
            }
            term
        }));
    }
    let a = x.abs();
    Ok(ln(a + (a * a + 1.0).sqrt(), settings)?.copysign(x))
}

pub fn arccosh(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("arccosh", x)?;
    if x < 1.0 {
        return Err(CalcError::Domain(format!("arccosh requires x >= 1, got {x}")));
    }
    ln(x + (x * x - 1.0).sqrt(), settings)
}

pub fn arctanh(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("arctanh", x)?;
    if x.abs() >= 1.0 {
        return Err(CalcError::Domain(format!("arctanh requires |x| < 1, got {x}")));
    }
    if x.abs() <= 0.5 {
        return Ok(atanh_series(x, settings));
    }
    Ok(0.5 * ln((1.0 + x) / (1.0 - x), settings)?)
}

/// `acosh(1 / x)`, `0 < x <= 1`.
pub fn arcsech(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("arcsech", x)?;
    if x <= 0.0 || x > 1.0 {
        return Err(CalcError::Domain(format!("arcsech requires 0 < x <= 1, got {x}")));
    }
    arccosh(1.0 / x, settings)
}

/// `asinh(1 / x)`, `x != 0`.
pub fn arccsch(x: f64, settings: &SeriesSettings) -> Result<f64> {
    arcsinh(reciprocal("arccsch", x)?, settings)
}

/// `atanh(1 / x)`, `|x| > 1`.
pub fn arccoth(x: f64, settings: &SeriesSettings) -> Result<f64> {
    check_finite("arccoth", x)?;
    if x.abs() <= 1.0 {
        return Err(CalcError::Domain(format!("arccoth requires |x| > 1, got {x}")));
    }
    arctanh(1.0 / x, settings)
}

/// Named series, as selected by host environments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum SeriesFunction {
    Exp,
    Ln,
    Geometric { alpha: u32 },
    Binomial { alpha: f64 },
    Sqrt,
    InvSqrt,
    Sin,
    Cos,
    Tan,
    Sec,
    Csc,
    Cot,
    Arcsin,
    Arccos,
    Arctan,
    Arcsec,
    Arccsc,
    Arccot,
    Sinh,
    Cosh,
    Tanh,
    Sech,
    Csch,
    Coth,
    Arcsinh,
    Arccosh,
    Arctanh,
    Arcsech,
    Arccsch,
    Arccoth,
}

impl SeriesFunction {
    /// Looks a series up by name. `geometric` and `binomial` need `alpha`.
    pub fn from_name(name: &str, alpha: Option<f64>) -> Result<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        let function = match lowered.as_str() {
            "exp" => SeriesFunction::Exp,
            "ln" | "log" => SeriesFunction::Ln,
            "geometric" => {
                let alpha = alpha.ok_or_else(|| missing_alpha("geometric"))?;
                if alpha < 1.0 || alpha.fract() != 0.0 || alpha > f64::from(u32::MAX) {
                    return Err(CalcError::InvalidConfiguration(format!(
                        "geometric series order must be a positive integer, got {alpha}"
                    )));
                }
                SeriesFunction::Geometric {
                    alpha: alpha as u32,
                }
            }
            "binomial" => SeriesFunction::Binomial {
                alpha: alpha.ok_or_else(|| missing_alpha("binomial"))?,
            },
            "sqrt" | "root" => SeriesFunction::Sqrt,
            "invsqrt" | "invroot" => SeriesFunction::InvSqrt,
            "sin" => SeriesFunction::Sin,
            "cos" => SeriesFunction::Cos,
            "tan" => SeriesFunction::Tan,
            "sec" => SeriesFunction::Sec,
            "csc" => SeriesFunction::Csc,
            "cot" => SeriesFunction::Cot,
            "arcsin" => SeriesFunction::Arcsin,
            "arccos" => SeriesFunction::Arccos,
            "arctan" => SeriesFunction::Arctan,
            "arcsec" => SeriesFunction::Arcsec,
            "arccsc" => SeriesFunction::Arccsc,
            "arccot" => SeriesFunction::Arccot,
            "sinh" => SeriesFunction::Sinh,
            "cosh" => SeriesFunction::Cosh,
            "tanh" => SeriesFunction::Tanh,
            "sech" => SeriesFunction::Sech,
            "csch" => SeriesFunction::Csch,
            "coth" => SeriesFunction::Coth,
            "arcsinh" => SeriesFunction::Arcsinh,
            "arccosh" => SeriesFunction::Arccosh,
            "arctanh" => SeriesFunction::Arctanh,
            "arcsech" => SeriesFunction::Arcsech,
            "arccsch" => SeriesFunction::Arccsch,
            "arccoth" => SeriesFunction::Arccoth,
            _ => {
                return Err(CalcError::InvalidConfiguration(format!(
                    "unknown series '{name}'"
                )))
            }
        };
        Ok(function)
    }

    pub fn evaluate(&self, x: f64, settings: &SeriesSettings) -> Result<f64> {
        match *self {
            SeriesFunction::Exp => exp(x, settings),
            SeriesFunction::Ln => ln(x, settings),
            SeriesFunction::Geometric { alpha } => geometric(x, alpha, settings),
            SeriesFunction::Binomial { alpha } => binomial(x, alpha, settings),
            SeriesFunction::Sqrt => sqrt(x, settings),
            SeriesFunction::InvSqrt => invsqrt(x, settings),
            SeriesFunction::Sin => sin(x, settings),
            SeriesFunction::Cos => cos(x, settings),
            SeriesFunction::Tan => tan(x, settings),
            SeriesFunction::Sec => sec(x, settings),
            SeriesFunction::Csc => csc(x, settings),
            SeriesFunction::Cot => cot(x, settings),
            SeriesFunction::Arcsin => arcsin(x, settings),
            SeriesFunction::Arccos => arccos(x, settings),
            SeriesFunction::Arctan => arctan(x, settings),
            SeriesFunction::Arcsec => arcsec(x, settings),
            SeriesFunction::Arccsc => arccsc(x, settings),
            SeriesFunction::Arccot => arccot(x, settings),
            SeriesFunction::Sinh => sinh(x, settings),
            SeriesFunction::Cosh => cosh(x, settings),
            SeriesFunction::Tanh => tanh(x, settings),
            SeriesFunction::Sech => sech(x, settings),
            SeriesFunction::Csch => csch(x, settings),
            SeriesFunction::Coth => coth(x, settings),
            SeriesFunction::Arcsinh => arcsinh(x, settings),
            SeriesFunction::Arccosh => arccosh(x, settings),
            SeriesFunction::Arctanh => arctanh(x, settings),
            SeriesFunction::Arcsech => arcsech(x, settings),
            SeriesFunction::Arccsch => arccsch(x, settings),
            SeriesFunction::Arccoth => arccoth(x, settings),
        }
    }
}

/// Parses the names that need no exponent; `geometric` and `binomial` go
/// through [`SeriesFunction::from_name`].
impl FromStr for SeriesFunction {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        SeriesFunction::from_name(s, None)
    }
}

fn missing_alpha(name: &str) -> CalcError {
    CalcError::InvalidConfiguration(format!("{name} series needs an exponent"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, label: &str) {
        let scale = expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= 1e-12 * scale,
            "{label}: got {actual}, expected {expected}"
        );
    }

    fn check(
        f: fn(f64, &SeriesSettings) -> Result<f64>,
        reference: fn(f64) -> f64,
        xs: &[f64],
        label: &str,
    ) {
        let settings = SeriesSettings::default();
        for &x in xs {
            let value = f(x, &settings).unwrap_or_else(|e| panic!("{label}({x}): {e}"));
            assert_close(value, reference(x), &format!("{label}({x})"));
        }
    }

    const WIDE: &[f64] = &[-7.5, -2.0, -0.3, 0.0, 0.1, 1.0, 3.3, 12.0];
    const UNIT: &[f64] = &[-0.99, -0.6, -0.2, 0.0, 0.35, 0.5, 0.75, 1.0];

    #[test]
    fn exponential_and_logarithm() {
        check(exp, f64::exp, &[-20.0, -1.0, 0.0, 0.25, 1.0, 5.0, 30.0], "exp");
        check(ln, f64::ln, &[1e-8, 0.1, 0.5, 1.0, 2.0, 10.0, 12345.0, 1e200], "ln");
        assert!(matches!(ln(0.0, &SeriesSettings::default()), Err(CalcError::Domain(_))));
        assert!(matches!(ln(-1.0, &SeriesSettings::default()), Err(CalcError::Domain(_))));
    }

    #[test]
    fn circular_functions() {
        check(sin, f64::sin, WIDE, "sin");
        check(cos, f64::cos, WIDE, "cos");
        check(tan, f64::tan, &[-1.2, -0.3, 0.0, 0.7, 1.4], "tan");
        check(sec, |x| 1.0 / x.cos(), &[-1.2, 0.0, 0.7], "sec");
        check(csc, |x| 1.0 / x.sin(), &[-1.2, 0.4, 2.0], "csc");
        check(cot, |x| x.cos() / x.sin(), &[-1.2, 0.4, 2.0], "cot");
        assert!(matches!(csc(0.0, &SeriesSettings::default()), Err(CalcError::Domain(_))));
    }

    #[test]
    fn inverse_circular_functions() {
        check(arcsin, f64::asin, UNIT, "arcsin");
        check(arccos, f64::acos, UNIT, "arccos");
        check(arctan, f64::atan, WIDE, "arctan");
        check(arcsec, |x| (1.0 / x).acos(), &[-3.0, -1.0, 1.0, 1.5, 40.0], "arcsec");
        check(arccsc, |x| (1.0 / x).asin(), &[-3.0, -1.0, 1.0, 1.5, 40.0], "arccsc");
        check(arccot, |x| (1.0 / x).atan(), &[0.2, 1.0, 7.0], "arccot");
        assert_close(arccot(0.0, &SeriesSettings::default()).unwrap(), FRAC_PI_2, "arccot(0)");
        assert!(matches!(arcsin(1.5, &SeriesSettings::default()), Err(CalcError::Domain(_))));
        assert!(matches!(arcsec(0.5, &SeriesSettings::default()), Err(CalcError::Domain(_))));
    }

    #[test]
    fn hyperbolic_functions() {
        check(sinh, f64::sinh, WIDE, "sinh");
        check(cosh, f64::cosh, WIDE, "cosh");
        check(tanh, f64::tanh, &[-30.0, -2.0, -0.5, 0.0, 0.9, 4.0, 400.0], "tanh");
        check(sech, |x| 1.0 / x.cosh(), &[-2.0, 0.0, 0.5], "sech");
        check(csch, |x| 1.0 / x.sinh(), &[-2.0, 0.5, 3.0], "csch");
        check(coth, |x| 1.0 / x.tanh(), &[-2.0, 0.5, 3.0], "coth");
        assert!(matches!(coth(0.0, &SeriesSettings::default()), Err(CalcError::Domain(_))));
    }

    #[test]
    fn inverse_hyperbolic_functions() {
        check(arcsinh, f64::asinh, WIDE, "arcsinh");
        check(arccosh, f64::acosh, &[1.0, 1.1, 2.0, 50.0], "arccosh");
        check(arctanh, f64::atanh, &[-0.95, -0.5, 0.0, 0.3, 0.8], "arctanh");
        check(arcsech, |x| (1.0 / x).acosh(), &[0.1, 0.5, 1.0], "arcsech");
        check(arccsch, |x| (1.0 / x).asinh(), &[-4.0, 0.3, 2.0], "arccsch");
        check(arccoth, |x| (1.0 / x).atanh(), &[-4.0, 1.5, 10.0], "arccoth");
        assert!(matches!(arctanh(1.0, &SeriesSettings::default()), Err(CalcError::Domain(_))));
        assert!(matches!(arccsch(0.0, &SeriesSettings::default()), Err(CalcError::Domain(_))));
    }

    #[test]
    fn binomial_family() {
        let settings = SeriesSettings::default();
        assert_close(geometric(0.5, 1, &settings).unwrap(), 2.0, "geometric(0.5, 1)");
        assert_close(geometric(0.5, 3, &settings).unwrap(), 8.0, "geometric(0.5, 3)");
        assert_close(geometric(-0.25, 2, &settings).unwrap(), 0.64, "geometric(-0.25, 2)");
        assert_close(binomial(0.2, 2.5, &settings).unwrap(), 1.2_f64.powf(2.5), "binomial");
        assert_close(binomial(3.0, 4.0, &settings).unwrap(), 256.0, "binomial polynomial");
        assert_close(sqrt(0.44, &settings).unwrap(), 1.2, "sqrt");
        assert_close(invsqrt(-0.36, &settings).unwrap(), 1.25, "invsqrt");
        assert!(matches!(geometric(1.0, 2, &settings), Err(CalcError::Domain(_))));
        assert!(matches!(
            geometric(0.5, 0, &settings),
            Err(CalcError::InvalidConfiguration(_))
        ));
        assert!(matches!(binomial(2.0, 0.5, &settings), Err(CalcError::Domain(_))));
    }

    #[test]
    fn series_names_dispatch() {
        let settings = SeriesSettings::default();
        let sin = SeriesFunction::from_name("SIN", None).unwrap();
        assert_close(sin.evaluate(0.5, &settings).unwrap(), 0.5_f64.sin(), "sin");
        let geo = SeriesFunction::from_name("geometric", Some(2.0)).unwrap();
        assert_eq!(geo, SeriesFunction::Geometric { alpha: 2 });
        assert!(SeriesFunction::from_name("geometric", None).is_err());
        assert!(SeriesFunction::from_name("geometric", Some(1.5)).is_err());
        assert!(SeriesFunction::from_name("gamma", None).is_err());
        assert_eq!("arccoth".parse::<SeriesFunction>().unwrap(), SeriesFunction::Arccoth);
        assert_eq!("invroot".parse::<SeriesFunction>().unwrap(), SeriesFunction::InvSqrt);
        assert!("binomial".parse::<SeriesFunction>().is_err());
    }

    #[test]
    fn truncated_series_still_returns_a_partial_sum() {
        let settings = SeriesSettings {
            max_terms: 3,
            tolerance: 0.0,
        };
        // 1 + x + x^2 / 2 at x = 0.5, then squared once for the halving.
        let value = exp(1.0, &settings).unwrap();
        assert_close(value, 1.625 * 1.625, "exp truncated");
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: SeriesSettings = serde_json::from_str(r#"{"max_terms": 20}"#).unwrap();
        assert_eq!(settings.max_terms, 20);
        assert_eq!(settings.tolerance, 0.0);
    }
}
