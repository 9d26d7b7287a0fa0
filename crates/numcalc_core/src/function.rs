//! Handles over real-valued functions of several real variables.

use crate::error::Result;
use crate::traits::Callable;

/// Native numeric callback. Receives the full coordinate slice; its length is
/// the dimension of the domain.
pub type NativeFn = fn(&[f64]) -> f64;

/// A real function of `d` variables.
///
/// The dimension is not stored on the handle: it is the length of whatever
/// point the engines pass to [`RealFunction::evaluate`].
#[derive(Clone, Copy)]
pub enum RealFunction<'a> {
    /// A plain function pointer. Any value it returns, NaN included, is a result.
    Native(NativeFn),
    /// A callable supplied from outside the crate that may fail.
    External(&'a dyn Callable),
}

impl<'a> RealFunction<'a> {
    pub fn native(f: NativeFn) -> Self {
        RealFunction::Native(f)
    }

    pub fn external(f: &'a dyn Callable) -> Self {
        RealFunction::External(f)
    }

    /// Evaluates the function at `x`.
    pub fn evaluate(&self, x: &[f64]) -> Result<f64> {
        match self {
            RealFunction::Native(f) => Ok(f(x)),
            RealFunction::External(f) => Ok(f.call(x)?),
        }
    }
}

impl std::fmt::Debug for RealFunction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RealFunction::Native(_) => f.write_str("RealFunction::Native"),
            RealFunction::External(_) => f.write_str("RealFunction::External"),
        }
    }
}

impl From<NativeFn> for RealFunction<'_> {
    fn from(f: NativeFn) -> Self {
        RealFunction::Native(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CalcError, EvaluationError};

    fn norm_squared(x: &[f64]) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    #[test]
    fn native_variant_calls_pointer() {
        let f = RealFunction::native(norm_squared);
        assert_eq!(f.evaluate(&[3.0, 4.0]).expect("eval"), 25.0);
    }

    #[test]
    fn native_nan_is_a_value_not_an_error() {
        let f = RealFunction::native(|x: &[f64]| x[0].sqrt());
        let value = f.evaluate(&[-1.0]).expect("nan is a legitimate result");
        assert!(value.is_nan());
    }

    #[test]
    fn external_variant_propagates_failures() {
        let ok = |x: &[f64]| -> std::result::Result<f64, EvaluationError> { Ok(x[0] + 1.0) };
        let raising = |_: &[f64]| -> std::result::Result<f64, EvaluationError> {
            Err(EvaluationError::Raised("boom".to_string()))
        };

        assert_eq!(RealFunction::external(&ok).evaluate(&[1.0]).expect("eval"), 2.0);
        let err = RealFunction::external(&raising)
            .evaluate(&[1.0])
            .expect_err("raising callable must fail");
        assert_eq!(
            err,
            CalcError::Evaluation(EvaluationError::Raised("boom".to_string()))
        );
    }
}
