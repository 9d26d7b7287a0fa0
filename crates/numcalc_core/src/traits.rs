use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

use crate::error::EvaluationError;

/// A trait for types that can be used as scalars by the numeric primitives.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A function of several real variables supplied from outside the crate.
///
/// Unlike a native callback, invoking it may fail; the engines abort the
/// enclosing computation on the first failure.
pub trait Callable {
    /// Evaluates the function at the domain element `x`.
    fn call(&self, x: &[f64]) -> Result<f64, EvaluationError>;
}

impl<F> Callable for F
where
    F: Fn(&[f64]) -> Result<f64, EvaluationError>,
{
    fn call(&self, x: &[f64]) -> Result<f64, EvaluationError> {
        self(x)
    }
}
