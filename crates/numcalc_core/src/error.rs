//! Error taxonomy shared by every numcalc kernel.

use std::collections::TryReserveError;
use thiserror::Error;

/// Failure raised while evaluating a user supplied function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// The supplied value cannot be invoked.
    #[error("expected a callable object")]
    NotCallable,
    /// The function was invoked but raised.
    #[error("function call failed: {0}")]
    Raised(String),
    /// The function returned something other than a number.
    #[error("expected the function to return a number, got {0}")]
    NonNumeric(String),
}

/// Error returned by the differentiation, integration and series kernels.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("failed to allocate memory: {0}")]
    Allocation(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("index {index} out of bounds (limit {limit})")]
    IndexOutOfBounds { index: usize, limit: usize },

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("argument outside the domain: {0}")]
    Domain(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl From<TryReserveError> for CalcError {
    fn from(err: TryReserveError) -> Self {
        CalcError::Allocation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;

/// Allocates a zeroed buffer without aborting on allocation failure.
pub(crate) fn try_zeroed(len: usize) -> Result<Vec<f64>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len)?;
    buffer.resize(len, 0.0);
    Ok(buffer)
}

/// Copies `values` into a freshly reserved buffer.
pub(crate) fn try_clone(values: &[f64]) -> Result<Vec<f64>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(values.len())?;
    buffer.extend_from_slice(values);
    Ok(buffer)
}
