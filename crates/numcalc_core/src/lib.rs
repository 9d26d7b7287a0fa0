//! The `numcalc_core` crate is the numerical engine behind the numcalc bindings.
//!
//! Key components:
//! - **Combinatorics**: integer powers, factorials and generalized binomial coefficients.
//! - **Differential**: forward, backward and central finite-difference quotients of any order,
//!   along every axis of a multivariate function.
//! - **Integral**: Riemann sums with per-axis sampling rules and the product trapezoidal rule
//!   over d-dimensional boxes, driven by the mixed-radix `GridIndex`.
//! - **Maclaurin**: series evaluation of the elementary transcendental functions.
//! - **Expression**: a bytecode VM for user-supplied formulas, for hosts without native callbacks.
pub mod combinatorics;
pub mod differential;
pub mod error;
pub mod expression;
pub mod function;
pub mod grid;
pub mod integral;
pub mod interval;
pub mod maclaurin;
pub mod traits;

pub use differential::{
    difference_quotient, difference_quotient_with, finite_differences, DifferenceSettings,
    FiniteDifferenceKind,
};
pub use error::{CalcError, EvaluationError, Result};
pub use expression::ScalarExpression;
pub use function::RealFunction;
pub use grid::GridIndex;
pub use integral::{riemann, trapezoidal};
pub use interval::{cell_volume, Interval, SamplingRule};
pub use maclaurin::{SeriesFunction, SeriesSettings};
pub use traits::Callable;
