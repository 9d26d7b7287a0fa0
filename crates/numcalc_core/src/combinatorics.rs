//! Small combinatorial primitives used by the finite-difference stencils and
//! the series evaluators.

use crate::traits::Scalar;

/// Raises a real base to a non-negative integer power by repeated squaring.
///
/// `power(b, 0)` is one for every `b`, zero included.
pub fn power<T: Scalar>(b: T, p: u32) -> T {
    let mut result = T::one();
    let mut base = b;
    let mut exp = p;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base;
        }
        exp >>= 1;
        if exp > 0 {
            base = base * base;
        }
    }
    result
}

/// Unsigned analogue of [`power`]. Wraps on overflow.
pub fn integer_power(b: u64, p: u32) -> u64 {
    let mut result: u64 = 1;
    let mut base = b;
    let mut exp = p;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result.wrapping_mul(base);
        }
        exp >>= 1;
        if exp > 0 {
            base = base.wrapping_mul(base);
        }
    }
    result
}

/// `n!`, wrapping silently once the result leaves `u64` (past `20!`).
pub fn factorial(n: u32) -> u64 {
    (2..=u64::from(n)).fold(1u64, |acc, k| acc.wrapping_mul(k))
}

/// Generalized binomial coefficient `alpha (alpha - 1) ... (alpha - k + 1) / k!`.
///
/// `alpha` may be any real number. The product is accumulated in floating
/// point; after step `j` the partial result is `C(alpha, j + 1)`, which keeps
/// integer rows exact without any intermediate truncation.
pub fn binomial_coefficient(alpha: f64, k: u32) -> f64 {
    let mut result = 1.0;
    for j in 0..k {
        let j = f64::from(j);
        result = result * (alpha - j) / (j + 1.0);
    }
    result
}
