use numcalc_core::combinatorics::{
    binomial_coefficient, factorial as core_factorial, integer_power, power as core_power,
};
use wasm_bindgen::prelude::*;

/// `b^p` for a real base and non-negative integer exponent.
#[wasm_bindgen]
pub fn power(b: f64, p: u32) -> f64 {
    core_power(b, p)
}

/// Integer power, returned as a `BigInt`. Wraps past `2^64`.
#[wasm_bindgen]
pub fn ipower(b: u64, p: u32) -> u64 {
    integer_power(b, p)
}

/// `n!` as a `BigInt`. Wraps past `20!`.
#[wasm_bindgen]
pub fn factorial(n: u32) -> u64 {
    core_factorial(n)
}

/// Generalized binomial coefficient `C(alpha, k)`.
#[wasm_bindgen]
pub fn binom(alpha: f64, k: u32) -> f64 {
    binomial_coefficient(alpha, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_forward_to_core() {
        assert_eq!(power(1.5, 2), 2.25);
        assert_eq!(power(0.0, 0), 1.0);
        assert_eq!(ipower(3, 4), 81);
        assert_eq!(factorial(10), 3_628_800);
        assert_eq!(binom(6.0, 3), 20.0);
        assert_eq!(binom(0.5, 2), -0.125);
    }
}
