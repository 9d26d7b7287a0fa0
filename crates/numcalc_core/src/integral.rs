//! Riemann sums and the product trapezoidal rule over axis-aligned boxes.

use crate::error::{try_zeroed, CalcError, Result};
use crate::function::RealFunction;
use crate::grid::GridIndex;
use crate::interval::{cell_volume, validate_intervals, Interval, SamplingRule};
use log::debug;

/// Riemann sum of `f` over the box spanned by `intervals`, sampling axis `i`
/// with `rules[i]`.
///
/// Only `Left`, `Right` and `Midpoint` are accepted; `Endpoint` samples
/// vertices, which is what [`trapezoidal`] is for.
pub fn riemann(f: &RealFunction, intervals: &[Interval], rules: &[SamplingRule]) -> Result<f64> {
    validate_intervals(intervals)?;
    if rules.len() != intervals.len() {
        return Err(CalcError::InvalidConfiguration(format!(
            "expected {} sampling rules, got {}",
            intervals.len(),
            rules.len()
        )));
    }
    if let Some(axis) = rules.iter().position(|r| *r == SamplingRule::Endpoint) {
        return Err(CalcError::InvalidConfiguration(format!(
            "endpoint sampling on axis {axis} is not a Riemann rule"
        )));
    }

    let dv = cell_volume(intervals)?;
    let mut grid = GridIndex::new(intervals.iter().map(Interval::subdivisions).collect())?;
    let mut x = try_zeroed(intervals.len())?;
    debug!(
        "riemann: dim={}, cells={}, rules={:?}",
        intervals.len(),
        grid.len(),
        rules
    );

    let mut sum = 0.0;
    grid.for_each(|index| {
        for (axis, &i) in index.iter().enumerate() {
            x[axis] = rules[axis].sample(&intervals[axis], i)?;
        }
        sum += dv * f.evaluate(&x)?;
        Ok(())
    })?;
    Ok(sum)
}

/// Product trapezoidal rule over the `prod(n_i + 1)` grid vertices.
///
/// A vertex lying on the boundary of `nborders` axes is weighted by
/// `2^(d - nborders) / 2^d`, the product of the one-dimensional weights.
pub fn trapezoidal(f: &RealFunction, intervals: &[Interval]) -> Result<f64> {
    validate_intervals(intervals)?;

    let d = intervals.len();
    let dv = cell_volume(intervals)?;
    let bases = intervals
        .iter()
        .map(|interval| SamplingRule::Endpoint.index_limit(interval.n))
        .collect::<Result<Vec<_>>>()?;
    let mut grid = GridIndex::new(bases)?;
    let mut x = try_zeroed(d)?;
    debug!("trapezoidal: dim={}, vertices={}", d, grid.len());

    // 2^(d - nborders) / 2^d == 0.5^nborders
    let mut sum = 0.0;
    grid.for_each(|index| {
        let mut nborders = 0i32;
        for (axis, &i) in index.iter().enumerate() {
            let interval = &intervals[axis];
            x[axis] = SamplingRule::Endpoint.sample(interval, i)?;
            if i == 0 || i == interval.subdivisions() {
                nborders += 1;
            }
        }
        sum += dv * 0.5_f64.powi(nborders) * f.evaluate(&x)?;
        Ok(())
    })?;
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvaluationError;

    fn constant(_: &[f64]) -> f64 {
        3.5
    }

    fn identity(x: &[f64]) -> f64 {
        x[0]
    }

    fn affine(x: &[f64]) -> f64 {
        4.0 + 2.0 * x[0] - 3.0 * x[1] + 0.5 * x[2]
    }

    fn box_volume(intervals: &[Interval]) -> f64 {
        intervals.iter().map(Interval::width).product()
    }

    fn sample_box() -> Vec<Interval> {
        vec![
            Interval::new(-1.0, 2.0, 3).unwrap(),
            Interval::new(0.5, 1.5, 2).unwrap(),
            Interval::new(0.0, 4.0, 5).unwrap(),
        ]
    }

    #[test]
    fn constant_function_integrates_to_box_volume() {
        let f = RealFunction::native(constant);
        let intervals = sample_box();
        let expected = 3.5 * box_volume(&intervals);
        for rule in [SamplingRule::Left, SamplingRule::Right, SamplingRule::Midpoint] {
            let rules = vec![rule; intervals.len()];
            let value = riemann(&f, &intervals, &rules).expect("riemann");
            assert!((value - expected).abs() < 1e-12, "{rule}: {value}");
        }
        let mixed = [SamplingRule::Left, SamplingRule::Midpoint, SamplingRule::Right];
        let value = riemann(&f, &intervals, &mixed).expect("riemann");
        assert!((value - expected).abs() < 1e-12);

        let value = trapezoidal(&f, &intervals).expect("trapezoidal");
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn midpoint_rule_is_exact_for_identity() {
        let f = RealFunction::native(identity);
        let intervals = [Interval::new(0.0, 1.0, 4).unwrap()];
        let value = riemann(&f, &intervals, &[SamplingRule::Midpoint]).expect("riemann");
        assert!((value - 0.5).abs() < 1e-15);
    }

    #[test]
    fn left_and_right_sums_bracket_increasing_functions() {
        let f = RealFunction::native(identity);
        let intervals = [Interval::new(0.0, 1.0, 4).unwrap()];
        let left = riemann(&f, &intervals, &[SamplingRule::Left]).expect("left");
        let right = riemann(&f, &intervals, &[SamplingRule::Right]).expect("right");
        assert!((left - 0.375).abs() < 1e-15);
        assert!((right - 0.625).abs() < 1e-15);
    }

    #[test]
    fn unit_square_trapezoid_of_one() {
        let f = RealFunction::native(|_: &[f64]| 1.0);
        let intervals = [
            Interval::new(0.0, 1.0, 2).unwrap(),
            Interval::new(0.0, 1.0, 2).unwrap(),
        ];
        assert_eq!(trapezoidal(&f, &intervals).expect("trapezoidal"), 1.0);
    }

    #[test]
    fn trapezoid_is_exact_for_affine_functions() {
        let f = RealFunction::native(affine);
        let intervals = sample_box();
        // Mean of an affine function over a box is its value at the centre.
        let centre = [0.5, 1.0, 2.0];
        let expected = affine(&centre) * box_volume(&intervals);
        let value = trapezoidal(&f, &intervals).expect("trapezoidal");
        assert!((value - expected).abs() < 1e-10, "{value} vs {expected}");
    }

    #[test]
    fn one_dimensional_trapezoid_matches_classical_rule() {
        let f = RealFunction::native(|x: &[f64]| x[0] * x[0]);
        let intervals = [Interval::new(0.0, 1.0, 2).unwrap()];
        // h/2 * (f0 + 2 f1 + f2) = 0.25 * (0 + 0.5 + 1)
        let value = trapezoidal(&f, &intervals).expect("trapezoidal");
        assert!((value - 0.375).abs() < 1e-15);
    }

    #[test]
    fn trapezoid_converges_on_smooth_integrand() {
        let f = RealFunction::native(|x: &[f64]| (x[0] + x[1]).exp());
        let exact = (std::f64::consts::E - 1.0).powi(2);
        let coarse = [
            Interval::new(0.0, 1.0, 8).unwrap(),
            Interval::new(0.0, 1.0, 8).unwrap(),
        ];
        let fine = [
            Interval::new(0.0, 1.0, 16).unwrap(),
            Interval::new(0.0, 1.0, 16).unwrap(),
        ];
        let coarse_err = (trapezoidal(&f, &coarse).unwrap() - exact).abs();
        let fine_err = (trapezoidal(&f, &fine).unwrap() - exact).abs();
        assert!(fine_err < coarse_err / 3.5);
        assert!(fine_err < 1e-2);
    }

    #[test]
    fn geometry_is_checked_before_sampling() {
        let f = RealFunction::native(constant);
        assert!(matches!(riemann(&f, &[], &[]), Err(CalcError::InvalidGeometry(_))));
        assert!(matches!(trapezoidal(&f, &[]), Err(CalcError::InvalidGeometry(_))));

        let degenerate = [Interval {
            lower: 0.0,
            upper: 1.0,
            n: 0,
        }];
        assert!(matches!(
            riemann(&f, &degenerate, &[SamplingRule::Left]),
            Err(CalcError::InvalidGeometry(_))
        ));
        assert!(matches!(
            trapezoidal(&f, &degenerate),
            Err(CalcError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn rules_must_match_dimension_and_exclude_endpoint() {
        let f = RealFunction::native(constant);
        let intervals = [Interval::new(0.0, 1.0, 2).unwrap()];
        assert!(matches!(
            riemann(&f, &intervals, &[]),
            Err(CalcError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            riemann(&f, &intervals, &[SamplingRule::Endpoint]),
            Err(CalcError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn evaluator_failure_yields_no_partial_sum() {
        let failing = |x: &[f64]| -> std::result::Result<f64, EvaluationError> {
            if x[0] > 0.5 {
                Err(EvaluationError::Raised("ZeroDivisionError".to_string()))
            } else {
                Ok(1.0)
            }
        };
        let f = RealFunction::external(&failing);
        let intervals = [Interval::new(0.0, 1.0, 4).unwrap()];
        assert!(matches!(
            riemann(&f, &intervals, &[SamplingRule::Left]),
            Err(CalcError::Evaluation(EvaluationError::Raised(_)))
        ));
        assert!(matches!(
            trapezoidal(&f, &intervals),
            Err(CalcError::Evaluation(EvaluationError::Raised(_)))
        ));
    }
}
