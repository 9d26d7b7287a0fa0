use crate::function::HostFunction;
use crate::selector::selectors_from_js;
use crate::to_js_error;
use anyhow::anyhow;
use numcalc_core::interval::validate_intervals;
use numcalc_core::{cell_volume, riemann as riemann_sum, trapezoidal as trapezoid_sum};
use numcalc_core::{Interval, SamplingRule};
use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;

/// `[lower, upper]` split into `n` equal subintervals.
#[wasm_bindgen(js_name = Interval)]
#[derive(Debug, Clone)]
pub struct WasmInterval {
    inner: Interval,
}

#[wasm_bindgen(js_class = Interval)]
impl WasmInterval {
    #[wasm_bindgen(constructor)]
    pub fn new(lower: f64, upper: f64, n: u32) -> Result<WasmInterval, JsValue> {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();
        let inner = Interval::new(lower, upper, n).map_err(|e| to_js_error(e.into()))?;
        Ok(WasmInterval { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn lower(&self) -> f64 {
        self.inner.lower
    }

    #[wasm_bindgen(getter)]
    pub fn upper(&self) -> f64 {
        self.inner.upper
    }

    #[wasm_bindgen(getter)]
    pub fn n(&self) -> u32 {
        self.inner.n
    }

    /// Width of one subinterval.
    #[wasm_bindgen(getter)]
    pub fn step(&self) -> f64 {
        self.inner.step()
    }
}

impl From<WasmInterval> for Interval {
    fn from(interval: WasmInterval) -> Self {
        interval.inner
    }
}

fn intervals_from_js(value: JsValue) -> anyhow::Result<Vec<Interval>> {
    let intervals: Vec<Interval> = from_value(value)
        .map_err(|e| anyhow!("expected an array of {{lower, upper, n}} intervals: {e}"))?;
    validate_intervals(&intervals)?;
    Ok(intervals)
}

fn sample(rule: SamplingRule, interval: &WasmInterval, i: u32) -> Result<f64, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
    rule.sample(&interval.inner, i as usize)
        .map_err(|e| to_js_error(e.into()))
}

/// Volume of one grid cell of the box.
#[wasm_bindgen]
pub fn delta(intervals: JsValue) -> Result<f64, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
    let intervals = intervals_from_js(intervals).map_err(to_js_error)?;
    cell_volume(&intervals).map_err(|e| to_js_error(e.into()))
}

#[wasm_bindgen]
pub fn left(interval: &WasmInterval, i: u32) -> Result<f64, JsValue> {
    sample(SamplingRule::Left, interval, i)
}

#[wasm_bindgen]
pub fn right(interval: &WasmInterval, i: u32) -> Result<f64, JsValue> {
    sample(SamplingRule::Right, interval, i)
}

#[wasm_bindgen]
pub fn midpoint(interval: &WasmInterval, i: u32) -> Result<f64, JsValue> {
    sample(SamplingRule::Midpoint, interval, i)
}

/// Grid vertex `i` in `0..=n`.
#[wasm_bindgen]
pub fn endpoint(interval: &WasmInterval, i: u32) -> Result<f64, JsValue> {
    sample(SamplingRule::Endpoint, interval, i)
}

/// Riemann sum of `f` over the box, sampling axis `k` with `rules[k]`.
#[wasm_bindgen]
pub fn riemann(f: JsValue, intervals: JsValue, rules: JsValue) -> Result<f64, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
    let intervals = intervals_from_js(intervals).map_err(to_js_error)?;
    let rules: Vec<SamplingRule> = selectors_from_js(rules).map_err(to_js_error)?;
    let function =
        HostFunction::from_js(&f, intervals.len()).map_err(|e| to_js_error(e.into()))?;
    riemann_over(&function, &intervals, &rules).map_err(to_js_error)
}

/// Product trapezoidal rule of `f` over the box.
#[wasm_bindgen]
pub fn trapezoidal(f: JsValue, intervals: JsValue) -> Result<f64, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
    let intervals = intervals_from_js(intervals).map_err(to_js_error)?;
    let function =
        HostFunction::from_js(&f, intervals.len()).map_err(|e| to_js_error(e.into()))?;
    trapezoidal_over(&function, &intervals).map_err(to_js_error)
}

fn riemann_over(
    function: &HostFunction,
    intervals: &[Interval],
    rules: &[SamplingRule],
) -> anyhow::Result<f64> {
    Ok(riemann_sum(&function.as_real_function(), intervals, rules)?)
}

fn trapezoidal_over(function: &HostFunction, intervals: &[Interval]) -> anyhow::Result<f64> {
    Ok(trapezoid_sum(&function.as_real_function(), intervals)?)
}

#[wasm_bindgen(js_name = LEFT)]
pub fn left_code() -> i32 {
    SamplingRule::Left.code()
}

#[wasm_bindgen(js_name = RIGHT)]
pub fn right_code() -> i32 {
    SamplingRule::Right.code()
}

#[wasm_bindgen(js_name = MIDPOINT)]
pub fn midpoint_code() -> i32 {
    SamplingRule::Midpoint.code()
}

#[wasm_bindgen(js_name = ENDPOINT)]
pub fn endpoint_code() -> i32 {
    SamplingRule::Endpoint.code()
}
