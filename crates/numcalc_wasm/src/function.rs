//! Adapters turning JavaScript values into functions the core engines can call.

use log::debug;
use numcalc_core::{CalcError, Callable, EvaluationError, RealFunction, ScalarExpression};
use wasm_bindgen::{JsCast, JsValue};

/// A JavaScript function `(coords: number[]) => number`.
pub struct JsCallable {
    function: js_sys::Function,
}

impl JsCallable {
    pub fn new(function: js_sys::Function) -> Self {
        Self { function }
    }
}

fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl Callable for JsCallable {
    fn call(&self, x: &[f64]) -> Result<f64, EvaluationError> {
        let coords: js_sys::Array = x.iter().map(|&v| JsValue::from_f64(v)).collect();
        let value = self
            .function
            .call1(&JsValue::NULL, &coords)
            .map_err(|err| EvaluationError::Raised(describe(&err)))?;
        value
            .as_f64()
            .ok_or_else(|| EvaluationError::NonNumeric(describe(&value)))
    }
}

/// The function argument of an export: either a JS callback or an
/// expression over the positional variables `x0, x1, ...`.
pub enum HostFunction {
    Js(JsCallable),
    Expression(ScalarExpression),
}

impl HostFunction {
    pub fn from_js(value: &JsValue, dimension: usize) -> Result<Self, CalcError> {
        if let Some(function) = value.dyn_ref::<js_sys::Function>() {
            return Ok(HostFunction::Js(JsCallable::new(function.clone())));
        }
        match value.as_string() {
            Some(text) => Self::from_expression(&text, dimension),
            None => Err(EvaluationError::NotCallable.into()),
        }
    }

    pub fn from_expression(text: &str, dimension: usize) -> Result<Self, CalcError> {
        debug!("compiling expression over {} variables: {}", dimension, text);
        Ok(HostFunction::Expression(ScalarExpression::with_positional_vars(
            text, dimension,
        )?))
    }

    pub fn as_real_function(&self) -> RealFunction<'_> {
        match self {
            HostFunction::Js(callable) => RealFunction::external(callable),
            HostFunction::Expression(expr) => RealFunction::external(expr),
        }
    }
}
