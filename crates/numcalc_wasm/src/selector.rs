//! Rule and scheme selectors, given from JavaScript either as the integer
//! code or as the lowercase name.

use anyhow::{anyhow, bail};
use numcalc_core::CalcError;
use serde::Deserialize;
use std::str::FromStr;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Selector {
    // JS numbers arrive as f64; integrality is checked on resolve.
    Code(f64),
    Name(String),
}

impl Selector {
    pub fn resolve<T>(&self) -> anyhow::Result<T>
    where
        T: TryFrom<i32, Error = CalcError> + FromStr<Err = CalcError>,
    {
        match self {
            Selector::Code(code) => {
                let in_range = (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(code);
                if code.fract() != 0.0 || !in_range {
                    bail!("selector code must be an integer, got {code}");
                }
                Ok(T::try_from(*code as i32)?)
            }
            Selector::Name(name) => Ok(name.parse()?),
        }
    }
}

pub(crate) fn selector_from_js<T>(value: JsValue) -> anyhow::Result<T>
where
    T: TryFrom<i32, Error = CalcError> + FromStr<Err = CalcError>,
{
    let selector: Selector = serde_wasm_bindgen::from_value(value)
        .map_err(|e| anyhow!("expected a selector code or name: {e}"))?;
    selector.resolve()
}

pub(crate) fn selectors_from_js<T>(value: JsValue) -> anyhow::Result<Vec<T>>
where
    T: TryFrom<i32, Error = CalcError> + FromStr<Err = CalcError>,
{
    let selectors: Vec<Selector> = serde_wasm_bindgen::from_value(value)
        .map_err(|e| anyhow!("expected an array of selector codes or names: {e}"))?;
    selectors.iter().map(Selector::resolve).collect()
}
