//! WASM bindings for `numcalc_core`.
//!
//! Every export installs the panic hook, converts its JavaScript arguments
//! into core types and turns any core error into a thrown JS `Error`.

pub mod differential;
pub mod function;
pub mod integral;
pub mod maclaurin;
pub mod numbers;
pub mod selector;

pub use differential::dquotient;
pub use function::{HostFunction, JsCallable};
pub use integral::WasmInterval;

use wasm_bindgen::JsValue;

/// Converts a marshalling or engine failure into a thrown JS `Error`.
pub(crate) fn to_js_error(err: anyhow::Error) -> JsValue {
    js_sys::Error::new(&format!("{err:#}")).into()
}
