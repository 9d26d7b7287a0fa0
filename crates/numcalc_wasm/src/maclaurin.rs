use crate::to_js_error;
use anyhow::anyhow;
use numcalc_core::{SeriesFunction, SeriesSettings};
use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;

/// Evaluates the named Maclaurin series at `x` with the default stopping
/// rule. `alpha` is the exponent of `geometric` and `binomial`.
#[wasm_bindgen]
pub fn maclaurin(name: &str, x: f64, alpha: Option<f64>) -> Result<f64, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
    evaluate(name, x, alpha, &SeriesSettings::default()).map_err(to_js_error)
}

/// Like [`maclaurin`], with `{max_terms, tolerance}` overriding the defaults.
#[wasm_bindgen]
pub fn maclaurin_with(
    name: &str,
    x: f64,
    alpha: Option<f64>,
    settings: JsValue,
) -> Result<f64, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
    let settings: SeriesSettings = if settings.is_undefined() || settings.is_null() {
        SeriesSettings::default()
    } else {
        from_value(settings)
            .map_err(|e| to_js_error(anyhow!("invalid series settings: {e}")))?
    };
    evaluate(name, x, alpha, &settings).map_err(to_js_error)
}

fn evaluate(
    name: &str,
    x: f64,
    alpha: Option<f64>,
    settings: &SeriesSettings,
) -> anyhow::Result<f64> {
    let function = SeriesFunction::from_name(name, alpha)?;
    Ok(function.evaluate(x, settings)?)
}
