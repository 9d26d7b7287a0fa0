use crate::function::HostFunction;
use crate::selector::selector_from_js;
use crate::to_js_error;
use numcalc_core::{difference_quotient, FiniteDifferenceKind};
use wasm_bindgen::prelude::*;

/// Order-`n` partial difference quotients of `f` at `x`, one per axis.
///
/// `f` is a JS function of a coordinate array or an expression string over
/// `x0, x1, ...`; `kind` is a scheme code or name.
#[wasm_bindgen]
pub fn dquotient(
    f: JsValue,
    x: Vec<f64>,
    h: f64,
    n: u32,
    kind: JsValue,
) -> Result<Vec<f64>, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let kind: FiniteDifferenceKind = selector_from_js(kind).map_err(to_js_error)?;
    let function = HostFunction::from_js(&f, x.len()).map_err(|e| to_js_error(e.into()))?;
    quotient(&function, &x, h, n, kind).map_err(to_js_error)
}

fn quotient(
    function: &HostFunction,
    x: &[f64],
    h: f64,
    n: u32,
    kind: FiniteDifferenceKind,
) -> anyhow::Result<Vec<f64>> {
    Ok(difference_quotient(&function.as_real_function(), x, h, n, kind)?)
}

#[wasm_bindgen(js_name = FORWARD)]
pub fn forward_code() -> i32 {
    FiniteDifferenceKind::Forward.code()
}

#[wasm_bindgen(js_name = BACKWARD)]
pub fn backward_code() -> i32 {
    FiniteDifferenceKind::Backward.code()
}

#[wasm_bindgen(js_name = CENTRAL)]
pub fn central_code() -> i32 {
    FiniteDifferenceKind::Central.code()
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::dquotient;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn dquotient_accepts_js_functions_and_scheme_names() {
        let f = js_sys::Function::new_with_args("x", "return x[0] * x[0];");
        let result = dquotient(f.into(), vec![2.0], 1e-3, 1, JsValue::from_str("forward"))
            .expect("forward quotient");
        assert!((result[0] - 4.001).abs() < 1e-9);
    }

    #[wasm_bindgen_test]
    fn dquotient_accepts_expression_strings_and_codes() {
        let result = dquotient(
            JsValue::from_str("x0 * x1"),
            vec![3.0, 4.0],
            1e-3,
            1,
            JsValue::from_f64(2.0),
        )
        .expect("central quotient");
        assert!((result[0] - 4.0).abs() < 1e-9);
        assert!((result[1] - 3.0).abs() < 1e-9);
    }

    #[wasm_bindgen_test]
    fn dquotient_throws_on_bad_arguments() {
        let f = js_sys::Function::new_with_args("x", "return x[0];");
        assert!(dquotient(f.clone().into(), vec![1.0], 1e-3, 1, JsValue::from_str("sideways"))
            .is_err());
        assert!(dquotient(f.into(), vec![1.0], -1.0, 1, JsValue::from_f64(0.0)).is_err());
        assert!(dquotient(JsValue::from_f64(1.0), vec![1.0], 1e-3, 1, JsValue::from_f64(0.0))
            .is_err());
    }
}
