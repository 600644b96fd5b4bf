//! JavaScript-facing envelope and outcome classes
//!
//! wasm-bindgen cannot export data-carrying enums or generic types, so each
//! boundary type is a class wrapping the Rust value, and `Outcome<T>` is
//! exported once per payload type (`UnitOutcome`, `StringOutcome`).
//! Every accessor hands back a fresh copy. Asking for the variant that is
//! not active panics, which surfaces in JS as an unrecoverable
//! `RuntimeError`.

use wasm_bindgen::prelude::*;

use super::helpers;
use crate::models::{AnyError, DomainError, GenericError, Outcome};

#[wasm_bindgen(js_name = DomainError)]
#[derive(Clone, Debug)]
pub struct JsDomainError {
    inner: DomainError,
}

#[wasm_bindgen(js_class = DomainError)]
impl JsDomainError {
    #[wasm_bindgen(getter)]
    pub fn code(&self) -> String {
        self.inner.code().to_string()
    }

    /// Message arguments in engine order, as a JS array of strings
    #[wasm_bindgen(getter)]
    pub fn args(&self) -> js_sys::Array {
        self.inner
            .args()
            .iter()
            .map(|arg| JsValue::from_str(arg))
            .collect()
    }

    /// English rendering of the error
    pub fn message(&self) -> String {
        self.inner.render()
    }

    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        helpers::serialize(&self.inner, "DomainError serialization error")
    }
}

impl JsDomainError {
    pub fn inner(&self) -> &DomainError {
        &self.inner
    }
}

#[wasm_bindgen(js_name = GenericError)]
#[derive(Clone, Debug)]
pub struct JsGenericError {
    inner: GenericError,
}

#[wasm_bindgen(js_class = GenericError)]
impl JsGenericError {
    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.inner.message().to_string()
    }

    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        helpers::serialize(&self.inner, "GenericError serialization error")
    }
}

impl JsGenericError {
    pub fn inner(&self) -> &GenericError {
        &self.inner
    }
}

#[wasm_bindgen(js_name = AnyError)]
#[derive(Clone, Debug)]
pub struct JsAnyError {
    inner: AnyError,
}

#[wasm_bindgen(js_class = AnyError)]
impl JsAnyError {
    #[wasm_bindgen(js_name = isDomain)]
    pub fn is_domain(&self) -> bool {
        self.inner.is_domain()
    }

    #[wasm_bindgen(js_name = isGeneric)]
    pub fn is_generic(&self) -> bool {
        self.inner.is_generic()
    }

    #[wasm_bindgen(js_name = asDomain)]
    pub fn as_domain(&self) -> JsDomainError {
        JsDomainError {
            inner: self.inner.as_domain().clone(),
        }
    }

    #[wasm_bindgen(js_name = asGeneric)]
    pub fn as_generic(&self) -> JsGenericError {
        JsGenericError {
            inner: self.inner.as_generic().clone(),
        }
    }

    /// Rendered message for either variant
    #[wasm_bindgen(js_name = toString)]
    pub fn to_display_string(&self) -> String {
        self.inner.to_string()
    }

    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        helpers::serialize(&self.inner, "AnyError serialization error")
    }
}

impl JsAnyError {
    pub fn inner(&self) -> &AnyError {
        &self.inner
    }
}

impl From<AnyError> for JsAnyError {
    fn from(inner: AnyError) -> Self {
        Self { inner }
    }
}

/// `Outcome<()>` for JavaScript
#[wasm_bindgen]
#[derive(Clone, Debug)]
pub struct UnitOutcome {
    inner: Outcome<()>,
}

#[wasm_bindgen]
impl UnitOutcome {
    #[wasm_bindgen(js_name = isOk)]
    pub fn is_ok(&self) -> bool {
        self.inner.is_ok()
    }

    #[wasm_bindgen(js_name = isErr)]
    pub fn is_err(&self) -> bool {
        self.inner.is_err()
    }

    /// `undefined` on success; fails like `StringOutcome.value` on an error
    pub fn value(&self) {
        self.inner.value();
    }

    pub fn error(&self) -> JsAnyError {
        self.inner.error().clone().into()
    }

    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        helpers::serialize(&self.inner, "UnitOutcome serialization error")
    }
}

impl UnitOutcome {
    pub fn inner(&self) -> &Outcome<()> {
        &self.inner
    }
}

impl From<Outcome<()>> for UnitOutcome {
    fn from(inner: Outcome<()>) -> Self {
        Self { inner }
    }
}

/// `Outcome<String>` for JavaScript
#[wasm_bindgen]
#[derive(Clone, Debug)]
pub struct StringOutcome {
    inner: Outcome<String>,
}

#[wasm_bindgen]
impl StringOutcome {
    #[wasm_bindgen(js_name = isOk)]
    pub fn is_ok(&self) -> bool {
        self.inner.is_ok()
    }

    #[wasm_bindgen(js_name = isErr)]
    pub fn is_err(&self) -> bool {
        self.inner.is_err()
    }

    pub fn value(&self) -> String {
        self.inner.value().clone()
    }

    pub fn error(&self) -> JsAnyError {
        self.inner.error().clone().into()
    }

    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        helpers::serialize(&self.inner, "StringOutcome serialization error")
    }

    /// Same as `toJSON`, but as a JSON string
    #[wasm_bindgen(js_name = toJSONString)]
    pub fn to_json_string(&self) -> Result<String, JsValue> {
        helpers::to_json_string(&self.inner, "StringOutcome serialization error")
    }
}

impl StringOutcome {
    pub fn inner(&self) -> &Outcome<String> {
        &self.inner
    }
}

impl From<Outcome<String>> for StringOutcome {
    fn from(inner: Outcome<String>) -> Self {
        Self { inner }
    }
}
