//! Error types for WebAssembly bridge implementations

use bridge_traits::error::BridgeError;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Result type for WebAssembly bridge operations
pub type WasmResult<T> = Result<T, WasmError>;

/// Errors that can occur in WebAssembly bridge implementations
#[derive(Error, Debug)]
pub enum WasmError {
    /// JavaScript exception raised by a browser API.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// A required global (`window`, `performance`, ...) is missing.
    #[error("Browser API unavailable: {0}")]
    Unavailable(String),

    /// The browser refused the operation (autoplay policy, CSP).
    #[error("Blocked by the browser: {0}")]
    Blocked(String),

    /// A value returned by the browser had an unexpected type.
    #[error("Unexpected value from {0}")]
    UnexpectedValue(String),
}

impl WasmError {
    /// Wrap a thrown `JsValue` with the name of the call that raised it.
    ///
    /// `NotAllowedError` and `SecurityError` DOM exceptions become
    /// [`WasmError::Blocked`].
    pub fn from_js(context: &str, value: JsValue) -> Self {
        if let Some(exception) = value.dyn_ref::<web_sys::DomException>() {
            let name = exception.name();
            let message = format!("{context}: {name}: {}", exception.message());
            return match name.as_str() {
                "NotAllowedError" | "SecurityError" => WasmError::Blocked(message),
                _ => WasmError::JavaScript(message),
            };
        }
        WasmError::JavaScript(format!("{context}: {}", describe(&value)))
    }
}

impl From<WasmError> for BridgeError {
    fn from(err: WasmError) -> Self {
        match err {
            WasmError::Unavailable(what) => BridgeError::NotAvailable(what),
            WasmError::Blocked(message) => BridgeError::Rejected(message),
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

impl From<JsValue> for WasmError {
    fn from(js_value: JsValue) -> Self {
        WasmError::from_js("javascript", js_value)
    }
}

/// Shorthand for converting a thrown value straight into a [`BridgeError`].
pub(crate) fn js_error(context: &str, value: JsValue) -> BridgeError {
    WasmError::from_js(context, value).into()
}

pub(crate) fn window() -> Result<web_sys::Window, BridgeError> {
    web_sys::window().ok_or_else(|| WasmError::Unavailable("window".to_string()).into())
}

fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        text
    } else if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        error.message().into()
    } else {
        format!("{:?}", value)
    }
}
