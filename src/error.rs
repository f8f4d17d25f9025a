//! Errors raised by the browser shell. The page model itself is infallible:
//! invalid or repeated actions are ignored rather than reported.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("no document body")]
    NoBody,
    #[error("2d canvas context unavailable")]
    NoContext,
    #[error("page not started")]
    NotStarted,
    #[error("DOM call failed: {0}")]
    Dom(String),
    #[cfg(feature = "serde_json")]
    #[error("invalid page config: {0}")]
    Config(#[from] serde_json::Error),
    #[cfg(feature = "serde_json")]
    #[error("failed to encode page state: {0}")]
    Encode(serde_json::Error),
}

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        PageError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<PageError> for JsValue {
    fn from(err: PageError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T, E = PageError> = std::result::Result<T, E>;
