//! Error type shared by the DOM-facing entry points.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("{0} storage unavailable")]
    StorageUnavailable(&'static str),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("js error: {0}")]
    Js(String),
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        SiteError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<SiteError> for JsValue {
    fn from(err: SiteError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
