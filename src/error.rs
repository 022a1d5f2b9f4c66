//! Crate-wide error type.
//!
//! Nothing in here is fatal to the page: callers log the error and leave the
//! UI as it was ("stale but present").

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A selector that a component is bound to matched nothing.
    #[error("no element matches `{0}`")]
    MissingElement(String),

    /// The fragment endpoint answered with a non-2xx status.
    #[error("fragment request failed with HTTP {status}")]
    Http { status: u16 },

    /// The request never produced a response (network down, CORS, aborted).
    #[error("fragment request failed: {0}")]
    Transport(String),

    /// A push payload or the config blob could not be decoded.
    #[error("undecodable payload: {0}")]
    Payload(String),

    #[error("bet amount must be a positive number, got {0}")]
    InvalidBet(f64),

    /// A table action was sent from a page that is not a game table.
    #[error("not seated at a table")]
    NoTable,
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Payload(err.to_string())
    }
}

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Best-effort human-readable message out of a thrown JS value.
pub fn js_error_message(err: JsValue, fallback: &str) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    if let Ok(error) = err.dyn_into::<js_sys::Error>() {
        return error.message().into();
    }
    fallback.to_string()
}
