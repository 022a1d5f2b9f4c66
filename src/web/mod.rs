//! Browser implementations of the core traits.
//!
//! Everything in here touches `web_sys`/`gloo` and only runs inside a page;
//! the logic it feeds lives in the browser-independent modules and is tested
//! natively.

pub mod balance;
pub mod effects;
pub mod host;
pub mod modal;
pub mod notice;
pub mod region;
pub mod socket;
pub mod timers;

use web_sys::{Document, Window};

use crate::error::Error;

pub fn window() -> Result<Window, Error> {
    web_sys::window().ok_or_else(|| Error::MissingElement("window".to_string()))
}

pub fn document() -> Result<Document, Error> {
    window()?
        .document()
        .ok_or_else(|| Error::MissingElement("document".to_string()))
}

/// Text content of the page config `<script>`, empty when absent.
pub fn read_config_blob(document: &Document) -> String {
    document
        .get_element_by_id(crate::config::CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
        .unwrap_or_default()
}
