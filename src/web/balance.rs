//! `BalanceDisplay` over the header balance element.

use web_sys::Document;

use crate::session::BalanceDisplay;

/// Looked up on every write; the header may be re-rendered under us.
pub struct DomBalance {
    document: Document,
    selector: String,
}

impl DomBalance {
    pub fn new(document: Document, selector: &str) -> Self {
        Self {
            document,
            selector: selector.to_string(),
        }
    }
}

impl BalanceDisplay for DomBalance {
    fn set_balance(&self, text: &str, raw: f64) {
        let Some(element) = self.document.query_selector(&self.selector).ok().flatten() else {
            log::debug!("No balance element at `{}`", self.selector);
            return;
        };
        element.set_text_content(Some(text));
        if let Err(err) = element.set_attribute("data-balance", &raw.to_string()) {
            log::warn!("Could not tag balance element: {:?}", err);
        }
    }
}
