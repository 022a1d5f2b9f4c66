//! `Region` over a live DOM container.

use std::cell::RefCell;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlAnchorElement};

use crate::error::Error;
use crate::refresh::{LinkHandler, Region};

pub struct DomRegion {
    root: Element,
    anchor_selector: String,
    // Listeners on the anchors currently in `root`. Replaced on every bind;
    // the old ones belong to nodes that were swapped out.
    listeners: RefCell<Vec<EventListener>>,
}

impl DomRegion {
    /// Bind to the element matching `selector`. Fails up front when nothing
    /// matches instead of no-opping later.
    pub fn find(document: &Document, selector: &str, anchor_selector: &str) -> Result<Self, Error> {
        let root = document
            .query_selector(selector)
            .ok()
            .flatten()
            .ok_or_else(|| Error::MissingElement(selector.to_string()))?;
        Ok(Self::new(root, anchor_selector))
    }

    pub fn new(root: Element, anchor_selector: &str) -> Self {
        Self {
            root,
            anchor_selector: anchor_selector.to_string(),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    fn anchors(&self) -> Vec<Element> {
        let Ok(nodes) = self.root.query_selector_all(&self.anchor_selector) else {
            log::warn!("Invalid pagination selector `{}`", self.anchor_selector);
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

impl Region for DomRegion {
    fn replace_content(&self, html: &str) {
        self.listeners.borrow_mut().clear();
        self.root.set_inner_html(html);
    }

    fn bind_pagination(&self, on_link: LinkHandler) {
        let listeners: Vec<EventListener> = self
            .anchors()
            .into_iter()
            .map(|anchor| {
                let on_link = on_link.clone();
                let target = anchor.clone();
                EventListener::new_with_options(
                    &anchor,
                    "click",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        event.prevent_default();
                        // Resolved href for real anchors, raw attribute otherwise.
                        let href = match target.dyn_ref::<HtmlAnchorElement>() {
                            Some(a) => a.href(),
                            None => target.get_attribute("href").unwrap_or_default(),
                        };
                        on_link(&href);
                    },
                )
            })
            .collect();
        log::debug!("Bound {} pagination links", listeners.len());
        *self.listeners.borrow_mut() = listeners;
    }
}
