//! Staggered entrance reveals and the navbar scroll listener.

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use crate::effects::{NAVBAR_ID, REVEAL_SELECTOR, Reveal, SCROLLED_CLASS, is_scrolled, reveal_delay};

/// Schedule every animated element's reveal. Each pending reveal holds its
/// element; dropping the returned timers cancels the ones not yet run.
pub fn schedule_reveals(document: &Document) -> Vec<Timeout> {
    let Ok(nodes) = document.query_selector_all(REVEAL_SELECTOR) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .filter_map(|element| Reveal::from_class_list(&element.class_name()).map(|kind| (element, kind)))
        .enumerate()
        .map(|(index, (element, kind))| {
            Timeout::new(reveal_delay(index), move || {
                let style = element.style();
                for (property, value) in kind.final_styles() {
                    if let Err(err) = style.set_property(property, value) {
                        log::debug!("Reveal style `{}` rejected: {:?}", property, err);
                    }
                }
            })
        })
        .collect()
}

/// Toggle the navbar's `scrolled` class with the scroll position. `None`
/// when the page has no navbar.
pub fn watch_navbar(window: &Window, document: &Document) -> Option<EventListener> {
    let navbar = document.get_element_by_id(NAVBAR_ID)?;
    let sync = {
        let window = window.clone();
        move || {
            let y = window.scroll_y().unwrap_or(0.0);
            let classes = navbar.class_list();
            let result = if is_scrolled(y) {
                classes.add_1(SCROLLED_CLASS)
            } else {
                classes.remove_1(SCROLLED_CLASS)
            };
            if let Err(err) = result {
                log::debug!("Navbar class update failed: {:?}", err);
            }
        }
    };
    sync();
    Some(EventListener::new(window, "scroll", move |_| sync()))
}
