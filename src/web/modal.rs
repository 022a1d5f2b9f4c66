//! `Modal` over the `#motivational-modal` overlay.

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent};

use crate::catalog::Motivation;
use crate::error::Error;
use crate::notifier::{Modal, StreakNotifier};

const MODAL_ID: &str = "motivational-modal";
const TITLE_ID: &str = "motivational-title";
const MESSAGE_ID: &str = "motivational-message";
const ICON_SELECTOR: &str = ".motivational-icon";
const CLOSE_ID: &str = "motivational-close-btn";

const MARKUP: &str = r#"<div id="motivational-modal" class="motivational-modal" style="display: none;">
  <div class="motivational-content">
    <div class="motivational-icon">&#x1F4AA;</div>
    <h3 class="motivational-title" id="motivational-title"></h3>
    <p class="motivational-message" id="motivational-message"></p>
    <button class="btn btn-primary motivational-btn" id="motivational-close-btn">¡Vamos de nuevo!</button>
  </div>
</div>"#;

pub struct DomModal {
    root: HtmlElement,
    title: Element,
    message: Element,
    icon: Element,
}

impl DomModal {
    /// Use the page's modal when it ships one, otherwise append ours to `<body>`.
    pub fn install(document: &Document) -> Result<Self, Error> {
        if document.get_element_by_id(MODAL_ID).is_none() {
            let body = document
                .body()
                .ok_or_else(|| Error::MissingElement("body".to_string()))?;
            body.insert_adjacent_html("beforeend", MARKUP)
                .map_err(|_| Error::MissingElement(format!("#{MODAL_ID}")))?;
        }

        let by_id = |id: &str| {
            document
                .get_element_by_id(id)
                .ok_or_else(|| Error::MissingElement(format!("#{id}")))
        };
        let root = by_id(MODAL_ID)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| Error::MissingElement(format!("#{MODAL_ID}")))?;
        let icon = root
            .query_selector(ICON_SELECTOR)
            .ok()
            .flatten()
            .ok_or_else(|| Error::MissingElement(ICON_SELECTOR.to_string()))?;

        Ok(Self {
            title: by_id(TITLE_ID)?,
            message: by_id(MESSAGE_ID)?,
            icon,
            root,
        })
    }

    fn set_display(&self, value: &str) {
        if let Err(err) = self.root.style().set_property("display", value) {
            log::warn!("Could not toggle the modal: {:?}", err);
        }
    }
}

impl Modal for DomModal {
    fn show(&self, motivation: &Motivation) {
        self.title.set_text_content(Some(motivation.title));
        self.message.set_text_content(Some(motivation.message));
        self.icon.set_text_content(Some(motivation.icon));
        self.set_display("flex");
    }

    fn hide(&self) {
        self.set_display("none");
    }

    fn is_visible(&self) -> bool {
        self.root
            .style()
            .get_property_value("display")
            .map(|display| display != "none")
            .unwrap_or(false)
    }
}

/// Close button, backdrop click and Escape all dismiss through the notifier
/// so the auto-dismiss timer is disarmed too. Keep the listeners alive for
/// as long as the modal should react.
pub fn wire_dismissal(document: &Document, notifier: &StreakNotifier) -> Vec<EventListener> {
    let on_click = {
        let notifier = notifier.clone();
        EventListener::new(document, "click", move |event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            // Clicks inside the content box carry the inner element's id.
            let id = target.id();
            if id == CLOSE_ID || id == MODAL_ID {
                notifier.dismiss();
            }
        })
    };

    let on_key = {
        let notifier = notifier.clone();
        EventListener::new(document, "keydown", move |event| {
            let escape = event
                .dyn_ref::<KeyboardEvent>()
                .is_some_and(|key| key.key() == "Escape");
            if escape {
                notifier.dismiss();
            }
        })
    };

    vec![on_click, on_key]
}
