//! `Host` over `window.location`, `window.history` and `fetch`.

use futures::future::LocalBoxFuture;
use gloo::net::http::Request;
use wasm_bindgen::JsValue;
use web_sys::Window;

use crate::error::{Error, js_error_message};
use crate::refresh::Host;

/// Marks the request as an in-page refresh so the server answers with the
/// region fragment instead of the full document.
const PARTIAL_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

pub struct WebHost {
    window: Window,
}

impl WebHost {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Host for WebHost {
    fn search(&self) -> String {
        self.window.location().search().unwrap_or_default()
    }

    fn replace_query(&self, query: &str) {
        let result = self
            .window
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(query)));
        if let Err(err) = result {
            log::warn!("Could not update the URL: {}", js_error_message(err, "history unavailable"));
        }
    }

    fn fetch_fragment(&self, url: &str) -> LocalBoxFuture<'static, Result<String, Error>> {
        let url = url.to_string();
        Box::pin(async move {
            let response = Request::get(&url)
                .header(PARTIAL_HEADER.0, PARTIAL_HEADER.1)
                .send()
                .await
                .map_err(|err| Error::Transport(err.to_string()))?;
            if !response.ok() {
                return Err(Error::Http {
                    status: response.status(),
                });
            }
            response
                .text()
                .await
                .map_err(|err| Error::Transport(err.to_string()))
        })
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
