//! `Channel` over the page's Socket.IO client.
//!
//! The client library is loaded by the page; we only bind the three methods
//! we use. A socket the page already opened (`window.socket`) is reused so
//! both sides share one connection.

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::error::{Error, js_error_message};
use crate::events::{Channel, Subscription};

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    pub type Socket;

    #[wasm_bindgen(catch, js_name = io)]
    fn connect() -> Result<Socket, JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &Socket, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method)]
    fn off(this: &Socket, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method)]
    fn emit(this: &Socket, event: &str, payload: &JsValue);
}

pub struct SocketChannel {
    socket: Socket,
}

impl SocketChannel {
    /// Reuse `window.socket` when present, else open a connection with `io()`.
    pub fn connect(window: &web_sys::Window) -> Result<Self, Error> {
        let existing = js_sys::Reflect::get(window, &JsValue::from_str("socket"))
            .ok()
            .filter(|value| value.is_object());
        let socket = match existing {
            Some(value) => value.unchecked_into::<Socket>(),
            None => connect().map_err(|err| Error::Transport(js_error_message(err, "io() unavailable")))?,
        };
        Ok(Self { socket })
    }
}

impl Channel for SocketChannel {
    fn subscribe(&self, event: &str, mut handler: Box<dyn FnMut(Value)>) -> Subscription {
        let name = event.to_string();
        let callback = Closure::wrap(Box::new(move |payload: JsValue| {
            match serde_wasm_bindgen::from_value::<Value>(payload) {
                Ok(value) => handler(value),
                Err(err) => log::warn!("Dropping undecodable `{name}` payload: {err}"),
            }
        }) as Box<dyn FnMut(JsValue)>);
        self.socket.on(event, callback.as_ref().unchecked_ref());

        let socket = self.socket.clone();
        let event = event.to_string();
        Subscription::new(move || {
            socket.off(&event, callback.as_ref().unchecked_ref());
            drop(callback);
        })
    }

    fn emit(&self, event: &str, payload: Value) {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        match payload.serialize(&serializer) {
            Ok(js) => self.socket.emit(event, &js),
            Err(err) => log::error!("Could not encode `{event}` payload: {err}"),
        }
    }
}
