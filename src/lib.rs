//! Casino live-page frontend, compiled to WASM.
//!
//! `start()` runs once per page load: it reads the page config, picks what to
//! mount from the location path (routed with `matchit`, the same router
//! engine that powers Axum) and keeps the mounted components alive in a
//! thread-local slot. The remaining exports are the hooks the game scripts
//! call: round outcomes for the losing-streak notifier and the blackjack
//! table intents.
//!
//! Components mounted per path:
//! * `/salas-espera`, `/multijugador` — auto-refreshing paginated room list.
//! * `/blackjack/sala/{sala_id}` — table session (balance sync, intents).
//! * every page — losing-streak notifier, entrance reveals, navbar state.

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod app;
pub mod catalog;
pub mod config;
pub mod effects;
pub mod error;
pub mod events;
pub mod notifier;
pub mod paging;
pub mod refresh;
pub mod session;
pub mod trigger;
pub mod web;

#[cfg(test)]
mod testing;

use crate::config::Config;
use crate::error::Error;
use crate::notifier::Outcome;
use crate::session::Intent;

// ── Routing ────────────────────────────────────────────────────────

/// What the current page gets beyond the always-on components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount {
    RoomList,
    Table { room_id: u64 },
    Nothing,
}

/// Map a location path to its mount.
pub fn route(path: &str) -> Mount {
    let mut router = matchit::Router::new();
    router.insert("/salas-espera", "room_list").ok();
    router.insert("/multijugador", "room_list").ok();
    router.insert("/blackjack/sala/{sala_id}", "table").ok();

    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    match router.at(path) {
        Ok(matched) => match *matched.value {
            "room_list" => Mount::RoomList,
            "table" => {
                let raw = matched.params.get("sala_id").unwrap_or_default();
                match raw.parse::<u64>() {
                    Ok(room_id) if room_id > 0 => Mount::Table { room_id },
                    _ => {
                        log::warn!("Ignoring table route with room id `{}`", raw);
                        Mount::Nothing
                    }
                }
            }
            _ => Mount::Nothing,
        },
        Err(_) => Mount::Nothing,
    }
}

// ── Entry point ────────────────────────────────────────────────────

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web::window()?;
    let document = web::document()?;

    let parsed = Config::from_json(&web::read_config_blob(&document));
    let level = parsed.as_ref().map(Config::log_level).unwrap_or(log::Level::Info);
    if console_log::init_with_level(level).is_err() {
        log::debug!("Logger already installed");
    }
    let config = parsed.unwrap_or_else(|err| {
        log::warn!("Ignoring page config: {}", err);
        Config::default()
    });

    if app::is_mounted() {
        log::warn!("start() called twice; keeping the first mount");
        return Ok(());
    }

    let path = window.location().pathname().unwrap_or_default();
    let mount = route(&path);
    log::info!("Mounting {:?} for {}", mount, path);

    let mounted = app::App::mount(&window, &document, &config, mount).map_err(|err| {
        log::error!("Startup failed: {}", err);
        err
    })?;
    app::install(mounted);
    Ok(())
}

// ── Losing-streak hooks ────────────────────────────────────────────

/// Report a finished round (`"perdida"`, `"derrota"`, anything else is a
/// non-loss). Returns `true` when a motivational message was shown.
#[wasm_bindgen]
pub fn record_round_outcome(outcome: &str) -> bool {
    app::with_app(|app| app.notifier.record_outcome(Outcome::from_label(outcome)).is_some())
        .unwrap_or(false)
}

#[wasm_bindgen]
pub fn loss_streak() -> u32 {
    app::with_app(|app| app.notifier.streak()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn reset_loss_streak() {
    app::with_app(|app| app.notifier.reset());
}

#[wasm_bindgen]
pub fn close_motivational_modal() {
    app::with_app(|app| app.notifier.dismiss());
}

/// The full message catalog as an array of `{title, message, icon}`.
#[wasm_bindgen]
pub fn motivational_catalog() -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    catalog::MOTIVATIONS
        .serialize(&serializer)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

// ── Table intents ──────────────────────────────────────────────────

fn dispatch(intent: Intent) -> Result<(), Error> {
    app::with_app(|app| match &app.session {
        Some(session) => session.send(intent),
        None => Err(Error::NoTable),
    })
    .unwrap_or(Err(Error::NoTable))
}

fn send(intent: Intent) -> Result<(), JsValue> {
    Ok(dispatch(intent)?)
}

#[wasm_bindgen]
pub fn place_bet(amount: f64) -> Result<(), JsValue> {
    send(Intent::PlaceBet(amount))
}

#[wasm_bindgen]
pub fn start_round() -> Result<(), JsValue> {
    send(Intent::StartRound)
}

#[wasm_bindgen]
pub fn take_card() -> Result<(), JsValue> {
    send(Intent::TakeCard)
}

#[wasm_bindgen]
pub fn hold() -> Result<(), JsValue> {
    send(Intent::Hold)
}

#[wasm_bindgen]
pub fn vote_rematch() -> Result<(), JsValue> {
    send(Intent::VoteRematch)
}
