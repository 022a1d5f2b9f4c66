//! Event sources: the real-time channel, timers, and the disposable
//! [`Subscription`] handle every registration returns.
//!
//! Components never reach for the socket or `setTimeout` directly; they get a
//! [`Channel`] and a [`Clock`] and hold on to the subscriptions they create.
//! Dropping a subscription tears the registration down.

use serde_json::Value;

// ── Wire event names ───────────────────────────────────────────────

/// Someone joined a room (payload opaque).
pub const MEMBER_JOINED: &str = "user_joined";
/// Someone left a room (payload opaque).
pub const MEMBER_LEFT: &str = "user_left";
/// Full blackjack table state, balances keyed by player id.
pub const TABLE_STATE: &str = "estado_blackjack";
/// The current player's balance changed.
pub const BALANCE_UPDATE: &str = "balance_update";
/// Server-side rejection of a table action.
pub const TABLE_ERROR: &str = "error_blackjack";
/// The channel (re)connected. Room membership does not survive a reconnect.
pub const CONNECTED: &str = "connect";

// ── Subscription ───────────────────────────────────────────────────

/// Handle to a live registration. Dropping it (or calling [`cancel`]) runs
/// the teardown exactly once.
///
/// [`cancel`]: Subscription::cancel
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Keep an owned resource (an interval, a listener) alive for as long as
    /// the subscription lives; dropping the subscription drops it.
    pub fn holding<T: 'static>(resource: T) -> Self {
        Self::new(move || drop(resource))
    }

    pub fn cancel(mut self) {
        self.run_teardown();
    }

    fn run_teardown(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_teardown();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.teardown.is_some())
            .finish()
    }
}

// ── Sources ────────────────────────────────────────────────────────

/// Publish/subscribe connection to the game server, assumed connected.
pub trait Channel {
    /// Call `handler` with the decoded payload of every `event`.
    fn subscribe(&self, event: &str, handler: Box<dyn FnMut(Value)>) -> Subscription;

    /// Fire-and-forget message to the server.
    fn emit(&self, event: &str, payload: Value);
}

/// Timer source.
pub trait Clock {
    /// Run `tick` every `period_ms` until the subscription is dropped.
    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> Subscription;

    /// Run `task` once after `delay_ms` unless the subscription is dropped first.
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Subscription;
}
