//! UpdateTrigger — the three things that refresh a paginated region.
//!
//! - **Timer:** re-render the current page every `interval_ms`.
//! - **Push:** re-render the current page on every member joined/left event.
//! - **Click:** pagination anchors; bound once here at startup and rebound by
//!   the refresher after each swap.
//!
//! Timer and push refreshes pass no page, so the page is read from the URL at
//! the moment they fire and a pagination click that just rewrote the URL is
//! honoured. Overlap between triggers is settled by the refresher's
//! last-issued-wins rule.

use std::rc::Rc;

use serde_json::Value;

use crate::events::{Channel, Clock, MEMBER_JOINED, MEMBER_LEFT, Subscription};
use crate::refresh::ViewRefresher;

pub struct UpdateTrigger {
    refresher: Rc<ViewRefresher>,
    _subscriptions: Vec<Subscription>,
}

impl UpdateTrigger {
    /// Wire every trigger source to `refresher`. The bindings live as long as
    /// the returned value.
    pub fn bind(refresher: Rc<ViewRefresher>, channel: &dyn Channel, clock: &dyn Clock, interval_ms: u32) -> Self {
        refresher.bind_pagination();

        let mut subscriptions = Vec::with_capacity(3);

        let ticking = Rc::downgrade(&refresher);
        subscriptions.push(clock.every(
            interval_ms,
            Box::new(move || {
                if let Some(refresher) = ticking.upgrade() {
                    refresher.request(None);
                }
            }),
        ));

        for event in [MEMBER_JOINED, MEMBER_LEFT] {
            let pushed = Rc::downgrade(&refresher);
            subscriptions.push(channel.subscribe(
                event,
                Box::new(move |payload: Value| {
                    log::debug!("{}: {}", event, payload);
                    if let Some(refresher) = pushed.upgrade() {
                        refresher.request(None);
                    }
                }),
            ));
        }

        log::info!("Auto-refresh armed every {} ms", interval_ms);
        Self {
            refresher,
            _subscriptions: subscriptions,
        }
    }

    pub fn refresher(&self) -> &Rc<ViewRefresher> {
        &self.refresher
    }
}
