//! `Clock` over `setInterval` / `setTimeout` via gloo.

use gloo::timers::callback::{Interval, Timeout};

use crate::events::{Clock, Subscription};

pub struct TimerClock;

impl Clock for TimerClock {
    fn every(&self, period_ms: u32, mut tick: Box<dyn FnMut()>) -> Subscription {
        Subscription::holding(Interval::new(period_ms, move || tick()))
    }

    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Subscription {
        Subscription::holding(Timeout::new(delay_ms, task))
    }
}
