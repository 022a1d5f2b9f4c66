//! In-memory stand-ins for the browser, used by the unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::LocalSpawner;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use serde_json::Value;

use crate::error::Error;
use crate::events::{Channel, Clock, Subscription};
use crate::refresh::{Host, LinkHandler, Region};

// ── Host ───────────────────────────────────────────────────────────

/// Location + fetch whose responses are handed out by the test, in any order.
pub struct FakeHost {
    spawner: LocalSpawner,
    search: RefCell<String>,
    replaced: RefCell<Vec<String>>,
    requests: RefCell<Vec<(String, Option<oneshot::Sender<Result<String, Error>>>)>>,
}

impl FakeHost {
    pub fn new(spawner: LocalSpawner, search: &str) -> Self {
        Self {
            spawner,
            search: RefCell::new(search.to_string()),
            replaced: RefCell::new(Vec::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Complete the `index`-th fetch (in issue order).
    pub fn respond(&self, index: usize, result: Result<String, Error>) {
        let reply = self.requests.borrow_mut()[index]
            .1
            .take()
            .expect("request already answered");
        let _ = reply.send(result);
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn replaced_queries(&self) -> Vec<String> {
        self.replaced.borrow().clone()
    }
}

impl Host for FakeHost {
    fn search(&self) -> String {
        self.search.borrow().clone()
    }

    fn replace_query(&self, query: &str) {
        *self.search.borrow_mut() = query.to_string();
        self.replaced.borrow_mut().push(query.to_string());
    }

    fn fetch_fragment(&self, url: &str) -> LocalBoxFuture<'static, Result<String, Error>> {
        let (tx, rx) = oneshot::channel();
        self.requests.borrow_mut().push((url.to_string(), Some(tx)));
        Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| Err(Error::Transport("request dropped".into())))
        })
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner.spawn_local(task).expect("spawn on test pool");
    }
}

// ── Region ─────────────────────────────────────────────────────────

/// Region that models the DOM lifecycle: a swap destroys the old anchors and
/// their bindings.
#[derive(Default)]
pub struct RecordingRegion {
    content: RefCell<String>,
    handler: RefCell<Option<LinkHandler>>,
    binds: Cell<usize>,
}

impl RecordingRegion {
    pub fn content(&self) -> String {
        self.content.borrow().clone()
    }

    pub fn bind_count(&self) -> usize {
        self.binds.get()
    }

    /// `href`s of the anchors currently in the content.
    pub fn links(&self) -> Vec<String> {
        let content = self.content.borrow();
        content
            .split("href=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .map(str::to_string)
            .collect()
    }

    /// Click the `index`-th anchor. Returns false when the anchor is missing
    /// or nothing is bound to it.
    pub fn click(&self, index: usize) -> bool {
        let Some(href) = self.links().into_iter().nth(index) else {
            return false;
        };
        let handler = self.handler.borrow().clone();
        match handler {
            Some(handler) => {
                handler(&href);
                true
            }
            None => false,
        }
    }
}

impl Region for RecordingRegion {
    fn replace_content(&self, html: &str) {
        *self.content.borrow_mut() = html.to_string();
        self.handler.borrow_mut().take();
    }

    fn bind_pagination(&self, on_link: LinkHandler) {
        *self.handler.borrow_mut() = Some(on_link);
        self.binds.set(self.binds.get() + 1);
    }
}

// ── Channel ────────────────────────────────────────────────────────

type Handler = Rc<RefCell<Box<dyn FnMut(Value)>>>;

#[derive(Default)]
pub struct MemoryChannel {
    handlers: Rc<RefCell<Vec<(u64, String, Handler)>>>,
    next_id: Cell<u64>,
    emitted: RefCell<Vec<(String, Value)>>,
}

impl MemoryChannel {
    /// Deliver a server push to every current subscriber of `event`.
    pub fn deliver(&self, event: &str, payload: Value) {
        let targets: Vec<Handler> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(_, name, _)| name == event)
            .map(|(_, _, handler)| handler.clone())
            .collect();
        for handler in targets {
            (handler.borrow_mut())(payload.clone());
        }
    }

    pub fn subscriber_count(&self, event: &str) -> usize {
        self.handlers
            .borrow()
            .iter()
            .filter(|(_, name, _)| name == event)
            .count()
    }

    pub fn emitted(&self) -> Vec<(String, Value)> {
        self.emitted.borrow().clone()
    }
}

impl Channel for MemoryChannel {
    fn subscribe(&self, event: &str, handler: Box<dyn FnMut(Value)>) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.handlers
            .borrow_mut()
            .push((id, event.to_string(), Rc::new(RefCell::new(handler))));
        let handlers = Rc::downgrade(&self.handlers);
        Subscription::new(move || {
            if let Some(handlers) = handlers.upgrade() {
                handlers.borrow_mut().retain(|(hid, _, _)| *hid != id);
            }
        })
    }

    fn emit(&self, event: &str, payload: Value) {
        self.emitted.borrow_mut().push((event.to_string(), payload));
    }
}

// ── Clock ──────────────────────────────────────────────────────────

enum TimerTask {
    Once(Box<dyn FnOnce()>),
    Repeat {
        period: u64,
        tick: Rc<RefCell<Box<dyn FnMut()>>>,
    },
}

struct Timer {
    due: u64,
    live: Rc<Cell<bool>>,
    task: TimerTask,
}

enum Fire {
    Once(Box<dyn FnOnce()>),
    Repeat(Rc<RefCell<Box<dyn FnMut()>>>, Rc<Cell<bool>>),
}

/// Virtual time; timers only fire inside [`advance`](ManualClock::advance).
#[derive(Default)]
pub struct ManualClock {
    now: Cell<u64>,
    timers: RefCell<Vec<Timer>>,
}

impl ManualClock {
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Timers still armed.
    pub fn pending(&self) -> usize {
        self.timers.borrow().iter().filter(|t| t.live.get()).count()
    }

    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let fire = {
                let mut timers = self.timers.borrow_mut();
                timers.retain(|t| t.live.get());
                let next = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| t.due)
                    .map(|(i, _)| i);
                let Some(idx) = next else { break };
                self.now.set(timers[idx].due);

                if matches!(timers[idx].task, TimerTask::Repeat { .. }) {
                    let timer = &mut timers[idx];
                    let (period, tick) = match &timer.task {
                        TimerTask::Repeat { period, tick } => (*period, tick.clone()),
                        TimerTask::Once(_) => continue,
                    };
                    timer.due += period;
                    Fire::Repeat(tick, timer.live.clone())
                } else {
                    let timer = timers.remove(idx);
                    timer.live.set(false);
                    match timer.task {
                        TimerTask::Once(task) => Fire::Once(task),
                        TimerTask::Repeat { .. } => continue,
                    }
                }
            };
            match fire {
                Fire::Once(task) => task(),
                Fire::Repeat(tick, live) => {
                    if live.get() {
                        (tick.borrow_mut())();
                    }
                }
            }
        }
        self.now.set(target);
    }

    fn arm(&self, delay_ms: u32, task: TimerTask) -> Subscription {
        let live = Rc::new(Cell::new(true));
        self.timers.borrow_mut().push(Timer {
            due: self.now.get() + u64::from(delay_ms),
            live: live.clone(),
            task,
        });
        Subscription::new(move || live.set(false))
    }
}

impl Clock for ManualClock {
    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> Subscription {
        let period = u64::from(period_ms.max(1));
        self.arm(
            period_ms.max(1),
            TimerTask::Repeat {
                period,
                tick: Rc::new(RefCell::new(tick)),
            },
        )
    }

    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Subscription {
        self.arm(delay_ms, TimerTask::Once(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_fires_in_due_order() {
        let clock = ManualClock::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (log.clone(), log.clone());
        let _late = clock.after(300, Box::new(move || a.borrow_mut().push("late")));
        let _early = clock.after(100, Box::new(move || b.borrow_mut().push("early")));
        clock.advance(500);
        assert_eq!(*log.borrow(), vec!["early", "late"]);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn manual_clock_interval_repeats_until_dropped() {
        let clock = ManualClock::default();
        let ticks = Rc::new(Cell::new(0));
        let t = ticks.clone();
        let sub = clock.every(1000, Box::new(move || t.set(t.get() + 1)));
        clock.advance(3500);
        assert_eq!(ticks.get(), 3);
        drop(sub);
        clock.advance(5000);
        assert_eq!(ticks.get(), 3);
    }
}
