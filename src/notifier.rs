//! StreakNotifier — counts consecutive losses and surfaces a motivational
//! message at milestone streaks.
//!
//! States are derived from the counter and the modal:
//!
//! ```text
//! idle ──loss──▶ streaking ──loss at 3,5,10,15,…──▶ notifying
//!   ▲               │                                   │
//!   └──non-loss─────┘          dismiss / backdrop / Esc / auto-dismiss
//!                                                       ▼
//!                                                   streaking
//! ```
//!
//! A non-loss outcome resets the counter but leaves an open modal alone. Each
//! show arms a fresh auto-dismiss timer and cancels the previous one; every
//! other dismissal path cancels it as well.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::catalog::{self, Motivation};
use crate::events::{Clock, Subscription};

/// The overlay the notifier drives. At most one per page.
pub trait Modal {
    fn show(&self, motivation: &Motivation);
    fn hide(&self);
    fn is_visible(&self) -> bool;
}

/// Result of one round, as reported by the game page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Loss,
    Other,
}

impl Outcome {
    /// Map a game's result label. `perdida` and `derrota` are what the games
    /// report; `loss`/`defeat` are accepted too. Everything else is a non-loss.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "perdida" | "pérdida" | "derrota" | "loss" | "defeat" => Outcome::Loss,
            _ => Outcome::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierState {
    Idle,
    Streaking,
    Notifying,
}

/// Streak values that surface a message: 3, then every multiple of 5.
pub fn is_milestone(streak: u32) -> bool {
    streak == 3 || (streak >= 5 && streak % 5 == 0)
}

/// Chooses a catalog index given the catalog length.
pub type Picker = Box<dyn FnMut(usize) -> usize>;

struct Inner {
    streak: Cell<u32>,
    modal: Rc<dyn Modal>,
    clock: Rc<dyn Clock>,
    picker: RefCell<Picker>,
    auto_dismiss_ms: u32,
    auto_dismiss: RefCell<Option<Subscription>>,
}

/// Cheap to clone; clones share one counter and one modal.
#[derive(Clone)]
pub struct StreakNotifier {
    inner: Rc<Inner>,
}

impl StreakNotifier {
    pub fn new(modal: Rc<dyn Modal>, clock: Rc<dyn Clock>, picker: Picker, auto_dismiss_ms: u32) -> Self {
        Self {
            inner: Rc::new(Inner {
                streak: Cell::new(0),
                modal,
                clock,
                picker: RefCell::new(picker),
                auto_dismiss_ms,
                auto_dismiss: RefCell::new(None),
            }),
        }
    }

    /// Feed one round outcome. Returns the message shown, if this outcome
    /// hit a milestone.
    pub fn record_outcome(&self, outcome: Outcome) -> Option<&'static Motivation> {
        match outcome {
            Outcome::Loss => {
                let streak = self.inner.streak.get().saturating_add(1);
                self.inner.streak.set(streak);
                log::debug!("Loss streak now {}", streak);
                if is_milestone(streak) {
                    Some(self.show_random())
                } else {
                    None
                }
            }
            Outcome::Other => {
                self.inner.streak.set(0);
                None
            }
        }
    }

    pub fn streak(&self) -> u32 {
        self.inner.streak.get()
    }

    /// Zero the counter. The modal is not touched.
    pub fn reset(&self) {
        self.inner.streak.set(0);
    }

    pub fn state(&self) -> NotifierState {
        if self.inner.modal.is_visible() {
            NotifierState::Notifying
        } else if self.inner.streak.get() > 0 {
            NotifierState::Streaking
        } else {
            NotifierState::Idle
        }
    }

    /// Hide the modal and disarm the auto-dismiss timer. No-op when hidden.
    pub fn dismiss(&self) {
        dismiss_inner(&self.inner);
    }

    fn show_random(&self) -> &'static Motivation {
        let index = (self.inner.picker.borrow_mut())(catalog::MOTIVATIONS.len());
        let motivation = catalog::pick(index);
        self.show(motivation);
        motivation
    }

    fn show(&self, motivation: &'static Motivation) {
        // Disarm first so a stale timer can never close this message early.
        if let Some(previous) = self.inner.auto_dismiss.borrow_mut().take() {
            previous.cancel();
        }
        self.inner.modal.show(motivation);
        log::info!("Showing motivational message after {} losses", self.streak());

        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        let timer = self.inner.clock.after(
            self.inner.auto_dismiss_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    dismiss_inner(&inner);
                }
            }),
        );
        *self.inner.auto_dismiss.borrow_mut() = Some(timer);
    }
}

fn dismiss_inner(inner: &Inner) {
    let pending = inner.auto_dismiss.borrow_mut().take();
    if let Some(timer) = pending {
        timer.cancel();
    }
    if inner.modal.is_visible() {
        inner.modal.hide();
    }
}
