//! Application slot — everything mounted on the current page, kept alive in
//! WASM memory until the page unloads.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use web_sys::{Document, Window};

use crate::Mount;
use crate::config::Config;
use crate::error::Error;
use crate::events::Channel;
use crate::notifier::StreakNotifier;
use crate::refresh::ViewRefresher;
use crate::session::TableSession;
use crate::trigger::UpdateTrigger;
use crate::web::balance::DomBalance;
use crate::web::effects;
use crate::web::host::WebHost;
use crate::web::modal::{self, DomModal};
use crate::web::notice::AlertNotice;
use crate::web::region::DomRegion;
use crate::web::socket::SocketChannel;
use crate::web::timers::TimerClock;

pub struct App {
    pub notifier: StreakNotifier,
    pub room_list: Option<UpdateTrigger>,
    pub session: Option<TableSession>,
    _listeners: Vec<EventListener>,
    _reveals: Vec<Timeout>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

// ── Accessors ──────────────────────────────────────────────────────

pub fn install(app: App) {
    APP.with(|cell| *cell.borrow_mut() = Some(app));
}

pub fn is_mounted() -> bool {
    APP.with(|cell| cell.borrow().is_some())
}

/// Run `f` against the mounted app; `None` before `start()` has finished.
pub fn with_app<R>(f: impl FnOnce(&App) -> R) -> Option<R> {
    APP.with(|cell| cell.borrow().as_ref().map(f))
}

// ── Mounting ───────────────────────────────────────────────────────

impl App {
    pub fn mount(window: &Window, document: &Document, config: &Config, mount: Mount) -> Result<Self, Error> {
        let clock = Rc::new(TimerClock);
        let overlay = Rc::new(DomModal::install(document)?);
        let notifier = StreakNotifier::new(
            overlay,
            clock.clone(),
            Box::new(random_index),
            config.notifier.auto_dismiss_ms,
        );

        let mut listeners = modal::wire_dismissal(document, &notifier);
        listeners.extend(effects::watch_navbar(window, document));
        let reveals = effects::schedule_reveals(document);

        let mut app = Self {
            notifier,
            room_list: None,
            session: None,
            _listeners: listeners,
            _reveals: reveals,
        };

        match mount {
            Mount::RoomList => match mount_room_list(window, document, config, &*clock) {
                Ok(trigger) => app.room_list = Some(trigger),
                Err(err) => log::warn!("Room list not mounted: {}", err),
            },
            Mount::Table { room_id } => match connect(window) {
                Ok(channel) => {
                    let display = Rc::new(DomBalance::new(document.clone(), &config.balance_selector));
                    app.session = Some(TableSession::join(
                        channel,
                        room_id,
                        config.player_id.clone(),
                        display,
                        Rc::new(AlertNotice),
                    ));
                }
                Err(err) => log::error!("Table {} not joined: {}", room_id, err),
            },
            Mount::Nothing => {}
        }

        Ok(app)
    }
}

fn mount_room_list(
    window: &Window,
    document: &Document,
    config: &Config,
    clock: &TimerClock,
) -> Result<UpdateTrigger, Error> {
    let region = DomRegion::find(document, &config.region.selector, &config.region.anchor_selector)?;
    let host = WebHost::new(window.clone());
    let refresher = ViewRefresher::new(Rc::new(host), Rc::new(region), config.region.page_param.clone());
    let channel = connect(window)?;
    Ok(UpdateTrigger::bind(refresher, &*channel, clock, config.region.refresh_interval_ms))
}

fn connect(window: &Window) -> Result<Rc<dyn Channel>, Error> {
    Ok(Rc::new(SocketChannel::connect(window)?))
}

fn random_index(len: usize) -> usize {
    let index = (js_sys::Math::random() * len as f64) as usize;
    index.min(len.saturating_sub(1))
}
