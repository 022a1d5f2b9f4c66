//! ViewRefresher — keeps one paginated DOM region in sync with the server.
//!
//! A refresh resolves the target page (explicit, or read fresh from the URL),
//! asks the host for the matching HTML fragment, and swaps it into the region.
//! The swap destroys the old pagination anchors, so every successful swap is
//! followed by a rebind.
//!
//! ## Ordering
//!
//! Every refresh takes a ticket from the region's [`RequestSequence`] at call
//! time. When the response lands it is applied only if its ticket is still
//! the latest one issued; anything older is dropped. A slow response for an
//! old page can therefore never overwrite the page the user moved to since.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;

use crate::error::Error;
use crate::paging;

/// Browser services a refresher needs: the location, history and fetch.
pub trait Host {
    /// Current `location.search`, leading `?` included.
    fn search(&self) -> String;

    /// Rewrite the visible query string without adding a history entry.
    fn replace_query(&self, query: &str);

    /// Fetch a region fragment. Resolves to `Err` on transport failure or a
    /// non-2xx status.
    fn fetch_fragment(&self, url: &str) -> LocalBoxFuture<'static, Result<String, Error>>;

    /// Run a task on the event loop.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Called with the `href` of the pagination link that was clicked.
pub type LinkHandler = Rc<dyn Fn(&str)>;

/// The DOM subtree a refresher owns.
pub trait Region {
    /// Replace the whole inner content. Existing pagination bindings die with
    /// the old nodes.
    fn replace_content(&self, html: &str);

    /// Attach `on_link` to every pagination anchor currently in the region.
    /// Default navigation must be suppressed.
    fn bind_pagination(&self, on_link: LinkHandler);
}

// ── Sequencing ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Monotonic per-region request counter.
#[derive(Debug, Default)]
pub struct RequestSequence {
    issued: Cell<u64>,
}

impl RequestSequence {
    pub fn issue(&self) -> Ticket {
        let next = self.issued.get() + 1;
        self.issued.set(next);
        Ticket(next)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.issued.get() == ticket.0
    }
}

// ── Refresher ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The fragment for `page` is now displayed.
    Applied { page: u32 },
    /// A newer refresh was issued before this one completed; dropped.
    Stale { page: u32 },
    /// The fetch failed; previous content left in place.
    Failed { page: u32, error: Error },
}

pub struct ViewRefresher {
    host: Rc<dyn Host>,
    region: Rc<dyn Region>,
    page_param: String,
    sequence: RequestSequence,
    this: Weak<ViewRefresher>,
}

impl ViewRefresher {
    pub fn new(host: Rc<dyn Host>, region: Rc<dyn Region>, page_param: impl Into<String>) -> Rc<Self> {
        let page_param = page_param.into();
        Rc::new_cyclic(|this| Self {
            host,
            region,
            page_param,
            sequence: RequestSequence::default(),
            this: this.clone(),
        })
    }

    pub fn page_param(&self) -> &str {
        &self.page_param
    }

    /// The page the URL currently names.
    pub fn current_page(&self) -> u32 {
        paging::resolve_current_page(&self.host.search(), &self.page_param)
    }

    /// Refresh the region. The page and the ticket are fixed when this is
    /// called, not when the returned future is first polled.
    pub fn refresh(&self, page: Option<u32>) -> LocalBoxFuture<'static, RefreshOutcome> {
        let page = page.unwrap_or_else(|| self.current_page());
        let ticket = self.sequence.issue();
        let fetch = self.host.fetch_fragment(&paging::page_query(&self.page_param, page));
        let this = self.this.clone();

        Box::pin(async move {
            let result = fetch.await;
            match this.upgrade() {
                Some(this) => this.apply(ticket, page, result),
                None => RefreshOutcome::Stale { page },
            }
        })
    }

    /// Fire-and-forget [`refresh`](Self::refresh) on the host's event loop.
    pub fn request(&self, page: Option<u32>) {
        let refresh = self.refresh(page);
        self.host.spawn(Box::pin(async move {
            refresh.await;
        }));
    }

    /// Bind the pagination anchors currently in the region.
    pub fn bind_pagination(&self) {
        let this = self.this.clone();
        self.region.bind_pagination(Rc::new(move |href: &str| {
            if let Some(this) = this.upgrade() {
                this.follow_link(href);
            }
        }));
    }

    /// Handle a pagination click: load the linked page and mirror it in the URL.
    pub fn follow_link(&self, href: &str) -> u32 {
        let page = paging::page_from_href(href, &self.page_param);
        self.request(Some(page));
        self.host.replace_query(&paging::page_query(&self.page_param, page));
        page
    }

    fn apply(&self, ticket: Ticket, page: u32, result: Result<String, Error>) -> RefreshOutcome {
        if !self.sequence.is_latest(ticket) {
            log::debug!("Dropping superseded fragment for page {}", page);
            return RefreshOutcome::Stale { page };
        }
        match result {
            Ok(html) => {
                self.region.replace_content(&html);
                self.bind_pagination();
                RefreshOutcome::Applied { page }
            }
            Err(error) => {
                log::error!("Error refreshing page {}: {}", page, error);
                RefreshOutcome::Failed { page, error }
            }
        }
    }
}
