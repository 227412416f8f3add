//! Paged browsing store: exactly one numbered page of records at a time.

use ledgerscope_gateway::{LedgerGateway, PageMeta, PageQuery, Query};
use ledgerscope_primitives::{Record, SortDirection};
use tokio::sync::watch;
use tracing::debug;

use crate::batch::page_batch;
use crate::lifecycle::{RequestLifecycle, RequestTicket};
use crate::snapshot::Snapshot;
use crate::store::{StoreCore, StoreState};

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    pub page_size: u32,
    pub direction: SortDirection,
    /// Owner filter applied from the first page on.
    pub public_key: Option<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            direction: SortDirection::Descending,
            public_key: None,
        }
    }
}

/// Page position and the totals reported with the last page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    /// 1-based, authoritative for the records shown.
    pub page_number: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub public_key: Option<String>,
    /// Owner key the service echoed back for a filtered page.
    pub queried_public_key: Option<String>,
    /// Net amount moved by the filtered owner.
    pub net_amount: Option<f64>,
}

impl PageView {
    fn initial(config: &PageConfig) -> Self {
        Self {
            page_number: 1,
            page_size: config.page_size,
            total_count: 0,
            total_pages: 0,
            public_key: config.public_key.clone(),
            queried_public_key: None,
            net_amount: None,
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.page_number < self.total_pages
    }

    pub fn has_prev_page(&self) -> bool {
        self.page_number > 1
    }

    fn absorb(&mut self, meta: PageMeta) {
        self.total_count = meta.total;
        self.total_pages = meta.pages;
        self.queried_public_key = meta.queried_public_key;
        self.net_amount = meta.net_amount;
    }
}

pub type PageSnapshot<R> = Snapshot<R, PageView>;

struct PagedState<R> {
    lifecycle: RequestLifecycle,
    records: Vec<R>,
    view: PageView,
}

impl<R: Record> StoreState for PagedState<R> {
    type Snapshot = PageSnapshot<R>;

    fn lifecycle(&mut self) -> &mut RequestLifecycle {
        &mut self.lifecycle
    }

    fn snapshot(&self) -> Self::Snapshot {
        Snapshot {
            records: self.records.clone(),
            meta: self.view.clone(),
            status: self.lifecycle.status(),
            error: self.lifecycle.error().cloned(),
        }
    }
}

/// Discrete "Prev/Next" browsing over records of kind `R`.
///
/// Page bounds are the caller's concern: the store requests whatever page it
/// is asked for, and an out-of-range page simply comes back empty.
pub struct PagedStore<G, R: Record> {
    gateway: G,
    config: PageConfig,
    core: StoreCore<PagedState<R>>,
}

impl<G: LedgerGateway, R: Record> PagedStore<G, R> {
    pub fn new(gateway: G, config: PageConfig) -> Self {
        let state = PagedState {
            lifecycle: RequestLifecycle::new(),
            records: Vec::new(),
            view: PageView::initial(&config),
        };
        Self {
            gateway,
            config,
            core: StoreCore::new("paged", state),
        }
    }

    pub fn snapshot(&self) -> PageSnapshot<R> {
        self.core.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<PageSnapshot<R>> {
        self.core.subscribe()
    }

    /// Replace the visible page with page `page` (1-based).
    pub async fn go_to_page(&self, page: u32) {
        let issued = self.core.issue(|state| {
            state.records.clear();
            state.view.page_number = page;
            Some(self.query(&state.view))
        });
        self.run(issued).await;
    }

    /// Restrict pages to records owned by `public_key` (or lift the filter)
    /// and start again from the first page.
    pub async fn filter_by_owner(&self, public_key: Option<String>) {
        let issued = self.core.issue(|state| {
            state.records.clear();
            state.view = PageView {
                public_key,
                ..PageView::initial(&self.config)
            };
            Some(self.query(&state.view))
        });
        self.run(issued).await;
    }

    /// Re-request the current page.
    pub async fn retry(&self) {
        let page = self.core.read(|state| state.view.page_number);
        self.go_to_page(page).await;
    }

    /// Discard in-flight results and return to an empty first page.
    pub fn teardown(&self) {
        self.core.teardown(|state| {
            state.records.clear();
            state.view = PageView::initial(&self.config);
        });
    }

    fn query(&self, view: &PageView) -> PageQuery {
        PageQuery {
            page: view.page_number,
            page_size: view.page_size,
            direction: self.config.direction,
            public_key: view.public_key.clone(),
        }
    }

    async fn run(&self, issued: Option<(RequestTicket, PageQuery)>) {
        let Some((ticket, query)) = issued else {
            return;
        };

        let page = query.page;
        let query = Query::Page(query);
        let result = match self.gateway.fetch_page(R::KIND, &query).await {
            // An out-of-range page is an empty page, not a failure.
            Err(err) if err.is_not_found() => {
                debug!(page, "page not found, showing it empty");
                Ok((Vec::new(), PageMeta::default()))
            }
            other => other.and_then(page_batch::<R>),
        };

        self.core.settle(ticket, result, |state, (records, meta)| {
            state.records = records;
            state.view.absorb(meta);
        });
    }
}
