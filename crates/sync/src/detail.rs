//! Detail store: one selected block or entry.

use std::fmt;
use std::future::Future;

use ledgerscope_gateway::{FetchResult, LedgerGateway};
use ledgerscope_primitives::{Block, BlockId, Entry, Record};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::resource::ResourceCell;
use crate::snapshot::ResourceSnapshot;

/// A record kind that can be fetched on its own by identifier.
pub trait Lookup: Record {
    /// Identifier accepted by the single-record endpoint.
    type Id: Clone + fmt::Display + Send + Sync + 'static;

    fn lookup<'a, G: LedgerGateway>(
        gateway: &'a G,
        id: &'a Self::Id,
    ) -> impl Future<Output = FetchResult<Self>> + Send + 'a;
}

impl Lookup for Block {
    type Id = BlockId;

    fn lookup<'a, G: LedgerGateway>(
        gateway: &'a G,
        id: &'a Self::Id,
    ) -> impl Future<Output = FetchResult<Self>> + Send + 'a {
        gateway.fetch_block(id)
    }
}

impl Lookup for Entry {
    type Id = String;

    fn lookup<'a, G: LedgerGateway>(
        gateway: &'a G,
        id: &'a Self::Id,
    ) -> impl Future<Output = FetchResult<Self>> + Send + 'a {
        gateway.fetch_entry(id)
    }
}

pub type DetailSnapshot<R> = ResourceSnapshot<R>;

/// Holds the record currently selected for detail display.
///
/// A missing record settles as an error with code 404, so consumers can show
/// "no such record" rather than a generic failure.
pub struct DetailStore<G, R: Lookup> {
    gateway: G,
    selected: Mutex<Option<R::Id>>,
    cell: ResourceCell<R>,
}

impl<G: LedgerGateway, R: Lookup> DetailStore<G, R> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            selected: Mutex::new(None),
            cell: ResourceCell::new("detail"),
        }
    }

    pub fn snapshot(&self) -> DetailSnapshot<R> {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailSnapshot<R>> {
        self.cell.subscribe()
    }

    pub fn selected(&self) -> Option<R::Id> {
        self.selected.lock().clone()
    }

    /// Replace the selection with the record identified by `id`.
    pub async fn select(&self, id: R::Id) {
        debug!(kind = %R::KIND, %id, "selecting record");
        *self.selected.lock() = Some(id.clone());
        self.cell.load(false, R::lookup(&self.gateway, &id)).await;
    }

    pub async fn retry(&self) {
        let selected = self.selected();
        if let Some(id) = selected {
            self.select(id).await;
        }
    }

    pub fn teardown(&self) {
        *self.selected.lock() = None;
        self.cell.teardown();
    }
}
