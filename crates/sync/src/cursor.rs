//! Cursor pagination store: an ordered, deduplicated collection fed by
//! repeated cursor fetches, driving infinite scroll.
//!
//! Continuation always follows the service's `nextIndexReference` rather
//! than recomputing `last + 1`, in both directions, so gaps in the index
//! sequence never cause skipped or repeated fetches.

use std::collections::HashSet;

use ledgerscope_gateway::{CursorMeta, CursorQuery, LedgerGateway, Query};
use ledgerscope_primitives::{Record, RecordKey, SortDirection};
use tokio::sync::watch;
use tracing::trace;

use crate::batch::cursor_batch;
use crate::lifecycle::{RequestLifecycle, RequestTicket};
use crate::snapshot::Snapshot;
use crate::store::{StoreCore, StoreState};

/// Default number of records per cursor fetch.
pub const DEFAULT_CURSOR_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorConfig {
    pub limit: u32,
    /// Direction used on creation and restored on teardown.
    pub direction: SortDirection,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_CURSOR_LIMIT,
            direction: SortDirection::Descending,
        }
    }
}

/// Continuation state of a cursor collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorView {
    pub direction: SortDirection,
    /// Where the next fetch resumes; `None` before the first fetch or once exhausted.
    pub next_cursor: Option<u64>,
    /// Index of the last record the service returned.
    pub last_index: Option<u64>,
    /// More records may exist at higher indices.
    pub has_more_forward: bool,
    /// More records may exist at lower indices.
    pub has_more_backward: bool,
}

impl CursorView {
    /// Whether the scan can continue in its own direction.
    pub fn has_more(&self) -> bool {
        match self.direction {
            SortDirection::Ascending => self.has_more_forward,
            SortDirection::Descending => self.has_more_backward,
        }
    }
}

pub type CursorSnapshot<R> = Snapshot<R, CursorView>;

/// Records in display order plus the set of keys already held.
///
/// Invariants: no two records share a key, and adjacent records are strictly
/// ordered by key according to the collection's direction.
#[derive(Debug, Clone)]
pub struct CursorCollection<R> {
    records: Vec<R>,
    seen: HashSet<RecordKey>,
    direction: SortDirection,
    next_cursor: Option<u64>,
    last_index: Option<u64>,
    started: bool,
}

impl<R: Record> CursorCollection<R> {
    pub fn new(direction: SortDirection) -> Self {
        Self {
            records: Vec::new(),
            seen: HashSet::new(),
            direction,
            next_cursor: None,
            last_index: None,
            started: false,
        }
    }

    /// Drop every record and continuation, switching to `direction`.
    pub fn reset(&mut self, direction: SortDirection) {
        *self = Self::new(direction);
    }

    /// Merge a fetched batch and adopt its continuation. Returns how many
    /// records were new.
    ///
    /// Records whose key is already held are dropped, which makes re-fetching
    /// a page a no-op on the visible records.
    pub fn merge(&mut self, batch: Vec<R>, meta: &CursorMeta) -> usize {
        let direction = self.direction;
        let mut fresh: Vec<(RecordKey, R)> = batch
            .into_iter()
            .filter_map(|record| {
                let key = record.key();
                self.seen.insert(key.clone()).then_some((key, record))
            })
            .collect();
        fresh.sort_by(|(a, _), (b, _)| direction.compare(a, b));

        let added = fresh.len();
        let after_tail = match (self.records.last(), fresh.first()) {
            (Some(tail), Some((first, _))) => direction.compare(&tail.key(), first).is_lt(),
            _ => true,
        };
        let before_head = match (fresh.last(), self.records.first()) {
            (Some((last, _)), Some(head)) => direction.compare(last, &head.key()).is_lt(),
            _ => true,
        };

        if after_tail {
            self.records.extend(fresh.into_iter().map(|(_, record)| record));
        } else if before_head {
            let held = std::mem::take(&mut self.records);
            self.records = fresh
                .into_iter()
                .map(|(_, record)| record)
                .chain(held)
                .collect();
        } else {
            // Overlapping ranges: place each record individually.
            for (key, record) in fresh {
                let at = self
                    .records
                    .partition_point(|held| direction.compare(&held.key(), &key).is_lt());
                self.records.insert(at, record);
            }
        }

        self.next_cursor = meta.next_index;
        self.last_index = meta.last_index;
        self.started = true;
        added
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn next_cursor(&self) -> Option<u64> {
        self.next_cursor
    }

    /// Whether another fetch in the current direction can yield records.
    pub fn has_more(&self) -> bool {
        !self.started || self.next_cursor.is_some()
    }

    // The side opposite the scan direction is never known to be exhausted:
    // the service may append at the head at any time.
    pub fn has_more_forward(&self) -> bool {
        match self.direction {
            SortDirection::Ascending => self.has_more(),
            SortDirection::Descending => true,
        }
    }

    pub fn has_more_backward(&self) -> bool {
        match self.direction {
            SortDirection::Ascending => true,
            SortDirection::Descending => self.has_more(),
        }
    }

    pub fn view(&self) -> CursorView {
        CursorView {
            direction: self.direction,
            next_cursor: self.next_cursor,
            last_index: self.last_index,
            has_more_forward: self.has_more_forward(),
            has_more_backward: self.has_more_backward(),
        }
    }

    fn query(&self, start_index: Option<u64>, limit: u32) -> CursorQuery {
        CursorQuery {
            start_index,
            limit,
            direction: self.direction,
        }
    }
}

struct CursorState<R> {
    lifecycle: RequestLifecycle,
    collection: CursorCollection<R>,
}

impl<R: Record> StoreState for CursorState<R> {
    type Snapshot = CursorSnapshot<R>;

    fn lifecycle(&mut self) -> &mut RequestLifecycle {
        &mut self.lifecycle
    }

    fn snapshot(&self) -> Self::Snapshot {
        Snapshot {
            records: self.collection.records().to_vec(),
            meta: self.collection.view(),
            status: self.lifecycle.status(),
            error: self.lifecycle.error().cloned(),
        }
    }
}

/// Infinite-scroll store over records of kind `R`.
pub struct CursorStore<G, R: Record> {
    gateway: G,
    config: CursorConfig,
    core: StoreCore<CursorState<R>>,
}

impl<G: LedgerGateway, R: Record> CursorStore<G, R> {
    pub fn new(gateway: G, config: CursorConfig) -> Self {
        let state = CursorState {
            lifecycle: RequestLifecycle::new(),
            collection: CursorCollection::new(config.direction),
        };
        Self {
            gateway,
            config,
            core: StoreCore::new("cursor", state),
        }
    }

    pub fn snapshot(&self) -> CursorSnapshot<R> {
        self.core.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<CursorSnapshot<R>> {
        self.core.subscribe()
    }

    pub fn direction(&self) -> SortDirection {
        self.core.read(|state| state.collection.direction())
    }

    /// Fetch the head of the collection in `direction`, unless records are
    /// already held or a fetch is in flight.
    pub async fn initialize(&self, direction: SortDirection) {
        let issued = self.core.issue(|state| {
            if !state.collection.is_empty() || state.lifecycle.is_loading() {
                return None;
            }
            if state.collection.direction() != direction {
                state.collection.reset(direction);
            }
            Some(state.collection.query(None, self.config.limit))
        });
        self.run(issued).await;
    }

    /// Fetch the next batch in the current direction.
    ///
    /// No-op while a fetch is in flight or once the service reports no
    /// continuation. Before the first fetch this behaves like
    /// [`initialize`](Self::initialize) in the current direction.
    pub async fn load_more(&self) {
        let issued = self.core.issue(|state| {
            if state.lifecycle.is_loading() || !state.collection.has_more() {
                return None;
            }
            let start = state.collection.next_cursor();
            Some(state.collection.query(start, self.config.limit))
        });
        self.run(issued).await;
    }

    /// Drop the collection and start over in `direction`.
    ///
    /// Cursor semantics differ per direction, so this is a full reset rather
    /// than a re-sort; any fetch still in flight is superseded.
    pub async fn switch_direction(&self, direction: SortDirection) {
        let issued = self.core.issue(|state| {
            state.collection.reset(direction);
            Some(state.collection.query(None, self.config.limit))
        });
        self.run(issued).await;
    }

    /// Re-issue the last intent after a failure.
    pub async fn retry(&self) {
        self.load_more().await;
    }

    /// Discard in-flight results and return to the empty, idle state.
    pub fn teardown(&self) {
        let direction = self.config.direction;
        self.core.teardown(|state| state.collection.reset(direction));
    }

    async fn run(&self, issued: Option<(RequestTicket, CursorQuery)>) {
        let Some((ticket, query)) = issued else {
            trace!("cursor fetch not issued");
            return;
        };

        let query = Query::Cursor(query);
        let result = self
            .gateway
            .fetch_page(R::KIND, &query)
            .await
            .and_then(cursor_batch::<R>);

        self.core.settle(ticket, result, |state, (records, meta)| {
            let added = state.collection.merge(records, &meta);
            trace!(added, next = ?meta.next_index, "merged cursor batch");
        });
    }
}
