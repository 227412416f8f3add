//! State container shared by the stores.
//!
//! A [`StoreCore`] owns one store instance's state behind a mutex and
//! publishes a fresh snapshot on a `watch` channel after every change. The
//! lock is never held across an await: a store issues a request under the
//! lock, awaits the gateway without it, then settles under the lock again.

use ledgerscope_gateway::FetchResult;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::lifecycle::{RequestLifecycle, RequestTicket};
use crate::metrics::SyncMetrics;

/// Store state with an embedded request lifecycle.
pub(crate) trait StoreState: Send + 'static {
    type Snapshot: Clone + Send + Sync + 'static;

    fn lifecycle(&mut self) -> &mut RequestLifecycle;

    fn snapshot(&self) -> Self::Snapshot;
}

pub(crate) struct StoreCore<S: StoreState> {
    name: &'static str,
    state: Mutex<S>,
    snapshots: watch::Sender<S::Snapshot>,
    metrics: SyncMetrics,
}

impl<S: StoreState> StoreCore<S> {
    pub(crate) fn new(name: &'static str, state: S) -> Self {
        let (snapshots, _) = watch::channel(state.snapshot());
        Self {
            name,
            state: Mutex::new(state),
            snapshots,
            metrics: SyncMetrics::new(name),
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S::Snapshot> {
        self.snapshots.subscribe()
    }

    pub(crate) fn snapshot(&self) -> S::Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Read the current state without publishing.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        f(&*self.state.lock())
    }

    /// Issue a request if `prepare` produces one.
    ///
    /// `prepare` runs under the lock and may update the state for the new
    /// request (e.g. clear the previous page). Any request still in flight is
    /// superseded by the returned ticket.
    pub(crate) fn issue<Q>(
        &self,
        prepare: impl FnOnce(&mut S) -> Option<Q>,
    ) -> Option<(RequestTicket, Q)> {
        let mut state = self.state.lock();
        let query = prepare(&mut *state)?;
        let ticket = state.lifecycle().begin();
        self.metrics.inc_requests();
        debug!(store = self.name, seq = ticket.sequence(), "issuing request");
        self.publish(&*state);
        Some((ticket, query))
    }

    /// Settle the request behind `ticket`.
    ///
    /// Stale tickets are discarded without touching the state. On success
    /// `apply` merges the value; on failure the state is left as it is and
    /// only the lifecycle records the error. Returns whether the result was
    /// applied.
    pub(crate) fn settle<T>(
        &self,
        ticket: RequestTicket,
        result: FetchResult<T>,
        apply: impl FnOnce(&mut S, T),
    ) -> bool {
        let mut state = self.state.lock();
        if !state.lifecycle().is_current(ticket) {
            self.metrics.inc_stale();
            trace!(store = self.name, seq = ticket.sequence(), "discarding stale response");
            return false;
        }

        match result {
            Ok(value) => {
                apply(&mut *state, value);
                state.lifecycle().succeed(ticket);
            }
            Err(err) => {
                warn!(store = self.name, seq = ticket.sequence(), %err, "fetch failed");
                self.metrics.inc_failed();
                state.lifecycle().fail(ticket, &err);
            }
        }

        self.publish(&*state);
        true
    }

    fn publish(&self, state: &S) {
        let snapshot = state.snapshot();
        self.snapshots.send_modify(|current| *current = snapshot);
    }

    /// Invalidate in-flight requests, reset the state and publish.
    pub(crate) fn teardown(&self, reset: impl FnOnce(&mut S)) {
        let mut state = self.state.lock();
        state.lifecycle().teardown();
        reset(&mut *state);
        debug!(store = self.name, "store torn down");
        self.publish(&*state);
    }
}
