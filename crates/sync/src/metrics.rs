//! Store metrics.

use metrics::Counter;

/// Per-store request counters, labelled with the store name.
#[derive(Clone, Debug)]
pub(crate) struct SyncMetrics {
    /// Requests issued.
    requests_total: Counter,
    /// Responses discarded because a later request superseded them.
    stale_responses_total: Counter,
    /// Requests that settled with an error.
    failed_requests_total: Counter,
}

impl SyncMetrics {
    pub(crate) fn new(store: &'static str) -> Self {
        Self {
            requests_total: metrics::counter!("ledgerscope.sync.requests_total", "store" => store),
            stale_responses_total: metrics::counter!(
                "ledgerscope.sync.stale_responses_total",
                "store" => store
            ),
            failed_requests_total: metrics::counter!(
                "ledgerscope.sync.failed_requests_total",
                "store" => store
            ),
        }
    }

    pub(crate) fn inc_requests(&self) {
        self.requests_total.increment(1);
    }

    pub(crate) fn inc_stale(&self) {
        self.stale_responses_total.increment(1);
    }

    pub(crate) fn inc_failed(&self) {
        self.failed_requests_total.increment(1);
    }
}
