//! Single-value state cell backing the detail and summary stores.

use std::future::Future;

use ledgerscope_gateway::FetchResult;
use tokio::sync::watch;

use crate::lifecycle::RequestLifecycle;
use crate::snapshot::ResourceSnapshot;
use crate::store::{StoreCore, StoreState};

struct ResourceState<T> {
    lifecycle: RequestLifecycle,
    value: Option<T>,
}

impl<T: Clone + Send + Sync + 'static> StoreState for ResourceState<T> {
    type Snapshot = ResourceSnapshot<T>;

    fn lifecycle(&mut self) -> &mut RequestLifecycle {
        &mut self.lifecycle
    }

    fn snapshot(&self) -> Self::Snapshot {
        ResourceSnapshot {
            value: self.value.clone(),
            status: self.lifecycle.status(),
            error: self.lifecycle.error().cloned(),
        }
    }
}

pub(crate) struct ResourceCell<T: Clone + Send + Sync + 'static> {
    core: StoreCore<ResourceState<T>>,
}

impl<T: Clone + Send + Sync + 'static> ResourceCell<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        let state = ResourceState {
            lifecycle: RequestLifecycle::new(),
            value: None,
        };
        Self {
            core: StoreCore::new(name, state),
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<ResourceSnapshot<T>> {
        self.core.subscribe()
    }

    pub(crate) fn snapshot(&self) -> ResourceSnapshot<T> {
        self.core.snapshot()
    }

    /// Issue `fetch` as the current request and settle with its result.
    ///
    /// With `keep_previous` the last value stays visible while loading and
    /// after a failure; otherwise it is cleared up front. Returns `true` only
    /// when this request was still current and succeeded.
    pub(crate) async fn load(
        &self,
        keep_previous: bool,
        fetch: impl Future<Output = FetchResult<T>>,
    ) -> bool {
        let Some((ticket, ())) = self.core.issue(|state| {
            if !keep_previous {
                state.value = None;
            }
            Some(())
        }) else {
            return false;
        };

        let result = fetch.await;
        let succeeded = result.is_ok();
        self.core
            .settle(ticket, result, |state, value| state.value = Some(value))
            && succeeded
    }

    pub(crate) fn teardown(&self) {
        self.core.teardown(|state| state.value = None);
    }
}
