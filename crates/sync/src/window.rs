//! Windowed range store: the records within a radius of a center index,
//! replaced wholesale on every re-center.

use ledgerscope_gateway::{LedgerGateway, Query, WindowQuery};
use ledgerscope_primitives::{Record, SortDirection};
use tokio::sync::watch;
use tracing::debug;

use crate::batch::window_batch;
use crate::lifecycle::{RequestLifecycle, RequestTicket};
use crate::snapshot::Snapshot;
use crate::store::{StoreCore, StoreState};

/// Default number of records shown on either side of the center.
pub const DEFAULT_WINDOW_RADIUS: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowView {
    /// Last requested center, `None` before the first request.
    pub center: Option<u64>,
    pub radius: u64,
    /// Order of the records in the window.
    pub direction: SortDirection,
}

pub type WindowSnapshot<R> = Snapshot<R, WindowView>;

impl<R: Record> Snapshot<R, WindowView> {
    /// Position of the center record within the window, if it is present.
    pub fn center_position(&self) -> Option<usize> {
        let center = self.meta.center?;
        self.records
            .iter()
            .position(|record| record.index() == Some(center))
    }
}

struct WindowState<R> {
    lifecycle: RequestLifecycle,
    records: Vec<R>,
    view: WindowView,
}

impl<R: Record> StoreState for WindowState<R> {
    type Snapshot = WindowSnapshot<R>;

    fn lifecycle(&mut self) -> &mut RequestLifecycle {
        &mut self.lifecycle
    }

    fn snapshot(&self) -> Self::Snapshot {
        Snapshot {
            records: self.records.clone(),
            meta: self.view,
            status: self.lifecycle.status(),
            error: self.lifecycle.error().cloned(),
        }
    }
}

/// Centered window over records of kind `R`.
pub struct WindowStore<G, R: Record> {
    gateway: G,
    direction: SortDirection,
    core: StoreCore<WindowState<R>>,
}

impl<G: LedgerGateway, R: Record> WindowStore<G, R> {
    pub fn new(gateway: G, direction: SortDirection) -> Self {
        let state = WindowState {
            lifecycle: RequestLifecycle::new(),
            records: Vec::new(),
            view: Self::initial_view(direction),
        };
        Self {
            gateway,
            direction,
            core: StoreCore::new("window", state),
        }
    }

    fn initial_view(direction: SortDirection) -> WindowView {
        WindowView {
            center: None,
            radius: DEFAULT_WINDOW_RADIUS,
            direction,
        }
    }

    pub fn snapshot(&self) -> WindowSnapshot<R> {
        self.core.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<WindowSnapshot<R>> {
        self.core.subscribe()
    }

    /// Replace the window with the records within `radius` of `index`.
    ///
    /// Near either end of the chain the window is simply shorter.
    pub async fn center_on(&self, index: u64, radius: u64) {
        let issued = self.core.issue(|state| {
            state.records.clear();
            state.view.center = Some(index);
            state.view.radius = radius;
            Some(WindowQuery {
                center: index,
                radius,
            })
        });
        self.run(issued).await;
    }

    /// Re-request the last window. No-op before the first `center_on`.
    pub async fn retry(&self) {
        let view = self.core.read(|state| state.view);
        if let Some(center) = view.center {
            self.center_on(center, view.radius).await;
        }
    }

    pub fn teardown(&self) {
        let direction = self.direction;
        self.core.teardown(|state| {
            state.records.clear();
            state.view = Self::initial_view(direction);
        });
    }

    async fn run(&self, issued: Option<(RequestTicket, WindowQuery)>) {
        let Some((ticket, window)) = issued else {
            return;
        };

        let result = match self.gateway.fetch_page(R::KIND, &Query::Window(window)).await {
            Err(err) if err.is_not_found() => {
                debug!(center = window.center, "window not found, showing it empty");
                Ok(Vec::new())
            }
            other => other.and_then(window_batch::<R>),
        };

        let direction = self.direction;
        self.core.settle(ticket, result, |state, records| {
            state.records = shape_window(records, window, direction);
        });
    }
}

/// Clip `records` to the window bounds and order them by `direction`.
///
/// Pending records have no index and never belong to a window.
fn shape_window<R: Record>(
    mut records: Vec<R>,
    window: WindowQuery,
    direction: SortDirection,
) -> Vec<R> {
    records.retain(|record| record.index().is_some_and(|index| window.contains(index)));
    records.sort_by(|a, b| direction.compare(&a.key(), &b.key()));
    records.dedup_by(|a, b| a.key() == b.key());
    records.truncate(usize::try_from(window.span()).unwrap_or(usize::MAX));
    records
}
