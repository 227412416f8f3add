//! Client-side record synchronization.
//!
//! Stores turn consumer intents into gateway queries and keep a local view of
//! the ledger consistent while requests race each other:
//!
//! - [`CursorStore`] - ordered, deduplicated collection for infinite scroll
//! - [`PagedStore`] - exactly one numbered page
//! - [`WindowStore`] - records within a radius of a center index
//! - [`DetailStore`] - one selected block or entry
//! - [`ChainSummaryStore`] and [`NodeDirectoryStore`] - ledger-level summaries
//!
//! Every store settles requests through a [`RequestLifecycle`]: only the most
//! recently issued request may update the store, and teardown discards
//! whatever is still in flight. Consumers read state from snapshots, either
//! on demand or by subscribing to a `watch` channel.

mod batch;
mod cursor;
mod detail;
mod lifecycle;
mod metrics;
mod paged;
mod resource;
mod snapshot;
mod store;
mod summary;
mod window;

pub use cursor::{
    CursorCollection, CursorConfig, CursorSnapshot, CursorStore, CursorView, DEFAULT_CURSOR_LIMIT,
};
pub use detail::{DetailSnapshot, DetailStore, Lookup};
pub use lifecycle::{ErrorDescriptor, RequestLifecycle, RequestTicket, Status};
pub use paged::{DEFAULT_PAGE_SIZE, PageConfig, PageSnapshot, PageView, PagedStore};
pub use snapshot::{ResourceSnapshot, Snapshot};
pub use summary::{ChainSummary, ChainSummaryStore, NodeDirectoryStore};
pub use window::{DEFAULT_WINDOW_RADIUS, WindowSnapshot, WindowStore, WindowView};
