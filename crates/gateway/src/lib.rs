//! Fetch gateway for the ledger service.
//!
//! A pure translation layer: a record query goes in, exactly one HTTP request
//! goes out, and the outcome comes back as a [`FetchResult`]. The gateway
//! keeps no state between calls and never retries.
//!
//! - [`LedgerGateway`] - the boundary the synchronization stores depend on
//! - [`HttpGateway`] - `reqwest` implementation against the service's HTTP API
//! - [`Query`] - cursor, page and window queries

mod error;
mod http;
mod query;
mod response;

pub use error::{FetchError, FetchResult, GatewayConfigError, NOT_FOUND};
pub use http::{DEFAULT_TIMEOUT, GatewayConfig, HttpGateway, USER_AGENT};
pub use query::{CursorQuery, PageQuery, Query, WindowQuery};
pub use response::{
    CursorMeta, FetchMeta, Fetched, PageMeta, decode_collection, decode_json,
};

use async_trait::async_trait;
use ledgerscope_primitives::{Block, BlockId, ChainInfo, ChainIntegrity, Entry, Node, RecordKind};

/// Access to the ledger service.
///
/// Implementations must issue at most one request per call and return every
/// failure as a [`FetchError`].
#[async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait LedgerGateway: Send + Sync {
    /// Fetch a batch of records of `kind` for a cursor, page or window query.
    async fn fetch_page(&self, kind: RecordKind, query: &Query) -> FetchResult<Fetched>;

    /// Fetch a single block by index or hash.
    async fn fetch_block(&self, id: &BlockId) -> FetchResult<Block>;

    /// Fetch a single entry by its entry id.
    async fn fetch_entry(&self, entry_id: &str) -> FetchResult<Entry>;

    async fn fetch_nodes(&self) -> FetchResult<Vec<Node>>;

    async fn fetch_chain_info(&self) -> FetchResult<ChainInfo>;

    async fn fetch_chain_integrity(&self) -> FetchResult<ChainIntegrity>;
}
