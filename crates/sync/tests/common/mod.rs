//! A gateway whose responses are supplied by the test, one request at a time.
#![allow(dead_code, unreachable_pub)]

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use ledgerscope_gateway::{
    CursorMeta, FetchError, FetchMeta, FetchResult, Fetched, LedgerGateway, PageMeta, Query,
};
use ledgerscope_primitives::{
    Block, BlockId, ChainInfo, ChainIntegrity, Entry, LedgerIndex, Node, RecordKind, RecordSet,
    SortDirection,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Page(RecordKind, Query),
    Block(BlockId),
    Entry(String),
    Nodes,
    ChainInfo,
    ChainIntegrity,
}

#[derive(Debug, Clone)]
pub enum Response {
    Page(Fetched),
    Block(Block),
    Entry(Entry),
    Nodes(Vec<Node>),
    ChainInfo(ChainInfo),
    ChainIntegrity(ChainIntegrity),
}

/// A request waiting for the test to answer it. Dropping it unanswered makes
/// the call fail as unreachable.
#[derive(Debug)]
pub struct Pending {
    pub request: Request,
    reply: oneshot::Sender<FetchResult<Response>>,
}

impl Pending {
    pub fn respond(self, response: Response) {
        let _ = self.reply.send(Ok(response));
    }

    pub fn fail(self, err: FetchError) {
        let _ = self.reply.send(Err(err));
    }

    pub fn query(&self) -> &Query {
        match &self.request {
            Request::Page(_, query) => query,
            other => panic!("expected a page request, got {other:?}"),
        }
    }
}

pub struct ScriptedGateway {
    requests: mpsc::UnboundedSender<Pending>,
}

pub fn scripted() -> (ScriptedGateway, mpsc::UnboundedReceiver<Pending>) {
    let (requests, rx) = mpsc::unbounded_channel();
    (ScriptedGateway { requests }, rx)
}

impl ScriptedGateway {
    async fn call(&self, request: Request) -> FetchResult<Response> {
        let (reply, rx) = oneshot::channel();
        self.requests
            .send(Pending { request, reply })
            .map_err(|_| FetchError::Unreachable("script closed".into()))?;
        rx.await
            .unwrap_or_else(|_| Err(FetchError::Unreachable("request dropped".into())))
    }
}

fn mismatch(response: Response) -> FetchError {
    FetchError::Malformed(format!("scripted response of the wrong shape: {response:?}"))
}

#[async_trait]
impl LedgerGateway for ScriptedGateway {
    async fn fetch_page(&self, kind: RecordKind, query: &Query) -> FetchResult<Fetched> {
        match self.call(Request::Page(kind, query.clone())).await? {
            Response::Page(fetched) => Ok(fetched),
            other => Err(mismatch(other)),
        }
    }

    async fn fetch_block(&self, id: &BlockId) -> FetchResult<Block> {
        match self.call(Request::Block(id.clone())).await? {
            Response::Block(block) => Ok(block),
            other => Err(mismatch(other)),
        }
    }

    async fn fetch_entry(&self, entry_id: &str) -> FetchResult<Entry> {
        match self.call(Request::Entry(entry_id.to_owned())).await? {
            Response::Entry(entry) => Ok(entry),
            other => Err(mismatch(other)),
        }
    }

    async fn fetch_nodes(&self) -> FetchResult<Vec<Node>> {
        match self.call(Request::Nodes).await? {
            Response::Nodes(nodes) => Ok(nodes),
            other => Err(mismatch(other)),
        }
    }

    async fn fetch_chain_info(&self) -> FetchResult<ChainInfo> {
        match self.call(Request::ChainInfo).await? {
            Response::ChainInfo(info) => Ok(info),
            other => Err(mismatch(other)),
        }
    }

    async fn fetch_chain_integrity(&self) -> FetchResult<ChainIntegrity> {
        match self.call(Request::ChainIntegrity).await? {
            Response::ChainIntegrity(integrity) => Ok(integrity),
            other => Err(mismatch(other)),
        }
    }
}

pub fn block(index: u64) -> Block {
    Block {
        index,
        hash: format!("hash-{index}"),
        previous_hash: format!("hash-{}", index.saturating_sub(1)),
        timestamp: 1_700_000_000_000 + index as i64,
        block_creator: None,
        data: serde_json::Value::Null,
    }
}

pub fn entry(entry_id: &str, index: Option<u64>) -> Entry {
    Entry {
        entry_id: entry_id.to_owned(),
        index: index.map_or(LedgerIndex::Pending, LedgerIndex::Committed),
        from: "alice".into(),
        to: "bob".into(),
        amount: 1.5,
        data: None,
        timestamp: None,
    }
}

pub fn indices(blocks: &[Block]) -> Vec<u64> {
    blocks.iter().map(|b| b.index).collect()
}

pub fn cursor_page(
    indices: impl IntoIterator<Item = u64>,
    next_index: Option<u64>,
    direction: SortDirection,
) -> Response {
    let blocks: Vec<_> = indices.into_iter().map(block).collect();
    Response::Page(Fetched {
        meta: FetchMeta::Cursor(CursorMeta {
            last_index: blocks.last().map(|b| b.index),
            next_index,
            direction,
        }),
        records: RecordSet::Blocks(blocks),
    })
}

pub fn entry_page(entries: Vec<Entry>, total: u64, pages: u32) -> Response {
    Response::Page(Fetched {
        records: RecordSet::Entries(entries),
        meta: FetchMeta::Page(PageMeta {
            total,
            pages,
            ..Default::default()
        }),
    })
}

pub fn window(indices: impl IntoIterator<Item = u64>) -> Response {
    Response::Page(Fetched {
        records: RecordSet::Blocks(indices.into_iter().map(block).collect()),
        meta: FetchMeta::Window,
    })
}

pub fn chain_info(height: u64) -> ChainInfo {
    ChainInfo {
        blockchain_name: "testnet".into(),
        born_on: Some(1_700_000_000_000),
        current_height: height,
        hash_rate: None,
        difficulty: None,
        total_supply: None,
    }
}

pub fn integrity(block_count: u64) -> ChainIntegrity {
    ChainIntegrity {
        is_valid: true,
        block_count,
        are_hashes_valid: true,
        are_previous_hashes_valid: true,
        are_timestamps_valid: true,
        are_indexes_valid: true,
        errors: Vec::new(),
    }
}

/// Run a store intent on its own task so the test can answer its requests.
pub fn spawn_intent<S, F, Fut>(store: &Arc<S>, intent: F) -> JoinHandle<()>
where
    S: Send + Sync + 'static,
    F: FnOnce(Arc<S>) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(intent(Arc::clone(store)))
}
