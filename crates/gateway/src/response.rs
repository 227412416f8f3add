//! Response schemas and validation.
//!
//! Bodies are decoded into explicit wire structs; anything that does not fit
//! is reported as [`FetchError::Malformed`] rather than passed on partially.

use ledgerscope_primitives::{Block, Entry, RecordKind, RecordSet, SortDirection};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{FetchError, FetchResult};
use crate::query::Query;

/// Continuation metadata of a cursor response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMeta {
    /// Index of the last record in the response, if any.
    pub last_index: Option<u64>,
    /// Where the next fetch in the same direction should start; `None` once exhausted.
    pub next_index: Option<u64>,
    pub direction: SortDirection,
}

/// Pagination metadata of a page response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMeta {
    pub total: u64,
    pub pages: u32,
    /// Owner filter the service applied (entries only).
    pub queried_public_key: Option<String>,
    /// Net amount for the queried owner (entries only).
    pub net_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchMeta {
    Cursor(CursorMeta),
    Page(PageMeta),
    /// Window responses carry no continuation.
    Window,
}

/// A successful collection fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub records: RecordSet,
    pub meta: FetchMeta,
}

#[derive(Deserialize)]
struct Envelope<M> {
    blocks: Option<Vec<Block>>,
    entries: Option<Vec<Entry>>,
    meta: Option<M>,
}

impl<M> Envelope<M> {
    fn take_records(&mut self, kind: RecordKind) -> FetchResult<RecordSet> {
        let records = match kind {
            RecordKind::Block => self.blocks.take().map(RecordSet::Blocks),
            RecordKind::Entry => self.entries.take().map(RecordSet::Entries),
        };
        records.ok_or_else(|| {
            FetchError::Malformed(format!("response has no `{}` array", kind.collection()))
        })
    }

    fn take_meta(&mut self) -> FetchResult<M> {
        self.meta
            .take()
            .ok_or_else(|| FetchError::Malformed("response has no `meta` object".to_owned()))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCursorMeta {
    last_index_in_response: Option<u64>,
    next_index_reference: Option<u64>,
    sort: SortDirection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePageMeta {
    total: u64,
    pages: u32,
    #[serde(default)]
    queried_public_key: Option<String>,
    #[serde(default)]
    net_amount: Option<f64>,
}

/// Decode a JSON body into `T`.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> FetchResult<T> {
    serde_json::from_slice(body).map_err(FetchError::malformed)
}

/// Decode and validate a collection response for `query`.
pub fn decode_collection(kind: RecordKind, query: &Query, body: &[u8]) -> FetchResult<Fetched> {
    match query {
        Query::Cursor(cursor) => {
            let mut envelope: Envelope<WireCursorMeta> = decode_json(body)?;
            let meta = envelope.take_meta()?;
            if meta.sort != cursor.direction {
                return Err(FetchError::Malformed(format!(
                    "requested {} order, response is {}",
                    cursor.direction, meta.sort
                )));
            }
            Ok(Fetched {
                records: envelope.take_records(kind)?,
                meta: FetchMeta::Cursor(CursorMeta {
                    last_index: meta.last_index_in_response,
                    next_index: meta.next_index_reference,
                    direction: meta.sort,
                }),
            })
        }
        Query::Page(_) => {
            let mut envelope: Envelope<WirePageMeta> = decode_json(body)?;
            let meta = envelope.take_meta()?;
            Ok(Fetched {
                records: envelope.take_records(kind)?,
                meta: FetchMeta::Page(PageMeta {
                    total: meta.total,
                    pages: meta.pages,
                    queried_public_key: meta.queried_public_key,
                    net_amount: meta.net_amount,
                }),
            })
        }
        Query::Window(_) => {
            let mut envelope: Envelope<serde::de::IgnoredAny> = decode_json(body)?;
            Ok(Fetched {
                records: envelope.take_records(kind)?,
                meta: FetchMeta::Window,
            })
        }
    }
}

/// Extract the service's `message` field from an error body, if it has one.
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|body| body.message)
        .filter(|message| !message.is_empty())
}
