//! Unpacking gateway results into typed batches.

use ledgerscope_gateway::{CursorMeta, FetchError, FetchMeta, FetchResult, Fetched, PageMeta};
use ledgerscope_primitives::{Record, RecordSet};

fn records<R: Record>(set: RecordSet) -> FetchResult<Vec<R>> {
    let kind = set.kind();
    R::from_set(set).ok_or_else(|| {
        FetchError::Malformed(format!("expected {} records, got {kind} records", R::KIND))
    })
}

fn unexpected_meta(expected: &str, meta: &FetchMeta) -> FetchError {
    FetchError::Malformed(format!("expected {expected} metadata, got {meta:?}"))
}

pub(crate) fn cursor_batch<R: Record>(fetched: Fetched) -> FetchResult<(Vec<R>, CursorMeta)> {
    match fetched.meta {
        FetchMeta::Cursor(meta) => Ok((records(fetched.records)?, meta)),
        other => Err(unexpected_meta("cursor", &other)),
    }
}

pub(crate) fn page_batch<R: Record>(fetched: Fetched) -> FetchResult<(Vec<R>, PageMeta)> {
    match fetched.meta {
        FetchMeta::Page(meta) => Ok((records(fetched.records)?, meta)),
        other => Err(unexpected_meta("page", &other)),
    }
}

pub(crate) fn window_batch<R: Record>(fetched: Fetched) -> FetchResult<Vec<R>> {
    // A window needs no continuation, so any metadata is acceptable.
    records(fetched.records)
}
