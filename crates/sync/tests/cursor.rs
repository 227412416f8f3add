mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use common::{cursor_page, indices, scripted, spawn_intent};
use ledgerscope_gateway::{CursorQuery, FetchError, Query};
use ledgerscope_primitives::{Block, RecordKind, SortDirection};
use ledgerscope_sync::{CursorConfig, CursorStore, Status};

const DESC: SortDirection = SortDirection::Descending;
const ASC: SortDirection = SortDirection::Ascending;

fn cursor(start_index: Option<u64>, direction: SortDirection) -> Query {
    Query::Cursor(CursorQuery {
        start_index,
        limit: 10,
        direction,
    })
}

#[tokio::test]
async fn load_more_follows_the_server_cursor() {
    let (gateway, mut requests) = scripted();
    let store = Arc::new(CursorStore::<_, Block>::new(gateway, CursorConfig::default()));

    let task = spawn_intent(&store, |s| async move { s.initialize(DESC).await });
    let first = requests.recv().await.unwrap();
    assert_matches!(&first.request, common::Request::Page(RecordKind::Block, _));
    assert_eq!(first.query(), &cursor(None, DESC));
    first.respond(cursor_page((91..=100).rev(), Some(90), DESC));
    task.await.unwrap();

    // The next page starts where the service says, even across a gap.
    let task = spawn_intent(&store, |s| async move { s.load_more().await });
    let second = requests.recv().await.unwrap();
    assert_eq!(second.query(), &cursor(Some(90), DESC));
    second.respond(cursor_page([90, 88, 87], Some(86), DESC));
    task.await.unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.status, Status::Success);
    assert_eq!(snapshot.len(), 13);
    assert_eq!(snapshot.records.first().map(|b| b.index), Some(100));
    assert_eq!(snapshot.records.last().map(|b| b.index), Some(87));
    assert_eq!(snapshot.meta.next_cursor, Some(86));
    assert!(snapshot.meta.has_more_backward);
}

#[tokio::test]
async fn refetching_a_seen_page_does_not_duplicate() {
    let (gateway, mut requests) = scripted();
    let store = Arc::new(CursorStore::<_, Block>::new(gateway, CursorConfig::default()));

    let task = spawn_intent(&store, |s| async move { s.initialize(ASC).await });
    requests
        .recv()
        .await
        .unwrap()
        .respond(cursor_page(0..10, Some(10), ASC));
    task.await.unwrap();
    let before = store.snapshot().len();

    let task = spawn_intent(&store, |s| async move { s.load_more().await });
    requests
        .recv()
        .await
        .unwrap()
        .respond(cursor_page(0..10, Some(10), ASC));
    task.await.unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), before);
    assert_eq!(indices(&snapshot.records), (0..10).collect::<Vec<_>>());
}

#[tokio::test]
async fn load_more_is_ignored_while_loading_or_exhausted() {
    let (gateway, mut requests) = scripted();
    let store = Arc::new(CursorStore::<_, Block>::new(gateway, CursorConfig::default()));

    let task = spawn_intent(&store, |s| async move { s.initialize(DESC).await });
    let pending = requests.recv().await.unwrap();
    assert!(store.snapshot().is_loading());

    store.load_more().await;
    assert!(requests.try_recv().is_err());

    pending.respond(cursor_page((0..=4).rev(), None, DESC));
    task.await.unwrap();

    let snapshot = store.snapshot();
    assert!(!snapshot.meta.has_more_backward);
    assert!(snapshot.meta.has_more_forward);

    store.load_more().await;
    assert!(requests.try_recv().is_err());
    assert_eq!(store.snapshot().len(), 5);
}

#[tokio::test]
async fn switching_direction_discards_the_superseded_response() {
    let (gateway, mut requests) = scripted();
    let store = Arc::new(CursorStore::<_, Block>::new(gateway, CursorConfig::default()));

    let first = spawn_intent(&store, |s| async move { s.initialize(DESC).await });
    let descending = requests.recv().await.unwrap();

    let second = spawn_intent(&store, |s| async move { s.switch_direction(ASC).await });
    let ascending = requests.recv().await.unwrap();
    assert_eq!(ascending.query(), &cursor(None, ASC));

    ascending.respond(cursor_page(0..10, Some(10), ASC));
    second.await.unwrap();
    descending.respond(cursor_page((91..=100).rev(), Some(90), DESC));
    first.await.unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.meta.direction, ASC);
    assert_eq!(indices(&snapshot.records), (0..10).collect::<Vec<_>>());
    assert_eq!(snapshot.status, Status::Success);
}

#[tokio::test]
async fn failure_keeps_the_collection_and_retry_resumes() {
    let (gateway, mut requests) = scripted();
    let store = Arc::new(CursorStore::<_, Block>::new(gateway, CursorConfig::default()));

    let task = spawn_intent(&store, |s| async move { s.initialize(DESC).await });
    requests
        .recv()
        .await
        .unwrap()
        .respond(cursor_page((11..=20).rev(), Some(10), DESC));
    task.await.unwrap();

    let task = spawn_intent(&store, |s| async move { s.load_more().await });
    requests.recv().await.unwrap().fail(FetchError::status(500));
    task.await.unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.status, Status::Error);
    assert_eq!(snapshot.error.as_ref().and_then(|e| e.code), Some(500));
    assert_eq!(snapshot.len(), 10);

    let task = spawn_intent(&store, |s| async move { s.retry().await });
    let again = requests.recv().await.unwrap();
    assert_eq!(again.query(), &cursor(Some(10), DESC));
    again.respond(cursor_page((1..=10).rev(), Some(0), DESC));
    task.await.unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 20);
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn teardown_ignores_a_late_response() {
    let (gateway, mut requests) = scripted();
    let store = Arc::new(CursorStore::<_, Block>::new(gateway, CursorConfig::default()));
    let mut updates = store.subscribe();

    let task = spawn_intent(&store, |s| async move { s.initialize(ASC).await });
    let pending = requests.recv().await.unwrap();

    store.teardown();
    pending.respond(cursor_page(0..10, Some(10), ASC));
    task.await.unwrap();

    assert!(updates.has_changed().unwrap());
    let snapshot = updates.borrow_and_update().clone();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.status, Status::Idle);
    // Teardown restores the configured direction.
    assert_eq!(snapshot.meta.direction, DESC);
    assert_eq!(store.direction(), DESC);
}
