//! End-to-end checks of `HttpGateway` against a one-shot local HTTP responder.

use std::net::SocketAddr;
use std::time::Duration;

use assert_matches::assert_matches;
use ledgerscope_gateway::{
    FetchError, FetchMeta, GatewayConfig, HttpGateway, LedgerGateway, PageQuery, Query,
};
use ledgerscope_primitives::{BlockId, RecordKind, RecordSet, SortDirection};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve exactly one request with the given status line and body, returning
/// the request head that was received.
async fn respond_once(
    status: &'static str,
    body: &'static str,
) -> (SocketAddr, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\n\
             content-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&head).into_owned()
    });

    (addr, handle)
}

fn gateway(addr: SocketAddr) -> HttpGateway {
    HttpGateway::new(
        GatewayConfig::new(format!("http://{addr}/api")).with_timeout(Duration::from_secs(5)),
    )
    .unwrap()
}

#[tokio::test]
async fn missing_block_is_classified_as_not_found() {
    let (addr, server) = respond_once("404 Not Found", r#"{"message":"Block not found"}"#).await;

    let err = gateway(addr)
        .fetch_block(&BlockId::Index(999_999_999))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(
        err,
        FetchError::ServerStatus {
            code: 404,
            message: Some("Block not found".into())
        }
    );

    let head = server.await.unwrap();
    assert!(head.starts_with("GET /api/blocks/999999999 HTTP/1.1"));
}

#[tokio::test]
async fn server_error_is_not_not_found() {
    let (addr, _server) = respond_once("500 Internal Server Error", "boom").await;

    let err = gateway(addr).fetch_nodes().await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn unreachable_service() {
    // Bind and drop to obtain a port nothing listens on.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let err = gateway(addr).fetch_chain_info().await.unwrap_err();
    assert_matches!(err, FetchError::Unreachable(_));
}

#[tokio::test]
async fn page_of_entries() {
    let (addr, server) = respond_once(
        "200 OK",
        r#"{"entries":[{"entryId":"e1","blockIndex":4,"from":"a","to":"b","amount":1}],"meta":{"total":31,"pages":2}}"#,
    )
    .await;

    let query = Query::Page(PageQuery {
        page: 2,
        page_size: 30,
        direction: SortDirection::Descending,
        public_key: None,
    });
    let fetched = gateway(addr)
        .fetch_page(RecordKind::Entry, &query)
        .await
        .unwrap();

    assert_matches!(fetched.records, RecordSet::Entries(ref entries) if entries.len() == 1);
    assert_matches!(fetched.meta, FetchMeta::Page(ref meta) if meta.pages == 2 && meta.total == 31);

    let head = server.await.unwrap();
    assert!(head.starts_with("GET /api/entries?scope=all&sort=desc&page=2&pageLimit=30 HTTP/1.1"));
}

#[tokio::test]
async fn invalid_body_is_malformed() {
    let (addr, _server) = respond_once("200 OK", r#"{"blockchainName": 7}"#).await;

    let err = gateway(addr).fetch_chain_info().await.unwrap_err();
    assert_matches!(err, FetchError::Malformed(_));
}
