//! `reqwest` implementation of [`LedgerGateway`].

use std::time::Duration;

use async_trait::async_trait;
use ledgerscope_primitives::{
    Block, BlockId, ChainInfo, ChainIntegrity, Entry, Node, RecordKind,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::LedgerGateway;
use crate::error::{FetchError, FetchResult, GatewayConfigError};
use crate::query::Query;
use crate::response::{Fetched, decode_collection, decode_json, error_message};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("ledgerscope/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`HttpGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Root of the ledger service API, e.g. `http://localhost:3000/api/`.
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.to_owned(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Stateless HTTP gateway to the ledger service.
///
/// Each call issues exactly one request and never retries.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base: Url,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayConfigError> {
        let invalid = |reason: String| GatewayConfigError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason,
        };

        let base = Url::parse(&config.base_url).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(invalid("expected an http(s) URL".to_owned()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// URL for a path below the base, one path segment per element.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Collection URL for `query` on records of `kind`.
    pub fn collection_url(&self, kind: RecordKind, query: &Query) -> Url {
        let mut url = self.endpoint(&[kind.collection()]);
        url.query_pairs_mut().extend_pairs(query.params());
        url
    }

    async fn get(&self, url: Url) -> FetchResult<Vec<u8>> {
        debug!(%url, "ledger request");

        let response = self.client.get(url.clone()).send().await.map_err(|err| {
            warn!(%url, %err, "ledger service unreachable");
            FetchError::transport(err)
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(FetchError::transport)?
            .to_vec();

        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "ledger request failed");
            return Err(FetchError::ServerStatus {
                code: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> FetchResult<T> {
        let body = self.get(self.endpoint(segments)).await?;
        decode_json(&body)
    }
}

#[async_trait]
impl LedgerGateway for HttpGateway {
    async fn fetch_page(&self, kind: RecordKind, query: &Query) -> FetchResult<Fetched> {
        let body = self.get(self.collection_url(kind, query)).await?;
        decode_collection(kind, query, &body)
    }

    async fn fetch_block(&self, id: &BlockId) -> FetchResult<Block> {
        self.get_json(&["blocks", &id.to_string()]).await
    }

    async fn fetch_entry(&self, entry_id: &str) -> FetchResult<Entry> {
        self.get_json(&["entries", entry_id]).await
    }

    async fn fetch_nodes(&self) -> FetchResult<Vec<Node>> {
        self.get_json(&["nodes"]).await
    }

    async fn fetch_chain_info(&self) -> FetchResult<ChainInfo> {
        self.get_json(&["chain", "info"]).await
    }

    async fn fetch_chain_integrity(&self) -> FetchResult<ChainIntegrity> {
        self.get_json(&["chain", "integrity"]).await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use ledgerscope_primitives::SortDirection;

    use super::*;
    use crate::query::{CursorQuery, WindowQuery};

    fn gateway(base: &str) -> HttpGateway {
        HttpGateway::new(GatewayConfig::new(base)).unwrap()
    }

    #[test]
    fn rejects_non_http_base() {
        assert_matches!(
            HttpGateway::new(GatewayConfig::new("mailto:ops@example.com")),
            Err(GatewayConfigError::InvalidBaseUrl { .. })
        );
        assert_matches!(
            HttpGateway::new(GatewayConfig::new("not a url")),
            Err(GatewayConfigError::InvalidBaseUrl { .. })
        );
    }

    #[test]
    fn endpoint_joins_with_or_without_trailing_slash() {
        for base in ["http://ledger.local/api", "http://ledger.local/api/"] {
            let url = gateway(base).endpoint(&["blocks", "42"]);
            assert_eq!(url.as_str(), "http://ledger.local/api/blocks/42");
        }
    }

    #[test]
    fn endpoint_escapes_identifiers() {
        let url = gateway("http://ledger.local/api").endpoint(&["entries", "a/b c"]);
        assert_eq!(url.as_str(), "http://ledger.local/api/entries/a%2Fb%20c");
    }

    #[test]
    fn collection_urls() {
        let gateway = gateway("http://ledger.local/api/");

        let cursor = Query::Cursor(CursorQuery {
            start_index: Some(90),
            limit: 10,
            direction: SortDirection::Descending,
        });
        assert_eq!(
            gateway.collection_url(RecordKind::Block, &cursor).as_str(),
            "http://ledger.local/api/blocks?sort=desc&startWithIndex=90&limit=10"
        );

        let window = Query::Window(WindowQuery {
            center: 0,
            radius: 15,
        });
        assert_eq!(
            gateway.collection_url(RecordKind::Block, &window).as_str(),
            concat!(
                "http://ledger.local/api/blocks",
                "?scope=range&sort=desc&startIndex=15&recordLimit=16&pageLimit=1"
            )
        );
    }
}
