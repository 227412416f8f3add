//! Ledger-level summaries: chain info with its integrity verdict, and the
//! node directory.

use ledgerscope_gateway::LedgerGateway;
use ledgerscope_primitives::{ChainInfo, ChainIntegrity, Node};
use tokio::sync::watch;
use tracing::debug;

use crate::resource::ResourceCell;
use crate::snapshot::ResourceSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct ChainSummary {
    pub info: ResourceSnapshot<ChainInfo>,
    pub integrity: ResourceSnapshot<ChainIntegrity>,
}

/// Chain info and integrity, refreshed together.
///
/// Each half settles independently, and a refresh leaves the previous values
/// visible until new ones arrive.
pub struct ChainSummaryStore<G> {
    gateway: G,
    info: ResourceCell<ChainInfo>,
    integrity: ResourceCell<ChainIntegrity>,
}

impl<G: LedgerGateway> ChainSummaryStore<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            info: ResourceCell::new("chain_info"),
            integrity: ResourceCell::new("chain_integrity"),
        }
    }

    pub fn snapshot(&self) -> ChainSummary {
        ChainSummary {
            info: self.info.snapshot(),
            integrity: self.integrity.snapshot(),
        }
    }

    /// Fetch chain info, then the integrity verdict once info has loaded.
    pub async fn refresh(&self) {
        if !self.info.load(true, self.gateway.fetch_chain_info()).await {
            debug!("chain info unavailable, skipping integrity");
            return;
        }
        self.integrity
            .load(true, self.gateway.fetch_chain_integrity())
            .await;
    }

    pub async fn retry(&self) {
        self.refresh().await;
    }

    pub fn teardown(&self) {
        self.info.teardown();
        self.integrity.teardown();
    }
}

/// The ledger's known nodes.
pub struct NodeDirectoryStore<G> {
    gateway: G,
    nodes: ResourceCell<Vec<Node>>,
}

impl<G: LedgerGateway> NodeDirectoryStore<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            nodes: ResourceCell::new("nodes"),
        }
    }

    pub fn snapshot(&self) -> ResourceSnapshot<Vec<Node>> {
        self.nodes.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceSnapshot<Vec<Node>>> {
        self.nodes.subscribe()
    }

    /// Replace the node list.
    pub async fn refresh(&self) {
        self.nodes.load(true, self.gateway.fetch_nodes()).await;
    }

    pub async fn retry(&self) {
        self.refresh().await;
    }

    pub fn teardown(&self) {
        self.nodes.teardown();
    }
}
