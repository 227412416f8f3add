//! Blocks, entries and the [`Record`] abstraction the stores are generic over.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::index::{LedgerIndex, RecordKey};

/// The kinds of ordered, indexed records the ledger service serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum RecordKind {
    Block,
    Entry,
}

impl RecordKind {
    /// Collection path segment on the ledger service.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Block => "blocks",
            Self::Entry => "entries",
        }
    }
}

/// A decoded batch of records of a single kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordSet {
    Blocks(Vec<Block>),
    Entries(Vec<Entry>),
}

impl RecordSet {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Blocks(_) => RecordKind::Block,
            Self::Entries(_) => RecordKind::Entry,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Blocks(blocks) => blocks.len(),
            Self::Entries(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An immutable ledger record.
///
/// Implementors define identity through [`Record::key`]; equality of keys is
/// the only thing the stores use for deduplication.
pub trait Record: Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: RecordKind;

    fn key(&self) -> RecordKey;

    /// Extract records of this kind from a decoded set, or `None` if the set
    /// holds a different kind.
    fn from_set(set: RecordSet) -> Option<Vec<Self>>;

    fn index(&self) -> Option<u64> {
        self.key().index()
    }
}

/// A committed ledger block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub index: u64,
    pub hash: String,
    pub previous_hash: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_creator: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Record for Block {
    const KIND: RecordKind = RecordKind::Block;

    fn key(&self) -> RecordKey {
        RecordKey::Indexed(self.index)
    }

    fn from_set(set: RecordSet) -> Option<Vec<Self>> {
        match set {
            RecordSet::Blocks(blocks) => Some(blocks),
            RecordSet::Entries(_) => None,
        }
    }
}

/// A ledger entry (transaction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub entry_id: String,
    #[serde(alias = "blockIndex")]
    pub index: LedgerIndex,
    pub from: String,
    pub to: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Record for Entry {
    const KIND: RecordKind = RecordKind::Entry;

    fn key(&self) -> RecordKey {
        match self.index.committed() {
            Some(index) => RecordKey::Indexed(index),
            None => RecordKey::Pending(self.entry_id.clone()),
        }
    }

    fn from_set(set: RecordSet) -> Option<Vec<Self>> {
        match set {
            RecordSet::Entries(entries) => Some(entries),
            RecordSet::Blocks(_) => None,
        }
    }
}
