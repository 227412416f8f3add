//! Record identity: ledger positions, dedup keys and lookup identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire marker for an entry that has not been included in a block yet.
const PENDING_MARKER: &str = "pending";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIndexError {
    #[error("expected a ledger index or \"pending\", got {0:?}")]
    Invalid(String),
}

/// Position of a record in the ledger.
///
/// Blocks are always committed. Entries may be `Pending`, which the service
/// encodes as the string `"pending"` in place of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "WireIndex", into = "WireIndex")]
pub enum LedgerIndex {
    Committed(u64),
    Pending,
}

impl LedgerIndex {
    pub fn committed(&self) -> Option<u64> {
        match self {
            Self::Committed(index) => Some(*index),
            Self::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for LedgerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Committed(index) => write!(f, "{index}"),
            Self::Pending => f.write_str(PENDING_MARKER),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireIndex {
    Number(u64),
    Marker(String),
}

impl TryFrom<WireIndex> for LedgerIndex {
    type Error = ParseIndexError;

    fn try_from(wire: WireIndex) -> Result<Self, Self::Error> {
        match wire {
            WireIndex::Number(index) => Ok(Self::Committed(index)),
            WireIndex::Marker(marker) if marker == PENDING_MARKER => Ok(Self::Pending),
            WireIndex::Marker(other) => Err(ParseIndexError::Invalid(other)),
        }
    }
}

impl From<LedgerIndex> for WireIndex {
    fn from(index: LedgerIndex) -> Self {
        match index {
            LedgerIndex::Committed(index) => Self::Number(index),
            LedgerIndex::Pending => Self::Marker(PENDING_MARKER.to_owned()),
        }
    }
}

/// Deduplication identity of a record.
///
/// Committed records are identified by their index. A pending entry has no
/// index yet and is identified by its entry id; once it resolves to a concrete
/// index it becomes a different key and is not merged with the pending copy.
///
/// Keys order committed records by index, followed by pending ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKey {
    Indexed(u64),
    Pending(String),
}

impl RecordKey {
    pub fn index(&self) -> Option<u64> {
        match self {
            Self::Indexed(index) => Some(*index),
            Self::Pending(_) => None,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed(index) => write!(f, "#{index}"),
            Self::Pending(entry_id) => write!(f, "pending:{entry_id}"),
        }
    }
}

/// Identifier accepted by the single-block lookup: an index or a hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockId {
    Index(u64),
    Hash(String),
}

impl FromStr for BlockId {
    type Err = ParseIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseIndexError::Invalid(s.to_owned()));
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            // All-digit strings too long for u64 cannot be an index; treat them as hashes.
            if let Ok(index) = s.parse() {
                return Ok(Self::Index(index));
            }
        }
        Ok(Self::Hash(s.to_owned()))
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Hash(hash) => f.write_str(hash),
        }
    }
}

impl From<u64> for BlockId {
    fn from(index: u64) -> Self {
        Self::Index(index)
    }
}
