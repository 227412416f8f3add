//! Ledger-level summaries, consumed read-only.
//!
//! The integrity verdict is computed by the ledger service; the client only
//! displays it.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// A ledger node as listed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub label: String,
    pub ip: String,
    pub url: String,
    pub p2p_port: u16,
    pub web_service_port: u16,
}

impl Node {
    /// Address of the node's web service.
    pub fn web_service_url(&self) -> String {
        format!("https://{}:{}", self.url, self.web_service_port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub blockchain_name: String,
    /// Creation time of the genesis block, milliseconds since the Unix epoch.
    #[serde(default)]
    pub born_on: Option<i64>,
    pub current_height: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_supply: Option<f64>,
}

/// One of the per-block validations the service runs over the chain.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ValidationCheck {
    Hash,
    PreviousHash,
    Timestamp,
    Index,
}

impl ValidationCheck {
    pub const ALL: [Self; 4] = [Self::Hash, Self::PreviousHash, Self::Timestamp, Self::Index];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hash => "Block Hash",
            Self::PreviousHash => "Previous Hash",
            Self::Timestamp => "Timestamp",
            Self::Index => "Index",
        }
    }
}

/// A single block failing a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub block_number: u64,
    pub error_type: ValidationCheck,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainIntegrity {
    pub is_valid: bool,
    pub block_count: u64,
    pub are_hashes_valid: bool,
    pub are_previous_hashes_valid: bool,
    pub are_timestamps_valid: bool,
    pub are_indexes_valid: bool,
    /// Absent and `null` both mean no failures were reported.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<ValidationError>,
}

impl ChainIntegrity {
    pub fn passed(&self, check: ValidationCheck) -> bool {
        match check {
            ValidationCheck::Hash => self.are_hashes_valid,
            ValidationCheck::PreviousHash => self.are_previous_hashes_valid,
            ValidationCheck::Timestamp => self.are_timestamps_valid,
            ValidationCheck::Index => self.are_indexes_valid,
        }
    }

    /// The checks that failed, in display order.
    pub fn failed_checks(&self) -> Vec<ValidationCheck> {
        ValidationCheck::ALL
            .into_iter()
            .filter(|check| !self.passed(*check))
            .collect()
    }

    /// Reported failures of `check`.
    pub fn errors_for(&self, check: ValidationCheck) -> impl Iterator<Item = &ValidationError> {
        self.errors
            .iter()
            .filter(move |error| error.error_type == check)
    }

    /// Number of distinct blocks with at least one failure.
    pub fn failing_block_count(&self) -> usize {
        self.errors
            .iter()
            .map(|error| error.block_number)
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn passed_block_count(&self) -> u64 {
        self.block_count.saturating_sub(self.failing_block_count() as u64)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
