//! Record model for the ledger explorer.
//!
//! Records are immutable values fetched from the ledger service. Within a
//! [`RecordKind`], a record's [`RecordKey`] is its sole identity: two fetches
//! returning the same key collapse to one stored copy.

mod index;
mod record;
mod sort;
mod summary;

pub use index::{BlockId, LedgerIndex, ParseIndexError, RecordKey};
pub use record::{Block, Entry, Record, RecordKind, RecordSet};
pub use sort::SortDirection;
pub use summary::{ChainInfo, ChainIntegrity, Node, ValidationCheck, ValidationError};
