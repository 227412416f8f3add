//! Read-only views handed to consumers.

use crate::lifecycle::{ErrorDescriptor, Status};

/// Point-in-time view of a collection store.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<R, M> {
    pub records: Vec<R>,
    pub meta: M,
    pub status: Status,
    pub error: Option<ErrorDescriptor>,
}

impl<R, M> Snapshot<R, M> {
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Point-in-time view of a single-value store.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSnapshot<T> {
    pub value: Option<T>,
    pub status: Status,
    pub error: Option<ErrorDescriptor>,
}

impl<T> ResourceSnapshot<T> {
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }
}

impl<T> Default for ResourceSnapshot<T> {
    fn default() -> Self {
        Self {
            value: None,
            status: Status::Idle,
            error: None,
        }
    }
}
