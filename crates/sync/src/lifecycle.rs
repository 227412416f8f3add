//! Request lifecycle shared by every store.
//!
//! Each store instance owns one [`RequestLifecycle`]. Issuing a request hands
//! out a [`RequestTicket`] tagged with a monotonically increasing sequence
//! number; only the ticket of the most recently issued request may settle the
//! store. Results carrying any older ticket are stale and are discarded on
//! arrival, whatever order the responses come back in. Teardown advances the
//! sequence too, so nothing issued before it can land afterwards.

use std::fmt;

use ledgerscope_gateway::{FetchError, NOT_FOUND};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl Status {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// A failed fetch, as shown to consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDescriptor {
    /// Human-readable message.
    pub message: String,
    /// HTTP status code, when the service responded.
    pub code: Option<u16>,
}

impl ErrorDescriptor {
    pub fn is_not_found(&self) -> bool {
        self.code == Some(NOT_FOUND)
    }
}

impl From<&FetchError> for ErrorDescriptor {
    fn from(err: &FetchError) -> Self {
        let message = match err {
            FetchError::Unreachable(_) => {
                "The server did not respond. Please try again later.".to_owned()
            }
            FetchError::ServerStatus {
                message: Some(message),
                ..
            } => message.clone(),
            FetchError::ServerStatus { code, .. } => {
                format!("Server responded with status: {code}")
            }
            FetchError::Malformed(reason) => format!("Unexpected response from server: {reason}"),
        };
        Self {
            message,
            code: err.status_code(),
        }
    }
}

impl From<FetchError> for ErrorDescriptor {
    fn from(err: FetchError) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Proof that a request was issued, used to settle it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// `Idle -> Loading -> {Success, Error}` with latest-request-wins settling.
#[derive(Debug, Default)]
pub struct RequestLifecycle {
    issued: u64,
    status: Status,
    error: Option<ErrorDescriptor>,
}

impl RequestLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new request, superseding any that is still in flight.
    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        self.status = Status::Loading;
        self.error = None;
        RequestTicket(self.issued)
    }

    /// Whether `ticket` belongs to the most recently issued request.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Settle the current request successfully. Returns `false` (and changes
    /// nothing) for a stale ticket.
    pub fn succeed(&mut self, ticket: RequestTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.status = Status::Success;
        self.error = None;
        true
    }

    /// Settle the current request with an error. Returns `false` (and changes
    /// nothing) for a stale ticket.
    pub fn fail(&mut self, ticket: RequestTicket, error: impl Into<ErrorDescriptor>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.status = Status::Error;
        self.error = Some(error.into());
        true
    }

    /// Return to `Idle` and invalidate every outstanding ticket.
    pub fn teardown(&mut self) {
        self.issued += 1;
        self.status = Status::Idle;
        self.error = None;
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn error(&self) -> Option<&ErrorDescriptor> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }
}
