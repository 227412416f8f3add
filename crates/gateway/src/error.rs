use thiserror::Error;

/// HTTP status the ledger service uses for "no record at that identifier".
pub const NOT_FOUND: u16 = 404;

/// Result of a single gateway call.
pub type FetchResult<T> = Result<T, FetchError>;

/// Failure of a single gateway call.
///
/// The gateway never panics or retries; every failure is returned as one of
/// these variants. `Clone` so stores can keep the last error in snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No response was received (connection refused, DNS, timeout, reset).
    #[error("the ledger service did not respond: {0}")]
    Unreachable(String),
    /// The service answered with a non-success status code.
    #[error("ledger service responded with status {code}{}", suffix(.message))]
    ServerStatus { code: u16, message: Option<String> },
    /// The body did not match the record model.
    #[error("malformed response from ledger service: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn status(code: u16) -> Self {
        Self::ServerStatus {
            code,
            message: None,
        }
    }

    /// HTTP status code, when the service responded.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ServerStatus { code, .. } => Some(*code),
            Self::Unreachable(_) | Self::Malformed(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(NOT_FOUND)
    }

    pub(crate) fn transport(err: reqwest::Error) -> Self {
        Self::Unreachable(err.to_string())
    }

    pub(crate) fn malformed(err: impl std::fmt::Display) -> Self {
        Self::Malformed(err.to_string())
    }
}

fn suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Errors building an [`HttpGateway`](crate::HttpGateway).
#[derive(Debug, Error)]
pub enum GatewayConfigError {
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinguishable() {
        let not_found = FetchError::status(404);
        let server = FetchError::status(500);
        let down = FetchError::Unreachable("connection refused".into());

        assert!(not_found.is_not_found());
        assert!(!server.is_not_found());
        assert!(!down.is_not_found());
        assert_eq!(down.status_code(), None);
    }

    #[test]
    fn display_includes_service_message() {
        let err = FetchError::ServerStatus {
            code: 400,
            message: Some("bad page".into()),
        };
        assert_eq!(
            err.to_string(),
            "ledger service responded with status 400: bad page"
        );
        assert_eq!(
            FetchError::status(503).to_string(),
            "ledger service responded with status 503"
        );
    }
}
