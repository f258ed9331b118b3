//! Error types for the sift-search crate.
//!
//! Provider failures never reach callers of [`crate::search`]: the
//! orchestrator isolates them per provider. Only request validation and
//! configuration problems surface as errors from the public API.

/// Errors that can occur during web search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The caller-supplied search request is invalid.
    #[error("invalid search request: {0}")]
    Validation(String),

    /// A provider request exceeded its timeout.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// A provider request failed at the network level or returned a
    /// non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A provider response could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The request was cancelled by the caller or the request budget expired.
    #[error("search cancelled: {0}")]
    Cancelled(String),
}

impl SearchError {
    /// Whether another attempt at the same provider call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Http(_))
    }
}

/// Convenience type alias for sift-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_validation() {
        let err = SearchError::Validation("query must not be empty".into());
        assert_eq!(
            err.to_string(),
            "invalid search request: query must not be empty"
        );
    }

    #[test]
    fn display_timeout() {
        let err = SearchError::Timeout("ddg_html exceeded 5000ms".into());
        assert_eq!(err.to_string(), "search timed out: ddg_html exceeded 5000ms");
    }

    #[test]
    fn display_http() {
        let err = SearchError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }

    #[test]
    fn display_cancelled() {
        let err = SearchError::Cancelled("request budget elapsed".into());
        assert_eq!(err.to_string(), "search cancelled: request budget elapsed");
    }

    #[test]
    fn only_network_failures_are_transient() {
        assert!(SearchError::Timeout("t".into()).is_transient());
        assert!(SearchError::Http("h".into()).is_transient());
        assert!(!SearchError::Parse("p".into()).is_transient());
        assert!(!SearchError::Cancelled("c".into()).is_transient());
        assert!(!SearchError::Config("c".into()).is_transient());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
