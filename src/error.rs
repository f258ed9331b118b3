//! Error types for the search gateway.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sift_search::SearchError;

/// Top-level error type for the HTTP gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The caller's request was rejected before any search ran.
    #[error("{0}")]
    Validation(String),

    /// The search pipeline failed unexpectedly.
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SearchError> for GatewayError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Validation(msg) => Self::Validation(msg),
            SearchError::Config(msg) => Self::Config(msg),
            other => Self::Pipeline(other.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": msg }))).into_response()
            }
            other => {
                tracing::error!(error = %other, "web search failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(serde_json::json!({
                        "error": "Web search failed",
                        "details": other.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, GatewayError>;
