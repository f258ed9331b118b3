//! Request gateway: validates caller parameters and runs the search pipeline.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sift_search::{ScoredResult, SearchConfig, SearchOptions, SearchRequest, Searcher};
use tokio_util::sync::CancellationToken;

use crate::error::{GatewayError, Result};

/// Body of a search request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(flatten)]
    pub options: SearchOptions,
}

/// Body of a successful search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub locale: String,
    pub recency_days: u32,
    pub results: Vec<ScoredResult>,
}

/// Validates requests and drives a shared [`Searcher`].
#[derive(Debug, Clone)]
pub struct Gateway {
    searcher: Arc<Searcher>,
}

impl Gateway {
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the search configuration is invalid.
    pub fn new(config: SearchConfig) -> Result<Self> {
        let searcher = Searcher::new(config)?;
        Ok(Self {
            searcher: Arc::new(searcher),
        })
    }

    /// Validate `body`, run the search and shape the response.
    ///
    /// The search runs on its own task so a panic inside the pipeline
    /// becomes a [`GatewayError::Pipeline`] instead of tearing down the
    /// connection. If this future is dropped (the client went away), the
    /// search is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for a missing or blank query and
    /// [`GatewayError::Pipeline`] if the search task fails.
    pub async fn search(&self, body: SearchBody) -> Result<SearchResponse> {
        let query = body.query.unwrap_or_default();
        let request = SearchRequest::new(&query, body.options)?;

        let cancel = CancellationToken::new();
        let guard = cancel.clone().drop_guard();

        let searcher = Arc::clone(&self.searcher);
        let task_request = request.clone();
        let outcome = tokio::spawn(async move {
            searcher.search_with_cancel(&task_request, &cancel).await
        })
        .await
        .map_err(|e| GatewayError::Pipeline(format!("search task failed: {e}")))?;
        guard.disarm();

        Ok(SearchResponse {
            query: request.query,
            locale: request.locale,
            recency_days: request.recency_days,
            results: outcome.results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_gateway() -> Gateway {
        let config = SearchConfig {
            endpoints: sift_search::Endpoints::rooted_at("http://127.0.0.1:9"),
            ..Default::default()
        };
        Gateway::new(config).expect("gateway")
    }

    #[test]
    fn body_parses_camel_case_fields() {
        let body: SearchBody = serde_json::from_str(
            r#"{"query": "node", "maxResults": 3, "recencyDays": 14, "excludeDomains": ["spam.com"]}"#,
        )
        .expect("deserialize");
        assert_eq!(body.query.as_deref(), Some("node"));
        assert_eq!(body.options.max_results, Some(3.0));
        assert_eq!(body.options.recency_days, Some(14.0));
        assert_eq!(body.options.exclude_domains, vec!["spam.com".to_string()]);
    }

    #[test]
    fn null_domain_lists_parse_as_empty() {
        let body: SearchBody = serde_json::from_str(
            r#"{"query":"node","trustedDomains":null,"excludeDomains":null}"#,
        )
        .expect("deserialize");
        assert!(body.options.trusted_domains.is_empty());
        assert!(body.options.exclude_domains.is_empty());
    }

    #[test]
    fn empty_body_parses() {
        let body: SearchBody = serde_json::from_str("{}").expect("deserialize");
        assert!(body.query.is_none());
    }

    #[tokio::test]
    async fn missing_query_is_validation_error() {
        let err = offline_gateway()
            .search(SearchBody::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[tokio::test]
    async fn blank_query_is_validation_error() {
        let body = SearchBody {
            query: Some("   ".into()),
            ..Default::default()
        };
        let err = offline_gateway().search(body).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(ref m) if m == "query is required"));
    }

    #[test]
    fn response_serializes_camel_case() {
        let response = SearchResponse {
            query: "q".into(),
            locale: "en-US".into(),
            recency_days: 30,
            results: vec![],
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["recencyDays"], 30);
        assert!(json["results"].as_array().expect("array").is_empty());
    }
}
