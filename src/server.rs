//! HTTP server exposing the search gateway.
//!
//! ## Endpoints
//!
//! - `POST /api/search`: run a search, body `{ query, maxResults?, locale?,
//!   recencyDays?, trustedDomains?, excludeDomains? }`
//! - `GET /health`: liveness probe

use std::net::SocketAddr;

use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{GatewayError, Result};
use crate::gateway::{Gateway, SearchBody};

/// Shared state for axum handlers.
#[derive(Clone)]
struct AppState {
    gateway: Gateway,
}

/// Build the router for `gateway`.
pub fn router(gateway: Gateway) -> Router {
    Router::new()
        .route("/api/search", post(handle_search))
        .route("/health", get(handle_health))
        .with_state(AppState { gateway })
}

/// Search gateway running on a background task.
pub struct SearchServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl SearchServer {
    /// Start the server.
    ///
    /// Binds to `{config.host}:{config.port}` (use port `0` for auto-assign)
    /// and begins serving in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the TCP listener
    /// cannot bind.
    pub async fn start(config: &ServerConfig) -> Result<Self> {
        let gateway = Gateway::new(config.search.clone())?;
        let app = router(gateway);

        let listener = TcpListener::bind(config.bind_addr()).await?;
        let addr = listener.local_addr()?;

        info!("search gateway listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("search gateway error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for SearchServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// `POST /api/search`
async fn handle_search(
    State(state): State<AppState>,
    body: std::result::Result<Json<SearchBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return GatewayError::Validation(format!("invalid request body: {}", rejection.body_text()))
                .into_response();
        }
    };

    match state.gateway.search(body).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /health`
async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
