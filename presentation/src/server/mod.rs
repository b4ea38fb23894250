//! HTTP service for panel runs
//!
//! Exposes the same flow as the one-shot CLI over axum:
//!
//! - `GET /` - liveness check
//! - `POST /get-ai-responses` - run the panel for `{"text": ...}`
//!
//! Cross-origin requests are allowed from any origin.
//!
//! Dropping a request future (client disconnect) drops the dispatch with
//! it, which aborts the provider tasks still in flight.

pub mod routes;

use axum::Router;
use axum::http::Method;
use panel_application::RunPanelUseCase;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub use_case: Arc<RunPanelUseCase>,
    /// Cancelled on shutdown; in-flight runs stop waiting on providers
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(use_case: RunPanelUseCase, shutdown: CancellationToken) -> Self {
        Self {
            use_case: Arc::new(use_case),
            shutdown,
        }
    }
}

/// Browser frontends are served from another origin
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Build the router with every route mounted
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::panel_routes())
        .layer(cors())
        .with_state(state)
}

/// Serve until the state's shutdown token is cancelled
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    let shutdown = state.shutdown.clone();
    info!(%addr, providers = state.use_case.panel().len(), "ai-panel listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            info!("received shutdown signal");
        })
        .await
}
