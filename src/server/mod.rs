mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use reqwest::Client;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::RelayError;
use crate::llm::{build_client, ProviderConfig};

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProviderConfig>,
    pub client: Client,
}

impl AppState {
    pub fn new(config: ProviderConfig) -> Result<Self, RelayError> {
        let client = build_client(&config)?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(handlers::status_handler))
        .route("/api/analyze", post(handlers::analyze_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the app on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr: SocketAddr = listener.local_addr()?;
    info!("Starting AI API server on {}", addr);
    info!(
        "API Provider: {}, Model: {}",
        state.config.provider, state.config.model
    );
    axum::serve(listener, app(state)).await
}
