// History feed: HTTP + WebSocket routes for an external charting client

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::{broadcast, watch};
use tower_http::cors::{Any, CorsLayer};

use crate::address_repo::AddressSets;
use crate::models::{HistoryPoint, TrafficSummary};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) summary_tx: broadcast::Sender<TrafficSummary>,
    pub(crate) history_rx: watch::Receiver<Vec<HistoryPoint>>,
    pub(crate) addresses: Arc<AddressSets>,
    pub(crate) ws_connections: Arc<AtomicUsize>,
    pub(crate) history_capacity: usize,
}

pub fn app(
    summary_tx: broadcast::Sender<TrafficSummary>,
    history_rx: watch::Receiver<Vec<HistoryPoint>>,
    addresses: Arc<AddressSets>,
    ws_connections: Arc<AtomicUsize>,
    history_capacity: usize,
) -> Router {
    let state = AppState {
        summary_tx,
        history_rx,
        addresses,
        ws_connections,
        history_capacity,
    };
    Router::new()
        .route("/", get(|| async { "trafficwatch history feed" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/history", get(http::history_handler)) // GET /api/history
        .route("/api/addresses", get(http::addresses_handler)) // GET /api/addresses
        .route("/ws/traffic", get(ws::ws_traffic)) // WS /ws/traffic
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

/// Binds `host:port` and serves the feed until the returned task is aborted or fails.
pub async fn serve(router: Router, host: &str, port: u16) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("binding history feed on {}: {}", addr, e))?;
    tracing::info!("History feed listening on http://{}", addr);
    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::warn!(error = %e, "history feed server stopped");
        }
    }))
}
