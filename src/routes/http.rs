// GET handlers: version, history snapshot, current address sets

use axum::{extract::State, response::IntoResponse};
use std::net::IpAddr;

use super::AppState;
use crate::models::AddressSet;
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/history — rolling packet counts, oldest first.
pub(super) async fn history_handler(State(state): State<AppState>) -> impl IntoResponse {
    let points = state.history_rx.borrow().clone();
    axum::Json(serde_json::json!({
        "capacity": state.history_capacity,
        "points": points,
    }))
}

/// GET /api/addresses — the target and local snapshots currently in use.
pub(super) async fn addresses_handler(State(state): State<AppState>) -> impl IntoResponse {
    let targets = sorted(&state.addresses.targets());
    let local = sorted(&state.addresses.local());
    axum::Json(serde_json::json!({
        "targets": targets,
        "local": local,
    }))
}

fn sorted(set: &AddressSet) -> Vec<IpAddr> {
    let mut v: Vec<IpAddr> = set.iter().copied().collect();
    v.sort();
    v
}
