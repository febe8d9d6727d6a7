use std::sync::Arc;

use axum::{routing::get, Json, Router};
use pipedeck_core::status::StatusResponse;

use crate::main_lib::AppState;

/// Liveness probe for the dashboard server itself; never touches the upstream.
async fn healthz() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "success".to_string(),
        message: "Pipedeck dashboard is running".to_string(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/healthz", get(healthz))
}
