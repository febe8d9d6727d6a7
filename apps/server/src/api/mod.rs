use std::sync::Arc;

use axum::body::Bytes;
use axum::http::HeaderValue;
use axum::Router;
use serde_json::Value;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, error::ApiResult, main_lib::AppState};

pub mod connections;
pub mod destinations;
pub mod health;
pub mod sources;

/// Parse a browser-supplied JSON body before forwarding it. A body that is
/// not valid JSON never reaches the upstream.
pub(crate) fn parse_body(bytes: &Bytes) -> ApiResult<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .map(|o| o.parse::<HeaderValue>().unwrap())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };

    let api = Router::new()
        .merge(health::router())
        .merge(sources::router())
        .merge(destinations::router())
        .merge(connections::router());

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
