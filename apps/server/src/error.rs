use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Outermost fault boundary of the proxy. Whatever escapes a handler is
/// flattened to the generic failure the browser contract promises; the
/// underlying cause only goes to the logs.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    BadPayload(#[from] serde_json::Error),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Failed to process request: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "Failed to process request" })),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
