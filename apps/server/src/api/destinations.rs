use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::Method,
    response::Response,
    routing::{get, post},
    Router,
};

use crate::{
    api::parse_body,
    error::ApiResult,
    main_lib::AppState,
    upstream::EmptyBody,
};

async fn list_destinations(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    state
        .upstream
        .forward(
            Method::GET,
            "/destinations/",
            query.as_deref(),
            None,
            EmptyBody::List,
        )
        .await
}

async fn create_destination(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Response> {
    let payload = parse_body(&body)?;
    Ok(state
        .upstream
        .forward(
            Method::POST,
            "/destinations/",
            None,
            Some(payload),
            EmptyBody::Mutation,
        )
        .await)
}

async fn get_destination(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    state
        .upstream
        .forward(
            Method::GET,
            &format!("/destinations/{}", id),
            None,
            None,
            EmptyBody::Entity,
        )
        .await
}

async fn update_destination(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Response> {
    let payload = parse_body(&body)?;
    Ok(state
        .upstream
        .forward(
            Method::PUT,
            &format!("/destinations/{}", id),
            None,
            Some(payload),
            EmptyBody::Mutation,
        )
        .await)
}

async fn delete_destination(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    state
        .upstream
        .forward(
            Method::DELETE,
            &format!("/destinations/{}", id),
            None,
            None,
            EmptyBody::Delete,
        )
        .await
}

/// Probe warehouse credentials without saving them.
async fn test_connection(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Response> {
    let payload = parse_body(&body)?;
    Ok(state
        .upstream
        .forward(
            Method::POST,
            "/destinations/test-connection",
            None,
            Some(payload),
            EmptyBody::TestConnection,
        )
        .await)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/destinations",
            get(list_destinations).post(create_destination),
        )
        .route("/destinations/test-connection", post(test_connection))
        .route(
            "/destinations/{id}",
            get(get_destination)
                .put(update_destination)
                .delete(delete_destination),
        )
}
