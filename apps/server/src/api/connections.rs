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

async fn list_connections(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    state
        .upstream
        .forward(
            Method::GET,
            "/connections/",
            query.as_deref(),
            None,
            EmptyBody::List,
        )
        .await
}

async fn create_connection(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Response> {
    let payload = parse_body(&body)?;
    Ok(state
        .upstream
        .forward(
            Method::POST,
            "/connections/",
            None,
            Some(payload),
            EmptyBody::Mutation,
        )
        .await)
}

async fn get_connection(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    state
        .upstream
        .forward(
            Method::GET,
            &format!("/connections/{}", id),
            None,
            None,
            EmptyBody::Entity,
        )
        .await
}

async fn update_connection(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Response> {
    let payload = parse_body(&body)?;
    Ok(state
        .upstream
        .forward(
            Method::PUT,
            &format!("/connections/{}", id),
            None,
            Some(payload),
            EmptyBody::Mutation,
        )
        .await)
}

async fn delete_connection(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    state
        .upstream
        .forward(
            Method::DELETE,
            &format!("/connections/{}", id),
            None,
            None,
            EmptyBody::Delete,
        )
        .await
}

/// Flip the active flag without a full update payload.
async fn toggle_connection(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    state
        .upstream
        .forward(
            Method::POST,
            &format!("/connections/{}/toggle", id),
            None,
            None,
            EmptyBody::Toggle,
        )
        .await
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/connections",
            get(list_connections).post(create_connection),
        )
        .route(
            "/connections/{id}",
            get(get_connection)
                .put(update_connection)
                .delete(delete_connection),
        )
        .route("/connections/{id}/toggle", post(toggle_connection))
}
