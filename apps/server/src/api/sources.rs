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

async fn list_sources(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    state
        .upstream
        .forward(Method::GET, "/sources/", query.as_deref(), None, EmptyBody::List)
        .await
}

async fn create_source(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Response> {
    let payload = parse_body(&body)?;
    Ok(state
        .upstream
        .forward(
            Method::POST,
            "/sources/",
            None,
            Some(payload),
            EmptyBody::Mutation,
        )
        .await)
}

async fn get_source(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    state
        .upstream
        .forward(
            Method::GET,
            &format!("/sources/{}", id),
            None,
            None,
            EmptyBody::Entity,
        )
        .await
}

async fn update_source(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Response> {
    let payload = parse_body(&body)?;
    Ok(state
        .upstream
        .forward(
            Method::PUT,
            &format!("/sources/{}", id),
            None,
            Some(payload),
            EmptyBody::Mutation,
        )
        .await)
}

async fn delete_source(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    state
        .upstream
        .forward(
            Method::DELETE,
            &format!("/sources/{}", id),
            None,
            None,
            EmptyBody::Delete,
        )
        .await
}

/// Probe a database connection without saving it.
async fn test_connection(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Response> {
    let payload = parse_body(&body)?;
    Ok(state
        .upstream
        .forward(
            Method::POST,
            "/sources/test-connection",
            None,
            Some(payload),
            EmptyBody::TestConnection,
        )
        .await)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sources", get(list_sources).post(create_source))
        .route("/sources/test-connection", post(test_connection))
        .route(
            "/sources/{id}",
            get(get_source).put(update_source).delete(delete_source),
        )
}
