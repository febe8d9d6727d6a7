use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::RawQuery;
use axum::http::{header, Method, Request, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use pipedeck_server::{api::app_router, build_state, config::Config};

/// Run a stub upstream backend on an ephemeral port, returning its base URL.
async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn proxy_for(backend_url: String) -> Router {
    let mut config = Config::from_env();
    config.backend_url = backend_url;
    let state = build_state(&config).await.unwrap();
    app_router(state, &config)
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn healthz_works() {
    let app = proxy_for("http://127.0.0.1:1".to_string()).await;
    let response = app.oneshot(get_request("/api/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn create_source_relays_echoed_entity() {
    let upstream = Router::new().route(
        "/sources/",
        post(|Json(mut payload): Json<Value>| async move {
            payload["id"] = json!(1);
            payload.as_object_mut().unwrap().remove("password");
            (StatusCode::CREATED, Json(payload))
        }),
    );
    let app = proxy_for(spawn_upstream(upstream).await).await;

    let request = json_request(
        Method::POST,
        "/api/sources",
        json!({
            "name": "db1",
            "host": "h",
            "port": 5432,
            "database": "d",
            "user": "u",
            "password": "p"
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "db1");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn delete_connection_passes_through_bare_204() {
    let upstream = Router::new().route(
        "/connections/{id}",
        delete(|| async { StatusCode::NO_CONTENT }),
    );
    let app = proxy_for(spawn_upstream(upstream).await).await;

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/connections/42")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn delete_with_empty_200_becomes_success_flag() {
    let upstream = Router::new().route("/sources/{id}", delete(|| async { StatusCode::OK }));
    let app = proxy_for(spawn_upstream(upstream).await).await;

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/sources/3")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));
}

#[tokio::test]
async fn toggle_with_empty_body_becomes_success_flag() {
    let upstream = Router::new().route(
        "/connections/{id}/toggle",
        post(|| async { StatusCode::OK }),
    );
    let app = proxy_for(spawn_upstream(upstream).await).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/connections/7/toggle")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));
}

#[tokio::test]
async fn empty_list_body_becomes_empty_array_with_no_store() {
    let upstream = Router::new().route("/sources/", get(|| async { StatusCode::OK }));
    let app = proxy_for(spawn_upstream(upstream).await).await;

    let response = app.oneshot(get_request("/api/sources")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn empty_entity_body_becomes_204_empty_object() {
    let upstream = Router::new().route("/sources/{id}", get(|| async { StatusCode::OK }));
    let app = proxy_for(spawn_upstream(upstream).await).await;

    let response = app.oneshot(get_request("/api/sources/9")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(body_json(response).await, json!({}));
}

#[tokio::test]
async fn empty_update_body_is_marked() {
    let upstream = Router::new().route("/sources/{id}", put(|| async { StatusCode::OK }));
    let app = proxy_for(spawn_upstream(upstream).await).await;

    let request = json_request(Method::PUT, "/api/sources/3", json!({ "name": "renamed" }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        body_json(response).await,
        json!({ "detail": "Empty response from API" })
    );
}

#[tokio::test]
async fn empty_probe_body_becomes_success_status() {
    let upstream = Router::new().route(
        "/sources/test-connection",
        post(|| async { StatusCode::OK }),
    );
    let app = proxy_for(spawn_upstream(upstream).await).await;

    let request = json_request(
        Method::POST,
        "/api/sources/test-connection",
        json!({ "host": "h", "port": 5432, "database": "d", "user": "u", "password": "p" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "status": "success", "message": "Connection successful" })
    );
}

#[tokio::test]
async fn json_error_is_relayed_unchanged() {
    let upstream = Router::new().route(
        "/destinations/{id}",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"detail":"not found"}"#,
            )
        }),
    );
    let app = proxy_for(spawn_upstream(upstream).await).await;

    let response = app.oneshot(get_request("/api/destinations/5")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({ "detail": "not found" }));
}

#[tokio::test]
async fn text_error_is_wrapped_at_upstream_status() {
    let upstream = Router::new().route(
        "/sources/",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "internal error") }),
    );
    let app = proxy_for(spawn_upstream(upstream).await).await;

    let response = app.oneshot(get_request("/api/sources")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({ "detail": "internal error" }));
}

#[tokio::test]
async fn unreachable_upstream_is_generic_500() {
    // Grab a port that nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = proxy_for(format!("http://{}", addr)).await;
    let response = app.oneshot(get_request("/api/connections")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "detail": "Failed to process request" })
    );
}

#[tokio::test]
async fn unparseable_success_body_is_parse_failure() {
    let upstream = Router::new().route(
        "/destinations/",
        get(|| async { (StatusCode::OK, "definitely not json") }),
    );
    let app = proxy_for(spawn_upstream(upstream).await).await;

    let response = app.oneshot(get_request("/api/destinations")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "detail": "Failed to parse API response" })
    );
}

#[tokio::test]
async fn list_query_string_is_forwarded() {
    let upstream = Router::new().route(
        "/connections/",
        get(|RawQuery(query): RawQuery| async move {
            Json(json!([{ "query": query.unwrap_or_default() }]))
        }),
    );
    let app = proxy_for(spawn_upstream(upstream).await).await;

    let response = app
        .oneshot(get_request("/api/connections?active_only=true&limit=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["query"], "active_only=true&limit=10");
}

#[tokio::test]
async fn invalid_browser_json_never_reaches_upstream() {
    let hit = Arc::new(AtomicBool::new(false));
    let hit_flag = hit.clone();
    let upstream = Router::new().route(
        "/sources/",
        post(move || {
            let hit = hit_flag.clone();
            async move {
                hit.store(true, Ordering::SeqCst);
                StatusCode::CREATED
            }
        }),
    );
    let app = proxy_for(spawn_upstream(upstream).await).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/sources")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "detail": "Failed to process request" })
    );
    assert!(!hit.load(Ordering::SeqCst));
}

#[tokio::test]
async fn repeated_get_is_byte_identical() {
    let upstream = Router::new().route(
        "/sources/",
        get(|| async {
            (
                [(header::CONTENT_TYPE, "application/json")],
                r#"[{"id":1,"name":"db1","is_active":true}]"#,
            )
        }),
    );
    let app = proxy_for(spawn_upstream(upstream).await).await;

    let first = app
        .clone()
        .oneshot(get_request("/api/sources"))
        .await
        .unwrap();
    let second = app.oneshot(get_request("/api/sources")).await.unwrap();
    assert_eq!(body_bytes(first).await, body_bytes(second).await);
}
