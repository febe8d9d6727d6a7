//! Upstream forwarding and response normalization.
//!
//! Every `/api` route is a specialization of one contract: substitute the
//! path into the backend's URL template, issue exactly one upstream call,
//! and translate whatever comes back into a response the browser can always
//! parse. The normalization rules live in pure functions over the upstream
//! status and body text so the whole behavior table is testable without a
//! network.

use std::time::Duration;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

/// Timeout for a single upstream call.
const UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// What to answer when the upstream reports success with an empty body.
/// One variant per endpoint kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyBody {
    /// Collection GET: an empty list.
    List,
    /// Single-entity GET: 204 with an empty object.
    Entity,
    /// POST/PUT: 204 with an explicit marker object. Notable but non-fatal.
    Mutation,
    /// DELETE: a literal upstream 204 passes through untouched; any other
    /// empty success becomes a success flag.
    Delete,
    /// Toggle side action: a success flag.
    Toggle,
    /// Test-connection probe: a success status object.
    TestConnection,
}

/// HTTP client for the pipeline backend that owns all persistent state.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forward one browser request to `path` and normalize the outcome.
    ///
    /// `query` is relayed verbatim when present. Any network-level failure
    /// collapses to the generic 500; the upstream's status code survives in
    /// every other case.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<Value>,
        on_empty: EmptyBody,
    ) -> Response {
        let mut url = format!("{}{}", self.base_url, path);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url = format!("{}?{}", url, query);
        }
        tracing::debug!("forwarding {} {}", method, url);

        let is_get = method == Method::GET;
        let mut request = self
            .client
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("upstream request to {} failed: {}", url, err);
                return process_failure();
            }
        };

        let status = response.status();
        let json_content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("application/json"))
            .unwrap_or(false);

        // A bare 204 from a DELETE passes through with no body at all.
        if on_empty == EmptyBody::Delete && status == StatusCode::NO_CONTENT {
            return StatusCode::NO_CONTENT.into_response();
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!("failed to read upstream response from {}: {}", url, err);
                return process_failure();
            }
        };

        let mut normalized = if status.is_success() {
            normalize_success(status, &text, on_empty)
        } else {
            tracing::warn!("upstream {} answered {}: {}", url, status, text);
            normalize_error(status, json_content_type, &text)
        };

        if is_get {
            normalized
                .headers_mut()
                .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        }
        normalized
    }
}

/// Normalize a success-status upstream response.
fn normalize_success(status: StatusCode, text: &str, on_empty: EmptyBody) -> Response {
    if text.is_empty() {
        return match on_empty {
            EmptyBody::List => (StatusCode::OK, Json(json!([]))).into_response(),
            EmptyBody::Entity => (StatusCode::NO_CONTENT, Json(json!({}))).into_response(),
            EmptyBody::Mutation => (
                StatusCode::NO_CONTENT,
                Json(json!({ "detail": "Empty response from API" })),
            )
                .into_response(),
            EmptyBody::Delete | EmptyBody::Toggle => {
                (StatusCode::OK, Json(json!({ "success": true }))).into_response()
            }
            EmptyBody::TestConnection => (
                StatusCode::OK,
                Json(json!({ "status": "success", "message": "Connection successful" })),
            )
                .into_response(),
        };
    }

    match serde_json::from_str::<Value>(text) {
        Ok(body) => (status, Json(body)).into_response(),
        Err(err) => {
            tracing::error!("unparseable upstream success body: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "Failed to parse API response" })),
            )
                .into_response()
        }
    }
}

/// Normalize a non-success upstream response: relay JSON error bodies
/// verbatim, wrap anything else into the `{detail}` shape, both at the
/// upstream's status code.
fn normalize_error(status: StatusCode, json_content_type: bool, text: &str) -> Response {
    if json_content_type {
        match serde_json::from_str::<Value>(text) {
            Ok(body) => (status, Json(body)).into_response(),
            Err(_) => process_failure(),
        }
    } else {
        let detail = if text.is_empty() { "Error from API" } else { text };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// The uniform transport-failure response. Never distinguishes an
/// unreachable upstream from a slow one, never retries.
pub fn process_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "Failed to process request" })),
    )
        .into_response()
}
