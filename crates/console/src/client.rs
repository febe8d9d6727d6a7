//! HTTP client for the dashboard's same-origin API.
//!
//! All reads and mutations from the presentation layer go through this
//! client, which talks to the proxy routes served by `pipedeck-server`.
//! Responses are read as text first so that empty bodies and relayed
//! upstream errors are handled uniformly.

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use pipedeck_core::connections::{Connection, ConnectionCreate, ConnectionUpdate};
use pipedeck_core::destinations::{
    Destination, DestinationCreate, DestinationUpdate, TestDestinationConnection,
};
use pipedeck_core::errors::{Error, Result};
use pipedeck_core::sources::{Source, SourceCreate, SourceUpdate, TestSourceConnection};
use pipedeck_core::status::StatusResponse;

/// Default timeout for dashboard API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// Client for the dashboard's `/api` surface.
#[derive(Debug, Clone)]
pub struct DashboardApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl DashboardApiClient {
    /// Create a new client for the dashboard origin, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<(StatusCode, String)> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[DashboardApi] {} {}", method, url);

        let mut request = self.client.request(method, &url).headers(self.headers());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| Error::Unexpected(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Unexpected(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|b| b.detail)
                .unwrap_or_else(|| text.chars().take(200).collect());
            return Err(Error::Api {
                status: status.as_u16(),
                detail,
            });
        }
        Ok((status, text))
    }

    /// Issue a request and parse the success body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<T> {
        let (_, text) = self.request(method, path, body).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Issue a mutation where the proxy may answer with the empty-response
    /// marker (204) instead of the entity. That case is not an error, just
    /// an absent result.
    async fn mutate<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Option<T>> {
        let (status, text) = self.request(method, path, Some(body)).await?;
        if status == StatusCode::NO_CONTENT || text.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Sources
    // ─────────────────────────────────────────────────────────────────────

    pub async fn list_sources(&self) -> Result<Vec<Source>> {
        self.fetch(Method::GET, "/api/sources", None::<&()>).await
    }

    pub async fn get_source(&self, id: &str) -> Result<Source> {
        self.fetch(Method::GET, &format!("/api/sources/{}", id), None::<&()>)
            .await
    }

    pub async fn create_source(&self, payload: &SourceCreate) -> Result<Option<Source>> {
        self.mutate(Method::POST, "/api/sources", payload).await
    }

    pub async fn update_source(&self, id: &str, payload: &SourceUpdate) -> Result<Option<Source>> {
        self.mutate(Method::PUT, &format!("/api/sources/{}", id), payload)
            .await
    }

    pub async fn delete_source(&self, id: &str) -> Result<()> {
        self.request(Method::DELETE, &format!("/api/sources/{}", id), None::<&()>)
            .await?;
        Ok(())
    }

    pub async fn test_source_connection(
        &self,
        payload: &TestSourceConnection,
    ) -> Result<StatusResponse> {
        self.fetch(Method::POST, "/api/sources/test-connection", Some(payload))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Destinations
    // ─────────────────────────────────────────────────────────────────────

    pub async fn list_destinations(&self) -> Result<Vec<Destination>> {
        self.fetch(Method::GET, "/api/destinations", None::<&()>)
            .await
    }

    pub async fn get_destination(&self, id: &str) -> Result<Destination> {
        self.fetch(
            Method::GET,
            &format!("/api/destinations/{}", id),
            None::<&()>,
        )
        .await
    }

    pub async fn create_destination(
        &self,
        payload: &DestinationCreate,
    ) -> Result<Option<Destination>> {
        self.mutate(Method::POST, "/api/destinations", payload).await
    }

    pub async fn update_destination(
        &self,
        id: &str,
        payload: &DestinationUpdate,
    ) -> Result<Option<Destination>> {
        self.mutate(Method::PUT, &format!("/api/destinations/{}", id), payload)
            .await
    }

    pub async fn delete_destination(&self, id: &str) -> Result<()> {
        self.request(
            Method::DELETE,
            &format!("/api/destinations/{}", id),
            None::<&()>,
        )
        .await?;
        Ok(())
    }

    pub async fn test_destination_connection(
        &self,
        payload: &TestDestinationConnection,
    ) -> Result<StatusResponse> {
        self.fetch(
            Method::POST,
            "/api/destinations/test-connection",
            Some(payload),
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Connections
    // ─────────────────────────────────────────────────────────────────────

    pub async fn list_connections(&self) -> Result<Vec<Connection>> {
        self.fetch(Method::GET, "/api/connections", None::<&()>)
            .await
    }

    pub async fn get_connection(&self, id: &str) -> Result<Connection> {
        self.fetch(
            Method::GET,
            &format!("/api/connections/{}", id),
            None::<&()>,
        )
        .await
    }

    pub async fn create_connection(
        &self,
        payload: &ConnectionCreate,
    ) -> Result<Option<Connection>> {
        self.mutate(Method::POST, "/api/connections", payload).await
    }

    pub async fn update_connection(
        &self,
        id: &str,
        payload: &ConnectionUpdate,
    ) -> Result<Option<Connection>> {
        self.mutate(Method::PUT, &format!("/api/connections/{}", id), payload)
            .await
    }

    pub async fn delete_connection(&self, id: &str) -> Result<()> {
        self.request(
            Method::DELETE,
            &format!("/api/connections/{}", id),
            None::<&()>,
        )
        .await?;
        Ok(())
    }

    /// Flip a connection's active flag without a full update payload.
    pub async fn toggle_connection(&self, id: &str) -> Result<()> {
        self.request(
            Method::POST,
            &format!("/api/connections/{}/toggle", id),
            None::<&()>,
        )
        .await?;
        Ok(())
    }
}
