use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::upstream::UpstreamClient;

/// Shared state of the dashboard server. The proxy keeps no state of its
/// own beyond the upstream HTTP client.
pub struct AppState {
    pub upstream: UpstreamClient,
}

pub fn init_tracing() {
    let log_format = std::env::var("PD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let upstream = UpstreamClient::new(&config.backend_url)?;
    tracing::info!("Forwarding /api requests to {}", upstream.base_url());
    Ok(Arc::new(AppState { upstream }))
}
