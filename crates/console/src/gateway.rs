//! Gateway traits between the state containers and the dashboard API.
//!
//! Stores talk to a `ResourceGateway` rather than the HTTP client directly,
//! so the fetch/mutate/refresh behavior can be exercised against stubs.

use async_trait::async_trait;
use std::sync::Arc;

use pipedeck_core::connections::{ConnectionCreate, ConnectionUpdate, ConnectionView};
use pipedeck_core::destinations::{DestinationCreate, DestinationUpdate, DestinationView};
use pipedeck_core::errors::Result;
use pipedeck_core::sources::{SourceCreate, SourceUpdate, SourceView};

use crate::client::DashboardApiClient;

/// Read/write access to one dashboard resource.
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    type Item: Clone + Send + Sync;
    type Create: Send + Sync;
    type Update: Send + Sync;

    async fn list(&self) -> Result<Vec<Self::Item>>;
    async fn create(&self, payload: Self::Create) -> Result<()>;
    async fn update(&self, id: &str, payload: Self::Update) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Extension for resources supporting the toggle-active side action.
#[async_trait]
pub trait ToggleGateway: ResourceGateway {
    async fn toggle(&self, id: &str) -> Result<()>;
}

/// Sources resource backed by the dashboard API.
#[derive(Clone)]
pub struct SourcesApi(pub Arc<DashboardApiClient>);

#[async_trait]
impl ResourceGateway for SourcesApi {
    type Item = SourceView;
    type Create = SourceCreate;
    type Update = SourceUpdate;

    async fn list(&self) -> Result<Vec<SourceView>> {
        let sources = self.0.list_sources().await?;
        Ok(sources.into_iter().map(SourceView::from).collect())
    }

    async fn create(&self, payload: SourceCreate) -> Result<()> {
        payload.validate()?;
        self.0.create_source(&payload).await?;
        Ok(())
    }

    async fn update(&self, id: &str, payload: SourceUpdate) -> Result<()> {
        payload.validate()?;
        self.0.update_source(id, &payload).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.0.delete_source(id).await
    }
}

/// Destinations resource backed by the dashboard API.
#[derive(Clone)]
pub struct DestinationsApi(pub Arc<DashboardApiClient>);

#[async_trait]
impl ResourceGateway for DestinationsApi {
    type Item = DestinationView;
    type Create = DestinationCreate;
    type Update = DestinationUpdate;

    async fn list(&self) -> Result<Vec<DestinationView>> {
        let destinations = self.0.list_destinations().await?;
        Ok(destinations.into_iter().map(DestinationView::from).collect())
    }

    async fn create(&self, payload: DestinationCreate) -> Result<()> {
        payload.validate()?;
        self.0.create_destination(&payload).await?;
        Ok(())
    }

    async fn update(&self, id: &str, payload: DestinationUpdate) -> Result<()> {
        payload.validate()?;
        self.0.update_destination(id, &payload).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.0.delete_destination(id).await
    }
}

/// Connections resource backed by the dashboard API.
#[derive(Clone)]
pub struct ConnectionsApi(pub Arc<DashboardApiClient>);

#[async_trait]
impl ResourceGateway for ConnectionsApi {
    type Item = ConnectionView;
    type Create = ConnectionCreate;
    type Update = ConnectionUpdate;

    async fn list(&self) -> Result<Vec<ConnectionView>> {
        let connections = self.0.list_connections().await?;
        Ok(connections.into_iter().map(ConnectionView::from).collect())
    }

    async fn create(&self, mut payload: ConnectionCreate) -> Result<()> {
        payload.validate()?;
        self.0.create_connection(&payload).await?;
        Ok(())
    }

    async fn update(&self, id: &str, mut payload: ConnectionUpdate) -> Result<()> {
        payload.validate()?;
        self.0.update_connection(id, &payload).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.0.delete_connection(id).await
    }
}

#[async_trait]
impl ToggleGateway for ConnectionsApi {
    async fn toggle(&self, id: &str) -> Result<()> {
        self.0.toggle_connection(id).await
    }
}
