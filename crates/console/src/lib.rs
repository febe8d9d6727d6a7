//! Pipedeck Console - presentation layer for the pipeline dashboard.
//!
//! This crate holds the typed client for the dashboard's same-origin API and
//! the per-resource state containers the UI renders from. State is kept
//! decoupled from rendering so the fetch/mutate/refresh behavior is testable
//! on its own.

pub mod client;
pub mod gateway;
pub mod store;

// Re-export commonly used types
pub use client::DashboardApiClient;
pub use gateway::{
    ConnectionsApi, DestinationsApi, ResourceGateway, SourcesApi, ToggleGateway,
};
pub use store::{DialogState, ResourceState, ResourceStore};
