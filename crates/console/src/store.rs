//! Per-resource state containers.
//!
//! Each dashboard page owns a `ResourceStore`: the entity list, loading and
//! error flags, the current selection, and dialog visibility, with async
//! fetch/mutate operations. Mutations strictly sequence a refresh after the
//! proxied response resolves; that ordering is the only consistency
//! guarantee the dashboard offers. A failed refresh records the error and
//! leaves the previously fetched items in place.

use std::sync::RwLock;

use pipedeck_core::errors::Result;

use crate::gateway::{ResourceGateway, ToggleGateway};

/// Visibility of the add/edit/delete dialogs for one resource page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialogState {
    pub add_open: bool,
    pub edit_open: bool,
    pub delete_open: bool,
}

/// Snapshot of everything a resource page renders from.
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub selected: Option<T>,
    pub dialogs: DialogState,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        ResourceState {
            items: Vec::new(),
            is_loading: false,
            error: None,
            selected: None,
            dialogs: DialogState::default(),
        }
    }
}

/// State container for one resource, backed by a gateway.
pub struct ResourceStore<G: ResourceGateway> {
    gateway: G,
    state: RwLock<ResourceState<G::Item>>,
}

impl<G: ResourceGateway> ResourceStore<G> {
    pub fn new(gateway: G) -> Self {
        ResourceStore {
            gateway,
            state: RwLock::new(ResourceState::default()),
        }
    }

    /// Current state snapshot for rendering.
    pub fn state(&self) -> ResourceState<G::Item> {
        self.state.read().unwrap().clone()
    }

    /// Re-fetch the entity list. On failure the error is recorded and the
    /// previously fetched items are kept.
    pub async fn refresh(&self) -> Result<()> {
        {
            let mut state = self.state.write().unwrap();
            state.is_loading = true;
            state.error = None;
        }
        let outcome = self.gateway.list().await;
        let mut state = self.state.write().unwrap();
        state.is_loading = false;
        match outcome {
            Ok(items) => {
                state.items = items;
                Ok(())
            }
            Err(err) => {
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn create(&self, payload: G::Create) -> Result<()> {
        self.gateway.create(payload).await?;
        self.refresh().await
    }

    pub async fn update(&self, id: &str, payload: G::Update) -> Result<()> {
        self.gateway.update(id, payload).await?;
        self.refresh().await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.gateway.delete(id).await?;
        self.refresh().await
    }

    pub fn select(&self, item: Option<G::Item>) {
        self.state.write().unwrap().selected = item;
    }

    pub fn open_add_dialog(&self) {
        self.state.write().unwrap().dialogs.add_open = true;
    }

    pub fn open_edit_dialog(&self, item: G::Item) {
        let mut state = self.state.write().unwrap();
        state.selected = Some(item);
        state.dialogs.edit_open = true;
    }

    pub fn open_delete_dialog(&self, item: G::Item) {
        let mut state = self.state.write().unwrap();
        state.selected = Some(item);
        state.dialogs.delete_open = true;
    }

    pub fn close_dialogs(&self) {
        let mut state = self.state.write().unwrap();
        state.selected = None;
        state.dialogs = DialogState::default();
    }
}

impl<G: ToggleGateway> ResourceStore<G> {
    /// Flip the active flag of one item, then re-fetch.
    pub async fn toggle(&self, id: &str) -> Result<()> {
        self.gateway.toggle(id).await?;
        self.refresh().await
    }
}
