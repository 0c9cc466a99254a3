//! Service collection store.
//!
//! Owns the in-memory collection of service tickets and the derived stats
//! snapshot. Every operation follows the same three-phase contract: publish
//! loading and clear the previous error at entry, perform exactly one round
//! trip, then either merge the server response into the collection or
//! publish the error and re-raise it.

use std::sync::Arc;
use tokio::sync::watch;

use servtrack_core::error::{Result, ServtrackError};
use servtrack_core::service::{Service, ServicePatch, ServiceStats};
use servtrack_core::state::StateCell;
use servtrack_core::transport::ApiRequest;

use crate::gateway::ApiGateway;

/// Observable collection state.
///
/// `items` preserves insertion order and holds at most one entry per id.
/// `current` tracks the most recently fetched or updated single service and
/// is not guaranteed to appear in `items`.
#[derive(Debug, Clone, Default)]
pub struct ServicesState {
    pub items: Vec<Service>,
    pub current: Option<Service>,
    pub stats: Option<ServiceStats>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

/// Store synchronizing the local service collection with the server.
///
/// The server response is always the source of truth for merges; nothing is
/// recomputed client-side.
pub struct ServiceStore {
    state: StateCell<ServicesState>,
    gateway: Arc<ApiGateway>,
}

impl ServiceStore {
    /// Creates a store over the given gateway.
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self {
            state: StateCell::default(),
            gateway,
        }
    }

    /// Returns a snapshot of the collection state.
    pub fn state(&self) -> ServicesState {
        self.state.get()
    }

    /// Subscribes to collection state changes.
    pub fn subscribe(&self) -> watch::Receiver<ServicesState> {
        self.state.subscribe()
    }

    /// Fetches the full collection, replacing `items`.
    pub async fn fetch_all(&self) -> Result<Vec<Service>> {
        self.begin();
        match self
            .gateway
            .request::<Vec<Service>>(ApiRequest::get("/services"))
            .await
        {
            Ok(items) => {
                self.state.update(|s| {
                    s.items = items.clone();
                    s.is_loading = false;
                });
                Ok(items)
            }
            Err(err) => {
                self.fail("Failed to fetch services", &err);
                Err(err)
            }
        }
    }

    /// Fetches a single service and publishes it as `current`.
    pub async fn fetch_one(&self, id: &str) -> Result<Service> {
        self.begin();
        match self
            .gateway
            .request::<Service>(ApiRequest::get(format!("/services/{id}")))
            .await
        {
            Ok(service) => {
                self.state.update(|s| {
                    s.current = Some(service.clone());
                    s.is_loading = false;
                });
                Ok(service)
            }
            Err(err) => {
                self.fail("Failed to fetch service", &err);
                Err(err)
            }
        }
    }

    /// Creates a service and appends the server's version to `items`.
    ///
    /// A patch without a title is rejected client-side before any request.
    pub async fn create(&self, patch: &ServicePatch) -> Result<Service> {
        self.begin();
        match self.try_create(patch).await {
            Ok(service) => Ok(service),
            Err(err) => {
                self.fail("Failed to create service", &err);
                Err(err)
            }
        }
    }

    async fn try_create(&self, patch: &ServicePatch) -> Result<Service> {
        patch.validate_for_create()?;
        let body = serde_json::to_value(patch)?;
        let service: Service = self
            .gateway
            .request(ApiRequest::post("/services", body))
            .await?;
        self.state.update(|s| {
            // The id invariant holds as long as the server mints fresh ids;
            // a duplicate would mean a desynchronized collection, so replace
            // rather than double up.
            match s.items.iter_mut().find(|item| item.id == service.id) {
                Some(existing) => {
                    tracing::warn!(id = %service.id, "created service already present, replacing");
                    *existing = service.clone();
                }
                None => s.items.push(service.clone()),
            }
            s.is_loading = false;
        });
        Ok(service)
    }

    /// Updates a service and replaces the matching element of `items`.
    ///
    /// When no local element matches the id, `items` is left unchanged (a
    /// fetch_one-then-update flow that never listed is legal); the server's
    /// version still becomes `current` and is returned.
    pub async fn update(&self, id: &str, patch: &ServicePatch) -> Result<Service> {
        self.begin();
        let body = match serde_json::to_value(patch) {
            Ok(body) => body,
            Err(err) => {
                let err = ServtrackError::from(err);
                self.fail("Failed to update service", &err);
                return Err(err);
            }
        };
        match self
            .gateway
            .request::<Service>(ApiRequest::put(format!("/services/{id}"), body))
            .await
        {
            Ok(service) => {
                self.state.update(|s| {
                    match s.items.iter_mut().find(|item| item.id == id) {
                        Some(existing) => *existing = service.clone(),
                        None => {
                            tracing::warn!(%id, "updated service not in local collection");
                        }
                    }
                    s.current = Some(service.clone());
                    s.is_loading = false;
                });
                Ok(service)
            }
            Err(err) => {
                self.fail("Failed to update service", &err);
                Err(err)
            }
        }
    }

    /// Deletes a service and removes it from `items` by id.
    ///
    /// Removal is idempotent from the client's perspective: an id already
    /// absent locally is not an error (the server call itself may still
    /// fail).
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.begin();
        match self
            .gateway
            .request_empty(ApiRequest::delete(format!("/services/{id}")))
            .await
        {
            Ok(()) => {
                self.state.update(|s| {
                    s.items.retain(|item| item.id != id);
                    s.is_loading = false;
                });
                Ok(())
            }
            Err(err) => {
                self.fail("Failed to delete service", &err);
                Err(err)
            }
        }
    }

    /// Refreshes the stats snapshot, taking the server's counts verbatim.
    pub async fn refresh_stats(&self) -> Result<ServiceStats> {
        self.begin();
        match self
            .gateway
            .request::<ServiceStats>(ApiRequest::get("/services/stats"))
            .await
        {
            Ok(stats) => {
                self.state.update(|s| {
                    s.stats = Some(stats);
                    s.is_loading = false;
                });
                Ok(stats)
            }
            Err(err) => {
                self.fail("Failed to fetch service stats", &err);
                Err(err)
            }
        }
    }

    /// Clears `last_error` without other side effects.
    pub fn clear_error(&self) {
        self.state.update(|s| s.last_error = None);
    }

    fn begin(&self) {
        self.state.update(|s| {
            s.is_loading = true;
            s.last_error = None;
        });
    }

    fn fail(&self, fallback: &str, err: &ServtrackError) {
        let message = err.user_message(fallback);
        self.state.update(|s| {
            s.is_loading = false;
            s.last_error = Some(message);
        });
    }
}
