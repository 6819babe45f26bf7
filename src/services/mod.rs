//! Entity services.
//!
//! Every entity type is served through [`EntityService`]. The only backend
//! today is [`MemoryService`], a vector behind a lock that stands in for the
//! future REST API (`clients`, `jobs`, `invoices`, `inventory-items`). Calls
//! are `async` so a network backend can replace it without touching callers.

mod clients;
mod inventory;
mod invoices;
mod jobs;

pub use clients::ClientQueries;
pub use inventory::InventoryQueries;
pub use invoices::{InvoiceQueries, invoice_for_job};
pub use jobs::JobQueries;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::model::{Client, InventoryItem, Invoice, Job};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} backend unavailable: {message}")]
    Unavailable { entity: &'static str, message: String },

    #[error("{entity} request rejected: {message}")]
    Rejected { entity: &'static str, message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// A record kept by an entity service.
///
/// Drafts carry what a caller may set on create; patches carry what a caller
/// may change on update. Neither can name `id` or `created_at`.
pub trait Entity: Clone + Send + Sync + 'static {
    type Draft: Send + 'static;
    type Patch: Send + 'static;

    /// Singular name used in logs and errors.
    const KIND: &'static str;
    const ID_PREFIX: &'static str;

    fn from_draft(id: String, draft: Self::Draft, now: DateTime<Utc>) -> Self;
    fn id(&self) -> &str;
    fn is_archived(&self) -> bool;
    fn apply_patch(&mut self, patch: Self::Patch);
    fn touch(&mut self, now: DateTime<Utc>);

    /// Flips the soft-delete flag. Entities with an archived status value
    /// override this to move the status along with it.
    fn set_archived(&mut self, archived: bool);
}

#[async_trait]
pub trait EntityService<E: Entity>: Send + Sync {
    /// Non-archived records in insertion order.
    async fn list_active(&self) -> ServiceResult<Vec<E>>;

    /// Every record, archived ones included.
    async fn list_all(&self) -> ServiceResult<Vec<E>>;

    async fn get_by_id(&self, id: &str) -> ServiceResult<Option<E>>;

    async fn create(&self, draft: E::Draft) -> ServiceResult<E>;

    /// Merges `patch` over the stored record. `None` when the id is unknown.
    async fn update(&self, id: &str, patch: E::Patch) -> ServiceResult<Option<E>>;

    /// `false` when the id is unknown.
    async fn delete(&self, id: &str) -> ServiceResult<bool>;

    async fn archive(&self, id: &str) -> ServiceResult<Option<E>>;

    async fn unarchive(&self, id: &str) -> ServiceResult<Option<E>>;
}

pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// In-memory service. Reads hand out clones so callers never alias stored state.
pub struct MemoryService<E: Entity> {
    records: RwLock<Vec<E>>,
}

impl<E: Entity> Default for MemoryService<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> MemoryService<E> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<E>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    async fn modify(&self, id: &str, op: &str, f: impl FnOnce(&mut E)) -> Option<E> {
        let mut records = self.records.write().await;
        let Some(slot) = records.iter_mut().find(|r| r.id() == id) else {
            warn!(entity = E::KIND, id, op, "record not found");
            return None;
        };
        // The stored record is replaced only after the merge completes.
        let mut updated = slot.clone();
        f(&mut updated);
        updated.touch(Utc::now());
        *slot = updated.clone();
        debug!(entity = E::KIND, id, op, "record updated");
        Some(updated)
    }
}

#[async_trait]
impl<E: Entity> EntityService<E> for MemoryService<E> {
    async fn list_active(&self) -> ServiceResult<Vec<E>> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| !r.is_archived()).cloned().collect())
    }

    async fn list_all(&self) -> ServiceResult<Vec<E>> {
        Ok(self.records.read().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> ServiceResult<Option<E>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn create(&self, draft: E::Draft) -> ServiceResult<E> {
        let record = E::from_draft(new_id(E::ID_PREFIX), draft, Utc::now());
        self.records.write().await.push(record.clone());
        info!(entity = E::KIND, id = record.id(), "record created");
        Ok(record)
    }

    async fn update(&self, id: &str, patch: E::Patch) -> ServiceResult<Option<E>> {
        Ok(self.modify(id, "update", |r| r.apply_patch(patch)).await)
    }

    async fn delete(&self, id: &str) -> ServiceResult<bool> {
        let mut records = self.records.write().await;
        match records.iter().position(|r| r.id() == id) {
            Some(index) => {
                records.remove(index);
                info!(entity = E::KIND, id, "record deleted");
                Ok(true)
            }
            None => {
                warn!(entity = E::KIND, id, "record not found for deletion");
                Ok(false)
            }
        }
    }

    async fn archive(&self, id: &str) -> ServiceResult<Option<E>> {
        Ok(self.modify(id, "archive", |r| r.set_archived(true)).await)
    }

    async fn unarchive(&self, id: &str) -> ServiceResult<Option<E>> {
        Ok(self.modify(id, "unarchive", |r| r.set_archived(false)).await)
    }
}

/// The four services, built once at start and handed to the controller.
#[derive(Clone)]
pub struct Services {
    pub clients: Arc<dyn EntityService<Client>>,
    pub jobs: Arc<dyn EntityService<Job>>,
    pub invoices: Arc<dyn EntityService<Invoice>>,
    pub inventory: Arc<dyn EntityService<InventoryItem>>,
}

impl Services {
    pub fn in_memory() -> Self {
        Self::from_records(Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }

    pub fn from_records(
        clients: Vec<Client>,
        jobs: Vec<Job>,
        invoices: Vec<Invoice>,
        inventory: Vec<InventoryItem>,
    ) -> Self {
        Self {
            clients: Arc::new(MemoryService::with_records(clients)),
            jobs: Arc::new(MemoryService::with_records(jobs)),
            invoices: Arc::new(MemoryService::with_records(invoices)),
            inventory: Arc::new(MemoryService::with_records(inventory)),
        }
    }
}
