use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use tracing::warn;

use super::{Entity, EntityService, ServiceResult};
use crate::model::{InventoryDraft, InventoryItem, InventoryPatch};

impl Entity for InventoryItem {
    type Draft = InventoryDraft;
    type Patch = InventoryPatch;

    const KIND: &'static str = "inventory item";
    const ID_PREFIX: &'static str = "item";

    fn from_draft(id: String, draft: InventoryDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            category: draft.category,
            current_stock: draft.current_stock,
            min_stock: draft.min_stock,
            unit: draft.unit,
            last_updated: draft.last_updated,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
            archived: false,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn is_archived(&self) -> bool {
        self.archived
    }

    fn apply_patch(&mut self, patch: InventoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(current_stock) = patch.current_stock {
            self.current_stock = current_stock;
        }
        if let Some(min_stock) = patch.min_stock {
            self.min_stock = min_stock;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if patch.last_updated.is_some() {
            self.last_updated = patch.last_updated;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn set_archived(&mut self, archived: bool) {
        self.archived = archived;
    }
}

#[async_trait]
pub trait InventoryQueries: EntityService<InventoryItem> {
    async fn by_category(&self, category: &str) -> ServiceResult<Vec<InventoryItem>> {
        let items = self.list_active().await?;
        Ok(items.into_iter().filter(|i| i.category == category).collect())
    }

    async fn low_stock(&self) -> ServiceResult<Vec<InventoryItem>> {
        let items = self.list_active().await?;
        Ok(items.into_iter().filter(InventoryItem::is_low_stock).collect())
    }

    /// Adds `delta` (negative to use stock). `None` for an unknown id or when
    /// the result would leave the `u32` range; the stored count is left as it was.
    async fn adjust_stock(&self, id: &str, delta: i64) -> ServiceResult<Option<InventoryItem>> {
        let Some(item) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let next = i64::from(item.current_stock).checked_add(delta);
        let Some(next) = next.and_then(|n| u32::try_from(n).ok()) else {
            warn!(id, current = item.current_stock, delta, "stock change rejected");
            return Ok(None);
        };
        let patch = InventoryPatch {
            current_stock: Some(next),
            last_updated: Some(Local::now().date_naive()),
            ..InventoryPatch::default()
        };
        self.update(id, patch).await
    }

    async fn total_units(&self) -> ServiceResult<u64> {
        let items = self.list_active().await?;
        Ok(items.iter().map(|i| u64::from(i.current_stock)).sum())
    }
}

impl<S: EntityService<InventoryItem> + ?Sized> InventoryQueries for S {}
