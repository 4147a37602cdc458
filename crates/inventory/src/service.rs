//! Item orchestration: create/update/delete plus lookups.
//!
//! Quantity-affecting changes are delegated to the stock engine; everything
//! else is simple field replacement.

use std::sync::Arc;

use chrono::Utc;

use stocktrace_core::{ActorId, DomainError, DomainResult, ItemId};
use stocktrace_ledger::{EntryKind, LedgerEntry, LedgerStore};

use crate::category::CategoryStore;
use crate::engine::StockEngine;
use crate::item::{Item, ItemDraft, ItemPatch};
use crate::query::ItemFilter;
use crate::store::ItemStore;

#[derive(Debug)]
pub struct ItemService<L, S, C> {
    engine: Arc<StockEngine<L, S>>,
    items: S,
    categories: C,
}

impl<L, S, C> ItemService<L, S, C>
where
    L: LedgerStore,
    S: ItemStore,
    C: CategoryStore,
{
    pub fn new(engine: Arc<StockEngine<L, S>>, items: S, categories: C) -> Self {
        Self {
            engine,
            items,
            categories,
        }
    }

    fn check_sku_available(&self, sku: &str, for_item: Option<ItemId>) -> DomainResult<()> {
        match self.items.find_by_sku(sku) {
            Some(existing) if Some(existing.id) != for_item => Err(DomainError::conflict(
                "item with this SKU already exists",
            )),
            _ => Ok(()),
        }
    }

    fn check_category_exists(&self, category: stocktrace_core::CategoryId) -> DomainResult<()> {
        if self.categories.get(category).is_some() {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }

    /// Create an item; a positive initial quantity is seeded through the
    /// ledger as one atomic unit with the insert.
    pub fn create_item(&self, draft: ItemDraft, actor: ActorId) -> DomainResult<Item> {
        draft.validate()?;

        if let Some(sku) = &draft.sku {
            self.check_sku_available(sku, None)?;
        }
        self.check_category_exists(draft.category)?;

        let initial_quantity = draft.quantity;
        let item = draft.into_item(actor, Utc::now());
        let (item, _seed) = self.engine.create_item(item, initial_quantity, actor)?;
        Ok(item)
    }

    pub fn get_item(&self, item_id: ItemId) -> DomainResult<Item> {
        self.items.get(item_id).ok_or(DomainError::NotFound)
    }

    pub fn list_items(&self, filter: &ItemFilter) -> Vec<Item> {
        self.items
            .list()
            .into_iter()
            .filter(|item| filter.matches(item))
            .collect()
    }

    /// Partial update. A changed `quantity` is routed through the engine's
    /// override path before the remaining fields are replaced.
    pub fn update_item(&self, item_id: ItemId, patch: ItemPatch, actor: ActorId) -> DomainResult<Item> {
        patch.validate()?;

        let current = self.items.get(item_id).ok_or(DomainError::NotFound)?;

        if let Some(sku) = &patch.sku {
            if current.sku.as_deref() != Some(sku) {
                self.check_sku_available(sku, Some(item_id))?;
            }
        }
        if let Some(category) = patch.category {
            self.check_category_exists(category)?;
        }

        if let Some(quantity) = patch.quantity {
            if quantity != current.quantity {
                self.engine
                    .apply_quantity_override(item_id, quantity, actor, None)?;
            }
        }

        // Re-read: the override above may have advanced quantity and stamps.
        let mut item = self.items.get(item_id).ok_or(DomainError::NotFound)?;

        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(description) = patch.description {
            item.description = Some(description);
        }
        if let Some(category) = patch.category {
            item.category = category;
        }
        if let Some(price) = patch.price {
            item.price = price;
        }
        if let Some(unit) = patch.unit {
            item.unit = unit;
        }
        if let Some(location) = patch.location {
            item.location = Some(location);
        }
        if let Some(sku) = patch.sku {
            item.sku = Some(sku);
        }
        if let Some(threshold) = patch.threshold {
            item.threshold = threshold;
        }
        if let Some(image) = patch.image {
            item.image = Some(image);
        }

        item.last_updated = Utc::now();
        item.last_updated_by = actor;
        self.items.upsert(item.clone());
        Ok(item)
    }

    /// Delete an item and its whole ledger stream. Not reversible.
    pub fn delete_item(&self, item_id: ItemId) -> DomainResult<usize> {
        self.engine.delete_item(item_id)
    }

    /// Record a stock movement against an item.
    pub fn record_transaction(
        &self,
        item_id: ItemId,
        kind: EntryKind,
        quantity: i64,
        notes: Option<String>,
        reference: Option<String>,
        actor: ActorId,
    ) -> DomainResult<LedgerEntry> {
        self.engine
            .record_transaction(item_id, kind, quantity, notes, reference, actor)
    }

    /// Ledger history for an item, newest first.
    pub fn item_history(&self, item_id: ItemId) -> DomainResult<Vec<LedgerEntry>> {
        self.engine.history(item_id)
    }
}
