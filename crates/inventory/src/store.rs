use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use stocktrace_core::ItemId;

use crate::item::Item;

/// Keyed store for item records.
///
/// The item store owns `Item` records exclusively; the stock engine is the
/// only writer of the cached `quantity` field. Reads are snapshot reads.
pub trait ItemStore: Send + Sync {
    fn get(&self, item_id: ItemId) -> Option<Item>;
    fn upsert(&self, item: Item);
    /// Remove and return the record, if present.
    fn remove(&self, item_id: ItemId) -> Option<Item>;
    fn list(&self) -> Vec<Item>;
    /// Exact-match lookup on the unique `sku` field.
    fn find_by_sku(&self, sku: &str) -> Option<Item>;
}

impl<S> ItemStore for Arc<S>
where
    S: ItemStore + ?Sized,
{
    fn get(&self, item_id: ItemId) -> Option<Item> {
        (**self).get(item_id)
    }

    fn upsert(&self, item: Item) {
        (**self).upsert(item)
    }

    fn remove(&self, item_id: ItemId) -> Option<Item> {
        (**self).remove(item_id)
    }

    fn list(&self) -> Vec<Item> {
        (**self).list()
    }

    fn find_by_sku(&self, sku: &str) -> Option<Item> {
        (**self).find_by_sku(sku)
    }
}

/// In-memory item store.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    inner: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemStore for InMemoryItemStore {
    fn get(&self, item_id: ItemId) -> Option<Item> {
        let map = self.inner.read().ok()?;
        map.get(&item_id).cloned()
    }

    fn upsert(&self, item: Item) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(item.id, item);
        }
    }

    fn remove(&self, item_id: ItemId) -> Option<Item> {
        let mut map = self.inner.write().ok()?;
        map.remove(&item_id)
    }

    fn list(&self) -> Vec<Item> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut items: Vec<Item> = map.values().cloned().collect();
        // Deterministic listing order: creation time, then id.
        items.sort_by(|a, b| {
            a.date_created
                .cmp(&b.date_created)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        items
    }

    fn find_by_sku(&self, sku: &str) -> Option<Item> {
        let map = self.inner.read().ok()?;
        map.values().find(|i| i.sku.as_deref() == Some(sku)).cloned()
    }
}
