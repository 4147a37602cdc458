//! Infrastructure wiring: in-memory stores behind the store traits.
//!
//! The store traits are the seam where a persistent backend would plug in;
//! this build ships the in-memory configuration.

use std::sync::Arc;

use stocktrace_inventory::{
    CategoryService, InMemoryCategoryStore, InMemoryItemStore, ItemService, StockEngine,
};
use stocktrace_ledger::InMemoryLedgerStore;

pub type SharedLedgerStore = Arc<InMemoryLedgerStore>;
pub type SharedItemStore = Arc<InMemoryItemStore>;
pub type SharedCategoryStore = Arc<InMemoryCategoryStore>;

pub type Engine = StockEngine<SharedLedgerStore, SharedItemStore>;

pub struct AppServices {
    pub engine: Arc<Engine>,
    pub items: ItemService<SharedLedgerStore, SharedItemStore, SharedCategoryStore>,
    pub categories: CategoryService<SharedCategoryStore>,
}

pub fn build_services() -> AppServices {
    let ledger: SharedLedgerStore = Arc::new(InMemoryLedgerStore::new());
    let item_store: SharedItemStore = Arc::new(InMemoryItemStore::new());
    let category_store: SharedCategoryStore = Arc::new(InMemoryCategoryStore::new());

    let engine = Arc::new(StockEngine::new(ledger, item_store.clone()));

    AppServices {
        engine: engine.clone(),
        items: ItemService::new(engine, item_store, category_store.clone()),
        categories: CategoryService::new(category_store),
    }
}
