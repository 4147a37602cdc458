//! `stocktrace-inventory` — items, categories, and the stock engine.
//!
//! The invariant at the heart of this crate: an item's cached `quantity` always
//! equals the net sum of its ledger history, and never goes negative. The
//! [`engine::StockEngine`] is the only mutator of that field; every change it
//! makes is driven by exactly one ledger entry, written ahead of the cache
//! update inside a per-item critical section.

pub mod audit;
pub mod category;
pub mod engine;
pub mod item;
pub mod query;
pub mod service;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use audit::QuantityAudit;
pub use category::{Category, CategoryService, CategoryStore, InMemoryCategoryStore};
pub use engine::{INITIAL_INVENTORY_NOTE, QUANTITY_ADJUSTMENT_NOTE, StockEngine};
pub use item::{Item, ItemDraft, ItemPatch};
pub use query::ItemFilter;
pub use service::ItemService;
pub use store::{InMemoryItemStore, ItemStore};
