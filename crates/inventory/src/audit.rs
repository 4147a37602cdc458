//! Offline reconciliation of cached quantities against the ledger.
//!
//! The cached quantity is kept consistent by construction at every write; this
//! audit exists for drift *detection* (e.g. after a crash between ledger
//! append and cache update). It is not part of the hot path.

use stocktrace_core::{DomainError, DomainResult, ItemId};
use stocktrace_ledger::LedgerStore;

use crate::engine::StockEngine;
use crate::store::ItemStore;

/// Comparison of one item's cached quantity against its ledger net sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityAudit {
    pub item_id: ItemId,
    pub cached: i64,
    pub ledger_sum: i64,
}

impl QuantityAudit {
    /// Cached minus ledger; 0 means the projection is consistent.
    pub fn drift(&self) -> i64 {
        self.cached - self.ledger_sum
    }

    pub fn is_consistent(&self) -> bool {
        self.drift() == 0
    }
}

impl<L, S> StockEngine<L, S>
where
    L: LedgerStore,
    S: ItemStore,
{
    /// Audit a single item's cached quantity against its ledger history.
    pub fn audit_item(&self, item_id: ItemId) -> DomainResult<QuantityAudit> {
        let item = self.items.get(item_id).ok_or(DomainError::NotFound)?;

        let ledger_sum = self
            .ledger
            .load_history(item_id)
            .map_err(|e| DomainError::invariant(e.to_string()))?
            .iter()
            .map(|e| e.signed_quantity())
            .sum();

        Ok(QuantityAudit {
            item_id,
            cached: item.quantity,
            ledger_sum,
        })
    }

    /// Audit every item. Intended for an offline job, not request handling.
    pub fn audit_all(&self) -> DomainResult<Vec<QuantityAudit>> {
        self.items
            .list()
            .into_iter()
            .map(|item| self.audit_item(item.id))
            .collect()
    }

    /// Audits that found drift, across all items.
    pub fn drifted(&self) -> DomainResult<Vec<QuantityAudit>> {
        Ok(self
            .audit_all()?
            .into_iter()
            .filter(|a| !a.is_consistent())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use stocktrace_core::{ActorId, CategoryId};
    use stocktrace_ledger::{EntryKind, InMemoryLedgerStore};

    use crate::item::ItemDraft;
    use crate::store::InMemoryItemStore;

    fn engine() -> StockEngine<Arc<InMemoryLedgerStore>, Arc<InMemoryItemStore>> {
        StockEngine::new(
            Arc::new(InMemoryLedgerStore::new()),
            Arc::new(InMemoryItemStore::new()),
        )
    }

    fn seeded(engine: &StockEngine<Arc<InMemoryLedgerStore>, Arc<InMemoryItemStore>>) -> ItemId {
        let actor = ActorId::new();
        let item = ItemDraft {
            name: "Audited".to_string(),
            description: None,
            category: CategoryId::new(),
            quantity: 10,
            price: 100,
            unit: "pcs".to_string(),
            location: None,
            sku: None,
            threshold: 0,
            image: None,
        }
        .into_item(actor, Utc::now());
        engine.create_item(item, 10, actor).unwrap().0.id
    }

    #[test]
    fn consistent_item_has_zero_drift() {
        let engine = engine();
        let item_id = seeded(&engine);
        engine
            .record_transaction(item_id, EntryKind::Out, 4, None, None, ActorId::new())
            .unwrap();

        let audit = engine.audit_item(item_id).unwrap();
        assert_eq!(audit.cached, 6);
        assert_eq!(audit.ledger_sum, 6);
        assert!(audit.is_consistent());
        assert!(engine.drifted().unwrap().is_empty());
    }

    #[test]
    fn tampered_cache_is_detected() {
        let engine = engine();
        let item_id = seeded(&engine);

        // Simulate a crash between ledger append and cache update by writing
        // the cache behind the engine's back.
        let mut item = engine.items.get(item_id).unwrap();
        item.quantity = 3;
        engine.items.upsert(item);

        let audit = engine.audit_item(item_id).unwrap();
        assert_eq!(audit.drift(), -7);
        assert_eq!(engine.drifted().unwrap().len(), 1);
    }

    #[test]
    fn audit_of_unknown_item_is_not_found() {
        let engine = engine();
        assert_eq!(
            engine.audit_item(ItemId::new()).unwrap_err(),
            DomainError::NotFound
        );
    }
}
