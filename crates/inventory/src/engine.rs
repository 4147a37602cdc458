//! The stock engine: the only mutator of an item's cached quantity.
//!
//! Every quantity change is driven by exactly one ledger entry. Within the
//! per-item critical section the ordering is write-ahead: the ledger entry is
//! appended first, the cached quantity applied second, so a crash between the
//! two is recoverable by the reconciliation audit (see [`crate::audit`]).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use stocktrace_core::{ActorId, DomainError, DomainResult, ExpectedVersion, ItemId};
use stocktrace_ledger::{EntryKind, LedgerEntry, LedgerStore, LedgerStoreError, UncommittedEntry};

use crate::item::Item;
use crate::store::ItemStore;

/// Fixed note on entries synthesized from an absolute-quantity override.
pub const QUANTITY_ADJUSTMENT_NOTE: &str = "Quantity adjustment";

/// Fixed note on the seed entry created alongside a new item.
pub const INITIAL_INVENTORY_NOTE: &str = "Initial inventory";

fn store_error(err: LedgerStoreError) -> DomainError {
    match err {
        LedgerStoreError::Conflict(msg) => DomainError::conflict(msg),
        LedgerStoreError::InvalidAppend(msg) => DomainError::invariant(msg),
    }
}

/// Applies stock-changing operations atomically, keeping an item's cached
/// quantity consistent with its ledger history.
///
/// Concurrency: a lock registry keyed by item id serializes the
/// read-check-append-update critical section per item. Operations on different
/// items never contend; no global lock exists. The ledger store's expected-
/// version check stays as a second line of defense — a conflict there surfaces
/// as [`DomainError::Conflict`] and the operation is retried wholesale by the
/// caller rather than looping inside the engine.
#[derive(Debug)]
pub struct StockEngine<L, S> {
    pub(crate) ledger: L,
    pub(crate) items: S,
    locks: RwLock<HashMap<ItemId, Arc<Mutex<()>>>>,
}

impl<L, S> StockEngine<L, S>
where
    L: LedgerStore,
    S: ItemStore,
{
    pub fn new(ledger: L, items: S) -> Self {
        Self {
            ledger,
            items,
            locks: RwLock::new(HashMap::new()),
        }
    }

    fn lock_for(&self, item_id: ItemId) -> DomainResult<Arc<Mutex<()>>> {
        if let Ok(locks) = self.locks.read() {
            if let Some(lock) = locks.get(&item_id) {
                return Ok(lock.clone());
            }
        }

        let mut locks = self
            .locks
            .write()
            .map_err(|_| DomainError::conflict("lock registry poisoned"))?;
        Ok(locks.entry(item_id).or_default().clone())
    }

    fn guard(lock: &Arc<Mutex<()>>) -> DomainResult<MutexGuard<'_, ()>> {
        lock.lock()
            .map_err(|_| DomainError::conflict("item lock poisoned"))
    }

    /// Append one entry and apply its delta to the item's cached quantity.
    ///
    /// Must be called with the item's lock held. Write-ahead ordering: the
    /// ledger append commits before the cache is touched.
    fn commit_entry(
        &self,
        mut item: Item,
        draft: UncommittedEntry,
        actor: ActorId,
    ) -> DomainResult<LedgerEntry> {
        let version = self.ledger.stream_version(item.id).map_err(store_error)?;

        let committed = self
            .ledger
            .append(vec![draft], ExpectedVersion::Exact(version))
            .map_err(store_error)?;
        let entry = committed
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::invariant("append committed no entry"))?;

        item.quantity += entry.signed_quantity();
        item.last_updated = entry.date;
        item.last_updated_by = actor;
        self.items.upsert(item);

        Ok(entry)
    }

    /// Record a stock movement for an item.
    ///
    /// Withdrawals exceeding the current cached quantity fail with
    /// [`DomainError::InsufficientStock`] and leave no partial write.
    pub fn record_transaction(
        &self,
        item_id: ItemId,
        kind: EntryKind,
        quantity: i64,
        notes: Option<String>,
        reference: Option<String>,
        actor: ActorId,
    ) -> DomainResult<LedgerEntry> {
        if quantity <= 0 {
            return Err(DomainError::validation(
                "transaction quantity must be strictly positive",
            ));
        }

        let lock = self.lock_for(item_id)?;
        let _guard = Self::guard(&lock)?;

        let item = self.items.get(item_id).ok_or(DomainError::NotFound)?;

        if kind == EntryKind::Out && item.quantity < quantity {
            return Err(DomainError::insufficient_stock(item.quantity, quantity));
        }

        let mut draft = UncommittedEntry::new(item_id, kind, quantity, actor);
        draft.notes = notes;
        draft.reference = reference;

        let entry = self.commit_entry(item, draft, actor)?;
        tracing::debug!(item_id = %item_id, kind = %kind, quantity, "stock movement recorded");
        Ok(entry)
    }

    /// Set an item's quantity to an absolute value, recording the difference
    /// as a synthesized ledger entry.
    ///
    /// Returns `Ok(None)` when the target equals the current quantity: a no-op
    /// override is never recorded. The withdrawal-sufficiency check does not
    /// apply here — the override is an authoritative correction, not a stock
    /// movement subject to availability; only negative targets are rejected.
    pub fn apply_quantity_override(
        &self,
        item_id: ItemId,
        new_quantity: i64,
        actor: ActorId,
        notes: Option<String>,
    ) -> DomainResult<Option<LedgerEntry>> {
        if new_quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }

        let lock = self.lock_for(item_id)?;
        let _guard = Self::guard(&lock)?;

        let item = self.items.get(item_id).ok_or(DomainError::NotFound)?;

        let difference = new_quantity - item.quantity;
        if difference == 0 {
            return Ok(None);
        }

        let kind = if difference > 0 {
            EntryKind::In
        } else {
            EntryKind::Out
        };
        let draft = UncommittedEntry::new(item_id, kind, difference.abs(), actor)
            .with_notes(notes.unwrap_or_else(|| QUANTITY_ADJUSTMENT_NOTE.to_string()));

        let entry = self.commit_entry(item, draft, actor)?;
        tracing::debug!(item_id = %item_id, new_quantity, "quantity override applied");
        Ok(Some(entry))
    }

    /// Create an item and seed its initial stock as one atomic unit.
    ///
    /// The item record is inserted with quantity 0; a positive
    /// `initial_quantity` is then seeded through the ledger under the same
    /// item lock. If seeding fails the insert is compensated (the item is
    /// removed), so no state survives where quantity and ledger disagree.
    pub fn create_item(
        &self,
        item: Item,
        initial_quantity: i64,
        actor: ActorId,
    ) -> DomainResult<(Item, Option<LedgerEntry>)> {
        if initial_quantity < 0 {
            return Err(DomainError::validation("initial quantity cannot be negative"));
        }

        let item_id = item.id;
        let lock = self.lock_for(item_id)?;
        let _guard = Self::guard(&lock)?;

        if self.items.get(item_id).is_some() {
            return Err(DomainError::conflict("item already exists"));
        }

        self.items.upsert(item.clone());

        if initial_quantity == 0 {
            return Ok((item, None));
        }

        let draft = UncommittedEntry::new(item_id, EntryKind::In, initial_quantity, actor)
            .with_notes(INITIAL_INVENTORY_NOTE);

        match self.commit_entry(item, draft, actor) {
            Ok(entry) => {
                let seeded = self
                    .items
                    .get(item_id)
                    .ok_or_else(|| DomainError::invariant("item vanished during creation"))?;
                Ok((seeded, Some(entry)))
            }
            Err(err) => {
                // Compensation: undo the insert so creation is all-or-nothing.
                self.items.remove(item_id);
                Err(err)
            }
        }
    }

    /// Delete an item, cascading deletion of its entire ledger stream.
    ///
    /// Returns the number of purged ledger entries. Not reversible.
    pub fn delete_item(&self, item_id: ItemId) -> DomainResult<usize> {
        let lock = self.lock_for(item_id)?;
        let purged = {
            let _guard = Self::guard(&lock)?;

            if self.items.get(item_id).is_none() {
                return Err(DomainError::NotFound);
            }

            let purged = self.ledger.purge_item(item_id).map_err(store_error)?;
            self.items.remove(item_id);
            purged
        };

        if let Ok(mut locks) = self.locks.write() {
            locks.remove(&item_id);
        }

        tracing::info!(item_id = %item_id, purged, "item deleted with ledger cascade");
        Ok(purged)
    }

    /// Ledger history for an item, newest first.
    ///
    /// A snapshot read: finite, restartable, and free to lag an in-flight
    /// write on the same item. Returns an empty history for a deleted or
    /// unknown item.
    pub fn history(&self, item_id: ItemId) -> DomainResult<Vec<LedgerEntry>> {
        let mut entries = self.ledger.load_history(item_id).map_err(store_error)?;
        entries.reverse();
        Ok(entries)
    }

    /// Current cached quantity for an item (O(1), no ledger scan).
    pub fn current_quantity(&self, item_id: ItemId) -> DomainResult<i64> {
        self.items
            .get(item_id)
            .map(|i| i.quantity)
            .ok_or(DomainError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    use stocktrace_core::CategoryId;
    use stocktrace_ledger::InMemoryLedgerStore;

    use crate::item::ItemDraft;
    use crate::store::InMemoryItemStore;

    type TestEngine = StockEngine<Arc<InMemoryLedgerStore>, Arc<InMemoryItemStore>>;

    fn engine() -> TestEngine {
        StockEngine::new(
            Arc::new(InMemoryLedgerStore::new()),
            Arc::new(InMemoryItemStore::new()),
        )
    }

    fn draft(quantity: i64, threshold: i64) -> ItemDraft {
        ItemDraft {
            name: "Test Item".to_string(),
            description: None,
            category: CategoryId::new(),
            quantity,
            price: 999,
            unit: "pcs".to_string(),
            location: None,
            sku: None,
            threshold,
            image: None,
        }
    }

    fn seeded_item(engine: &TestEngine, quantity: i64, threshold: i64) -> Item {
        let actor = ActorId::new();
        let item = draft(quantity, threshold).into_item(actor, Utc::now());
        let (item, _) = engine.create_item(item, quantity, actor).unwrap();
        item
    }

    #[test]
    fn creation_with_stock_seeds_one_initial_entry() {
        let engine = engine();
        let item = seeded_item(&engine, 10, 5);

        assert_eq!(item.quantity, 10);
        assert!(!item.is_low_stock());

        let history = engine.history(item.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, EntryKind::In);
        assert_eq!(history[0].quantity, 10);
        assert_eq!(history[0].notes.as_deref(), Some(INITIAL_INVENTORY_NOTE));
    }

    #[test]
    fn creation_without_stock_records_nothing() {
        let engine = engine();
        let item = seeded_item(&engine, 0, 5);

        assert_eq!(item.quantity, 0);
        assert!(engine.history(item.id).unwrap().is_empty());
    }

    #[test]
    fn withdrawal_updates_quantity_and_low_stock() {
        let engine = engine();
        let item = seeded_item(&engine, 10, 5);
        let actor = ActorId::new();

        engine
            .record_transaction(item.id, EntryKind::Out, 6, None, None, actor)
            .unwrap();

        let item = engine.items.get(item.id).unwrap();
        assert_eq!(item.quantity, 4);
        assert!(item.is_low_stock());
        assert_eq!(engine.history(item.id).unwrap().len(), 2);
    }

    #[test]
    fn overdraw_fails_without_partial_write() {
        let engine = engine();
        let item = seeded_item(&engine, 10, 5);
        let actor = ActorId::new();

        engine
            .record_transaction(item.id, EntryKind::Out, 6, None, None, actor)
            .unwrap();

        let err = engine
            .record_transaction(item.id, EntryKind::Out, 10, None, None, actor)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                available: 4,
                requested: 10
            }
        );

        assert_eq!(engine.current_quantity(item.id).unwrap(), 4);
        assert_eq!(engine.history(item.id).unwrap().len(), 2);
    }

    #[test]
    fn withdrawal_of_exact_stock_reaches_zero() {
        let engine = engine();
        let item = seeded_item(&engine, 7, 0);
        let actor = ActorId::new();

        engine
            .record_transaction(item.id, EntryKind::Out, 7, None, None, actor)
            .unwrap();
        assert_eq!(engine.current_quantity(item.id).unwrap(), 0);

        let err = engine
            .record_transaction(item.id, EntryKind::Out, 1, None, None, actor)
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let engine = engine();
        let item = seeded_item(&engine, 5, 0);
        let actor = ActorId::new();

        for q in [0, -3] {
            let err = engine
                .record_transaction(item.id, EntryKind::In, q, None, None, actor)
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[test]
    fn transaction_on_unknown_item_is_not_found() {
        let engine = engine();
        let err = engine
            .record_transaction(ItemId::new(), EntryKind::In, 1, None, None, ActorId::new())
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn override_to_same_quantity_records_nothing() {
        let engine = engine();
        let item = seeded_item(&engine, 4, 0);
        let before = engine.items.get(item.id).unwrap();

        let entry = engine
            .apply_quantity_override(item.id, 4, ActorId::new(), None)
            .unwrap();
        assert!(entry.is_none());

        assert_eq!(engine.items.get(item.id).unwrap(), before);
        assert_eq!(engine.history(item.id).unwrap().len(), 1);
    }

    #[test]
    fn override_records_compensating_entry() {
        let engine = engine();
        let item = seeded_item(&engine, 10, 0);
        let actor = ActorId::new();

        let entry = engine
            .apply_quantity_override(item.id, 3, actor, None)
            .unwrap()
            .unwrap();
        assert_eq!(entry.kind, EntryKind::Out);
        assert_eq!(entry.quantity, 7);
        assert_eq!(entry.notes.as_deref(), Some(QUANTITY_ADJUSTMENT_NOTE));

        assert_eq!(engine.current_quantity(item.id).unwrap(), 3);

        let sum: i64 = engine
            .history(item.id)
            .unwrap()
            .iter()
            .map(|e| e.signed_quantity())
            .sum();
        assert_eq!(sum, 3);
    }

    #[test]
    fn override_upward_records_receipt() {
        let engine = engine();
        let item = seeded_item(&engine, 2, 0);

        let entry = engine
            .apply_quantity_override(item.id, 9, ActorId::new(), None)
            .unwrap()
            .unwrap();
        assert_eq!(entry.kind, EntryKind::In);
        assert_eq!(entry.quantity, 7);
        assert_eq!(engine.current_quantity(item.id).unwrap(), 9);
    }

    #[test]
    fn override_rejects_negative_target() {
        let engine = engine();
        let item = seeded_item(&engine, 2, 0);

        let err = engine
            .apply_quantity_override(item.id, -1, ActorId::new(), None)
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn delete_cascades_ledger_entries() {
        let engine = engine();
        let item = seeded_item(&engine, 10, 0);
        let actor = ActorId::new();

        engine
            .record_transaction(item.id, EntryKind::Out, 2, None, None, actor)
            .unwrap();
        engine
            .record_transaction(item.id, EntryKind::In, 1, None, None, actor)
            .unwrap();

        let purged = engine.delete_item(item.id).unwrap();
        assert_eq!(purged, 3);

        assert!(engine.history(item.id).unwrap().is_empty());
        assert_eq!(engine.current_quantity(item.id).unwrap_err(), DomainError::NotFound);
        assert_eq!(engine.delete_item(item.id).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn history_is_newest_first_and_restartable() {
        let engine = engine();
        let item = seeded_item(&engine, 5, 0);
        let actor = ActorId::new();

        engine
            .record_transaction(item.id, EntryKind::Out, 1, None, None, actor)
            .unwrap();

        let first = engine.history(item.id).unwrap();
        assert_eq!(first[0].kind, EntryKind::Out);
        assert!(first[0].sequence_number > first[1].sequence_number);

        let second = engine.history(item.id).unwrap();
        assert_eq!(first, second);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Receive(i64),
        Withdraw(i64),
        Override(i64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1i64..50).prop_map(Op::Receive),
            (1i64..50).prop_map(Op::Withdraw),
            (0i64..100).prop_map(Op::Override),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after any sequence of accepted operations, the cached
        /// quantity equals the signed ledger sum and never goes negative.
        #[test]
        fn cached_quantity_always_matches_ledger_sum(
            initial in 0i64..50,
            ops in prop::collection::vec(op_strategy(), 1..20)
        ) {
            let engine = engine();
            let actor = ActorId::new();
            let item = draft(initial, 5).into_item(actor, Utc::now());
            let (item, _) = engine.create_item(item, initial, actor).unwrap();

            for op in ops {
                // Rejected operations must leave no trace; accepted ones keep
                // the invariant. Either way the checks below must hold.
                let _ = match op {
                    Op::Receive(q) => engine
                        .record_transaction(item.id, EntryKind::In, q, None, None, actor)
                        .map(|_| ()),
                    Op::Withdraw(q) => engine
                        .record_transaction(item.id, EntryKind::Out, q, None, None, actor)
                        .map(|_| ()),
                    Op::Override(q) => engine
                        .apply_quantity_override(item.id, q, actor, None)
                        .map(|_| ()),
                };

                let cached = engine.current_quantity(item.id).unwrap();
                let ledger_sum: i64 = engine
                    .history(item.id)
                    .unwrap()
                    .iter()
                    .map(|e| e.signed_quantity())
                    .sum();

                prop_assert!(cached >= 0);
                prop_assert_eq!(cached, ledger_sum);
            }
        }
    }
}
