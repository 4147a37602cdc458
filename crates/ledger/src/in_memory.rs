use std::collections::HashMap;
use std::sync::RwLock;

use stocktrace_core::{ExpectedVersion, ItemId};

use crate::entry::{LedgerEntry, UncommittedEntry};
use crate::store::{LedgerStore, LedgerStoreError};

/// In-memory append-only ledger store.
///
/// The default backend; also used by tests. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    streams: RwLock<HashMap<ItemId, Vec<LedgerEntry>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_version(stream: &[LedgerEntry]) -> u64 {
        stream.last().map(|e| e.sequence_number).unwrap_or(0)
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn append(
        &self,
        entries: Vec<UncommittedEntry>,
        expected_version: ExpectedVersion,
    ) -> Result<Vec<LedgerEntry>, LedgerStoreError> {
        if entries.is_empty() {
            return Ok(vec![]);
        }

        // All entries must target the same item stream.
        let item_id = entries[0].item_id;
        for (idx, e) in entries.iter().enumerate() {
            if e.item_id != item_id {
                return Err(LedgerStoreError::InvalidAppend(format!(
                    "batch contains multiple item_ids (index {idx})"
                )));
            }
            if e.quantity <= 0 {
                return Err(LedgerStoreError::InvalidAppend(format!(
                    "entry quantity must be strictly positive (index {idx})"
                )));
            }
        }

        let mut streams = self
            .streams
            .write()
            .map_err(|_| LedgerStoreError::InvalidAppend("lock poisoned".to_string()))?;

        let stream = streams.entry(item_id).or_default();
        let current = Self::current_version(stream);

        if !expected_version.matches(current) {
            return Err(LedgerStoreError::Conflict(format!(
                "expected {expected_version:?}, found {current}"
            )));
        }

        // Assign sequence numbers and append (append-only).
        let mut next = current + 1;
        let mut committed = Vec::with_capacity(entries.len());
        for e in entries {
            let stored = LedgerEntry {
                entry_id: e.entry_id,
                item_id: e.item_id,
                kind: e.kind,
                quantity: e.quantity,
                sequence_number: next,
                date: e.date,
                notes: e.notes,
                reference: e.reference,
                performed_by: e.performed_by,
            };
            next += 1;
            stream.push(stored.clone());
            committed.push(stored);
        }

        Ok(committed)
    }

    fn load_history(&self, item_id: ItemId) -> Result<Vec<LedgerEntry>, LedgerStoreError> {
        let streams = self
            .streams
            .read()
            .map_err(|_| LedgerStoreError::InvalidAppend("lock poisoned".to_string()))?;

        Ok(streams.get(&item_id).cloned().unwrap_or_default())
    }

    fn stream_version(&self, item_id: ItemId) -> Result<u64, LedgerStoreError> {
        let streams = self
            .streams
            .read()
            .map_err(|_| LedgerStoreError::InvalidAppend("lock poisoned".to_string()))?;

        Ok(streams
            .get(&item_id)
            .map(|s| Self::current_version(s))
            .unwrap_or(0))
    }

    fn purge_item(&self, item_id: ItemId) -> Result<usize, LedgerStoreError> {
        let mut streams = self
            .streams
            .write()
            .map_err(|_| LedgerStoreError::InvalidAppend("lock poisoned".to_string()))?;

        Ok(streams.remove(&item_id).map(|s| s.len()).unwrap_or(0))
    }
}
