use std::sync::Arc;

use thiserror::Error;

use stocktrace_core::{ExpectedVersion, ItemId};

use crate::entry::{LedgerEntry, UncommittedEntry};

/// Ledger store operation error.
///
/// These are infrastructure errors (storage, concurrency) as opposed to domain
/// errors (validation, invariants).
#[derive(Debug, Error)]
pub enum LedgerStoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    #[error("invalid append: {0}")]
    InvalidAppend(String),
}

/// Append-only ledger of stock movements, one stream per item.
///
/// - **Append-only**: entries cannot be modified; the only delete is the
///   item-cascade purge.
/// - **Monotonic sequencing**: `append` assigns sequence numbers starting at
///   `current_version + 1`, with no gaps and no duplicates within a stream.
/// - **Optimistic locking**: `append` checks an [`ExpectedVersion`] against the
///   stream's current version, so two writers cannot both extend the same
///   "before" state.
/// - **Snapshot reads**: `load_history` takes no locks visible to writers and
///   may lag the latest append.
pub trait LedgerStore: Send + Sync {
    /// Append entries to an item's stream.
    ///
    /// All entries in the batch must target the same item. The whole batch is
    /// persisted atomically or not at all.
    fn append(
        &self,
        entries: Vec<UncommittedEntry>,
        expected_version: ExpectedVersion,
    ) -> Result<Vec<LedgerEntry>, LedgerStoreError>;

    /// Load an item's full stream in ascending sequence order.
    ///
    /// Returns an empty vector for an unknown item (no entries recorded yet).
    fn load_history(&self, item_id: ItemId) -> Result<Vec<LedgerEntry>, LedgerStoreError>;

    /// Current stream version (sequence number of the last entry, 0 if empty).
    fn stream_version(&self, item_id: ItemId) -> Result<u64, LedgerStoreError>;

    /// Remove every entry for an item (cascade delete when the owning item is
    /// deleted). Returns the number of removed entries.
    fn purge_item(&self, item_id: ItemId) -> Result<usize, LedgerStoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn append(
        &self,
        entries: Vec<UncommittedEntry>,
        expected_version: ExpectedVersion,
    ) -> Result<Vec<LedgerEntry>, LedgerStoreError> {
        (**self).append(entries, expected_version)
    }

    fn load_history(&self, item_id: ItemId) -> Result<Vec<LedgerEntry>, LedgerStoreError> {
        (**self).load_history(item_id)
    }

    fn stream_version(&self, item_id: ItemId) -> Result<u64, LedgerStoreError> {
        (**self).stream_version(item_id)
    }

    fn purge_item(&self, item_id: ItemId) -> Result<usize, LedgerStoreError> {
        (**self).purge_item(item_id)
    }
}
