//! `stocktrace-ledger` — append-only stock movement ledger.
//!
//! Every stock movement is an immutable entry in a per-item stream. Entries are
//! never updated; the only deletion is the cascade purge when an item itself is
//! deleted. The item's cached quantity elsewhere is a projection of this log.

pub mod entry;
pub mod in_memory;
pub mod store;

pub use entry::{EntryKind, LedgerEntry, UncommittedEntry};
pub use in_memory::InMemoryLedgerStore;
pub use store::{LedgerStore, LedgerStoreError};
