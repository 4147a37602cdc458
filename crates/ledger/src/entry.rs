use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocktrace_core::{ActorId, EntryId, ItemId};

/// Direction of a stock movement.
///
/// Exactly two cases; each carries a sign used uniformly by the quantity
/// arithmetic. Serialized as `"in"` / `"out"` on the wire and in storage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Receipt: stock flows into the location.
    In,
    /// Withdrawal: stock flows out of the location.
    Out,
}

impl EntryKind {
    /// Sign applied to the entry quantity when summing a ledger stream.
    pub fn sign(self) -> i64 {
        match self {
            EntryKind::In => 1,
            EntryKind::Out => -1,
        }
    }
}

impl core::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EntryKind::In => f.write_str("in"),
            EntryKind::Out => f.write_str("out"),
        }
    }
}

/// An entry ready to be appended to an item's stream (no sequence number yet).
///
/// The ledger store assigns sequence numbers during append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncommittedEntry {
    pub entry_id: EntryId,
    pub item_id: ItemId,
    pub kind: EntryKind,
    /// Strictly positive movement amount (direction lives in `kind`).
    pub quantity: i64,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    /// External document id (e.g. purchase order, delivery note).
    pub reference: Option<String>,
    pub performed_by: ActorId,
}

impl UncommittedEntry {
    pub fn new(
        item_id: ItemId,
        kind: EntryKind,
        quantity: i64,
        performed_by: ActorId,
    ) -> Self {
        Self {
            entry_id: EntryId::new(),
            item_id,
            kind,
            quantity,
            date: Utc::now(),
            notes: None,
            reference: None,
            performed_by,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// A committed ledger entry (assigned a sequence number). Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: EntryId,
    pub item_id: ItemId,
    pub kind: EntryKind,
    pub quantity: i64,

    /// Monotonically increasing position in the item's stream.
    pub sequence_number: u64,

    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub reference: Option<String>,
    pub performed_by: ActorId,
}

impl LedgerEntry {
    /// Quantity with the movement's sign applied (`in` positive, `out` negative).
    pub fn signed_quantity(&self) -> i64 {
        self.kind.sign() * self.quantity
    }
}
