use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocktrace_core::{ActorId, CategoryId, DomainError, DomainResult, ItemId};

/// An inventory item.
///
/// `quantity` is a cached projection of the item's ledger history. Invariant:
/// at any observation point it equals the sum of signed ledger quantities for
/// this item, and is never negative. Only the stock engine mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub category: CategoryId,

    /// Cached current stock level (derived from the ledger).
    pub quantity: i64,

    /// Price per unit in the smallest currency unit (e.g. cents).
    pub price: u64,
    /// Display unit, e.g. "pcs", "kg".
    pub unit: String,
    pub location: Option<String>,
    /// Stock keeping unit; unique across items when present.
    pub sku: Option<String>,

    /// Low-stock boundary: the item is low on stock when `quantity <= threshold`.
    pub threshold: i64,
    pub image: Option<String>,

    pub date_created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub last_updated_by: ActorId,
    pub created_by: ActorId,
}

impl Item {
    /// Low-stock condition: cached quantity at or below the threshold.
    ///
    /// With `threshold = 0` an item is flagged only once its quantity is 0.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.threshold
    }
}

/// Fields supplied when creating an item (generated fields excluded).
///
/// `quantity` here is the *initial* stock; the item itself is born with
/// quantity 0 and the initial stock is seeded through the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub description: Option<String>,
    pub category: CategoryId,
    pub quantity: i64,
    pub price: u64,
    pub unit: String,
    pub location: Option<String>,
    pub sku: Option<String>,
    pub threshold: i64,
    pub image: Option<String>,
}

impl ItemDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.unit.trim().is_empty() {
            return Err(DomainError::validation("unit cannot be empty"));
        }
        if self.quantity < 0 {
            return Err(DomainError::validation("initial quantity cannot be negative"));
        }
        if self.threshold < 0 {
            return Err(DomainError::validation("threshold cannot be negative"));
        }
        if let Some(sku) = &self.sku {
            if sku.trim().is_empty() {
                return Err(DomainError::validation("sku cannot be empty when supplied"));
            }
        }
        Ok(())
    }

    /// Build the item record with quantity 0 (stock is seeded via the ledger).
    pub fn into_item(self, actor: ActorId, now: DateTime<Utc>) -> Item {
        Item {
            id: ItemId::new(),
            name: self.name,
            description: self.description,
            category: self.category,
            quantity: 0,
            price: self.price,
            unit: self.unit,
            location: self.location,
            sku: self.sku,
            threshold: self.threshold,
            image: self.image,
            date_created: now,
            last_updated: now,
            last_updated_by: actor,
            created_by: actor,
        }
    }
}

/// Partial update of an item: absent fields leave existing values unchanged.
///
/// Supplied values apply verbatim, including empty strings for
/// `description`/`location`/`image`. A supplied `quantity` is an absolute
/// override routed through the stock engine, not a plain field write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<CategoryId>,
    pub quantity: Option<i64>,
    pub price: Option<u64>,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub sku: Option<String>,
    pub threshold: Option<i64>,
    pub image: Option<String>,
}

impl ItemPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }
        if let Some(unit) = &self.unit {
            if unit.trim().is_empty() {
                return Err(DomainError::validation("unit cannot be empty"));
            }
        }
        if let Some(q) = self.quantity {
            if q < 0 {
                return Err(DomainError::validation("quantity cannot be negative"));
            }
        }
        if let Some(t) = self.threshold {
            if t < 0 {
                return Err(DomainError::validation("threshold cannot be negative"));
            }
        }
        if let Some(sku) = &self.sku {
            if sku.trim().is_empty() {
                return Err(DomainError::validation("sku cannot be empty when supplied"));
            }
        }
        Ok(())
    }
}
