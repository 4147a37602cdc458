use serde::Deserialize;

use stocktrace_inventory::{Category, Item};
use stocktrace_ledger::LedgerEntry;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub description: Option<String>,
    /// Category id (UUID string).
    pub category: String,
    /// Initial stock; seeded through the ledger when positive.
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: u64,
    pub unit: String,
    pub location: Option<String>,
    pub sku: Option<String>,
    #[serde(default)]
    pub threshold: i64,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<u64>,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub sku: Option<String>,
    pub threshold: Option<i64>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordTransactionRequest {
    /// "in" or "out".
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: i64,
    pub notes: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListItemsParams {
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "lowStock")]
    pub low_stock: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn item_to_json(item: &Item) -> serde_json::Value {
    serde_json::json!({
        "id": item.id.to_string(),
        "name": item.name,
        "description": item.description,
        "category": item.category.to_string(),
        "quantity": item.quantity,
        "price": item.price,
        "unit": item.unit,
        "location": item.location,
        "sku": item.sku,
        "threshold": item.threshold,
        "image": item.image,
        "low_stock": item.is_low_stock(),
        "date_created": item.date_created.to_rfc3339(),
        "last_updated": item.last_updated.to_rfc3339(),
        "last_updated_by": item.last_updated_by.to_string(),
        "created_by": item.created_by.to_string(),
    })
}

pub fn entry_to_json(entry: &LedgerEntry) -> serde_json::Value {
    serde_json::json!({
        "id": entry.entry_id.to_string(),
        "item": entry.item_id.to_string(),
        "type": entry.kind.to_string(),
        "quantity": entry.quantity,
        "sequence_number": entry.sequence_number,
        "date": entry.date.to_rfc3339(),
        "notes": entry.notes,
        "reference": entry.reference,
        "performed_by": entry.performed_by.to_string(),
    })
}

pub fn category_to_json(category: &Category) -> serde_json::Value {
    serde_json::json!({
        "id": category.id.to_string(),
        "name": category.name,
        "description": category.description,
        "created_by": category.created_by.to_string(),
        "date_created": category.date_created.to_rfc3339(),
    })
}
