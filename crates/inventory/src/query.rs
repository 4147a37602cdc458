//! Filtering over item listings.

use serde::{Deserialize, Serialize};

use stocktrace_core::CategoryId;

use crate::item::Item;

/// Filter options for listing items. Filters compose conjunctively.
///
/// No pagination: listings return every match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    /// Exact category match.
    pub category: Option<CategoryId>,
    /// Case-insensitive substring match on the item name.
    pub search: Option<String>,
    /// Keep only items at or below their low-stock threshold.
    pub low_stock: bool,
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(category) = self.category {
            if item.category != category {
                return false;
            }
        }

        if let Some(search) = &self.search {
            if !item
                .name
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }

        if self.low_stock && !item.is_low_stock() {
            return false;
        }

        true
    }
}
