//! Catalog items and selections

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::categories::Category;

/// A catalog entry. Every item belongs to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique item identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Category the item is priced under
    pub category: Category,
}

impl CatalogItem {
    /// Create a new catalog item.
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<Category>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Requested quantities keyed by item identifier.
///
/// Quantities are signed because they come straight from upstream input; anything
/// non-positive is treated as "not selected" when pricing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMap {
    quantities: FxHashMap<String, i64>,
}

impl SelectionMap {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quantity for an item, returning the previous quantity if there was one.
    pub fn insert(&mut self, item_id: impl Into<String>, quantity: i64) -> Option<i64> {
        self.quantities.insert(item_id.into(), quantity)
    }

    /// Builder-style [`SelectionMap::insert`].
    #[must_use]
    pub fn with(mut self, item_id: impl Into<String>, quantity: i64) -> Self {
        self.insert(item_id, quantity);
        self
    }

    /// Quantity requested for an item, zero when absent.
    pub fn quantity(&self, item_id: &str) -> i64 {
        self.quantities.get(item_id).copied().unwrap_or(0)
    }

    /// Iterate over `(item id, quantity)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.quantities
            .iter()
            .map(|(item_id, quantity)| (item_id.as_str(), *quantity))
    }

    /// Number of entries, including non-positive ones.
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// Whether the selection has no entries.
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for SelectionMap {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        Self {
            quantities: iter
                .into_iter()
                .map(|(item_id, quantity)| (item_id.into(), quantity))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_defaults_to_zero() {
        let selection = SelectionMap::new().with("burger", 2);

        assert_eq!(selection.quantity("burger"), 2);
        assert_eq!(selection.quantity("fries"), 0);
    }

    #[test]
    fn insert_overwrites_previous_quantity() {
        let mut selection = SelectionMap::new();

        assert_eq!(selection.insert("burger", 1), None);
        assert_eq!(selection.insert("burger", 4), Some(1));
        assert_eq!(selection.quantity("burger"), 4);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn collects_from_pairs() {
        let selection: SelectionMap = [("burger", 1), ("cola", -2)].into_iter().collect();

        assert_eq!(selection.len(), 2);
        assert_eq!(selection.quantity("cola"), -2);
    }
}
