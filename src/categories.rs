//! Categories
//!
//! A catalog is partitioned into a fixed set of categories, known when the catalog is
//! configured. The pricing engine counts selected units per category and works only with
//! those counts from then on.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A catalog partition tag, e.g. `FOOD` or `DRINK`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a new category from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The category name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// The closed set of categories for one catalog configuration.
///
/// Order is preserved (first occurrence wins on duplicates), so anything derived from the
/// set, such as per-category counts, iterates in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    categories: SmallVec<[Category; 8]>,
}

impl CategorySet {
    /// Create a category set, dropping duplicates.
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut set = Self::default();

        for category in categories {
            if !set.contains(&category) {
                set.categories.push(category);
            }
        }

        set
    }

    /// Create a category set from string slices.
    pub fn from_strs(names: &[&str]) -> Self {
        Self::new(names.iter().copied().map(Category::from))
    }

    /// Whether the category is part of this set.
    pub fn contains(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    /// Iterate over the categories in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Number of categories in the set.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the set has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a CategorySet {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

/// Unit counts keyed by category, in first-insertion order.
///
/// Lookups are linear scans; category sets are expected to hold tens of entries at most.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    entries: SmallVec<[(Category, u64); 8]>,
}

impl CategoryCounts {
    /// Create counts with every category of the set present at zero.
    pub fn zeroed(categories: &CategorySet) -> Self {
        Self {
            entries: categories.iter().map(|category| (category.clone(), 0)).collect(),
        }
    }

    /// Units counted for a category, zero when absent.
    pub fn get(&self, category: &Category) -> u64 {
        self.entries
            .iter()
            .find(|(key, _)| key == category)
            .map_or(0, |(_, units)| *units)
    }

    /// Add units to a category, inserting it if it is not present yet.
    pub fn add(&mut self, category: &Category, units: u64) {
        match self.entries.iter_mut().find(|(key, _)| key == category) {
            Some((_, count)) => *count = count.saturating_add(units),
            None => self.entries.push((category.clone(), units)),
        }
    }

    /// Remove units from a category, never going below zero.
    pub fn remove(&mut self, category: &Category, units: u64) {
        if let Some((_, count)) = self.entries.iter_mut().find(|(key, _)| key == category) {
            *count = count.saturating_sub(units);
        }
    }

    /// Iterate over `(category, units)` pairs, including zero counts.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, u64)> {
        self.entries.iter().map(|(category, units)| (category, *units))
    }

    /// Total units across all categories.
    pub fn total_units(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, (_, units)| acc.saturating_add(*units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_set_drops_duplicates_and_keeps_first_order() {
        let set = CategorySet::from_strs(&["FOOD", "DRINK", "FOOD", "DESSERT"]);

        let names: Vec<&str> = set.iter().map(Category::as_str).collect();

        assert_eq!(names, vec!["FOOD", "DRINK", "DESSERT"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn category_set_contains() {
        let set = CategorySet::from_strs(&["FOOD"]);

        assert!(set.contains(&Category::from("FOOD")));
        assert!(!set.contains(&Category::from("DRINK")));
    }

    #[test]
    fn zeroed_counts_cover_every_category() {
        let counts = CategoryCounts::zeroed(&CategorySet::from_strs(&["FOOD", "DRINK"]));

        let entries: Vec<(&str, u64)> = counts
            .iter()
            .map(|(category, units)| (category.as_str(), units))
            .collect();

        assert_eq!(entries, vec![("FOOD", 0), ("DRINK", 0)]);
    }

    #[test]
    fn add_inserts_unknown_categories_after_configured_ones() {
        let mut counts = CategoryCounts::zeroed(&CategorySet::from_strs(&["FOOD"]));

        counts.add(&Category::from("SNACK"), 2);
        counts.add(&Category::from("FOOD"), 3);
        counts.add(&Category::from("SNACK"), 1);

        assert_eq!(counts.get(&Category::from("FOOD")), 3);
        assert_eq!(counts.get(&Category::from("SNACK")), 3);
        assert_eq!(counts.total_units(), 6);
    }

    #[test]
    fn remove_saturates_at_zero() {
        let mut counts = CategoryCounts::default();
        let food = Category::from("FOOD");

        counts.add(&food, 2);
        counts.remove(&food, 5);

        assert_eq!(counts.get(&food), 0);
    }

    #[test]
    fn get_missing_category_is_zero() {
        assert_eq!(CategoryCounts::default().get(&Category::from("FOOD")), 0);
    }
}
