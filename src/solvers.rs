//! Solvers for combo pricing

use crate::{
    catalog::{CatalogItem, SelectionMap},
    categories::CategorySet,
    pricing::PriceResult,
    rules::PricingRule,
};

pub mod greedy;
pub mod observer;

/// Trait for pricing a selection against a rule set
pub trait Solver {
    /// Price the selection with the given items and rules.
    ///
    /// Solvers are total over structurally valid input: anything they cannot price
    /// contributes nothing instead of producing an error.
    fn solve(
        categories: &CategorySet,
        selections: &SelectionMap,
        items: &[CatalogItem],
        rules: &[PricingRule],
    ) -> PriceResult;
}
