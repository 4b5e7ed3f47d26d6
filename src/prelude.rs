//! Catalog Pricing prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{CatalogItem, SelectionMap},
    categories::{Category, CategoryCounts, CategorySet},
    fixtures::{Catalog, FixtureError},
    pricing::{AppliedCombo, PriceResult, RemainderLine, compute_best_price},
    receipt::{Receipt, ReceiptError},
    rules::{ComboRequirement, PricingRule, RuleKind},
    solvers::{
        Solver,
        greedy::GreedySolver,
        observer::{NoopObserver, PricingObserver},
    },
};
