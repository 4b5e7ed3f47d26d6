//! Catalog Pricing
//!
//! Prices a selection of catalog items grouped by category. Unit prices cover single units
//! and combo rules bundle units for a fixed price; the engine greedily applies the combos
//! that save the most and charges whatever is left at unit price.
//!
//! ```
//! use catalog_pricing::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let categories = CategorySet::from_strs(&["FOOD"]);
//! let items = [CatalogItem::new("burger", "Burger", "FOOD")];
//! let rules = [
//!     PricingRule::unit("food", "FOOD", Decimal::from(10)),
//!     PricingRule::quantity_combo("food-10", "FOOD", 10, Decimal::from(90)),
//! ];
//! let selection = SelectionMap::new().with("burger", 13);
//!
//! let result = compute_best_price(&categories, &selection, &items, &rules);
//!
//! assert_eq!(result.total(), Decimal::from(120));
//! assert_eq!(
//!     result.breakdown().get(1).map(String::as_str),
//!     Some("10x FOOD for 90.00 (saves 10.00)")
//! );
//! ```

pub mod catalog;
pub mod categories;
pub mod cli;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod rules;
pub mod solvers;
