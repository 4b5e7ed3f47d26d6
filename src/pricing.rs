//! Pricing
//!
//! Entry point of the engine plus the result types it produces.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    catalog::{CatalogItem, SelectionMap},
    categories::{Category, CategoryCounts, CategorySet},
    rules::PricingRule,
    solvers::{Solver, greedy::GreedySolver},
};

/// First line of a non-empty breakdown.
pub const BREAKDOWN_HEADER: &str = "Applied combos:";

/// A combo that was applied at least once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCombo {
    /// The applied rule
    pub rule: PricingRule,

    /// Savings per application multiplied by `times_applied`
    pub savings: Decimal,

    /// Number of times the combo was applied (always >= 1)
    pub times_applied: u64,
}

/// Units of a category left over after combos, priced individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemainderLine {
    /// Category the units belong to
    pub category: Category,

    /// Units priced at unit price
    pub units: u64,

    /// Unit price used (zero when no unit rule exists)
    pub unit_price: Decimal,
}

impl RemainderLine {
    /// Total charged for the remainder of this category.
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.units))
    }
}

/// Result of pricing a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceResult {
    total: Decimal,
    subtotal: Decimal,
    applied_combos: Vec<AppliedCombo>,
    remainder: Vec<RemainderLine>,
    selected: CategoryCounts,
    breakdown: Vec<String>,
}

impl PriceResult {
    /// Assemble a result. The breakdown is derived from `applied_combos`.
    pub fn new(
        total: Decimal,
        subtotal: Decimal,
        applied_combos: Vec<AppliedCombo>,
        remainder: Vec<RemainderLine>,
        selected: CategoryCounts,
    ) -> Self {
        let breakdown = breakdown_lines(&applied_combos);

        Self {
            total,
            subtotal,
            applied_combos,
            remainder,
            selected,
            breakdown,
        }
    }

    /// Total price after combos and remainder pricing.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// What the whole selection would cost at unit prices alone.
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Applied combos, most-saving-per-application first.
    pub fn applied_combos(&self) -> &[AppliedCombo] {
        &self.applied_combos
    }

    /// Categories with units left over after combos, in category order.
    pub fn remainder(&self) -> &[RemainderLine] {
        &self.remainder
    }

    /// Human-readable breakdown, empty when no combo was applied.
    pub fn breakdown(&self) -> &[String] {
        &self.breakdown
    }

    /// Selected units per category, before any combo was applied.
    pub fn selected(&self) -> &CategoryCounts {
        &self.selected
    }

    /// Units of a category priced at unit price.
    pub fn remaining_units(&self, category: &Category) -> u64 {
        self.remainder
            .iter()
            .find(|line| &line.category == category)
            .map_or(0, |line| line.units)
    }

    /// Units of a category consumed by combos.
    pub fn covered_units(&self, category: &Category) -> u64 {
        self.selected
            .get(category)
            .saturating_sub(self.remaining_units(category))
    }

    /// Amount saved relative to pricing everything at unit price.
    ///
    /// Negative only when a rule set has no unit prices and combos were still charged.
    pub fn savings(&self) -> Decimal {
        self.subtotal.saturating_sub(self.total)
    }

    /// Savings as a fraction of the subtotal, zero when the subtotal is zero.
    pub fn savings_percent(&self) -> Percentage {
        let fraction = self
            .savings()
            .checked_div(self.subtotal)
            .unwrap_or(Decimal::ZERO);

        Percentage::from(fraction)
    }
}

/// Price a selection at the lowest cost the greedy combo pass can find.
///
/// Never fails: unknown items are skipped, missing unit prices count as zero and combos that
/// do not beat unit pricing are ignored.
pub fn compute_best_price(
    categories: &CategorySet,
    selections: &SelectionMap,
    items: &[CatalogItem],
    rules: &[PricingRule],
) -> PriceResult {
    GreedySolver::solve(categories, selections, items, rules)
}

/// Render a monetary value with exactly two decimal places.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    format!("{rounded:.2}")
}

/// Build the breakdown lines for a list of applied combos.
pub fn breakdown_lines(applied_combos: &[AppliedCombo]) -> Vec<String> {
    if applied_combos.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::with_capacity(applied_combos.len() + 1);

    lines.push(BREAKDOWN_HEADER.to_string());

    lines.extend(applied_combos.iter().map(|applied| {
        format!(
            "{} for {} (saves {})",
            applied.rule.shape(),
            format_amount(applied.rule.price()),
            format_amount(applied.savings)
        )
    }));

    lines
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn applied(rule: PricingRule, savings: Decimal, times_applied: u64) -> AppliedCombo {
        AppliedCombo {
            rule,
            savings,
            times_applied,
        }
    }

    #[test]
    fn format_amount_pads_and_rounds() {
        assert_eq!(format_amount(dec!(90)), "90.00");
        assert_eq!(format_amount(dec!(7.5)), "7.50");
        assert_eq!(format_amount(dec!(0.125)), "0.13");
    }

    #[test]
    fn breakdown_is_empty_without_combos() {
        assert!(breakdown_lines(&[]).is_empty());
    }

    #[test]
    fn breakdown_lists_header_then_one_line_per_combo() {
        let lines = breakdown_lines(&[
            applied(
                PricingRule::quantity_combo("food-10", "FOOD", 10, dec!(90)),
                dec!(10),
                1,
            ),
            applied(
                PricingRule::mixed_combo("meal", [("FOOD", 5), ("DRINK", 5)], dec!(60)),
                dec!(30),
                2,
            ),
        ]);

        assert_eq!(
            lines,
            vec![
                "Applied combos:".to_string(),
                "10x FOOD for 90.00 (saves 10.00)".to_string(),
                "5x FOOD + 5x DRINK for 60.00 (saves 30.00)".to_string(),
            ]
        );
    }

    #[test]
    fn savings_percent_is_relative_to_subtotal() {
        let result = PriceResult::new(
            dec!(75),
            dec!(100),
            Vec::new(),
            Vec::new(),
            CategoryCounts::default(),
        );

        assert_eq!(result.savings(), dec!(25));
        assert_eq!(result.savings_percent() * Decimal::ONE, dec!(0.25));
    }

    #[test]
    fn savings_percent_is_zero_for_zero_subtotal() {
        let result = PriceResult::new(
            Decimal::ZERO,
            Decimal::ZERO,
            Vec::new(),
            Vec::new(),
            CategoryCounts::default(),
        );

        assert_eq!(result.savings_percent() * Decimal::ONE, Decimal::ZERO);
    }

    #[test]
    fn covered_units_are_selected_minus_remaining() {
        let food = Category::from("FOOD");
        let mut selected = CategoryCounts::default();

        selected.add(&food, 13);

        let result = PriceResult::new(
            dec!(120),
            dec!(130),
            Vec::new(),
            vec![RemainderLine {
                category: food.clone(),
                units: 3,
                unit_price: dec!(10),
            }],
            selected,
        );

        assert_eq!(result.remaining_units(&food), 3);
        assert_eq!(result.covered_units(&food), 10);
        assert_eq!(result.remainder().first().map(RemainderLine::line_total), Some(dec!(30)));
    }
}
