//! Greedy Combo Solver
//!
//! Ranks every combo by how much one application saves over unit pricing, then walks the
//! ranking once, applying each combo as many times as the remaining category counts allow.
//! Whatever is left is charged at unit price.
//!
//! This is not a global optimum: a higher-ranked combo is never undone to make room for a
//! combination of lower-ranked ones that would have covered more units.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    catalog::{CatalogItem, SelectionMap},
    categories::{Category, CategoryCounts, CategorySet},
    pricing::{AppliedCombo, PriceResult, RemainderLine},
    rules::{PricingRule, RuleKind},
    solvers::{
        Solver,
        observer::{NoopObserver, PricingObserver},
    },
};

/// Unit prices keyed by category.
type UnitPrices<'a> = FxHashMap<&'a Category, Decimal>;

/// Units one application of a combo consumes, merged per category.
type Consumption<'a> = SmallVec<[(&'a Category, u64); 4]>;

/// A combo that beats unit pricing, with the saving of a single application.
#[derive(Debug)]
struct RankedCombo<'a> {
    rule: &'a PricingRule,
    consumption: Consumption<'a>,
    savings: Decimal,
}

/// Greedy, savings-ranked, single-pass combo solver.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedySolver;

impl Solver for GreedySolver {
    fn solve(
        categories: &CategorySet,
        selections: &SelectionMap,
        items: &[CatalogItem],
        rules: &[PricingRule],
    ) -> PriceResult {
        Self::solve_with_observer(categories, selections, items, rules, &mut NoopObserver)
    }
}

impl GreedySolver {
    /// Price the selection, reporting ranking and application decisions to `observer`.
    #[tracing::instrument(
        name = "greedy_solver.solve",
        skip_all,
        fields(
            selection_count = selections.len(),
            rule_count = rules.len(),
            category_count = categories.len()
        )
    )]
    pub fn solve_with_observer<O: PricingObserver + ?Sized>(
        categories: &CategorySet,
        selections: &SelectionMap,
        items: &[CatalogItem],
        rules: &[PricingRule],
        observer: &mut O,
    ) -> PriceResult {
        let selected = category_counts(categories, selections, items);
        let unit_prices = unit_prices(rules);
        let ranked = rank_combos(rules, &unit_prices, observer);

        let mut remaining = selected.clone();
        let mut total = Decimal::ZERO;
        let mut applied_combos = Vec::new();

        for combo in ranked {
            let times = times_applicable(&combo.consumption, &remaining);

            if times == 0 {
                trace!(rule_id = %combo.rule.id, "combo not applicable to remaining units");
                continue;
            }

            for (category, quantity) in &combo.consumption {
                remaining.remove(category, quantity.saturating_mul(times));
            }

            let times_dec = Decimal::from(times);
            let savings = combo.savings.saturating_mul(times_dec);

            total = total.saturating_add(combo.rule.price().saturating_mul(times_dec));

            debug!(
                rule_id = %combo.rule.id,
                shape = %combo.rule.shape(),
                times,
                %savings,
                "applied combo"
            );

            observer.on_combo_applied(combo.rule, times, savings);

            applied_combos.push(AppliedCombo {
                rule: combo.rule.clone(),
                savings,
                times_applied: times,
            });
        }

        let mut remainder = Vec::new();

        for (category, units) in remaining.iter().filter(|(_, units)| *units > 0) {
            let line = RemainderLine {
                category: category.clone(),
                units,
                unit_price: unit_price(&unit_prices, category),
            };

            observer.on_remainder(category, units, line.unit_price);

            total = total.saturating_add(line.line_total());
            remainder.push(line);
        }

        let subtotal = selected.iter().fold(Decimal::ZERO, |acc, (category, units)| {
            let line = unit_price(&unit_prices, category).saturating_mul(Decimal::from(units));

            acc.saturating_add(line)
        });

        debug!(%total, %subtotal, applied = applied_combos.len(), "priced selection");

        PriceResult::new(total, subtotal, applied_combos, remainder, selected)
    }
}

/// Sum selected quantities per category. Unknown items and non-positive quantities are
/// skipped; every configured category is present, at zero if nothing was selected.
fn category_counts(
    categories: &CategorySet,
    selections: &SelectionMap,
    items: &[CatalogItem],
) -> CategoryCounts {
    let mut counts = CategoryCounts::zeroed(categories);

    for (item_id, quantity) in selections.iter() {
        let Some(item) = items.iter().find(|item| item.id == item_id) else {
            trace!(item_id, "skipping unknown item");
            continue;
        };

        if quantity <= 0 {
            trace!(item_id, quantity, "skipping non-positive quantity");
            continue;
        }

        counts.add(&item.category, quantity.unsigned_abs());
    }

    counts
}

/// Later unit rules for the same category overwrite earlier ones.
fn unit_prices(rules: &[PricingRule]) -> UnitPrices<'_> {
    let mut prices = UnitPrices::default();

    for rule in rules {
        if let RuleKind::Unit { category, price } = &rule.kind {
            prices.insert(category, *price);
        }
    }

    prices
}

fn unit_price(unit_prices: &UnitPrices<'_>, category: &Category) -> Decimal {
    unit_prices.get(category).copied().unwrap_or(Decimal::ZERO)
}

/// Units consumed by one application, or `None` when the combo can never apply (a zero
/// quantity, or a mixed combo without requirements). Unit rules are not combos.
fn consumption(rule: &PricingRule) -> Option<Consumption<'_>> {
    match &rule.kind {
        RuleKind::Unit { .. } => None,
        RuleKind::QuantityCombo {
            category, quantity, ..
        } => (*quantity > 0).then(|| SmallVec::from_elem((category, u64::from(*quantity)), 1)),
        RuleKind::MixedCombo { requirements, .. } => {
            if requirements.is_empty() || requirements.iter().any(|req| req.quantity == 0) {
                return None;
            }

            let mut merged = Consumption::new();

            for requirement in requirements {
                let quantity = u64::from(requirement.quantity);

                match merged
                    .iter_mut()
                    .find(|(category, _)| *category == &requirement.category)
                {
                    Some((_, total)) => *total = total.saturating_add(quantity),
                    None => merged.push((&requirement.category, quantity)),
                }
            }

            Some(merged)
        }
    }
}

/// Combos with positive savings, most-saving first. The sort is stable, so equal savings keep
/// their order from `rules`.
fn rank_combos<'a, O: PricingObserver + ?Sized>(
    rules: &'a [PricingRule],
    unit_prices: &UnitPrices<'_>,
    observer: &mut O,
) -> Vec<RankedCombo<'a>> {
    let mut ranked = Vec::new();

    for rule in rules.iter().filter(|rule| rule.is_combo()) {
        let Some(consumption) = consumption(rule) else {
            trace!(rule_id = %rule.id, "skipping combo that can never apply");
            continue;
        };

        let would_pay = consumption
            .iter()
            .fold(Decimal::ZERO, |acc, (category, quantity)| {
                acc.saturating_add(
                    unit_price(unit_prices, category).saturating_mul(Decimal::from(*quantity)),
                )
            });

        let savings = would_pay.saturating_sub(rule.price());

        if savings <= Decimal::ZERO {
            trace!(rule_id = %rule.id, %savings, "discarding combo that does not beat unit pricing");
            observer.on_combo_discarded(rule, savings);
            continue;
        }

        ranked.push(RankedCombo {
            rule,
            consumption,
            savings,
        });
    }

    ranked.sort_by(|a, b| b.savings.cmp(&a.savings));

    for combo in &ranked {
        observer.on_combo_ranked(combo.rule, combo.savings);
    }

    ranked
}

/// How many whole applications fit in the remaining counts. A single exhausted requirement
/// makes this zero.
fn times_applicable(consumption: &Consumption<'_>, remaining: &CategoryCounts) -> u64 {
    consumption
        .iter()
        .map(|(category, quantity)| {
            remaining
                .get(category)
                .checked_div(*quantity)
                .unwrap_or(0)
        })
        .min()
        .unwrap_or(0)
}
