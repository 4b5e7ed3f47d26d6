//! Pricing Observer

use rust_decimal::Decimal;

use crate::{categories::Category, rules::PricingRule};

/// Observer for the decisions a solver makes while pricing a selection.
///
/// Every callback has an empty default, so implementors only override what they record.
/// Solvers call [`NoopObserver`] when nobody is watching.
pub trait PricingObserver {
    /// Called for each combo that beats unit pricing, in ranked order.
    ///
    /// `savings` is the saving of a single application.
    fn on_combo_ranked(&mut self, _rule: &PricingRule, _savings: Decimal) {}

    /// Called for each combo dropped because it saves nothing (or costs more).
    fn on_combo_discarded(&mut self, _rule: &PricingRule, _savings: Decimal) {}

    /// Called when a ranked combo is applied `times` times.
    ///
    /// `savings` is the total saving across all applications.
    fn on_combo_applied(&mut self, _rule: &PricingRule, _times: u64, _savings: Decimal) {}

    /// Called for each category with units left over after combos.
    fn on_remainder(&mut self, _category: &Category, _units: u64, _unit_price: Decimal) {}
}

/// Observer that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PricingObserver for NoopObserver {}
