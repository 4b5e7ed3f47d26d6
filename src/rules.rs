//! Pricing Rules

use std::fmt;

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::categories::Category;

/// One `(category, quantity)` requirement of a mixed combo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboRequirement {
    /// Category the units are taken from
    pub category: Category,

    /// Units consumed from the category per application
    pub quantity: u32,
}

impl ComboRequirement {
    /// Create a new requirement.
    pub fn new(category: impl Into<Category>, quantity: u32) -> Self {
        Self {
            category: category.into(),
            quantity,
        }
    }
}

impl fmt::Display for ComboRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x {}", self.quantity, self.category)
    }
}

/// The shape of a pricing rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// Per-unit price for every unit of a category not covered by a combo.
    Unit {
        /// Priced category
        category: Category,

        /// Price of a single unit
        price: Decimal,
    },

    /// `quantity` units of one category for a bundle price.
    QuantityCombo {
        /// Category the bundle draws from
        category: Category,

        /// Units consumed per application
        quantity: u32,

        /// Bundle price per application
        price: Decimal,
    },

    /// Fixed quantities from several categories at once for a bundle price.
    MixedCombo {
        /// Units consumed from each category per application
        requirements: SmallVec<[ComboRequirement; 4]>,

        /// Bundle price per application
        price: Decimal,
    },
}

/// A pricing rule: a unit price or a combo discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingRule {
    /// Unique rule identifier
    pub id: String,

    /// What the rule prices and how
    pub kind: RuleKind,
}

impl PricingRule {
    /// Create a unit price rule.
    pub fn unit(id: impl Into<String>, category: impl Into<Category>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            kind: RuleKind::Unit {
                category: category.into(),
                price,
            },
        }
    }

    /// Create a single-category quantity combo.
    pub fn quantity_combo(
        id: impl Into<String>,
        category: impl Into<Category>,
        quantity: u32,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            kind: RuleKind::QuantityCombo {
                category: category.into(),
                quantity,
                price,
            },
        }
    }

    /// Create a mixed combo from `(category, quantity)` pairs.
    pub fn mixed_combo<C: Into<Category>>(
        id: impl Into<String>,
        requirements: impl IntoIterator<Item = (C, u32)>,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            kind: RuleKind::MixedCombo {
                requirements: requirements
                    .into_iter()
                    .map(|(category, quantity)| ComboRequirement::new(category, quantity))
                    .collect(),
                price,
            },
        }
    }

    /// Unit price or bundle price, depending on the rule kind.
    pub fn price(&self) -> Decimal {
        match &self.kind {
            RuleKind::Unit { price, .. }
            | RuleKind::QuantityCombo { price, .. }
            | RuleKind::MixedCombo { price, .. } => *price,
        }
    }

    /// Whether this rule is a combo (anything other than a unit price).
    pub fn is_combo(&self) -> bool {
        !matches!(self.kind, RuleKind::Unit { .. })
    }

    /// Every category the rule references, in declaration order.
    pub fn categories(&self) -> SmallVec<[&Category; 4]> {
        match &self.kind {
            RuleKind::Unit { category, .. } | RuleKind::QuantityCombo { category, .. } => {
                SmallVec::from_elem(category, 1)
            }
            RuleKind::MixedCombo { requirements, .. } => requirements
                .iter()
                .map(|requirement| &requirement.category)
                .collect(),
        }
    }

    /// Describes what one application of the rule covers, e.g. `10x FOOD` or
    /// `5x FOOD + 5x DRINK`. Unit rules describe a single unit.
    pub fn shape(&self) -> String {
        match &self.kind {
            RuleKind::Unit { category, .. } => format!("1x {category}"),
            RuleKind::QuantityCombo {
                category, quantity, ..
            } => format!("{quantity}x {category}"),
            RuleKind::MixedCombo { requirements, .. } => requirements
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" + "),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn price_reads_through_every_kind() {
        assert_eq!(PricingRule::unit("u", "FOOD", dec!(10)).price(), dec!(10));
        assert_eq!(
            PricingRule::quantity_combo("q", "FOOD", 10, dec!(90)).price(),
            dec!(90)
        );
        assert_eq!(
            PricingRule::mixed_combo("m", [("FOOD", 1), ("DRINK", 1)], dec!(12)).price(),
            dec!(12)
        );
    }

    #[test]
    fn unit_rules_are_not_combos() {
        assert!(!PricingRule::unit("u", "FOOD", dec!(10)).is_combo());
        assert!(PricingRule::quantity_combo("q", "FOOD", 2, dec!(15)).is_combo());
        assert!(PricingRule::mixed_combo("m", [("FOOD", 1)], dec!(5)).is_combo());
    }

    #[test]
    fn shape_formats_quantity_and_mixed_combos() {
        let quantity = PricingRule::quantity_combo("q", "FOOD", 10, dec!(90));
        let mixed = PricingRule::mixed_combo("m", [("FOOD", 5), ("DRINK", 5)], dec!(60));

        assert_eq!(quantity.shape(), "10x FOOD");
        assert_eq!(mixed.shape(), "5x FOOD + 5x DRINK");
    }

    #[test]
    fn categories_lists_mixed_requirements_in_order() {
        let mixed = PricingRule::mixed_combo("m", [("DRINK", 1), ("FOOD", 2)], dec!(8));

        let names: Vec<&str> = mixed.categories().iter().map(|c| c.as_str()).collect();

        assert_eq!(names, vec!["DRINK", "FOOD"]);
    }
}
