//! Pricing Rule Fixtures

use serde::Deserialize;

use crate::{
    categories::Category,
    fixtures::{FixtureError, prices::parse_price},
    rules::{ComboRequirement, PricingRule, RuleKind},
};

/// Pricing rule from YAML, tagged by `type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleFixture {
    /// Per-unit price for a category
    Unit {
        /// Rule identifier
        id: String,

        /// Priced category
        category: String,

        /// Unit price (e.g. "10.00")
        price: String,
    },

    /// Bundle of one category
    QuantityCombo {
        /// Rule identifier
        id: String,

        /// Category the bundle draws from
        category: String,

        /// Units per bundle
        quantity: u32,

        /// Bundle price
        price: String,
    },

    /// Bundle across several categories
    MixedCombo {
        /// Rule identifier
        id: String,

        /// Units required from each category
        requirements: Vec<RequirementFixture>,

        /// Bundle price
        price: String,
    },
}

/// One mixed-combo requirement from YAML.
#[derive(Debug, Deserialize)]
pub struct RequirementFixture {
    /// Category the units are taken from
    pub category: String,

    /// Units per bundle
    pub quantity: u32,
}

impl RuleFixture {
    /// The rule identifier.
    pub fn id(&self) -> &str {
        match self {
            RuleFixture::Unit { id, .. }
            | RuleFixture::QuantityCombo { id, .. }
            | RuleFixture::MixedCombo { id, .. } => id,
        }
    }
}

impl TryFrom<RuleFixture> for PricingRule {
    type Error = FixtureError;

    fn try_from(fixture: RuleFixture) -> Result<Self, Self::Error> {
        match fixture {
            RuleFixture::Unit {
                id,
                category,
                price,
            } => Ok(PricingRule {
                kind: RuleKind::Unit {
                    category: Category::from(category),
                    price: parse_price(&price)?,
                },
                id,
            }),
            RuleFixture::QuantityCombo {
                id,
                category,
                quantity,
                price,
            } => {
                if quantity == 0 {
                    return Err(FixtureError::InvalidCombo(id));
                }

                Ok(PricingRule {
                    kind: RuleKind::QuantityCombo {
                        category: Category::from(category),
                        quantity,
                        price: parse_price(&price)?,
                    },
                    id,
                })
            }
            RuleFixture::MixedCombo {
                id,
                requirements,
                price,
            } => {
                if requirements.is_empty() || requirements.iter().any(|req| req.quantity == 0) {
                    return Err(FixtureError::InvalidCombo(id));
                }

                Ok(PricingRule {
                    kind: RuleKind::MixedCombo {
                        requirements: requirements
                            .into_iter()
                            .map(|req| ComboRequirement::new(req.category, req.quantity))
                            .collect(),
                        price: parse_price(&price)?,
                    },
                    id,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_mixed_combo() -> TestResult {
        let yaml = r#"
type: mixed_combo
id: meal
price: "12.00"
requirements:
  - { category: FOOD, quantity: 1 }
  - { category: DRINK, quantity: 2 }
"#;
        let fixture: RuleFixture = serde_norway::from_str(yaml)?;

        assert_eq!(fixture.id(), "meal");

        let rule = PricingRule::try_from(fixture)?;

        assert_eq!(
            rule,
            PricingRule::mixed_combo("meal", [("FOOD", 1), ("DRINK", 2)], dec!(12))
        );

        Ok(())
    }

    #[test]
    fn rejects_unknown_rule_type() {
        let yaml = r#"
type: percentage_off
id: sale
price: "0.10"
"#;
        let result: Result<RuleFixture, _> = serde_norway::from_str(yaml);

        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_quantity_combo() -> TestResult {
        let fixture: RuleFixture = serde_norway::from_str(
            r#"{ type: quantity_combo, id: free, category: FOOD, quantity: 0, price: "1" }"#,
        )?;

        assert!(matches!(
            PricingRule::try_from(fixture),
            Err(FixtureError::InvalidCombo(id)) if id == "free"
        ));

        Ok(())
    }

    #[test]
    fn rejects_mixed_combo_without_requirements() -> TestResult {
        let fixture: RuleFixture =
            serde_norway::from_str(r#"{ type: mixed_combo, id: empty, requirements: [], price: "1" }"#)?;

        assert!(matches!(
            PricingRule::try_from(fixture),
            Err(FixtureError::InvalidCombo(_))
        ));

        Ok(())
    }

    #[test]
    fn rejects_negative_unit_price() -> TestResult {
        let fixture: RuleFixture = serde_norway::from_str(
            r#"{ type: unit, id: food, category: FOOD, price: "-3" }"#,
        )?;

        assert!(matches!(
            PricingRule::try_from(fixture),
            Err(FixtureError::InvalidPrice(_))
        ));

        Ok(())
    }
}
