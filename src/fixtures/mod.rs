//! Fixtures
//!
//! YAML catalog documents: the category set, the catalog items and the pricing rules for one
//! catalog configuration. Loading validates what the engine itself tolerates silently, so
//! a fixture that loads only references known categories and unique identifiers.

use std::{fs, path::Path};

use rustc_hash::FxHashSet;
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{CatalogItem, SelectionMap},
    categories::{Category, CategorySet},
    fixtures::{
        prices::parse_currency,
        rules::RuleFixture,
    },
    pricing::{PriceResult, compute_best_price},
    rules::PricingRule,
};

pub mod prices;
pub mod rules;

/// Default directory searched by [`Catalog::from_set`].
pub const DEFAULT_BASE_PATH: &str = "./fixtures/catalogs";

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Two items share an identifier
    #[error("Duplicate item id: {0}")]
    DuplicateItem(String),

    /// Two rules share an identifier
    #[error("Duplicate rule id: {0}")]
    DuplicateRule(String),

    /// An item or rule references a category outside the category set
    #[error("Unknown category {category} referenced by {owner}")]
    UnknownCategory {
        /// The unknown category
        category: String,

        /// Item or rule id that referenced it
        owner: String,
    },

    /// A combo that could never apply (zero quantity or no requirements)
    #[error("Combo {0} must require at least one unit of every listed category")]
    InvalidCombo(String),

    /// Item not found in the catalog
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// A selection argument that is not `ITEM=QTY`
    #[error("Invalid selection {0:?}, expected ITEM=QTY")]
    InvalidSelection(String),
}

/// Catalog document from YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// ISO currency code (e.g. "GBP")
    pub currency: String,

    /// Category names, in display order
    pub categories: Vec<String>,

    /// Catalog items
    #[serde(default)]
    pub items: Vec<CatalogItem>,

    /// Pricing rules, in evaluation order
    #[serde(default)]
    pub rules: Vec<RuleFixture>,
}

/// A validated catalog configuration.
#[derive(Debug, Clone)]
pub struct Catalog {
    currency: &'static Currency,
    categories: CategorySet,
    items: Vec<CatalogItem>,
    rules: Vec<PricingRule>,
}

impl Catalog {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails validation.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        debug!(path = %path.display(), "loading catalog fixture");

        Self::from_yaml_str(&contents)
    }

    /// Load a named catalog from [`DEFAULT_BASE_PATH`] (e.g. `"fast_food"`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails validation.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_path(Path::new(DEFAULT_BASE_PATH).join(format!("{name}.yml")))
    }

    /// Parse a catalog from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed or fails validation.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, FixtureError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        Self::try_from(fixture)
    }

    /// Currency used for all prices in the catalog.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The configured category set.
    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Catalog items, in document order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Pricing rules, in document order.
    pub fn rules(&self) -> &[PricingRule] {
        &self.rules
    }

    /// Look up an item by identifier.
    pub fn item(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Build a selection from `ITEM=QTY` arguments. Repeated items accumulate.
    ///
    /// # Errors
    ///
    /// - [`FixtureError::InvalidSelection`]: an argument is not `ITEM=QTY` with an integer
    ///   quantity.
    /// - [`FixtureError::ItemNotFound`]: the item is not part of this catalog.
    pub fn selection_from_pairs<I, S>(&self, pairs: I) -> Result<SelectionMap, FixtureError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = SelectionMap::new();

        for pair in pairs {
            let pair = pair.as_ref();

            let (item_id, quantity) = pair
                .split_once('=')
                .ok_or_else(|| FixtureError::InvalidSelection(pair.to_string()))?;

            let item_id = item_id.trim();

            let quantity = quantity
                .trim()
                .parse::<i64>()
                .map_err(|_err| FixtureError::InvalidSelection(pair.to_string()))?;

            if self.item(item_id).is_none() {
                return Err(FixtureError::ItemNotFound(item_id.to_string()));
            }

            let total = selection.quantity(item_id).saturating_add(quantity);

            selection.insert(item_id, total);
        }

        Ok(selection)
    }

    /// Price a selection against this catalog.
    pub fn price(&self, selections: &SelectionMap) -> PriceResult {
        compute_best_price(&self.categories, selections, &self.items, &self.rules)
    }
}

impl TryFrom<CatalogFixture> for Catalog {
    type Error = FixtureError;

    fn try_from(fixture: CatalogFixture) -> Result<Self, Self::Error> {
        let currency = parse_currency(&fixture.currency)?;
        let categories: CategorySet = fixture.categories.into_iter().map(Category::from).collect();

        let mut item_ids = FxHashSet::default();

        for item in &fixture.items {
            if !item_ids.insert(item.id.as_str()) {
                return Err(FixtureError::DuplicateItem(item.id.clone()));
            }

            ensure_known_category(&categories, &item.category, &item.id)?;
        }

        let mut rule_ids = FxHashSet::default();
        let mut rules = Vec::with_capacity(fixture.rules.len());

        for rule_fixture in fixture.rules {
            if !rule_ids.insert(rule_fixture.id().to_string()) {
                return Err(FixtureError::DuplicateRule(rule_fixture.id().to_string()));
            }

            let rule = PricingRule::try_from(rule_fixture)?;

            for category in rule.categories() {
                ensure_known_category(&categories, category, &rule.id)?;
            }

            rules.push(rule);
        }

        debug!(
            currency = currency.iso_alpha_code,
            categories = categories.len(),
            items = fixture.items.len(),
            rules = rules.len(),
            "loaded catalog"
        );

        Ok(Catalog {
            currency,
            categories,
            items: fixture.items,
            rules,
        })
    }
}

fn ensure_known_category(
    categories: &CategorySet,
    category: &Category,
    owner: &str,
) -> Result<(), FixtureError> {
    if categories.contains(category) {
        Ok(())
    } else {
        Err(FixtureError::UnknownCategory {
            category: category.to_string(),
            owner: owner.to_string(),
        })
    }
}
