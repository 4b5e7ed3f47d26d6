//! Receipt
//!
//! Terminal rendering of a [`PriceResult`]: one row per applied combo, one row per category
//! priced at unit price, then a subtotal/total/savings summary.

use std::{fmt::Write as _, io};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::pricing::{AppliedCombo, PriceResult, RemainderLine};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The output could not be written.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// A priced selection ready for display in a given currency.
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'a> {
    result: &'a PriceResult,
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Create a receipt for a pricing result.
    pub fn new(result: &'a PriceResult, currency: &'static Currency) -> Self {
        Self { result, currency }
    }

    /// The underlying pricing result.
    pub fn result(&self) -> &'a PriceResult {
        self.result
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Writes the receipt table and summary.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError::Io`] if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Pricing", "Units", "Price", "Line Total", "Savings"]);

        for (idx, applied) in self.result.applied_combos().iter().enumerate() {
            builder.push_record(self.combo_row(idx, applied));
        }

        for line in self.result.remainder() {
            builder.push_record(self.remainder_row(line));
        }

        let has_rows = !self.result.applied_combos().is_empty() || !self.result.remainder().is_empty();

        if has_rows {
            write_table(&mut out, builder)?;
        } else {
            writeln!(out, "\n Nothing selected")?;
        }

        self.write_summary(&mut out)
    }

    fn money(&self, amount: Decimal) -> String {
        Money::from_decimal(amount, self.currency).to_string()
    }

    fn combo_row(&self, idx: usize, applied: &AppliedCombo) -> [String; 6] {
        let bundle_price = applied.rule.price();
        let line_total = bundle_price.saturating_mul(Decimal::from(applied.times_applied));

        [
            format!("#{:<3}", idx + 1),
            format!("{} ({})", applied.rule.shape(), applied.rule.id),
            format!("{}x", applied.times_applied),
            self.money(bundle_price),
            self.money(line_total),
            self.money(applied.savings),
        ]
    }

    fn remainder_row(&self, line: &RemainderLine) -> [String; 6] {
        [
            String::new(),
            line.category.to_string(),
            line.units.to_string(),
            self.money(line.unit_price),
            self.money(line.line_total()),
            String::new(),
        ]
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let percent_points = percent_points(self.result.savings_percent());

        let subtotal_label = " Subtotal:";
        let total_label = " \x1b[1mTotal:\x1b[0m";
        let savings_label = " Savings:";

        let subtotal_val = format!("{}  ", self.money(self.result.subtotal()));
        let total_val = format!("{}  ", self.money(self.result.total()));
        let savings_val = format!(
            "({percent_points:.2}%) {}  ",
            self.money(self.result.savings())
        );

        let label_width = [subtotal_label, total_label, savings_label]
            .into_iter()
            .map(visible_width)
            .max()
            .unwrap_or(0);

        let value_width = [&subtotal_val, &total_val, &savings_val]
            .into_iter()
            .map(|value| visible_width(value))
            .max()
            .unwrap_or(0);

        write_summary_line(out, subtotal_label, &subtotal_val, label_width, value_width)?;
        write_summary_line(
            out,
            total_label,
            &format!("\x1b[1m{total_val}\x1b[0m"),
            label_width,
            value_width,
        )?;
        write_summary_line(out, savings_label, &savings_val, label_width, value_width)?;

        writeln!(out)?;

        Ok(())
    }
}

fn write_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..6), Alignment::right());

    writeln!(out, "\n{}", grey_borders(&table.to_string()))?;

    Ok(())
}

/// `Percentage` holds a fraction (0.25), receipts print percent points (25.00).
fn percent_points(percentage: Percentage) -> Decimal {
    (percentage * Decimal::ONE)
        .saturating_mul(Decimal::ONE_HUNDRED)
        .round_dp(2)
}

/// Wraps runs of box-drawing characters (U+2500..U+257F) in ANSI dark grey.
fn grey_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let is_border = ('\u{2500}'..='\u{257F}').contains(&ch);

        if is_border != in_run {
            _ = out.write_str(if is_border { "\x1b[90m" } else { "\x1b[0m" });
            in_run = is_border;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Printable width of a string, ignoring ANSI escape sequences.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            in_escape = !ch.is_ascii_alphabetic();
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Right-aligns `label` in its column and pads `value` to a fixed width.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_width: usize,
    value_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_width.saturating_sub(visible_width(label));
    let value_pad = value_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{}{label}  {}{value}",
        " ".repeat(label_pad),
        " ".repeat(value_pad)
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::{
        catalog::{CatalogItem, SelectionMap},
        categories::CategorySet,
        pricing::compute_best_price,
        rules::PricingRule,
    };

    use super::*;

    fn priced() -> PriceResult {
        let categories = CategorySet::from_strs(&["FOOD", "DRINK"]);
        let items = [
            CatalogItem::new("burger", "Burger", "FOOD"),
            CatalogItem::new("cola", "Cola", "DRINK"),
        ];
        let rules = [
            PricingRule::unit("food", "FOOD", dec!(10)),
            PricingRule::unit("drink", "DRINK", dec!(2.50)),
            PricingRule::quantity_combo("food-10", "FOOD", 10, dec!(90)),
        ];
        let selection = SelectionMap::new().with("burger", 13).with("cola", 2);

        compute_best_price(&categories, &selection, &items, &rules)
    }

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut in_escape = false;

        for ch in s.chars() {
            if in_escape {
                in_escape = !ch.is_ascii_alphabetic();
            } else if ch == '\x1b' {
                in_escape = true;
            } else {
                out.push(ch);
            }
        }

        out
    }

    #[test]
    fn write_to_lists_combos_remainder_and_summary() -> TestResult {
        let result = priced();
        let receipt = Receipt::new(&result, GBP);

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let text = strip_ansi(&String::from_utf8(out)?);

        assert!(text.contains("10x FOOD (food-10)"), "combo row missing:\n{text}");
        assert!(text.contains("£90.00"), "bundle price missing:\n{text}");
        assert!(text.contains("DRINK"), "remainder row missing:\n{text}");
        assert!(text.contains("Subtotal:"), "summary missing:\n{text}");
        assert!(text.contains("£135.00"), "subtotal missing:\n{text}");
        assert!(text.contains("£125.00"), "total missing:\n{text}");
        assert!(text.contains("(7.41%) £10.00"), "savings missing:\n{text}");

        Ok(())
    }

    #[test]
    fn write_to_handles_empty_result() -> TestResult {
        let result = compute_best_price(&CategorySet::default(), &SelectionMap::new(), &[], &[]);
        let receipt = Receipt::new(&result, GBP);

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let text = strip_ansi(&String::from_utf8(out)?);

        assert!(text.contains("Nothing selected"), "placeholder missing:\n{text}");
        assert!(text.contains("(0.00%)"), "zero savings missing:\n{text}");

        Ok(())
    }

    #[test]
    fn visible_width_ignores_escape_sequences() {
        assert_eq!(visible_width("\x1b[1mTotal:\x1b[0m"), 6);
    }

    #[test]
    fn grey_borders_wraps_box_runs_only() {
        assert_eq!(grey_borders("│a│"), "\x1b[90m│\x1b[0ma\x1b[90m│\x1b[0m");
    }

    #[test]
    fn percent_points_scales_fraction() {
        assert_eq!(percent_points(Percentage::from(dec!(0.25))), dec!(25));
    }
}
