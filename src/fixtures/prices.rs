//! Price and currency parsing for fixtures

use rust_decimal::Decimal;
use rusty_money::iso::{Currency, EUR, GBP, USD};

use crate::fixtures::FixtureError;

/// Parse a non-negative decimal price string (e.g. `"9.50"`).
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the string is not a decimal number or is
/// negative.
pub fn parse_price(s: &str) -> Result<Decimal, FixtureError> {
    let amount = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    Ok(amount)
}

/// Resolve an ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for anything other than GBP, USD or EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_decimal_prices() -> TestResult {
        assert_eq!(parse_price("9.50")?, dec!(9.50));
        assert_eq!(parse_price(" 12 ")?, dec!(12));
        assert_eq!(parse_price("0")?, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn rejects_negative_and_malformed_prices() {
        assert!(matches!(parse_price("-1.00"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("ten"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("9.50 GBP"), Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn resolves_supported_currencies() -> TestResult {
        assert_eq!(parse_currency("GBP")?, GBP);
        assert_eq!(parse_currency("EUR")?, EUR);

        assert!(matches!(
            parse_currency("JPY"),
            Err(FixtureError::UnknownCurrency(code)) if code == "JPY"
        ));

        Ok(())
    }
}
