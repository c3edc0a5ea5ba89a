//! Parsing of free-form tuition strings and best-effort currency
//! display.

mod convert;
mod symbols;

pub use convert::{to_display_currency, CurrencyError, CurrencyRateProvider, RateSnapshot};
pub use symbols::{currency_for_symbol, DEFAULT_CURRENCY};

use serde::{Deserialize, Serialize};

/// An amount in a concrete ISO 4217 currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuantity {
    pub amount: f64,
    pub currency: String,
}

impl PriceQuantity {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    pub fn display(&self) -> String {
        format!("{} {:.2}", self.currency, self.amount)
    }
}

/// Parse the first quantity out of a display string such as
/// `"€170 - €3,770"`. An unrecognized symbol run defaults to USD and a
/// missing numeric run defaults to amount 0.
pub fn parse(display: &str) -> PriceQuantity {
    parse_segment(display)
}

/// Parse both endpoints of a `"low - high"` display string. The second
/// quantity is absent for single-price strings.
pub fn parse_range(display: &str) -> (PriceQuantity, Option<PriceQuantity>) {
    let mut segments = display.splitn(2, '-');
    let low = parse_segment(segments.next().unwrap_or_default());
    let high = segments
        .next()
        .filter(|segment| !segment.trim().is_empty())
        .map(parse_segment);
    (low, high)
}

fn parse_segment(segment: &str) -> PriceQuantity {
    let cleaned = segment.replace(',', "");

    let (symbol_run, numeric_run) = match cleaned.find(|c: char| c.is_ascii_digit()) {
        Some(start) => cleaned.split_at(start),
        None => (cleaned.as_str(), ""),
    };

    let currency = currency_for_symbol(symbol_run.trim());
    let amount = numeric_run
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect::<String>()
        .parse::<f64>()
        .unwrap_or(0.0);

    PriceQuantity::new(amount, currency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_quantity_of_a_range() {
        let quantity = parse("€170 - €3,770");
        assert_eq!(quantity, PriceQuantity::new(170.0, "EUR"));
    }

    #[test]
    fn parses_both_range_endpoints() {
        let (low, high) = parse_range("€170 - €3,770");
        assert_eq!(low, PriceQuantity::new(170.0, "EUR"));
        assert_eq!(high, Some(PriceQuantity::new(3770.0, "EUR")));
    }

    #[test]
    fn single_price_has_no_upper_endpoint() {
        let (low, high) = parse_range("£9,250");
        assert_eq!(low, PriceQuantity::new(9250.0, "GBP"));
        assert_eq!(high, None);
    }

    #[test]
    fn dollar_sign_defaults_to_usd() {
        assert_eq!(parse("$12,500").currency, "USD");
        // Explicit prefixes win over the bare dollar sign.
        assert_eq!(parse("C$14,000").currency, "CAD");
        assert_eq!(parse("A$9,800").currency, "AUD");
    }

    #[test]
    fn unrecognized_symbol_defaults_to_usd() {
        let quantity = parse("؋40000");
        assert_eq!(quantity.currency, "USD");
        assert_eq!(quantity.amount, 40000.0);
    }

    #[test]
    fn missing_number_defaults_to_zero() {
        let quantity = parse("Contact the university");
        assert_eq!(quantity.amount, 0.0);
        assert_eq!(quantity.currency, "USD");
    }

    #[test]
    fn decimal_amounts_survive() {
        assert_eq!(parse("₹1,234.56").amount, 1234.56);
    }
}
