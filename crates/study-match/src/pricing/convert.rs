use super::PriceQuantity;
use std::collections::HashMap;
use std::future::Future;
use tracing::warn;

/// External currency-rate collaborator. Treated as a black box that may
/// fail or be slow; lookups happen off the hot filter path.
pub trait CurrencyRateProvider: Send + Sync {
    /// Multiplier taking one unit of `from` into `to`.
    fn rate(&self, from: &str, to: &str) -> impl Future<Output = Result<f64, CurrencyError>> + Send;
}

/// Rate lookup failure.
#[derive(Debug, thiserror::Error)]
pub enum CurrencyError {
    #[error("no rate published for {from}->{to}")]
    UnknownPair { from: String, to: String },
    #[error("rate provider unavailable: {0}")]
    Unavailable(String),
}

/// Rates resolved ahead of a filter pass so the pure reducer can convert
/// synchronously. Missing pairs are tolerated by every caller.
#[derive(Debug, Clone, Default)]
pub struct RateSnapshot {
    rates: HashMap<(String, String), f64>,
}

impl RateSnapshot {
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>, rate: f64) {
        self.rates.insert((from.into(), to.into()), rate);
    }

    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Option<f64> {
        if from == to {
            return Some(amount);
        }
        self.rates
            .get(&(from.to_string(), to.to_string()))
            .map(|rate| amount * rate)
    }
}

/// Format a quantity in the target currency, falling back to the
/// original quantity when the snapshot has no usable rate.
pub fn to_display_currency(
    quantity: &PriceQuantity,
    target_currency: &str,
    rates: &RateSnapshot,
) -> String {
    match rates.convert(quantity.amount, &quantity.currency, target_currency) {
        Some(converted) => PriceQuantity::new(converted, target_currency).display(),
        None => {
            warn!(
                from = %quantity.currency,
                to = %target_currency,
                "missing rate, displaying original currency"
            );
            quantity.display()
        }
    }
}
