use std::sync::OnceLock;

/// Fallback for unrecognized symbols and the documented resolution of
/// the ambiguous bare dollar sign.
pub const DEFAULT_CURRENCY: &str = "USD";

static SYMBOL_TABLE: OnceLock<Vec<(&'static str, &'static str)>> = OnceLock::new();

/// Map a currency-symbol run to an ISO 4217 code. Multi-character
/// symbols are checked first so `C$` never resolves as `$`.
pub fn currency_for_symbol(symbol: &str) -> &'static str {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        return DEFAULT_CURRENCY;
    }

    for (known, code) in symbol_table() {
        if trimmed == *known || trimmed.ends_with(known) {
            return code;
        }
    }

    DEFAULT_CURRENCY
}

fn symbol_table() -> &'static Vec<(&'static str, &'static str)> {
    SYMBOL_TABLE.get_or_init(|| {
        vec![
            ("R$", "BRL"),
            ("C$", "CAD"),
            ("A$", "AUD"),
            ("CHF", "CHF"),
            ("€", "EUR"),
            ("£", "GBP"),
            ("₹", "INR"),
            ("¥", "JPY"),
            ("₩", "KRW"),
            ("₺", "TRY"),
            ("₦", "NGN"),
            ("$", "USD"),
        ]
    })
}
