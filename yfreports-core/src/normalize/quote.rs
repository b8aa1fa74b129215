//! Quote normalizer: multi-symbol snapshot into one record per entry.

use crate::currency::CurrencyRule;
use crate::data::{DataError, QuoteEntry, RawPayload};
use serde::Serialize;

/// Current snapshot for one symbol, amounts in the major unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRecord {
    pub symbol: String,
    pub short_name: String,
    /// Empty when the provider omits it.
    pub long_name: String,
    pub type_disp: String,
    pub currency: String,
    pub quote_type: String,
    pub price: f64,
    pub low52: f64,
    pub high52: f64,
    pub region: String,
}

/// Validate a raw quote payload and normalize every entry, provider order.
///
/// Symbols the provider did not recognise are simply absent from its result
/// array and are not synthesized here.
pub fn normalize_quotes(
    payload: &RawPayload,
    rule: &CurrencyRule,
) -> Result<Vec<QuoteRecord>, DataError> {
    let entries = QuoteEntry::from_payload(payload)?;
    Ok(entries
        .into_iter()
        .map(|entry| normalize_entry(entry, rule))
        .collect())
}

/// Convert price, 52-week low and 52-week high together.
pub fn normalize_entry(entry: QuoteEntry, rule: &CurrencyRule) -> QuoteRecord {
    let mut amounts = [entry.price, entry.low52, entry.high52];
    let currency = rule.normalize(&entry.currency, &mut amounts);
    let [price, low52, high52] = amounts;

    QuoteRecord {
        symbol: entry.symbol,
        short_name: clean_name(&entry.short_name),
        long_name: entry.long_name.unwrap_or_default(),
        type_disp: entry.type_disp,
        currency,
        quote_type: entry.quote_type,
        price,
        low52,
        high52,
        region: entry.region,
    }
}

/// Strip surrounding whitespace, including the zero-width and no-break
/// characters the provider pads some short names with.
fn clean_name(name: &str) -> String {
    name.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}')
    })
    .to_string()
}
