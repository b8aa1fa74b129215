//! Typed views of provider payloads, validated once at the client boundary.
//!
//! Every field is deserialized as optional and then checked, so a missing
//! field surfaces as a `MalformedPayload` naming the field instead of a
//! generic serde message. Normalizers only ever see `ChartSeries` and
//! `QuoteEntry`.

use super::provider::{DataError, RawPayload};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Option<ChartBody>,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartData>>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    currency: Option<String>,
    symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Option<Vec<IndicatorQuote>>,
}

#[derive(Debug, Deserialize)]
struct IndicatorQuote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteEnvelope {
    quote_response: Option<QuoteBody>,
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    result: Option<Vec<RawQuote>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuote {
    symbol: Option<String>,
    currency: Option<String>,
    regular_market_price: Option<f64>,
    fifty_two_week_low: Option<f64>,
    fifty_two_week_high: Option<f64>,
    short_name: Option<String>,
    long_name: Option<String>,
    type_disp: Option<String>,
    quote_type: Option<String>,
    region: Option<String>,
}

/// Error body shape: `{"<chart|quote>": {"error": {"code", "description"}}}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    description: Option<String>,
}

/// Validated time series for one symbol: parallel, equal-length, non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub symbol: String,
    pub currency: String,
    pub timestamps: Vec<i64>,
    pub closes: Vec<f64>,
}

impl ChartSeries {
    /// Validate a chart payload, taking the first result entry.
    pub fn from_payload(payload: &RawPayload) -> Result<Self, DataError> {
        let envelope = ChartEnvelope::deserialize(payload)
            .map_err(|e| malformed(format!("chart payload: {e}")))?;

        let data = envelope
            .chart
            .ok_or_else(|| malformed("missing 'chart'"))?
            .result
            .ok_or_else(|| malformed("missing 'chart.result'"))?
            .into_iter()
            .next()
            .ok_or_else(|| malformed("'chart.result' is empty"))?;

        let meta = data.meta.ok_or_else(|| malformed("missing 'meta'"))?;
        let symbol = meta
            .symbol
            .ok_or_else(|| malformed("missing 'meta.symbol'"))?;
        let currency = meta
            .currency
            .ok_or_else(|| malformed(format!("{symbol}: missing 'meta.currency'")))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| malformed(format!("{symbol}: missing 'timestamp' array")))?;

        let raw_closes = data
            .indicators
            .and_then(|i| i.quote)
            .and_then(|q| q.into_iter().next())
            .and_then(|q| q.close)
            .ok_or_else(|| {
                malformed(format!("{symbol}: missing 'indicators.quote[0].close' array"))
            })?;

        if timestamps.is_empty() || raw_closes.is_empty() {
            return Err(malformed(format!(
                "{symbol}: empty series ({} timestamps, {} closes)",
                timestamps.len(),
                raw_closes.len()
            )));
        }
        if timestamps.len() != raw_closes.len() {
            return Err(malformed(format!(
                "{symbol}: {} timestamps but {} closes",
                timestamps.len(),
                raw_closes.len()
            )));
        }

        let closes = raw_closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| {
                close.ok_or_else(|| {
                    malformed(format!(
                        "{symbol}: null close at index {i} (timestamp {})",
                        timestamps[i]
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            symbol,
            currency,
            timestamps,
            closes,
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Validated snapshot for one symbol. Only `long_name` is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteEntry {
    pub symbol: String,
    pub currency: String,
    pub price: f64,
    pub low52: f64,
    pub high52: f64,
    pub short_name: String,
    pub long_name: Option<String>,
    pub type_disp: String,
    pub quote_type: String,
    pub region: String,
}

impl QuoteEntry {
    /// Validate every entry of a quote payload, preserving provider order.
    pub fn from_payload(payload: &RawPayload) -> Result<Vec<Self>, DataError> {
        let envelope = QuoteEnvelope::deserialize(payload)
            .map_err(|e| malformed(format!("quote payload: {e}")))?;

        envelope
            .quote_response
            .ok_or_else(|| malformed("missing 'quoteResponse'"))?
            .result
            .ok_or_else(|| malformed("missing 'quoteResponse.result'"))?
            .into_iter()
            .enumerate()
            .map(|(i, raw)| Self::validate(i, raw))
            .collect()
    }

    fn validate(index: usize, raw: RawQuote) -> Result<Self, DataError> {
        let symbol = require(raw.symbol, "symbol", &format!("entry {index}"))?;
        let at = format!("entry {index} ({symbol})");
        Ok(Self {
            currency: require(raw.currency, "currency", &at)?,
            price: require(raw.regular_market_price, "regularMarketPrice", &at)?,
            low52: require(raw.fifty_two_week_low, "fiftyTwoWeekLow", &at)?,
            high52: require(raw.fifty_two_week_high, "fiftyTwoWeekHigh", &at)?,
            short_name: require(raw.short_name, "shortName", &at)?,
            long_name: raw.long_name,
            type_disp: require(raw.type_disp, "typeDisp", &at)?,
            quote_type: require(raw.quote_type, "quoteType", &at)?,
            region: require(raw.region, "region", &at)?,
            symbol,
        })
    }
}

/// Pull `{code, description}` out of a failure body.
///
/// Looks under `chart`, then `quote`, then `quoteResponse`, taking the first
/// key whose `error` is a non-null object.
pub fn provider_error(body: &RawPayload) -> Option<(String, String)> {
    ["chart", "quote", "quoteResponse"]
        .iter()
        .filter_map(|key| body.get(*key)?.get("error"))
        .filter(|err| err.is_object())
        .find_map(|err| {
            let parsed = ErrorBody::deserialize(err).ok()?;
            if parsed.code.is_none() && parsed.description.is_none() {
                return None;
            }
            Some((
                parsed.code.unwrap_or_default(),
                parsed.description.unwrap_or_default(),
            ))
        })
}

fn require<T>(value: Option<T>, field: &str, at: &str) -> Result<T, DataError> {
    value.ok_or_else(|| malformed(format!("quote {at}: missing required field '{field}'")))
}

fn malformed(msg: impl Into<String>) -> DataError {
    DataError::MalformedPayload(msg.into())
}
