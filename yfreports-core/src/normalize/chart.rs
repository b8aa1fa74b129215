//! Chart normalizer: one symbol's time series into dated price points.

use crate::config::DateBasis;
use crate::currency::{round_cents, CurrencyRule};
use crate::data::{ChartSeries, DataError, RawPayload};
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

/// One closing price on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub symbol: String,
    pub currency: String,
    /// Major-unit price, rounded to two fractional digits.
    pub price: f64,
}

/// Validate a raw chart payload and normalize it.
pub fn normalize_chart(
    payload: &RawPayload,
    basis: DateBasis,
    rule: &CurrencyRule,
) -> Result<Vec<ChartPoint>, DataError> {
    let series = ChartSeries::from_payload(payload)?;
    normalize_series(series, basis, rule)
}

/// Pair dates with converted closes, one point per timestamp, source order.
///
/// The currency rule sees the whole close array at once, before pairing, so
/// a series is either entirely converted or untouched.
pub fn normalize_series(
    series: ChartSeries,
    basis: DateBasis,
    rule: &CurrencyRule,
) -> Result<Vec<ChartPoint>, DataError> {
    let ChartSeries {
        symbol,
        currency,
        timestamps,
        mut closes,
    } = series;

    if timestamps.is_empty() || closes.is_empty() {
        return Err(DataError::MalformedPayload(format!(
            "{symbol}: empty timestamp or close array"
        )));
    }
    if timestamps.len() != closes.len() {
        return Err(DataError::MalformedPayload(format!(
            "{symbol}: {} timestamps but {} closes",
            timestamps.len(),
            closes.len()
        )));
    }

    let currency = rule.normalize(&currency, &mut closes);

    timestamps
        .iter()
        .zip(closes)
        .map(|(&ts, close)| -> Result<ChartPoint, DataError> {
            let date = timestamp_to_date(ts, basis).ok_or_else(|| {
                DataError::MalformedPayload(format!("{symbol}: timestamp {ts} out of range"))
            })?;
            Ok(ChartPoint {
                date,
                symbol: symbol.clone(),
                currency: currency.clone(),
                price: round_cents(close),
            })
        })
        .collect()
}

/// Truncate a UNIX timestamp (seconds) to a calendar date.
pub fn timestamp_to_date(ts: i64, basis: DateBasis) -> Option<NaiveDate> {
    let utc = DateTime::from_timestamp(ts, 0)?;
    Some(match basis {
        DateBasis::Utc => utc.date_naive(),
        DateBasis::Local => utc.with_timezone(&Local).date_naive(),
    })
}
