//! Report pipelines: fetch → validate → normalize → flatten.
//!
//! The chart and quote pipelines share one driver, parameterized by a
//! `PayloadKind` that decides how symbols are grouped into requests and how
//! a validated payload becomes records. Validation happens in the client's
//! typed fetch methods; the driver itself does no currency logic.

use crate::table::{RowSet, TabularRecord};
use yfreports_core::config::{ChartSettings, ReportConfig};
use yfreports_core::currency::CurrencyRule;
use yfreports_core::data::{DataError, HttpTransport, YahooClient};
use yfreports_core::normalize::{normalize_entry, normalize_series, ChartPoint, QuoteRecord};

/// How a pipeline groups symbols into requests and turns them into records.
pub trait PayloadKind {
    type Record: TabularRecord;

    /// Pipeline name used in logs and `EmptyResult` errors.
    fn name(&self) -> &'static str;

    /// Symbol groups, one provider request each, in output order.
    fn batches<'a>(&self, symbols: &'a [String]) -> Vec<&'a [String]>;

    /// Fetch one batch through the typed client and normalize it.
    fn fetch_records<T: HttpTransport>(
        &self,
        client: &YahooClient<T>,
        batch: &[String],
    ) -> Result<Vec<Self::Record>, DataError>;
}

/// Time series: one request per symbol.
#[derive(Debug, Clone)]
pub struct ChartKind {
    pub settings: ChartSettings,
    pub rule: CurrencyRule,
}

impl ChartKind {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            settings: config.chart,
            rule: config.currency.clone(),
        }
    }
}

impl PayloadKind for ChartKind {
    type Record = ChartPoint;

    fn name(&self) -> &'static str {
        "chart"
    }

    fn batches<'a>(&self, symbols: &'a [String]) -> Vec<&'a [String]> {
        symbols.chunks(1).collect()
    }

    fn fetch_records<T: HttpTransport>(
        &self,
        client: &YahooClient<T>,
        batch: &[String],
    ) -> Result<Vec<ChartPoint>, DataError> {
        let mut points = Vec::new();
        for symbol in batch {
            let series = client.fetch_chart(symbol, &self.settings)?;
            points.extend(normalize_series(series, self.settings.date_basis, &self.rule)?);
        }
        Ok(points)
    }
}

/// Snapshot: one batched request for all symbols.
#[derive(Debug, Clone)]
pub struct QuoteKind {
    pub rule: CurrencyRule,
}

impl QuoteKind {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            rule: config.currency.clone(),
        }
    }
}

impl PayloadKind for QuoteKind {
    type Record = QuoteRecord;

    fn name(&self) -> &'static str {
        "quote"
    }

    fn batches<'a>(&self, symbols: &'a [String]) -> Vec<&'a [String]> {
        if symbols.is_empty() {
            return Vec::new();
        }
        vec![symbols]
    }

    fn fetch_records<T: HttpTransport>(
        &self,
        client: &YahooClient<T>,
        batch: &[String],
    ) -> Result<Vec<QuoteRecord>, DataError> {
        Ok(client
            .fetch_quotes(batch)?
            .into_iter()
            .map(|entry| normalize_entry(entry, &self.rule))
            .collect())
    }
}

/// Run one pipeline to completion.
///
/// Requests run sequentially and the first error aborts the pipeline; no
/// partial row set is ever returned.
pub fn run_pipeline<K, T>(
    client: &YahooClient<T>,
    kind: &K,
    symbols: &[String],
) -> Result<RowSet, DataError>
where
    K: PayloadKind,
    T: HttpTransport,
{
    let mut records = Vec::new();
    for batch in kind.batches(symbols) {
        records.extend(kind.fetch_records(client, batch)?);
    }

    let rows = RowSet::from_records(kind.name(), &records)?;
    tracing::info!(pipeline = kind.name(), rows = rows.len(), "pipeline complete");
    Ok(rows)
}

/// Chart rows for every configured symbol, in configured order.
pub fn run_chart_pipeline<T: HttpTransport>(
    client: &YahooClient<T>,
    config: &ReportConfig,
) -> Result<RowSet, DataError> {
    run_pipeline(client, &ChartKind::from_config(config), &config.symbols)
}

/// Quote rows for every configured symbol the provider recognises.
pub fn run_quote_pipeline<T: HttpTransport>(
    client: &YahooClient<T>,
    config: &ReportConfig,
) -> Result<RowSet, DataError> {
    run_pipeline(client, &QuoteKind::from_config(config), &config.symbols)
}
