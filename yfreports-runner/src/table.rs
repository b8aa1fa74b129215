//! Flat row sets: records rendered to cells, columns taken from the first record.

use yfreports_core::data::DataError;
use yfreports_core::normalize::{ChartPoint, QuoteRecord};

/// A record that renders to ordered `(column, cell)` pairs.
pub trait TabularRecord {
    fn fields(&self) -> Vec<(&'static str, String)>;
}

impl TabularRecord for ChartPoint {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("datetime", self.date.format("%Y-%m-%d").to_string()),
            ("symbol", self.symbol.clone()),
            ("currency", self.currency.clone()),
            ("price", format!("{:.2}", self.price)),
        ]
    }
}

impl TabularRecord for QuoteRecord {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("symbol", self.symbol.clone()),
            ("short_name", self.short_name.clone()),
            ("long_name", self.long_name.clone()),
            ("type_disp", self.type_disp.clone()),
            ("currency", self.currency.clone()),
            ("quote_type", self.quote_type.clone()),
            ("price", amount(self.price)),
            ("low52", amount(self.low52)),
            ("high52", amount(self.high52)),
            ("region", self.region.clone()),
        ]
    }
}

/// Shortest round-trip rendering that always keeps a fractional part (`120.0`).
fn amount(value: f64) -> String {
    format!("{value:?}")
}

/// Header plus rows, ready for a delimited-file writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RowSet {
    /// Flatten records. Column order comes from the first record.
    ///
    /// Zero records leave the column order undefined, which is reported as
    /// `EmptyResult` for the named pipeline.
    pub fn from_records<R: TabularRecord>(pipeline: &str, records: &[R]) -> Result<Self, DataError> {
        let first = records.first().ok_or_else(|| DataError::EmptyResult {
            pipeline: pipeline.to_string(),
        })?;
        let columns: Vec<&'static str> = first.fields().into_iter().map(|(name, _)| name).collect();

        let rows = records
            .iter()
            .map(|record| {
                let fields = record.fields();
                columns
                    .iter()
                    .map(|col| {
                        fields
                            .iter()
                            .find(|(name, _)| name == col)
                            .map(|(_, cell)| cell.clone())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            columns: columns.into_iter().map(String::from).collect(),
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
